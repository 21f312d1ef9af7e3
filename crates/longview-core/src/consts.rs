/// Default upper zoom bound, as a multiple of the base scale.
pub const DEFAULT_MAX_SCALE_MULTIPLE: u32 = 3;

/// Exponential decay rate of fling velocity, per second.
/// At 4.0 a fling travels `v0 / 4` pixels in total.
pub const DEFAULT_FLING_FRICTION: f32 = 4.0;

/// Fling speed (image pixels per second) below which the motion is at rest.
pub const DEFAULT_FLING_REST_VELOCITY: f32 = 10.0;

/// Pointer travel (screen pixels) before a press turns into a drag.
/// Matches common platform touch slop (about 8dp).
pub const DEFAULT_TOUCH_SLOP: f32 = 8.0;

/// Maximum delay between the first tap's release and the second press.
pub const DEFAULT_DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Maximum distance between the two taps of a double tap.
pub const DEFAULT_DOUBLE_TAP_SLOP: f32 = 100.0;

/// Release speed (pixels per second) below which no fling is started.
pub const DEFAULT_MIN_FLING_VELOCITY: f32 = 50.0;

/// Release speeds are clamped to this magnitude (pixels per second).
pub const DEFAULT_MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Only pointer samples this recent contribute to the release velocity.
pub const DEFAULT_VELOCITY_WINDOW_MS: u64 = 100;

/// Two-pointer spans shorter than this are too noisy to derive a pinch factor.
pub const MIN_PINCH_SPAN: f32 = 10.0;

/// Bytes per pixel for RGB 5-6-5 output.
pub const RGB565_BYTES_PER_PIXEL: usize = 2;

/// Bytes per pixel for 8-bit RGBA output.
pub const RGBA8_BYTES_PER_PIXEL: usize = 4;

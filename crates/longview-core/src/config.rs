use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DOUBLE_TAP_SLOP, DEFAULT_DOUBLE_TAP_TIMEOUT_MS, DEFAULT_FLING_FRICTION,
    DEFAULT_FLING_REST_VELOCITY, DEFAULT_MAX_FLING_VELOCITY, DEFAULT_MAX_SCALE_MULTIPLE,
    DEFAULT_MIN_FLING_VELOCITY, DEFAULT_TOUCH_SLOP, DEFAULT_VELOCITY_WINDOW_MS,
};
use crate::error::{Result, ViewerError};
use crate::pixel::PixelFormat;

/// Top-level viewer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Upper zoom bound as a multiple of the base scale.
    #[serde(default = "default_max_scale_multiple")]
    pub max_scale_multiple: u32,
    #[serde(default)]
    pub pan_mode: PanMode,
    #[serde(default)]
    pub initial_window: InitialWindow,
    #[serde(default)]
    pub pixel_format: PixelFormat,
    #[serde(default)]
    pub fling: FlingConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
}

fn default_max_scale_multiple() -> u32 {
    DEFAULT_MAX_SCALE_MULTIPLE
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_scale_multiple: DEFAULT_MAX_SCALE_MULTIPLE,
            pan_mode: PanMode::default(),
            initial_window: InitialWindow::default(),
            pixel_format: PixelFormat::default(),
            fling: FlingConfig::default(),
            gestures: GestureConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Reject values the viewport and fling math cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_scale_multiple == 0 {
            return Err(ViewerError::Config(
                "max_scale_multiple must be at least 1".into(),
            ));
        }
        if !(self.fling.friction > 0.0 && self.fling.friction.is_finite()) {
            return Err(ViewerError::Config(format!(
                "fling friction must be positive, got {}",
                self.fling.friction
            )));
        }
        if !(self.fling.rest_velocity >= 0.0 && self.fling.rest_velocity.is_finite()) {
            return Err(ViewerError::Config(format!(
                "fling rest_velocity must be finite and non-negative, got {}",
                self.fling.rest_velocity
            )));
        }
        let g = &self.gestures;
        for (name, value) in [
            ("touch_slop", g.touch_slop),
            ("double_tap_slop", g.double_tap_slop),
            ("min_fling_velocity", g.min_fling_velocity),
            ("max_fling_velocity", g.max_fling_velocity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ViewerError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if g.min_fling_velocity > g.max_fling_velocity {
            return Err(ViewerError::Config(format!(
                "min_fling_velocity ({}) exceeds max_fling_velocity ({})",
                g.min_fling_velocity, g.max_fling_velocity
            )));
        }
        Ok(())
    }
}

/// How a drag delta (screen pixels) maps onto the image-space rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanMode {
    /// Screen delta applied unchanged, so panning speed ignores zoom.
    #[default]
    Raw,
    /// Screen delta divided by the current scale, so content tracks the finger.
    ScaleCorrected,
}

impl fmt::Display for PanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanMode::Raw => write!(f, "Raw"),
            PanMode::ScaleCorrected => write!(f, "Scale Corrected"),
        }
    }
}

/// Size of the rectangle set up by the first layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialWindow {
    /// Width equals the view width in image pixels, height is the view
    /// height divided by the base scale.
    #[default]
    ViewSized,
    /// Both extents are the view extents divided by the base scale.
    ScaleFitted,
}

impl fmt::Display for InitialWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialWindow::ViewSized => write!(f, "View Sized"),
            InitialWindow::ScaleFitted => write!(f, "Scale Fitted"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlingConfig {
    /// Exponential velocity decay rate, per second.
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Speed (image pixels per second) treated as rest.
    #[serde(default = "default_rest_velocity")]
    pub rest_velocity: f32,
}

fn default_friction() -> f32 {
    DEFAULT_FLING_FRICTION
}
fn default_rest_velocity() -> f32 {
    DEFAULT_FLING_REST_VELOCITY
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FLING_FRICTION,
            rest_velocity: DEFAULT_FLING_REST_VELOCITY,
        }
    }
}

/// Thresholds used when turning raw pointer events into gestures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_touch_slop")]
    pub touch_slop: f32,
    #[serde(default = "default_double_tap_timeout_ms")]
    pub double_tap_timeout_ms: u64,
    #[serde(default = "default_double_tap_slop")]
    pub double_tap_slop: f32,
    #[serde(default = "default_min_fling_velocity")]
    pub min_fling_velocity: f32,
    #[serde(default = "default_max_fling_velocity")]
    pub max_fling_velocity: f32,
    #[serde(default = "default_velocity_window_ms")]
    pub velocity_window_ms: u64,
}

fn default_touch_slop() -> f32 {
    DEFAULT_TOUCH_SLOP
}
fn default_double_tap_timeout_ms() -> u64 {
    DEFAULT_DOUBLE_TAP_TIMEOUT_MS
}
fn default_double_tap_slop() -> f32 {
    DEFAULT_DOUBLE_TAP_SLOP
}
fn default_min_fling_velocity() -> f32 {
    DEFAULT_MIN_FLING_VELOCITY
}
fn default_max_fling_velocity() -> f32 {
    DEFAULT_MAX_FLING_VELOCITY
}
fn default_velocity_window_ms() -> u64 {
    DEFAULT_VELOCITY_WINDOW_MS
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            double_tap_timeout_ms: DEFAULT_DOUBLE_TAP_TIMEOUT_MS,
            double_tap_slop: DEFAULT_DOUBLE_TAP_SLOP,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
        }
    }
}

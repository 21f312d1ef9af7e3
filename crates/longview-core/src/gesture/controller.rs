use std::time::Duration;

use tracing::debug;

use crate::config::{FlingConfig, PanMode};
use crate::gesture::fling::FlingSimulator;
use crate::viewport::Viewport;

/// A recognised gesture primitive, as delivered by the host or produced by
/// [`GestureRecognizer`](crate::gesture::GestureRecognizer).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A pointer touched down.
    Down,
    /// Scroll distance since the previous drag event, in screen pixels:
    /// previous pointer position minus current, so dragging the finger up
    /// moves the window down the image.
    Drag { dx: f32, dy: f32 },
    /// Span ratio since the previous pinch event.
    Pinch { scale_factor: f32 },
    DoubleTap,
    /// Pointer velocity at release, screen pixels per second.
    Fling { velocity_x: f32, velocity_y: f32 },
    /// Last pointer lifted.
    Up,
}

/// What handling a gesture asks of the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureResponse {
    /// The event stream belongs to the viewer from here on.
    pub consumed: bool,
    pub redraw: bool,
}

/// Turns gesture primitives into viewport mutations. One gesture at a time;
/// owns the in-flight fling, if any.
#[derive(Debug)]
pub struct GestureController {
    pan_mode: PanMode,
    fling_config: FlingConfig,
    fling: Option<FlingSimulator>,
    residual: (f32, f32),
}

impl GestureController {
    pub fn new(pan_mode: PanMode, fling_config: FlingConfig) -> Self {
        Self {
            pan_mode,
            fling_config,
            fling: None,
            residual: (0.0, 0.0),
        }
    }

    pub fn pan_mode(&self) -> PanMode {
        self.pan_mode
    }

    pub fn is_flinging(&self) -> bool {
        self.fling.as_ref().is_some_and(|f| !f.is_finished())
    }

    pub fn handle(&mut self, viewport: &mut Viewport, gesture: Gesture) -> GestureResponse {
        match gesture {
            Gesture::Down => GestureResponse {
                consumed: self.on_down(),
                redraw: false,
            },
            Gesture::Drag { dx, dy } => respond(self.on_drag(viewport, dx, dy)),
            Gesture::Pinch { scale_factor } => respond(self.on_pinch(viewport, scale_factor)),
            Gesture::DoubleTap => respond(self.on_double_tap(viewport)),
            Gesture::Fling {
                velocity_x,
                velocity_y,
            } => respond(self.on_fling_start(viewport, velocity_x, velocity_y)),
            Gesture::Up => respond(false),
        }
    }

    /// Stop any fling where it is and claim the event stream.
    pub fn on_down(&mut self) -> bool {
        if let Some(fling) = self.fling.as_mut() {
            if !fling.is_finished() {
                debug!("Fling cancelled by pointer down");
            }
            fling.cancel();
        }
        self.fling = None;
        self.residual = (0.0, 0.0);
        true
    }

    /// Pan by a screen-space scroll distance. Returns whether to redraw.
    pub fn on_drag(&mut self, viewport: &mut Viewport, dx: f32, dy: f32) -> bool {
        let (ix, iy) = match self.pan_mode {
            PanMode::Raw => (dx as i32, dy as i32),
            PanMode::ScaleCorrected => {
                let scale = viewport.current_scale();
                let x = self.residual.0 + dx / scale;
                let y = self.residual.1 + dy / scale;
                let (ix, iy) = (x.trunc(), y.trunc());
                self.residual = (carry(x, ix), carry(y, iy));
                (ix as i32, iy as i32)
            }
        };
        viewport.translate(ix, iy);
        true
    }

    /// Multiply the current scale, anchored at the window's top-left.
    pub fn on_pinch(&mut self, viewport: &mut Viewport, scale_factor: f32) -> bool {
        viewport.set_scale(viewport.current_scale() * scale_factor);
        true
    }

    /// Toggle between the base scale and the maximum zoom.
    pub fn on_double_tap(&mut self, viewport: &mut Viewport) -> bool {
        viewport.toggle_zoom();
        debug!(scale = viewport.current_scale(), rect = %viewport.rect(), "Double tap zoom");
        true
    }

    /// Start an inertial scroll from a release velocity.
    ///
    /// The window moves opposite to the pointer, so the velocity is negated.
    /// Returns whether a fling is now running.
    pub fn on_fling_start(&mut self, viewport: &mut Viewport, velocity_x: f32, velocity_y: f32) -> bool {
        let divisor = match self.pan_mode {
            PanMode::Raw => 1.0,
            PanMode::ScaleCorrected => viewport.current_scale(),
        };
        let rect = viewport.rect();
        let (max_x, max_y) = viewport.scroll_limits();
        let fling = FlingSimulator::start(
            (rect.left, rect.top),
            (-velocity_x / divisor, -velocity_y / divisor),
            (0, max_x),
            (0, max_y),
            &self.fling_config,
        );
        debug!(velocity_x, velocity_y, max_x, max_y, "Fling started");
        self.fling = Some(fling);
        self.is_flinging()
    }

    /// Advance a running fling by one frame. Returns whether to redraw.
    pub fn on_frame(&mut self, viewport: &mut Viewport, dt: Duration) -> bool {
        let Some(fling) = self.fling.as_mut() else {
            return false;
        };
        let Some((x, y)) = fling.tick(dt) else {
            self.fling = None;
            return false;
        };
        viewport.set_position(x, y);
        if fling.is_finished() {
            debug!(rect = %viewport.rect(), "Fling finished");
            self.fling = None;
        }
        true
    }
}

/// Sub-pixel part of a scaled delta. Dropped when the delta was not finite.
fn carry(value: f32, whole: f32) -> f32 {
    let rest = value - whole;
    if rest.is_finite() {
        rest
    } else {
        0.0
    }
}

fn respond(redraw: bool) -> GestureResponse {
    GestureResponse {
        consumed: true,
        redraw,
    }
}

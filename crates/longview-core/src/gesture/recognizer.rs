use std::collections::VecDeque;

use crate::config::GestureConfig;
use crate::consts::MIN_PINCH_SPAN;
use crate::gesture::controller::Gesture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// One raw pointer sample from the host, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: u32,
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(id: u32, kind: PointerKind, x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            time_ms,
        }
    }
}

/// Boundary adapter from raw pointer events to [`Gesture`]s.
///
/// Single pointer: press, drag past the touch slop, release with or
/// without a fling; two quick taps make a double tap. A second pointer
/// turns the gesture into a pinch until all pointers lift.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    pointers: Vec<(u32, (f32, f32))>,
    origin: (f32, f32),
    last: (f32, f32),
    dragging: bool,
    multi_touch: bool,
    in_double_tap: bool,
    pinch_span: Option<f32>,
    samples: VecDeque<(u64, f32, f32)>,
    last_tap: Option<(u64, f32, f32)>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pointers: Vec::with_capacity(2),
            origin: (0.0, 0.0),
            last: (0.0, 0.0),
            dragging: false,
            multi_touch: false,
            in_double_tap: false,
            pinch_span: None,
            samples: VecDeque::new(),
            last_tap: None,
        }
    }

    pub fn on_event(&mut self, event: PointerEvent) -> Vec<Gesture> {
        match event.kind {
            PointerKind::Down => self.on_down(event),
            PointerKind::Move => self.on_move(event),
            PointerKind::Up => self.on_up(event),
            PointerKind::Cancel => {
                self.reset();
                self.last_tap = None;
                Vec::new()
            }
        }
    }

    fn on_down(&mut self, ev: PointerEvent) -> Vec<Gesture> {
        let pos = (ev.x, ev.y);
        if !self.pointers.is_empty() {
            if !self.set_pointer(ev.id, pos) {
                self.pointers.push((ev.id, pos));
            }
            self.multi_touch = true;
            self.pinch_span = self.span();
            return Vec::new();
        }

        self.reset();
        self.pointers.push((ev.id, pos));
        self.origin = pos;
        self.last = pos;
        self.record_sample(ev.time_ms, pos);

        let mut out = vec![Gesture::Down];
        if let Some((t, x, y)) = self.last_tap.take() {
            let quick = ev.time_ms.saturating_sub(t) <= self.config.double_tap_timeout_ms;
            if quick && distance((x, y), pos) <= self.config.double_tap_slop {
                self.in_double_tap = true;
                out.push(Gesture::DoubleTap);
            }
        }
        out
    }

    fn on_move(&mut self, ev: PointerEvent) -> Vec<Gesture> {
        if !self.set_pointer(ev.id, (ev.x, ev.y)) {
            return Vec::new();
        }

        if self.pointers.len() >= 2 {
            let span = self.span();
            let gesture = match (self.pinch_span, span) {
                (Some(prev), Some(now)) if prev >= MIN_PINCH_SPAN && now >= MIN_PINCH_SPAN => {
                    Some(Gesture::Pinch {
                        scale_factor: now / prev,
                    })
                }
                _ => None,
            };
            self.pinch_span = span;
            return gesture.into_iter().collect();
        }

        let pos = (ev.x, ev.y);
        self.record_sample(ev.time_ms, pos);
        if !self.dragging {
            if distance(self.origin, pos) <= self.config.touch_slop {
                return Vec::new();
            }
            self.dragging = true;
        }
        let drag = Gesture::Drag {
            dx: self.last.0 - pos.0,
            dy: self.last.1 - pos.1,
        };
        self.last = pos;
        vec![drag]
    }

    fn on_up(&mut self, ev: PointerEvent) -> Vec<Gesture> {
        let Some(index) = self.pointers.iter().position(|(id, _)| *id == ev.id) else {
            return Vec::new();
        };
        self.pointers.remove(index);

        if let Some(&(_, pos)) = self.pointers.first() {
            // Back to one pointer: it keeps panning from where it is.
            self.pinch_span = None;
            self.last = pos;
            self.dragging = true;
            self.samples.clear();
            return Vec::new();
        }

        let pos = (ev.x, ev.y);
        let mut out = Vec::new();
        if !self.multi_touch {
            if self.dragging {
                self.record_sample(ev.time_ms, pos);
                if let Some(fling) = self.release_velocity() {
                    out.push(fling);
                }
            } else if !self.in_double_tap {
                self.last_tap = Some((ev.time_ms, pos.0, pos.1));
            }
        }
        out.push(Gesture::Up);
        self.reset();
        out
    }

    fn reset(&mut self) {
        self.pointers.clear();
        self.dragging = false;
        self.multi_touch = false;
        self.in_double_tap = false;
        self.pinch_span = None;
        self.samples.clear();
    }

    /// Update a tracked pointer. `false` if it is not down.
    fn set_pointer(&mut self, id: u32, pos: (f32, f32)) -> bool {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => {
                entry.1 = pos;
                true
            }
            None => false,
        }
    }

    fn span(&self) -> Option<f32> {
        match self.pointers.as_slice() {
            [(_, a), (_, b), ..] => Some(distance(*a, *b)),
            _ => None,
        }
    }

    fn record_sample(&mut self, time_ms: u64, pos: (f32, f32)) {
        self.samples.push_back((time_ms, pos.0, pos.1));
        let window = self.config.velocity_window_ms;
        while let Some(&(t, _, _)) = self.samples.front() {
            if time_ms.saturating_sub(t) > window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn release_velocity(&self) -> Option<Gesture> {
        let (t0, x0, y0) = *self.samples.front()?;
        let (t1, x1, y1) = *self.samples.back()?;
        let dt = t1.saturating_sub(t0) as f32 / 1000.0;
        if dt <= 0.0 {
            return None;
        }

        // `clamp` panics on a NaN or negative bound.
        let max = self.config.max_fling_velocity.abs();
        let vx = ((x1 - x0) / dt).max(-max).min(max);
        let vy = ((y1 - y0) / dt).max(-max).min(max);
        let min = self.config.min_fling_velocity;
        if vx.abs() < min && vy.abs() < min {
            return None;
        }
        Some(Gesture::Fling {
            velocity_x: vx,
            velocity_y: vy,
        })
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

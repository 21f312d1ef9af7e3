use std::time::Duration;

use tracing::trace;

use crate::config::FlingConfig;

/// Inertial scroll after a release, decelerating exponentially and stopping
/// at the axis bounds.
///
/// Positions are closed-form in the elapsed time, so uneven frame intervals
/// do not change where the motion ends up.
#[derive(Clone, Debug)]
pub struct FlingSimulator {
    x: AxisMotion,
    y: AxisMotion,
    friction: f32,
    rest_velocity: f32,
    elapsed: f32,
    finished: bool,
}

#[derive(Clone, Debug)]
struct AxisMotion {
    start: f32,
    velocity: f32,
    min: f32,
    max: f32,
    position: f32,
    finished: bool,
}

impl AxisMotion {
    fn new(start: i32, velocity: f32, (min, max): (i32, i32)) -> Self {
        let min = min as f32;
        let max = (max as f32).max(min);
        let start = (start as f32).clamp(min, max);
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        Self {
            start,
            velocity,
            min,
            max,
            position: start,
            finished: velocity == 0.0,
        }
    }

    fn advance(&mut self, t: f32, friction: f32, rest_velocity: f32) {
        if self.finished {
            return;
        }
        let decay = (-friction * t).exp();
        let pos = self.start + self.velocity / friction * (1.0 - decay);

        if pos <= self.min || pos >= self.max {
            self.position = pos.clamp(self.min, self.max);
            self.finished = true;
            return;
        }
        self.position = pos;
        if (self.velocity * decay).abs() < rest_velocity {
            self.finished = true;
        }
    }
}

impl FlingSimulator {
    /// Begin a fling at `start` with `velocity` in image pixels per second.
    /// Each axis stays within its inclusive `(min, max)` bounds.
    pub fn start(
        start: (i32, i32),
        velocity: (f32, f32),
        bounds_x: (i32, i32),
        bounds_y: (i32, i32),
        config: &FlingConfig,
    ) -> Self {
        let x = AxisMotion::new(start.0, velocity.0, bounds_x);
        let y = AxisMotion::new(start.1, velocity.1, bounds_y);
        let finished = x.finished && y.finished;
        Self {
            x,
            y,
            friction: config.friction,
            rest_velocity: config.rest_velocity,
            elapsed: 0.0,
            finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stop immediately; later ticks return `None`.
    pub fn cancel(&mut self) {
        self.finished = true;
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x.position.round() as i32, self.y.position.round() as i32)
    }

    /// Advance by one frame interval.
    ///
    /// Returns the new top-left corner, including on the tick that brings
    /// the motion to rest. Once finished, every tick is a no-op.
    pub fn tick(&mut self, dt: Duration) -> Option<(i32, i32)> {
        if self.finished {
            return None;
        }
        self.elapsed += dt.as_secs_f32();
        self.x.advance(self.elapsed, self.friction, self.rest_velocity);
        self.y.advance(self.elapsed, self.friction, self.rest_velocity);
        self.finished = self.x.finished && self.y.finished;

        let pos = self.position();
        trace!(x = pos.0, y = pos.1, finished = self.finished, "Fling tick");
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn zero_velocity_is_already_finished() {
        let mut fling =
            FlingSimulator::start((5, 5), (0.0, 0.0), (0, 10), (0, 10), &FlingConfig::default());
        assert!(fling.is_finished());
        assert_eq!(fling.tick(FRAME), None);
    }

    #[test]
    fn decelerates_to_rest() {
        let config = FlingConfig::default();
        let mut fling = FlingSimulator::start((0, 0), (0.0, 400.0), (0, 0), (0, 10_000), &config);
        let mut last = 0;
        let mut steps = Vec::new();
        while let Some((_, y)) = fling.tick(FRAME) {
            steps.push(y - last);
            last = y;
        }
        assert!(fling.is_finished());
        // Total travel approaches v0 / friction = 100 pixels.
        assert!((95..=100).contains(&last), "travelled {last}");
        assert!(steps.first() > steps.last());
    }

    #[test]
    fn stops_at_bound() {
        let mut fling = FlingSimulator::start(
            (0, 50),
            (0.0, -100_000.0),
            (0, 0),
            (0, 1000),
            &FlingConfig::default(),
        );
        let pos = fling.tick(Duration::from_millis(100)).unwrap();
        assert_eq!(pos, (0, 0));
        assert!(fling.is_finished());
    }

    #[test]
    fn cancel_makes_next_tick_noop() {
        let mut fling = FlingSimulator::start(
            (0, 0),
            (1000.0, 1000.0),
            (0, 5000),
            (0, 5000),
            &FlingConfig::default(),
        );
        assert!(fling.tick(FRAME).is_some());
        fling.cancel();
        assert_eq!(fling.tick(FRAME), None);
    }
}

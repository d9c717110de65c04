//! Simulation clock
//!
//! Externally driven: the frame driver hands in each tick's delta and the clock
//! accumulates total elapsed run time. It never reads wall time.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    delta: f32,
    elapsed: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick of `dt` seconds. Negative or NaN deltas count as zero so
    /// elapsed time stays monotonic.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt;
        dt
    }

    /// Delta of the most recent tick
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Total simulated seconds since the clock was created
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn negative_delta_is_clamped() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(-3.0), 0.0);
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.elapsed(), 1.0);
    }
}

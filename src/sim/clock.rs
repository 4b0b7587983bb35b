//! Fixed-step simulation clock
//!
//! Converts variable host-frame timestamps into a whole number of fixed
//! simulation ticks. Render cadence and tick count are independent: a host
//! frame may drain zero, one or several ticks.

/// Slack when comparing accumulated time against the step, so that deltas
/// summing to `k` steps drain exactly `k` ticks however they are chunked.
const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f64,
    accumulator: f64,
    last_time: Option<f64>,
}

impl FixedStepClock {
    /// Clock draining ticks of `step` seconds. Panics unless `step` is
    /// positive and finite.
    pub fn new(step: f32) -> Self {
        assert!(step.is_finite() && step > 0.0, "tick step must be positive, got {step}");
        Self {
            step: step as f64,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Tick size in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Time carried over to the next host frame (seconds)
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Forget the previous timestamp and any carried time. The next
    /// [`FixedStepClock::advance_to`] then counts as zero elapsed.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Feed a host timestamp (ms) and return how many ticks to run
    pub fn advance_to(&mut self, timestamp_ms: f64) -> u32 {
        let elapsed_ms = match self.last_time {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(timestamp_ms);
        self.advance_by(elapsed_ms / 1000.0)
    }

    /// Feed an elapsed wall-time delta (seconds) and return how many ticks to run
    pub fn advance_by(&mut self, delta_secs: f64) -> u32 {
        self.accumulator += delta_secs.max(0.0);

        let mut ticks = 0;
        while self.accumulator + STEP_EPSILON >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIXED_DT;
    use proptest::prelude::*;

    #[test]
    fn test_first_call_is_zero_elapsed() {
        let mut clock = FixedStepClock::new(FIXED_DT);
        assert_eq!(clock.advance_to(123_456.0), 0);
        assert_eq!(clock.pending(), 0.0);
    }

    #[test]
    fn test_frame_drop_drains_several_ticks() {
        let mut clock = FixedStepClock::new(FIXED_DT);
        clock.advance_to(0.0);
        // 100 ms stall: five whole ticks, remainder carried
        assert_eq!(clock.advance_to(100.0), 5);
        assert!(clock.pending() > 0.0 && clock.pending() < clock.step());
    }

    #[test]
    fn test_fast_frames_drain_nothing_until_step() {
        let mut clock = FixedStepClock::new(FIXED_DT);
        clock.advance_to(0.0);
        assert_eq!(clock.advance_to(8.0), 0);
        assert_eq!(clock.advance_to(16.0), 0);
        assert_eq!(clock.advance_to(24.0), 1);
    }

    #[test]
    fn test_reset_restarts_elapsed() {
        let mut clock = FixedStepClock::new(FIXED_DT);
        clock.advance_to(0.0);
        clock.advance_to(10.0);
        clock.reset();
        assert_eq!(clock.advance_to(5_000.0), 0);
        assert_eq!(clock.pending(), 0.0);
    }

    #[test]
    #[should_panic(expected = "tick step must be positive")]
    fn test_rejects_zero_step() {
        FixedStepClock::new(0.0);
    }

    #[test]
    fn test_backwards_timestamp_is_ignored() {
        let mut clock = FixedStepClock::new(FIXED_DT);
        clock.advance_to(1_000.0);
        assert_eq!(clock.advance_to(900.0), 0);
    }

    proptest! {
        #[test]
        fn ticks_independent_of_chunking(
            k in 0u32..300,
            weights in proptest::collection::vec(1u32..100, 1..24),
        ) {
            let mut clock = FixedStepClock::new(FIXED_DT);
            let total = k as f64 * clock.step();
            let weight_sum: u32 = weights.iter().sum();

            let mut fed = 0.0;
            let mut ticks = 0;
            for (i, w) in weights.iter().enumerate() {
                let delta = if i + 1 == weights.len() {
                    total - fed
                } else {
                    total * (*w as f64) / (weight_sum as f64)
                };
                fed += delta;
                ticks += clock.advance_by(delta);
            }

            prop_assert_eq!(ticks, k);
        }
    }
}

//! Pipe pairs (the scrolling gated obstacles)

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use crate::recorder::PipeRecord;
use crate::tuning::Tuning;

/// Whether a pair is still on the playfield after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeStatus {
    Active,
    /// Fully past the left edge; the session drops it
    OffScreen,
}

/// A top pipe and a bottom pipe sharing one x, separated by a gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipePair {
    x: f32,
    pub gap: f32,
    pub width: f32,
    /// Bottom edge of the top pipe
    pub top_y: f32,
    /// Top edge of the bottom pipe
    pub bot_y: f32,
    pub top_height: f32,
    pub bot_height: f32,
    /// Scroll speed (px/s)
    pub velocity: f32,
    /// The bird has already scored on this pair
    pub passed: bool,
}

impl PipePair {
    /// New pair at the spawn point with a random gap position
    pub fn spawn<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let span = (tuning.world_height - tuning.pipe_gap).max(0.0);
        let top_y = rng.random::<f32>() * span;
        Self::with_gap_at(tuning, tuning.pipe_start_point, top_y)
    }

    /// Pair at `x` whose gap starts at `top_y`
    pub fn with_gap_at(tuning: &Tuning, x: f32, top_y: f32) -> Self {
        let bot_y = top_y + tuning.pipe_gap;
        Self {
            x,
            gap: tuning.pipe_gap,
            width: tuning.pipe_width,
            top_y,
            bot_y,
            top_height: top_y,
            bot_height: tuning.world_height - bot_y,
            velocity: tuning.pipe_velocity,
            passed: false,
        }
    }

    /// Rebuild a recorded pair verbatim (replay playback)
    pub fn from_record(record: &PipeRecord, tuning: &Tuning) -> Self {
        Self {
            x: record.x,
            gap: record.bot_y - record.top_y,
            width: tuning.pipe_width,
            top_y: record.top_y,
            bot_y: record.bot_y,
            top_height: record.top_y,
            bot_height: tuning.world_height - record.bot_y,
            velocity: tuning.pipe_velocity,
            passed: record.passed,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Move to `x`. A move that leaves the pair fully off the left edge is
    /// not stored and reports [`PipeStatus::OffScreen`].
    pub fn set_x(&mut self, x: f32) -> PipeStatus {
        if x + self.width < 0.0 {
            PipeStatus::OffScreen
        } else {
            self.x = x;
            PipeStatus::Active
        }
    }

    /// Scroll left by one step
    pub fn advance(&mut self, dt: f32) -> PipeStatus {
        self.set_x(self.x - self.velocity * dt)
    }

    pub fn top_hitbox(&self) -> Hitbox {
        Hitbox {
            x: self.x,
            y: 0.0,
            width: self.width,
            height: self.top_height,
        }
    }

    pub fn bot_hitbox(&self) -> Hitbox {
        Hitbox {
            x: self.x,
            y: self.bot_y,
            width: self.width,
            height: self.bot_height,
        }
    }

    pub fn record(&self) -> PipeRecord {
        PipeRecord {
            x: self.x,
            top_y: self.top_y,
            bot_y: self.bot_y,
            passed: self.passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_geometry() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let pair = PipePair::spawn(&tuning, &mut rng);
            assert_eq!(pair.x(), tuning.pipe_start_point);
            assert!(pair.top_y >= 0.0 && pair.top_y < tuning.world_height - tuning.pipe_gap);
            assert!((pair.bot_y - pair.top_y - tuning.pipe_gap).abs() < 1e-3);
            assert!((pair.top_height + pair.gap + pair.bot_height - tuning.world_height).abs() < 1e-3);
            assert!(!pair.passed);
        }
    }

    #[test]
    fn test_set_x_refuses_off_screen_value() {
        let tuning = Tuning::default();
        let mut pair = PipePair::with_gap_at(&tuning, 10.0, 100.0);
        assert_eq!(pair.set_x(-tuning.pipe_width), PipeStatus::Active);
        assert_eq!(pair.x(), -tuning.pipe_width);
        assert_eq!(pair.set_x(-tuning.pipe_width - 0.5), PipeStatus::OffScreen);
        assert_eq!(pair.x(), -tuning.pipe_width);
    }

    #[test]
    fn test_hitboxes() {
        let tuning = Tuning::default();
        let pair = PipePair::with_gap_at(&tuning, 200.0, 150.0);
        let top = pair.top_hitbox();
        assert_eq!((top.x, top.y, top.width, top.height), (200.0, 0.0, 75.0, 150.0));
        let bot = pair.bot_hitbox();
        assert_eq!((bot.y, bot.height), (350.0, 350.0));
    }

    #[test]
    fn test_record_round_trip() {
        let tuning = Tuning::default();
        let mut pair = PipePair::with_gap_at(&tuning, 321.5, 42.25);
        pair.passed = true;
        let rebuilt = PipePair::from_record(&pair.record(), &tuning);
        assert_eq!(rebuilt.x(), 321.5);
        assert_eq!(rebuilt.top_height, 42.25);
        assert_eq!(rebuilt.bot_height, pair.bot_height);
        assert!(rebuilt.passed);
    }
}

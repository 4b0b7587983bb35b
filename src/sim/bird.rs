//! The player's bird
//!
//! Vertical position is only written through [`Bird::apply_y`], which reports
//! whether the write left the playfield so the caller can end the episode.

use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use crate::consts::{FLAP_COOLDOWN_TICKS, FLAP_IMPULSE};
use crate::tuning::Tuning;

/// Which wing sprite is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WingPose {
    #[default]
    Up,
    Down,
}

impl WingPose {
    pub fn toggled(self) -> Self {
        match self {
            WingPose::Up => WingPose::Down,
            WingPose::Down => WingPose::Up,
        }
    }
}

/// How a y write is constrained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YBounds {
    /// Live play: stored value is clamped to `[0, max]`
    Clamped { max: f32 },
    /// Replay: stored verbatim, even off-screen
    Verbatim,
}

/// Outcome of a y write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YUpdate {
    /// Value actually stored
    pub value: f32,
    /// The requested (pre-clamp) value was outside the bounds
    pub out_of_bounds: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Fixed horizontal position
    pub x: f32,
    y: f32,
    /// Vertical velocity (px/s, positive is down)
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
    /// Ticks until another flap is accepted
    pub flap_cooldown: u32,
    /// A flap was applied during the current tick (logged as the action)
    pub is_flapping: bool,
    pub wing: WingPose,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.bird_x(),
            y: tuning.bird_spawn_y(),
            velocity: 0.0,
            width: tuning.bird_width,
            height: tuning.bird_height,
            flap_cooldown: 0,
            is_flapping: false,
            wing: WingPose::Up,
        }
    }

    /// Back to the spawn position at rest
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Write the vertical position.
    ///
    /// In [`YBounds::Clamped`] mode `out_of_bounds` is decided from the raw
    /// input while the stored value is clamped, so the bird rests on the
    /// boundary for the tick that ends the episode.
    pub fn apply_y(&mut self, value: f32, bounds: YBounds) -> YUpdate {
        match bounds {
            YBounds::Clamped { max } => {
                self.y = value.max(0.0).min(max);
                YUpdate {
                    value: self.y,
                    out_of_bounds: value < 0.0 || value > max,
                }
            }
            YBounds::Verbatim => {
                self.y = value;
                YUpdate {
                    value,
                    out_of_bounds: false,
                }
            }
        }
    }

    /// Advance one step: cooldown, gravity, then position
    pub fn update(&mut self, dt: f32, gravity: f32, bounds: YBounds) -> YUpdate {
        self.flap_cooldown = self.flap_cooldown.saturating_sub(1);
        self.velocity += gravity * dt;
        self.apply_y(self.y + self.velocity * dt, bounds)
    }

    pub fn can_flap(&self) -> bool {
        self.flap_cooldown == 0
    }

    /// Set the upward impulse. Callers check [`Bird::can_flap`] first and
    /// then call [`Bird::arm_cooldown`].
    pub fn flap(&mut self) {
        self.velocity = FLAP_IMPULSE;
        self.is_flapping = true;
    }

    pub fn arm_cooldown(&mut self) {
        self.flap_cooldown = FLAP_COOLDOWN_TICKS;
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

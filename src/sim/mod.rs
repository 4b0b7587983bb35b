//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pipes oldest first)
//! - No rendering or platform dependencies

pub mod bird;
pub mod clock;
pub mod collision;
pub mod pipes;
pub mod state;
pub mod tick;

pub use bird::{Bird, WingPose, YBounds, YUpdate};
pub use clock::FixedStepClock;
pub use collision::{Hitbox, are_colliding};
pub use pipes::{PipePair, PipeStatus};
pub use state::{GameState, Mode};
pub use tick::{TickInput, tick};

//! Scripted player used for headless recordings

use crate::consts::{FIXED_DT, PIPE_LIP_HEIGHT};
use crate::sim::{GameState, TickInput};

/// Agent tag written into recordings made by [`Autopilot`]
pub const BOT_AGENT: &str = "bot";

/// Keeps the bird just above the lower edge of the next gap.
///
/// The floor it guards is the bottom pipe's lip, since that is where the
/// collision test starts.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Distance kept between the bird's underside and the floor
    pub clearance: f32,
    /// Floor used while no pipe is ahead, as a fraction of world height
    pub idle_floor_ratio: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            clearance: 10.0,
            idle_floor_ratio: 0.6,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> &'static str {
        BOT_AGENT
    }

    /// Lowest y the bird's underside may reach right now
    fn floor(&self, state: &GameState) -> f32 {
        let bird_x = state.bird.x;
        state
            .pipes
            .iter()
            .find(|pair| pair.x() + pair.width >= bird_x)
            .map(|pair| pair.bot_y - PIPE_LIP_HEIGHT)
            .unwrap_or(state.tuning.world_height * self.idle_floor_ratio)
    }

    /// Input for the next tick
    pub fn decide(&self, state: &GameState) -> TickInput {
        let bird = &state.bird;
        // Where the underside ends up after one more step without flapping
        let velocity = bird.velocity + state.tuning.gravity * FIXED_DT;
        let next_bottom = bird.y() + velocity * FIXED_DT + bird.height;

        TickInput {
            flap: next_bottom > self.floor(state) - self.clearance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PipePair, tick};
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default(), 99);
        state.start_episode();
        state
    }

    #[test]
    fn test_flaps_only_near_floor() {
        let autopilot = Autopilot::new();
        let mut state = running();
        // Spawn height is well above the idle floor (420)
        assert!(!autopilot.decide(&state).flap);

        let bounds = state.y_bounds();
        state.bird.apply_y(375.0, bounds);
        assert!(autopilot.decide(&state).flap);
    }

    #[test]
    fn test_targets_next_gap() {
        let autopilot = Autopilot::new();
        let mut state = running();
        let tuning = state.tuning.clone();
        state.pipes.push(PipePair::with_gap_at(&tuning, 300.0, 20.0));
        // Floor is now 20 + 200 - 30 = 190
        let bounds = state.y_bounds();
        state.bird.apply_y(160.0, bounds);
        assert!(autopilot.decide(&state).flap);
        state.bird.apply_y(100.0, bounds);
        assert!(!autopilot.decide(&state).flap);
    }

    #[test]
    fn test_scores_through_first_pipe() {
        let autopilot = Autopilot::new();
        let mut state = running();
        for _ in 0..600 {
            let input = autopilot.decide(&state);
            tick(&mut state, &input, FIXED_DT);
            if state.game_over || state.score > 0 {
                break;
            }
        }
        assert!(!state.game_over);
        assert_eq!(state.score, 1);
    }
}

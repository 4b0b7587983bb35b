//! Fixed timestep simulation tick
//!
//! Advances a live session by exactly one step and captures the snapshot
//! for the frame log.

use log::{debug, info};

use super::collision::are_colliding;
use super::pipes::PipeStatus;
use super::state::{GameState, Mode};
use crate::consts::FLAPPING_INTERVAL;
use crate::recorder::FrameSnapshot;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap requested (click/tap/space); dropped if the cooldown is running
    pub flap: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Returns the post-tick snapshot, or `None` when the step body was skipped
/// because the episode is over (or a replay owns the session). The tick that
/// ends an episode still returns its snapshot, flagged `game_over`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<FrameSnapshot> {
    if state.game_over || state.mode == Mode::Imported {
        return None;
    }

    if input.flap && state.bird.can_flap() {
        state.bird.flap();
        state.bird.arm_cooldown();
    }

    let collided = step_entities(state, dt);

    // Sprite and spawn timers run on simulated time only
    state.flapping_elapsed += dt;
    if state.flapping_elapsed >= FLAPPING_INTERVAL {
        state.bird.wing = state.bird.wing.toggled();
        state.flapping_elapsed = 0.0;
    }

    state.pipes_elapsed += dt;
    if !collided && state.pipes_elapsed >= state.tuning.pipes_interval {
        state.spawn_pipe_pair();
        state.pipes_elapsed = 0.0;
    }

    if state.game_over {
        info!(
            "Episode {} over at frame {} with score {}",
            state.episode_id, state.frame_id, state.score
        );
    }

    let snapshot = state.snapshot();
    state.bird.is_flapping = false;
    state.frame_id += 1;
    Some(snapshot)
}

/// Collisions, scoring and movement. Returns true if the bird hit a pipe,
/// in which case nothing after the hit moved this tick.
fn step_entities(state: &mut GameState, dt: f32) -> bool {
    let bird_box = state.bird.hitbox();
    let bird_x = state.bird.x;

    let mut i = 0;
    while i < state.pipes.len() {
        let pair = &mut state.pipes[i];

        if are_colliding(&bird_box, &pair.top_hitbox())
            || are_colliding(&bird_box, &pair.bot_hitbox())
        {
            state.game_over = true;
            return true;
        }

        if !pair.passed && bird_x > pair.x() {
            pair.passed = true;
            state.score += 1;
        }

        match pair.advance(dt) {
            PipeStatus::Active => i += 1,
            PipeStatus::OffScreen => {
                debug!("Culled pipe pair at frame {}", state.frame_id);
                state.pipes.remove(i);
            }
        }
    }

    let bounds = state.y_bounds();
    let update = state.bird.update(dt, state.tuning.gravity, bounds);
    if update.out_of_bounds {
        state.game_over = true;
    }

    false
}

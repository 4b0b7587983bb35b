//! Session state
//!
//! Everything one episode (live or replayed) needs lives here. The RNG is
//! seeded once per session so equal seeds give equal pipe layouts.

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bird::{Bird, YBounds};
use super::pipes::PipePair;
use crate::consts::NOT_STARTED_EPISODE;
use crate::recorder::FrameSnapshot;
use crate::tuning::Tuning;

/// Which state machine drives the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fixed-step simulation with player input
    #[default]
    Live,
    /// Recorded snapshots are played back
    Imported,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Constants for this session
    pub tuning: Tuning,
    pub mode: Mode,
    pub game_over: bool,
    /// Incremented on every episode start; `NOT_STARTED_EPISODE` before
    pub episode_id: i64,
    /// Index of the next snapshot within the episode
    pub frame_id: u64,
    pub score: u32,
    pub bird: Bird,
    /// Active pipe pairs, oldest first
    pub pipes: Vec<PipePair>,
    /// Simulated seconds since the last spawn
    pub pipes_elapsed: f32,
    /// Simulated seconds since the last wing swap
    pub flapping_elapsed: f32,
    rng: Pcg32,
}

impl GameState {
    /// New session, waiting for the first episode
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            bird: Bird::new(&tuning),
            tuning,
            mode: Mode::Live,
            game_over: true,
            episode_id: NOT_STARTED_EPISODE,
            frame_id: 0,
            score: 0,
            pipes: Vec::new(),
            pipes_elapsed: 0.0,
            flapping_elapsed: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear entities and counters and bump the episode id. Leaves
    /// `game_over` alone.
    pub fn reset(&mut self) {
        self.episode_id += 1;
        self.frame_id = 0;
        self.score = 0;
        self.pipes.clear();
        self.pipes_elapsed = 0.0;
        self.flapping_elapsed = 0.0;
        self.bird.reset(&self.tuning);
    }

    /// Reset and start a live episode
    pub fn start_episode(&mut self) {
        self.reset();
        self.mode = Mode::Live;
        self.game_over = false;
        info!("Episode {} started", self.episode_id);
    }

    /// Swap in a new constants bundle and re-derive the bird's placement
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
        self.bird.x = self.tuning.bird_x();
        self.bird.width = self.tuning.bird_width;
        self.bird.height = self.tuning.bird_height;
    }

    /// Y constraint for the current mode
    pub fn y_bounds(&self) -> YBounds {
        match self.mode {
            Mode::Live => YBounds::Clamped {
                max: self.tuning.max_bird_y(),
            },
            Mode::Imported => YBounds::Verbatim,
        }
    }

    /// Add a pipe pair at the spawn point
    pub fn spawn_pipe_pair(&mut self) {
        let pair = PipePair::spawn(&self.tuning, &mut self.rng);
        debug!(
            "Spawned pipe pair at frame {} (gap {:.1}..{:.1})",
            self.frame_id, pair.top_y, pair.bot_y
        );
        self.pipes.push(pair);
    }

    /// Capture the current observable state
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            episode_id: self.episode_id,
            frame_id: self.frame_id,
            bird_y: self.bird.y(),
            bird_velocity: self.bird.velocity,
            action: self.bird.is_flapping,
            pipes: self.pipes.iter().map(PipePair::record).collect(),
            score: self.score,
            game_over: self.game_over,
        }
    }

    /// The episode is running and accepting input
    pub fn is_live_and_running(&self) -> bool {
        self.mode == Mode::Live && !self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_waits_for_start() {
        let state = GameState::new(Tuning::default(), 1);
        assert!(state.game_over);
        assert_eq!(state.mode, Mode::Live);
        assert_eq!(state.episode_id, NOT_STARTED_EPISODE);
    }

    #[test]
    fn test_start_episode_increments_id() {
        let mut state = GameState::new(Tuning::default(), 1);
        state.start_episode();
        assert_eq!(state.episode_id, 0);
        assert!(!state.game_over);
        state.score = 4;
        state.frame_id = 99;
        state.spawn_pipe_pair();

        state.start_episode();
        assert_eq!(state.episode_id, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_id, 0);
        assert!(state.pipes.is_empty());
    }

    #[test]
    fn test_apply_tuning_moves_bird() {
        let mut state = GameState::new(Tuning::default(), 1);
        let tuning = Tuning {
            world_width: 1000.0,
            bird_x_ratio: 0.5,
            bird_width: 30.0,
            ..Tuning::default()
        };
        state.apply_tuning(tuning);
        assert_eq!(state.bird.x, 500.0);
        assert_eq!(state.bird.width, 30.0);
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = GameState::new(Tuning::default(), 42);
        let mut b = GameState::new(Tuning::default(), 42);
        for _ in 0..5 {
            a.spawn_pipe_pair();
            b.spawn_pipe_pair();
        }
        let ya: Vec<f32> = a.pipes.iter().map(|p| p.top_y).collect();
        let yb: Vec<f32> = b.pipes.iter().map(|p| p.top_y).collect();
        assert_eq!(ya, yb);
    }

    #[test]
    fn test_y_bounds_follow_mode() {
        let mut state = GameState::new(Tuning::default(), 1);
        assert!(matches!(state.y_bounds(), YBounds::Clamped { .. }));
        state.mode = Mode::Imported;
        assert_eq!(state.y_bounds(), YBounds::Verbatim);
    }
}

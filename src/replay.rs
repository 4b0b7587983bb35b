//! Replay playback
//!
//! A [`ReplayPlayer`] validates an archive without touching the session,
//! then configures the session from the recorded constants and applies one
//! snapshot per gate firing. The orchestrator owns at most one player, so
//! replacing it cancels the old playback.

use log::{debug, info};

use crate::consts::{NOT_STARTED_EPISODE, REPLAY_INTERVAL_MS};
use crate::error::{ImportWarning, ReplayError};
use crate::persistence::{self, Archive, ImportLimits, ReplayFrame};
use crate::sim::{GameState, Mode, PipePair};
use crate::tuning::Tuning;

/// Slack for the gate's accumulated time, as in the simulation clock
const GATE_EPSILON_MS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayPhase {
    #[default]
    Idle,
    Validating,
    Configured,
    Playing,
    Finished,
    Failed,
}

/// Wall-clock gate releasing one snapshot per interval
#[derive(Debug, Clone)]
pub struct ReplayGate {
    interval_ms: f64,
    pending_ms: f64,
    last: Option<f64>,
}

impl Default for ReplayGate {
    fn default() -> Self {
        Self::new(REPLAY_INTERVAL_MS)
    }
}

impl ReplayGate {
    /// Panics unless `interval_ms` is positive and finite
    pub fn new(interval_ms: f64) -> Self {
        assert!(
            interval_ms.is_finite() && interval_ms > 0.0,
            "replay interval must be positive, got {interval_ms}"
        );
        Self {
            interval_ms,
            pending_ms: 0.0,
            last: None,
        }
    }

    /// Feed a host timestamp (ms); returns how many snapshots to apply.
    /// The first poll only arms the gate.
    pub fn poll(&mut self, timestamp_ms: f64) -> u32 {
        if let Some(last) = self.last {
            self.pending_ms += (timestamp_ms - last).max(0.0);
        }
        self.last = Some(timestamp_ms);

        let mut fired = 0;
        while self.pending_ms + GATE_EPSILON_MS >= self.interval_ms {
            self.pending_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }
}

/// Outcome of one host frame of playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    /// Not playing, or the gate did not fire
    Waiting,
    /// This many snapshots were applied
    Applied(u32),
    /// The snapshots ran out; the session is back to an idle live state
    Finished,
}

#[derive(Debug)]
pub struct ReplayPlayer {
    id: u64,
    phase: ReplayPhase,
    tuning: Option<Tuning>,
    frames: Vec<ReplayFrame>,
    cursor: usize,
    gate: ReplayGate,
    warnings: Vec<ImportWarning>,
}

impl ReplayPlayer {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            phase: ReplayPhase::Idle,
            tuning: None,
            frames: Vec::new(),
            cursor: 0,
            gate: ReplayGate::default(),
            warnings: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn warnings(&self) -> &[ImportWarning] {
        &self.warnings
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Snapshots not yet applied
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.cursor
    }

    /// Validate and decode `archive`. The session is not touched; on
    /// failure the player ends in [`ReplayPhase::Failed`].
    pub fn load(&mut self, archive: &dyn Archive, base: &Tuning) -> Result<(), ReplayError> {
        self.load_with_limits(archive, base, &ImportLimits::default())
    }

    pub fn load_with_limits(
        &mut self,
        archive: &dyn Archive,
        base: &Tuning,
        limits: &ImportLimits,
    ) -> Result<(), ReplayError> {
        self.phase = ReplayPhase::Validating;
        match persistence::read_replay_with_limits(archive, base, limits) {
            Ok(data) => {
                self.tuning = Some(data.tuning);
                self.frames = data.frames;
                self.warnings = data.warnings;
                self.cursor = 0;
                Ok(())
            }
            Err(e) => {
                self.phase = ReplayPhase::Failed;
                Err(e)
            }
        }
    }

    /// Reset the session for a new episode under the recorded constants
    pub fn configure(&mut self, state: &mut GameState) {
        if self.phase != ReplayPhase::Validating {
            return;
        }
        let Some(tuning) = self.tuning.take() else {
            return;
        };
        state.reset();
        state.apply_tuning(tuning);
        self.phase = ReplayPhase::Configured;
    }

    /// Hand the session over to playback
    pub fn start(&mut self, state: &mut GameState) {
        if self.phase != ReplayPhase::Configured {
            return;
        }
        state.mode = Mode::Imported;
        state.game_over = false;
        self.phase = ReplayPhase::Playing;
        info!(
            "Replay {} playing {} frames ({})",
            self.id,
            self.frames.len(),
            state.tuning.agent_type
        );
    }

    /// Advance playback for one host frame
    pub fn on_frame(&mut self, timestamp_ms: f64, state: &mut GameState) -> ReplayStep {
        if self.phase != ReplayPhase::Playing {
            return ReplayStep::Waiting;
        }

        let fired = self.gate.poll(timestamp_ms);
        for _ in 0..fired {
            let Some(frame) = self.frames.get(self.cursor) else {
                self.finish(state);
                return ReplayStep::Finished;
            };
            apply_frame(frame, state);
            self.cursor += 1;
        }

        if fired == 0 {
            ReplayStep::Waiting
        } else {
            debug!("Replay {} at frame {}/{}", self.id, self.cursor, self.frames.len());
            ReplayStep::Applied(fired)
        }
    }

    fn finish(&mut self, state: &mut GameState) {
        state.episode_id = NOT_STARTED_EPISODE;
        state.mode = Mode::Live;
        state.game_over = true;
        self.phase = ReplayPhase::Finished;
        info!("Replay {} finished after {} frames", self.id, self.cursor);
    }
}

/// Overwrite the session with one recorded snapshot. Missing fields keep
/// their current value.
fn apply_frame(frame: &ReplayFrame, state: &mut GameState) {
    if let Some(y) = frame.bird_y {
        let bounds = state.y_bounds();
        state.bird.apply_y(y, bounds);
    }
    if let Some(velocity) = frame.bird_velocity {
        state.bird.velocity = velocity;
    }
    if let Some(score) = frame.score {
        state.score = score;
    }
    if let Some(frame_id) = frame.frame_id {
        state.frame_id = frame_id;
    }
    if let Some(action) = frame.action {
        state.bird.is_flapping = action;
    }
    state.pipes = frame
        .pipes
        .iter()
        .map(|record| PipePair::from_record(record, &state.tuning))
        .collect();
}

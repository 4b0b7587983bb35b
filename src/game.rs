//! Session orchestrator
//!
//! Owns the simulation state, the fixed-step clock, the frame log and the
//! active replay, and talks to the outside world only through the injected
//! [`Renderer`] and [`Host`].

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::consts::{FIXED_DT, NOT_STARTED_EPISODE};
use crate::error::{ImportReport, ReplayError};
use crate::persistence::{self, Archive, ImportLimits};
use crate::platform::Host;
use crate::recorder::FrameLog;
use crate::renderer::{Renderer, render_scene};
use crate::replay::{ReplayPlayer, ReplayStep};
use crate::sim::{FixedStepClock, GameState, Mode, TickInput, tick};
use crate::tuning::Tuning;

const IMPORT_REFUSED: &str = "Sorry, can't import game right now.";
const EXPORT_REFUSED: &str = "Sorry, can't export the game state right now.";

pub struct Game<R: Renderer, H: Host> {
    state: GameState,
    clock: FixedStepClock,
    /// Input for the next tick
    input: TickInput,
    log: FrameLog,
    /// At most one playback; replacing it cancels the old one
    replay: Option<ReplayPlayer>,
    next_replay_id: u64,
    limits: ImportLimits,
    renderer: R,
    host: H,
}

impl<R: Renderer, H: Host> Game<R, H> {
    pub fn new(tuning: Tuning, seed: u64, renderer: R, host: H) -> Self {
        Self {
            state: GameState::new(tuning, seed),
            clock: FixedStepClock::new(FIXED_DT),
            input: TickInput::default(),
            log: FrameLog::new(),
            replay: None,
            next_replay_id: 1,
            limits: ImportLimits::default(),
            renderer,
            host,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn log(&self) -> &FrameLog {
        &self.log
    }

    pub fn replay(&self) -> Option<&ReplayPlayer> {
        self.replay.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn set_import_limits(&mut self, limits: ImportLimits) {
        self.limits = limits;
    }

    /// One host frame: advance the live simulation or the replay, then draw
    pub fn frame(&mut self, timestamp_ms: f64) {
        match self.state.mode {
            Mode::Live => {
                let ticks = self.clock.advance_to(timestamp_ms);
                for _ in 0..ticks {
                    self.step();
                }
            }
            Mode::Imported => self.replay_frame(timestamp_ms),
        }
        render_scene(&self.state, &mut self.renderer);
    }

    fn step(&mut self) {
        let input = std::mem::take(&mut self.input);
        if let Some(snapshot) = tick(&mut self.state, &input, FIXED_DT) {
            self.log.push(snapshot, &self.state.tuning);
        }
    }

    fn replay_frame(&mut self, timestamp_ms: f64) {
        let Some(player) = self.replay.as_mut() else {
            return;
        };
        if player.on_frame(timestamp_ms, &mut self.state) == ReplayStep::Finished {
            // Live ticks resume from this frame on, not from the last live one
            self.clock.reset();
            self.host.clear_file_selection();
        }
    }

    /// Click/tap/space. Starts an episode when over, otherwise queues a flap
    /// for the next tick. Ignored while a replay plays.
    pub fn trigger(&mut self) {
        if self.state.mode == Mode::Imported {
            debug!("Input ignored during replay");
            return;
        }
        if self.state.game_over {
            self.state.start_episode();
        } else {
            self.input.flap = true;
        }
    }

    /// Write the frame log into `archive`, under the constants it was
    /// recorded with, and start a fresh log. Returns the download name for
    /// the archive.
    pub fn export(
        &mut self,
        archive: &mut dyn Archive,
        captured_at: NaiveDateTime,
    ) -> Result<String, ReplayError> {
        if self.log.is_empty() || self.state.is_live_and_running() {
            let err = if self.log.is_empty() {
                ReplayError::EmptyLog
            } else {
                ReplayError::EpisodeRunning
            };
            warn!("Export refused: {err}");
            self.host.alert(EXPORT_REFUSED);
            return Err(err);
        }

        let tuning = self.log.tuning().unwrap_or(&self.state.tuning);
        if let Err(e) = persistence::write_replay(archive, self.log.frames(), tuning) {
            warn!("Export failed: {e}");
            self.host.alert(&format!("Failed to export replay: {e}"));
            return Err(e);
        }

        let name = persistence::export_file_name(captured_at);
        info!(
            "Exported {} frames from {} episode(s) as {name}",
            self.log.len(),
            self.log.episode_count()
        );
        self.state.episode_id = NOT_STARTED_EPISODE;
        self.log.clear();
        Ok(name)
    }

    /// Validate `archive` and start playing it. Any playback in flight is
    /// cancelled first; on failure the session is left idle.
    pub fn import(&mut self, archive: &dyn Archive) -> Result<ImportReport, ReplayError> {
        if self.state.is_live_and_running() {
            let err = ReplayError::EpisodeRunning;
            warn!("Import refused: {err}");
            self.host.alert(IMPORT_REFUSED);
            return Err(err);
        }

        if let Some(old) = self.replay.take() {
            info!("Replay {} cancelled", old.id());
        }
        self.state.mode = Mode::Live;
        self.state.game_over = true;
        // The clock was not fed during playback
        self.clock.reset();

        let id = self.next_replay_id;
        self.next_replay_id += 1;

        let mut player = ReplayPlayer::new(id);
        if let Err(e) = player.load_with_limits(archive, &self.state.tuning, &self.limits) {
            warn!("Import of replay {id} failed: {e}");
            self.host.alert(&format!("Failed to import replay: {e}"));
            return Err(e);
        }

        if !self.log.is_empty() {
            debug!("Keeping {} unexported frames across replay {id}", self.log.len());
        }
        self.input = TickInput::default();
        player.configure(&mut self.state);
        player.start(&mut self.state);

        let report = ImportReport {
            replay_id: id,
            frames: player.frame_count(),
            warnings: player.warnings().to_vec(),
        };
        self.replay = Some(player);
        Ok(report)
    }
}

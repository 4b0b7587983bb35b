//! Flappy Replay - a Flappy Bird game with frame-accurate replays
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird, pipes, collisions, fixed-step clock)
//! - `recorder`: Per-tick frame log
//! - `persistence`: Replay archive codec (frames + metadata tables)
//! - `replay`: Replay player state machine
//! - `game`: Orchestrator wiring sim, replay and collaborators together
//! - `renderer`: Render collaborator and scene description
//! - `platform`: Host collaborator (alerts, file selection)
//! - `tuning`: Simulation constants bundle
//! - `agent`: Autopilot used for headless recordings

pub mod agent;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod recorder;
pub mod renderer;
pub mod replay;
pub mod sim;
pub mod tuning;

pub use agent::Autopilot;
pub use error::{ImportReport, ImportWarning, ReplayError};
pub use game::Game;
pub use recorder::{FrameLog, FrameSnapshot, PipeRecord};
pub use replay::{ReplayPhase, ReplayPlayer};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (~60 Hz)
    pub const FIXED_DT: f32 = 0.0167;

    /// Upward velocity set by a flap (px/s, negative is up)
    pub const FLAP_IMPULSE: f32 = -300.0;
    /// Ticks before another flap is accepted
    pub const FLAP_COOLDOWN_TICKS: u32 = 9;
    /// Seconds between wing sprite swaps
    pub const FLAPPING_INTERVAL: f32 = 0.5;

    /// Height of the pipe lip; also the forgiving hit margin above each pipe box
    pub const PIPE_LIP_HEIGHT: f32 = 30.0;
    /// Lip overhang on each side of the pipe body
    pub const PIPE_LIP_OVERHANG: f32 = 5.0;

    /// Wall-clock interval between replayed snapshots (ms)
    pub const REPLAY_INTERVAL_MS: f64 = 16.67;
    /// Byte ceiling for an imported frames table (20 MiB)
    pub const MAX_FRAMES_BYTES: usize = 20 * 1024 * 1024;
    /// Row ceiling for an imported frames table
    pub const MAX_REPLAY_FRAMES: usize = 100_000;

    /// Episode id before the first episode (and after an export or replay)
    pub const NOT_STARTED_EPISODE: i64 = -1;

    /// Seed used when the host does not provide one
    pub const DEFAULT_SEED: u64 = 0x5eed_f1a9;
}

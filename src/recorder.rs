//! Frame log recorder
//!
//! One immutable snapshot per live simulation tick, appended after that
//! tick's updates. The log spans episodes (rows carry their episode id) and
//! is only cleared by an explicit reset. It also remembers the constants it
//! was recorded under, since an import may swap the session's constants
//! before the log is exported.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// One pipe pair as captured in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeRecord {
    pub x: f32,
    pub top_y: f32,
    pub bot_y: f32,
    pub passed: bool,
}

/// Full observable state after one simulation tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub episode_id: i64,
    pub frame_id: u64,
    pub bird_y: f32,
    pub bird_velocity: f32,
    /// A flap was applied this tick
    pub action: bool,
    pub pipes: Vec<PipeRecord>,
    pub score: u32,
    pub game_over: bool,
}

impl FrameSnapshot {
    pub fn pipe_pair_count(&self) -> usize {
        self.pipes.len()
    }
}

/// Append-only list of snapshots
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Vec<FrameSnapshot>,
    /// Constants in effect when the first snapshot was taken
    tuning: Option<Tuning>,
    mixed_tuning: bool,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot taken under `tuning`
    pub fn push(&mut self, snapshot: FrameSnapshot, tuning: &Tuning) {
        match &self.tuning {
            None => self.tuning = Some(tuning.clone()),
            Some(first) if first != tuning && !self.mixed_tuning => {
                warn!("Frame log now spans two sets of constants; exports keep the first");
                self.mixed_tuning = true;
            }
            Some(_) => {}
        }
        self.frames.push(snapshot);
    }

    /// Constants the log was recorded under, `None` while empty
    pub fn tuning(&self) -> Option<&Tuning> {
        self.tuning.as_ref()
    }

    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of distinct episodes in the log
    pub fn episode_count(&self) -> usize {
        let mut ids: Vec<i64> = self.frames.iter().map(|f| f.episode_id).collect();
        ids.dedup();
        ids.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.tuning = None;
        self.mixed_tuning = false;
    }
}

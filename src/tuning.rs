//! Simulation constants
//!
//! One immutable bundle per session. Live sessions use the compiled-in
//! defaults (or a JSON override loaded by the native runner); replays
//! overwrite it wholesale from the archive's metadata row.

use serde::{Deserialize, Serialize};

/// Agent tag written when a human drives the bird
pub const HUMAN_AGENT: &str = "human";

/// World, bird and pipe constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Who produced the recording ("human", "bot", ...)
    pub agent_type: String,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Bird ===
    /// Horizontal placement as a fraction of the world width
    pub bird_x_ratio: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,

    // === Pipes ===
    /// World x where new pipe pairs appear
    pub pipe_start_point: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Scroll speed (px/s)
    pub pipe_velocity: f32,
    /// Seconds between spawns
    pub pipes_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            agent_type: HUMAN_AGENT.to_string(),

            world_width: 500.0,
            world_height: 700.0,

            bird_x_ratio: 0.3,
            bird_width: 50.0,
            bird_height: 40.0,
            gravity: 600.0,

            pipe_start_point: 500.0,
            pipe_gap: 200.0,
            pipe_width: 75.0,
            pipe_velocity: 100.0,
            pipes_interval: 3.0,
        }
    }
}

impl Tuning {
    /// Default constants for a world of the given size
    pub fn with_world(width: f32, height: f32) -> Self {
        Self {
            world_width: width,
            world_height: height,
            ..Self::default()
        }
    }

    /// Fixed horizontal position of the bird
    pub fn bird_x(&self) -> f32 {
        self.world_width * self.bird_x_ratio
    }

    /// Vertical position the bird starts each episode at
    pub fn bird_spawn_y(&self) -> f32 {
        (self.world_height - self.bird_height) / 2.0
    }

    /// Largest y the bird may occupy in a live episode
    pub fn max_bird_y(&self) -> f32 {
        self.world_height - self.bird_height
    }

    /// Parse an override bundle; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

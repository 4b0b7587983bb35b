//! Collision detection between the bird and pipe boxes
//!
//! Plain axis-aligned boxes, except that every pipe box counts as hit from
//! `PIPE_LIP_HEIGHT` px above its top edge. Only the top edge gets the
//! margin: for the bottom pipe that is the lip facing the gap, for the top
//! pipe it lies off-screen. Keep it one-sided; it defines the game's feel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PIPE_LIP_HEIGHT;

/// Axis-aligned box in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Whether the bird box touches a pipe box (lip margin included)
#[inline]
pub fn are_colliding(bird: &Hitbox, pipe: &Hitbox) -> bool {
    bird.x < pipe.x + pipe.width
        && bird.x + bird.width > pipe.x
        && bird.y < pipe.y + pipe.height
        && bird.y + bird.height > pipe.y - PIPE_LIP_HEIGHT
}

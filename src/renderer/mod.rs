//! Rendering collaborator
//!
//! The game never draws directly; it describes each frame through the
//! [`Renderer`] trait. [`DrawList`] records the calls for headless runs and
//! tests.

pub mod scene;

use glam::Vec2;

pub use scene::render_scene;

/// RGBA, each channel in 0..=1
pub type Color = [f32; 4];

pub const PIPE_BODY: Color = [0.0, 0.5, 0.0, 1.0];
pub const PIPE_LIP: Color = [0.0, 0.39, 0.0, 1.0];
pub const SCORE_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
pub const PROMPT_TEXT: Color = [1.0, 0.65, 0.0, 1.0];

/// Axis-aligned rectangle in world pixels (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    pub fill: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    BirdWingUp,
    BirdWingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

/// Drawing surface supplied by the host
pub trait Renderer {
    fn clear(&mut self, region: Rect);
    fn draw_rect(&mut self, rect: Rect, style: RectStyle);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle);
}

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Rect(Rect, RectStyle),
    Sprite(Sprite, Rect),
    Text(String, Vec2, TextStyle),
}

/// Renderer that keeps the last frame's commands
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames drawn (counted by `clear` calls)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(text, ..) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn clear(&mut self, region: Rect) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear(region));
    }

    fn draw_rect(&mut self, rect: Rect, style: RectStyle) {
        self.commands.push(DrawCommand::Rect(rect, style));
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCommand::Sprite(sprite, rect));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text(text.to_string(), pos, style));
    }
}

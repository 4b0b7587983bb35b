//! Scene description for one host frame

use glam::Vec2;

use super::{
    PIPE_BODY, PIPE_LIP, PROMPT_TEXT, Rect, RectStyle, Renderer, SCORE_TEXT, Sprite, TextAlign,
    TextStyle,
};
use crate::consts::{PIPE_LIP_HEIGHT, PIPE_LIP_OVERHANG};
use crate::sim::{GameState, Mode, PipePair, WingPose};

const FONT_SIZE: f32 = 25.0;

pub const START_PROMPT: &str = "Click anywhere to start!";

/// Pipe body plus a wider lip whose lower edge sits at `lip_bottom`
fn pipe(renderer: &mut impl Renderer, body: Rect, x: f32, width: f32, lip_bottom: f32) {
    renderer.draw_rect(body, RectStyle { fill: PIPE_BODY });
    renderer.draw_rect(
        Rect::new(
            x - PIPE_LIP_OVERHANG,
            lip_bottom - PIPE_LIP_HEIGHT,
            width + 2.0 * PIPE_LIP_OVERHANG,
            PIPE_LIP_HEIGHT,
        ),
        RectStyle { fill: PIPE_LIP },
    );
}

fn pipe_pair(renderer: &mut impl Renderer, pair: &PipePair) {
    let x = pair.x();
    pipe(
        renderer,
        Rect::new(x, 0.0, pair.width, pair.top_height),
        x,
        pair.width,
        pair.top_y,
    );
    pipe(
        renderer,
        Rect::new(x, pair.bot_y, pair.width, pair.bot_height),
        x,
        pair.width,
        pair.bot_y,
    );
}

/// Draw the whole scene: bird, pipes, score and the start prompt
pub fn render_scene(state: &GameState, renderer: &mut impl Renderer) {
    let width = state.tuning.world_width;
    let height = state.tuning.world_height;
    renderer.clear(Rect::new(0.0, 0.0, width, height));

    let bird = &state.bird;
    let sprite = match bird.wing {
        WingPose::Up => Sprite::BirdWingUp,
        WingPose::Down => Sprite::BirdWingDown,
    };
    renderer.draw_sprite(sprite, Rect::new(bird.x, bird.y(), bird.width, bird.height));

    for pair in &state.pipes {
        pipe_pair(renderer, pair);
    }

    renderer.draw_text(
        &state.score.to_string(),
        Vec2::new(width / 2.0, height / 5.0),
        TextStyle {
            size: FONT_SIZE,
            color: SCORE_TEXT,
            align: TextAlign::Center,
        },
    );

    if state.game_over && state.mode != Mode::Imported {
        renderer.draw_text(
            START_PROMPT,
            Vec2::new(width / 2.0, height / 2.0),
            TextStyle {
                size: FONT_SIZE,
                color: PROMPT_TEXT,
                align: TextAlign::Center,
            },
        );
    }
}

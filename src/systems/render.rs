//! Frame drawing.
//!
//! The renderer only reads a [`Frame`] snapshot and the [`TextureStore`];
//! it never touches the simulation world. Layers, back to front:
//! background, pipes, ground, phase message, score, birds.
use raylib::prelude::*;

use crate::resources::gamestate::GameStates;
use crate::resources::texturestore::TextureStore;
use crate::session::Frame;

const GAMEOVER_POS: (i32, i32) = (50, 180);

fn draw_at(d: &mut RaylibDrawHandle, textures: &TextureStore, key: &str, x: i32, y: i32) {
    if let Some(tex) = textures.get(key) {
        d.draw_texture(tex, x, y, Color::WHITE);
    }
}

/// Score digits centred horizontally at 10% of the screen height.
fn draw_score(
    d: &mut RaylibDrawHandle,
    textures: &TextureStore,
    score: u32,
    screen_w: i32,
    screen_h: i32,
) {
    let digits: Vec<u32> = score
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    let total: i32 = digits
        .iter()
        .filter_map(|n| textures.digit(*n))
        .map(|t| t.width)
        .sum();
    let mut x = (screen_w - total) / 2;
    let y = (screen_h as f32 * 0.1) as i32;
    for n in digits {
        if let Some(tex) = textures.digit(n) {
            d.draw_texture(tex, x, y, Color::WHITE);
            x += tex.width;
        }
    }
}

pub fn render_frame(
    d: &mut RaylibDrawHandle,
    frame: &Frame,
    textures: &TextureStore,
    screen_w: i32,
    screen_h: i32,
) {
    d.clear_background(Color::BLACK);
    draw_at(d, textures, "background", 0, 0);

    for pipe in frame.pipes.iter() {
        draw_at(d, textures, "pipe_upper", pipe.x, pipe.upper_y);
        draw_at(d, textures, "pipe_lower", pipe.x, pipe.lower_y);
    }

    draw_at(d, textures, "base", frame.ground_offset, frame.ground_y);

    match frame.phase {
        GameStates::Idle => {
            if let Some(tex) = textures.get("message") {
                let x = (screen_w - tex.width) / 2;
                let y = (screen_h as f32 * 0.12) as i32;
                d.draw_texture(tex, x, y, Color::WHITE);
            }
        }
        GameStates::Active => {
            draw_score(d, textures, frame.score, screen_w, screen_h);
            if frame.paused {
                d.draw_text("PAUSED", 10, 10, 20, Color::WHITE);
            }
        }
        GameStates::Terminal => {
            draw_at(d, textures, "gameover", GAMEOVER_POS.0, GAMEOVER_POS.1);
            draw_score(d, textures, frame.score, screen_w, screen_h);
        }
        GameStates::None => {}
    }

    for bird in frame.birds.iter() {
        let Some(tex) = textures.get(format!("bird_{}", bird.wing_index)) else {
            continue;
        };
        let (w, h) = (tex.width as f32, tex.height as f32);
        let src = Rectangle {
            x: 0.0,
            y: 0.0,
            width: w,
            height: h,
        };
        // rotate about the sprite centre; positive rotation is nose up
        let dest = Rectangle {
            x: bird.x as f32 + w / 2.0,
            y: bird.y as f32 + h / 2.0,
            width: w,
            height: h,
        };
        let origin = Vector2 {
            x: w / 2.0,
            y: h / 2.0,
        };
        d.draw_texture_pro(tex, src, dest, origin, -bird.rotation, Color::WHITE);
    }
}

/// Distance and flock size overlay for autopilot runs.
pub fn render_autopilot_stats(d: &mut RaylibDrawHandle, frame: &Frame, run: u32) {
    let alive = frame.birds.iter().filter(|b| !b.crashed).count();
    d.draw_text(&format!("Run: {run}"), 10, 10, 20, Color::WHITE);
    d.draw_text(&format!("Alive: {alive}"), 10, 34, 20, Color::WHITE);
    d.draw_text(&format!("Dist: {}", frame.distance), 10, 58, 20, Color::WHITE);
}

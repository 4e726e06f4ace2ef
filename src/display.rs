/// Draw-command layer.
///
/// Translates a session into calls on a `Renderer`.  No game logic happens
/// here and nothing is mutated.  Commands are issued in a fixed order every
/// frame: HUD, ships, obstacles, aliens, lasers, then the modal dialog if
/// the session is waiting for a decision.

use rand::Rng;

use crate::compute::GameSession;
use crate::constants::*;
use crate::entities::GameStatus;
use crate::platform::{Color, Font, Rect, Renderer, Vec2};

const DIALOG_WIDTH: f32 = 500.0;
const DIALOG_HEIGHT: f32 = 200.0;
const DIALOG_Y: f32 = 100.0;
const DIALOG_BORDER: f32 = 10.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<R: Rng>(session: &GameSession<R>, out: &mut impl Renderer) {
    out.clear(GREY);

    draw_hud(out, session);

    out.draw_texture(&session.spaceship.texture, session.spaceship.position, WHITE);
    if session.mystery_ship.alive {
        out.draw_texture(&session.mystery_ship.texture, session.mystery_ship.position, WHITE);
    }

    for obstacle in &session.obstacles {
        for block in obstacle.blocks.iter().filter(|b| b.active) {
            out.draw_rect(block.rect(), YELLOW);
        }
    }

    for alien in session.aliens.iter().filter(|a| a.active) {
        out.draw_texture(&alien.texture, alien.position, WHITE);
    }

    for laser in session.spaceship.lasers.iter().chain(&session.alien_lasers) {
        if laser.active {
            out.draw_rect(laser.rect(), YELLOW);
        }
    }

    match session.status {
        GameStatus::GameOver => draw_dialog(
            out,
            session,
            ["GAME OVER", "PRESS ENTER TO RESTART", "PRESS ESC TO QUIT"],
            RED,
        ),
        GameStatus::LevelUp => draw_dialog(
            out,
            session,
            ["CONGRATULATIONS", "YOU DEFEATED THE ALIENS", "PRESS ENTER FOR NEXT LEVEL"],
            GREEN,
        ),
        _ => {}
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<R: Rng>(out: &mut impl Renderer, session: &GameSession<R>) {
    let w = session.screen_width;
    let h = session.screen_height;
    let font = &session.assets().font;
    let right_col = w - 230.0;

    out.draw_rounded_rect_outline(Rect::new(10.0, 10.0, w - 20.0, h - 20.0), 0.18, 2.0, YELLOW);
    out.draw_line(Vec2::new(WALL_MARGIN, h - 70.0), Vec2::new(w - WALL_MARGIN, h - 70.0), 3.0, YELLOW);

    let status_line = match session.status {
        GameStatus::GameOver => "GAME OVER".to_string(),
        GameStatus::Paused => "PAUSED".to_string(),
        _ => format!("LEVEL {:02}", session.level),
    };
    text_at(out, font, right_col, h - 60.0, &status_line);

    for i in 0..session.lives {
        let pos = Vec2::new(50.0 * (i + 1) as f32, h - 55.0);
        out.draw_texture(&session.spaceship.texture, pos, WHITE);
    }

    text_at(out, font, 50.0, 15.0, "SCORE");
    text_at(out, font, 50.0, 40.0, &format!("{:05}", session.score));
    text_at(out, font, right_col, 15.0, "HIGH SCORE");
    text_at(out, font, right_col, 40.0, &format!("{:05}", session.high_score));
}

fn text_at(out: &mut impl Renderer, font: &Font, x: f32, y: f32, text: &str) {
    out.draw_text(font, text, Vec2::new(x, y), FONT_SIZE, FONT_SPACING, YELLOW);
}

/// Draw `text` horizontally centred in the band `[x, x + width)`.
fn center_text_at(out: &mut impl Renderer, font: &Font, x: f32, y: f32, width: f32, text: &str) {
    let text_width = out.measure_text(font, text, FONT_SIZE, FONT_SPACING);
    text_at(out, font, x + ((width - text_width) / 2.0).floor(), y, text);
}

// ── Modal ─────────────────────────────────────────────────────────────────────

fn draw_dialog<R: Rng>(
    out: &mut impl Renderer,
    session: &GameSession<R>,
    lines: [&str; 3],
    background: Color,
) {
    let font = &session.assets().font;
    let x = ((session.screen_width - DIALOG_WIDTH) / 2.0).floor();
    let rect = Rect::new(x, DIALOG_Y, DIALOG_WIDTH, DIALOG_HEIGHT);

    out.draw_rect(rect, background);
    out.draw_rect_outline(rect, DIALOG_BORDER, YELLOW);
    for (i, line) in lines.iter().enumerate() {
        center_text_at(out, font, x, DIALOG_Y + 50.0 + 40.0 * i as f32, DIALOG_WIDTH, line);
    }
}

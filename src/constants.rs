/// Gameplay tuning values.  All distances are in world units (pixels of the
/// 800×800 play field), all times in seconds.

use crate::platform::Color;

// ── Play field ───────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 800.0;

/// Distance from either side wall that the spaceship may not cross and that
/// turns the alien formation around.
pub const WALL_MARGIN: f32 = 25.0;

pub const TARGET_FPS: u32 = 60;

// ── Spaceship ────────────────────────────────────────────────────────────────

pub const SPACESHIP_STEP: f32 = 7.0;
/// Gap between the spaceship's bottom edge and the bottom of the screen.
pub const SPACESHIP_BOTTOM_GAP: f32 = 100.0;
pub const SPACESHIP_FIRE_INTERVAL: f64 = 0.35;
pub const SPACESHIP_LASER_SPEED: f32 = -6.0;
pub const STARTING_LIVES: u32 = 3;

// ── Lasers ───────────────────────────────────────────────────────────────────

pub const LASER_WIDTH: f32 = 4.0;
pub const LASER_HEIGHT: f32 = 15.0;
/// Lasers die when they go above this line…
pub const LASER_TOP_LIMIT: f32 = 25.0;
/// …or below `SCREEN_HEIGHT - LASER_BOTTOM_GAP`.
pub const LASER_BOTTOM_GAP: f32 = 100.0;

// ── Alien formation ──────────────────────────────────────────────────────────

pub const ALIEN_ROWS: usize = 5;
pub const ALIEN_COLS: usize = 11;
pub const ALIEN_ORIGIN_X: f32 = 75.0;
pub const ALIEN_ORIGIN_Y: f32 = 110.0;
pub const ALIEN_SPACING: f32 = 55.0;
pub const ALIEN_DESCENT: f32 = 4.0;
pub const ALIEN_LASER_SPEED: f32 = 6.0;
pub const ALIEN_LASER_SHOOT_INTERVAL: f64 = 0.35;
pub const POINTS_PER_ALIEN_TYPE: u32 = 100;

// ── Mystery ship ─────────────────────────────────────────────────────────────

pub const MYSTERY_SHIP_Y: f32 = 90.0;
pub const MYSTERY_SHIP_SPEED: f32 = 3.0;
pub const MYSTERY_SHIP_POINTS: u32 = 500;
/// Spawn interval is drawn uniformly from this half-open range of whole seconds.
pub const MYSTERY_SPAWN_MIN: u32 = 10;
pub const MYSTERY_SPAWN_MAX: u32 = 20;

// ── Obstacles ────────────────────────────────────────────────────────────────

pub const OBSTACLE_COUNT: usize = 4;
pub const BLOCK_SIZE: f32 = 3.0;
/// Gap between the top of the obstacles and the bottom of the screen.
pub const OBSTACLE_BOTTOM_GAP: f32 = 200.0;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const GREY: Color = Color::rgb(29, 29, 27);
pub const YELLOW: Color = Color::rgb(243, 216, 63);
pub const GREEN: Color = Color::rgb(11, 102, 35);
pub const RED: Color = Color::rgb(163, 22, 3);
pub const WHITE: Color = Color::rgb(255, 255, 255);

// ── HUD ──────────────────────────────────────────────────────────────────────

pub const FONT_SIZE: f32 = 34.0;
pub const FONT_SPACING: f32 = 2.0;
pub const MUSIC_VOLUME: f32 = 0.6;

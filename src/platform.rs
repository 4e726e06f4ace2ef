/// Seams between the simulation and the outside world.
///
/// The session never touches a window, a sound card or a keyboard directly;
/// it talks to these traits.  The terminal host in `main` provides one set of
/// implementations, the test suite provides recording fakes.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::error::AssetError;

// ── Geometry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// A zero-area rectangle at `pos`.  Never overlaps anything.
    pub const fn empty_at(pos: Vec2) -> Self {
        Rect { x: pos.x, y: pos.y, width: 0.0, height: 0.0 }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict AABB intersection.  Touching edges do not count, and empty
    /// rectangles never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

// ── Asset handles ────────────────────────────────────────────────────────────

/// A loaded image.  Its size doubles as the hitbox of whatever wears it.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sound {
    pub id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Music {
    pub id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    pub id: u32,
}

/// Resolves logical asset names to loaded handles.  Called only while the
/// session is being built; a failure there is fatal.
pub trait AssetStore {
    fn texture(&mut self, name: &str) -> Result<Texture, AssetError>;
    fn sound(&mut self, name: &str) -> Result<Sound, AssetError>;
    fn music(&mut self, name: &str) -> Result<Music, AssetError>;
    fn font(&mut self, name: &str) -> Result<Font, AssetError>;
}

// ── Output ───────────────────────────────────────────────────────────────────

pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn draw_texture(&mut self, texture: &Texture, pos: Vec2, tint: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_rect_outline(&mut self, rect: Rect, thickness: f32, color: Color);
    fn draw_rounded_rect_outline(&mut self, rect: Rect, roundness: f32, thickness: f32, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);
    fn draw_text(&mut self, font: &Font, text: &str, pos: Vec2, size: f32, spacing: f32, color: Color);
    /// Width in world units that `text` would occupy if drawn.
    fn measure_text(&self, font: &Font, text: &str, size: f32, spacing: f32) -> f32;
}

pub trait AudioDevice {
    fn play_sound(&mut self, sound: &Sound);
    fn play_music(&mut self, music: &Music);
    fn pause_music(&mut self, music: &Music);
    fn resume_music(&mut self, music: &Music);
    /// Keeps a streamed track fed; called once per running frame.
    fn update_music(&mut self, music: &Music);
    fn set_music_volume(&mut self, music: &Music, volume: f32);
}

// ── Input ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Confirm,
    Cancel,
    MuteMusic,
    MuteSfx,
}

pub trait InputSource {
    /// Held right now (continuous).
    fn is_down(&self, key: Key) -> bool;
    /// Went down during this frame (edge).
    fn is_pressed(&self, key: Key) -> bool;
    /// The window or OS asked the game to close.
    fn close_requested(&self) -> bool {
        false
    }
}

// ── Time ─────────────────────────────────────────────────────────────────────

/// Monotonic seconds since some fixed origin.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.  Clones share the same time, so a
/// test can keep one handle and give the other to the session.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        ManualClock { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

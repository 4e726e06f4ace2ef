/// Terminal implementations of the platform seams.
///
/// The 800×800 world is scaled onto whatever grid the terminal offers.
/// Drawing goes into an in-memory cell buffer so the `Renderer` calls cannot
/// fail; `present` pushes the buffer out in one go.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing::trace;

use invaders::constants::{GREY, RED, WHITE};
use invaders::error::AssetError;
use invaders::platform::{
    AssetStore, AudioDevice, Color, Font, InputSource, Key, Music, Rect, Renderer, Sound, Texture,
    Vec2,
};

// ── Sprites ───────────────────────────────────────────────────────────────────

struct SpriteArt {
    name: &'static str,
    width: f32,
    height: f32,
    rows: [&'static str; 2],
    color: Color,
}

const MAGENTA: Color = Color::rgb(200, 60, 200);
const CYAN: Color = Color::rgb(60, 200, 220);
const LIME: Color = Color::rgb(90, 220, 90);

/// Texture ids are indices into this table.
const SPRITES: [SpriteArt; 5] = [
    SpriteArt { name: "spaceship", width: 52.0, height: 32.0, rows: [" ▄█▄ ", "█████"], color: WHITE },
    SpriteArt { name: "mystery", width: 64.0, height: 28.0, rows: ["▄▀▀▀▀▄", "▀▄▀▀▄▀"], color: RED },
    SpriteArt { name: "alien-1", width: 40.0, height: 32.0, rows: ["▄▀█▀▄", "▀ ▀ ▀"], color: LIME },
    SpriteArt { name: "alien-2", width: 40.0, height: 32.0, rows: ["▀▄█▄▀", "▄▀ ▀▄"], color: CYAN },
    SpriteArt { name: "alien-3", width: 40.0, height: 32.0, rows: [" ▄█▄ ", "▀▄▀▄▀"], color: MAGENTA },
];

const SOUNDS: [&str; 2] = ["laser", "explosion"];

/// Resolves names against the built-in sprite table.
#[derive(Default)]
pub struct TerminalAssets;

impl AssetStore for TerminalAssets {
    fn texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        SPRITES
            .iter()
            .position(|s| s.name == name)
            .map(|id| Texture { id: id as u32, width: SPRITES[id].width, height: SPRITES[id].height })
            .ok_or_else(|| AssetError::Unknown { kind: "texture", name: name.to_string() })
    }

    fn sound(&mut self, name: &str) -> Result<Sound, AssetError> {
        SOUNDS
            .iter()
            .position(|s| *s == name)
            .map(|id| Sound { id: id as u32 })
            .ok_or_else(|| AssetError::Unknown { kind: "sound", name: name.to_string() })
    }

    fn music(&mut self, name: &str) -> Result<Music, AssetError> {
        match name {
            "music" => Ok(Music { id: 0 }),
            _ => Err(AssetError::Unknown { kind: "music", name: name.to_string() }),
        }
    }

    fn font(&mut self, name: &str) -> Result<Font, AssetError> {
        match name {
            "font" => Ok(Font { id: 0 }),
            _ => Err(AssetError::Unknown { kind: "font", name: name.to_string() }),
        }
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// A terminal has no mixer; sound requests are only traced.
#[derive(Default)]
pub struct TerminalAudio {
    music_paused: bool,
}

impl AudioDevice for TerminalAudio {
    fn play_sound(&mut self, sound: &Sound) {
        let name = SOUNDS.get(sound.id as usize).copied().unwrap_or("?");
        trace!(sound = name, "play sound");
    }

    fn play_music(&mut self, music: &Music) {
        self.music_paused = false;
        trace!(music = music.id, "play music");
    }

    fn pause_music(&mut self, music: &Music) {
        self.music_paused = true;
        trace!(music = music.id, "pause music");
    }

    fn resume_music(&mut self, music: &Music) {
        self.music_paused = false;
        trace!(music = music.id, "resume music");
    }

    fn update_music(&mut self, _music: &Music) {}

    fn set_music_volume(&mut self, music: &Music, volume: f32) {
        trace!(music = music.id, volume, paused = self.music_paused, "music volume");
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Cell { ch: ' ', fg: WHITE, bg }
    }
}

pub struct TerminalRenderer {
    cols: u16,
    rows: u16,
    /// Cells per world unit, horizontally and vertically.
    sx: f32,
    sy: f32,
    world_width: f32,
    world_height: f32,
    cells: Vec<Cell>,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        let mut renderer = TerminalRenderer {
            cols: 0,
            rows: 0,
            sx: 0.0,
            sy: 0.0,
            world_width,
            world_height,
            cells: Vec::new(),
        };
        renderer.resize(cols, rows);
        renderer
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.sx = self.cols as f32 / self.world_width;
        self.sy = self.rows as f32 / self.world_height;
        self.cells = vec![Cell::blank(GREY); self.cols as usize * self.rows as usize];
    }

    fn cell_x(&self, x: f32) -> i32 {
        (x * self.sx).floor() as i32
    }

    fn cell_y(&self, y: f32) -> i32 {
        (y * self.sy).floor() as i32
    }

    /// Cell span `[c0, c1) × [r0, r1)` covered by `rect`; never empty.
    fn span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let c0 = self.cell_x(rect.x);
        let r0 = self.cell_y(rect.y);
        let c1 = ((rect.x + rect.width) * self.sx).ceil().max(c0 as f32 + 1.0) as i32;
        let r1 = ((rect.y + rect.height) * self.sy).ceil().max(r0 as f32 + 1.0) as i32;
        (c0, r0, c1, r1)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn outline(&mut self, rect: Rect, corners: [char; 4], color: Color) {
        let (c0, r0, c1, r1) = self.span(rect);
        let (right, bottom) = (c1 - 1, r1 - 1);
        for col in c0..=right {
            self.put(col, r0, '─', color);
            self.put(col, bottom, '─', color);
        }
        for row in r0..=bottom {
            self.put(c0, row, '│', color);
            self.put(right, row, '│', color);
        }
        self.put(c0, r0, corners[0], color);
        self.put(right, r0, corners[1], color);
        self.put(c0, bottom, corners[2], color);
        self.put(right, bottom, corners[3], color);
    }

    /// Glyph at a cell, for tests.
    #[cfg(test)]
    fn glyph(&self, col: i32, row: i32) -> Option<char> {
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get(index).map(|c| c.ch)
    }

    /// Write the buffer to the terminal.
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            // Skip the bottom-right cell so the terminal never scrolls.
            let width = if row + 1 == self.rows { self.cols - 1 } else { self.cols };
            for col in 0..width {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                if fg != Some(cell.fg) {
                    out.queue(style::SetForegroundColor(to_term_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    out.queue(style::SetBackgroundColor(to_term_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

fn to_term_color(c: Color) -> style::Color {
    style::Color::Rgb { r: c.r, g: c.g, b: c.b }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self, color: Color) {
        self.cells.fill(Cell::blank(color));
    }

    fn draw_texture(&mut self, texture: &Texture, pos: Vec2, _tint: Color) {
        let Some(art) = SPRITES.get(texture.id as usize) else {
            return;
        };
        let col = self.cell_x(pos.x);
        let row = self.cell_y(pos.y);
        for (dy, line) in art.rows.iter().enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                if ch != ' ' {
                    self.put(col + dx as i32, row + dy as i32, ch, art.color);
                }
            }
        }
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        let (c0, r0, c1, r1) = self.span(rect);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ' ';
                    cell.bg = color;
                }
            }
        }
    }

    fn draw_rect_outline(&mut self, rect: Rect, _thickness: f32, color: Color) {
        self.outline(rect, ['┌', '┐', '└', '┘'], color);
    }

    fn draw_rounded_rect_outline(&mut self, rect: Rect, _roundness: f32, _thickness: f32, color: Color) {
        self.outline(rect, ['╭', '╮', '╰', '╯'], color);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, _thickness: f32, color: Color) {
        let (c0, r0) = (self.cell_x(from.x), self.cell_y(from.y));
        let (c1, r1) = (self.cell_x(to.x), self.cell_y(to.y));
        let (dc, dr) = (c1 - c0, r1 - r0);
        let ch = match (dc, dr) {
            (_, 0) => '─',
            (0, _) => '│',
            _ => '·',
        };
        let steps = dc.abs().max(dr.abs()).max(1);
        for step in 0..=steps {
            let col = c0 + dc * step / steps;
            let row = r0 + dr * step / steps;
            self.put(col, row, ch, color);
        }
    }

    fn draw_text(&mut self, _font: &Font, text: &str, pos: Vec2, _size: f32, _spacing: f32, color: Color) {
        let col = self.cell_x(pos.x);
        let row = self.cell_y(pos.y);
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, color);
        }
    }

    fn measure_text(&self, _font: &Font, text: &str, _size: f32, _spacing: f32) -> f32 {
        text.chars().count() as f32 / self.sx
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.  Covers terminals that never send key-release events: OS
/// key-repeat runs at 15 Hz or more, which refreshes the key well inside
/// the window at 60 FPS.
const HOLD_WINDOW: u64 = 8;

/// Polled keyboard state built from the terminal's event stream.
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    /// Each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<Key, u64>,
    pressed: HashSet<Key>,
    frame: u64,
    close: bool,
    resized: Option<(u16, u16)>,
}

impl TerminalInput {
    pub fn new(rx: mpsc::Receiver<Event>) -> Self {
        TerminalInput {
            rx,
            key_frame: HashMap::new(),
            pressed: HashSet::new(),
            frame: 0,
            close: false,
            resized: None,
        }
    }

    fn is_held(&self, key: Key) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Drain pending events (non-blocking).  Call once per frame before the
    /// session reads any key state.
    pub fn poll(&mut self) {
        self.frame += 1;
        self.pressed.clear();
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Event::Key(key_event) => self.apply(key_event),
                Event::Resize(cols, rows) => self.resized = Some((cols, rows)),
                _ => {}
            }
        }
    }

    fn apply(&mut self, KeyEvent { code, kind, modifiers, .. }: KeyEvent) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.close = true;
            return;
        }
        let Some(key) = map_key(code) else {
            return;
        };
        match kind {
            // Classic terminals report auto-repeat as fresh presses, so only
            // a press on a key that was not already held is an edge.
            KeyEventKind::Press => {
                if !self.is_held(key) {
                    self.pressed.insert(key);
                }
                self.key_frame.insert(key, self.frame);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key);
            }
        }
    }

    /// New terminal size, if it changed since the last call.
    pub fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.resized.take()
    }
}

impl InputSource for TerminalInput {
    fn is_down(&self, key: Key) -> bool {
        self.is_held(key)
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Cancel),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Key::MuteMusic),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::MuteSfx),
        _ => None,
    }
}

/// Dedicate a thread to blocking event reads so the frame loop never blocks
/// on I/O.
pub fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });
    rx
}

// ── Terminal mode ─────────────────────────────────────────────────────────────

/// Raw mode + alternate screen.  Returns whether key-release reporting could
/// be enabled.
pub fn enter<W: Write>(out: &mut W) -> io::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    // Kitty-protocol terminals report releases; others fall back to the
    // hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();
    Ok(keyboard_enhanced)
}

/// Always restore the terminal, whatever state the game ended in.
pub fn leave<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

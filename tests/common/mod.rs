//! Fakes shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::config::Config;
use invaders::error::{AssetError, PersistError};
use invaders::persist::{MemoryScoreStore, ScoreStore};
use invaders::platform::{
    AssetStore, AudioDevice, Color, Font, InputSource, Key, ManualClock, Music, Rect, Renderer,
    Sound, Texture, Vec2,
};
use invaders::GameSession;

pub const SHIP_W: f32 = 52.0;
pub const SHIP_H: f32 = 32.0;
pub const MYSTERY_W: f32 = 64.0;
pub const MYSTERY_H: f32 = 28.0;
pub const ALIEN_W: f32 = 40.0;
pub const ALIEN_H: f32 = 32.0;

pub const SPACESHIP_ID: u32 = 0;
pub const MYSTERY_ID: u32 = 1;
pub const LASER_SOUND: u32 = 0;
pub const EXPLOSION_SOUND: u32 = 1;

pub const START_TIME: f64 = 100.0;

// ── Assets ────────────────────────────────────────────────────────────────────

pub struct FakeAssets;

impl AssetStore for FakeAssets {
    fn texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        let (id, width, height) = match name {
            "spaceship" => (SPACESHIP_ID, SHIP_W, SHIP_H),
            "mystery" => (MYSTERY_ID, MYSTERY_W, MYSTERY_H),
            "alien-1" => (2, ALIEN_W, ALIEN_H),
            "alien-2" => (3, ALIEN_W, ALIEN_H),
            "alien-3" => (4, ALIEN_W, ALIEN_H),
            _ => return Err(AssetError::Unknown { kind: "texture", name: name.to_string() }),
        };
        Ok(Texture { id, width, height })
    }

    fn sound(&mut self, name: &str) -> Result<Sound, AssetError> {
        match name {
            "laser" => Ok(Sound { id: LASER_SOUND }),
            "explosion" => Ok(Sound { id: EXPLOSION_SOUND }),
            _ => Err(AssetError::Unknown { kind: "sound", name: name.to_string() }),
        }
    }

    fn music(&mut self, _name: &str) -> Result<Music, AssetError> {
        Ok(Music { id: 0 })
    }

    fn font(&mut self, _name: &str) -> Result<Font, AssetError> {
        Ok(Font { id: 0 })
    }
}

/// Knows every name except the ones it was told to refuse.
pub struct BrokenAssets(pub &'static str);

impl AssetStore for BrokenAssets {
    fn texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        if name == self.0 {
            return Err(AssetError::Load { name: name.to_string(), reason: "corrupt".into() });
        }
        FakeAssets.texture(name)
    }

    fn sound(&mut self, name: &str) -> Result<Sound, AssetError> {
        FakeAssets.sound(name)
    }

    fn music(&mut self, name: &str) -> Result<Music, AssetError> {
        FakeAssets.music(name)
    }

    fn font(&mut self, name: &str) -> Result<Font, AssetError> {
        FakeAssets.font(name)
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum AudioEvent {
    Sound(u32),
    PlayMusic,
    PauseMusic,
    ResumeMusic,
    Volume(f32),
}

#[derive(Clone, Default)]
pub struct RecordingAudio {
    pub events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudio {
    pub fn count(&self, event: &AudioEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    pub fn last(&self) -> Option<AudioEvent> {
        self.events.borrow().last().cloned()
    }
}

impl AudioDevice for RecordingAudio {
    fn play_sound(&mut self, sound: &Sound) {
        self.events.borrow_mut().push(AudioEvent::Sound(sound.id));
    }

    fn play_music(&mut self, _music: &Music) {
        self.events.borrow_mut().push(AudioEvent::PlayMusic);
    }

    fn pause_music(&mut self, _music: &Music) {
        self.events.borrow_mut().push(AudioEvent::PauseMusic);
    }

    fn resume_music(&mut self, _music: &Music) {
        self.events.borrow_mut().push(AudioEvent::ResumeMusic);
    }

    fn update_music(&mut self, _music: &Music) {}

    fn set_music_volume(&mut self, _music: &Music, volume: f32) {
        self.events.borrow_mut().push(AudioEvent::Volume(volume));
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ScriptedInput {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
    close: bool,
}

impl ScriptedInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn holding(keys: &[Key]) -> Self {
        ScriptedInput { down: keys.iter().copied().collect(), ..Self::default() }
    }

    pub fn pressing(keys: &[Key]) -> Self {
        ScriptedInput { pressed: keys.iter().copied().collect(), ..Self::default() }
    }

    pub fn closing() -> Self {
        ScriptedInput { close: true, ..Self::default() }
    }
}

impl InputSource for ScriptedInput {
    fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Clear(Color),
    Texture { id: u32, pos: Vec2 },
    Rect(Rect, Color),
    RectOutline(Rect),
    RoundedOutline(Rect),
    Line(Vec2, Vec2),
    Text(String, Vec2),
}

/// Every character is 10 units wide.
pub const CHAR_WIDTH: f32 = 10.0;

#[derive(Default)]
pub struct RecordingRenderer {
    pub commands: Vec<Draw>,
}

impl RecordingRenderer {
    pub fn position(&self, pred: impl Fn(&Draw) -> bool) -> Option<usize> {
        self.commands.iter().position(pred)
    }

    pub fn texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Draw::Text(s, _) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn text_pos(&self, text: &str) -> Option<Vec2> {
        self.commands.iter().find_map(|c| match c {
            Draw::Text(s, pos) if s == text => Some(*pos),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.commands.push(Draw::Clear(color));
    }

    fn draw_texture(&mut self, texture: &Texture, pos: Vec2, _tint: Color) {
        self.commands.push(Draw::Texture { id: texture.id, pos });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(Draw::Rect(rect, color));
    }

    fn draw_rect_outline(&mut self, rect: Rect, _thickness: f32, _color: Color) {
        self.commands.push(Draw::RectOutline(rect));
    }

    fn draw_rounded_rect_outline(&mut self, rect: Rect, _roundness: f32, _thickness: f32, _color: Color) {
        self.commands.push(Draw::RoundedOutline(rect));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, _thickness: f32, _color: Color) {
        self.commands.push(Draw::Line(from, to));
    }

    fn draw_text(&mut self, _font: &Font, text: &str, pos: Vec2, _size: f32, _spacing: f32, _color: Color) {
        self.commands.push(Draw::Text(text.to_string(), pos));
    }

    fn measure_text(&self, _font: &Font, text: &str, _size: f32, _spacing: f32) -> f32 {
        text.chars().count() as f32 * CHAR_WIDTH
    }
}

// ── Score stores ──────────────────────────────────────────────────────────────

/// Fails every read and write, counting write attempts.
#[derive(Clone, Default)]
pub struct FailingStore {
    pub save_attempts: Rc<RefCell<usize>>,
}

impl ScoreStore for FailingStore {
    fn load(&self) -> Result<u32, PersistError> {
        Err(PersistError::NoConfigDir)
    }

    fn save(&mut self, _high_score: u32) -> Result<(), PersistError> {
        *self.save_attempts.borrow_mut() += 1;
        Err(PersistError::NoConfigDir)
    }
}

// ── Session harness ───────────────────────────────────────────────────────────

pub struct Harness {
    pub session: GameSession<StdRng>,
    pub clock: ManualClock,
    pub audio: RecordingAudio,
    pub store: MemoryScoreStore,
}

pub fn harness() -> Harness {
    harness_with_store(MemoryScoreStore::default())
}

pub fn harness_with_store(store: MemoryScoreStore) -> Harness {
    let clock = ManualClock::new(START_TIME);
    let audio = RecordingAudio::default();
    let session = session_with(Box::new(store.clone()), &clock, &audio);
    Harness { session, clock, audio, store }
}

pub fn session_with(
    store: Box<dyn ScoreStore>,
    clock: &ManualClock,
    audio: &RecordingAudio,
) -> GameSession<StdRng> {
    GameSession::new(
        &Config::default(),
        &mut FakeAssets,
        Box::new(audio.clone()),
        Box::new(clock.clone()),
        store,
        StdRng::seed_from_u64(42),
    )
    .expect("fake assets always load")
}

pub fn alien_texture() -> Texture {
    Texture { id: 2, width: ALIEN_W, height: ALIEN_H }
}

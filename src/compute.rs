/// The game session: owns every entity collection, advances them one frame at
/// a time, resolves collisions and drives the state machine.
///
/// Randomness comes through the injected RNG and time through the injected
/// `Clock`, so a seeded `StdRng` plus a `ManualClock` makes a session fully
/// deterministic (useful for tests).

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::*;
use crate::display;
use crate::entities::{Alien, GameStatus, Laser, MysteryShip, Obstacle, Spaceship};
use crate::error::AssetError;
use crate::platform::{
    AssetStore, AudioDevice, Clock, Font, InputSource, Key, Music, Renderer, Sound, Texture,
};
use crate::persist::ScoreStore;

// ── Assets ────────────────────────────────────────────────────────────────────

/// Every handle the session needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Assets {
    pub spaceship: Texture,
    pub mystery: Texture,
    /// Indexed by alien type − 1.
    pub aliens: [Texture; 3],
    pub laser_sound: Sound,
    pub explosion_sound: Sound,
    pub music: Music,
    pub font: Font,
}

impl Assets {
    pub fn load(store: &mut dyn AssetStore) -> Result<Self, AssetError> {
        Ok(Assets {
            spaceship: store.texture("spaceship")?,
            mystery: store.texture("mystery")?,
            aliens: [
                store.texture("alien-1")?,
                store.texture("alien-2")?,
                store.texture("alien-3")?,
            ],
            laser_sound: store.sound("laser")?,
            explosion_sound: store.sound("explosion")?,
            music: store.music("music")?,
            font: store.font("font")?,
        })
    }

    pub fn alien(&self, alien_type: u32) -> &Texture {
        let index = alien_type.clamp(1, 3) as usize - 1;
        &self.aliens[index]
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct GameSession<R: Rng = StdRng> {
    pub spaceship: Spaceship,
    pub mystery_ship: MysteryShip,
    pub obstacles: Vec<Obstacle>,
    pub aliens: Vec<Alien>,
    /// +1 marching right, −1 marching left.
    pub aliens_direction: i32,
    pub alien_lasers: Vec<Laser>,
    pub time_last_alien_fired: Option<f64>,
    pub ms_spawn_interval: f64,
    pub ms_time_last_spawned: f64,
    pub lives: u32,
    pub level: u32,
    pub score: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub mute_sfx: bool,
    pub mute_music: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    assets: Assets,
    audio: Box<dyn AudioDevice>,
    clock: Box<dyn Clock>,
    store: Box<dyn ScoreStore>,
    rng: R,
}

impl<R: Rng> GameSession<R> {
    /// Resolve assets, load the saved high score, start the music and set up
    /// level 1.  Only asset failures are fatal.
    pub fn new(
        config: &Config,
        asset_store: &mut dyn AssetStore,
        mut audio: Box<dyn AudioDevice>,
        clock: Box<dyn Clock>,
        store: Box<dyn ScoreStore>,
        rng: R,
    ) -> Result<Self, AssetError> {
        let assets = Assets::load(asset_store)?;
        let spaceship = Spaceship::new(
            assets.spaceship.clone(),
            assets.laser_sound,
            config.screen_width,
            config.screen_height,
        );
        let mystery_ship = MysteryShip::new(assets.mystery.clone());

        audio.set_music_volume(&assets.music, config.music_volume);
        audio.play_music(&assets.music);

        let mut session = GameSession {
            spaceship,
            mystery_ship,
            obstacles: Vec::new(),
            aliens: Vec::new(),
            aliens_direction: 1,
            alien_lasers: Vec::new(),
            time_last_alien_fired: None,
            ms_spawn_interval: 0.0,
            ms_time_last_spawned: 0.0,
            lives: STARTING_LIVES,
            level: 0,
            score: 0,
            high_score: 0,
            status: GameStatus::Idle,
            mute_sfx: false,
            mute_music: false,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            assets,
            audio,
            clock,
            store,
            rng,
        };
        session.load_high_score();
        session.init_game();
        Ok(session)
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn should_quit(&self) -> bool {
        self.status == GameStatus::Quit
    }

    // ── Setup ─────────────────────────────────────────────────────────────────

    /// Fresh game: full lives, score zero, level 1.  The high score is kept.
    pub fn init_game(&mut self) {
        self.lives = STARTING_LIVES;
        self.level = 0;
        self.score = 0;
        self.reset_game();
        self.init_level();
    }

    /// Advance the level counter and restart the per-level timers.
    pub fn init_level(&mut self) {
        self.level += 1;
        self.aliens_direction = 1;
        self.ms_spawn_interval = self.roll_spawn_interval();
        self.ms_time_last_spawned = self.clock.now();
        self.time_last_alien_fired = None;
        self.status = GameStatus::Running;
        info!(level = self.level, "level started");
    }

    /// Rebuild the per-level entities: a full formation, intact obstacles, no
    /// lasers in flight.
    pub fn reset_game(&mut self) {
        self.spaceship.reset(self.screen_width, self.screen_height);
        self.mystery_ship.alive = false;
        self.alien_lasers.clear();
        self.obstacles = self.create_obstacles();
        self.aliens = self.create_aliens();
    }

    pub fn create_obstacles(&self) -> Vec<Obstacle> {
        let width = Obstacle::width();
        let gap = ((self.screen_width - OBSTACLE_COUNT as f32 * width) / (OBSTACLE_COUNT + 1) as f32).floor();
        let y = self.screen_height - OBSTACLE_BOTTOM_GAP;
        (0..OBSTACLE_COUNT)
            .map(|i| Obstacle::new((i + 1) as f32 * gap + i as f32 * width, y))
            .collect()
    }

    pub fn create_aliens(&self) -> Vec<Alien> {
        let mut aliens = Vec::with_capacity(ALIEN_ROWS * ALIEN_COLS);
        for row in 0..ALIEN_ROWS {
            let alien_type = match row {
                0 => 3,
                1 | 2 => 2,
                _ => 1,
            };
            for col in 0..ALIEN_COLS {
                let x = ALIEN_ORIGIN_X + col as f32 * ALIEN_SPACING;
                let y = ALIEN_ORIGIN_Y + row as f32 * ALIEN_SPACING;
                aliens.push(Alien::new(alien_type, self.assets.alien(alien_type).clone(), x, y));
            }
        }
        aliens
    }

    fn roll_spawn_interval(&mut self) -> f64 {
        f64::from(self.rng.gen_range(MYSTERY_SPAWN_MIN..MYSTERY_SPAWN_MAX))
    }

    // ── Formation ─────────────────────────────────────────────────────────────

    /// March the formation one step.  The wall check runs per alien, so when
    /// several aliens are past a wall the formation descends once for each
    /// of them in the same frame.
    pub fn move_aliens(&mut self) {
        for i in 0..self.aliens.len() {
            let alien = &self.aliens[i];
            let past_right = alien.position.x + alien.texture.width > self.screen_width - WALL_MARGIN;
            let past_left = alien.position.x < WALL_MARGIN;
            if past_right {
                self.aliens_direction = -1;
                self.move_down_aliens(ALIEN_DESCENT);
            }
            if past_left {
                self.aliens_direction = 1;
                self.move_down_aliens(ALIEN_DESCENT);
            }
            let direction = self.aliens_direction;
            self.aliens[i].update(direction);
        }
    }

    pub fn move_down_aliens(&mut self, distance: f32) {
        for alien in &mut self.aliens {
            alien.position.y += distance;
        }
    }

    /// One random alien fires, at most once per shared cooldown.
    pub fn aliens_shoot_laser(&mut self) {
        if self.aliens.is_empty() {
            return;
        }
        let now = self.clock.now();
        if let Some(last) = self.time_last_alien_fired {
            if now - last < ALIEN_LASER_SHOOT_INTERVAL {
                return;
            }
        }
        let index = self.rng.gen_range(0..self.aliens.len());
        let alien = &self.aliens[index];
        let x = alien.position.x + alien.texture.width / 2.0;
        let y = alien.position.y + alien.texture.height;
        self.alien_lasers.push(Laser::new(x, y, ALIEN_LASER_SPEED));
        self.time_last_alien_fired = Some(now);
    }

    // ── Scoring ───────────────────────────────────────────────────────────────

    pub fn add_score(&mut self, earned: u32) {
        self.score = self.score.saturating_add(earned);
        self.high_score = self.high_score.max(self.score);
    }

    fn load_high_score(&mut self) {
        match self.store.load() {
            Ok(score) => self.high_score = score,
            Err(err) => {
                warn!("could not load high score, starting from 0: {err}");
                self.high_score = 0;
            }
        }
    }

    fn save_high_score(&mut self) {
        if let Err(err) = self.store.save(self.high_score) {
            warn!("could not save high score {}: {err}", self.high_score);
        }
    }

    fn play_explosion(&mut self) {
        if !self.mute_sfx {
            self.audio.play_sound(&self.assets.explosion_sound);
        }
    }

    // ── Collisions ────────────────────────────────────────────────────────────

    /// Resolve every collision for this frame.  The order of the passes
    /// decides who gets the points and who loses a life.
    pub fn check_for_collisions(&mut self) {
        self.collide_lasers_with_aliens();
        shoot_obstacles(&mut self.spaceship.lasers, &mut self.obstacles);
        self.collide_lasers_with_mystery_ship();
        self.collide_alien_lasers_with_spaceship();
        shoot_obstacles(&mut self.alien_lasers, &mut self.obstacles);
        self.collide_aliens_with_obstacles();
        self.collide_aliens_with_spaceship();
    }

    fn collide_lasers_with_aliens(&mut self) {
        let mut earned = 0;
        let mut kills = 0;
        for laser in &mut self.spaceship.lasers {
            for alien in &mut self.aliens {
                if laser.rect().overlaps(&alien.rect()) {
                    earned += alien.score();
                    kills += 1;
                    alien.active = false;
                    laser.active = false;
                }
            }
        }
        for _ in 0..kills {
            self.play_explosion();
        }
        if kills > 0 {
            self.add_score(earned);
            self.aliens.retain(|a| a.active);
        }
        if self.aliens.is_empty() && self.status == GameStatus::Running {
            self.status = GameStatus::LevelUp;
            info!(level = self.level, score = self.score, "formation cleared");
        }
    }

    fn collide_lasers_with_mystery_ship(&mut self) {
        let mut hit = false;
        for laser in &mut self.spaceship.lasers {
            if laser.rect().overlaps(&self.mystery_ship.rect()) {
                self.mystery_ship.alive = false;
                laser.active = false;
                hit = true;
            }
        }
        if hit {
            self.play_explosion();
            self.add_score(MYSTERY_SHIP_POINTS);
            debug!(score = self.score, "mystery ship destroyed");
        }
    }

    fn collide_alien_lasers_with_spaceship(&mut self) {
        let ship = self.spaceship.rect();
        let mut hits = 0;
        for laser in &mut self.alien_lasers {
            if laser.rect().overlaps(&ship) {
                laser.active = false;
                hits += 1;
            }
        }
        for _ in 0..hits {
            self.lives = self.lives.saturating_sub(1);
            info!(lives = self.lives, "spaceship hit");
            if self.lives == 0 {
                self.game_over();
            }
        }
    }

    fn collide_aliens_with_obstacles(&mut self) {
        for alien in &self.aliens {
            let alien_rect = alien.rect();
            for obstacle in &mut self.obstacles {
                let mut hit = false;
                for block in &mut obstacle.blocks {
                    if alien_rect.overlaps(&block.rect()) {
                        block.active = false;
                        hit = true;
                    }
                }
                if hit {
                    obstacle.compact();
                }
            }
        }
    }

    fn collide_aliens_with_spaceship(&mut self) {
        let ship = self.spaceship.rect();
        if self.aliens.iter().any(|a| a.rect().overlaps(&ship)) {
            self.game_over();
        }
    }

    /// Enter `GameOver` and persist the high score.  Repeated calls within
    /// one game-over do nothing.
    pub fn game_over(&mut self) {
        if self.status == GameStatus::GameOver {
            return;
        }
        self.status = GameStatus::GameOver;
        self.save_high_score();
        info!(score = self.score, high_score = self.high_score, level = self.level, "game over");
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the simulation one frame.  Does nothing unless running.
    pub fn update(&mut self) {
        if self.status != GameStatus::Running {
            return;
        }
        self.audio.update_music(&self.assets.music);

        let now = self.clock.now();
        if now - self.ms_time_last_spawned > self.ms_spawn_interval {
            if !self.mystery_ship.alive {
                self.mystery_ship.spawn(&mut self.rng, self.screen_width);
                debug!(x = self.mystery_ship.position.x, "mystery ship spawned");
            }
            self.ms_time_last_spawned = now;
            self.ms_spawn_interval = self.roll_spawn_interval();
        }

        self.mystery_ship.update(self.screen_width);
        self.move_aliens();

        self.check_for_collisions();
        self.compact_lasers();

        self.aliens_shoot_laser();
        self.spaceship.update_lasers(self.screen_height);
        for laser in &mut self.alien_lasers {
            laser.update(self.screen_height);
        }
        self.compact_lasers();
    }

    fn compact_lasers(&mut self) {
        self.spaceship.compact_lasers();
        self.alien_lasers.retain(|l| l.active);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, input: &impl InputSource) {
        if input.close_requested() {
            self.status = GameStatus::Quit;
            return;
        }

        match self.status {
            GameStatus::Quit => return,
            GameStatus::GameOver => {
                if input.is_pressed(Key::Cancel) {
                    self.status = GameStatus::Quit;
                } else if input.is_pressed(Key::Confirm) {
                    self.init_game();
                }
                return;
            }
            GameStatus::LevelUp => {
                if input.is_pressed(Key::Confirm) {
                    self.reset_game();
                    self.init_level();
                }
                return;
            }
            GameStatus::Running => {
                if input.is_down(Key::Left) {
                    self.spaceship.move_left();
                } else if input.is_down(Key::Right) {
                    self.spaceship.move_right(self.screen_width);
                } else if input.is_down(Key::Fire) {
                    let now = self.clock.now();
                    self.spaceship.fire_laser(now, self.audio.as_mut());
                }
            }
            GameStatus::Idle | GameStatus::Paused => {}
        }

        if input.is_pressed(Key::Pause) {
            match self.status {
                GameStatus::Running => self.status = GameStatus::Paused,
                GameStatus::Paused => self.status = GameStatus::Running,
                _ => {}
            }
        }

        if input.is_pressed(Key::MuteMusic) {
            self.mute_music = !self.mute_music;
            if self.mute_music {
                self.audio.pause_music(&self.assets.music);
            } else {
                self.audio.resume_music(&self.assets.music);
            }
        }

        if input.is_pressed(Key::MuteSfx) {
            self.mute_sfx = !self.mute_sfx;
            self.spaceship.mute = self.mute_sfx;
        }
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        display::render(self, renderer);
    }
}

/// Lasers against every block of every obstacle.  A hit switches off both.
fn shoot_obstacles(lasers: &mut [Laser], obstacles: &mut [Obstacle]) {
    for laser in lasers.iter_mut() {
        for obstacle in obstacles.iter_mut() {
            let mut hit = false;
            for block in &mut obstacle.blocks {
                if laser.rect().overlaps(&block.rect()) {
                    block.active = false;
                    laser.active = false;
                    hit = true;
                }
            }
            if hit {
                obstacle.compact();
            }
        }
    }
}

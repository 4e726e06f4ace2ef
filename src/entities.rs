/// Gameplay entities.  Each one knows its own hitbox and how to move itself;
/// everything that involves two entities at once lives in `compute`.

use rand::Rng;

use crate::constants::*;
use crate::platform::{AudioDevice, Rect, Sound, Texture, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Before the first level has been set up.
    Idle,
    Running,
    Paused,
    LevelUp,
    GameOver,
    /// Terminal.  The host loop stops once it sees this.
    Quit,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A laser bolt.  Negative speed travels up the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub position: Vec2,
    pub speed: f32,
    pub active: bool,
}

impl Laser {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Laser { position: Vec2::new(x, y), speed, active: true }
    }

    pub fn rect(&self) -> Rect {
        if self.active {
            Rect::new(self.position.x, self.position.y, LASER_WIDTH, LASER_HEIGHT)
        } else {
            Rect::empty_at(self.position)
        }
    }

    /// Advance one frame; leaving the play band switches the laser off.
    pub fn update(&mut self, screen_height: f32) {
        if !self.active {
            return;
        }
        self.position.y += self.speed;
        if self.position.y > screen_height - LASER_BOTTOM_GAP || self.position.y < LASER_TOP_LIMIT {
            self.active = false;
        }
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub position: Vec2,
    pub active: bool,
}

impl Block {
    pub fn new(x: f32, y: f32) -> Self {
        Block { position: Vec2::new(x, y), active: true }
    }

    pub fn rect(&self) -> Rect {
        if self.active {
            Rect::new(self.position.x, self.position.y, BLOCK_SIZE, BLOCK_SIZE)
        } else {
            Rect::empty_at(self.position)
        }
    }
}

/// Shield outline, one character per block.
const OBSTACLE_GRID: [&str; 13] = [
    ".....#############.....",
    "....###############....",
    "...#################...",
    "..###################..",
    ".#####################.",
    "#######################",
    "#######################",
    "#######################",
    "#######################",
    "#######################",
    "######...........######",
    "#####.............#####",
    "####...............####",
];

/// A defensive wall.  Blocks are removed one by one as they are hit; an
/// obstacle with no blocks left simply draws nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub blocks: Vec<Block>,
}

impl Obstacle {
    pub fn new(x: f32, y: f32) -> Self {
        let blocks = OBSTACLE_GRID
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.bytes().enumerate().filter(|(_, cell)| *cell == b'#').map(move |(col, _)| {
                    Block::new(x + col as f32 * BLOCK_SIZE, y + row as f32 * BLOCK_SIZE)
                })
            })
            .collect();
        Obstacle { position: Vec2::new(x, y), blocks }
    }

    /// Width of every obstacle in world units.
    pub fn width() -> f32 {
        OBSTACLE_GRID[0].len() as f32 * BLOCK_SIZE
    }

    /// Drop blocks that were switched off.
    pub fn compact(&mut self) {
        self.blocks.retain(|b| b.active);
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    /// 1, 2 or 3; also the point multiplier.
    pub alien_type: u32,
    pub position: Vec2,
    pub texture: Texture,
    pub active: bool,
}

impl Alien {
    pub fn new(alien_type: u32, texture: Texture, x: f32, y: f32) -> Self {
        Alien { alien_type, position: Vec2::new(x, y), texture, active: true }
    }

    pub fn rect(&self) -> Rect {
        if self.active {
            Rect::new(self.position.x, self.position.y, self.texture.width, self.texture.height)
        } else {
            Rect::empty_at(self.position)
        }
    }

    pub fn score(&self) -> u32 {
        self.alien_type * POINTS_PER_ALIEN_TYPE
    }

    pub fn update(&mut self, direction: i32) {
        self.position.x += direction as f32;
    }
}

/// The bonus saucer.  There is only ever one; it is switched on and off
/// rather than created and destroyed.
#[derive(Clone, Debug, PartialEq)]
pub struct MysteryShip {
    pub texture: Texture,
    pub position: Vec2,
    pub speed: f32,
    pub alive: bool,
}

impl MysteryShip {
    pub fn new(texture: Texture) -> Self {
        MysteryShip { texture, position: Vec2::default(), speed: 0.0, alive: false }
    }

    pub fn rect(&self) -> Rect {
        if self.alive {
            Rect::new(self.position.x, self.position.y, self.texture.width, self.texture.height)
        } else {
            Rect::empty_at(self.position)
        }
    }

    /// Enter from a random side.
    pub fn spawn(&mut self, rng: &mut impl Rng, screen_width: f32) {
        self.position.y = MYSTERY_SHIP_Y;
        if rng.gen_bool(0.5) {
            self.position.x = WALL_MARGIN;
            self.speed = MYSTERY_SHIP_SPEED;
        } else {
            self.position.x = screen_width - self.texture.width - WALL_MARGIN;
            self.speed = -MYSTERY_SHIP_SPEED;
        }
        self.alive = true;
    }

    /// Fly one step; crossing either wall ends the pass unscored.
    pub fn update(&mut self, screen_width: f32) {
        if !self.alive {
            return;
        }
        self.position.x += self.speed;
        if self.position.x > screen_width - self.texture.width - WALL_MARGIN
            || self.position.x < WALL_MARGIN
        {
            self.alive = false;
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Spaceship {
    pub texture: Texture,
    pub position: Vec2,
    pub lasers: Vec<Laser>,
    /// Clock time of the last shot, `None` until the first one.
    pub last_fire: Option<f64>,
    pub laser_sound: Sound,
    pub mute: bool,
}

impl Spaceship {
    pub fn new(texture: Texture, laser_sound: Sound, screen_width: f32, screen_height: f32) -> Self {
        let mut ship = Spaceship {
            texture,
            position: Vec2::default(),
            lasers: Vec::new(),
            last_fire: None,
            laser_sound,
            mute: false,
        };
        ship.reset(screen_width, screen_height);
        ship
    }

    /// Back to the bottom-centre start position with no lasers in flight.
    pub fn reset(&mut self, screen_width: f32, screen_height: f32) {
        self.position.x = (screen_width - self.texture.width) / 2.0;
        self.position.y = screen_height - self.texture.height - SPACESHIP_BOTTOM_GAP;
        self.lasers.clear();
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.texture.width, self.texture.height)
    }

    pub fn move_left(&mut self) {
        self.position.x = (self.position.x - SPACESHIP_STEP).max(WALL_MARGIN);
    }

    pub fn move_right(&mut self, screen_width: f32) {
        let max_x = screen_width - self.texture.width - WALL_MARGIN;
        self.position.x = (self.position.x + SPACESHIP_STEP).min(max_x);
    }

    /// Shoot if the cooldown has run out.  Returns whether a laser was made.
    pub fn fire_laser(&mut self, now: f64, audio: &mut dyn AudioDevice) -> bool {
        if let Some(last) = self.last_fire {
            if now - last < SPACESHIP_FIRE_INTERVAL {
                return false;
            }
        }
        if !self.mute {
            audio.play_sound(&self.laser_sound);
        }
        let x = self.position.x + self.texture.width / 2.0 - LASER_WIDTH / 2.0;
        self.lasers.push(Laser::new(x, self.position.y, SPACESHIP_LASER_SPEED));
        self.last_fire = Some(now);
        true
    }

    pub fn update_lasers(&mut self, screen_height: f32) {
        for laser in &mut self.lasers {
            laser.update(screen_height);
        }
    }

    pub fn compact_lasers(&mut self) {
        self.lasers.retain(|l| l.active);
    }
}

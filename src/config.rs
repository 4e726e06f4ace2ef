/// Process-wide settings, fixed at startup.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{MUSIC_VOLUME, SCREEN_HEIGHT, SCREEN_WIDTH, TARGET_FPS};

pub const SCORE_FILE_VAR: &str = "INVADERS_SCORE_FILE";
pub const LOG_FILE_VAR: &str = "INVADERS_LOG_FILE";
/// Read by the log filter, not by `Config`.
pub const LOG_FILTER_VAR: &str = "INVADERS_LOG";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub screen_width: f32,
    pub screen_height: f32,
    pub target_fps: u32,
    pub music_volume: f32,
    /// Overrides the per-user high-score location.
    pub score_file: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            target_fps: TARGET_FPS,
            music_volume: MUSIC_VOLUME,
            score_file: None,
            log_file: std::env::temp_dir().join("invaders.log"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var_os(key))
    }

    /// Apply overrides from any key/value source.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        if let Some(path) = lookup(SCORE_FILE_VAR).filter(|v| !v.is_empty()) {
            self.score_file = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(LOG_FILE_VAR).filter(|v| !v.is_empty()) {
            self.log_file = PathBuf::from(path);
        }
        self
    }

    /// Minimum wall time per frame at the target rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.target_fps.max(1)))
    }
}

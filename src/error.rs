use std::path::PathBuf;

use thiserror::Error;

/// Startup-time failure to resolve an asset.  Gameplay cannot continue.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unknown {kind} asset: {name}")]
    Unknown { kind: &'static str, name: String },
    #[error("failed to load {name}: {reason}")]
    Load { name: String, reason: String },
}

/// Failure to read or write the high-score file.  Always recovered from.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no per-user config directory available")]
    NoConfigDir,
    #[error("high-score file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high-score file {} does not hold a number: {contents:?}", .path.display())]
    Parse { path: PathBuf, contents: String },
}

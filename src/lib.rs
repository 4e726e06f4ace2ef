//! Simulation core of a fixed-formation arcade shooter.
//!
//! `compute::GameSession` owns every entity and is driven by a host loop that
//! calls `handle_input`, `update` and `render` once per frame.  Everything the
//! session needs from the outside world goes through the traits in
//! `platform`.

pub mod compute;
pub mod config;
pub mod constants;
pub mod display;
pub mod entities;
pub mod error;
pub mod persist;
pub mod platform;

pub use compute::{Assets, GameSession};
pub use entities::GameStatus;

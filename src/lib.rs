//! Tile-based platformer simulation core.
//!
//! The library owns the model (vectors, actors, levels, the plan parser) and
//! a small driver in `compute`.  Rendering and terminal I/O live in the
//! binary only.

pub mod compute;
pub mod entities;
pub mod error;
pub mod level;
pub mod parser;
pub mod vector;

pub use error::{GameError, Result};

/// Tuning constants shared by the model and the driver.
pub mod consts {
    /// Nominal simulation step (60 ticks per second).
    pub const FRAME_STEP: f64 = 1.0 / 60.0;
    /// Largest dt a single tick may integrate.
    pub const MAX_STEP: f64 = 0.05;
    /// Initial value of `Level::finish_delay`.
    pub const FINISH_DELAY: f64 = 1.0;

    // ── Actor geometry ───────────────────────────────────────────────────────

    pub const PLAYER_SIZE: (f64, f64) = (0.8, 1.5);
    /// Player sprite is taller than one cell, so it is lifted half a cell.
    pub const PLAYER_OFFSET: (f64, f64) = (0.0, -0.5);
    pub const COIN_SIZE: (f64, f64) = (0.6, 0.6);
    pub const COIN_OFFSET: (f64, f64) = (0.2, 0.1);

    // ── Motion ───────────────────────────────────────────────────────────────

    pub const HORIZONTAL_FIREBALL_SPEED: (f64, f64) = (2.0, 0.0);
    pub const VERTICAL_FIREBALL_SPEED: (f64, f64) = (0.0, 2.0);
    pub const FIRE_RAIN_SPEED: (f64, f64) = (0.0, 3.0);
    pub const COIN_SPRING_SPEED: f64 = 8.0;
    pub const COIN_SPRING_DIST: f64 = 0.07;
}

//! Molecule Snap - drag atoms together until they bond into the target molecule
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, contacts, bonding, completion)
//! - `input`: Pointer mapping and hit-testing
//! - `game`: Level session driving one frame at a time
//! - `elements` / `levels`: Static content tables
//! - `settings`: Data-driven physics tuning
//! - `facts`: Best-effort molecule fact lookup

pub mod elements;
pub mod facts;
pub mod game;
pub mod input;
pub mod levels;
pub mod settings;
pub mod sim;

pub use elements::{ElementDef, ElementKind};
pub use game::{Game, GameEvent};
pub use levels::{Level, LevelPack};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Internal simulation resolution (the canvas is scaled to fit on screen)
    pub const INTERNAL_WIDTH: f32 = 800.0;
    pub const INTERNAL_HEIGHT: f32 = 500.0;

    /// Simulation clock advance per frame (drives the ambient float phase)
    pub const FRAME_TIME_STEP: f32 = 0.02;

    /// Radius of the circle atoms are spread on when a level loads
    pub const SPAWN_SPREAD: f32 = 120.0;
    /// Full width of the random offset added to each spawn position
    pub const SPAWN_JITTER: f32 = 60.0;

    /// Grab tolerance: press hits when dist² < radius² * this
    pub const GRAB_TOLERANCE: f32 = 2.0;
}

/// Center of the internal canvas
#[inline]
pub fn canvas_center() -> Vec2 {
    Vec2::new(consts::INTERNAL_WIDTH / 2.0, consts::INTERNAL_HEIGHT / 2.0)
}

/// Convert polar (r, theta) to cartesian (x, y) around `origin`
#[inline]
pub fn polar_offset(origin: Vec2, r: f32, theta: f32) -> Vec2 {
    origin + Vec2::new(r * theta.cos(), r * theta.sin())
}

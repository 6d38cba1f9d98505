//! Hexcavate - a hexagonal-grid mining and building sandbox
//!
//! Core modules:
//! - `sim`: Simulation (tiles, spatial index, world generation, collision, mining/placement)
//! - `persistence`: Save/load of the world and player through a versioned JSON envelope
//! - `session`: World lifecycle (load or generate, save, reset)
//! - `settings`: Data-driven tuning loaded from disk
//! - `error`: Error taxonomy shared by the modules above

pub mod error;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PersistenceError};
pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (one step per rendered frame)
    pub const STEPS_PER_SECOND: u32 = 60;

    /// Hexagon edge length (== circumradius for a regular hexagon)
    pub const HEX_SIZE: f32 = 30.0;

    /// Durability every tile starts with
    pub const MAX_DURABILITY: f32 = 100.0;
    /// Leftover durability, as a fraction of the last hit, that still breaks a tile
    pub const BREAK_TOLERANCE: f64 = 1e-9;

    /// Per-step physics, in world units per step
    pub const GRAVITY: f32 = 0.5;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const JUMP_SPEED: f32 = 12.0;
    pub const FRICTION: f32 = 0.8;

    /// Player body
    pub const BODY_RADIUS: f32 = 15.0;

    /// Interaction
    pub const MINING_RANGE: f32 = 100.0;
    pub const MINING_DAMAGE: f32 = 5.0;
    /// Particles suggested to the effects layer per broken tile
    pub const BREAK_PARTICLES: u32 = 10;

    /// Landing band around a tile's top surface (above, below)
    pub const LANDING_ABOVE: f32 = 10.0;
    pub const LANDING_BELOW: f32 = 15.0;
}

/// Horizontal distance between adjacent hex centers in a row
#[inline]
pub fn hex_width(size: f32) -> f32 {
    3f32.sqrt() * size
}

/// Vertical distance between hex rows (3/4 of the pointy-top height)
#[inline]
pub fn hex_v_spacing(size: f32) -> f32 {
    2.0 * size * 0.75
}

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Grow every side by `margin`
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

//! Engine settings and tuning
//!
//! Stored as JSON next to the save file; missing or unreadable settings fall
//! back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{GridLayout, WorldBounds};
use crate::{hex_v_spacing, hex_width};

/// Per-step movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Added to vertical velocity every step
    pub gravity: f32,
    /// Horizontal velocity while a direction is held
    pub move_speed: f32,
    /// Upward velocity set by a jump
    pub jump_speed: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub friction: f32,
    /// Radius of the tile query around the body each step
    pub query_radius: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: PLAYER_SPEED,
            jump_speed: JUMP_SPEED,
            friction: FRICTION,
            query_radius: 500.0,
        }
    }
}

/// Mining and placement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Max distance from body to a mined tile or placement point
    pub range: f32,
    /// Damage per mining tick, before hardness
    pub damage: f32,
    /// Particles suggested per broken tile
    pub break_particles: u32,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            range: MINING_RANGE,
            damage: MINING_DAMAGE,
            break_particles: BREAK_PARTICLES,
        }
    }
}

/// World shape and generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldShape {
    pub tile_size: f32,
    /// Generated rows, counted down from the ground line
    pub rows: i32,
    /// Generated columns
    pub cols: i32,
    /// y of the first (turf) row's centers
    pub ground_y: f32,
    /// Horizontal extent of the playable area
    pub width: f32,
    /// Vertical extent of the playable area
    pub height: f32,
    /// Fixed seed; a random one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldShape {
    fn default() -> Self {
        let width = hex_width(HEX_SIZE);
        Self {
            tile_size: HEX_SIZE,
            rows: 2000,
            cols: (1000.0 / width) as i32 + 2,
            ground_y: 600.0,
            width: 5000.0,
            height: 50.0 * hex_v_spacing(HEX_SIZE) + 800.0,
            seed: None,
        }
    }
}

/// All engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub physics: Physics,
    pub interaction: Interaction,
    pub world: WorldShape,
    pub body_radius: f32,
    /// How far above the ground line a fresh body appears
    pub spawn_height: f32,
    /// Viewport size in world units
    pub viewport: Vec2,
    /// Where the world is saved
    pub save_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            interaction: Interaction::default(),
            world: WorldShape::default(),
            body_radius: BODY_RADIUS,
            spawn_height: 100.0,
            viewport: Vec2::new(1200.0, 800.0),
            save_path: PathBuf::from("world.json"),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "hexcavate.json";

    pub fn layout(&self) -> GridLayout {
        GridLayout::with_ground(self.world.ground_y, self.world.tile_size)
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.world.width,
            height: self.world.height,
        }
    }

    /// Where a fresh body appears: mid-viewport, above the ground line
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(
            (self.viewport.x * 0.5).floor(),
            self.world.ground_y - self.spawn_height,
        )
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.rows <= 0 || self.world.cols <= 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.world.rows,
                cols: self.world.cols,
            });
        }
        let positive = [
            ("world.tile_size", self.world.tile_size),
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("body_radius", self.body_radius),
            ("interaction.range", self.interaction.range),
            ("interaction.damage", self.interaction.damage),
            ("physics.query_radius", self.physics.query_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.physics.friction) {
            return Err(ConfigError::InvalidSetting {
                name: "physics.friction",
                reason: format!("must be within [0, 1], got {}", self.physics.friction),
            });
        }
        Ok(())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

//! Hexagonal tile geometry and durability
//!
//! Tiles are pointy-top hexagons in screen-style coordinates (y grows
//! downward). Corner `i` sits at angle `30° + 60°·i` from the center, so
//! corners 3, 4 and 5 form the upper-left, top and upper-right of the tile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BREAK_TOLERANCE, MAX_DURABILITY};

/// RGB color consumed by the render collaborator
pub type Rgb = [u8; 3];

/// Tile materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Soil,
    Rock,
    Ore,
    Turf,
}

impl Material {
    /// Every material, in inventory slot order (slot 1..=4)
    pub const ALL: [Material; 4] = [Material::Soil, Material::Rock, Material::Ore, Material::Turf];

    /// Mining damage is divided by this
    pub fn hardness(&self) -> f32 {
        match self {
            Material::Soil => 1.0,
            Material::Rock => 2.0,
            Material::Ore => 3.0,
            Material::Turf => 1.0,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Material::Soil => [139, 90, 43],
            Material::Rock => [169, 169, 169],
            Material::Ore => [255, 215, 0],
            Material::Turf => [100, 200, 100],
        }
    }

    /// Color shown while the tile is under the cursor and in reach
    pub fn highlight_color(&self) -> Rgb {
        self.color().map(|c| c.saturating_add(30))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Soil => "Soil",
            Material::Rock => "Rock",
            Material::Ore => "Ore",
            Material::Turf => "Turf",
        }
    }

    /// Material bound to a 1-based selection slot
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1..=4 => Some(Self::ALL[slot as usize - 1]),
            _ => None,
        }
    }
}

/// One world cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TileRecord", into = "TileRecord")]
pub struct HexTile {
    center: Vec2,
    size: f32,
    material: Material,
    /// Kept in f64 so long runs of fractional hits do not drift
    durability: f64,
    /// Cached from (center, size), which never change after construction
    corners: [Vec2; 6],
}

/// Persisted form of a tile; corners are rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TileRecord {
    center: Vec2,
    size: f32,
    material: Material,
    durability: f64,
}

impl From<TileRecord> for HexTile {
    fn from(r: TileRecord) -> Self {
        let mut tile = HexTile::new(r.center, r.size, r.material);
        tile.durability = r.durability.clamp(0.0, f64::from(MAX_DURABILITY));
        tile
    }
}

impl From<HexTile> for TileRecord {
    fn from(t: HexTile) -> Self {
        Self {
            center: t.center,
            size: t.size,
            material: t.material,
            durability: t.durability,
        }
    }
}

impl HexTile {
    pub fn new(center: Vec2, size: f32, material: Material) -> Self {
        Self {
            center,
            size,
            material,
            durability: f64::from(MAX_DURABILITY),
            corners: compute_corners(center, size),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    #[inline]
    pub fn durability(&self) -> f32 {
        self.durability as f32
    }

    /// Remaining durability in [0, 1], drives the crack overlay
    pub fn durability_ratio(&self) -> f32 {
        (self.durability() / MAX_DURABILITY).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn corners(&self) -> &[Vec2; 6] {
        &self.corners
    }

    pub fn is_broken(&self) -> bool {
        self.durability <= 0.0
    }

    /// Apply mining damage scaled by hardness. Returns true once broken.
    ///
    /// Breaks after exactly `ceil(100 * hardness / amount)` equal hits.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let hit = f64::from(amount) / f64::from(self.material.hardness());
        self.durability -= hit;
        if self.durability <= hit.abs() * BREAK_TOLERANCE {
            self.durability = 0.0;
        }
        self.is_broken()
    }

    /// Height of the top surface at horizontal position `x`.
    ///
    /// Piecewise-linear through the upper-left, top and upper-right corners.
    /// `None` outside that horizontal span.
    pub fn top_surface_y(&self, x: f32) -> Option<f32> {
        let left = self.corners[3];
        let top = self.corners[4];
        let right = self.corners[5];

        if left.x <= x && x <= top.x {
            Some(lerp_y(left, top, x))
        } else if top.x <= x && x <= right.x {
            Some(lerp_y(top, right, x))
        } else {
            None
        }
    }

    /// Whether `target` points at this tile and `reach_from` is close enough to touch it
    pub fn is_targeted(&self, target: Vec2, reach_from: Vec2, reach: f32) -> bool {
        let hex_radius = self.size * 0.866;
        target.distance_squared(self.center) < hex_radius * hex_radius
            && reach_from.distance_squared(self.center) < reach * reach
    }
}

fn compute_corners(center: Vec2, size: f32) -> [Vec2; 6] {
    std::array::from_fn(|i| {
        let angle = (30.0 + 60.0 * i as f32).to_radians();
        center + Vec2::new(angle.cos(), angle.sin()) * size
    })
}

fn lerp_y(a: Vec2, b: Vec2, x: f32) -> f32 {
    if a.x == b.x {
        return a.y;
    }
    let t = (x - a.x) / (b.x - a.x);
    a.y + t * (b.y - a.y)
}

//! Procedural world generation
//!
//! Fills a rectangular block of lattice cells with layered terrain. Output is
//! a pure function of the dimensions, layout and RNG stream.

use rand::Rng;

use super::index::{CellCoord, SpatialIndex};
use super::tile::{HexTile, Material};
use crate::error::ConfigError;

/// Chance that a deep tile is ore instead of rock
pub const ORE_CHANCE: f64 = 0.2;

/// Rectangular terrain generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldGenerator {
    rows: i32,
    cols: i32,
}

impl WorldGenerator {
    /// Rejects empty or negative regions up front, so generation never runs partially
    pub fn new(rows: i32, cols: i32) -> Result<Self, ConfigError> {
        if rows <= 0 || cols <= 0 {
            return Err(ConfigError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Material for a tile in `row`, drawing from `rng` only below the fixed strata
    pub fn material_for_row<R: Rng>(row: i32, rng: &mut R) -> Material {
        match row {
            0 => Material::Turf,
            1..=2 => Material::Soil,
            3..=5 => Material::Rock,
            _ => {
                if rng.random_bool(ORE_CHANCE) {
                    Material::Ore
                } else {
                    Material::Rock
                }
            }
        }
    }

    /// Insert every tile of the region into `index`, row by row. Returns the count inserted.
    pub fn populate<R: Rng>(&self, index: &mut SpatialIndex, rng: &mut R) -> usize {
        let layout = *index.layout();
        let mut count = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let material = Self::material_for_row(row, rng);
                let center = layout.center_of(CellCoord::new(col, row));
                index.insert(HexTile::new(center, layout.tile_size, material));
                count += 1;
            }
        }
        log::info!(
            "Generated {} tiles ({} rows x {} cols)",
            count,
            self.rows,
            self.cols
        );
        count
    }
}

//! Spatial hash over the tile world
//!
//! Two key spaces share one logical tile set:
//! - grid-aligned tiles, keyed by the integer cell their center floors into
//! - free-placed tiles, keyed by a synthetic id and scanned linearly
//!
//! Radius queries only visit the grid cells covering the query square, so
//! their cost tracks the query area plus the free-placed count, never the
//! total number of grid tiles.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::HexTile;
use crate::{hex_v_spacing, hex_width};

/// Integer grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub col: i32,
    pub row: i32,
}

impl CellCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Synthetic id of a free-placed tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FreeId(pub u64);

/// Identity of a tile inside the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKey {
    Grid(CellCoord),
    Free(FreeId),
}

/// Procedural hex lattice and the floor-division mapping from world space to cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// World position of cell (0, 0)'s top-left corner
    pub origin: Vec2,
    pub tile_size: f32,
    /// Horizontal cell extent (hex bounding width)
    pub width: f32,
    /// Vertical cell extent (row spacing)
    pub v_spacing: f32,
}

/// Max distance between a center and its lattice point to count as grid-aligned
const LATTICE_TOLERANCE: f32 = 1e-2;

impl GridLayout {
    pub fn new(origin: Vec2, tile_size: f32) -> Self {
        Self {
            origin,
            tile_size,
            width: hex_width(tile_size),
            v_spacing: hex_v_spacing(tile_size),
        }
    }

    /// Layout whose row 0 is centered on `ground_y`.
    ///
    /// Even rows start half a width left of x = 0.
    pub fn with_ground(ground_y: f32, tile_size: f32) -> Self {
        let width = hex_width(tile_size);
        let v_spacing = hex_v_spacing(tile_size);
        Self::new(Vec2::new(-0.75 * width, ground_y - 0.5 * v_spacing), tile_size)
    }

    /// Cell containing `p`, by floor-division
    pub fn cell_of(&self, p: Vec2) -> CellCoord {
        let local = p - self.origin;
        CellCoord {
            col: (local.x / self.width).floor() as i32,
            row: (local.y / self.v_spacing).floor() as i32,
        }
    }

    /// Center of the lattice tile generated for `cell`.
    ///
    /// Odd rows shift half a width right (brick offset). Centers sit inside
    /// their own cell, a quarter width from its edge, so `cell_of` maps them back.
    pub fn center_of(&self, cell: CellCoord) -> Vec2 {
        let shift = if cell.row.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        self.origin
            + Vec2::new(
                (cell.col as f32 + 0.25 + shift) * self.width,
                (cell.row as f32 + 0.5) * self.v_spacing,
            )
    }

    /// Cell whose lattice point is `p`, if `p` is on the lattice
    pub fn snap(&self, p: Vec2) -> Option<CellCoord> {
        let cell = self.cell_of(p);
        (self.center_of(cell).distance_squared(p) <= LATTICE_TOLERANCE * LATTICE_TOLERANCE)
            .then_some(cell)
    }
}

/// Borrowed view of one query hit. Holding it freezes the index.
#[derive(Debug, Clone, Copy)]
pub struct TileRef<'a> {
    pub key: TileKey,
    pub tile: &'a HexTile,
}

/// Inclusive bounding box of every cell ever occupied
#[derive(Debug, Clone, Copy)]
struct CellBounds {
    min: CellCoord,
    max: CellCoord,
}

impl CellBounds {
    fn single(c: CellCoord) -> Self {
        Self { min: c, max: c }
    }

    fn include(&mut self, c: CellCoord) {
        self.min.col = self.min.col.min(c.col);
        self.min.row = self.min.row.min(c.row);
        self.max.col = self.max.col.max(c.col);
        self.max.row = self.max.row.max(c.row);
    }
}

/// Sparse tile storage with radius queries
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    layout: GridLayout,
    grid: HashMap<CellCoord, HexTile>,
    free: BTreeMap<FreeId, HexTile>,
    next_free_id: u64,
    /// Never shrinks; only used to clip query ranges
    occupied: Option<CellBounds>,
}

impl SpatialIndex {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            grid: HashMap::new(),
            free: BTreeMap::new(),
            next_free_id: 1,
            occupied: None,
        }
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Insert at the tile's lattice cell if it has one, else under a fresh synthetic key.
    ///
    /// A grid insert replaces whatever occupied the cell.
    pub fn insert(&mut self, tile: HexTile) -> TileKey {
        match self.layout.snap(tile.center()) {
            Some(cell) => {
                self.insert_grid(cell, tile);
                TileKey::Grid(cell)
            }
            None => self.insert_free(tile),
        }
    }

    /// Insert under a fresh synthetic key, even when the center is a lattice point
    pub fn insert_free(&mut self, tile: HexTile) -> TileKey {
        let id = FreeId(self.next_free_id);
        self.next_free_id += 1;
        self.free.insert(id, tile);
        TileKey::Free(id)
    }

    /// Re-insert a tile under a known key (used when restoring a save).
    ///
    /// A grid key is kept only if it is the cell the tile's center snaps to, and
    /// a free id only if it is unused; otherwise the tile gets a fresh free key.
    /// Returns the key the tile ended up under.
    pub fn insert_with_key(&mut self, key: TileKey, tile: HexTile) -> TileKey {
        match key {
            TileKey::Grid(cell) if self.layout.snap(tile.center()) == Some(cell) => {
                self.insert_grid(cell, tile);
                key
            }
            TileKey::Free(id) if !self.free.contains_key(&id) => {
                self.next_free_id = self.next_free_id.max(id.0.saturating_add(1));
                self.free.insert(id, tile);
                key
            }
            _ => self.insert_free(tile),
        }
    }

    fn insert_grid(&mut self, cell: CellCoord, tile: HexTile) {
        match &mut self.occupied {
            Some(bounds) => bounds.include(cell),
            None => self.occupied = Some(CellBounds::single(cell)),
        }
        self.grid.insert(cell, tile);
    }

    /// Remove by identity. `None` if nothing was stored under `key`.
    pub fn remove(&mut self, key: TileKey) -> Option<HexTile> {
        match key {
            TileKey::Grid(cell) => self.grid.remove(&cell),
            TileKey::Free(id) => self.free.remove(&id),
        }
    }

    pub fn get(&self, key: TileKey) -> Option<&HexTile> {
        match key {
            TileKey::Grid(cell) => self.grid.get(&cell),
            TileKey::Free(id) => self.free.get(&id),
        }
    }

    pub fn get_mut(&mut self, key: TileKey) -> Option<&mut HexTile> {
        match key {
            TileKey::Grid(cell) => self.grid.get_mut(&cell),
            TileKey::Free(id) => self.free.get_mut(&id),
        }
    }

    pub fn contains(&self, key: TileKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.grid.len() + self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.free.is_empty()
    }

    pub fn grid_len(&self) -> usize {
        self.grid.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.free.clear();
        self.occupied = None;
    }

    /// Every tile, grid cells first (unordered) then free-placed tiles by id
    pub fn iter(&self) -> impl Iterator<Item = TileRef<'_>> {
        self.grid
            .iter()
            .map(|(cell, tile)| TileRef {
                key: TileKey::Grid(*cell),
                tile,
            })
            .chain(self.free.iter().map(|(id, tile)| TileRef {
                key: TileKey::Free(*id),
                tile,
            }))
    }

    /// Tiles whose center lies within `radius + tile.size` of `center` on each axis.
    ///
    /// Conservative: every tile within true distance `radius` is returned, and
    /// some farther ones may be too. Callers do their own exact checks.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<TileRef<'_>> {
        let mut hits = Vec::new();
        let within = |tile: &HexTile| {
            let reach = radius + tile.size();
            let d = (tile.center() - center).abs();
            d.x <= reach && d.y <= reach
        };

        if let Some(bounds) = self.occupied {
            let reach = radius + self.layout.tile_size;
            let lo = self.layout.cell_of(center - Vec2::splat(reach));
            let hi = self.layout.cell_of(center + Vec2::splat(reach));

            // One extra cell each way for keys that floor differently from their centers
            let min_row = lo.row.saturating_sub(1).max(bounds.min.row);
            let max_row = hi.row.saturating_add(1).min(bounds.max.row);
            let min_col = lo.col.saturating_sub(1).max(bounds.min.col);
            let max_col = hi.col.saturating_add(1).min(bounds.max.col);

            for row in min_row..=max_row {
                for col in min_col..=max_col {
                    let cell = CellCoord { col, row };
                    if let Some(tile) = self.grid.get(&cell) {
                        if within(tile) {
                            hits.push(TileRef {
                                key: TileKey::Grid(cell),
                                tile,
                            });
                        }
                    }
                }
            }
        }

        // Free-placed tiles are not grid-indexed
        for (id, tile) in &self.free {
            if within(tile) {
                hits.push(TileRef {
                    key: TileKey::Free(*id),
                    tile,
                });
            }
        }

        hits
    }

    /// Whether any tile center lies within `radius + tile.size` of `center`
    pub fn any_near(&self, center: Vec2, radius: f32) -> bool {
        !self.query_radius(center, radius).is_empty()
    }
}

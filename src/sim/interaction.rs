//! Mining and placement rules
//!
//! Both operate on a world-space target point (the cursor projected into the
//! world) and the body's position, mutating the index and the inventory.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::index::{SpatialIndex, TileKey};
use super::tile::{HexTile, Material};
use crate::settings::Interaction;

/// Signal for the effects collaborator that a tile was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvent {
    pub key: TileKey,
    pub position: Vec2,
    pub material: Material,
    /// Suggested particle count for the break effect
    pub particles: u32,
}

/// Result of one mining tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MineOutcome {
    /// Nothing targetable under the cursor within reach
    Missed,
    /// Tile took damage and survives
    Damaged { key: TileKey, durability: f32 },
    /// Tile was destroyed and credited to the inventory
    Broken(BreakEvent),
}

/// Result of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed(TileKey),
    OutOfRange,
    /// No stock of the selected material; nothing was consumed
    NoStock,
    /// Target already holds a tile; the unit was refunded
    Occupied,
    /// Target overlaps the body; the unit was refunded
    OverlapsBody,
}

impl PlaceOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlaceOutcome::Placed(_))
    }
}

/// Tiles under `target` that the body can reach, in query order
pub fn targeted(index: &SpatialIndex, body: &Body, target: Vec2, range: f32) -> Vec<TileKey> {
    let size = index.layout().tile_size;
    index
        .query_radius(target, size * 2.0)
        .into_iter()
        .filter(|r| r.tile.is_targeted(target, body.pos, range))
        .map(|r| r.key)
        .collect()
}

/// Damage the first targeted tile; break it at zero durability.
///
/// Only one tile is affected per tick.
pub fn mine(
    index: &mut SpatialIndex,
    body: &mut Body,
    target: Vec2,
    tuning: &Interaction,
) -> MineOutcome {
    let Some(key) = targeted(index, body, target, tuning.range).into_iter().next() else {
        return MineOutcome::Missed;
    };
    let Some(tile) = index.get_mut(key) else {
        return MineOutcome::Missed;
    };

    if !tile.take_damage(tuning.damage) {
        return MineOutcome::Damaged {
            key,
            durability: tile.durability(),
        };
    }

    let Some(tile) = index.remove(key) else {
        return MineOutcome::Missed;
    };
    body.inventory.add(tile.material());
    let event = BreakEvent {
        key,
        position: tile.center(),
        material: tile.material(),
        particles: tuning.break_particles,
    };
    log::debug!("Broke {} at {:?}", tile.material().as_str(), tile.center());
    MineOutcome::Broken(event)
}

/// Place one unit of `material` as a free-floating tile centered on `target`.
///
/// Placed tiles always get a synthetic key, even on an empty lattice point.
pub fn place(
    index: &mut SpatialIndex,
    body: &mut Body,
    target: Vec2,
    material: Material,
    tuning: &Interaction,
) -> PlaceOutcome {
    if body.pos.distance_squared(target) > tuning.range * tuning.range {
        return PlaceOutcome::OutOfRange;
    }
    if !body.inventory.remove(material) {
        return PlaceOutcome::NoStock;
    }

    let size = index.layout().tile_size;
    if index.any_near(target, size) {
        body.inventory.add(material);
        return PlaceOutcome::Occupied;
    }

    let min_gap = size + body.radius;
    if body.pos.distance_squared(target) < min_gap * min_gap {
        body.inventory.add(material);
        return PlaceOutcome::OverlapsBody;
    }

    let key = index.insert_free(HexTile::new(target, size, material));
    log::debug!("Placed {} at {:?} as {:?}", material.as_str(), target, key);
    PlaceOutcome::Placed(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::index::{CellCoord, GridLayout};

    fn setup() -> (SpatialIndex, Body) {
        let index = SpatialIndex::new(GridLayout::new(Vec2::ZERO, 30.0));
        let body = Body::new(Vec2::new(0.0, 0.0));
        (index, body)
    }

    #[test]
    fn test_mine_soil_breaks_after_twenty_hits() {
        let (mut index, mut body) = setup();
        let key = index.insert(HexTile::new(Vec2::new(60.0, 3.0), 30.0, Material::Soil));
        let tuning = Interaction::default();
        let target = Vec2::new(60.0, 3.0);

        for _ in 0..19 {
            assert!(matches!(
                mine(&mut index, &mut body, target, &tuning),
                MineOutcome::Damaged { .. }
            ));
        }
        match mine(&mut index, &mut body, target, &tuning) {
            MineOutcome::Broken(event) => {
                assert_eq!(event.key, key);
                assert_eq!(event.material, Material::Soil);
                assert_eq!(event.particles, 10);
            }
            other => panic!("expected break, got {other:?}"),
        }
        assert!(!index.contains(key));
        assert_eq!(body.inventory.count(Material::Soil), 1);
    }

    #[test]
    fn test_mine_out_of_reach_misses() {
        let (mut index, mut body) = setup();
        index.insert(HexTile::new(Vec2::new(150.0, 3.0), 30.0, Material::Soil));
        let outcome = mine(
            &mut index,
            &mut body,
            Vec2::new(150.0, 3.0),
            &Interaction::default(),
        );
        assert_eq!(outcome, MineOutcome::Missed);
    }

    #[test]
    fn test_place_without_stock_is_noop() {
        let (mut index, mut body) = setup();
        let outcome = place(
            &mut index,
            &mut body,
            Vec2::new(70.0, 0.0),
            Material::Ore,
            &Interaction::default(),
        );
        assert_eq!(outcome, PlaceOutcome::NoStock);
        assert!(index.is_empty());
        assert_eq!(body.inventory.total(), 0);
    }

    #[test]
    fn test_place_consumes_and_inserts() {
        let (mut index, mut body) = setup();
        body.inventory.add(Material::Rock);
        let target = Vec2::new(70.0, 5.0);
        let outcome = place(
            &mut index,
            &mut body,
            target,
            Material::Rock,
            &Interaction::default(),
        );
        let PlaceOutcome::Placed(key) = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert!(matches!(key, TileKey::Free(_)));
        assert_eq!(body.inventory.count(Material::Rock), 0);
        let hits = index.query_radius(target, 0.0);
        assert!(hits.iter().any(|h| h.key == key && h.tile.center() == target));
    }

    #[test]
    fn test_place_on_empty_lattice_point_stays_free() {
        let (mut index, mut body) = setup();
        body.inventory.add(Material::Soil);
        let target = index.layout().center_of(CellCoord::new(1, 0));
        let outcome = place(
            &mut index,
            &mut body,
            target,
            Material::Soil,
            &Interaction::default(),
        );
        assert!(matches!(outcome, PlaceOutcome::Placed(TileKey::Free(_))));
        assert_eq!(index.grid_len(), 0);
        assert_eq!(index.free_len(), 1);
    }

    #[test]
    fn test_place_on_occupied_refunds() {
        let (mut index, mut body) = setup();
        index.insert(HexTile::new(Vec2::new(70.0, 0.0), 30.0, Material::Soil));
        body.inventory.add(Material::Turf);
        let outcome = place(
            &mut index,
            &mut body,
            Vec2::new(75.0, 0.0),
            Material::Turf,
            &Interaction::default(),
        );
        assert_eq!(outcome, PlaceOutcome::Occupied);
        assert_eq!(body.inventory.count(Material::Turf), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_place_on_body_refunds() {
        let (mut index, mut body) = setup();
        body.inventory.add(Material::Turf);
        let outcome = place(
            &mut index,
            &mut body,
            Vec2::new(20.0, 0.0),
            Material::Turf,
            &Interaction::default(),
        );
        assert_eq!(outcome, PlaceOutcome::OverlapsBody);
        assert_eq!(body.inventory.count(Material::Turf), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_place_out_of_range() {
        let (mut index, mut body) = setup();
        body.inventory.add(Material::Turf);
        let outcome = place(
            &mut index,
            &mut body,
            Vec2::new(300.0, 0.0),
            Material::Turf,
            &Interaction::default(),
        );
        assert_eq!(outcome, PlaceOutcome::OutOfRange);
        assert_eq!(body.inventory.count(Material::Turf), 1);
    }
}

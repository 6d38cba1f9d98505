//! Circle-vs-hexagon collision for the player body
//!
//! A platformer resolver, not a rigid-body solver: each nearby tile is tested
//! on its own, nearest first, and may nudge the body. Landing snaps onto the
//! tile's top surface; anything else falls back to a radial push-up or a
//! horizontal push-out.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::index::TileRef;
use super::tile::HexTile;
use crate::consts::{LANDING_ABOVE, LANDING_BELOW};

/// How a single tile affected the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Too far away or no overlap
    None,
    /// Snapped onto the top surface
    Landed,
    /// Pushed up out of the tile
    PushedUp,
    /// Pushed sideways out of the tile
    PushedSide,
}

impl Contact {
    pub fn grounds(&self) -> bool {
        matches!(self, Contact::Landed | Contact::PushedUp)
    }
}

/// Fixed rectangular world extents, starting at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

/// Resolve the body against one tile
pub fn resolve_tile(body: &mut Body, tile: &HexTile) -> Contact {
    let offset = body.pos - tile.center();
    let distance_sq = offset.length_squared();

    // Cheap reject
    let max_distance = body.radius + tile.size() * 1.5;
    if distance_sq > max_distance * max_distance {
        return Contact::None;
    }

    // Landing on the top surface
    if let Some(surface_y) = tile.top_surface_y(body.pos.x) {
        let bottom = body.bottom();
        if body.vel.y >= 0.0
            && bottom >= surface_y - LANDING_ABOVE
            && bottom <= surface_y + LANDING_BELOW
        {
            body.pos.y = surface_y - body.radius;
            body.vel.y = 0.0;
            body.grounded = true;
            return Contact::Landed;
        }
    }

    // Penetration fallback
    let reach = body.radius + tile.size() * 0.9;
    if distance_sq < reach * reach {
        if body.pos.y < tile.center().y {
            let overlap = reach - distance_sq.sqrt();
            if overlap > 0.0 {
                body.pos.y -= overlap;
                body.vel.y = 0.0;
                body.grounded = true;
                return Contact::PushedUp;
            }
        }

        if offset.y.abs() < tile.size() * 0.7 {
            let half_width = tile.size() * 0.95 + body.radius;
            body.pos.x = if offset.x > 0.0 {
                tile.center().x + half_width
            } else {
                tile.center().x - half_width
            };
            body.vel.x = 0.0;
            return Contact::PushedSide;
        }
    }

    Contact::None
}

/// Resolve the body against every candidate, nearest center first.
///
/// Nearest-first matters: a near tile's landing must happen before a farther
/// tile's push-out gets a chance to move the body. Returns the number of
/// tiles that touched the body.
pub fn resolve_tiles(body: &mut Body, candidates: &[TileRef<'_>]) -> usize {
    let origin = body.pos;
    let mut sorted: Vec<(f32, &HexTile)> = candidates
        .iter()
        .map(|r| (r.tile.center().distance_squared(origin), r.tile))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut touched = 0;
    for (_, tile) in sorted {
        if resolve_tile(body, tile) != Contact::None {
            touched += 1;
        }
    }
    touched
}

/// Keep the body inside the world. The floor counts as ground.
pub fn clamp_to_bounds(body: &mut Body, bounds: &WorldBounds) {
    if body.pos.x - body.radius < 0.0 {
        body.pos.x = body.radius;
        body.vel.x = 0.0;
    }
    if body.pos.x + body.radius > bounds.width {
        body.pos.x = bounds.width - body.radius;
        body.vel.x = 0.0;
    }
    if body.pos.y - body.radius < 0.0 {
        body.pos.y = body.radius;
        body.vel.y = body.vel.y.max(0.0);
    }
    if body.pos.y + body.radius > bounds.height {
        body.pos.y = bounds.height - body.radius;
        body.vel.y = 0.0;
        body.grounded = true;
    }
}

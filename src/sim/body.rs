//! The player body and its inventory

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::Material;
use crate::consts::BODY_RADIUS;

/// Block counts per material. Every material is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Material, u32>", into = "BTreeMap<Material, u32>")]
pub struct Inventory {
    counts: [u32; 4],
}

impl From<BTreeMap<Material, u32>> for Inventory {
    fn from(map: BTreeMap<Material, u32>) -> Self {
        let mut inv = Inventory::default();
        for (material, count) in map {
            inv.counts[slot(material)] = count;
        }
        inv
    }
}

impl From<Inventory> for BTreeMap<Material, u32> {
    fn from(inv: Inventory) -> Self {
        Material::ALL.iter().map(|&m| (m, inv.count(m))).collect()
    }
}

#[inline]
fn slot(material: Material) -> usize {
    match material {
        Material::Soil => 0,
        Material::Rock => 1,
        Material::Ore => 2,
        Material::Turf => 3,
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, material: Material) -> u32 {
        self.counts[slot(material)]
    }

    pub fn add(&mut self, material: Material) {
        let c = &mut self.counts[slot(material)];
        *c = c.saturating_add(1);
    }

    /// Take one unit. False (and unchanged) when the count is zero.
    pub fn remove(&mut self, material: Material) -> bool {
        let c = &mut self.counts[slot(material)];
        if *c == 0 {
            return false;
        }
        *c -= 1;
        true
    }

    /// (material, count) in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Material, u32)> + '_ {
        Material::ALL.iter().map(|&m| (m, self.count(m)))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

/// The single moving circle resolved against the tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    #[serde(default)]
    pub grounded: bool,
    pub inventory: Inventory,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BODY_RADIUS,
            grounded: false,
            inventory: Inventory::new(),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Lowest point of the circle (y grows downward)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Launch upward if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel.y = -speed;
        self.grounded = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_never_negative() {
        let mut inv = Inventory::new();
        assert!(!inv.remove(Material::Ore));
        assert_eq!(inv.count(Material::Ore), 0);

        inv.add(Material::Ore);
        assert!(inv.remove(Material::Ore));
        assert!(!inv.remove(Material::Ore));
        assert_eq!(inv.total(), 0);
    }

    #[test]
    fn test_inventory_lists_all_materials() {
        let mut inv = Inventory::new();
        inv.add(Material::Turf);
        let listed: Vec<_> = inv.iter().collect();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[3], (Material::Turf, 1));
    }

    #[test]
    fn test_inventory_fills_missing_materials_on_load() {
        let inv: Inventory = serde_json::from_str(r#"{"rock": 3}"#).unwrap();
        assert_eq!(inv.count(Material::Rock), 3);
        assert_eq!(inv.count(Material::Soil), 0);

        let json = serde_json::to_string(&inv).unwrap();
        assert!(json.contains("\"turf\":0"));
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut body = Body::new(Vec2::ZERO);
        assert!(!body.jump(12.0));
        assert_eq!(body.vel.y, 0.0);

        body.grounded = true;
        assert!(body.jump(12.0));
        assert_eq!(body.vel.y, -12.0);
        assert!(!body.grounded);
    }
}

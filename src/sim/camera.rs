//! Viewport that follows the body
//!
//! Maps screen-space cursor positions into world space and bounds the region
//! the render collaborator needs tiles for.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::WorldBounds;
use crate::Region;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub offset: Vec2,
    /// Viewport size in world units
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
        }
    }

    /// Center on `target`, clamped so the viewport stays inside the world
    pub fn follow(&mut self, target: Vec2, bounds: &WorldBounds) {
        let desired = target - self.viewport * 0.5;
        let max = (Vec2::new(bounds.width, bounds.height) - self.viewport).max(Vec2::ZERO);
        self.offset = desired.clamp(Vec2::ZERO, max);
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    pub fn visible_region(&self) -> Region {
        Region::new(self.offset, self.offset + self.viewport)
    }
}

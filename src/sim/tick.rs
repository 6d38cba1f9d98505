//! Fixed-step simulation tick
//!
//! One call advances the engine by one rendered frame: intents, movement,
//! tile collision, world bounds, hover, mining, then placement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{WorldBounds, clamp_to_bounds, resolve_tiles};
use super::index::SpatialIndex;
use super::interaction;
use super::state::Engine;
use super::tile::Material;
use crate::settings::Physics;

/// Horizontal movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

/// Input for a single tick. Points are in world space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held direction
    pub movement: MoveIntent,
    /// Jump trigger (one-shot)
    pub jump: bool,
    /// Mine button held
    pub mine: bool,
    /// Cursor in world space, drives hover and mining
    pub cursor: Option<Vec2>,
    /// Place trigger at a target point (one-shot)
    pub place: Option<Vec2>,
    /// Material selection (one-shot)
    pub select: Option<Material>,
}

impl TickInput {
    /// Drop the one-shot triggers after they have been consumed
    pub fn clear_triggers(&mut self) {
        self.jump = false;
        self.place = None;
        self.select = None;
    }
}

/// Apply movement intent, gravity and integration, then resolve against the world
pub fn integrate_body(
    body: &mut Body,
    movement: MoveIntent,
    index: &SpatialIndex,
    bounds: &WorldBounds,
    physics: &Physics,
) {
    match movement {
        MoveIntent::Left => body.vel.x = -physics.move_speed,
        MoveIntent::Right => body.vel.x = physics.move_speed,
        MoveIntent::None => body.vel.x *= physics.friction,
    }

    body.vel.y += physics.gravity;
    body.pos += body.vel;

    body.grounded = false;
    let candidates = index.query_radius(body.pos, physics.query_radius);
    resolve_tiles(body, &candidates);
    clamp_to_bounds(body, bounds);
}

/// Advance the engine by one step
pub fn tick(state: &mut Engine, input: &TickInput) {
    if let Some(material) = input.select {
        state.select(material);
    }

    if input.jump {
        let jump_speed = state.settings().physics.jump_speed;
        state.body_mut().jump(jump_speed);
    }

    state.step_physics(input.movement);

    match input.cursor {
        Some(cursor) => {
            let hovered = interaction::targeted(
                state.index(),
                state.body(),
                cursor,
                state.settings().interaction.range,
            );
            state.set_hovered(hovered);
            if input.mine {
                state.mine_tick(cursor);
            }
        }
        None => state.set_hovered(Vec::new()),
    }

    if let Some(target) = input.place {
        state.place(target);
    }

    state.advance_step_count();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::index::GridLayout;

    fn open_world() -> (SpatialIndex, WorldBounds, Physics) {
        (
            SpatialIndex::new(GridLayout::new(Vec2::ZERO, 30.0)),
            WorldBounds {
                width: 1000.0,
                height: 1000.0,
            },
            Physics::default(),
        )
    }

    #[test]
    fn test_gravity_accumulates() {
        let (index, bounds, physics) = open_world();
        let mut body = Body::new(Vec2::new(500.0, 100.0));
        integrate_body(&mut body, MoveIntent::None, &index, &bounds, &physics);
        integrate_body(&mut body, MoveIntent::None, &index, &bounds, &physics);
        assert_eq!(body.vel.y, 1.0);
        assert_eq!(body.pos.y, 101.5);
        assert!(!body.grounded);
    }

    #[test]
    fn test_move_sets_velocity_and_friction_decays() {
        let (index, bounds, physics) = open_world();
        let mut body = Body::new(Vec2::new(500.0, 100.0));
        integrate_body(&mut body, MoveIntent::Right, &index, &bounds, &physics);
        assert_eq!(body.vel.x, 5.0);
        assert_eq!(body.pos.x, 505.0);

        integrate_body(&mut body, MoveIntent::None, &index, &bounds, &physics);
        assert_eq!(body.vel.x, 4.0);

        integrate_body(&mut body, MoveIntent::Left, &index, &bounds, &physics);
        assert_eq!(body.vel.x, -5.0);
    }

    #[test]
    fn test_floor_grounds_body() {
        let (index, bounds, physics) = open_world();
        let mut body = Body::new(Vec2::new(500.0, 985.0));
        integrate_body(&mut body, MoveIntent::None, &index, &bounds, &physics);
        assert!(body.grounded);
        assert_eq!(body.pos.y, 985.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_one_shot_triggers_cleared() {
        let mut input = TickInput {
            movement: MoveIntent::Left,
            jump: true,
            mine: true,
            cursor: Some(Vec2::ONE),
            place: Some(Vec2::ONE),
            select: Some(Material::Ore),
        };
        input.clear_triggers();
        assert_eq!(input.movement, MoveIntent::Left);
        assert!(input.mine);
        assert!(!input.jump);
        assert_eq!(input.place, None);
        assert_eq!(input.select, None);
    }

    #[test]
    fn test_tick_selects_and_counts() {
        let settings = Settings::default();
        let mut engine = Engine::empty(settings);
        let input = TickInput {
            select: Some(Material::Rock),
            ..Default::default()
        };
        tick(&mut engine, &input);
        assert_eq!(engine.selected(), Material::Rock);
        assert_eq!(engine.step_count(), 1);
    }
}

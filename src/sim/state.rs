//! Engine state
//!
//! Every piece of mutable simulation state lives in one owned `Engine`, passed
//! explicitly to each operation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::Body;
use super::index::{SpatialIndex, TileKey, TileRef};
use super::interaction::{self, BreakEvent, MineOutcome, PlaceOutcome};
use super::tick::{self, MoveIntent, TickInput, integrate_body};
use super::tile::{HexTile, Material, Rgb};
use super::worldgen::WorldGenerator;
use crate::Region;
use crate::error::ConfigError;
use crate::settings::Settings;

/// The simulation context: world, player and pending input
#[derive(Debug, Clone)]
pub struct Engine {
    settings: Settings,
    index: SpatialIndex,
    body: Body,
    selected: Material,
    /// Input applied on the next `step`
    input: TickInput,
    /// Tiles under the cursor and in reach, refreshed every step
    hovered: Vec<TileKey>,
    /// Break signals not yet drained by the effects collaborator
    events: Vec<BreakEvent>,
    step_count: u64,
    seed: u64,
}

impl Engine {
    /// Engine with no tiles and the body at the spawn point
    pub fn empty(settings: Settings) -> Self {
        let index = SpatialIndex::new(settings.layout());
        let body = Body::new(settings.spawn_point()).with_radius(settings.body_radius);
        Self::from_parts(settings, index, body, Material::Soil, 0)
    }

    /// Assemble an engine from existing state (used when restoring a save)
    pub fn from_parts(
        settings: Settings,
        index: SpatialIndex,
        body: Body,
        selected: Material,
        seed: u64,
    ) -> Self {
        Self {
            settings,
            index,
            body,
            selected,
            input: TickInput::default(),
            hovered: Vec::new(),
            events: Vec::new(),
            step_count: 0,
            seed,
        }
    }

    /// Fresh procedurally generated world with the body spawned above the ground
    pub fn generate(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let generator = WorldGenerator::new(settings.world.rows, settings.world.cols)?;

        let mut engine = Self::empty(settings);
        engine.seed = seed;
        let mut rng = Pcg32::seed_from_u64(seed);
        generator.populate(&mut engine.index, &mut rng);
        log::info!(
            "New world (seed {}): {} tiles, spawn at {:?}",
            seed,
            engine.index.len(),
            engine.body.pos
        );
        Ok(engine)
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    #[inline]
    pub fn index_mut(&mut self) -> &mut SpatialIndex {
        &mut self.index
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[inline]
    pub fn selected(&self) -> Material {
        self.selected
    }

    pub fn select(&mut self, material: Material) {
        self.selected = material;
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub(super) fn advance_step_count(&mut self) {
        self.step_count += 1;
    }

    /// Replace the input used by the next `step`
    pub fn apply_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Run one step with the pending input, then drop its one-shot triggers
    pub fn step(&mut self) {
        let input = self.input.clone();
        tick::tick(self, &input);
        self.input.clear_triggers();
    }

    pub(super) fn step_physics(&mut self, movement: MoveIntent) {
        let bounds = self.settings.bounds();
        integrate_body(
            &mut self.body,
            movement,
            &self.index,
            &bounds,
            &self.settings.physics,
        );
    }

    /// Tiles the render collaborator should draw for `region`
    pub fn query_visible(&self, region: Region) -> Vec<TileRef<'_>> {
        let half = region.half_extents();
        let padded = region.expand(self.settings.world.tile_size);
        self.index
            .query_radius(region.center(), half.x.max(half.y))
            .into_iter()
            .filter(|r| padded.contains(r.tile.center()))
            .collect()
    }

    /// Damage the tile under `target`; queues a break event if it breaks
    pub fn mine_tick(&mut self, target: Vec2) -> MineOutcome {
        let outcome = interaction::mine(
            &mut self.index,
            &mut self.body,
            target,
            &self.settings.interaction,
        );
        if let MineOutcome::Broken(event) = outcome {
            self.hovered.retain(|k| *k != event.key);
            self.events.push(event);
        }
        outcome
    }

    /// Place one unit of the selected material at `target`
    pub fn place(&mut self, target: Vec2) -> PlaceOutcome {
        interaction::place(
            &mut self.index,
            &mut self.body,
            target,
            self.selected,
            &self.settings.interaction,
        )
    }

    pub(super) fn set_hovered(&mut self, hovered: Vec<TileKey>) {
        self.hovered = hovered;
    }

    pub fn hovered(&self) -> &[TileKey] {
        &self.hovered
    }

    /// Fill color for a tile: brightened while hovered
    pub fn active_color(&self, key: TileKey, tile: &HexTile) -> Rgb {
        if self.hovered.contains(&key) {
            tile.material().highlight_color()
        } else {
            tile.material().color()
        }
    }

    /// Take all pending break events
    pub fn drain_events(&mut self) -> Vec<BreakEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::index::CellCoord;

    fn small_settings() -> Settings {
        let mut s = Settings::default();
        s.world.rows = 8;
        s.world.cols = 30;
        s
    }

    #[test]
    fn test_generate_rejects_bad_dimensions() {
        let mut s = small_settings();
        s.world.cols = 0;
        assert!(Engine::generate(s, 1).is_err());
    }

    #[test]
    fn test_generate_spawns_above_ground() {
        let engine = Engine::generate(small_settings(), 3).unwrap();
        assert_eq!(engine.index().len(), 240);
        assert_eq!(engine.body().pos, Vec2::new(600.0, 500.0));
        assert_eq!(engine.seed(), 3);
    }

    #[test]
    fn test_body_settles_on_turf() {
        let mut engine = Engine::generate(small_settings(), 3).unwrap();
        for _ in 0..120 {
            engine.step();
        }
        let body = engine.body();
        assert!(body.grounded);
        assert_eq!(body.vel.y, 0.0);
        // Resting on the turf row whose top sits 30 units above the ground line
        assert!(body.bottom() <= 600.0 && body.bottom() >= 570.0 - 1e-3);
    }

    #[test]
    fn test_mining_from_step_emits_events() {
        let mut engine = Engine::generate(small_settings(), 3).unwrap();
        for _ in 0..120 {
            engine.step();
        }
        let body_x = engine.body().pos.x;
        let layout = *engine.index().layout();
        let below = layout.cell_of(Vec2::new(body_x, 600.0));
        let target = layout.center_of(CellCoord::new(below.col, 0));

        engine.apply_input(TickInput {
            mine: true,
            cursor: Some(target),
            ..Default::default()
        });
        let mut broke = false;
        for _ in 0..40 {
            engine.step();
            let events = engine.drain_events();
            if !events.is_empty() {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].material, Material::Turf);
                broke = true;
                break;
            }
        }
        assert!(broke);
        assert_eq!(engine.body().inventory.count(Material::Turf), 1);
    }

    #[test]
    fn test_hover_colors() {
        let mut engine = Engine::generate(small_settings(), 3).unwrap();
        let layout = *engine.index().layout();
        let key = TileKey::Grid(layout.cell_of(Vec2::new(600.0, 600.0)));
        let target = engine.index().get(key).unwrap().center();
        engine.body_mut().pos = target - Vec2::new(0.0, 50.0);
        engine.apply_input(TickInput {
            cursor: Some(target),
            ..Default::default()
        });
        engine.step();
        assert!(engine.hovered().contains(&key));
        let tile = engine.index().get(key).unwrap();
        assert_eq!(engine.active_color(key, tile), Material::Turf.highlight_color());
    }

    #[test]
    fn test_query_visible_clips_to_region() {
        let engine = Engine::generate(small_settings(), 3).unwrap();
        let region = Region::new(Vec2::new(0.0, 550.0), Vec2::new(200.0, 650.0));
        let visible = engine.query_visible(region);
        assert!(!visible.is_empty());
        let padded = region.expand(30.0);
        assert!(visible.iter().all(|r| padded.contains(r.tile.center())));
    }
}

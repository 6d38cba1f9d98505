//! World lifecycle around the engine
//!
//! Start loads the saved world or generates a fresh one, save and reset are
//! triggered by input, and the camera follows the body between frames.
//! Persistence failures are logged and never stop the simulation.

use glam::Vec2;

use crate::error::ConfigError;
use crate::persistence::SaveStore;
use crate::settings::Settings;
use crate::sim::{BreakEvent, Camera, Engine, Material, MoveIntent, TickInput};

/// Raw per-frame input from the input collaborator. Cursor is in screen space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MoveIntent,
    pub jump: bool,
    pub mine: bool,
    pub cursor: Option<Vec2>,
    /// Place at the cursor
    pub place: bool,
    /// Material slot 1..=4
    pub select_slot: Option<u8>,
    pub save: bool,
    pub reset: bool,
}

pub struct Session {
    engine: Engine,
    store: SaveStore,
    camera: Camera,
}

impl Session {
    /// Restore the saved world, or generate a new one when there is none
    pub fn start(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let store = SaveStore::new(settings.save_path.clone());
        let engine = match store.load_or_none() {
            Some(snapshot) => snapshot.restore(settings.clone()),
            None => Engine::generate(settings.clone(), pick_seed(&settings))?,
        };
        Ok(Self::with_engine(engine, store))
    }

    pub fn with_engine(engine: Engine, store: SaveStore) -> Self {
        let mut camera = Camera::new(engine.settings().viewport);
        camera.follow(engine.body().pos, &engine.settings().bounds());
        Self {
            engine,
            store,
            camera,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// Save now; failures are logged
    pub fn save(&self) -> bool {
        match self.store.save(&self.engine) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Save failed, continuing: {}", e);
                false
            }
        }
    }

    /// Replace the world with a freshly generated one
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let settings = self.engine.settings().clone();
        let seed = pick_seed(&settings);
        self.engine = Engine::generate(settings, seed)?;
        self.camera
            .follow(self.engine.body().pos, &self.engine.settings().bounds());
        log::info!("World reset (seed {})", seed);
        Ok(())
    }

    /// Translate one frame of input, step the engine and move the camera.
    ///
    /// Returns the break events of this frame for the effects collaborator.
    pub fn frame(&mut self, input: &FrameInput) -> Result<Vec<BreakEvent>, ConfigError> {
        if input.reset {
            self.reset()?;
        }

        let cursor = input.cursor.map(|c| self.camera.screen_to_world(c));
        self.engine.apply_input(TickInput {
            movement: input.movement,
            jump: input.jump,
            mine: input.mine,
            cursor,
            place: if input.place { cursor } else { None },
            select: input.select_slot.and_then(Material::from_slot),
        });
        self.engine.step();
        self.camera
            .follow(self.engine.body().pos, &self.engine.settings().bounds());

        if input.save {
            self.save();
        }
        Ok(self.engine.drain_events())
    }

    /// Save on the way out
    pub fn shutdown(self) -> Engine {
        self.save();
        self.engine
    }
}

fn pick_seed(settings: &Settings) -> u64 {
    settings.world.seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings(tag: &str) -> Settings {
        let mut s = Settings::default();
        s.world.rows = 10;
        s.world.cols = 30;
        s.world.seed = Some(5);
        s.save_path = std::env::temp_dir().join(format!(
            "hexcavate-session-{}-{}.json",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_file(&s.save_path);
        s
    }

    #[test]
    fn test_start_generates_without_save() {
        let s = settings("fresh");
        let session = Session::start(s.clone()).unwrap();
        assert_eq!(session.engine().index().len(), 300);
        assert_eq!(session.engine().seed(), 5);
        assert!(!session.store().exists());
    }

    #[test]
    fn test_start_rejects_bad_settings() {
        let mut s = settings("bad");
        s.world.rows = -2;
        assert!(Session::start(s).is_err());
    }

    #[test]
    fn test_shutdown_saves_and_start_restores() {
        let s = settings("restore");
        let mut session = Session::start(s.clone()).unwrap();
        session.engine_mut().body_mut().inventory.add(Material::Ore);
        session
            .frame(&FrameInput {
                select_slot: Some(2),
                ..Default::default()
            })
            .unwrap();
        let pos = session.engine().body().pos;
        session.shutdown();

        let restored = Session::start(s.clone()).unwrap();
        assert_eq!(restored.engine().body().pos, pos);
        assert_eq!(restored.engine().selected(), Material::Rock);
        assert_eq!(restored.engine().body().inventory.count(Material::Ore), 1);
        let _ = fs::remove_file(&s.save_path);
    }

    #[test]
    fn test_corrupt_save_falls_back_to_fresh_world() {
        let s = settings("corrupt");
        fs::write(&s.save_path, "not json at all").unwrap();
        let session = Session::start(s.clone()).unwrap();
        assert_eq!(session.engine().index().len(), 300);
        let _ = fs::remove_file(&s.save_path);
    }

    #[test]
    fn test_reset_regenerates() {
        let s = settings("reset");
        let mut session = Session::start(s).unwrap();
        let key = session.engine().index().iter().next().map(|r| r.key).unwrap();
        session.engine_mut().index_mut().remove(key);
        assert_eq!(session.engine().index().len(), 299);

        session
            .frame(&FrameInput {
                reset: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session.engine().index().len(), 300);
    }

    #[test]
    fn test_mining_through_screen_cursor() {
        let s = settings("cursor");
        let mut session = Session::start(s).unwrap();
        for _ in 0..60 {
            session.frame(&FrameInput::default()).unwrap();
        }
        assert!(session.engine().body().grounded);

        let layout = *session.engine().index().layout();
        let below = layout.cell_of(session.engine().body().pos + Vec2::new(0.0, 45.0));
        let tile_center = layout.center_of(below);
        let mut events = Vec::new();
        for _ in 0..25 {
            let screen = session.camera().world_to_screen(tile_center);
            let frame_events = session
                .frame(&FrameInput {
                    mine: true,
                    cursor: Some(screen),
                    ..Default::default()
                })
                .unwrap();
            events.extend(frame_events);
        }
        assert_eq!(session.engine().body().inventory.count(Material::Turf), 1);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].material, Material::Turf);
        assert!(session.engine_mut().drain_events().is_empty());
    }
}

//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope holding every tile (both key spaces), the body and the selection
//! - Atomic replace (tmp → save) so a crash mid-write never truncates the old save
//! - Shape and version checks; any failure reads as "no saved state"

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::settings::Settings;
use crate::sim::{Body, Engine, GridLayout, HexTile, Material, SpatialIndex, TileKey};

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

/// One tile with the key it was stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTile {
    pub key: TileKey,
    pub tile: HexTile,
}

/// Everything needed to rebuild an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub seed: u64,
    /// Lattice the grid keys were derived from; older saves fall back to the settings
    #[serde(default)]
    pub layout: Option<GridLayout>,
    pub selected: Material,
    pub body: Body,
    pub tiles: Vec<SavedTile>,
}

impl Snapshot {
    /// Copy the engine's persistent state
    pub fn capture(engine: &Engine) -> Self {
        let tiles = engine
            .index()
            .iter()
            .map(|r| SavedTile {
                key: r.key,
                tile: r.tile.clone(),
            })
            .collect();
        Self {
            version: SAVE_VERSION,
            seed: engine.seed(),
            layout: Some(*engine.index().layout()),
            selected: engine.selected(),
            body: engine.body().clone(),
            tiles,
        }
    }

    /// Rebuild an engine under `settings`.
    ///
    /// Tiles keep the lattice they were saved with, so changed settings never
    /// orphan grid keys. Keys that do not match their tile are reassigned.
    pub fn restore(self, settings: Settings) -> Engine {
        let layout = self
            .layout
            .filter(usable_layout)
            .unwrap_or_else(|| settings.layout());
        let mut index = SpatialIndex::new(layout);
        let mut rekeyed = 0;
        for saved in self.tiles {
            if index.insert_with_key(saved.key, saved.tile) != saved.key {
                rekeyed += 1;
            }
        }
        if rekeyed > 0 {
            log::warn!("{} saved tiles had stale keys and were re-keyed", rekeyed);
        }
        Engine::from_parts(settings, index, self.body, self.selected, self.seed)
    }
}

fn usable_layout(layout: &GridLayout) -> bool {
    let dims = [layout.tile_size, layout.width, layout.v_spacing];
    layout.origin.is_finite() && dims.iter().all(|d| d.is_finite() && *d > 0.0)
}

/// Serialize a snapshot to its durable form
pub fn encode(snapshot: &Snapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Parse a durable record, rejecting wrong shapes and newer versions
pub fn decode(data: &str) -> Result<Snapshot, PersistenceError> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    let Some(object) = value.as_object() else {
        return Err(PersistenceError::Shape("top level is not an object".into()));
    };
    for field in ["version", "tiles", "body"] {
        if !object.contains_key(field) {
            return Err(PersistenceError::Shape(format!("missing `{field}`")));
        }
    }

    let snapshot: Snapshot = serde_json::from_value(value)?;
    if snapshot.version > SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: snapshot.version,
            supported: SAVE_VERSION,
        });
    }
    Ok(snapshot)
}

/// The save record at a fixed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the record with the engine's current state
    pub fn save(&self, engine: &Engine) -> Result<(), PersistenceError> {
        let snapshot = Snapshot::capture(engine);
        let data = encode(&snapshot)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        log::info!(
            "World saved to {} ({} tiles)",
            self.path.display(),
            snapshot.tiles.len()
        );
        Ok(())
    }

    /// Read the record
    pub fn load(&self) -> Result<Snapshot, PersistenceError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot = decode(&data)?;
        log::info!(
            "Loaded save from {} ({} tiles)",
            self.path.display(),
            snapshot.tiles.len()
        );
        Ok(snapshot)
    }

    /// Read the record, treating any failure as "no saved state"
    pub fn load_or_none(&self) -> Option<Snapshot> {
        match self.load() {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_not_found() => {
                log::info!("No save found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Discarding unusable save {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

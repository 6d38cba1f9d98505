//! Simulation module
//!
//! All gameplay logic lives here. Single-threaded and step-driven:
//! - One step per rendered frame, fixed per-step constants
//! - Seeded RNG only (world generation)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod index;
pub mod interaction;
pub mod state;
pub mod tick;
pub mod tile;
pub mod worldgen;

pub use body::{Body, Inventory};
pub use camera::Camera;
pub use collision::{Contact, WorldBounds, clamp_to_bounds, resolve_tile, resolve_tiles};
pub use index::{CellCoord, FreeId, GridLayout, SpatialIndex, TileKey, TileRef};
pub use interaction::{BreakEvent, MineOutcome, PlaceOutcome};
pub use state::Engine;
pub use tick::{MoveIntent, TickInput, tick};
pub use tile::{HexTile, Material, Rgb};
pub use worldgen::WorldGenerator;

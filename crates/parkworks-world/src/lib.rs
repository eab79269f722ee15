//! Tile map, scenery catalog, and land ownership for the Parkworks action
//! framework.
//!
//! This crate is the spatial store that actions consume through narrow
//! queries: the ordered element stack of a tile, surface height, ownership,
//! bounds, element removal with redraw invalidation, and banner detachment.
//!
//! # Modules
//!
//! - [`element`] -- Tile elements, surface ownership, and large-scenery fragments
//! - [`error`] -- Error types for map operations
//! - [`scenario`] -- Declarative scenario definitions that build a [`World`]
//! - [`scenery`] -- Large-scenery definitions and the object catalog
//! - [`world`] -- The [`World`]: tiles, banners, catalog, dirty-tile tracking

pub mod element;
pub mod error;
pub mod scenario;
pub mod scenery;
pub mod world;

// Re-export primary types at crate root.
pub use element::{ElementKind, LargeSceneryElement, Ownership, SurfaceElement, TileElement};
pub use error::WorldError;
pub use scenario::{OwnershipRect, Placement, ScenarioDefinition, demo_scenario};
pub use scenery::{LargeSceneryEntry, LargeSceneryTile, SceneryCatalog};
pub use world::{Banner, MAX_MAP_SIZE, World};

//! Declarative scenario definitions.
//!
//! A [`ScenarioDefinition`] is the serializable description of a starting
//! map: its size, terrain height, owned land, loaded scenery definitions,
//! and initial placements. [`ScenarioDefinition::build`] turns it into a
//! [`World`]. Building is deterministic, so peers that load the same
//! scenario start from identical state.

use serde::{Deserialize, Serialize};
use tracing::info;

use parkworks_types::{CoordsXYZD, ObjectEntryIndex, TileCoordsXY};

use crate::element::Ownership;
use crate::error::WorldError;
use crate::scenery::{LargeSceneryEntry, LargeSceneryTile};
use crate::world::World;

/// An inclusive rectangle of tiles with one ownership state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRect {
    /// First tile column.
    pub left: i32,
    /// First tile row.
    pub top: i32,
    /// Last tile column.
    pub right: i32,
    /// Last tile row.
    pub bottom: i32,
    /// Ownership applied to every tile in the rectangle.
    pub ownership: Ownership,
}

/// A scenery definition bound to its catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneryDefinition {
    /// Catalog index placements refer to.
    pub index: ObjectEntryIndex,
    /// The definition itself.
    #[serde(flatten)]
    pub entry: LargeSceneryEntry,
}

/// One large-scenery object present when the scenario starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Catalog index of the definition.
    pub entry: ObjectEntryIndex,
    /// World x of fragment 0.
    pub x: i32,
    /// World y of fragment 0.
    pub y: i32,
    /// Base height of fragment 0.
    pub z: i32,
    /// Facing direction `0..=3`.
    #[serde(default)]
    pub direction: u8,
    /// Whether the placement is a ghost preview.
    #[serde(default)]
    pub ghost: bool,
    /// Optional banner text.
    #[serde(default)]
    pub banner: Option<String>,
}

/// Serializable description of a starting map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Human-readable scenario name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Map edge length in tiles.
    pub map_size: i32,
    /// Terrain height of every tile.
    #[serde(default = "default_surface_height")]
    pub surface_height: i32,
    /// Land ownership, applied in order.
    #[serde(default)]
    pub ownership: Vec<OwnershipRect>,
    /// Scenery definitions to load.
    #[serde(default)]
    pub scenery: Vec<SceneryDefinition>,
    /// Objects placed at start.
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl ScenarioDefinition {
    /// Build the starting world.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the map size is invalid, a definition is
    /// duplicated or empty, or a placement is unknown or leaves the map.
    pub fn build(&self) -> Result<World, WorldError> {
        let mut world = World::new(self.map_size, self.surface_height)?;

        for rect in &self.ownership {
            world.set_ownership(
                TileCoordsXY::new(rect.left, rect.top),
                TileCoordsXY::new(rect.right, rect.bottom),
                rect.ownership,
            );
        }

        for definition in &self.scenery {
            world
                .catalog_mut()
                .insert(definition.index, definition.entry.clone())?;
        }

        for placement in &self.placements {
            world.place_large_scenery(
                placement.entry,
                CoordsXYZD::new(placement.x, placement.y, placement.z, placement.direction),
                placement.ghost,
                placement.banner.clone(),
            )?;
        }

        info!(
            scenario = %self.name,
            map_size = self.map_size,
            scenery_definitions = world.catalog().len(),
            elements = world.element_count(),
            banners = world.banner_count(),
            "Scenario built"
        );
        Ok(world)
    }
}

/// A small built-in scenario used when no scenario file is supplied.
///
/// A 16 by 16 map whose north-west quarter is owned by the park, holding a
/// two-tile bench, a 2x2 fountain with a banner, and a ghost bench preview.
pub fn demo_scenario() -> ScenarioDefinition {
    let fragment = |x_offset: i16, y_offset: i16| LargeSceneryTile {
        x_offset,
        y_offset,
        z_offset: 0,
        z_clearance: 32,
    };
    ScenarioDefinition {
        name: "Demo Park".to_owned(),
        map_size: 16,
        surface_height: 16,
        ownership: vec![OwnershipRect {
            left: 0,
            top: 0,
            right: 7,
            bottom: 7,
            ownership: Ownership::Owned,
        }],
        scenery: vec![
            SceneryDefinition {
                index: ObjectEntryIndex(0),
                entry: LargeSceneryEntry {
                    identifier: "park.scenery_large.bench".to_owned(),
                    price: 10,
                    removal_price: 5,
                    supports_banner: false,
                    tiles: vec![fragment(0, 0), fragment(32, 0)],
                },
            },
            SceneryDefinition {
                index: ObjectEntryIndex(1),
                entry: LargeSceneryEntry {
                    identifier: "park.scenery_large.fountain".to_owned(),
                    price: 40,
                    removal_price: 12,
                    supports_banner: true,
                    tiles: vec![
                        fragment(0, 0),
                        fragment(32, 0),
                        fragment(0, 32),
                        fragment(32, 32),
                    ],
                },
            },
        ],
        placements: vec![
            Placement {
                entry: ObjectEntryIndex(0),
                x: 32,
                y: 32,
                z: 16,
                direction: 0,
                ghost: false,
                banner: None,
            },
            Placement {
                entry: ObjectEntryIndex(1),
                x: 128,
                y: 128,
                z: 16,
                direction: 0,
                ghost: false,
                banner: Some("Fountain Plaza".to_owned()),
            },
            Placement {
                entry: ObjectEntryIndex(0),
                x: 32,
                y: 96,
                z: 16,
                direction: 1,
                ghost: true,
                banner: None,
            },
        ],
    }
}

fn default_name() -> String {
    "Unnamed Scenario".to_owned()
}

const fn default_surface_height() -> i32 {
    16
}

//! Large-scenery definitions and the object catalog.
//!
//! A [`LargeSceneryEntry`] describes a multi-tile footprint as an ordered,
//! explicit-length list of fragment offsets relative to fragment 0 when
//! the object faces direction 0. Placements rotate these offsets by their
//! direction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use parkworks_types::{CoordsXYZ, Money, ObjectEntryIndex};

use crate::error::WorldError;

/// One fragment of a large-scenery footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LargeSceneryTile {
    /// East-west offset in world units.
    pub x_offset: i16,
    /// North-south offset in world units.
    pub y_offset: i16,
    /// Height offset in world units.
    pub z_offset: i16,
    /// Height of this fragment above its base.
    #[serde(default = "default_clearance")]
    pub z_clearance: i16,
}

impl LargeSceneryTile {
    /// The fragment offset as a coordinate triple.
    pub fn offset(self) -> CoordsXYZ {
        CoordsXYZ::new(
            i32::from(self.x_offset),
            i32::from(self.y_offset),
            i32::from(self.z_offset),
        )
    }
}

/// Definition of a multi-tile scenery object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeSceneryEntry {
    /// Stable object identifier (e.g. `"park.scenery_large.clock_tower"`).
    pub identifier: String,
    /// Build price in whole currency units.
    #[serde(default)]
    pub price: i16,
    /// Removal price in whole currency units.
    pub removal_price: i16,
    /// Whether placements may carry a banner.
    #[serde(default)]
    pub supports_banner: bool,
    /// Fragments in sequence order.
    pub tiles: Vec<LargeSceneryTile>,
}

impl LargeSceneryEntry {
    /// The fragment with the given sequence index, if it exists.
    pub fn tile(&self, sequence_index: usize) -> Option<&LargeSceneryTile> {
        self.tiles.get(sequence_index)
    }

    /// Removal cost as charged to the park.
    pub fn removal_cost(&self) -> Money {
        Money::from_price(self.removal_price)
    }
}

/// The loaded set of scenery definitions, addressed by entry index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneryCatalog {
    entries: BTreeMap<ObjectEntryIndex, LargeSceneryEntry>,
}

impl SceneryCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a definition.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSceneryEntry`] if the index is taken,
    /// or [`WorldError::EmptyFootprint`] if the definition has no fragments.
    pub fn insert(
        &mut self,
        index: ObjectEntryIndex,
        entry: LargeSceneryEntry,
    ) -> Result<(), WorldError> {
        if entry.tiles.is_empty() {
            return Err(WorldError::EmptyFootprint(index));
        }
        if self.entries.contains_key(&index) {
            return Err(WorldError::DuplicateSceneryEntry(index));
        }
        self.entries.insert(index, entry);
        Ok(())
    }

    /// Look up a definition.
    pub fn get(&self, index: ObjectEntryIndex) -> Option<&LargeSceneryEntry> {
        self.entries.get(&index)
    }

    /// Unload a definition, as happens when an object fails to load.
    pub fn remove(&mut self, index: ObjectEntryIndex) -> Option<LargeSceneryEntry> {
        self.entries.remove(&index)
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no definitions are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const fn default_clearance() -> i16 {
    32
}

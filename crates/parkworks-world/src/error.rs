//! Error types for the `parkworks-world` crate.
//!
//! These cover structural misuse of the map (building scenarios, addressing
//! tiles that do not exist). Action validation failures are not errors;
//! they are reported through action results.

use parkworks_types::{CoordsXY, ObjectEntryIndex};

/// Errors that can occur during map operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The requested map size is outside the supported range.
    #[error("invalid map size {0} (must be 1..={max})", max = crate::world::MAX_MAP_SIZE)]
    InvalidMapSize(i32),

    /// A position lies outside the map.
    #[error("position ({}, {}) is outside the map", .0.x, .0.y)]
    OutOfBounds(CoordsXY),

    /// No element exists at the given tile and stack index.
    #[error("no element {index} on tile ({}, {})", .coords.x, .coords.y)]
    ElementNotFound {
        /// World position of the tile.
        coords: CoordsXY,
        /// Index into the tile's element stack.
        index: usize,
    },

    /// A placement referenced a scenery entry that is not loaded.
    #[error("unknown scenery entry {0}")]
    UnknownSceneryEntry(ObjectEntryIndex),

    /// Two scenery entries were registered under the same index.
    #[error("duplicate scenery entry {0}")]
    DuplicateSceneryEntry(ObjectEntryIndex),

    /// A scenery entry declares no fragments.
    #[error("scenery entry {0} has an empty footprint")]
    EmptyFootprint(ObjectEntryIndex),

    /// A scenery entry declares more fragments than a sequence index can address.
    #[error("scenery entry {0} has more than 256 fragments")]
    FootprintTooLarge(ObjectEntryIndex),

    /// The banner table is full.
    #[error("no free banner slots")]
    NoFreeBanners,
}

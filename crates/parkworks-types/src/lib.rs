//! Shared value types for the Parkworks action framework.
//!
//! Everything here is a plain value with no dependency on world storage,
//! so the same definitions flow through the world, ledger, action, and
//! dispatcher crates unchanged.
//!
//! # Modules
//!
//! - [`coords`] -- World and tile coordinates, direction rotation, map ranges
//! - [`enums`] -- Action status, expenditure categories, localisable strings
//! - [`flags`] -- Per-invocation command flags and per-type action flags
//! - [`ids`] -- Typed identifiers (replay UUIDs, banner and object-entry indices)
//! - [`money`] -- Fixed-point money in tenths of a currency unit

pub mod coords;
pub mod enums;
pub mod flags;
pub mod ids;
pub mod money;

// Re-export all public types at crate root for convenience.
pub use coords::{
    COORDS_XY_HALF_TILE, COORDS_XY_STEP, CoordsXY, CoordsXYZ, CoordsXYZD, DIRECTION_MASK,
    LAND_HEIGHT_STEP, MapRange, TileCoordsXY,
};
pub use enums::{ActionStatus, ExpenditureType, StringId};
pub use flags::{ActionFlags, GameCommandFlags};
pub use ids::{BannerIndex, ObjectEntryIndex, ReplayId};
pub use money::Money;

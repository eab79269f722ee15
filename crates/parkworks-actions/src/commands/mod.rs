//! Concrete actions.
//!
//! - [`large_scenery_remove`] -- Remove one multi-tile scenery object.
//! - [`clear_scenery`] -- Sweep a rectangle, removing every scenery object
//!   in it with batch cost accounting.

pub mod clear_scenery;
pub mod large_scenery_remove;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clear_scenery::ClearSceneryAction;
pub use large_scenery_remove::LargeSceneryRemoveAction;

//! Tile elements.
//!
//! Each tile owns one [`SurfaceElement`] (terrain height and ownership) and
//! an ordered stack of [`TileElement`]s sorted by base height. The stack is
//! an explicit sequence; iteration ends at the end of the slice.

use serde::{Deserialize, Serialize};

use parkworks_types::{BannerIndex, ObjectEntryIndex};

/// Land ownership state of a tile's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// The park does not own this land.
    #[default]
    Unowned,
    /// The park owns the land outright.
    Owned,
    /// The park may build above or below the surface, not on it.
    ConstructionRightsOwned,
    /// Land the park may buy later.
    AvailableForPurchase,
}

/// The terrain surface of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceElement {
    /// Terrain height in world units.
    pub base_z: i32,
    /// Who owns this land.
    pub ownership: Ownership,
}

/// One fragment of a multi-tile scenery placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LargeSceneryElement {
    /// The scenery definition this fragment belongs to.
    pub entry: ObjectEntryIndex,
    /// Position of this fragment in the definition's fragment list.
    pub sequence_index: u8,
    /// Signage attached to the placement, if any.
    pub banner: Option<BannerIndex>,
}

/// What a tile element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A footpath segment.
    Path,
    /// Single-tile scenery.
    SmallScenery {
        /// The scenery definition.
        entry: ObjectEntryIndex,
    },
    /// One fragment of multi-tile scenery.
    LargeScenery(LargeSceneryElement),
}

/// An element stacked on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileElement {
    /// Bottom of the element in world units.
    pub base_z: i32,
    /// Top of the element in world units.
    pub clearance_z: i32,
    /// Facing direction `0..=3`.
    pub direction: u8,
    /// Whether this is a preview placement rather than part of the park.
    pub ghost: bool,
    /// Element-type specific data.
    pub kind: ElementKind,
}

impl TileElement {
    /// View this element as a large-scenery fragment.
    pub const fn as_large_scenery(&self) -> Option<&LargeSceneryElement> {
        match &self.kind {
            ElementKind::LargeScenery(scenery) => Some(scenery),
            ElementKind::Path | ElementKind::SmallScenery { .. } => None,
        }
    }

    /// Mutable view of this element as a large-scenery fragment.
    pub const fn as_large_scenery_mut(&mut self) -> Option<&mut LargeSceneryElement> {
        match &mut self.kind {
            ElementKind::LargeScenery(scenery) => Some(scenery),
            ElementKind::Path | ElementKind::SmallScenery { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(sequence_index: u8) -> TileElement {
        TileElement {
            base_z: 16,
            clearance_z: 48,
            direction: 0,
            ghost: false,
            kind: ElementKind::LargeScenery(LargeSceneryElement {
                entry: ObjectEntryIndex(0),
                sequence_index,
                banner: None,
            }),
        }
    }

    #[test]
    fn large_scenery_view_only_for_large_scenery() {
        let scenery = fragment(2);
        assert_eq!(scenery.as_large_scenery().map(|s| s.sequence_index), Some(2));

        let path = TileElement {
            kind: ElementKind::Path,
            ..scenery
        };
        assert!(path.as_large_scenery().is_none());
    }

    #[test]
    fn mutable_view_edits_in_place() {
        let mut scenery = fragment(0);
        if let Some(data) = scenery.as_large_scenery_mut() {
            data.banner = Some(BannerIndex(3));
        }
        assert_eq!(
            scenery.as_large_scenery().and_then(|s| s.banner),
            Some(BannerIndex(3))
        );
    }

    #[test]
    fn ownership_defaults_to_unowned() {
        assert_eq!(SurfaceElement::default().ownership, Ownership::Unowned);
    }
}

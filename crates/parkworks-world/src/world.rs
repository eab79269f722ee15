//! The tile map.
//!
//! The [`World`] is the spatial store every action reads and mutates. Tiles
//! are kept in a row-major vector; each holds its surface and an element
//! stack ordered by base height. Positions are world coordinates
//! ([`CoordsXY`]) and are converted to tiles internally.
//!
//! Mutation goes through a small set of methods (insert, remove, detach
//! banner) so that every change to a tile also marks it for redraw.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use parkworks_types::{
    BannerIndex, COORDS_XY_STEP, CoordsXY, CoordsXYZ, CoordsXYZD, LAND_HEIGHT_STEP,
    ObjectEntryIndex, TileCoordsXY,
};

use crate::element::{ElementKind, LargeSceneryElement, Ownership, SurfaceElement, TileElement};
use crate::error::WorldError;
use crate::scenery::SceneryCatalog;

/// Largest supported map edge, in tiles.
pub const MAX_MAP_SIZE: i32 = 1024;

/// Surface height reported for positions outside the map.
const MIN_LAND_HEIGHT: i32 = 16;

/// Signage attached to a scenery placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Text shown on the sign.
    pub text: String,
    /// The placement the banner is attached to (fragment 0 position).
    pub position: CoordsXYZ,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Tile {
    surface: SurfaceElement,
    elements: Vec<TileElement>,
}

/// The park map: tiles, loaded scenery definitions, and banners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Map edge length in tiles.
    size: i32,
    /// Row-major tiles, `size * size` entries.
    tiles: Vec<Tile>,
    /// Loaded scenery definitions.
    catalog: SceneryCatalog,
    /// Banner table.
    banners: BTreeMap<BannerIndex, Banner>,
    /// Tiles changed since the last redraw.
    dirty: BTreeSet<TileCoordsXY>,
}

impl World {
    /// Create a flat, unowned map of `size` by `size` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidMapSize`] if `size` is not in
    /// `1..=MAX_MAP_SIZE`.
    pub fn new(size: i32, surface_height: i32) -> Result<Self, WorldError> {
        if !(1..=MAX_MAP_SIZE).contains(&size) {
            return Err(WorldError::InvalidMapSize(size));
        }
        let edge = usize::try_from(size).map_err(|source| {
            debug!(%source, size, "map size conversion failed");
            WorldError::InvalidMapSize(size)
        })?;
        let count = edge
            .checked_mul(edge)
            .ok_or(WorldError::InvalidMapSize(size))?;
        let surface = SurfaceElement {
            base_z: surface_height,
            ownership: Ownership::Unowned,
        };
        let tiles = vec![
            Tile {
                surface,
                elements: Vec::new(),
            };
            count
        ];
        Ok(Self {
            size,
            tiles,
            catalog: SceneryCatalog::new(),
            banners: BTreeMap::new(),
            dirty: BTreeSet::new(),
        })
    }

    /// Map edge length in tiles.
    pub const fn size(&self) -> i32 {
        self.size
    }

    // -------------------------------------------------------------------
    // Tile addressing
    // -------------------------------------------------------------------

    fn tile_slot(&self, coords: CoordsXY) -> Option<usize> {
        if !self.is_location_valid(coords) {
            return None;
        }
        let tile = coords.to_tile();
        let row = usize::try_from(tile.y).ok()?;
        let column = usize::try_from(tile.x).ok()?;
        let edge = usize::try_from(self.size).ok()?;
        row.checked_mul(edge)?.checked_add(column)
    }

    fn tile(&self, coords: CoordsXY) -> Option<&Tile> {
        self.tile_slot(coords).and_then(|slot| self.tiles.get(slot))
    }

    fn tile_mut(&mut self, coords: CoordsXY) -> Option<&mut Tile> {
        self.tile_slot(coords).and_then(|slot| self.tiles.get_mut(slot))
    }

    /// Whether a position lies on the map.
    pub fn is_location_valid(&self, coords: CoordsXY) -> bool {
        let limit = self.size.saturating_mul(COORDS_XY_STEP);
        (0..limit).contains(&coords.x) && (0..limit).contains(&coords.y)
    }

    // -------------------------------------------------------------------
    // Surface queries
    // -------------------------------------------------------------------

    /// Terrain height at a position.
    ///
    /// Positions outside the map report the minimum land height.
    pub fn surface_height(&self, coords: CoordsXY) -> i32 {
        self.tile(coords)
            .map_or(MIN_LAND_HEIGHT, |tile| tile.surface.base_z)
    }

    /// The surface element of a tile.
    pub fn surface(&self, coords: CoordsXY) -> Option<&SurfaceElement> {
        self.tile(coords).map(|tile| &tile.surface)
    }

    /// Whether the park owns the land at a position.
    ///
    /// Owned land always qualifies. Land with construction rights only
    /// qualifies below the surface or more than one land step above it.
    pub fn is_location_owned(&self, coords: CoordsXYZ) -> bool {
        let Some(surface) = self.surface(coords.xy()) else {
            return false;
        };
        match surface.ownership {
            Ownership::Owned => true,
            Ownership::ConstructionRightsOwned => {
                coords.z < surface.base_z
                    || coords.z.saturating_sub(LAND_HEIGHT_STEP) > surface.base_z
            }
            Ownership::Unowned | Ownership::AvailableForPurchase => false,
        }
    }

    /// Set the ownership of every tile in an inclusive tile rectangle.
    ///
    /// Tiles outside the map are ignored.
    pub fn set_ownership(&mut self, from: TileCoordsXY, to: TileCoordsXY, ownership: Ownership) {
        for ty in from.y.min(to.y)..=from.y.max(to.y) {
            for tx in from.x.min(to.x)..=from.x.max(to.x) {
                let coords = TileCoordsXY::new(tx, ty).to_coords();
                if let Some(tile) = self.tile_mut(coords) {
                    tile.surface.ownership = ownership;
                }
            }
        }
    }

    /// Set the terrain height of one tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the position is off the map.
    pub fn set_surface_height(&mut self, coords: CoordsXY, base_z: i32) -> Result<(), WorldError> {
        let tile = self
            .tile_mut(coords)
            .ok_or(WorldError::OutOfBounds(coords))?;
        tile.surface.base_z = base_z;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Element stack
    // -------------------------------------------------------------------

    /// The element stack of the tile containing a position, lowest first.
    ///
    /// Positions outside the map have an empty stack.
    pub fn elements_at(&self, coords: CoordsXY) -> &[TileElement] {
        self.tile(coords)
            .map_or(&[][..], |tile| tile.elements.as_slice())
    }

    /// Insert an element into a tile's stack, keeping it ordered by base
    /// height. Returns the stack index the element landed at.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the position is off the map.
    pub fn insert_element(
        &mut self,
        coords: CoordsXY,
        element: TileElement,
    ) -> Result<usize, WorldError> {
        let tile = self
            .tile_mut(coords)
            .ok_or(WorldError::OutOfBounds(coords))?;
        let index = tile
            .elements
            .iter()
            .position(|existing| existing.base_z > element.base_z)
            .unwrap_or(tile.elements.len());
        tile.elements.insert(index, element);
        self.invalidate_tile(coords);
        Ok(index)
    }

    /// Remove an element from a tile's stack.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ElementNotFound`] if the tile has no element
    /// at `index`, or [`WorldError::OutOfBounds`] if the position is off the
    /// map.
    pub fn remove_element(
        &mut self,
        coords: CoordsXY,
        index: usize,
    ) -> Result<TileElement, WorldError> {
        let tile = self
            .tile_mut(coords)
            .ok_or(WorldError::OutOfBounds(coords))?;
        if index >= tile.elements.len() {
            return Err(WorldError::ElementNotFound { coords, index });
        }
        let removed = tile.elements.remove(index);
        debug!(x = coords.x, y = coords.y, index, "tile element removed");
        Ok(removed)
    }

    /// Mark the tile containing a position for redraw.
    pub fn invalidate_tile(&mut self, coords: CoordsXY) {
        if self.is_location_valid(coords) {
            self.dirty.insert(coords.to_tile());
        }
    }

    /// Tiles marked for redraw since the last [`World::take_dirty_tiles`].
    pub const fn dirty_tiles(&self) -> &BTreeSet<TileCoordsXY> {
        &self.dirty
    }

    /// Drain the set of tiles marked for redraw.
    pub fn take_dirty_tiles(&mut self) -> BTreeSet<TileCoordsXY> {
        std::mem::take(&mut self.dirty)
    }

    /// Total number of elements on the map.
    pub fn element_count(&self) -> usize {
        self.tiles.iter().map(|tile| tile.elements.len()).sum()
    }

    // -------------------------------------------------------------------
    // Banners
    // -------------------------------------------------------------------

    /// Allocate the lowest free banner index.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoFreeBanners`] if every index is in use.
    pub fn create_banner(&mut self, banner: Banner) -> Result<BannerIndex, WorldError> {
        let index = (0..=u16::MAX)
            .map(BannerIndex)
            .find(|index| !self.banners.contains_key(index))
            .ok_or(WorldError::NoFreeBanners)?;
        self.banners.insert(index, banner);
        Ok(index)
    }

    /// Look up a banner.
    pub fn banner(&self, index: BannerIndex) -> Option<&Banner> {
        self.banners.get(&index)
    }

    /// Number of banners in use.
    pub fn banner_count(&self) -> usize {
        self.banners.len()
    }

    /// Detach and delete the banner of a large-scenery element.
    ///
    /// Returns the removed banner, or `None` if the element has no banner
    /// or is not large scenery.
    pub fn detach_banner(&mut self, coords: CoordsXY, index: usize) -> Option<Banner> {
        let banner_index = self
            .tile_mut(coords)?
            .elements
            .get_mut(index)?
            .as_large_scenery_mut()?
            .banner
            .take()?;
        let removed = self.banners.remove(&banner_index);
        debug!(x = coords.x, y = coords.y, %banner_index, "banner detached");
        removed
    }

    // -------------------------------------------------------------------
    // Scenery
    // -------------------------------------------------------------------

    /// Loaded scenery definitions.
    pub const fn catalog(&self) -> &SceneryCatalog {
        &self.catalog
    }

    /// Mutable access to the loaded scenery definitions.
    pub const fn catalog_mut(&mut self) -> &mut SceneryCatalog {
        &mut self.catalog
    }

    /// Place every fragment of a large-scenery object.
    ///
    /// `location` is the position of fragment 0; the definition's offsets
    /// are rotated by `location.direction`. All fragments must land on the
    /// map or nothing is placed. If `banner_text` is given a banner is
    /// created and shared by every fragment.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownSceneryEntry`] for an unloaded entry,
    /// [`WorldError::OutOfBounds`] if a fragment would leave the map, or
    /// [`WorldError::NoFreeBanners`] if a banner cannot be allocated.
    pub fn place_large_scenery(
        &mut self,
        entry: ObjectEntryIndex,
        location: CoordsXYZD,
        ghost: bool,
        banner_text: Option<String>,
    ) -> Result<(), WorldError> {
        let definition = self
            .catalog
            .get(entry)
            .ok_or(WorldError::UnknownSceneryEntry(entry))?;

        let mut fragments = Vec::with_capacity(definition.tiles.len());
        for (sequence, tile) in definition.tiles.iter().enumerate() {
            let position = location
                .xyz()
                .translated(tile.offset().rotate(location.direction));
            if !self.is_location_valid(position.xy()) {
                return Err(WorldError::OutOfBounds(position.xy()));
            }
            let sequence_index = u8::try_from(sequence)
                .ok()
                .ok_or(WorldError::FootprintTooLarge(entry))?;
            fragments.push((position, sequence_index, tile.z_clearance));
        }

        let banner = match banner_text {
            Some(text) => Some(self.create_banner(Banner {
                text,
                position: location.xyz(),
            })?),
            None => None,
        };

        for (position, sequence_index, z_clearance) in fragments {
            let element = TileElement {
                base_z: position.z,
                clearance_z: position.z.saturating_add(i32::from(z_clearance)),
                direction: location.direction,
                ghost,
                kind: ElementKind::LargeScenery(LargeSceneryElement {
                    entry,
                    sequence_index,
                    banner,
                }),
            };
            self.insert_element(position.xy(), element)?;
        }

        debug!(
            %entry,
            x = location.x,
            y = location.y,
            z = location.z,
            direction = location.direction,
            ghost,
            "large scenery placed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenery::{LargeSceneryEntry, LargeSceneryTile};

    fn world_with_bench() -> World {
        let mut world = World::new(8, 16).unwrap_or_else(|_| empty_fallback());
        let entry = LargeSceneryEntry {
            identifier: "park.scenery_large.bench".to_owned(),
            price: 10,
            removal_price: 5,
            supports_banner: true,
            tiles: vec![
                LargeSceneryTile::default(),
                LargeSceneryTile {
                    x_offset: 32,
                    ..LargeSceneryTile::default()
                },
            ],
        };
        let _ = world.catalog_mut().insert(ObjectEntryIndex(0), entry);
        world
    }

    fn empty_fallback() -> World {
        World {
            size: 1,
            tiles: vec![Tile::default()],
            catalog: SceneryCatalog::new(),
            banners: BTreeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(matches!(World::new(0, 0), Err(WorldError::InvalidMapSize(0))));
        assert!(World::new(MAX_MAP_SIZE + 1, 0).is_err());
        assert!(World::new(MAX_MAP_SIZE, 0).is_ok());
    }

    #[test]
    fn bounds_cover_whole_tiles() {
        let world = world_with_bench();
        assert!(world.is_location_valid(CoordsXY::new(0, 0)));
        assert!(world.is_location_valid(CoordsXY::new(255, 255)));
        assert!(!world.is_location_valid(CoordsXY::new(256, 0)));
        assert!(!world.is_location_valid(CoordsXY::new(-1, 0)));
    }

    #[test]
    fn off_map_surface_height_is_minimum() {
        let world = world_with_bench();
        assert_eq!(world.surface_height(CoordsXY::new(32, 32)), 16);
        assert_eq!(world.surface_height(CoordsXY::new(-32, 0)), MIN_LAND_HEIGHT);
    }

    #[test]
    fn ownership_rules() {
        let mut world = world_with_bench();
        let tile = TileCoordsXY::new(1, 1);
        let at = |z| CoordsXYZ::new(32, 32, z);

        assert!(!world.is_location_owned(at(16)));

        world.set_ownership(tile, tile, Ownership::Owned);
        assert!(world.is_location_owned(at(16)));

        world.set_ownership(tile, tile, Ownership::ConstructionRightsOwned);
        assert!(!world.is_location_owned(at(16)));
        assert!(!world.is_location_owned(at(32)));
        assert!(world.is_location_owned(at(8)));
        assert!(world.is_location_owned(at(48)));

        assert!(!world.is_location_owned(CoordsXYZ::new(-32, 0, 16)));
    }

    #[test]
    fn insert_keeps_stack_ordered_by_height() {
        let mut world = world_with_bench();
        let coords = CoordsXY::new(0, 0);
        let element = |base_z| TileElement {
            base_z,
            clearance_z: base_z.saturating_add(16),
            direction: 0,
            ghost: false,
            kind: ElementKind::Path,
        };
        let _ = world.insert_element(coords, element(32));
        let _ = world.insert_element(coords, element(16));
        let _ = world.insert_element(coords, element(48));
        let heights: Vec<i32> = world.elements_at(coords).iter().map(|e| e.base_z).collect();
        assert_eq!(heights, vec![16, 32, 48]);
        assert!(world.dirty_tiles().contains(&TileCoordsXY::new(0, 0)));
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut world = world_with_bench();
        assert!(matches!(
            world.remove_element(CoordsXY::new(0, 0), 0),
            Err(WorldError::ElementNotFound { index: 0, .. })
        ));
        assert!(matches!(
            world.remove_element(CoordsXY::new(-64, 0), 0),
            Err(WorldError::OutOfBounds(_))
        ));
    }

    #[test]
    fn placement_rotates_fragments() {
        let mut world = world_with_bench();
        let placed =
            world.place_large_scenery(ObjectEntryIndex(0), CoordsXYZD::new(64, 64, 16, 1), false, None);
        assert!(placed.is_ok());
        // Direction 1 turns the (32, 0) offset into (0, -32).
        assert_eq!(world.elements_at(CoordsXY::new(64, 64)).len(), 1);
        assert_eq!(world.elements_at(CoordsXY::new(64, 32)).len(), 1);
        assert_eq!(world.element_count(), 2);
    }

    #[test]
    fn placement_off_map_places_nothing() {
        let mut world = world_with_bench();
        let placed = world.place_large_scenery(
            ObjectEntryIndex(0),
            CoordsXYZD::new(224, 0, 16, 0),
            false,
            Some("Exit".to_owned()),
        );
        assert!(matches!(placed, Err(WorldError::OutOfBounds(_))));
        assert_eq!(world.element_count(), 0);
        assert_eq!(world.banner_count(), 0);
    }

    #[test]
    fn unknown_entry_is_rejected() {
        let mut world = world_with_bench();
        let placed =
            world.place_large_scenery(ObjectEntryIndex(9), CoordsXYZD::new(0, 0, 16, 0), false, None);
        assert!(matches!(placed, Err(WorldError::UnknownSceneryEntry(_))));
    }

    #[test]
    fn detach_banner_clears_table_entry() {
        let mut world = world_with_bench();
        let _ = world.place_large_scenery(
            ObjectEntryIndex(0),
            CoordsXYZD::new(0, 0, 16, 0),
            false,
            Some("Welcome".to_owned()),
        );
        assert_eq!(world.banner_count(), 1);

        let removed = world.detach_banner(CoordsXY::new(0, 0), 0);
        assert_eq!(removed.map(|b| b.text), Some("Welcome".to_owned()));
        assert_eq!(world.banner_count(), 0);
        assert!(world.detach_banner(CoordsXY::new(0, 0), 0).is_none());
    }

    #[test]
    fn banner_indices_reuse_lowest_free_slot() {
        let mut world = world_with_bench();
        let banner = |text: &str| Banner {
            text: text.to_owned(),
            position: CoordsXYZ::default(),
        };
        let first = world.create_banner(banner("a")).ok();
        let second = world.create_banner(banner("b")).ok();
        assert_eq!(first, Some(BannerIndex(0)));
        assert_eq!(second, Some(BannerIndex(1)));
    }
}

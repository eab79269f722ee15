//! Worlds shared by the command tests.

use parkworks_types::{CoordsXYZD, GameCommandFlags, ObjectEntryIndex, TileCoordsXY};
use parkworks_world::{LargeSceneryEntry, LargeSceneryTile, Ownership, World};

use crate::action::{ActionContext, SceneryAccounting, Session};

/// Two-tile bench, removal price 5.
pub const BENCH: ObjectEntryIndex = ObjectEntryIndex(0);
/// 2x2 fountain, removal price 12.
pub const FOUNTAIN: ObjectEntryIndex = ObjectEntryIndex(1);

fn fragment(x_offset: i16, y_offset: i16) -> LargeSceneryTile {
    LargeSceneryTile {
        x_offset,
        y_offset,
        ..LargeSceneryTile::default()
    }
}

/// An 8x8 map at height 0, fully owned, with the bench and fountain
/// definitions loaded and nothing placed.
pub fn empty_park() -> World {
    let mut world = World::new(8, 0).unwrap();
    world.set_ownership(TileCoordsXY::new(0, 0), TileCoordsXY::new(7, 7), Ownership::Owned);
    let bench = LargeSceneryEntry {
        identifier: "park.scenery_large.bench".to_owned(),
        price: 10,
        removal_price: 5,
        supports_banner: false,
        tiles: vec![fragment(0, 0), fragment(32, 0)],
    };
    let fountain = LargeSceneryEntry {
        identifier: "park.scenery_large.fountain".to_owned(),
        price: 40,
        removal_price: 12,
        supports_banner: true,
        tiles: vec![fragment(0, 0), fragment(32, 0), fragment(0, 32), fragment(32, 32)],
    };
    world.catalog_mut().insert(BENCH, bench).unwrap();
    world.catalog_mut().insert(FOUNTAIN, fountain).unwrap();
    world
}

/// [`empty_park`] with a bench at the origin, direction 0.
pub fn park_with_bench() -> World {
    let mut world = empty_park();
    world
        .place_large_scenery(BENCH, CoordsXYZD::new(0, 0, 0, 0), false, None)
        .unwrap();
    world
}

/// Run `f` with a fresh context.
pub fn with_context<R>(
    flags: GameCommandFlags,
    session: Session,
    f: impl FnOnce(&mut ActionContext<'_>) -> R,
) -> R {
    let mut accounting = SceneryAccounting::new();
    let mut ctx = ActionContext::new(flags, session, &mut accounting);
    f(&mut ctx)
}

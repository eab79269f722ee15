//! Area clearance: remove every large-scenery object in a rectangle.
//!
//! The sweep dispatches one nested [`LargeSceneryRemoveAction`] per
//! fragment it meets, with [`GameCommandFlags::PATH_SCENERY`] set, so an
//! object spanning several swept tiles is priced once.

use tracing::debug;

use parkworks_types::{
    ActionStatus, CoordsXY, CoordsXYZ, CoordsXYZD, ExpenditureType, GameCommandFlags, MapRange,
    Money, StringId,
};
use parkworks_world::{TileElement, World};

use crate::action::{ActionContext, GameAction};
use crate::commands::LargeSceneryRemoveAction;
use crate::registry::GameActionType;
use crate::result::{Diagnostic, GameActionResult};
use crate::visitor::ParameterVisitor;

/// Clear all non-ghost large scenery inside `range` (world units,
/// inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearSceneryAction {
    range: MapRange,
}

/// Running totals of a sweep.
#[derive(Debug, Default)]
struct Sweep {
    cost: Money,
    removed: usize,
    first_failure: Option<GameActionResult>,
    diagnostics: Vec<Diagnostic>,
}

impl Sweep {
    fn record(&mut self, nested: GameActionResult) {
        self.diagnostics.extend(nested.diagnostics.iter().cloned());
        if nested.is_ok() {
            self.cost = self.cost.saturating_add(nested.cost);
            self.removed = self.removed.saturating_add(1);
            return;
        }
        self.diagnostics.push(Diagnostic::new(
            nested.position,
            format!("could not clear object: {}", nested.summary()),
        ));
        if self.first_failure.is_none() {
            self.first_failure = Some(nested);
        }
    }

    fn finish(self, base: GameActionResult) -> GameActionResult {
        let mut result = base;
        result.diagnostics = self.diagnostics;
        match self.first_failure {
            Some(failure) if self.removed == 0 => result.failed(
                failure.status,
                StringId::UnableToRemoveAllSceneryFromHere,
                failure.error_message.or(failure.error_title),
            ),
            _ => {
                result.cost = self.cost;
                result
            }
        }
    }
}

impl ClearSceneryAction {
    /// Create a clearance command.
    pub const fn new(range: MapRange) -> Self {
        Self { range }
    }

    /// The swept rectangle.
    pub const fn range(&self) -> MapRange {
        self.range
    }

    fn base_result(&self, world: &World) -> GameActionResult {
        let centre = self.range.normalise().centre();
        GameActionResult::new()
            .with_position(CoordsXYZ::new(centre.x, centre.y, world.surface_height(centre)))
            .with_expenditure(ExpenditureType::Landscaping)
    }

    fn validate_range(&self, world: &World) -> Result<MapRange, GameActionResult> {
        let range = self.range.normalise();
        let corners = [
            CoordsXY::new(range.left, range.top),
            CoordsXY::new(range.right, range.bottom),
        ];
        if corners.iter().all(|corner| world.is_location_valid(*corner)) {
            Ok(range)
        } else {
            Err(self.base_result(world).failed(
                ActionStatus::InvalidParameters,
                StringId::UnableToRemoveAllSceneryFromHere,
                Some(StringId::InvalidSelectionOfObjects),
            ))
        }
    }
}

impl GameAction for ClearSceneryAction {
    fn action_type(&self) -> GameActionType {
        GameActionType::ClearScenery
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_map_range(&mut self.range);
    }

    fn query(&self, world: &World, ctx: &mut ActionContext<'_>) -> GameActionResult {
        let range = match self.validate_range(world) {
            Ok(range) => range,
            Err(failed) => return failed,
        };
        ctx.accounting_mut().clear();

        let mut sweep = Sweep::default();
        for tile in range.tiles() {
            for element in world.elements_at(tile) {
                let Some(removal) = removal_for(tile, element) else {
                    continue;
                };
                let mut nested = ctx.nested(GameCommandFlags::PATH_SCENERY);
                sweep.record(removal.query(world, &mut nested));
            }
        }

        debug!(
            left = range.left,
            top = range.top,
            right = range.right,
            bottom = range.bottom,
            objects = sweep.removed,
            cost = %sweep.cost,
            "scenery clearance queried"
        );
        sweep.finish(self.base_result(world))
    }

    fn execute(&self, world: &mut World, ctx: &mut ActionContext<'_>) -> GameActionResult {
        let range = match self.validate_range(world) {
            Ok(range) => range,
            Err(failed) => return failed,
        };
        ctx.accounting_mut().clear();
        let base = self.base_result(world);

        let mut sweep = Sweep::default();
        for tile in range.tiles() {
            // Removing an object can take elements from this tile and its
            // neighbours, so rescan after every removal. Objects that failed
            // stay in place and are skipped on the rescan.
            let mut failed: Vec<LargeSceneryRemoveAction> = Vec::new();
            loop {
                let next = world
                    .elements_at(tile)
                    .iter()
                    .filter_map(|element| removal_for(tile, element))
                    .find(|removal| !failed.contains(removal));
                let Some(removal) = next else { break };

                let mut nested = ctx.nested(GameCommandFlags::PATH_SCENERY);
                let result = removal.execute(world, &mut nested);
                if !result.is_ok() {
                    failed.push(removal);
                }
                sweep.record(result);
            }
        }

        debug!(
            left = range.left,
            top = range.top,
            right = range.right,
            bottom = range.bottom,
            objects = sweep.removed,
            cost = %sweep.cost,
            "scenery cleared"
        );
        sweep.finish(base)
    }
}

/// The nested removal for a non-ghost large-scenery fragment.
fn removal_for(tile: CoordsXY, element: &TileElement) -> Option<LargeSceneryRemoveAction> {
    if element.ghost {
        return None;
    }
    let scenery = element.as_large_scenery()?;
    Some(LargeSceneryRemoveAction::new(
        CoordsXYZD::new(tile.x, tile.y, element.base_z, element.direction),
        u16::from(scenery.sequence_index),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{SceneryAccounting, Session};
    use crate::commands::fixtures::{BENCH, FOUNTAIN, empty_park, with_context};
    use parkworks_types::{ObjectEntryIndex, TileCoordsXY};
    use parkworks_world::Ownership;

    fn clear(left: i32, top: i32, right: i32, bottom: i32) -> ClearSceneryAction {
        ClearSceneryAction::new(MapRange::new(left, top, right, bottom))
    }

    fn park_with_fountain_and_bench() -> World {
        let mut world = empty_park();
        world
            .place_large_scenery(FOUNTAIN, CoordsXYZD::new(0, 0, 0, 0), false, None)
            .unwrap();
        world
            .place_large_scenery(BENCH, CoordsXYZD::new(0, 96, 0, 0), false, None)
            .unwrap();
        world
    }

    #[test]
    fn query_charges_each_object_once() {
        let world = park_with_fountain_and_bench();
        let result = with_context(GameCommandFlags::NONE, Session::default(), |ctx| {
            clear(0, 0, 63, 127).query(&world, ctx)
        });
        assert!(result.is_ok());
        // Fountain 120 once across its four fragments, bench 50 once.
        assert_eq!(result.cost, Money(170));
        assert_eq!(result.position, CoordsXYZ::new(31, 63, 0));
        assert_eq!(world.element_count(), 6);
    }

    #[test]
    fn execute_matches_query_and_empties_range() {
        let mut world = park_with_fountain_and_bench();
        let action = clear(0, 0, 63, 127);
        let mut accounting = SceneryAccounting::new();

        let queried = {
            let mut ctx = ActionContext::new(GameCommandFlags::NONE, Session::default(), &mut accounting);
            action.query(&world, &mut ctx)
        };
        let executed = {
            let mut ctx =
                ActionContext::new(GameCommandFlags::APPLY, Session::default(), &mut accounting);
            action.execute(&mut world, &mut ctx)
        };
        assert!(executed.is_ok());
        assert_eq!(executed.cost, queried.cost);
        assert_eq!(world.element_count(), 0);
    }

    #[test]
    fn partial_overlap_removes_whole_object() {
        let mut world = park_with_fountain_and_bench();
        // Only the fountain's south-east tile is inside the range.
        let result = with_context(GameCommandFlags::APPLY, Session::default(), |ctx| {
            clear(32, 32, 32, 32).execute(&mut world, ctx)
        });
        assert!(result.is_ok());
        assert_eq!(result.cost, Money(120));
        assert_eq!(world.element_count(), 2);
    }

    #[test]
    fn ghosts_are_left_alone() {
        let mut world = empty_park();
        world
            .place_large_scenery(BENCH, CoordsXYZD::new(0, 0, 0, 0), true, None)
            .unwrap();
        let result = with_context(GameCommandFlags::APPLY, Session::default(), |ctx| {
            clear(0, 0, 255, 255).execute(&mut world, ctx)
        });
        assert!(result.is_ok());
        assert_eq!(result.cost, Money::ZERO);
        assert_eq!(world.element_count(), 2);
    }

    #[test]
    fn range_off_map_is_invalid() {
        let world = empty_park();
        let result = with_context(GameCommandFlags::NONE, Session::default(), |ctx| {
            clear(0, 0, 256, 32).query(&world, ctx)
        });
        assert_eq!(result.status, ActionStatus::InvalidParameters);
        assert_eq!(
            result.error_title,
            Some(StringId::UnableToRemoveAllSceneryFromHere)
        );
    }

    #[test]
    fn reversed_corners_are_normalised() {
        let world = park_with_fountain_and_bench();
        let result = with_context(GameCommandFlags::NONE, Session::default(), |ctx| {
            clear(63, 127, 0, 0).query(&world, ctx)
        });
        assert_eq!(result.cost, Money(170));
    }

    #[test]
    fn nothing_clearable_reports_first_failure() {
        let mut world = park_with_fountain_and_bench();
        world.set_ownership(TileCoordsXY::new(0, 0), TileCoordsXY::new(7, 7), Ownership::Unowned);
        let before = world.clone();

        let result = with_context(GameCommandFlags::APPLY, Session::default(), |ctx| {
            clear(0, 0, 63, 127).execute(&mut world, ctx)
        });
        assert_eq!(result.status, ActionStatus::NoClearance);
        assert_eq!(
            result.error_title,
            Some(StringId::UnableToRemoveAllSceneryFromHere)
        );
        assert_eq!(result.error_message, Some(StringId::LandNotOwnedByPark));
        assert_eq!(result.cost, Money::ZERO);
        assert_eq!(result.diagnostics.len(), 6);
        assert_eq!(world, before);
    }

    #[test]
    fn partial_success_is_ok_with_diagnostics() {
        let mut world = park_with_fountain_and_bench();
        world.set_ownership(TileCoordsXY::new(0, 3), TileCoordsXY::new(1, 3), Ownership::Unowned);

        let result = with_context(GameCommandFlags::APPLY, Session::default(), |ctx| {
            clear(0, 0, 63, 127).execute(&mut world, ctx)
        });
        assert!(result.is_ok());
        assert_eq!(result.cost, Money(120));
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(world.element_count(), 2);
    }

    #[test]
    fn sweep_resets_previous_marks() {
        let world = park_with_fountain_and_bench();
        let mut accounting = SceneryAccounting::new();
        let action = clear(0, 0, 63, 127);
        let mut ctx = ActionContext::new(GameCommandFlags::NONE, Session::default(), &mut accounting);
        assert_eq!(action.query(&world, &mut ctx).cost, Money(170));
        assert_eq!(action.query(&world, &mut ctx).cost, Money(170));
    }

    #[test]
    fn unknown_entry_fragment_fails_but_others_clear() {
        let mut world = park_with_fountain_and_bench();
        world
            .catalog_mut()
            .insert(
                ObjectEntryIndex(9),
                parkworks_world::LargeSceneryEntry {
                    identifier: "park.scenery_large.statue".to_owned(),
                    price: 1,
                    removal_price: 1,
                    supports_banner: false,
                    tiles: vec![parkworks_world::LargeSceneryTile::default()],
                },
            )
            .unwrap();
        world
            .place_large_scenery(ObjectEntryIndex(9), CoordsXYZD::new(128, 0, 0, 0), false, None)
            .unwrap();
        let _ = world.catalog_mut().remove(ObjectEntryIndex(9));

        let result = with_context(GameCommandFlags::APPLY, Session::default(), |ctx| {
            clear(0, 0, 255, 255).execute(&mut world, ctx)
        });
        assert!(result.is_ok());
        assert_eq!(result.cost, Money(170));
        assert_eq!(world.element_count(), 1);
    }
}

//! Removal of one multi-tile scenery object.
//!
//! The command names a single fragment (location, direction, and sequence
//! index). Query and Execute share one validation pipeline:
//!
//! 1. **Resolve** -- find the named fragment on its tile.
//! 2. **Definition** -- look up the scenery entry and the named fragment's
//!    offset within it.
//! 3. **Anchor** -- subtract the rotated offset to find fragment 0.
//! 4. **Footprint** -- walk every fragment, checking ownership and bounds,
//!    and claim the batch accounting mark when sweeping an area.
//!
//! Query stops there and prices the removal. Execute then detaches the
//! banner and removes each fragment it can still find.

use tracing::{debug, error, warn};

use parkworks_types::{
    ActionStatus, COORDS_XY_HALF_TILE, CoordsXYZ, CoordsXYZD, ExpenditureType, GameCommandFlags,
    Money, ObjectEntryIndex, StringId,
};
use parkworks_world::{TileElement, World};

use crate::action::{AccountingKey, ActionContext, GameAction};
use crate::registry::GameActionType;
use crate::result::{Diagnostic, GameActionResult};
use crate::visitor::ParameterVisitor;

/// Remove the large-scenery object one of whose fragments sits at
/// `location` with sequence index `tile_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LargeSceneryRemoveAction {
    location: CoordsXYZD,
    tile_index: u16,
}

/// Everything the pipeline learned about a removable object.
#[derive(Debug)]
struct ValidatedRemoval {
    /// Result skeleton with position and category filled in.
    result: GameActionResult,
    /// Stack index of the named fragment on its tile.
    element_index: usize,
    /// Absolute position of every fragment, in sequence order.
    fragments: Vec<CoordsXYZ>,
    /// Full removal price.
    removal_cost: Money,
    /// Whether this call should charge (false once the object is accounted).
    charge: bool,
}

impl LargeSceneryRemoveAction {
    /// Create a removal command.
    pub const fn new(location: CoordsXYZD, tile_index: u16) -> Self {
        Self {
            location,
            tile_index,
        }
    }

    /// The named fragment's location and direction.
    pub const fn location(&self) -> CoordsXYZD {
        self.location
    }

    /// Sequence index of the named fragment.
    pub const fn tile_index(&self) -> u16 {
        self.tile_index
    }

    fn base_result(&self, world: &World) -> GameActionResult {
        let position = CoordsXYZ::new(
            self.location.x.saturating_add(COORDS_XY_HALF_TILE),
            self.location.y.saturating_add(COORDS_XY_HALF_TILE),
            world.surface_height(self.location.xy()),
        );
        GameActionResult::new()
            .with_position(position)
            .with_expenditure(ExpenditureType::Landscaping)
    }

    /// Stage 1: the named fragment's stack index on its own tile.
    fn find_element(&self, world: &World, ghost: bool) -> Option<usize> {
        world.elements_at(self.location.xy()).iter().position(|element| {
            is_fragment(
                element,
                self.location.z,
                usize::from(self.tile_index),
                self.location.direction,
                ghost,
            )
        })
    }

    /// Run stages 1 to 4.
    ///
    /// Returns the failed result as `Err` so callers can hand it straight
    /// back.
    fn validate(
        &self,
        world: &World,
        ctx: &mut ActionContext<'_>,
    ) -> Result<ValidatedRemoval, GameActionResult> {
        let result = self.base_result(world);
        let flags = ctx.flags();
        let ghost = flags.contains(GameCommandFlags::GHOST);

        // Stage 1: resolve
        let Some(element_index) = self.find_element(world, ghost) else {
            warn!(
                x = self.location.x,
                y = self.location.y,
                "Invalid game command for scenery removal"
            );
            return Err(result.failed(
                ActionStatus::InvalidParameters,
                StringId::InvalidSelectionOfObjects,
                None,
            ));
        };
        let entry_index = world
            .elements_at(self.location.xy())
            .get(element_index)
            .and_then(TileElement::as_large_scenery)
            .map(|scenery| scenery.entry);

        // Stage 2: definition. A missing entry means corrupt object data;
        // leave the element alone.
        let definition = entry_index.and_then(|index| world.catalog().get(index));
        let (Some(entry_index), Some(definition)) = (entry_index, definition) else {
            return Err(unknown(result));
        };
        let Some(named) = definition.tile(usize::from(self.tile_index)) else {
            return Err(unknown(result));
        };

        // Stage 3: anchor
        let direction = self.location.direction;
        let anchor = self.location.xyz().minus(named.offset().rotate(direction));

        // Stage 4: footprint
        let bypass_ownership = ctx.session().bypasses_ownership();
        let mut charge = true;
        let mut fragments = Vec::with_capacity(definition.tiles.len());
        for (sequence, tile) in definition.tiles.iter().enumerate() {
            let position = anchor.translated(tile.offset().rotate(direction));

            if !bypass_ownership && !world.is_location_owned(position) {
                return Err(not_owned(result));
            }
            if !world.is_location_valid(position.xy()) {
                return Err(not_owned(result));
            }

            // Overlapping sweeps reach the same object through several
            // fragments; only the first call in a batch pays.
            if sequence == 0 && flags.contains(GameCommandFlags::PATH_SCENERY) {
                let key = accounting_key(entry_index, anchor, direction, ghost);
                if ctx.accounting_mut().mark(key) {
                    charge = false;
                }
            }
            fragments.push(position);
        }

        Ok(ValidatedRemoval {
            result,
            element_index,
            fragments,
            removal_cost: definition.removal_cost(),
            charge,
        })
    }
}

impl GameAction for LargeSceneryRemoveAction {
    fn action_type(&self) -> GameActionType {
        GameActionType::LargeSceneryRemove
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_coords_xyzd(&mut self.location);
        visitor.visit_u16("tileIndex", &mut self.tile_index);
    }

    fn query(&self, world: &World, ctx: &mut ActionContext<'_>) -> GameActionResult {
        let validated = match self.validate(world, ctx) {
            Ok(validated) => validated,
            Err(failed) => return failed,
        };
        let mut result = validated.result;
        if validated.charge {
            result.cost = validated.removal_cost;
        }
        debug!(
            x = self.location.x,
            y = self.location.y,
            z = self.location.z,
            tile_index = self.tile_index,
            cost = %result.cost,
            "large scenery removal queried"
        );
        result
    }

    fn execute(&self, world: &mut World, ctx: &mut ActionContext<'_>) -> GameActionResult {
        let validated = match self.validate(world, ctx) {
            Ok(validated) => validated,
            Err(failed) => return failed,
        };
        let ghost = ctx.flags().contains(GameCommandFlags::GHOST);
        let direction = self.location.direction;
        let mut result = validated.result;

        if let Some(banner) = world.detach_banner(self.location.xy(), validated.element_index) {
            debug!(text = %banner.text, "banner removed with scenery");
        }

        for (sequence, position) in validated.fragments.iter().enumerate() {
            let found = world
                .elements_at(position.xy())
                .iter()
                .position(|element| is_fragment(element, position.z, sequence, direction, ghost));

            let removed = found.map(|index| {
                world.invalidate_tile(position.xy());
                world.remove_element(position.xy(), index)
            });
            match removed {
                Some(Ok(_)) => {}
                Some(Err(source)) => {
                    error!(%source, x = position.x, y = position.y, "Failed to remove scenery fragment");
                    result.push_diagnostic(Diagnostic::new(*position, source.to_string()));
                }
                None => {
                    error!(
                        x = position.x,
                        y = position.y,
                        z = position.z,
                        sequence,
                        "Tile not found when trying to remove element"
                    );
                    result.push_diagnostic(Diagnostic::new(
                        *position,
                        format!("fragment {sequence} not found when trying to remove element"),
                    ));
                }
            }
        }

        // Execute always reports the full price, even when the batch mark
        // suppressed it during validation.
        result.cost = validated.removal_cost;
        debug!(
            x = self.location.x,
            y = self.location.y,
            z = self.location.z,
            fragments = validated.fragments.len(),
            skipped = result.diagnostics.len(),
            cost = %result.cost,
            "large scenery removed"
        );
        result
    }
}

/// The five-way match: large scenery with this height, sequence index and
/// direction, in the requested ghost mode.
fn is_fragment(
    element: &TileElement,
    base_z: i32,
    sequence: usize,
    direction: u8,
    ghost: bool,
) -> bool {
    let Some(scenery) = element.as_large_scenery() else {
        return false;
    };
    element.base_z == base_z
        && usize::from(scenery.sequence_index) == sequence
        && element.direction == direction
        && element.ghost == ghost
}

const fn accounting_key(
    entry: ObjectEntryIndex,
    anchor: CoordsXYZ,
    direction: u8,
    ghost: bool,
) -> AccountingKey {
    AccountingKey {
        entry,
        anchor,
        direction,
        ghost,
    }
}

const fn unknown(result: GameActionResult) -> GameActionResult {
    result.failed(ActionStatus::Unknown, StringId::CantRemoveThis, None)
}

const fn not_owned(result: GameActionResult) -> GameActionResult {
    result.failed(
        ActionStatus::NoClearance,
        StringId::CantRemoveThis,
        Some(StringId::LandNotOwnedByPark),
    )
}

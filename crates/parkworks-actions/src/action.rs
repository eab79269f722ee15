//! The action contract and its invocation context.
//!
//! Every world mutation is a [`GameAction`]. The dispatcher first calls
//! [`GameAction::query`] against a shared borrow of the world to validate
//! and price the action, then [`GameAction::execute`] against a mutable
//! borrow to apply it. Execute never trusts Query: it repeats every check
//! against the world as it is at that moment.
//!
//! Ambient state (command flags, editor and sandbox mode, and the batch
//! accounting marks) reaches the action through an [`ActionContext`]
//! rather than globals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use parkworks_types::{ActionFlags, CoordsXYZ, GameCommandFlags, ObjectEntryIndex};
use parkworks_world::World;

use crate::registry::GameActionType;
use crate::result::GameActionResult;
use crate::serialise::DataSerialiser;
use crate::visitor::ParameterVisitor;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Session-wide modes that change how actions validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// The scenario editor is open.
    #[serde(default)]
    pub editor_mode: bool,
    /// Sandbox cheats are enabled.
    #[serde(default)]
    pub sandbox_mode: bool,
}

impl Session {
    /// Whether land ownership checks are skipped.
    pub const fn bypasses_ownership(self) -> bool {
        self.editor_mode || self.sandbox_mode
    }
}

// ---------------------------------------------------------------------------
// Batch accounting
// ---------------------------------------------------------------------------

/// Identity of one placed multi-tile object.
///
/// Two fragments of the same placement share a key, so the first one seen
/// in a batch can claim the removal price for the whole object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountingKey {
    /// Scenery definition.
    pub entry: ObjectEntryIndex,
    /// Position of fragment 0.
    pub anchor: CoordsXYZ,
    /// Facing direction.
    pub direction: u8,
    /// Whether the placement is a ghost.
    pub ghost: bool,
}

/// Objects whose cost has already been counted in the current batch.
///
/// The dispatcher clears the marks between batches; area tools clear them
/// before sweeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneryAccounting {
    accounted: BTreeSet<AccountingKey>,
}

impl SceneryAccounting {
    /// Create an empty set of marks.
    pub const fn new() -> Self {
        Self {
            accounted: BTreeSet::new(),
        }
    }

    /// Whether an object has been counted.
    pub fn is_accounted(&self, key: &AccountingKey) -> bool {
        self.accounted.contains(key)
    }

    /// Mark an object counted. Returns `true` if it already was.
    pub fn mark(&mut self, key: AccountingKey) -> bool {
        !self.accounted.insert(key)
    }

    /// Forget every mark.
    pub fn clear(&mut self) {
        self.accounted.clear();
    }

    /// Number of marked objects.
    pub fn len(&self) -> usize {
        self.accounted.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.accounted.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Invocation context
// ---------------------------------------------------------------------------

/// Everything ambient to one Query or Execute call.
#[derive(Debug)]
pub struct ActionContext<'a> {
    flags: GameCommandFlags,
    session: Session,
    accounting: &'a mut SceneryAccounting,
}

impl<'a> ActionContext<'a> {
    /// Create a context.
    pub const fn new(
        flags: GameCommandFlags,
        session: Session,
        accounting: &'a mut SceneryAccounting,
    ) -> Self {
        Self {
            flags,
            session,
            accounting,
        }
    }

    /// Command flags for this call.
    pub const fn flags(&self) -> GameCommandFlags {
        self.flags
    }

    /// Session modes.
    pub const fn session(&self) -> Session {
        self.session
    }

    /// The batch accounting marks.
    pub const fn accounting(&self) -> &SceneryAccounting {
        &*self.accounting
    }

    /// Mutable access to the batch accounting marks.
    pub const fn accounting_mut(&mut self) -> &mut SceneryAccounting {
        &mut *self.accounting
    }

    /// Derive a context for a nested action, adding `extra` flags.
    ///
    /// The child shares this context's session and accounting marks.
    pub const fn nested(&mut self, extra: GameCommandFlags) -> ActionContext<'_> {
        ActionContext {
            flags: self.flags.with(extra),
            session: self.session,
            accounting: &mut *self.accounting,
        }
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// A serialisable, two-phase world mutation.
pub trait GameAction: core::fmt::Debug {
    /// Registry tag of this action.
    fn action_type(&self) -> GameActionType;

    /// Expose every field to `visitor` in a fixed order.
    ///
    /// This order is the wire order; changing it breaks replay logs and
    /// network peers.
    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor);

    /// Behavioural flags of this action type.
    fn action_flags(&self) -> ActionFlags {
        ActionFlags::NONE
    }

    /// Write or read every field through `stream`.
    fn serialise(&mut self, stream: &mut DataSerialiser) {
        self.accept_parameters(stream);
    }

    /// Validate and price the action without touching the world.
    fn query(&self, world: &World, ctx: &mut ActionContext<'_>) -> GameActionResult;

    /// Validate again and, if still valid, apply the action.
    fn execute(&self, world: &mut World, ctx: &mut ActionContext<'_>) -> GameActionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: i32) -> AccountingKey {
        AccountingKey {
            entry: ObjectEntryIndex(0),
            anchor: CoordsXYZ::new(x, 0, 0),
            direction: 0,
            ghost: false,
        }
    }

    #[test]
    fn mark_reports_previous_state() {
        let mut accounting = SceneryAccounting::new();
        assert!(!accounting.mark(key(0)));
        assert!(accounting.mark(key(0)));
        assert!(!accounting.mark(key(32)));
        assert_eq!(accounting.len(), 2);

        accounting.clear();
        assert!(accounting.is_empty());
        assert!(!accounting.is_accounted(&key(0)));
    }

    #[test]
    fn nested_context_adds_flags_and_shares_marks() {
        let mut accounting = SceneryAccounting::new();
        let session = Session {
            editor_mode: false,
            sandbox_mode: true,
        };
        let mut ctx = ActionContext::new(GameCommandFlags::APPLY, session, &mut accounting);
        {
            let mut child = ctx.nested(GameCommandFlags::PATH_SCENERY);
            assert!(child.flags().contains(GameCommandFlags::APPLY));
            assert!(child.flags().contains(GameCommandFlags::PATH_SCENERY));
            assert!(child.session().bypasses_ownership());
            child.accounting_mut().mark(key(0));
        }
        assert!(!ctx.flags().contains(GameCommandFlags::PATH_SCENERY));
        assert!(ctx.accounting().is_accounted(&key(0)));
    }

    #[test]
    fn default_session_checks_ownership() {
        assert!(!Session::default().bypasses_ownership());
    }
}

//! The registry of action types.
//!
//! Each [`GameActionType`] has a stable numeric id (used in the command
//! envelope), a script name, and a factory that builds a default instance
//! for decoding or parameter import.

use serde::{Deserialize, Serialize};

use crate::action::GameAction;
use crate::commands::{ClearSceneryAction, LargeSceneryRemoveAction};
use crate::error::ActionError;

/// Every registered action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameActionType {
    /// Remove one multi-tile scenery object.
    LargeSceneryRemove,
    /// Remove all scenery inside a rectangle.
    ClearScenery,
}

impl GameActionType {
    /// All registered types, in id order.
    pub const ALL: [Self; 2] = [Self::LargeSceneryRemove, Self::ClearScenery];

    /// Wire id.
    pub const fn id(self) -> u32 {
        match self {
            Self::LargeSceneryRemove => 1,
            Self::ClearScenery => 2,
        }
    }

    /// Look up a type by wire id.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Script name, e.g. `"large_scenery_remove"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LargeSceneryRemove => "large_scenery_remove",
            Self::ClearScenery => "clear_scenery",
        }
    }

    /// Look up a type by script name.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownActionName`] if no type has that name.
    pub fn from_name(name: &str) -> Result<Self, ActionError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ActionError::UnknownActionName(name.to_owned()))
    }

    /// Name used when describing an action in logs.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::LargeSceneryRemove => "LargeSceneryRemove",
            Self::ClearScenery => "ClearScenery",
        }
    }

    /// Build a default instance, ready to have its parameters filled in.
    pub fn create_action(self) -> Box<dyn GameAction> {
        match self {
            Self::LargeSceneryRemove => Box::new(LargeSceneryRemoveAction::default()),
            Self::ClearScenery => Box::new(ClearSceneryAction::default()),
        }
    }
}

impl core::fmt::Display for GameActionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(GameActionType::LargeSceneryRemove.id(), 1);
        assert_eq!(GameActionType::ClearScenery.id(), 2);
        assert_eq!(GameActionType::from_id(2), Some(GameActionType::ClearScenery));
        assert_eq!(GameActionType::from_id(0), None);
    }

    #[test]
    fn names_resolve_both_ways() {
        for kind in GameActionType::ALL {
            assert_eq!(GameActionType::from_name(kind.name()).ok(), Some(kind));
        }
        assert!(matches!(
            GameActionType::from_name("demolish_park"),
            Err(ActionError::UnknownActionName(_))
        ));
    }

    #[test]
    fn factory_builds_matching_type() {
        for kind in GameActionType::ALL {
            assert_eq!(kind.create_action().action_type(), kind);
        }
    }
}

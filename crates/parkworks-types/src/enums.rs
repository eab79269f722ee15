//! Enumeration types shared by every action and the dispatcher.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action status
// ---------------------------------------------------------------------------

/// Outcome code of a query or execute call.
///
/// Only [`ActionStatus::Ok`] means the action was (or would be) applied.
/// Every other value is a rejection reported through the result value;
/// actions never signal failure any other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ActionStatus {
    /// The action is valid and was (or would be) applied.
    #[default]
    Ok,
    /// The parameters do not select anything that exists.
    InvalidParameters,
    /// The action is not permitted in the current session.
    Disallowed,
    /// The game is paused and the action may not run while paused.
    GamePaused,
    /// The park cannot afford the action's cost.
    InsufficientFunds,
    /// The action is only available in the scenario editor.
    NotInEditorMode,
    /// The target is not owned by the acting party.
    NotOwned,
    /// Land ownership or map bounds block the action.
    NoClearance,
    /// Unclassified failure, including corrupt object data.
    Unknown,
}

impl ActionStatus {
    /// Whether this status denotes success.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl core::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::InvalidParameters => "invalid_parameters",
            Self::Disallowed => "disallowed",
            Self::GamePaused => "game_paused",
            Self::InsufficientFunds => "insufficient_funds",
            Self::NotInEditorMode => "not_in_editor_mode",
            Self::NotOwned => "not_owned",
            Self::NoClearance => "no_clearance",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Expenditure categories
// ---------------------------------------------------------------------------

/// Classification of a cost for the finance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenditureType {
    /// Building and removing rides and track.
    RideConstruction,
    /// Operating costs of rides.
    RideRunningCosts,
    /// Buying land and construction rights.
    LandPurchase,
    /// Terraforming, scenery, and clearance work.
    #[default]
    Landscaping,
    /// Income from park admission.
    ParkEntranceTickets,
    /// Income from ride admission.
    ParkRideTickets,
    /// Income from shop sales.
    ShopSales,
    /// Stock bought for shops.
    ShopStock,
    /// Income from food and drink stalls.
    FoodDrinkSales,
    /// Stock bought for food and drink stalls.
    FoodDrinkStock,
    /// Staff wages.
    Wages,
    /// Marketing campaigns.
    Marketing,
    /// Research funding.
    Research,
    /// Loan interest.
    Interest,
}

// ---------------------------------------------------------------------------
// Localisable strings
// ---------------------------------------------------------------------------

/// Identifier of a user-facing message.
///
/// The localisation tables live outside this workspace; [`StringId::default_text`]
/// gives the built-in English rendition used by logs and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StringId {
    /// Title for removal failures.
    CantRemoveThis,
    /// Nothing matches the selection the command named.
    InvalidSelectionOfObjects,
    /// The tile is outside the park's land.
    LandNotOwnedByPark,
    /// The park balance does not cover the cost.
    NotEnoughCash,
    /// The action may not run while the game is paused.
    GamePaused,
    /// The action needs the scenario editor.
    EditorOnly,
    /// Title for area clearance failures.
    UnableToRemoveAllSceneryFromHere,
}

impl StringId {
    /// Built-in English text for this message.
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::CantRemoveThis => "Can't remove this...",
            Self::InvalidSelectionOfObjects => "Invalid selection of objects",
            Self::LandNotOwnedByPark => "Land not owned by park!",
            Self::NotEnoughCash => "Not enough cash",
            Self::GamePaused => "Construction not possible while game is paused!",
            Self::EditorOnly => "Only available in the scenario editor",
            Self::UnableToRemoveAllSceneryFromHere => "Unable to remove all scenery from here...",
        }
    }
}

impl core::fmt::Display for StringId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.default_text())
    }
}

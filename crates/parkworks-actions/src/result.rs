//! The result model shared by every action.
//!
//! A [`GameActionResult`] is built fresh by each Query or Execute call and
//! handed back by value. Failures keep the position and expenditure
//! category that were known when the check failed, so UI feedback can
//! still be anchored.

use serde::{Deserialize, Serialize};

use parkworks_types::{ActionStatus, CoordsXYZ, ExpenditureType, Money, StringId};

/// A non-fatal anomaly observed while applying an action.
///
/// The action still completes; the diagnostic records what had to be
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where the anomaly was seen.
    pub position: CoordsXYZ,
    /// What went wrong.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(position: CoordsXYZ, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Outcome of one Query or Execute call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameActionResult {
    /// Whether the action succeeded, and if not, why.
    pub status: ActionStatus,
    /// Headline message for a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_title: Option<StringId>,
    /// Detail message for a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<StringId>,
    /// World position for UI feedback.
    pub position: CoordsXYZ,
    /// Cost of the action; zero unless priced.
    pub cost: Money,
    /// Ledger category the cost is booked under.
    pub expenditure: ExpenditureType,
    /// Recoverable anomalies seen while applying the action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl GameActionResult {
    /// A successful, zero-cost result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the UI position.
    #[must_use]
    pub const fn with_position(mut self, position: CoordsXYZ) -> Self {
        self.position = position;
        self
    }

    /// Set the expenditure category.
    #[must_use]
    pub const fn with_expenditure(mut self, expenditure: ExpenditureType) -> Self {
        self.expenditure = expenditure;
        self
    }

    /// Turn this result into a failure, keeping its position and category.
    ///
    /// Cost is reset to zero: nothing is charged for a rejected action.
    #[must_use]
    pub const fn failed(
        mut self,
        status: ActionStatus,
        title: StringId,
        message: Option<StringId>,
    ) -> Self {
        self.status = status;
        self.error_title = Some(title);
        self.error_message = message;
        self.cost = Money::ZERO;
        self
    }

    /// Whether the action succeeded.
    pub const fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Attach a recoverable anomaly.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// One-line English summary for logs and the CLI.
    pub fn summary(&self) -> String {
        if self.is_ok() {
            return format!("ok, cost {}", self.cost);
        }
        let title = self.error_title.map_or("", StringId::default_text);
        match self.error_message {
            Some(message) => format!("{}: {title} {message}", self.status),
            None => format!("{}: {title}", self.status),
        }
    }
}

//! Error types for dispatch and replay.
//!
//! Rejected actions are not errors; they come back as a
//! [`GameActionResult`](parkworks_actions::GameActionResult). These errors
//! cover failures in the machinery around an action.

use parkworks_actions::ActionError;
use parkworks_ledger::LedgerError;

/// Errors raised while dispatching an action.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The command could not be encoded for the replay log.
    #[error("failed to encode command: {0}")]
    Encode(#[from] ActionError),

    /// The ledger refused the expenditure.
    #[error("failed to post expenditure: {0}")]
    Ledger(#[from] LedgerError),
}

/// Errors raised while loading, saving, or replaying a replay log.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Failed to read or write the log file.
    #[error("replay log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The log file is not valid JSON.
    #[error("replay log is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry's payload is not a valid command.
    #[error("replay entry {index} could not be decoded: {source}")]
    Decode {
        /// Position of the entry in the log.
        index: usize,
        /// The decoding failure.
        source: ActionError,
    },

    /// Re-executing an entry failed.
    #[error("replay entry {index} could not be dispatched: {source}")]
    Dispatch {
        /// Position of the entry in the log.
        index: usize,
        /// The dispatch failure.
        source: DispatchError,
    },
}

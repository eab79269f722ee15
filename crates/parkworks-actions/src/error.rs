//! Error types for the parkworks-actions crate.
//!
//! Action outcomes are never errors: Query and Execute report rejections
//! through [`GameActionResult`](crate::GameActionResult). The errors here
//! cover the plumbing around actions, such as decoding a command from the
//! wire or importing parameters from a script.

use crate::registry::GameActionType;

/// Errors raised while building, decoding, or encoding actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The stream ended before a field could be read.
    #[error("truncated command: needed {needed} bytes but only {remaining} remain")]
    Truncated {
        /// Bytes the field required.
        needed: usize,
        /// Bytes left in the stream.
        remaining: usize,
    },

    /// Bytes were left over after every field was read.
    #[error("{0} trailing bytes after command")]
    TrailingBytes(usize),

    /// The envelope named an action type id that is not registered.
    #[error("unknown action type id: {0}")]
    UnknownActionType(u32),

    /// A script named an action that is not registered.
    #[error("unknown action name: {0}")]
    UnknownActionName(String),

    /// A script named a command flag that does not exist.
    #[error("unknown command flag: {0}")]
    UnknownFlag(String),

    /// A named argument the action needs was not supplied.
    #[error("missing parameter `{name}` for {action}")]
    MissingParameter {
        /// The action being imported.
        action: GameActionType,
        /// The parameter name.
        name: String,
    },

    /// A named argument had the wrong type or was out of range.
    #[error("parameter `{name}` must be {expected}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Description of the accepted values.
        expected: &'static str,
    },

    /// A named argument was supplied that the action does not declare.
    #[error("unexpected parameter `{name}` for {action}")]
    UnexpectedParameter {
        /// The action being imported.
        action: GameActionType,
        /// The parameter name.
        name: String,
    },

    /// A string field is longer than the wire format can carry.
    #[error("string field `{name}` is {length} bytes, over the wire limit")]
    StringTooLong {
        /// The field name.
        name: String,
        /// Its length in bytes.
        length: usize,
    },

    /// A string field did not contain valid UTF-8.
    #[error("string field `{0}` is not valid UTF-8")]
    InvalidUtf8(String),
}

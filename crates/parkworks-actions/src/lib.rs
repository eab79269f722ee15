//! Game actions for the Parkworks simulation.
//!
//! Every change to the park map is a [`GameAction`]: a small value holding
//! its own parameters that can be validated without side effects
//! ([`GameAction::query`]), applied ([`GameAction::execute`]), and
//! serialised byte for byte so that peers and replay logs reproduce the
//! same world from the same command stream.
//!
//! # Modules
//!
//! - [`action`] -- The [`GameAction`] contract and [`ActionContext`]
//! - [`result`] -- [`GameActionResult`] and non-fatal [`Diagnostic`]s
//! - [`visitor`] -- Named parameter walks: export, import, description
//! - [`serialise`] -- Big-endian [`DataSerialiser`] and the command envelope
//! - [`registry`] -- [`GameActionType`] ids, names, and factory
//! - [`commands`] -- Concrete actions
//! - [`error`] -- [`ActionError`] for decoding and import failures

pub mod action;
pub mod commands;
pub mod error;
pub mod registry;
pub mod result;
pub mod serialise;
pub mod visitor;

pub use action::{AccountingKey, ActionContext, GameAction, SceneryAccounting, Session};
pub use commands::{ClearSceneryAction, LargeSceneryRemoveAction};
pub use error::ActionError;
pub use registry::GameActionType;
pub use result::{Diagnostic, GameActionResult};
pub use serialise::{CommandEnvelope, DataSerialiser, decode_command, encode_command};
pub use visitor::{
    ParameterArgs, ParameterExporter, ParameterImporter, ParameterMap, ParameterValue,
    ParameterVisitor, describe_action, export_parameters, import_action,
};

//! Action dispatch, replay logging, and configuration for Parkworks.
//!
//! This crate sits between callers (the engine binary, scripts, network
//! peers) and the actions themselves. It decides when an action is queried
//! and when it is executed, applies session-wide gates, charges the park,
//! and records every applied command so the session can be replayed.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `parkworks.yaml` into
//!   strongly-typed structs.
//! - [`dispatcher`] -- [`Dispatcher`]: the query/execute pipeline.
//! - [`replay`] -- [`ReplayLog`] recording and re-execution.
//! - [`error`] -- [`DispatchError`] and [`ReplayError`].
//!
//! [`Dispatcher`]: dispatcher::Dispatcher
//! [`ReplayLog`]: replay::ReplayLog
//! [`DispatchError`]: error::DispatchError
//! [`ReplayError`]: error::ReplayError

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod replay;

//! Replay logs.
//!
//! Every command the dispatcher applies is appended to a [`ReplayLog`] as
//! its encoded command envelope. Feeding the log back through a fresh
//! dispatcher against the same starting world reproduces the same final
//! world, which is how peers and saved replays stay in step.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use parkworks_actions::{GameActionResult, GameActionType, decode_command};
use parkworks_types::{GameCommandFlags, ReplayId};
use parkworks_world::World;

use crate::dispatcher::Dispatcher;
use crate::error::ReplayError;

/// One recorded command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// Tick the command was applied in.
    pub tick: u64,
    /// Batch the command was applied in.
    #[serde(default)]
    pub batch: u64,
    /// Encoded command envelope.
    pub payload: Vec<u8>,
}

/// An ordered log of applied commands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Unique id of this recording.
    id: ReplayId,
    /// Recorded commands, oldest first.
    entries: Vec<ReplayEntry>,
}

/// What happened to one entry during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Tick the entry was recorded in.
    pub tick: u64,
    /// The replayed action type.
    pub action: GameActionType,
    /// The execute result.
    pub result: GameActionResult,
}

impl ReplayLog {
    /// Create an empty log with a fresh id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique id of this recording.
    pub const fn id(&self) -> ReplayId {
        self.id
    }

    /// Recorded commands, oldest first.
    pub fn entries(&self) -> &[ReplayEntry] {
        &self.entries
    }

    /// Number of recorded commands.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a command.
    pub fn record(&mut self, tick: u64, batch: u64, payload: Vec<u8>) {
        debug!(tick, batch, bytes = payload.len(), "command recorded");
        self.entries.push(ReplayEntry {
            tick,
            batch,
            payload,
        });
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] if the text is not a replay log.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the log to a file as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        std::fs::write(path, self.to_json()?)?;
        info!(replay_id = %self.id, entries = self.entries.len(), path = %path.display(), "replay log saved");
        Ok(())
    }

    /// Read a log from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the read or parse fails.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Re-execute every entry against `world` through `dispatcher`.
    ///
    /// Entries run with `REPLAY` added to their recorded flags. The
    /// dispatcher's tick is advanced to each entry's tick, and the dispatcher
    /// enters each entry's recorded batch when the batch changes, so
    /// re-recorded entries keep their batch numbers. Rejected entries are
    /// reported in the outcomes; they do not stop the replay.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Decode`] for a corrupt entry, or
    /// [`ReplayError::Dispatch`] if the dispatcher fails.
    pub fn replay_into(
        &self,
        world: &mut World,
        dispatcher: &mut Dispatcher,
    ) -> Result<Vec<ReplayOutcome>, ReplayError> {
        let mut outcomes = Vec::with_capacity(self.entries.len());
        let mut current_batch = None;

        for (index, entry) in self.entries.iter().enumerate() {
            let mut envelope = decode_command(&entry.payload)
                .map_err(|source| ReplayError::Decode { index, source })?;

            while dispatcher.tick() < entry.tick {
                dispatcher.advance_tick();
            }
            if current_batch != Some(entry.batch) {
                dispatcher.enter_batch(entry.batch);
                current_batch = Some(entry.batch);
            }

            let flags = envelope.flags.with(GameCommandFlags::REPLAY);
            let result = dispatcher
                .execute(world, envelope.action.as_mut(), flags)
                .map_err(|source| ReplayError::Dispatch { index, source })?;
            outcomes.push(ReplayOutcome {
                tick: entry.tick,
                action: envelope.action.action_type(),
                result,
            });
        }

        let rejected = outcomes.iter().filter(|o| !o.result.is_ok()).count();
        info!(
            replay_id = %self.id,
            entries = outcomes.len(),
            rejected,
            "replay finished"
        );
        Ok(outcomes)
    }
}

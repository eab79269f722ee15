//! Command scripts.
//!
//! A script is a YAML list of commands, each naming an action by its
//! registry name together with its arguments and command flags. Scripts
//! drive the dispatcher the same way a player's tool would.
//!
//! ```yaml
//! commands:
//!   - action: large_scenery_remove
//!     mode: query
//!     args: { x: 160, y: 160, z: 16, direction: 0, tileIndex: 3 }
//!   - action: clear_scenery
//!     new_batch: true
//!     args: { left: 0, top: 0, right: 255, bottom: 255 }
//! ```

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use parkworks_actions::{ActionError, GameActionType, ParameterArgs, describe_action, import_action};
use parkworks_core::dispatcher::Dispatcher;
use parkworks_types::GameCommandFlags;
use parkworks_world::World;

use crate::error::EngineError;

/// Whether a command is only priced or actually applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Validate and price without changing the world.
    Query,
    /// Validate, apply, charge, and record.
    #[default]
    Execute,
}

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptCommand {
    /// Registry name of the action, e.g. `large_scenery_remove`.
    pub action: String,
    /// Named action arguments.
    #[serde(default)]
    pub args: ParameterArgs,
    /// Command flag names, e.g. `ghost`.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Query or execute.
    #[serde(default)]
    pub mode: Mode,
    /// Start a new batch before this command.
    #[serde(default)]
    pub new_batch: bool,
    /// Ticks to advance before this command.
    #[serde(default)]
    pub advance_ticks: u64,
}

/// An ordered list of commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandScript {
    /// Commands, applied in order.
    #[serde(default)]
    pub commands: Vec<ScriptCommand>,
}

/// Outcome counts for a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Executed commands that were applied.
    pub applied: usize,
    /// Query-mode commands that passed.
    pub priced: usize,
    /// Commands of either mode that were rejected.
    pub rejected: usize,
}

impl CommandScript {
    /// Load a script from a YAML file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        load_yaml(path)
    }

    /// Run every command against `world` through `dispatcher`.
    ///
    /// Rejected actions are counted and logged; they do not stop the run.
    /// An unknown action, flag, or argument does.
    pub fn run(
        &self,
        world: &mut World,
        dispatcher: &mut Dispatcher,
    ) -> Result<ScriptReport, EngineError> {
        let mut report = ScriptReport::default();

        for (index, command) in self.commands.iter().enumerate() {
            for _ in 0..command.advance_ticks {
                dispatcher.advance_tick();
            }
            if command.new_batch {
                dispatcher.begin_batch();
            }

            let action_type = GameActionType::from_name(&command.action)
                .map_err(|source| EngineError::Action { index, source })?;
            let flags = parse_flags(&command.flags)
                .map_err(|source| EngineError::Action { index, source })?;
            let mut action = import_action(action_type, &command.args)
                .map_err(|source| EngineError::Action { index, source })?;

            let result = match command.mode {
                Mode::Query => dispatcher.query(world, action.as_ref(), flags),
                Mode::Execute => dispatcher.execute(world, action.as_mut(), flags)?,
            };

            let described = describe_action(action.as_mut());
            if result.is_ok() {
                match command.mode {
                    Mode::Query => report.priced = report.priced.saturating_add(1),
                    Mode::Execute => report.applied = report.applied.saturating_add(1),
                }
                info!(index, action = %described, mode = ?command.mode, cost = %result.cost, "command ok");
            } else {
                report.rejected = report.rejected.saturating_add(1);
                warn!(index, action = %described, mode = ?command.mode, reason = %result.summary(), "command rejected");
            }
        }

        Ok(report)
    }
}

/// Combine flag names into command flags.
pub fn parse_flags(names: &[String]) -> Result<GameCommandFlags, ActionError> {
    names.iter().try_fold(GameCommandFlags::NONE, |flags, name| {
        GameCommandFlags::from_name(name)
            .map(|flag| flags.with(flag))
            .ok_or_else(|| ActionError::UnknownFlag(name.clone()))
    })
}

/// Read and parse a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yml::from_str(&contents).map_err(|source| EngineError::Yaml {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkworks_core::config::ParkConfig;
    use parkworks_types::{CoordsXY, Money};
    use parkworks_world::demo_scenario;

    const DEMO_SCRIPT: &str = include_str!("../../../demos/remove_scenery.yaml");

    fn parse(yaml: &str) -> CommandScript {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn demo_script_runs_against_demo_scenario() {
        let script = parse(DEMO_SCRIPT);
        let mut world = demo_scenario().build().unwrap();
        let mut dispatcher = Dispatcher::new(&ParkConfig::default());

        let report = script.run(&mut world, &mut dispatcher).unwrap();
        assert_eq!(
            report,
            ScriptReport {
                applied: 3,
                priced: 1,
                rejected: 1,
            }
        );

        // Fountain and bench are charged; the ghost preview is free.
        assert_eq!(dispatcher.ledger().len(), 2);
        assert_eq!(dispatcher.ledger().cash(), Money(99_830));
        assert_eq!(dispatcher.replay_log().len(), 2);
        assert_eq!(dispatcher.tick(), 2);
        assert_eq!(dispatcher.batch(), 1);
        assert_eq!(world.element_count(), 0);
        assert_eq!(world.banner_count(), 0);
        assert!(world.elements_at(CoordsXY::new(32, 32)).is_empty());
    }

    #[test]
    fn commands_default_to_execute() {
        let script = parse(
            "commands:\n  - action: clear_scenery\n    args: { left: 0, top: 0, right: 31, bottom: 31 }\n",
        );
        let command = &script.commands[0];
        assert_eq!(command.mode, Mode::Execute);
        assert!(command.flags.is_empty());
        assert!(!command.new_batch);
        assert_eq!(command.advance_ticks, 0);
    }

    #[test]
    fn flags_combine_by_name() {
        let flags = parse_flags(&["ghost".to_owned(), "no_spend".to_owned()]).unwrap();
        assert!(flags.contains(GameCommandFlags::GHOST));
        assert!(flags.contains(GameCommandFlags::NO_SPEND));
        assert!(!flags.contains(GameCommandFlags::APPLY));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = parse_flags(&["teleport".to_owned()]).unwrap_err();
        assert_eq!(err, ActionError::UnknownFlag("teleport".to_owned()));
    }

    #[test]
    fn unknown_action_stops_the_run() {
        let script = parse("commands:\n  - action: demolish_everything\n");
        let mut world = demo_scenario().build().unwrap();
        let mut dispatcher = Dispatcher::new(&ParkConfig::default());
        let err = script.run(&mut world, &mut dispatcher).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Action {
                index: 0,
                source: ActionError::UnknownActionName(_)
            }
        ));
    }

    #[test]
    fn missing_argument_stops_the_run() {
        let script = parse(
            "commands:\n  - action: large_scenery_remove\n    args: { x: 32, y: 32, z: 16, direction: 0 }\n",
        );
        let mut world = demo_scenario().build().unwrap();
        let mut dispatcher = Dispatcher::new(&ParkConfig::default());
        let err = script.run(&mut world, &mut dispatcher).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Action {
                source: ActionError::MissingParameter { .. },
                ..
            }
        ));
        assert_eq!(world.element_count(), 8);
    }
}

//! Command-script runner for the Parkworks simulation.
//!
//! Loads a park, applies a script of player commands through the
//! dispatcher, and writes the resulting replay log so the session can be
//! reproduced elsewhere.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `parkworks.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting world from `PARKWORKS_SCENARIO` or the demo park
//! 4. Load the command script named on the command line
//! 5. Run the script through a dispatcher
//! 6. Log finances and write the replay log

mod error;
mod script;

use std::path::{Path, PathBuf};

use parkworks_core::config::ParkConfig;
use parkworks_core::dispatcher::Dispatcher;
use parkworks_world::{ScenarioDefinition, demo_scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::script::CommandScript;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "parkworks.yaml";

/// Script run when none is named on the command line.
const DEFAULT_SCRIPT: &str = "demos/remove_scenery.yaml";

/// Environment variable naming a scenario YAML file.
const ENV_SCENARIO: &str = "PARKWORKS_SCENARIO";

/// Environment variable naming the replay output file.
const ENV_REPLAY_OUT: &str = "PARKWORKS_REPLAY_OUT";

/// Replay output used when `PARKWORKS_REPLAY_OUT` is unset.
const DEFAULT_REPLAY_OUT: &str = "parkworks-replay.json";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the scenario, or the script cannot
/// be loaded, or if the dispatcher or replay writer fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        editor_mode = config.session.editor_mode,
        sandbox_mode = config.session.sandbox_mode,
        paused = config.session.paused,
        starting_cash = %config.finance.starting_money(),
        "parkworks-engine starting"
    );

    // 3. Build the starting world.
    let scenario = load_scenario()?;
    let mut world = scenario.build()?;

    // 4. Load the command script.
    let script_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_SCRIPT), PathBuf::from);
    let script = CommandScript::load(&script_path)?;
    info!(
        script = %script_path.display(),
        commands = script.commands.len(),
        "Command script loaded"
    );

    // 5. Run it.
    let mut dispatcher = Dispatcher::new(&config);
    let report = script.run(&mut world, &mut dispatcher)?;

    // 6. Log results and write the replay log.
    for (category, total) in dispatcher.ledger().totals_by_category() {
        info!(category = ?category, %total, "expenditure");
    }
    info!(
        applied = report.applied,
        priced = report.priced,
        rejected = report.rejected,
        cash = %dispatcher.ledger().cash(),
        elements = world.element_count(),
        "Script finished"
    );

    let replay = dispatcher.take_replay_log();
    let replay_path = std::env::var(ENV_REPLAY_OUT)
        .map_or_else(|_| PathBuf::from(DEFAULT_REPLAY_OUT), PathBuf::from);
    replay.save(&replay_path).map_err(EngineError::from)?;
    info!(
        replay_id = %replay.id(),
        entries = replay.len(),
        path = %replay_path.display(),
        "parkworks-engine shutdown complete"
    );

    Ok(())
}

/// Load the park configuration from `parkworks.yaml`.
fn load_config() -> Result<ParkConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        ParkConfig::from_file(config_path)?
    } else {
        ParkConfig::parse("")?
    };
    Ok(config)
}

/// Load the scenario named by `PARKWORKS_SCENARIO`, or the demo park.
fn load_scenario() -> Result<ScenarioDefinition, EngineError> {
    match std::env::var(ENV_SCENARIO) {
        Ok(path) => script::load_yaml(Path::new(&path)),
        Err(_) => {
            info!("No scenario file set, using the demo park");
            Ok(demo_scenario())
        }
    }
}

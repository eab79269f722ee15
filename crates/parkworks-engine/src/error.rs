//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode between startup and the final
//! replay write, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: parkworks_core::config::ConfigError,
    },

    /// The scenario could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: parkworks_world::WorldError,
    },

    /// A scripted command named an unknown action, flag, or argument.
    #[error("command {index}: {source}")]
    Action {
        /// Position of the command in the script.
        index: usize,
        /// The underlying action error.
        source: parkworks_actions::ActionError,
    },

    /// The dispatcher failed while applying a command.
    #[error("dispatch error: {source}")]
    Dispatch {
        /// The underlying dispatch error.
        #[from]
        source: parkworks_core::error::DispatchError,
    },

    /// Saving the replay log failed.
    #[error("replay error: {source}")]
    Replay {
        /// The underlying replay error.
        #[from]
        source: parkworks_core::error::ReplayError,
    },

    /// A scenario or script file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A scenario or script file is not valid YAML.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// The file that could not be parsed.
        path: String,
        /// The underlying YAML error.
        source: serde_yml::Error,
    },
}

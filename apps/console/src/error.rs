use covert_core::error::CoreError;

use common::ErrorLocation;

use thiserror::Error;

/// Errors surfaced by the operator console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Error from this app (startup, logging, terminal I/O)
    #[error("Console Error: {message} {location}")]
    Console {
        message: String,
        location: ErrorLocation,
    },

    /// A line the operator typed that is not a command
    #[error("Command Error: {message} {location}")]
    Command {
        message: String,
        location: ErrorLocation,
    },

    /// Error from covert-core (validation, transport, config)
    #[error(transparent)]
    Core(#[from] CoreError),
}

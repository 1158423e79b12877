use crate::error::option::OptionError;
use crate::error::registry::RegistryError;
use crate::session::SessionState;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Errors returned by operator actions on a [`Session`](crate::session::Session).
///
/// A session that returns one of these has not changed and has not emitted
/// anything to the wire.
#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Invalid State Error: cannot {action} while {state} {location}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
        location: ErrorLocation,
    },

    #[error("No Channel Error: select a channel first {location}")]
    NoChannelSelected { location: ErrorLocation },

    #[error("Processor Error: processor #{index} has no type selected {location}")]
    ProcessorUnselected { index: usize, location: ErrorLocation },

    #[error("Processor Error: no processor at #{index} ({len} configured) {location}")]
    ProcessorIndex {
        index: usize,
        len: usize,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SessionError {
    #[track_caller]
    pub fn invalid_state(action: &'static str, state: SessionState) -> Self {
        SessionError::InvalidState {
            action,
            state,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_channel_selected() -> Self {
        SessionError::NoChannelSelected {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn processor_unselected(index: usize) -> Self {
        SessionError::ProcessorUnselected {
            index,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn processor_index(index: usize, len: usize) -> Self {
        SessionError::ProcessorIndex {
            index,
            len,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

//! Validation failures raised while mutating a configuration option.
//!
//! These never reach the wire: a rejected value leaves the option untouched
//! and the caller surfaces the error to the operator.

use crate::option::TypeTag;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OptionError {
    #[error("Type Mismatch Error: expected {expected}, got {found} {location}")]
    TypeMismatch {
        expected: TypeTag,
        found: String,
        location: ErrorLocation,
    },

    #[error("Out Of Range Error: '{input}' does not fit {tag} {location}")]
    OutOfRange {
        tag: TypeTag,
        input: String,
        location: ErrorLocation,
    },

    #[error("Invalid Choice Error: '{value}' is not one of {choices:?} {location}")]
    InvalidChoice {
        value: String,
        choices: Vec<String>,
        location: ErrorLocation,
    },

    #[error("Parse Error: '{input}' is not a valid {tag}: {reason} {location}")]
    Parse {
        tag: TypeTag,
        input: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Unsupported Type Error: options of type '{tag}' cannot be edited {location}")]
    UnsupportedType { tag: TypeTag, location: ErrorLocation },

    #[error("Unknown Option Error: no option named '{key}' {location}")]
    UnknownOption { key: String, location: ErrorLocation },
}

impl OptionError {
    #[track_caller]
    pub fn type_mismatch(expected: TypeTag, found: impl Into<String>) -> Self {
        OptionError::TypeMismatch {
            expected,
            found: found.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn out_of_range(tag: TypeTag, input: impl Into<String>) -> Self {
        OptionError::OutOfRange {
            tag,
            input: input.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_choice(value: impl Into<String>, choices: &[String]) -> Self {
        OptionError::InvalidChoice {
            value: value.into(),
            choices: choices.to_vec(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn parse(tag: TypeTag, input: impl Into<String>, reason: impl Into<String>) -> Self {
        OptionError::Parse {
            tag,
            input: input.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unsupported(tag: TypeTag) -> Self {
        OptionError::UnsupportedType {
            tag,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_option(key: impl Into<String>) -> Self {
        OptionError::UnknownOption {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short category name, used in log lines.
    pub fn error_category(&self) -> &'static str {
        match self {
            OptionError::TypeMismatch { .. } => "type_mismatch",
            OptionError::OutOfRange { .. } => "out_of_range",
            OptionError::InvalidChoice { .. } => "invalid_choice",
            OptionError::Parse { .. } => "parse",
            OptionError::UnsupportedType { .. } => "unsupported_type",
            OptionError::UnknownOption { .. } => "unknown_option",
        }
    }
}

use crate::registry::CatalogKind;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("Unknown Type Error: no {kind} named '{name}' in the schema {location}")]
    UnknownType {
        kind: CatalogKind,
        name: String,
        location: ErrorLocation,
    },
}

impl RegistryError {
    #[track_caller]
    pub fn unknown_type(kind: CatalogKind, name: impl Into<String>) -> Self {
        RegistryError::UnknownType {
            kind,
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

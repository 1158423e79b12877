//! Catalog of the processor and channel types the server advertises.
//!
//! The registry is filled from the `Default` member of a `config` response
//! and is only ever replaced as a whole. Templates never leave the registry:
//! [`SchemaRegistry::lookup`] hands out copies, so operator edits cannot leak
//! back into the catalog.

use crate::error::registry::RegistryError;
use crate::option::OptionSet;

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Which catalog a type name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Processor,
    Channel,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Processor => write!(f, "processor"),
            CatalogKind::Channel => write!(f, "channel"),
        }
    }
}

/// The `Default` member of a `config` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefaults {
    #[serde(rename = "Channel", default)]
    pub channels: BTreeMap<String, OptionSet>,

    #[serde(rename = "Processor", default)]
    pub processors: BTreeMap<String, OptionSet>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    processors: BTreeMap<String, OptionSet>,
    channels: BTreeMap<String, OptionSet>,
    loaded: bool,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both catalogs with the ones in `defaults`.
    ///
    /// Nothing from a previous load survives, even names the new payload
    /// does not mention.
    pub fn load(&mut self, defaults: SchemaDefaults) {
        if self.loaded {
            debug!(
                "Replacing schema ({} channels, {} processors)",
                self.channels.len(),
                self.processors.len()
            );
        }

        self.channels = defaults.channels;
        self.processors = defaults.processors;
        self.loaded = true;

        info!(
            "Schema loaded: {} channels, {} processors",
            self.channels.len(),
            self.processors.len()
        );
    }

    /// Return an independent copy of the option-set published for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] if `name` is not in the catalog.
    #[track_caller]
    pub fn lookup(&self, kind: CatalogKind, name: &str) -> Result<OptionSet, RegistryError> {
        match self.catalog(kind).get(name) {
            Some(template) => Ok(template.clone()),
            None => Err(RegistryError::unknown_type(kind, name)),
        }
    }

    #[track_caller]
    pub fn ensure_known(&self, kind: CatalogKind, name: &str) -> Result<(), RegistryError> {
        if self.contains(kind, name) {
            Ok(())
        } else {
            Err(RegistryError::unknown_type(kind, name))
        }
    }

    pub fn contains(&self, kind: CatalogKind, name: &str) -> bool {
        self.catalog(kind).contains_key(name)
    }

    /// Type names in the catalog, sorted.
    pub fn names(&self, kind: CatalogKind) -> impl Iterator<Item = &str> {
        self.catalog(kind).keys().map(String::as_str)
    }

    pub fn len(&self, kind: CatalogKind) -> usize {
        self.catalog(kind).len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn catalog(&self, kind: CatalogKind) -> &BTreeMap<String, OptionSet> {
        match kind {
            CatalogKind::Processor => &self.processors,
            CatalogKind::Channel => &self.channels,
        }
    }
}

use crate::error::option::OptionError;
use crate::option::{ConfigOption, OptionValue};

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The configurable surface of one processor or channel type.
///
/// Keys are fixed by the schema: options can be changed but never added or
/// removed. Iteration is in key order, which gives renderers a stable layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
    options: BTreeMap<String, ConfigOption>,
}

impl OptionSet {
    pub fn get(&self, key: &str) -> Option<&ConfigOption> {
        self.options.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, ConfigOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Set a typed value on option `key`.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<(), OptionError> {
        self.option_mut(key)?.set(value)
    }

    /// Parse `input` according to option `key`'s type and store it.
    pub fn set_from_str(&mut self, key: &str, input: &str) -> Result<(), OptionError> {
        self.option_mut(key)?.set_from_str(input)
    }

    /// Store a native JSON value on option `key`.
    pub fn set_json(&mut self, key: &str, raw: Value) -> Result<(), OptionError> {
        self.option_mut(key)?.set_json(raw)
    }

    /// Copy values from `other` into this set.
    ///
    /// A value is taken only where this set has the same key with the same
    /// type tag and the value passes this option's checks. Keys and metadata
    /// never change. Returns the keys of `other` that were not taken.
    pub fn adopt_values(&mut self, other: &OptionSet) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, source) in other {
            let adopted = match self.options.get_mut(key) {
                Some(target) if target.type_tag() == source.type_tag() => {
                    target.set(source.value().clone()).is_ok()
                }
                _ => false,
            };
            if !adopted {
                skipped.push(key.clone());
            }
        }
        skipped
    }

    fn option_mut(&mut self, key: &str) -> Result<&mut ConfigOption, OptionError> {
        self.options
            .get_mut(key)
            .ok_or_else(|| OptionError::unknown_option(key))
    }
}

/// Errors name the offending option, so a rejected schema can be traced to
/// the entry that caused it.
impl<'de> Deserialize<'de> for OptionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| match ConfigOption::deserialize(value) {
                Ok(option) => Ok((key, option)),
                Err(e) => Err(D::Error::custom(format!("option '{key}': {e}"))),
            })
            .collect()
    }
}

impl FromIterator<(String, ConfigOption)> for OptionSet {
    fn from_iter<T: IntoIterator<Item = (String, ConfigOption)>>(iter: T) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = (&'a String, &'a ConfigOption);
    type IntoIter = Iter<'a, String, ConfigOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

use crate::error::option::OptionError;
use crate::option::{OptionValue, RenderHint, TypeTag};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const RANGE_KEY: &str = "Range";

/// The `Display` member of an option: human-facing metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Display {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One typed, server-described configuration option.
///
/// The type tag is fixed at construction. All mutation goes through
/// [`ConfigOption::set`] (or the text/JSON front-ends built on it), which
/// rejects anything the tag does not allow and leaves the option untouched
/// on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfigOption", into = "RawConfigOption")]
pub struct ConfigOption {
    tag: TypeTag,
    value: OptionValue,
    display: Display,
    range: Option<Vec<String>>,
    /// The value an `exactu64` option was published with.
    required: Option<u64>,
    extra: BTreeMap<String, Value>,
}

/// Untrusted wire form, validated into [`ConfigOption`] on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConfigOption {
    #[serde(rename = "Type")]
    tag: TypeTag,

    #[serde(rename = "Value", default)]
    value: Value,

    #[serde(rename = "Display", default)]
    display: Display,

    #[serde(rename = "Range", default, skip_serializing_if = "Option::is_none")]
    range: Option<Value>,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl ConfigOption {
    /// Build an option from typed parts, applying the same checks as a
    /// server-supplied option.
    pub fn new(
        tag: TypeTag,
        value: OptionValue,
        name: impl Into<String>,
        range: Option<Vec<String>>,
    ) -> Result<Self, OptionError> {
        let required = match value {
            OptionValue::ExactU64(n) => Some(n),
            _ => None,
        };
        let option = Self {
            tag,
            value: value.clone(),
            display: Display {
                name: name.into(),
                extra: BTreeMap::new(),
            },
            range,
            required,
            extra: BTreeMap::new(),
        };
        if option.tag.is_supported() {
            option.check(&value)?;
        }
        Ok(option)
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_name(&self) -> &str {
        &self.display.name
    }

    /// Allowed choices; only present for `select` options.
    pub fn range(&self) -> Option<&[String]> {
        self.range.as_deref()
    }

    pub fn render_hint(&self) -> RenderHint {
        self.tag.render_hint()
    }

    pub fn render(&self) -> String {
        self.value.render()
    }

    /// Replace the value with a typed one.
    ///
    /// # Errors
    ///
    /// - [`OptionError::UnsupportedType`] if the option's tag is unknown
    /// - [`OptionError::TypeMismatch`] if `value` belongs to another tag
    /// - [`OptionError::OutOfRange`] if an `exactu64` value differs from the published one
    /// - [`OptionError::InvalidChoice`] if a `select` value is not in `Range`
    pub fn set(&mut self, value: OptionValue) -> Result<(), OptionError> {
        self.check(&value)?;
        self.value = value;
        Ok(())
    }

    /// Parse operator text according to the option's tag and store it.
    pub fn set_from_str(&mut self, input: &str) -> Result<(), OptionError> {
        let value = OptionValue::parse(&self.tag, input)?;
        self.set(value)
    }

    /// Store a native JSON value (checkbox state, number field, ...).
    pub fn set_json(&mut self, raw: Value) -> Result<(), OptionError> {
        if !self.tag.is_supported() {
            return Err(OptionError::unsupported(self.tag.clone()));
        }
        let value = OptionValue::from_json(&self.tag, raw)?;
        self.set(value)
    }

    fn check(&self, value: &OptionValue) -> Result<(), OptionError> {
        if !self.tag.is_supported() {
            return Err(OptionError::unsupported(self.tag.clone()));
        }
        if !value.matches(&self.tag) {
            return Err(OptionError::type_mismatch(self.tag.clone(), value.kind()));
        }

        match value {
            OptionValue::ExactU64(n) => match self.required {
                Some(required) if required != *n => {
                    Err(OptionError::out_of_range(self.tag.clone(), n.to_string()))
                }
                _ => Ok(()),
            },
            OptionValue::Select(choice) => {
                let choices = self.range.as_deref().unwrap_or_default();
                if choices.iter().any(|c| c == choice) {
                    Ok(())
                } else {
                    Err(OptionError::invalid_choice(choice.as_str(), choices))
                }
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<RawConfigOption> for ConfigOption {
    type Error = OptionError;

    fn try_from(raw: RawConfigOption) -> Result<Self, Self::Error> {
        let RawConfigOption {
            tag,
            value,
            display,
            range,
            mut extra,
        } = raw;

        let range = match (&tag, range) {
            (TypeTag::Select, Some(raw_range)) => Some(select_range(&tag, raw_range)?),
            // Non-select options keep whatever Range they came with, untouched.
            (_, Some(raw_range)) => {
                extra.insert(RANGE_KEY.to_string(), raw_range);
                None
            }
            (_, None) => None,
        };

        let value = OptionValue::from_json(&tag, value)?;
        let required = match value {
            OptionValue::ExactU64(n) => Some(n),
            _ => None,
        };

        let option = Self {
            tag,
            value,
            display,
            range,
            required,
            extra,
        };
        if option.tag.is_supported() {
            option.check(&option.value)?;
        }
        Ok(option)
    }
}

impl From<ConfigOption> for RawConfigOption {
    fn from(option: ConfigOption) -> Self {
        let mut extra = option.extra;
        let range = match option.range {
            Some(choices) => Some(Value::from(choices)),
            None => extra.remove(RANGE_KEY),
        };

        Self {
            tag: option.tag,
            value: option.value.to_json(),
            display: option.display,
            range,
            extra,
        }
    }
}

fn select_range(tag: &TypeTag, raw: Value) -> Result<Vec<String>, OptionError> {
    match raw {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(choice) => Ok(choice),
                other => Err(OptionError::type_mismatch(tag.clone(), other.to_string())),
            })
            .collect(),
        other => Err(OptionError::type_mismatch(tag.clone(), other.to_string())),
    }
}

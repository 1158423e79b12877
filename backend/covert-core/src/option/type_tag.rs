use std::fmt;

use serde::{Deserialize, Serialize};

const IPV4: &str = "ipv4";
const I8: &str = "i8";
const U16: &str = "u16";
const U64: &str = "u64";
const EXACT_U64: &str = "exactu64";
const BOOL: &str = "bool";
const SELECT: &str = "select";

/// The type tag carried in an option's `Type` member.
///
/// Tags the client does not know are kept as [`TypeTag::Unsupported`] rather
/// than rejected, so a newer server can still be talked to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Ipv4,
    I8,
    U16,
    U64,
    ExactU64,
    Bool,
    Select,
    Unsupported(String),
}

/// Which kind of input widget a renderer should use for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHint {
    Text,
    Numeric,
    Checkbox,
    Choice,
    Unsupported,
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Ipv4 => IPV4,
            TypeTag::I8 => I8,
            TypeTag::U16 => U16,
            TypeTag::U64 => U64,
            TypeTag::ExactU64 => EXACT_U64,
            TypeTag::Bool => BOOL,
            TypeTag::Select => SELECT,
            TypeTag::Unsupported(tag) => tag,
        }
    }

    pub fn render_hint(&self) -> RenderHint {
        match self {
            TypeTag::Ipv4 => RenderHint::Text,
            TypeTag::I8 | TypeTag::U16 | TypeTag::U64 | TypeTag::ExactU64 => RenderHint::Numeric,
            TypeTag::Bool => RenderHint::Checkbox,
            TypeTag::Select => RenderHint::Choice,
            TypeTag::Unsupported(_) => RenderHint::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, TypeTag::Unsupported(_))
    }
}

impl From<&str> for TypeTag {
    fn from(tag: &str) -> Self {
        match tag {
            IPV4 => TypeTag::Ipv4,
            I8 => TypeTag::I8,
            U16 => TypeTag::U16,
            U64 => TypeTag::U64,
            EXACT_U64 => TypeTag::ExactU64,
            BOOL => TypeTag::Bool,
            SELECT => TypeTag::Select,
            other => TypeTag::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(tag: String) -> Self {
        match TypeTag::from(tag.as_str()) {
            TypeTag::Unsupported(_) => TypeTag::Unsupported(tag),
            known => known,
        }
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Unsupported(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::error::option::OptionError;
use crate::option::TypeTag;

use std::net::Ipv4Addr;

use serde_json::Value;

/// A configuration value whose Rust representation matches its type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Ipv4(Ipv4Addr),
    I8(i8),
    U16(u16),
    U64(u64),
    ExactU64(u64),
    Bool(bool),
    Select(String),
    /// Raw JSON of an option whose tag the client does not understand.
    Unsupported(Value),
}

impl OptionValue {
    /// Name of the type this value belongs to, for error messages.
    pub fn kind(&self) -> &str {
        match self {
            OptionValue::Ipv4(_) => TypeTag::Ipv4.as_str(),
            OptionValue::I8(_) => TypeTag::I8.as_str(),
            OptionValue::U16(_) => TypeTag::U16.as_str(),
            OptionValue::U64(_) => TypeTag::U64.as_str(),
            OptionValue::ExactU64(_) => TypeTag::ExactU64.as_str(),
            OptionValue::Bool(_) => TypeTag::Bool.as_str(),
            OptionValue::Select(_) => TypeTag::Select.as_str(),
            OptionValue::Unsupported(_) => "unsupported",
        }
    }

    /// Whether this value may be stored in an option tagged `tag`.
    pub fn matches(&self, tag: &TypeTag) -> bool {
        matches!(
            (self, tag),
            (OptionValue::Ipv4(_), TypeTag::Ipv4)
                | (OptionValue::I8(_), TypeTag::I8)
                | (OptionValue::U16(_), TypeTag::U16)
                | (OptionValue::U64(_), TypeTag::U64)
                | (OptionValue::ExactU64(_), TypeTag::ExactU64)
                | (OptionValue::Bool(_), TypeTag::Bool)
                | (OptionValue::Select(_), TypeTag::Select)
        )
    }

    /// Parse operator text into a value of type `tag`.
    ///
    /// Numbers are base-10. A well-formed number that does not fit the width
    /// is [`OptionError::OutOfRange`]; anything else that is not a number is
    /// [`OptionError::Parse`]. Nothing is clamped or defaulted.
    pub fn parse(tag: &TypeTag, input: &str) -> Result<Self, OptionError> {
        let trimmed = input.trim();

        match tag {
            TypeTag::Ipv4 => parse_ipv4(trimmed)
                .map(OptionValue::Ipv4)
                .map_err(|reason| OptionError::parse(tag.clone(), input, reason)),
            TypeTag::I8 => {
                let wide = parse_integer(tag, trimmed)?;
                i8::try_from(wide)
                    .map(OptionValue::I8)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), input))
            }
            TypeTag::U16 => {
                let wide = parse_integer(tag, trimmed)?;
                u16::try_from(wide)
                    .map(OptionValue::U16)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), input))
            }
            TypeTag::U64 => {
                let wide = parse_integer(tag, trimmed)?;
                u64::try_from(wide)
                    .map(OptionValue::U64)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), input))
            }
            TypeTag::ExactU64 => {
                let wide = parse_integer(tag, trimmed)?;
                u64::try_from(wide)
                    .map(OptionValue::ExactU64)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), input))
            }
            TypeTag::Bool => match trimmed {
                "true" => Ok(OptionValue::Bool(true)),
                "false" => Ok(OptionValue::Bool(false)),
                _ => Err(OptionError::parse(
                    tag.clone(),
                    input,
                    "expected 'true' or 'false'",
                )),
            },
            TypeTag::Select => Ok(OptionValue::Select(input.to_string())),
            TypeTag::Unsupported(_) => Err(OptionError::unsupported(tag.clone())),
        }
    }

    /// Convert a JSON value into a value of type `tag`.
    ///
    /// Used both when loading the schema and when a renderer hands over a
    /// native value (a checkbox state, a number field). A JSON value of the
    /// wrong kind is [`OptionError::TypeMismatch`]; an integer outside the
    /// width is [`OptionError::OutOfRange`].
    pub fn from_json(tag: &TypeTag, raw: Value) -> Result<Self, OptionError> {
        match tag {
            TypeTag::Ipv4 => match &raw {
                Value::String(text) => parse_ipv4(text)
                    .map(OptionValue::Ipv4)
                    .map_err(|reason| OptionError::parse(tag.clone(), text.as_str(), reason)),
                other => Err(OptionError::type_mismatch(tag.clone(), json_kind(other))),
            },
            TypeTag::I8 => {
                let wide = json_integer(tag, &raw)?;
                i8::try_from(wide)
                    .map(OptionValue::I8)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), raw.to_string()))
            }
            TypeTag::U16 => {
                let wide = json_integer(tag, &raw)?;
                u16::try_from(wide)
                    .map(OptionValue::U16)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), raw.to_string()))
            }
            TypeTag::U64 => {
                let wide = json_integer(tag, &raw)?;
                u64::try_from(wide)
                    .map(OptionValue::U64)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), raw.to_string()))
            }
            TypeTag::ExactU64 => {
                let wide = json_integer(tag, &raw)?;
                u64::try_from(wide)
                    .map(OptionValue::ExactU64)
                    .map_err(|_| OptionError::out_of_range(tag.clone(), raw.to_string()))
            }
            TypeTag::Bool => match raw {
                Value::Bool(flag) => Ok(OptionValue::Bool(flag)),
                other => Err(OptionError::type_mismatch(tag.clone(), json_kind(&other))),
            },
            TypeTag::Select => match raw {
                Value::String(choice) => Ok(OptionValue::Select(choice)),
                other => Err(OptionError::type_mismatch(tag.clone(), json_kind(&other))),
            },
            TypeTag::Unsupported(_) => Ok(OptionValue::Unsupported(raw)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Ipv4(addr) => Value::String(addr.to_string()),
            OptionValue::I8(n) => Value::from(*n),
            OptionValue::U16(n) => Value::from(*n),
            OptionValue::U64(n) | OptionValue::ExactU64(n) => Value::from(*n),
            OptionValue::Bool(flag) => Value::Bool(*flag),
            OptionValue::Select(choice) => Value::String(choice.clone()),
            OptionValue::Unsupported(raw) => raw.clone(),
        }
    }

    /// Text form of the value; [`OptionValue::parse`] reads it back unchanged.
    pub fn render(&self) -> String {
        match self {
            OptionValue::Ipv4(addr) => addr.to_string(),
            OptionValue::I8(n) => n.to_string(),
            OptionValue::U16(n) => n.to_string(),
            OptionValue::U64(n) | OptionValue::ExactU64(n) => n.to_string(),
            OptionValue::Bool(flag) => flag.to_string(),
            OptionValue::Select(choice) => choice.clone(),
            OptionValue::Unsupported(raw) => raw.to_string(),
        }
    }
}

/// Dotted quad: exactly four base-10 octets, each 0-255. Leading zeros are
/// accepted and read as decimal, so `010.0.0.1` is `10.0.0.1`.
fn parse_ipv4(text: &str) -> Result<Ipv4Addr, String> {
    let mut octets = [0u8; 4];
    let mut parts = text.split('.');

    for octet in &mut octets {
        let part = parts
            .next()
            .ok_or_else(|| "expected four octets".to_string())?;
        if part.is_empty() || part.len() > 3 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid octet '{part}'"));
        }
        *octet = part
            .parse()
            .map_err(|_| format!("octet '{part}' is larger than 255"))?;
    }
    if parts.next().is_some() {
        return Err("expected four octets".to_string());
    }

    Ok(Ipv4Addr::from(octets))
}

/// Parse a base-10 integer wide enough to range-check every supported width.
///
/// Digit strings too long even for `i128` are out of range, not malformed.
fn parse_integer(tag: &TypeTag, input: &str) -> Result<i128, OptionError> {
    match input.parse::<i128>() {
        Ok(n) => Ok(n),
        Err(e) => {
            let digits = input.strip_prefix('-').unwrap_or(input);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                Err(OptionError::out_of_range(tag.clone(), input))
            } else {
                Err(OptionError::parse(tag.clone(), input, e.to_string()))
            }
        }
    }
}

fn json_integer(tag: &TypeTag, raw: &Value) -> Result<i128, OptionError> {
    if let Some(n) = raw.as_i64() {
        return Ok(i128::from(n));
    }
    if let Some(n) = raw.as_u64() {
        return Ok(i128::from(n));
    }
    match raw {
        // Fractional or exponent-form numbers never fit an integer option.
        Value::Number(_) => Err(OptionError::out_of_range(tag.clone(), raw.to_string())),
        other => Err(OptionError::type_mismatch(tag.clone(), json_kind(other))),
    }
}

fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

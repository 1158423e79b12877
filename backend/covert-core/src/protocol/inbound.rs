use crate::error::wire::WireError;
use crate::option::OptionSet;
use crate::protocol::OpCode;
use crate::registry::SchemaDefaults;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded frame received from the service.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Config(ConfigResponse),
    Open(Acknowledgement),
    Close(Acknowledgement),
    Write(Acknowledgement),
    Read { message: String },
    Error { message: String },
    /// A frame whose op code this client does not know.
    Unknown { op_code: String },
}

/// Body of a `config` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigResponse {
    #[serde(rename = "Default")]
    pub defaults: SchemaDefaults,

    /// The channel the service currently has configured, if it reports one.
    #[serde(rename = "Channel", default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ActiveChannel>,
}

/// The service's active channel configuration.
///
/// `Data` may hold entries for every channel type; only the one named by
/// `Type` is of interest and it is validated lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveChannel {
    #[serde(rename = "Type")]
    pub type_name: String,

    #[serde(rename = "Data", default)]
    pub data: BTreeMap<String, Value>,
}

impl ActiveChannel {
    /// Decode the option-set of the active channel type.
    pub fn properties(&self) -> Result<Option<OptionSet>, WireError> {
        match self.data.get(&self.type_name) {
            Some(raw) => serde_json::from_value(raw.clone()).map(Some).map_err(|e| {
                WireError::decode(format!(
                    "Invalid active configuration for channel '{}': {e}",
                    self.type_name
                ))
            }),
            None => Ok(None),
        }
    }
}

/// Body of a bare `open`/`close`/`write` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "OpCode")]
    op_code: String,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(rename = "Message", default)]
    message: String,
}

impl InboundMessage {
    /// Decode one frame payload.
    ///
    /// An unrecognized op code is not an error; it decodes to
    /// [`InboundMessage::Unknown`] so the router can log and move on.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] if the payload is not JSON, has no
    /// `OpCode`, or a known op code's body is malformed. For `config`, that
    /// includes any option whose value does not match its type tag.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        let envelope: Envelope = serde_json::from_slice(payload)
            .map_err(|e| WireError::decode(format!("Invalid message envelope: {e}")))?;

        let Some(op_code) = OpCode::parse(&envelope.op_code) else {
            return Ok(InboundMessage::Unknown {
                op_code: envelope.op_code,
            });
        };

        let message = match op_code {
            OpCode::Config => InboundMessage::Config(decode_body(op_code, payload)?),
            OpCode::Open => InboundMessage::Open(decode_body(op_code, payload)?),
            OpCode::Close => InboundMessage::Close(decode_body(op_code, payload)?),
            OpCode::Write => InboundMessage::Write(decode_body(op_code, payload)?),
            OpCode::Read => {
                let body: TextPayload = decode_body(op_code, payload)?;
                InboundMessage::Read {
                    message: body.message,
                }
            }
            OpCode::Error => {
                let body: TextPayload = decode_body(op_code, payload)?;
                InboundMessage::Error {
                    message: body.message,
                }
            }
        };

        Ok(message)
    }

    /// The known op code, or `None` for [`InboundMessage::Unknown`].
    pub fn op_code(&self) -> Option<OpCode> {
        match self {
            InboundMessage::Config(_) => Some(OpCode::Config),
            InboundMessage::Open(_) => Some(OpCode::Open),
            InboundMessage::Close(_) => Some(OpCode::Close),
            InboundMessage::Write(_) => Some(OpCode::Write),
            InboundMessage::Read { .. } => Some(OpCode::Read),
            InboundMessage::Error { .. } => Some(OpCode::Error),
            InboundMessage::Unknown { .. } => None,
        }
    }
}

#[track_caller]
fn decode_body<T: for<'de> Deserialize<'de>>(op_code: OpCode, payload: &[u8]) -> Result<T, WireError> {
    serde_json::from_slice(payload)
        .map_err(|e| WireError::decode(format!("Invalid {op_code} message: {e}")))
}

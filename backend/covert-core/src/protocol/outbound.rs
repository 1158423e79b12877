use crate::error::wire::WireError;
use crate::option::OptionSet;
use crate::protocol::OpCode;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A frame sent from the client to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "OpCode")]
pub enum OutboundMessage {
    #[serde(rename = "config")]
    Config,

    #[serde(rename = "open")]
    Open {
        #[serde(rename = "Processors")]
        processors: Vec<ProcessorPayload>,
        #[serde(rename = "Channel")]
        channel: ChannelPayload,
    },

    #[serde(rename = "close")]
    Close,

    #[serde(rename = "write")]
    Write {
        #[serde(rename = "Message")]
        message: String,
    },
}

/// One processor in an `open` request, applied in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorPayload {
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(rename = "Data")]
    pub data: OptionSet,
}

/// The channel in an `open` request.
///
/// `Data` is keyed by the channel type, mirroring how the service lays out
/// its per-channel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPayload {
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(rename = "Data")]
    pub data: BTreeMap<String, OptionSet>,
}

impl ChannelPayload {
    pub fn new(type_name: impl Into<String>, properties: OptionSet) -> Self {
        let type_name = type_name.into();
        let mut data = BTreeMap::new();
        data.insert(type_name.clone(), properties);
        Self { type_name, data }
    }

    /// The option-set for the selected channel type.
    pub fn properties(&self) -> Option<&OptionSet> {
        self.data.get(&self.type_name)
    }
}

impl OutboundMessage {
    pub fn op_code(&self) -> OpCode {
        match self {
            OutboundMessage::Config => OpCode::Config,
            OutboundMessage::Open { .. } => OpCode::Open,
            OutboundMessage::Close => OpCode::Close,
            OutboundMessage::Write { .. } => OpCode::Write,
        }
    }

    /// Serialize to the JSON payload carried in a transport frame.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self)
            .map_err(|e| WireError::encode(format!("Failed to encode {} message: {e}", self.op_code())))
    }
}

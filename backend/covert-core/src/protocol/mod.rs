//! JSON wire vocabulary spoken with the covert channel service.
//!
//! Every frame is a JSON object discriminated by its `OpCode` member.
//! Outbound frames are built by the session dispatcher; inbound frames are
//! decoded here and handed to the session router.

mod inbound;
mod op_code;
mod outbound;

pub use inbound::{Acknowledgement, ActiveChannel, ConfigResponse, InboundMessage};
pub use op_code::OpCode;
pub use outbound::{ChannelPayload, OutboundMessage, ProcessorPayload};

/// Path of the WebSocket endpoint on the controlling host.
pub const API_WS_PATH: &str = "/api/ws";

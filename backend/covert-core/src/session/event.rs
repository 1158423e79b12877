use crate::protocol::OpCode;
use crate::session::SessionState;

/// What handling one inbound frame did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SchemaLoaded { channels: usize, processors: usize },
    ChannelOpened,
    ChannelClosed,
    MessageSent,
    MessageReceived { message: String },
    /// The service reported an `error`; surfaced verbatim, state unchanged.
    ProtocolError { message: String },
    UnknownOperation { op_code: String },
    /// A known op code arrived in a state that does not expect it.
    Unexpected { op_code: OpCode, state: SessionState },
    /// The frame could not be decoded.
    Malformed { reason: String },
}

use crate::protocol::OpCode;

use std::fmt;

/// Lifecycle of one session.
///
/// ```text
/// Connecting -> AwaitingSchema -> Ready -> Opening -> Open -> Closing -> Ready ...
///      any state -> Disconnected (transport lost)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Connecting,
    AwaitingSchema,
    Ready,
    Opening,
    Open,
    Closing,
    Disconnected,
}

/// A request that has been sent and is waiting for its acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAck {
    Schema,
    Open,
    Close,
}

impl SessionState {
    /// The acknowledgement this state is waiting on, if any.
    pub fn pending(self) -> Option<PendingAck> {
        match self {
            SessionState::AwaitingSchema => Some(PendingAck::Schema),
            SessionState::Opening => Some(PendingAck::Open),
            SessionState::Closing => Some(PendingAck::Close),
            _ => None,
        }
    }

    pub fn is_connected(self) -> bool {
        !matches!(self, SessionState::Connecting | SessionState::Disconnected)
    }
}

impl PendingAck {
    pub fn op_code(self) -> OpCode {
        match self {
            PendingAck::Schema => OpCode::Config,
            PendingAck::Open => OpCode::Open,
            PendingAck::Close => OpCode::Close,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Connecting => "connecting",
            SessionState::AwaitingSchema => "awaiting schema",
            SessionState::Ready => "ready",
            SessionState::Opening => "opening",
            SessionState::Open => "open",
            SessionState::Closing => "closing",
            SessionState::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

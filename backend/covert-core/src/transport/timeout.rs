use crate::session::PendingAck;

use std::time::Duration;

/// How long the session actor waits for an acknowledgement.
///
/// Returning `None` waits forever. The service gives no timing guarantee, so
/// the choice belongs to whoever embeds the client.
pub trait AckTimeoutPolicy: Send + Sync + 'static {
    fn timeout_for(&self, pending: PendingAck) -> Option<Duration>;
}

/// Never time out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTimeout;

impl AckTimeoutPolicy for NoTimeout {
    fn timeout_for(&self, _pending: PendingAck) -> Option<Duration> {
        None
    }
}

/// The same timeout for every pending request.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeout(pub Duration);

impl AckTimeoutPolicy for FixedTimeout {
    fn timeout_for(&self, _pending: PendingAck) -> Option<Duration> {
        Some(self.0)
    }
}

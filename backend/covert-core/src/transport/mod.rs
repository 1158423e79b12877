//! WebSocket transport and the session actor.
//!
//! # Architecture
//!
//! One socket per [`Session`](crate::session::Session). A dedicated tokio
//! task owns both the socket and the session and serializes three inputs
//! with `tokio::select!`:
//! - operator actions sent through a [`SessionHandle`]
//! - inbound frames from the socket
//! - the acknowledgement timer armed by an [`AckTimeoutPolicy`]
//!
//! Readers never wait on the actor: they take a [`SessionSnapshot`] from a
//! shared `RwLock` that the actor refreshes after every event.

mod connection;
mod endpoint;
mod handle;
mod timeout;

pub use connection::{FrameSink, FrameStream, connect};
pub use endpoint::{endpoint_url, parse_endpoint};
pub use handle::{OperatorAction, SessionHandle, SessionSnapshot};
pub use timeout::{AckTimeoutPolicy, FixedTimeout, NoTimeout};

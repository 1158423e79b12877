//! Client side of the covert channel service protocol.
//!
//! The service advertises processor and channel types as typed option-sets.
//! This crate keeps that schema, lets an operator build a channel plus an
//! ordered processor chain from it, and drives the open / write / close
//! lifecycle over a WebSocket.

pub mod config;
pub mod error;
pub mod option;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests;

pub const DEFAULT_SERVER_HOST: &str = "localhost";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_SERVER_URL: &str = const_format::concatcp!(
    "ws://",
    DEFAULT_SERVER_HOST,
    ":",
    DEFAULT_SERVER_PORT,
    protocol::API_WS_PATH
);

//! Shared building blocks for the covert channel client.
//!
//! Every error type in the workspace carries an [`ErrorLocation`] so that a
//! log line or status message points straight at the code that produced it.

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;

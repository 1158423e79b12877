//! Typed configuration options.
//!
//! The server describes every processor and channel as a map of option
//! objects, each tagged with a type name. Those objects are untrusted JSON;
//! this module converts them exactly once, at deserialization time, into a
//! closed set of typed values. Everything downstream works on
//! [`ConfigOption`] and never re-inspects raw JSON.
//!
//! # Wire shape
//!
//! ```json
//! { "Type": "u16", "Value": 8080, "Display": { "Name": "Port" }, "Range": ["..."] }
//! ```
//!
//! `Range` is only meaningful for `select`. Members the client does not
//! understand are carried along untouched so that an option survives a
//! round trip through the client byte-for-byte in meaning.

mod config_option;
mod option_set;
mod type_tag;
mod value;

pub use config_option::{ConfigOption, Display};
pub use option_set::OptionSet;
pub use type_tag::{RenderHint, TypeTag};
pub use value::OptionValue;

use crate::error::transport::TransportError;
use crate::protocol::API_WS_PATH;

use common::ErrorLocation;

use std::panic::Location;

use url::Url;

/// Build the WebSocket endpoint for a controlling host.
///
/// # Errors
///
/// Returns [`TransportError::Url`] if `host` does not form a valid URL.
pub fn endpoint_url(host: &str, port: u16, secure: bool) -> Result<Url, TransportError> {
    let scheme = if secure { "wss" } else { "ws" };
    Ok(Url::parse(&format!("{scheme}://{host}:{port}{API_WS_PATH}"))?)
}

/// Check a full endpoint URL given by the operator.
///
/// Only `ws` and `wss` are accepted. A URL without a path is pointed at the
/// API endpoint.
pub fn parse_endpoint(raw: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(raw)?;

    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(TransportError::Url {
            message: format!("Unsupported scheme '{}' in '{raw}'", url.scheme()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(API_WS_PATH);
    }
    Ok(url)
}

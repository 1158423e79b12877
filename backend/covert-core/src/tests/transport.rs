// Unit tests for endpoint handling and the timeout policies

use crate::error::transport::TransportError;
use crate::session::PendingAck;
use crate::transport::{AckTimeoutPolicy, FixedTimeout, NoTimeout, endpoint_url, parse_endpoint};

use std::time::Duration;

/// **VALUE**: Verifies an operator URL without a path is pointed at the API endpoint.
///
/// **BUG THIS CATCHES**: Would catch connecting to `/` and getting an HTTP 404
/// instead of a WebSocket upgrade.
#[test]
fn given_url_without_path_when_parsed_then_api_path_added() {
    let url = parse_endpoint("ws://10.0.0.5:9000").expect("valid endpoint");
    assert_eq!(url.as_str(), "ws://10.0.0.5:9000/api/ws");

    let url = parse_endpoint("wss://controller.local/").expect("valid endpoint");
    assert_eq!(url.as_str(), "wss://controller.local/api/ws");
}

#[test]
fn given_url_with_path_when_parsed_then_path_kept() {
    let url = parse_endpoint("ws://localhost:8080/custom/ws").expect("valid endpoint");
    assert_eq!(url.path(), "/custom/ws");
}

/// **VALUE**: Verifies only WebSocket schemes are accepted.
#[test]
fn given_http_url_when_parsed_then_url_error() {
    // WHEN
    let result = parse_endpoint("http://localhost:8080/api/ws");

    // THEN
    match result {
        Err(TransportError::Url { message, .. }) => assert!(message.contains("'http'")),
        other => panic!("Expected Url error, got {other:?}"),
    }
}

#[test]
fn given_garbage_when_parsed_then_url_error() {
    assert!(matches!(
        parse_endpoint("not a url"),
        Err(TransportError::Url { .. })
    ));
}

#[test]
fn given_host_and_port_when_endpoint_built_then_scheme_follows_secure_flag() {
    assert_eq!(
        endpoint_url("localhost", 8080, false).expect("valid").as_str(),
        "ws://localhost:8080/api/ws"
    );
    assert_eq!(
        endpoint_url("localhost", 8443, true).expect("valid").as_str(),
        "wss://localhost:8443/api/ws"
    );
}

/// **VALUE**: Verifies the default policy never arms a timer and the fixed one
/// applies the same wait to every acknowledgement.
#[test]
fn given_policies_when_asked_then_timeouts_match() {
    let wait = Duration::from_secs(5);

    for pending in [PendingAck::Schema, PendingAck::Open, PendingAck::Close] {
        assert_eq!(NoTimeout.timeout_for(pending), None);
        assert_eq!(FixedTimeout(wait).timeout_for(pending), Some(wait));
    }
}

use covert_core::error::option::OptionError;
use covert_core::error::registry::RegistryError;
use covert_core::error::session::SessionError;
use covert_core::error::wire::WireError;
use covert_core::error::{CoreError, TransportError};
use covert_core::option::TypeTag;
use covert_core::registry::CatalogKind;
use covert_core::session::SessionState;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies option errors point at the line that raised them.
///
/// **WHY THIS MATTERS**: Validation failures surface in the operator console; the location
/// tells a developer which setter rejected the input.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from the constructor,
/// which would report the error module itself as the location.
#[test]
fn given_out_of_range_error_when_formatted_then_includes_kind_and_caller_location() {
    // GIVEN
    let err = OptionError::out_of_range(TypeTag::U16, "70000");

    // WHEN
    let error_string = err.to_string();

    // THEN
    assert!(error_string.contains("Out Of Range Error"));
    assert!(error_string.contains("70000"));
    assert!(error_string.contains("u16"));
    assert!(error_string.contains("core_errors.rs"));
}

/// **VALUE**: Verifies session errors name the action and the state that refused it.
#[test]
fn given_invalid_state_error_when_formatted_then_names_action_and_state() {
    let err = SessionError::invalid_state("open a channel", SessionState::Opening);

    let error_string = err.to_string();

    assert!(error_string.contains("Invalid State Error"));
    assert!(error_string.contains("cannot open a channel while opening"));
    assert!(error_string.contains("core_errors.rs"));
}

/// **VALUE**: Verifies wrapped errors keep the inner message and location unchanged.
///
/// **BUG THIS CATCHES**: Would catch a wrapper variant adding its own prefix or location,
/// hiding where the failure really came from.
#[test]
fn given_nested_errors_when_converted_to_core_error_then_transparent() {
    // GIVEN
    let registry = RegistryError::unknown_type(CatalogKind::Processor, "Rot13");
    let expected = registry.to_string();

    // WHEN
    let core: CoreError = SessionError::from(registry).into();

    // THEN
    assert_eq!(core.to_string(), expected);
    assert!(expected.contains("Unknown Type Error: no processor named 'Rot13'"));
}

/// **VALUE**: Verifies transport errors built inline carry the given location.
#[test]
#[track_caller]
fn given_transport_error_when_formatted_then_includes_location() {
    let err = TransportError::TransportLost {
        message: "connection reset".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let error_string = format!("{err}");

    assert!(error_string.contains("Transport Lost Error: connection reset"));
    assert!(error_string.contains("core_errors.rs"));
}

#[test]
fn given_wire_error_when_formatted_then_decode_prefix() {
    let err = WireError::decode("Invalid message envelope: EOF");
    assert!(err.to_string().starts_with("Decode Error: Invalid message envelope"));
}

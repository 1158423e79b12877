use covert_core::error::option::OptionError;
use covert_core::error::session::SessionError;
use covert_core::option::OptionValue;
use covert_core::registry::CatalogKind;
use covert_core::session::{Session, SessionEvent, SessionState};

use std::net::Ipv4Addr;

use serde_json::{Value, json};

fn schema_frame() -> Vec<u8> {
    json!({
        "OpCode": "config",
        "Default": {
            "Channel": {
                "tcp": {
                    "addr": { "Type": "ipv4", "Value": "0.0.0.0", "Display": { "Name": "Address" } }
                }
            },
            "Processor": {}
        }
    })
    .to_string()
    .into_bytes()
}

fn connected_session() -> Session {
    let mut session = Session::new();
    session
        .request_schema()
        .expect("schema request is valid after connecting");
    session
}

/// **VALUE**: The service's config reply makes the session usable.
///
/// **WHY THIS MATTERS**: Nothing can be configured until the registry is filled; this is
/// the first thing every session does.
///
/// **BUG THIS CATCHES**: Would catch the reply being routed without loading the registry,
/// or the state staying in AwaitingSchema.
#[test]
fn given_awaiting_schema_when_config_reply_arrives_then_ready_with_tcp_registered() {
    // GIVEN
    let mut session = connected_session();
    assert_eq!(session.state(), SessionState::AwaitingSchema);

    // WHEN
    let event = session.handle_frame(&schema_frame());

    // THEN
    assert_eq!(
        event,
        SessionEvent::SchemaLoaded {
            channels: 1,
            processors: 0
        }
    );
    assert_eq!(session.state(), SessionState::Ready);
    let tcp = session
        .registry()
        .lookup(CatalogKind::Channel, "tcp")
        .expect("tcp was registered");
    assert!(tcp.contains_key("addr"));
    assert_eq!(
        session.log().lines().collect::<Vec<_>>(),
        vec!["Connection to server established."]
    );
}

/// **VALUE**: The open request is byte-for-byte what the service expects.
///
/// **WHY THIS MATTERS**: The service matches members by exact name and nests channel data
/// under the channel type. A shape mismatch means the channel never opens.
///
/// **BUG THIS CATCHES**: Would catch the template's value being sent instead of the edit,
/// a renamed member, or `Processors` being omitted when empty.
#[test]
fn given_tcp_with_edited_addr_when_open_then_exact_request_and_opening() {
    // GIVEN
    let mut session = connected_session();
    session.handle_frame(&schema_frame());
    session.select_channel("tcp").expect("tcp is published");
    session
        .set_channel_option_from_str("addr", "10.0.0.5")
        .expect("valid address");

    // WHEN
    let message = session.open_channel().expect("open is valid when ready");
    let payload: Value =
        serde_json::from_slice(&message.encode().expect("encodes")).expect("payload is JSON");

    // THEN
    assert_eq!(
        payload,
        json!({
            "OpCode": "open",
            "Processors": [],
            "Channel": {
                "Type": "tcp",
                "Data": {
                    "tcp": {
                        "addr": { "Type": "ipv4", "Value": "10.0.0.5", "Display": { "Name": "Address" } }
                    }
                }
            }
        })
    );
    assert_eq!(session.state(), SessionState::Opening);
}

/// **VALUE**: The open acknowledgement opens the channel and incoming covert data is shown.
///
/// **BUG THIS CATCHES**: Would catch `read` changing state or the received line losing its
/// prefix.
#[test]
fn given_opening_when_ack_and_read_arrive_then_open_and_message_logged() {
    // GIVEN
    let mut session = connected_session();
    session.handle_frame(&schema_frame());
    session.select_channel("tcp").expect("tcp is published");
    session.open_channel().expect("open is valid");

    // WHEN
    let opened = session.handle_frame(br#"{"OpCode":"open"}"#);
    let received = session.handle_frame(br#"{"OpCode":"read","Message":"hello"}"#);

    // THEN
    assert_eq!(opened, SessionEvent::ChannelOpened);
    assert_eq!(
        received,
        SessionEvent::MessageReceived {
            message: "hello".to_string()
        }
    );
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(
        session.log().lines().last(),
        Some("Covert message received: hello")
    );
}

/// **VALUE**: Bad operator input is rejected with the right error kind and never stored.
///
/// **WHY THIS MATTERS**: A port that silently became 0 or 4464 would open the channel on
/// the wrong port with no visible error.
#[test]
fn given_u16_option_when_set_to_bad_text_then_rejected_without_change() {
    // GIVEN
    let mut session = connected_session();
    session.handle_frame(
        json!({
            "OpCode": "config",
            "Default": {
                "Channel": {
                    "udp": {
                        "addr": { "Type": "ipv4", "Value": "0.0.0.0", "Display": { "Name": "Address" } },
                        "port": { "Type": "u16", "Value": 53, "Display": { "Name": "Port" } }
                    }
                },
                "Processor": {}
            }
        })
        .to_string()
        .as_bytes(),
    );
    session.select_channel("udp").expect("udp is published");

    // WHEN
    let too_big = session.set_channel_option_from_str("port", "70000");
    let not_a_number = session.set_channel_option_from_str("port", "abc");

    // THEN
    assert!(matches!(
        too_big,
        Err(SessionError::Option(OptionError::OutOfRange { .. }))
    ));
    assert!(matches!(
        not_a_number,
        Err(SessionError::Option(OptionError::Parse { .. }))
    ));
    let channel = session.store().channel().expect("udp is selected");
    assert_eq!(
        channel.properties().get("port").map(|o| o.value()),
        Some(&OptionValue::U16(53))
    );
    assert_eq!(
        channel.properties().get("addr").map(|o| o.value()),
        Some(&OptionValue::Ipv4(Ipv4Addr::UNSPECIFIED))
    );
}

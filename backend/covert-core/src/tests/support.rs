// Shared fixtures: a small schema with one option of every supported type.

use crate::registry::SchemaDefaults;
use crate::session::{Session, SessionState};

use serde_json::{Value, json};

pub(crate) fn schema_json() -> Value {
    json!({
        "Channel": {
            "tcp": {
                "addr": { "Type": "ipv4", "Value": "127.0.0.1", "Display": { "Name": "Address" } },
                "port": { "Type": "u16", "Value": 8080, "Display": { "Name": "Port" } },
                "verbose": { "Type": "bool", "Value": false, "Display": { "Name": "Verbose" } },
                "mode": {
                    "Type": "select",
                    "Value": "stream",
                    "Display": { "Name": "Mode" },
                    "Range": ["stream", "datagram"]
                }
            },
            "icmp": {
                "ttl": { "Type": "i8", "Value": 64, "Display": { "Name": "TTL" } }
            }
        },
        "Processor": {
            "Caesar": {
                "shift": { "Type": "i8", "Value": 3, "Display": { "Name": "Shift" } }
            },
            "Checksum": {
                "magic": { "Type": "exactu64", "Value": 42, "Display": { "Name": "Magic" } },
                "seed": { "Type": "u64", "Value": 7, "Display": { "Name": "Seed" } }
            }
        }
    })
}

pub(crate) fn defaults() -> SchemaDefaults {
    serde_json::from_value(schema_json()).expect("fixture schema should decode")
}

pub(crate) fn frame(value: Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

pub(crate) fn config_frame() -> Vec<u8> {
    frame(json!({ "OpCode": "config", "Default": schema_json() }))
}

/// A session that has received the fixture schema.
pub(crate) fn ready_session() -> Session {
    let mut session = Session::new();
    session
        .request_schema()
        .expect("schema request should be valid while connecting");
    session.handle_frame(&config_frame());
    assert_eq!(session.state(), SessionState::Ready);
    session
}

/// A session with the `tcp` channel open and no processors.
pub(crate) fn open_session() -> Session {
    let mut session = ready_session();
    session.select_channel("tcp").expect("tcp is in the fixture");
    session.open_channel().expect("open should be valid when ready");
    session.handle_frame(&frame(json!({ "OpCode": "open" })));
    assert_eq!(session.state(), SessionState::Open);
    session
}

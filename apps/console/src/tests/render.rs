// Unit tests for snapshot rendering

use crate::render::{render_option, render_snapshot};

use covert_core::option::ConfigOption;
use covert_core::registry::CatalogKind;
use covert_core::session::Session;
use covert_core::transport::SessionSnapshot;

use serde_json::json;

fn snapshot_of(session: &Session) -> SessionSnapshot {
    SessionSnapshot {
        id: session.id(),
        state: session.state(),
        log: session.log().entries().to_vec(),
        channels: names(session, CatalogKind::Channel),
        processors: names(session, CatalogKind::Processor),
        store: session.store().clone(),
        compose: session.compose().to_string(),
    }
}

fn names(session: &Session, kind: CatalogKind) -> Vec<String> {
    session.registry().names(kind).map(str::to_string).collect()
}

fn ready_session() -> Session {
    let mut session = Session::new();
    session.request_schema().expect("valid while connecting");
    let frame = json!({
        "OpCode": "config",
        "Default": {
            "Channel": {
                "tcp": {
                    "port": { "Type": "u16", "Value": 8080, "Display": { "Name": "Port" } },
                    "mode": { "Type": "select", "Value": "a", "Range": ["a", "b"] }
                }
            },
            "Processor": {}
        }
    });
    session.handle_frame(frame.to_string().as_bytes());
    session
}

/// **VALUE**: Verifies select options list their choices and fall back to the key when
/// the service gives no display name.
#[test]
fn given_select_without_name_when_rendered_then_key_and_choices_shown() {
    let option: ConfigOption =
        serde_json::from_value(json!({ "Type": "select", "Value": "a", "Range": ["a", "b"] }))
            .expect("valid option");

    assert_eq!(
        render_option("mode", &option),
        "mode (mode) = a [select] one of: a, b"
    );
}

/// **VALUE**: Verifies options the client cannot edit are marked read-only.
#[test]
fn given_unsupported_option_when_rendered_then_read_only() {
    let option: ConfigOption =
        serde_json::from_value(json!({ "Type": "f32", "Value": 0.5, "Display": { "Name": "Gain" } }))
            .expect("unknown tags still load");

    assert_eq!(render_option("gain", &option), "gain (Gain) = 0.5 [f32] read-only");
}

/// **VALUE**: Verifies the snapshot view shows the state, catalogs and selections.
#[test]
fn given_selected_channel_and_empty_slot_when_rendered_then_all_sections_present() {
    // GIVEN
    let mut session = ready_session();
    session.select_channel("tcp").expect("tcp is published");
    session.add_processor();

    // WHEN
    let text = render_snapshot(&snapshot_of(&session));

    // THEN
    assert!(text.contains("(ready)"));
    assert!(text.contains("Channels:   tcp"));
    assert!(text.contains("Processors: (none)"));
    assert!(text.contains("Channel 'tcp':"));
    assert!(text.contains("  port (Port) = 8080 [u16]"));
    assert!(text.contains("Processor #0: (no type selected)"));
}

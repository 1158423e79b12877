// Unit tests for the operator's working configuration

use crate::error::registry::RegistryError;
use crate::error::session::SessionError;
use crate::option::OptionValue;
use crate::registry::SchemaRegistry;
use crate::store::ConfigStore;
use crate::tests::support::defaults;

use std::net::Ipv4Addr;

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.load(defaults());
    registry
}

/// **VALUE**: Verifies selecting a channel again discards earlier edits.
///
/// **WHY THIS MATTERS**: Switching channel types and back should start from the
/// service's defaults, just like a fresh selection.
#[test]
fn given_edited_channel_when_reselected_then_defaults_restored() {
    // GIVEN
    let registry = registry();
    let mut store = ConfigStore::new();
    store.select_channel(&registry, "tcp").expect("tcp is published");
    store
        .set_channel_option_from_str("addr", "10.0.0.5")
        .expect("valid address");

    // WHEN
    store.select_channel(&registry, "tcp").expect("tcp is published");

    // THEN
    let addr = store
        .channel()
        .and_then(|c| c.properties().get("addr"))
        .map(|o| o.value().clone());
    assert_eq!(addr, Some(OptionValue::Ipv4(Ipv4Addr::new(127, 0, 0, 1))));
}

/// **VALUE**: Verifies an unknown channel name leaves the current selection alone.
#[test]
fn given_selected_channel_when_selecting_unknown_then_error_and_selection_kept() {
    let registry = registry();
    let mut store = ConfigStore::new();
    store.select_channel(&registry, "tcp").expect("tcp is published");

    let result = store.select_channel(&registry, "carrier-pigeon");

    assert!(matches!(
        result,
        Err(SessionError::Registry(RegistryError::UnknownType { .. }))
    ));
    assert_eq!(store.channel().map(|c| c.type_name()), Some("tcp"));
}

/// **VALUE**: Verifies editing the channel before choosing one is rejected.
#[test]
fn given_no_channel_when_setting_option_then_no_channel_selected() {
    let mut store = ConfigStore::new();
    assert!(matches!(
        store.set_channel_option("addr", OptionValue::Bool(true)),
        Err(SessionError::NoChannelSelected { .. })
    ));
}

/// **VALUE**: Verifies two slots of the same processor type are independent.
///
/// **BUG THIS CATCHES**: Would catch slots sharing one option-set.
#[test]
fn given_two_caesar_slots_when_one_is_edited_then_other_unchanged() {
    // GIVEN
    let registry = registry();
    let mut store = ConfigStore::new();
    let first = store.add_processor();
    let second = store.add_processor();
    store
        .select_processor(&registry, first, "Caesar")
        .expect("Caesar is published");
    store
        .select_processor(&registry, second, "Caesar")
        .expect("Caesar is published");

    // WHEN
    store
        .set_processor_option_from_str(first, "shift", "13")
        .expect("valid shift");

    // THEN
    let shift = |index: usize| {
        store.processors()[index]
            .data()
            .and_then(|d| d.get("shift"))
            .map(|o| o.value().clone())
    };
    assert_eq!(shift(first), Some(OptionValue::I8(13)));
    assert_eq!(shift(second), Some(OptionValue::I8(3)));
}

/// **VALUE**: Verifies an empty slot has no options to edit.
#[test]
fn given_unselected_slot_when_setting_option_then_processor_unselected() {
    let mut store = ConfigStore::new();
    let index = store.add_processor();

    assert!(!store.processors()[index].is_selected());
    assert!(matches!(
        store.set_processor_option_from_str(index, "shift", "1"),
        Err(SessionError::ProcessorUnselected { index: 0, .. })
    ));
}

/// **VALUE**: Verifies slot indexes are bounds-checked and removal keeps order.
#[test]
fn given_processor_chain_when_removing_then_order_kept_and_bad_index_rejected() {
    let registry = registry();
    let mut store = ConfigStore::new();
    for name in ["Caesar", "Checksum", "Caesar"] {
        let index = store.add_processor();
        store
            .select_processor(&registry, index, name)
            .expect("fixture processor");
    }

    let removed = store.remove_processor(1).expect("slot 1 exists");
    assert_eq!(removed.type_name(), Some("Checksum"));
    assert_eq!(
        store
            .processors()
            .iter()
            .map(|p| p.type_name())
            .collect::<Vec<_>>(),
        vec![Some("Caesar"), Some("Caesar")]
    );

    assert!(matches!(
        store.remove_processor(5),
        Err(SessionError::ProcessorIndex { index: 5, len: 2, .. })
    ));
    assert!(matches!(
        store.select_processor(&registry, 2, "Caesar"),
        Err(SessionError::ProcessorIndex { .. })
    ));

    store.clear();
    assert!(store.processors().is_empty());
    assert!(store.channel().is_none());
}

// Unit tests for the schema registry

use crate::error::registry::RegistryError;
use crate::option::OptionValue;
use crate::registry::{CatalogKind, SchemaDefaults, SchemaRegistry};
use crate::tests::support::defaults;

use serde_json::json;

/// **VALUE**: Verifies lookups hand out independent copies of the template.
///
/// **WHY THIS MATTERS**: Two processor slots of the same type must not share edits, and
/// the catalog must keep the service's defaults no matter what the operator types.
///
/// **BUG THIS CATCHES**: Would catch returning a shared reference or an `Rc` that lets
/// operator edits leak back into the registry.
#[test]
fn given_loaded_registry_when_lookup_copy_is_edited_then_template_unchanged() {
    // GIVEN
    let mut registry = SchemaRegistry::new();
    registry.load(defaults());

    // WHEN
    let mut copy = registry
        .lookup(CatalogKind::Processor, "Caesar")
        .expect("Caesar is published");
    copy.set_from_str("shift", "9").expect("shift is an i8");

    // THEN
    let template = registry
        .lookup(CatalogKind::Processor, "Caesar")
        .expect("Caesar is published");
    assert_eq!(
        template.get("shift").map(|o| o.value().clone()),
        Some(OptionValue::I8(3))
    );
}

/// **VALUE**: Verifies a second load replaces both catalogs completely.
///
/// **BUG THIS CATCHES**: Would catch merging, where a type the service stopped
/// publishing stays selectable.
#[test]
fn given_loaded_registry_when_reloaded_then_old_names_are_gone() {
    // GIVEN
    let mut registry = SchemaRegistry::new();
    registry.load(defaults());

    // WHEN
    let smaller: SchemaDefaults = serde_json::from_value(json!({
        "Channel": { "udp": {} },
        "Processor": {}
    }))
    .expect("payload should decode");
    registry.load(smaller);

    // THEN
    assert!(matches!(
        registry.lookup(CatalogKind::Channel, "tcp"),
        Err(RegistryError::UnknownType { .. })
    ));
    assert!(!registry.contains(CatalogKind::Processor, "Caesar"));
    assert_eq!(registry.names(CatalogKind::Channel).collect::<Vec<_>>(), vec!["udp"]);
    assert_eq!(registry.len(CatalogKind::Processor), 0);
}

/// **VALUE**: Verifies catalog names come out sorted and the two catalogs are separate.
#[test]
fn given_loaded_registry_when_listing_names_then_sorted_per_catalog() {
    let mut registry = SchemaRegistry::new();
    assert!(!registry.is_loaded());

    registry.load(defaults());

    assert!(registry.is_loaded());
    assert_eq!(
        registry.names(CatalogKind::Channel).collect::<Vec<_>>(),
        vec!["icmp", "tcp"]
    );
    assert_eq!(
        registry.names(CatalogKind::Processor).collect::<Vec<_>>(),
        vec!["Caesar", "Checksum"]
    );
    assert!(registry.ensure_known(CatalogKind::Channel, "Caesar").is_err());
}

/// **VALUE**: Verifies a schema with a missing catalog decodes as empty.
#[test]
fn given_defaults_without_processors_when_decoded_then_empty_catalog() {
    let defaults: SchemaDefaults =
        serde_json::from_value(json!({ "Channel": {} })).expect("payload should decode");
    assert!(defaults.processors.is_empty());
}

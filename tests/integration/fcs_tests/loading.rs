use crate::common::*;
use flyer_fcs::document::Element;
use flyer_fcs::fcs::{FlightControlSystem, SystemType};
use flyer_fcs::properties::{PropertyManager, PropertyStore};
use flyer_fcs::resources::{FcsConfig, FcsError};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn create_engine(config: FcsConfig) -> (FlightControlSystem, PropertyManager) {
    let properties = PropertyManager::new();
    let store: Arc<dyn PropertyStore> = Arc::new(properties.clone());
    (FlightControlSystem::new(store, config), properties)
}

/// Aircraft root with a `Systems/` directory and a separate library.
fn create_tree() -> (TempDir, FcsConfig) {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("c172/Systems")).unwrap();
    fs::create_dir_all(dir.path().join("library")).unwrap();
    let config = FcsConfig::new(dir.path().join("c172"), dir.path().join("library"));
    (dir, config)
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

#[test]
fn test_undefined_gate_rejects_document() {
    let (mut fcs, properties) = create_engine(FcsConfig::default());
    let doc = Element::new("autopilot").with_attribute("name", "ap").with_child(
        Element::new("channel")
            .with_attribute("name", "heading")
            .with_attribute("execute", "ap/master")
            .with_child(
                Element::new("pure_gain")
                    .with_attribute("name", "heading-gain")
                    .with_child(Element::leaf("input", "in")),
            ),
    );

    let err = fcs.load(&doc, SystemType::Autopilot).unwrap_err();
    assert!(matches!(err, FcsError::UndefinedEnableProperty { .. }));
    assert!(fcs.channels().is_empty());
    assert!(fcs.documents().next().is_none());
    assert!(!properties.has_node("ap/master"));
}

#[test]
fn test_failed_document_leaves_earlier_ones_intact() {
    let (mut fcs, _) = create_engine(FcsConfig::default());
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();

    // The first channel is fine, the second has a gain without an input.
    let broken = Element::new("system")
        .with_attribute("name", "broken")
        .with_child(Element::new("channel").with_child(
            Element::new("summer")
                .with_attribute("name", "ok")
                .with_child(Element::leaf("input", "a")),
        ))
        .with_child(
            Element::new("channel")
                .with_child(Element::new("pure_gain").with_attribute("name", "no-input")),
        );
    let err = fcs.load(&broken, SystemType::System).unwrap_err();
    assert!(err.is_structural());
    assert_eq!(fcs.channels().len(), 1);
    assert_eq!(fcs.component_names(","), "test-gain");
}

#[test]
fn test_unknown_component_is_skipped() {
    let (mut fcs, properties) = create_engine(FcsConfig::default());
    let doc = Element::new("system").with_attribute("name", "mixed").with_child(
        Element::new("channel")
            .with_attribute("name", "mixed")
            .with_child(Element::new("flux_capacitor").with_attribute("name", "fc"))
            .with_child(
                Element::new("pure_gain")
                    .with_attribute("name", "after-unknown")
                    .with_child(Element::leaf("input", "in"))
                    .with_child(Element::leaf("gain", 3.0)),
            ),
    );
    fcs.load(&doc, SystemType::System).unwrap();
    assert_eq!(fcs.component_names("|"), "after-unknown");

    properties.set_double("in", 2.0);
    fcs.run(false);
    assert_property_eq(&properties, "fcs/after-unknown", 6.0);
}

#[test]
fn test_file_search_order() {
    let (dir, config) = create_tree();
    write(&dir.path().join("library/yaw-damper.yaml"), YAW_DAMPER_DOCUMENT);
    write(
        &dir.path().join("c172/yaw-damper.yaml"),
        &YAW_DAMPER_DOCUMENT.replace("value: 0.5", "value: 9"),
    );

    // The library copy shadows the aircraft root copy.
    let (mut fcs, properties) = create_engine(config.clone());
    fcs.load(&create_file_reference("yaw-damper"), SystemType::System)
        .unwrap();
    assert_property_eq(&properties, "systems/yaw-damper/gain", 0.5);

    // An aircraft-local Systems/ copy shadows both.
    write(
        &dir.path().join("c172/Systems/yaw-damper.yaml"),
        &YAW_DAMPER_DOCUMENT.replace("value: 0.5", "value: 0.25"),
    );
    let (mut fcs, properties) = create_engine(config);
    fcs.load(&create_file_reference("yaw-damper.yaml"), SystemType::System)
        .unwrap();
    assert_property_eq(&properties, "systems/yaw-damper/gain", 0.25);

    properties.set_double("velocities/r-rad_sec", 0.2);
    fcs.run(false);
    assert_property_eq(&properties, "systems/yaw-damper/output", 0.05);
}

#[test]
fn test_missing_file_lists_searched_paths() {
    let (_dir, config) = create_tree();
    let (mut fcs, _) = create_engine(config);
    match fcs.load(&create_file_reference("missing"), SystemType::System) {
        Err(FcsError::FileNotFound { name, searched }) => {
            assert_eq!(name, "missing");
            assert_eq!(searched.len(), 3);
            assert!(searched[0].ends_with("Systems/missing.yaml"));
        }
        other => panic!("expected FileNotFound, got {:?}", other),
    }
    assert!(fcs.channels().is_empty());
}

#[test]
fn test_reference_overrides_interface_properties() {
    let (dir, config) = create_tree();
    write(&dir.path().join("library/yaw-damper.yaml"), YAW_DAMPER_DOCUMENT);

    let (mut fcs, properties) = create_engine(config);
    let reference = create_file_reference("yaw-damper")
        .with_child(
            Element::new("property")
                .with_attribute("value", 1.5)
                .with_text("systems/yaw-damper/gain"),
        )
        .with_child(
            Element::new("property")
                .with_attribute("value", 1)
                .with_text("systems/yaw-damper/serviceable"),
        );
    fcs.load(&reference, SystemType::System).unwrap();

    assert_property_eq(&properties, "systems/yaw-damper/gain", 1.5);
    assert_property_eq(&properties, "systems/yaw-damper/serviceable", 1.0);
}

#[test]
fn test_reference_property_defines_channel_gate() {
    let (dir, config) = create_tree();
    // The document never declares its gate; only the reference does.
    write(
        &dir.path().join("c172/Systems/gated.yaml"),
        r#"
name: system
attributes: { name: gated }
children:
  - name: channel
    attributes: { name: gated, execute: systems/gated/engage }
    children:
      - name: pure_gain
        attributes: { name: systems/gated/output }
        children:
          - { name: input, text: in }
          - { name: gain, text: 4 }
"#,
    );

    let (mut fcs, properties) = create_engine(config);
    let reference = create_file_reference("gated").with_child(
        Element::new("property")
            .with_attribute("value", 1)
            .with_text("systems/gated/engage"),
    );
    fcs.load(&reference, SystemType::System).unwrap();
    assert_eq!(fcs.channels().len(), 1);

    properties.set_double("in", 0.5);
    fcs.run(false);
    assert_property_eq(&properties, "systems/gated/output", 2.0);

    properties.set_double("systems/gated/engage", 0.0);
    properties.set_double("in", 1.0);
    fcs.run(false);
    assert_property_eq(&properties, "systems/gated/output", 2.0);
}

#[test]
fn test_interface_property_keeps_existing_value() {
    let (mut fcs, properties) = create_engine(FcsConfig::default());
    properties.set_double("ap/roll-gain", 7.0);
    let doc = Element::from_yaml_str(AUTOPILOT_DOCUMENT).unwrap();
    fcs.load(&doc, SystemType::Autopilot).unwrap();
    assert_property_eq(&properties, "ap/roll-gain", 7.0);
}

#[test]
fn test_reload_rebuilds_from_disk() {
    let (dir, config) = create_tree();
    let path = dir.path().join("c172/Systems/yaw-damper.yaml");
    write(&path, YAW_DAMPER_DOCUMENT);

    let (mut fcs, properties) = create_engine(config);
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();
    fcs.load(&create_file_reference("yaw-damper"), SystemType::System)
        .unwrap();
    assert_eq!(
        fcs.component_names(","),
        "test-gain,systems/yaw-damper/output"
    );

    // The file now gains a second component.
    let updated = YAW_DAMPER_DOCUMENT.to_string()
        + r#"      - name: summer
        attributes: { name: systems/yaw-damper/trimmed }
        children:
          - { name: input, text: systems/yaw-damper/output }
          - { name: bias, text: 0.1 }
"#;
    write(&path, &updated);
    fcs.reload().unwrap();
    assert_eq!(fcs.channels().len(), 2);
    assert_eq!(
        fcs.component_names(","),
        "test-gain,systems/yaw-damper/output,systems/yaw-damper/trimmed"
    );

    properties.set_double("velocities/r-rad_sec", 1.0);
    fcs.run(false);
    assert_property_eq(&properties, "systems/yaw-damper/trimmed", 0.6);

    // A document that no longer loads keeps the current graph.
    fs::remove_file(&path).unwrap();
    assert!(fcs.reload().is_err());
    assert_eq!(fcs.channels().len(), 2);
}

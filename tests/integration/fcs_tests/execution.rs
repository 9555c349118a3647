use crate::common::*;
use approx::assert_relative_eq;
use flyer_fcs::document::Element;
use flyer_fcs::fcs::{Control, FlightControlSystem, OutputForm, RunOutcome, Surface, SystemType};
use flyer_fcs::properties::{PropertyManager, PropertyStore};
use flyer_fcs::resources::FcsConfig;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn create_engine() -> (FlightControlSystem, PropertyManager) {
    let properties = PropertyManager::new();
    let store: Arc<dyn PropertyStore> = Arc::new(properties.clone());
    (FlightControlSystem::new(store, FcsConfig::default()), properties)
}

#[test]
fn test_gain_scenario() {
    let (mut fcs, properties) = create_engine();
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();

    properties.set_double("in", 3.0);
    assert_eq!(fcs.run(false), RunOutcome::Executed);
    assert_property_eq(&properties, "out", 6.0);
    assert_property_eq(&properties, "fcs/test-gain", 6.0);
}

#[test]
fn test_pitch_channel_drives_elevator() {
    let (mut fcs, _) = create_engine();
    let doc = Element::from_yaml_str(PITCH_DOCUMENT).unwrap();
    fcs.load(&doc, SystemType::FlightControl).unwrap();

    fcs.set_control(Control::ElevatorCmd, 0.5);
    fcs.run(false);
    assert_relative_eq!(fcs.surface(Surface::Elevator, OutputForm::Radians), 0.15);
    assert_relative_eq!(
        fcs.surface(Surface::Elevator, OutputForm::Degrees),
        0.15f64.to_degrees(),
        epsilon = 1e-9
    );
    assert_relative_eq!(fcs.surface(Surface::Elevator, OutputForm::Normalized), 0.5);

    // Trim pushes the sum past the clip limit.
    fcs.set_control(Control::ElevatorCmd, -0.8);
    fcs.set_control(Control::PitchTrimCmd, -0.5);
    fcs.run(false);
    assert_relative_eq!(fcs.surface(Surface::Elevator, OutputForm::Radians), -0.35);
    assert_relative_eq!(fcs.surface(Surface::Elevator, OutputForm::Magnitude), 0.35);
    assert_relative_eq!(fcs.surface(Surface::Elevator, OutputForm::Normalized), -1.0);
}

#[test]
fn test_gated_autopilot_channel() {
    let (mut fcs, properties) = create_engine();
    let doc = Element::from_yaml_str(AUTOPILOT_DOCUMENT).unwrap();
    fcs.load(&doc, SystemType::Autopilot).unwrap();
    assert_property_eq(&properties, "ap/roll-gain", 2.0);

    properties.set_double("attitude/phi-rad", 0.05);
    fcs.run(false);
    // Pre functions always run; the disengaged channel does not.
    assert_relative_eq!(
        properties.get_double("ap/roll-error-deg"),
        0.05f64.to_degrees(),
        epsilon = 1e-9
    );
    assert_eq!(properties.get_double("ap/aileron-cmd"), 0.0);
    assert_eq!(properties.get_double("ap/engaged-light"), 0.0);

    properties.set_double("ap/wing-leveler-engage", 1.0);
    fcs.run(false);
    let expected = -0.05f64.to_degrees() * 2.0;
    assert_relative_eq!(properties.get_double("ap/aileron-cmd"), expected, epsilon = 1e-9);
    assert_relative_eq!(
        properties.get_double("ap/aileron-cmd-doubled"),
        2.0 * expected,
        epsilon = 1e-9
    );
    assert_eq!(properties.get_double("ap/engaged-light"), 1.0);

    properties.set_double("attitude/phi-rad", 0.5);
    fcs.run(false);
    assert_eq!(properties.get_double("ap/aileron-cmd"), -10.0);

    // Disengaging freezes the last outputs.
    properties.set_double("ap/wing-leveler-engage", 0.0);
    properties.set_double("attitude/phi-rad", -0.5);
    fcs.run(false);
    assert_eq!(properties.get_double("ap/aileron-cmd"), -10.0);
    assert_eq!(properties.get_double("ap/engaged-light"), 1.0);
}

#[test]
fn test_channels_run_in_registration_order() {
    let (mut fcs, properties) = create_engine();
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();
    let second = Element::new("system").with_attribute("name", "downstream").with_child(
        Element::new("channel").with_attribute("name", "after").with_child(
            Element::new("pure_gain")
                .with_attribute("name", "scaled-out")
                .with_child(Element::leaf("input", "out"))
                .with_child(Element::leaf("gain", 10.0)),
        ),
    );
    fcs.load(&second, SystemType::System).unwrap();

    properties.set_double("in", 1.0);
    fcs.run(false);
    assert_property_eq(&properties, "fcs/scaled-out", 20.0);
}

#[test]
fn test_component_dumps() {
    let (mut fcs, properties) = create_engine();
    let doc = Element::from_yaml_str(PITCH_DOCUMENT).unwrap();
    fcs.load(&doc, SystemType::FlightControl).unwrap();
    fcs.load(&create_gain_document(1.0 / 3.0), SystemType::FlightControl)
        .unwrap();

    properties.set_double("in", 1.0);
    fcs.set_control(Control::ElevatorCmd, 1.0);
    fcs.run(false);

    assert_eq!(
        fcs.component_names(", "),
        "pitch-trim-sum, elevator-control, elevator-normalized, test-gain"
    );
    assert_eq!(fcs.component_values(","), "1,0.3,1,0.333333333");
}

#[test]
fn test_hold_skips_every_stage() {
    let (mut fcs, properties) = create_engine();
    fcs.add_throttle();
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();

    properties.set_double("in", 3.0);
    fcs.set_throttle_cmd(0, 0.7);
    assert_eq!(fcs.run(true), RunOutcome::Skipped);
    assert_eq!(properties.get_double("out"), 0.0);
    assert_eq!(fcs.throttle_pos(0), 0.0);
}

#[test]
fn test_init_model_keeps_the_graph() {
    let (mut fcs, properties) = create_engine();
    fcs.load(&create_gain_document(2.0), SystemType::FlightControl)
        .unwrap();
    fcs.init_model();
    assert_eq!(fcs.channels().len(), 1);

    properties.set_double("in", 4.0);
    fcs.run(false);
    assert_property_eq(&properties, "out", 8.0);
}

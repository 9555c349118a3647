use crate::common::*;
use flyer_fcs::document::Element;
use flyer_fcs::fcs::{RunOutcome, SystemType};

#[test]
fn test_plugin_runs_loaded_documents() {
    let mut app = TestAppBuilder::new()
        .with_document(create_gain_document(2.0), SystemType::FlightControl)
        .build();

    app.set_property("in", 3.0);
    app.run_frame();
    assert_eq!(app.property("out"), 6.0);
    assert_eq!(app.status().last, RunOutcome::Executed);
    assert_eq!(app.status().ticks, 1);
}

#[test]
fn test_rate_divider_in_app() {
    let mut app = TestAppBuilder::new()
        .with_rate(4)
        .with_document(create_gain_document(1.0), SystemType::FlightControl)
        .build();

    app.run_steps(8);
    assert_eq!(app.status().ticks, 2);
    assert!((app.fcs().delta_t() - 4.0 / 120.0).abs() < 1e-12);
}

#[test]
fn test_hold_flag() {
    let mut app = TestAppBuilder::new()
        .with_engines(2)
        .with_document(create_gain_document(2.0), SystemType::FlightControl)
        .build();

    app.set_hold(true);
    app.set_property("in", 1.0);
    app.fcs_mut().set_throttle_cmd(-1, 0.4);
    app.run_steps(3);
    assert_eq!(app.status().ticks, 0);
    assert_eq!(app.status().last, RunOutcome::Skipped);
    assert_eq!(app.property("out"), 0.0);

    app.set_hold(false);
    app.run_frame();
    assert_eq!(app.property("out"), 2.0);
    assert_eq!(app.property("fcs/throttle-pos-norm[1]"), 0.4);
}

#[test]
fn test_broken_document_does_not_stop_the_plugin() {
    let broken = Element::new("system").with_attribute("name", "broken").with_child(
        Element::new("channel").with_attribute("execute", "ap/undefined"),
    );
    let mut app = TestAppBuilder::new()
        .with_document(broken, SystemType::System)
        .with_document(create_gain_document(5.0), SystemType::FlightControl)
        .build();

    assert_eq!(app.fcs().channels().len(), 1);
    app.set_property("in", 1.0);
    app.run_frame();
    assert_eq!(app.property("out"), 5.0);
}

#[test]
fn test_steering_follows_command() {
    let mut app = TestAppBuilder::new()
        .with_gear(0.0)
        .with_gear(-30.0)
        .build();

    app.set_property("fcs/steer-cmd-norm", 0.5);
    app.run_frame();
    assert_eq!(app.property("fcs/steer-pos-deg[1]"), -15.0);
    assert_eq!(app.fcs().steer_pos_deg(0), 0.0);
    assert_eq!(app.fcs().num_gear(), 2);
}

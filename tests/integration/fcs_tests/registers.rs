use crate::common::*;
use approx::assert_relative_eq;
use flyer_fcs::fcs::{Control, FlightControlSystem, OutputForm, RunOutcome, SetForm, Surface};
use flyer_fcs::properties::{PropertyManager, PropertyStore};
use flyer_fcs::resources::FcsConfig;
use std::sync::Arc;

fn create_engine() -> (FlightControlSystem, PropertyManager) {
    let properties = PropertyManager::new();
    let store: Arc<dyn PropertyStore> = Arc::new(properties.clone());
    (FlightControlSystem::new(store, FcsConfig::default()), properties)
}

#[test]
fn test_radian_degree_roundtrip_on_every_surface() {
    let (mut fcs, _) = create_engine();
    for surface in Surface::ALL {
        for x in [-0.6, -0.01, 0.0, 0.25, 1.4] {
            fcs.set_surface(surface, SetForm::Radians, x);
            assert_relative_eq!(
                fcs.surface(surface, OutputForm::Degrees).to_radians(),
                x,
                epsilon = 1e-12
            );
            assert_eq!(fcs.surface(surface, OutputForm::Magnitude), x.abs());
        }
    }
}

#[test]
fn test_normalized_leaves_angles_alone() {
    let (mut fcs, _) = create_engine();
    fcs.set_surface(Surface::Rudder, SetForm::Degrees, -12.0);
    fcs.set_surface(Surface::Rudder, SetForm::Normalized, 0.75);

    assert_eq!(fcs.surface(Surface::Rudder, OutputForm::Degrees), -12.0);
    assert_relative_eq!(
        fcs.surface(Surface::Rudder, OutputForm::Radians),
        -12f64.to_radians(),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        fcs.surface(Surface::Rudder, OutputForm::Magnitude),
        12f64.to_radians(),
        epsilon = 1e-12
    );
    assert_eq!(fcs.surface(Surface::Rudder, OutputForm::Normalized), 0.75);
}

#[test]
fn test_throttle_broadcast_and_out_of_range() {
    let (mut fcs, properties) = create_engine();
    fcs.add_throttle();
    fcs.add_throttle();

    fcs.set_throttle_cmd(-1, 0.5);
    assert_eq!(fcs.throttle_cmd(0), 0.5);
    assert_eq!(fcs.throttle_cmd(1), 0.5);

    fcs.set_throttle_cmd(5, 0.9);
    assert_eq!(fcs.throttle_cmd(0), 0.5);
    assert_eq!(fcs.throttle_cmd(1), 0.5);
    assert_eq!(fcs.throttle_cmd(5), 0.0);
    assert_eq!(fcs.throttle_cmd(-1), 0.0);

    assert_property_eq(&properties, "fcs/throttle-cmd-norm[1]", 0.5);
}

#[test]
fn test_every_engine_family_grows_together() {
    let (mut fcs, properties) = create_engine();
    for _ in 0..3 {
        fcs.add_throttle();
    }
    assert_eq!(fcs.num_engines(), 3);
    for property in flyer_fcs::fcs::ENGINE_PROPERTIES {
        for index in 0..3 {
            assert!(properties.has_node(&format!("{}[{}]", property, index)));
        }
        assert!(!properties.has_node(&format!("{}[3]", property)));
    }
}

#[test]
fn test_init_model_then_run_on_empty_configuration() {
    let (mut fcs, _) = create_engine();
    fcs.add_throttle();
    fcs.add_gear(45.0);
    fcs.set_throttle_cmd(0, 0.8);
    fcs.set_mixture_cmd(0, 1.0);
    fcs.set_feather_cmd(0, true);
    fcs.set_control(Control::SteerCmd, 1.0);
    fcs.set_surface(Surface::LeftAileron, SetForm::Radians, 0.2);
    fcs.run(false);
    assert_eq!(fcs.steer_pos_deg(0), 45.0);

    fcs.init_model();
    for control in Control::ALL {
        assert_eq!(fcs.control(control), 0.0, "{:?}", control);
    }
    assert_eq!(fcs.throttle_cmd(0), 0.0);
    assert_eq!(fcs.throttle_pos(0), 0.0);
    assert!(!fcs.feather_cmd(0));

    assert_eq!(fcs.run(false), RunOutcome::Executed);
    assert_registers_finite(&fcs);
    assert_eq!(fcs.throttle_pos(0), fcs.throttle_cmd(0));
    assert_eq!(fcs.mixture_pos(0), 0.0);
    assert_eq!(fcs.steer_pos_deg(0), 0.0);
}

#[test]
fn test_external_writes_through_properties() {
    let (fcs, properties) = create_engine();
    properties.set_double("fcs/speedbrake-pos-deg", 30.0);
    assert_relative_eq!(
        fcs.surface(Surface::Speedbrake, OutputForm::Radians),
        30f64.to_radians(),
        epsilon = 1e-12
    );
    properties.set_double("gear/tailhook-pos-norm", 1.0);
    assert_eq!(fcs.control(Control::TailhookPos), 1.0);
}

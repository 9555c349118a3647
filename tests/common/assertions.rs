use approx::assert_relative_eq;
use flyer_fcs::fcs::{FlightControlSystem, OutputForm, Surface};
use flyer_fcs::properties::PropertyStore;

/// Assert that a property holds the expected value
#[track_caller]
pub fn assert_property_eq(store: &dyn PropertyStore, path: &str, expected: f64) {
    assert!(store.has_node(path), "Property {} does not exist", path);
    assert_relative_eq!(store.get_double(path), expected, epsilon = 1e-9);
}

/// Assert that every surface position is a finite number
#[track_caller]
pub fn assert_registers_finite(fcs: &FlightControlSystem) {
    for surface in Surface::ALL {
        for form in [
            OutputForm::Radians,
            OutputForm::Degrees,
            OutputForm::Normalized,
            OutputForm::Magnitude,
        ] {
            let value = fcs.surface(surface, form);
            assert!(
                value.is_finite(),
                "{:?} {:?} is not finite: {}",
                surface,
                form,
                value
            );
        }
    }
}

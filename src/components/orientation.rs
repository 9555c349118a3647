use nalgebra::{Rotation3, Vector3};

use crate::document::Element;
use crate::properties::{PropertyNode, PropertyStore};
use crate::resources::errors::{FcsError, Result};
use crate::utils::{body_to_frame, DEG_TO_RAD, INCH_TO_FT, METER_TO_FT};

/// Mounting of an inertial sensor: the rotation from body axes into sensor
/// axes and the sensor axis that is reported.
#[derive(Debug, Clone)]
pub struct SensorOrientation {
    transform: Rotation3<f64>,
    axis: usize,
}

impl SensorOrientation {
    pub fn from_element(element: &Element) -> Result<Self> {
        let transform = match element.find_element("orientation") {
            Some(orientation) => {
                let scale = match orientation.attribute_or("unit", "DEG") {
                    "DEG" | "deg" => DEG_TO_RAD,
                    "RAD" | "rad" => 1.0,
                    other => {
                        return Err(FcsError::StructuralConfig(format!(
                            "unknown orientation unit '{}'",
                            other
                        )))
                    }
                };
                let [roll, pitch, yaw] = triplet(orientation)?;
                body_to_frame(roll * scale, pitch * scale, yaw * scale)
            }
            None => Rotation3::identity(),
        };

        let axis = match element.find_element_value("axis") {
            Some("X" | "x") => 0,
            Some("Y" | "y") => 1,
            Some("Z" | "z") => 2,
            Some(other) => {
                return Err(FcsError::StructuralConfig(format!(
                    "unknown sensor axis '{}' in {}",
                    other,
                    element.describe()
                )))
            }
            None => return Err(FcsError::missing(element.name(), "axis")),
        };

        Ok(Self { transform, axis })
    }

    /// Rotates a body-axis vector into sensor axes and picks the sensed axis.
    pub fn sense(&self, body: &Vector3<f64>) -> f64 {
        (self.transform * body)[self.axis]
    }
}

/// Reads the `x`, `y`, `z` children of an element, each defaulting to zero.
pub(crate) fn triplet(element: &Element) -> Result<[f64; 3]> {
    Ok([
        element.number_or("x", 0.0)?,
        element.number_or("y", 0.0)?,
        element.number_or("z", 0.0)?,
    ])
}

/// Sensor location relative to the centre of gravity, in feet.
pub(crate) fn location(element: &Element) -> Result<Vector3<f64>> {
    let Some(location) = element.find_element("location") else {
        return Ok(Vector3::zeros());
    };
    let scale = match location.attribute_or("unit", "IN") {
        "IN" | "in" => INCH_TO_FT,
        "FT" | "ft" => 1.0,
        "M" | "m" => METER_TO_FT,
        other => {
            return Err(FcsError::StructuralConfig(format!(
                "unknown location unit '{}'",
                other
            )))
        }
    };
    let [x, y, z] = triplet(location)?;
    Ok(Vector3::new(x, y, z) * scale)
}

/// Three host properties read together as a vector.
#[derive(Debug, Clone)]
pub struct VectorSource([PropertyNode; 3]);

impl VectorSource {
    pub fn new(store: &dyn PropertyStore, paths: [&str; 3]) -> Result<Self> {
        let node = |path: &str| {
            store
                .get_node(path, true)
                .ok_or_else(|| FcsError::StructuralConfig(format!("invalid property path '{}'", path)))
        };
        Ok(Self([node(paths[0])?, node(paths[1])?, node(paths[2])?]))
    }

    pub fn read(&self) -> Vector3<f64> {
        Vector3::new(self.0[0].get(), self.0[1].get(), self.0[2].get())
    }

    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|node| node.path().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_orientation() {
        let el = Element::new("gyro").with_child(Element::leaf("axis", "Y"));
        let orientation = SensorOrientation::from_element(&el).unwrap();
        assert_eq!(orientation.sense(&Vector3::new(1.0, 2.0, 3.0)), 2.0);
    }

    #[test]
    fn test_yawed_mount() {
        let el = Element::new("gyro")
            .with_child(Element::leaf("axis", "X"))
            .with_child(Element::new("orientation").with_child(Element::leaf("z", "90")));
        let orientation = SensorOrientation::from_element(&el).unwrap();
        // A sensor yawed 90 deg right sees the body y axis along its own x.
        assert_relative_eq!(
            orientation.sense(&Vector3::new(0.0, 1.0, 0.0)),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_location_units() {
        let el = Element::new("accelerometer").with_child(
            Element::new("location")
                .with_child(Element::leaf("x", "24"))
                .with_child(Element::leaf("z", "-12")),
        );
        let loc = location(&el).unwrap();
        assert_relative_eq!(loc.x, 2.0);
        assert_relative_eq!(loc.z, -1.0);
    }

    #[test]
    fn test_missing_axis() {
        assert!(SensorOrientation::from_element(&Element::new("gyro")).is_err());
    }
}

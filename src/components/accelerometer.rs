use nalgebra::Vector3;

use crate::components::orientation::{location, SensorOrientation, VectorSource};
use crate::components::sensor::SensorModel;
use crate::components::{BuildContext, ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::resources::errors::Result;
use crate::utils::{BODY_ACCEL_PROPERTIES, BODY_RATE_DOT_PROPERTIES, BODY_RATE_PROPERTIES};

/// Specific force sensed at a point away from the centre of gravity.
///
/// `a = a_cg + ω̇ × r + ω × (ω × r)`, rotated into sensor axes.
#[derive(Debug, Clone)]
pub struct Accelerometer {
    base: ComponentBase,
    model: SensorModel,
    orientation: SensorOrientation,
    location: Vector3<f64>,
    accel: VectorSource,
    rates: VectorSource,
    rate_dots: VectorSource,
}

impl Accelerometer {
    pub fn from_element(element: &Element, ctx: &BuildContext<'_>) -> Result<Self> {
        let base = ComponentBase::from_element(element, ctx.store)?;
        let model = SensorModel::from_element(element, &base, ctx)?;
        Ok(Self {
            orientation: SensorOrientation::from_element(element)?,
            location: location(element)?,
            accel: VectorSource::new(ctx.store, BODY_ACCEL_PROPERTIES)?,
            rates: VectorSource::new(ctx.store, BODY_RATE_PROPERTIES)?,
            rate_dots: VectorSource::new(ctx.store, BODY_RATE_DOT_PROPERTIES)?,
            base,
            model,
        })
    }

    fn body_acceleration(&self) -> Vector3<f64> {
        let omega = self.rates.read();
        let omega_dot = self.rate_dots.read();
        let r = self.location;
        self.accel.read() + omega_dot.cross(&r) + omega.cross(&omega.cross(&r))
    }
}

impl SignalProcessor for Accelerometer {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let sensed = self.orientation.sense(&self.body_acceleration());
        self.base.input = sensed;
        self.base.output = self.model.process(sensed, dt);
        self.base.finish();
    }

    fn reset(&mut self) {
        self.model.reset();
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        paths.extend(self.accel.paths());
        paths.extend(self.rates.paths());
        paths.extend(self.rate_dots.paths());
        paths
    }
}

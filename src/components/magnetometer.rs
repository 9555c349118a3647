use crate::components::orientation::{SensorOrientation, VectorSource};
use crate::components::sensor::SensorModel;
use crate::components::{BuildContext, ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::resources::errors::Result;
use crate::utils::{ned_to_body, EULER_PROPERTIES, MAGNETIC_FIELD_PROPERTIES};

/// Earth magnetic field (nT) about one sensor axis.
///
/// The host publishes the field in local NED axes; it is rotated into body
/// axes with the current Euler attitude, then into sensor axes.
#[derive(Debug, Clone)]
pub struct Magnetometer {
    base: ComponentBase,
    model: SensorModel,
    orientation: SensorOrientation,
    field: VectorSource,
    attitude: VectorSource,
}

impl Magnetometer {
    pub fn from_element(element: &Element, ctx: &BuildContext<'_>) -> Result<Self> {
        let base = ComponentBase::from_element(element, ctx.store)?;
        let model = SensorModel::from_element(element, &base, ctx)?;
        Ok(Self {
            orientation: SensorOrientation::from_element(element)?,
            field: VectorSource::new(ctx.store, MAGNETIC_FIELD_PROPERTIES)?,
            attitude: VectorSource::new(ctx.store, EULER_PROPERTIES)?,
            base,
            model,
        })
    }
}

impl SignalProcessor for Magnetometer {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let euler = self.attitude.read();
        let body = ned_to_body(&self.field.read(), euler.x, euler.y, euler.z);
        let sensed = self.orientation.sense(&body);
        self.base.input = sensed;
        self.base.output = self.model.process(sensed, dt);
        self.base.finish();
    }

    fn reset(&mut self) {
        self.model.reset();
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        paths.extend(self.field.paths());
        paths.extend(self.attitude.paths());
        paths
    }
}

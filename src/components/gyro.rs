use crate::components::orientation::{SensorOrientation, VectorSource};
use crate::components::sensor::SensorModel;
use crate::components::{BuildContext, ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::resources::errors::Result;
use crate::utils::BODY_RATE_PROPERTIES;

/// Body angular rate about one sensor axis.
#[derive(Debug, Clone)]
pub struct Gyro {
    base: ComponentBase,
    model: SensorModel,
    orientation: SensorOrientation,
    rates: VectorSource,
}

impl Gyro {
    pub fn from_element(element: &Element, ctx: &BuildContext<'_>) -> Result<Self> {
        let base = ComponentBase::from_element(element, ctx.store)?;
        let model = SensorModel::from_element(element, &base, ctx)?;
        Ok(Self {
            orientation: SensorOrientation::from_element(element)?,
            rates: VectorSource::new(ctx.store, BODY_RATE_PROPERTIES)?,
            base,
            model,
        })
    }
}

impl SignalProcessor for Gyro {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let sensed = self.orientation.sense(&self.rates.read());
        self.base.input = sensed;
        self.base.output = self.model.process(sensed, dt);
        self.base.finish();
    }

    fn reset(&mut self) {
        self.model.reset();
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        paths.extend(self.rates.paths());
        paths
    }
}

use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::properties::PropertyStore;
use crate::resources::errors::Result;

/// Zero output inside `±width/2`, shifted and scaled outside it.
#[derive(Debug, Clone)]
pub struct DeadBand {
    base: ComponentBase,
    width: f64,
    gain: f64,
}

impl DeadBand {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::with_input(element, store)?,
            width: element.number_or("width", 0.0)?.abs(),
            gain: element.number_or("gain", 1.0)?,
        })
    }
}

impl SignalProcessor for DeadBand {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, _dt: f64) {
        let input = self.base.read_input();
        let half = self.width / 2.0;
        self.base.output = if input < -half {
            (input + half) * self.gain
        } else if input > half {
            (input - half) * self.gain
        } else {
            0.0
        };
        self.base.finish();
    }
}

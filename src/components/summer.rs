use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::Result;

/// Sum of all inputs plus an optional bias.
#[derive(Debug, Clone)]
pub struct Summer {
    base: ComponentBase,
    bias: f64,
}

impl Summer {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::with_input(element, store)?,
            bias: element.number_or("bias", 0.0)?,
        })
    }
}

impl SignalProcessor for Summer {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, _dt: f64) {
        let sum: f64 = self.base.inputs.iter().map(Parameter::value).sum();
        self.base.input = sum;
        self.base.output = sum + self.bias;
        self.base.finish();
    }
}

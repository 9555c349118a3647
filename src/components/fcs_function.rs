use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Function;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

/// A channel component whose output is an arbitrary expression.
#[derive(Debug, Clone)]
pub struct FcsFunction {
    base: ComponentBase,
    function: Function,
}

impl FcsFunction {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::from_element(element, store)?;
        let function = element
            .find_element("function")
            .ok_or_else(|| FcsError::missing(element.name(), "function"))?;
        Ok(Self {
            base,
            function: Function::from_element(function, store)?,
        })
    }
}

impl SignalProcessor for FcsFunction {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, _dt: f64) {
        self.base.output = self.function.evaluate();
        self.base.finish();
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        paths.extend(self.function.property_paths());
        paths
    }
}

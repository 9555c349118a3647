use crate::components::condition::Condition;
use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone)]
struct Test {
    condition: Condition,
    value: Parameter,
}

/// Selects the value of the first passing `<test>`, else the `<default>`.
///
/// With no default and no passing test the previous output is held. A
/// `debounce` time delays an output change until the selected value has been
/// stable for that long.
#[derive(Debug, Clone)]
pub struct Switch {
    base: ComponentBase,
    default: Option<Parameter>,
    tests: Vec<Test>,
    debounce: f64,
    pending: Option<f64>,
    pending_time: f64,
    initialized: bool,
}

fn value_attribute(element: &Element, store: &dyn PropertyStore) -> Result<Parameter> {
    let value = element.attribute("value").ok_or_else(|| {
        FcsError::StructuralConfig(format!("{} has no value attribute", element.describe()))
    })?;
    Parameter::parse(value, store)
}

impl Switch {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::from_element(element, store)?;

        let default = element
            .find_element("default")
            .map(|default| value_attribute(default, store))
            .transpose()?;
        let tests = element
            .find_elements("test")
            .map(|test| {
                Ok(Test {
                    condition: Condition::from_element(test, store)?,
                    value: value_attribute(test, store)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if default.is_none() && tests.is_empty() {
            return Err(FcsError::StructuralConfig(format!(
                "{} has neither a default nor a test",
                element.describe()
            )));
        }

        Ok(Self {
            base,
            default,
            tests,
            debounce: element.number_or("debounce", 0.0)?.max(0.0),
            pending: None,
            pending_time: 0.0,
            initialized: false,
        })
    }

    fn select(&self) -> Option<f64> {
        self.tests
            .iter()
            .find(|test| test.condition.evaluate())
            .map(|test| test.value.value())
            .or_else(|| self.default.as_ref().map(Parameter::value))
    }
}

impl SignalProcessor for Switch {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        if let Some(selected) = self.select() {
            if self.debounce <= 0.0 || !self.initialized {
                self.base.output = selected;
                self.pending = None;
            } else if selected == self.base.output {
                self.pending = None;
            } else {
                if self.pending != Some(selected) {
                    self.pending = Some(selected);
                    self.pending_time = 0.0;
                }
                self.pending_time += dt;
                if self.pending_time >= self.debounce {
                    self.base.output = selected;
                    self.pending = None;
                }
            }
            self.initialized = true;
        }
        self.base.finish();
    }

    fn reset(&mut self) {
        self.pending = None;
        self.pending_time = 0.0;
        self.initialized = false;
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        for test in &self.tests {
            paths.extend(test.condition.property_paths());
            paths.extend(test.value.path().map(str::to_string));
        }
        if let Some(default) = &self.default {
            paths.extend(default.path().map(str::to_string));
        }
        paths
    }
}

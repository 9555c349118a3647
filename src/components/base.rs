use bevy::log::debug;

use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::{PropertyNode, PropertyStore};
use crate::resources::errors::{FcsError, Result};

/// Output limits from a `<clipto>` element.
#[derive(Debug, Clone)]
pub struct Clip {
    pub min: Parameter,
    pub max: Parameter,
    /// Wrap into `[min, max)` instead of saturating.
    pub cyclic: bool,
}

impl Clip {
    fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let min = Parameter::from_child(element, "min", store)?
            .ok_or_else(|| FcsError::missing("clipto", "min"))?;
        let max = Parameter::from_child(element, "max", store)?
            .ok_or_else(|| FcsError::missing("clipto", "max"))?;
        Ok(Self {
            min,
            max,
            cyclic: element.attribute("type") == Some("cyclic"),
        })
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (min, max) = (self.min.value(), self.max.value());
        if self.cyclic {
            let range = max - min;
            if range <= 0.0 {
                return min;
            }
            min + (value - min).rem_euclid(range)
        } else if value > max {
            max
        } else if value < min {
            min
        } else {
            value
        }
    }
}

/// State and wiring shared by every component kind.
#[derive(Debug, Clone)]
pub struct ComponentBase {
    name: String,
    tag: String,
    pub(crate) inputs: Vec<Parameter>,
    name_node: PropertyNode,
    outputs: Vec<PropertyNode>,
    clip: Option<Clip>,
    pub(crate) input: f64,
    pub(crate) output: f64,
}

/// Property path a component publishes under.
///
/// Bare names go under `fcs/`, lowercased with spaces turned into dashes.
/// Names that already contain a `/` are used as given.
pub fn component_property_name(name: &str) -> String {
    if name.contains('/') {
        name.trim_start_matches('/').to_string()
    } else {
        format!("fcs/{}", name.trim().to_lowercase().replace(' ', "-"))
    }
}

impl ComponentBase {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let name = element
            .attribute("name")
            .ok_or_else(|| FcsError::StructuralConfig(format!("{} has no name", element.describe())))?
            .to_string();

        let inputs = element
            .find_elements("input")
            .map(|input| Parameter::from_element(input, store))
            .collect::<Result<Vec<_>>>()?;

        let property = component_property_name(&name);
        let name_node = store
            .get_node(&property, true)
            .ok_or_else(|| FcsError::StructuralConfig(format!("invalid component name '{}'", name)))?;

        let outputs = element
            .find_elements("output")
            .map(|output| {
                let path = output.data_line().unwrap_or_default();
                store.get_node(path, true).ok_or_else(|| {
                    FcsError::StructuralConfig(format!("invalid output '{}' in {}", path, element.describe()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let clip = element
            .find_element("clipto")
            .map(|clipto| Clip::from_element(clipto, store))
            .transpose()?;

        debug!(
            "Assembled <{}> {} with {} input(s) and {} output(s)",
            element.name(),
            name,
            inputs.len(),
            outputs.len()
        );

        Ok(Self {
            name,
            tag: element.name().to_string(),
            inputs,
            name_node,
            outputs,
            clip,
            input: 0.0,
            output: 0.0,
        })
    }

    /// Same as [`ComponentBase::from_element`] but insists on at least one input.
    pub fn with_input(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = Self::from_element(element, store)?;
        if base.inputs.is_empty() {
            return Err(FcsError::missing(element.name(), "input"));
        }
        Ok(base)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Path of the component's own output property.
    pub fn property_path(&self) -> &str {
        self.name_node.path()
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    /// Reads the first input into `self.input`.
    pub(crate) fn read_input(&mut self) -> f64 {
        self.input = self.inputs.first().map_or(0.0, Parameter::value);
        self.input
    }

    /// Applies `clipto` limits and publishes the output.
    pub(crate) fn finish(&mut self) {
        if let Some(clip) = &self.clip {
            self.output = clip.apply(self.output);
        }
        self.publish();
    }

    pub(crate) fn publish(&self) {
        self.name_node.set(self.output);
        for node in &self.outputs {
            node.set(self.output);
        }
    }

    pub fn input_paths(&self) -> Vec<String> {
        let clip_params = self
            .clip
            .iter()
            .flat_map(|clip| [&clip.min, &clip.max]);
        self.inputs
            .iter()
            .chain(clip_params)
            .filter_map(|p| p.path().map(str::to_string))
            .collect()
    }

    pub fn output_paths(&self) -> Vec<String> {
        std::iter::once(&self.name_node)
            .chain(self.outputs.iter())
            .map(|node| node.path().to_string())
            .collect()
    }

    /// Child node of the component's property, e.g. `fcs/act/saturated`.
    pub(crate) fn child_node(&self, store: &dyn PropertyStore, child: &str) -> Result<PropertyNode> {
        let path = format!("{}/{}", self.property_path(), child);
        store
            .get_node(&path, true)
            .ok_or_else(|| FcsError::StructuralConfig(format!("invalid property path '{}'", path)))
    }
}

use bevy::log::debug;

use crate::document::{parse_number, Element};
use crate::properties::{PropertyNode, PropertyStore};
use crate::resources::errors::{FcsError, Result};

/// An operand that is either a literal or a (possibly negated) property.
///
/// Inputs, gains, clip limits and filter coefficients all accept either form,
/// e.g. `2.5`, `fcs/pitch-gain` or `-fcs/elevator-cmd-norm`.
#[derive(Debug, Clone)]
pub enum Parameter {
    Constant(f64),
    Property { node: PropertyNode, sign: f64 },
}

impl Parameter {
    pub fn parse(text: &str, store: &dyn PropertyStore) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FcsError::StructuralConfig(
                "empty operand where a number or property was expected".to_string(),
            ));
        }
        if let Ok(value) = text.parse::<f64>() {
            return Ok(Parameter::Constant(value));
        }

        let (path, sign) = match text.strip_prefix('-') {
            Some(rest) => (rest.trim(), -1.0),
            None => (text, 1.0),
        };
        if !store.has_node(path) {
            debug!("Creating property {} referenced before definition", path);
        }
        let node = store
            .get_node(path, true)
            .ok_or_else(|| FcsError::StructuralConfig(format!("invalid property path '{}'", text)))?;
        Ok(Parameter::Property { node, sign })
    }

    /// Reads the operand from an element's text payload.
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let text = element
            .data_line()
            .ok_or_else(|| FcsError::invalid_number(element.name(), ""))?;
        Self::parse(text, store)
    }

    /// Operand from a child element, if present.
    pub fn from_child(
        element: &Element,
        tag: &str,
        store: &dyn PropertyStore,
    ) -> Result<Option<Self>> {
        element
            .find_element(tag)
            .map(|child| Self::from_element(child, store))
            .transpose()
    }

    /// Like [`Parameter::from_child`] with a literal fallback.
    pub fn from_child_or(
        element: &Element,
        tag: &str,
        default: f64,
        store: &dyn PropertyStore,
    ) -> Result<Self> {
        Ok(Self::from_child(element, tag, store)?.unwrap_or(Parameter::Constant(default)))
    }

    /// Strictly numeric operand, used where a property makes no sense.
    pub fn literal(element: &Element) -> Result<Self> {
        let text = element.data_line().unwrap_or_default();
        Ok(Parameter::Constant(parse_number(element.name(), text)?))
    }

    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            Parameter::Constant(value) => *value,
            Parameter::Property { node, sign } => node.get() * sign,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Parameter::Constant(_))
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Parameter::Constant(_) => None,
            Parameter::Property { node, .. } => Some(node.path()),
        }
    }

    pub fn node(&self) -> Option<&PropertyNode> {
        match self {
            Parameter::Constant(_) => None,
            Parameter::Property { node, .. } => Some(node),
        }
    }
}

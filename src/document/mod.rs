//! Generic configuration element tree.
//!
//! Flight-control documents are trees of named elements with string
//! attributes, ordered children and an optional text payload. On disk they
//! are YAML:
//!
//! ```yaml
//! name: flight_control
//! attributes: { name: c172 }
//! children:
//!   - name: channel
//!     attributes: { name: pitch }
//!     children:
//!       - name: pure_gain
//!         attributes: { name: elevator-gain }
//!         children:
//!           - { name: input, text: fcs/elevator-cmd-norm }
//!           - { name: gain, text: 2.0 }
//! ```
//!
//! Scalar attributes and text (numbers, booleans) are kept as strings so the
//! loader decides how to interpret them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    /// File the element was read from, when it came from disk.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for a leaf element holding only text, e.g. `<gain>2.0</gain>`.
    pub fn leaf(name: impl Into<String>, text: impl ToString) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut element = Self::from_yaml_str(&contents)?;
        element.source = Some(path.to_path_buf());
        Ok(element)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, treating an empty string as absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attribute(key).unwrap_or(default)
    }

    pub fn attribute_as_number(&self, key: &str) -> Result<Option<f64>> {
        self.attribute(key)
            .map(|value| parse_number(&self.name, value))
            .transpose()
    }

    pub fn find_element(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == tag)
    }

    /// All children with the given tag, in document order.
    pub fn find_elements<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == tag)
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// First non-empty line of the text payload.
    pub fn data_line(&self) -> Option<&str> {
        self.data_lines().into_iter().next()
    }

    pub fn data_lines(&self) -> Vec<&str> {
        self.text
            .as_deref()
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn data_as_number(&self) -> Result<f64> {
        let line = self
            .data_line()
            .ok_or_else(|| FcsError::invalid_number(&self.name, ""))?;
        parse_number(&self.name, line)
    }

    /// Text of the first child with the given tag.
    pub fn find_element_value(&self, tag: &str) -> Option<&str> {
        self.find_element(tag).and_then(Element::data_line)
    }

    pub fn find_element_value_as_number(&self, tag: &str) -> Result<f64> {
        self.find_element(tag)
            .ok_or_else(|| FcsError::missing(&self.name, tag))?
            .data_as_number()
    }

    /// Numeric child value, or `default` when the child is absent.
    pub fn number_or(&self, tag: &str, default: f64) -> Result<f64> {
        match self.find_element(tag) {
            Some(child) => child.data_as_number(),
            None => Ok(default),
        }
    }

    /// Human-readable location used in log messages.
    pub fn describe(&self) -> String {
        match (self.attribute("name"), &self.source) {
            (Some(name), Some(source)) => format!("<{} {}> in {}", self.name, name, source.display()),
            (Some(name), None) => format!("<{} {}>", self.name, name),
            (None, Some(source)) => format!("<{}> in {}", self.name, source.display()),
            (None, None) => format!("<{}>", self.name),
        }
    }
}

pub(crate) fn parse_number(element: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| FcsError::invalid_number(element, text))
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    let raw = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            scalar_to_string(value)
                .map(|value| (key.clone(), value))
                .ok_or_else(|| D::Error::custom(format!("attribute '{}' must be a scalar", key)))
        })
        .collect()
}

fn scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("element text must be a scalar")),
    }
}

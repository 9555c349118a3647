use bevy::log::warn;

use crate::components::FcsComponent;
use crate::properties::PropertyNode;

/// An ordered list of components, optionally gated by a property.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    gate: Option<PropertyNode>,
    components: Vec<FcsComponent>,
}

/// A component that reads a value produced by itself or by a component
/// placed after it in the same channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleRead {
    pub channel: String,
    pub reader: String,
    pub writer: String,
    pub property: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, gate: Option<PropertyNode>) -> Self {
        Self {
            name: name.into(),
            gate,
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gate(&self) -> Option<&PropertyNode> {
        self.gate.as_ref()
    }

    pub fn components(&self) -> &[FcsComponent] {
        &self.components
    }

    pub fn push(&mut self, component: FcsComponent) {
        self.components.push(component);
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.as_ref().map_or(true, PropertyNode::get_bool)
    }

    /// Runs every component once in order. A closed gate leaves all outputs
    /// untouched and returns `false`.
    pub fn execute(&mut self, dt: f64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        for component in &mut self.components {
            component.run(dt);
        }
        true
    }

    pub fn reset(&mut self) {
        self.components.iter_mut().for_each(FcsComponent::reset);
    }

    /// Reads that will observe the previous tick's value.
    pub fn stale_reads(&self) -> Vec<StaleRead> {
        let mut findings = Vec::new();
        for (i, reader) in self.components.iter().enumerate() {
            let inputs = reader.input_paths();
            for writer in &self.components[i..] {
                for property in writer.output_paths() {
                    if inputs.contains(&property) {
                        findings.push(StaleRead {
                            channel: self.name.clone(),
                            reader: reader.name().to_string(),
                            writer: writer.name().to_string(),
                            property,
                        });
                    }
                }
            }
        }
        findings
    }

    pub(crate) fn lint(&self) -> usize {
        let findings = self.stale_reads();
        for finding in &findings {
            warn!(
                "Channel '{}': '{}' reads {} before '{}' writes it this tick",
                finding.channel, finding.reader, finding.property, finding.writer
            );
        }
        findings.len()
    }
}

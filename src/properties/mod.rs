//! Hierarchical property store shared between the flight-control engine and
//! the rest of the simulation.
//!
//! Every value lives in a [`PropertyNode`], a cheap handle that components
//! resolve once at load time and then read or write every tick without
//! touching the path index. A node is either a plain value cell or *tied* to
//! program accessors (a getter and optional setter), which is how engine
//! registers are exposed by name.
//!
//! Paths use `/` separators. An explicit `[0]` index addresses the same node
//! as the bare name, so `fcs/throttle-cmd-norm[0]` and `fcs/throttle-cmd-norm`
//! are interchangeable.

mod node;

pub use node::{AtomicF64, Getter, PropertyNode, Setter};

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The store interface the flight-control core depends on.
pub trait PropertyStore: Send + Sync {
    fn has_node(&self, path: &str) -> bool;

    /// Looks up a node, creating a zero-valued one when `create` is set.
    fn get_node(&self, path: &str, create: bool) -> Option<PropertyNode>;

    /// Binds `path` to program accessors. An existing node keeps its identity,
    /// so handles resolved earlier observe the tie.
    fn tie(&self, path: &str, getter: Getter, setter: Option<Setter>) -> PropertyNode;

    /// Removes a tie, leaving the last observed value in the node.
    fn untie(&self, path: &str);

    /// All known paths, sorted.
    fn paths(&self) -> Vec<String>;

    fn get_double(&self, path: &str) -> f64 {
        self.get_node(path, false).map_or(0.0, |node| node.get())
    }

    fn get_bool(&self, path: &str) -> bool {
        self.get_double(path) != 0.0
    }

    fn set_double(&self, path: &str, value: f64) {
        if let Some(node) = self.get_node(path, true) {
            node.set(value);
        }
    }
}

/// Builds the `name[index]` form used for per-engine and per-gear properties.
pub fn indexed_name(name: &str, index: usize) -> String {
    format!("{}[{}]", name, index)
}

/// Canonical form of a property path.
pub fn normalize_path(path: &str) -> String {
    path.trim()
        .trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix("[0]").unwrap_or(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Default in-process property store.
///
/// Cloning yields another handle onto the same tree.
#[derive(Resource, Clone, Default)]
pub struct PropertyManager {
    nodes: Arc<RwLock<HashMap<String, PropertyNode>>>,
}

impl PropertyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyStore for PropertyManager {
    fn has_node(&self, path: &str) -> bool {
        let key = normalize_path(path);
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    fn get_node(&self, path: &str, create: bool) -> Option<PropertyNode> {
        let key = normalize_path(path);
        if key.is_empty() {
            return None;
        }

        if let Some(node) = self
            .nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(node.clone());
        }

        if !create {
            return None;
        }

        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        let node = nodes
            .entry(key.clone())
            .or_insert_with(|| PropertyNode::new(&key));
        Some(node.clone())
    }

    fn tie(&self, path: &str, getter: Getter, setter: Option<Setter>) -> PropertyNode {
        let key = normalize_path(path);
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        let node = nodes
            .entry(key.clone())
            .or_insert_with(|| PropertyNode::new(&key))
            .clone();
        drop(nodes);

        if node.is_tied() {
            warn!("Property {} was already tied; rebinding", key);
        }
        node.bind(getter, setter);
        node
    }

    fn untie(&self, path: &str) {
        if let Some(node) = self.get_node(path, false) {
            node.unbind();
        }
    }

    fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

use bevy::log::debug;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type Getter = Arc<dyn Fn() -> f64 + Send + Sync>;
pub type Setter = Arc<dyn Fn(f64) + Send + Sync>;

/// An `f64` cell whose loads and stores are single atomic operations.
#[derive(Debug, Default)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

struct Tie {
    getter: Getter,
    setter: Option<Setter>,
}

struct NodeInner {
    path: String,
    value: AtomicF64,
    tie: RwLock<Option<Tie>>,
}

/// Shared handle onto one property.
#[derive(Clone)]
pub struct PropertyNode(Arc<NodeInner>);

impl PropertyNode {
    pub(crate) fn new(path: &str) -> Self {
        Self(Arc::new(NodeInner {
            path: path.to_string(),
            value: AtomicF64::default(),
            tie: RwLock::new(None),
        }))
    }

    pub fn path(&self) -> &str {
        &self.0.path
    }

    pub fn get(&self) -> f64 {
        let tie = self.0.tie.read().unwrap_or_else(PoisonError::into_inner);
        match tie.as_ref() {
            Some(tie) => (tie.getter)(),
            None => self.0.value.load(),
        }
    }

    pub fn get_bool(&self) -> bool {
        self.get() != 0.0
    }

    pub fn set(&self, value: f64) {
        let tie = self.0.tie.read().unwrap_or_else(PoisonError::into_inner);
        match tie.as_ref() {
            Some(Tie {
                setter: Some(setter),
                ..
            }) => setter(value),
            Some(_) => debug!("Ignoring write to read-only property {}", self.0.path),
            None => self.0.value.store(value),
        }
    }

    pub fn set_bool(&self, value: bool) {
        self.set(if value { 1.0 } else { 0.0 });
    }

    pub fn is_tied(&self) -> bool {
        self.0
            .tie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn is_writable(&self) -> bool {
        match self
            .0
            .tie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(tie) => tie.setter.is_some(),
            None => true,
        }
    }

    pub(crate) fn bind(&self, getter: Getter, setter: Option<Setter>) {
        let mut tie = self.0.tie.write().unwrap_or_else(PoisonError::into_inner);
        *tie = Some(Tie { getter, setter });
    }

    pub(crate) fn unbind(&self) {
        let mut tie = self.0.tie.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = tie.take() {
            self.0.value.store((old.getter)());
        }
    }

    /// True when both handles refer to the same property.
    pub fn same_node(&self, other: &PropertyNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PropertyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyNode")
            .field("path", &self.0.path)
            .field("value", &self.get())
            .field("tied", &self.is_tied())
            .finish()
    }
}

use bevy::log::error;
use std::sync::{Arc, PoisonError, RwLock};

use crate::properties::{indexed_name, PropertyStore};

/// One per-unit array, e.g. the throttle command of every engine.
///
/// A negative index on `set` addresses every unit. Any other index outside
/// the array is logged and ignored; reads of it return `0.0`.
#[derive(Debug, Clone)]
pub struct IndexedRegister {
    property: &'static str,
    slots: Arc<RwLock<Vec<f64>>>,
}

impl IndexedRegister {
    pub fn new(property: &'static str) -> Self {
        Self {
            property,
            slots: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: i32) -> f64 {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        match usize::try_from(index).ok().and_then(|i| slots.get(i)) {
            Some(value) => *value,
            None => {
                error!(
                    "Invalid read of {} at index {} ({} configured)",
                    self.property,
                    index,
                    slots.len()
                );
                0.0
            }
        }
    }

    pub fn set(&self, index: i32, value: f64) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if index < 0 {
            slots.iter_mut().for_each(|slot| *slot = value);
            return;
        }
        let len = slots.len();
        match slots.get_mut(index as usize) {
            Some(slot) => *slot = value,
            None => error!(
                "Index {} out of range for {} ({} configured)",
                index, self.property, len
            ),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Copies every slot of `source` into this register.
    pub fn copy_from(&self, source: &IndexedRegister) {
        let values = source.values();
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = value;
        }
    }

    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.iter_mut().for_each(|slot| *slot = 0.0);
    }

    fn push(&self) -> usize {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.push(0.0);
        slots.len() - 1
    }

    /// Ties `<property>[index]` to one slot.
    fn tie_slot(&self, store: &dyn PropertyStore, index: usize) {
        let read = self.slots.clone();
        let write = self.slots.clone();
        store.tie(
            &indexed_name(self.property, index),
            Arc::new(move || {
                read.read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(index)
                    .copied()
                    .unwrap_or(0.0)
            }),
            Some(Arc::new(move |value| {
                if let Some(slot) = write
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_mut(index)
                {
                    *slot = value;
                }
            })),
        );
    }
}

/// A family of parallel per-unit registers that always grow together.
#[derive(Debug, Clone)]
pub struct IndexedRegisterSet {
    registers: Vec<IndexedRegister>,
    units: usize,
}

impl IndexedRegisterSet {
    pub fn new(properties: &[&'static str]) -> Self {
        Self {
            registers: properties.iter().copied().map(IndexedRegister::new).collect(),
            units: 0,
        }
    }

    /// Appends a zeroed slot to every register and returns its index. The
    /// `name[index]` properties are tied when `tie` is set.
    pub fn add_unit(&mut self, store: &dyn PropertyStore, tie: bool) -> usize {
        let index = self.units;
        for register in &self.registers {
            let slot = register.push();
            debug_assert_eq!(slot, index);
            if tie {
                register.tie_slot(store, index);
            }
        }
        self.units += 1;
        index
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn register(&self, index: usize) -> &IndexedRegister {
        &self.registers[index]
    }

    pub fn registers(&self) -> &[IndexedRegister] {
        &self.registers
    }

    pub fn clear(&self) {
        self.registers.iter().for_each(IndexedRegister::clear);
    }
}

/// Registers of the per-engine family, in [`ENGINE_PROPERTIES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRegister {
    ThrottleCmd,
    ThrottlePos,
    MixtureCmd,
    MixturePos,
    AdvanceCmd,
    AdvancePos,
    FeatherCmd,
    FeatherPos,
}

pub const ENGINE_PROPERTIES: [&str; 8] = [
    "fcs/throttle-cmd-norm",
    "fcs/throttle-pos-norm",
    "fcs/mixture-cmd-norm",
    "fcs/mixture-pos-norm",
    "fcs/advance-cmd-norm",
    "fcs/advance-pos-norm",
    "fcs/feather-cmd-norm",
    "fcs/feather-pos-norm",
];

/// Command registers and the position each one feeds in passthrough.
pub const ENGINE_PASSTHROUGH: [(EngineRegister, EngineRegister); 4] = [
    (EngineRegister::ThrottleCmd, EngineRegister::ThrottlePos),
    (EngineRegister::MixtureCmd, EngineRegister::MixturePos),
    (EngineRegister::AdvanceCmd, EngineRegister::AdvancePos),
    (EngineRegister::FeatherCmd, EngineRegister::FeatherPos),
];

pub const STEER_POS_PROPERTY: &str = "fcs/steer-pos-deg";

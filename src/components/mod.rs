//! Flight-control components: the signal-processing units a channel runs.
//!
//! Every kind is assembled from one configuration element, looked up by tag
//! in [`REGISTRY`], and stepped through [`FcsComponent::run`].

pub mod accelerometer;
pub mod actuator;
pub mod base;
pub mod condition;
pub mod deadband;
pub mod fcs_function;
pub mod filter;
pub mod gain;
pub mod gyro;
pub mod kinemat;
pub mod magnetometer;
pub mod orientation;
pub mod pid;
pub mod sensor;
pub mod summer;
pub mod switch;

pub use accelerometer::Accelerometer;
pub use actuator::Actuator;
pub use base::{component_property_name, Clip, ComponentBase};
pub use condition::Condition;
pub use deadband::DeadBand;
pub use fcs_function::FcsFunction;
pub use filter::{Filter, FilterType};
pub use gain::Gain;
pub use gyro::Gyro;
pub use kinemat::Kinemat;
pub use magnetometer::Magnetometer;
pub use pid::Pid;
pub use sensor::{Sensor, SensorModel};
pub use summer::Summer;
pub use switch::Switch;

use crate::document::Element;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};
use crate::utils::RngManager;

/// Shared services handed to component constructors.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub store: &'a dyn PropertyStore,
    pub rng: &'a RngManager,
}

impl<'a> BuildContext<'a> {
    pub fn new(store: &'a dyn PropertyStore, rng: &'a RngManager) -> Self {
        Self { store, rng }
    }
}

/// Behaviour common to every component kind.
pub trait SignalProcessor {
    fn base(&self) -> &ComponentBase;

    /// Computes one step and publishes the output.
    fn run(&mut self, dt: f64);

    /// Clears integrator, lag and debounce state.
    fn reset(&mut self) {}

    /// Properties read during `run`.
    fn input_paths(&self) -> Vec<String> {
        self.base().input_paths()
    }

    /// Properties written during `run`.
    fn output_paths(&self) -> Vec<String> {
        self.base().output_paths()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Filter,
    Gain,
    Summer,
    DeadBand,
    Switch,
    Kinemat,
    Function,
    Pid,
    Sensor,
    Actuator,
    Accelerometer,
    Magnetometer,
    Gyro,
}

#[derive(Debug, Clone)]
pub enum FcsComponent {
    Filter(Filter),
    Gain(Gain),
    Summer(Summer),
    DeadBand(DeadBand),
    Switch(Switch),
    Kinemat(Kinemat),
    Function(FcsFunction),
    Pid(Pid),
    Sensor(Sensor),
    Actuator(Actuator),
    Accelerometer(Accelerometer),
    Magnetometer(Magnetometer),
    Gyro(Gyro),
}

type Factory = fn(&Element, &BuildContext<'_>) -> Result<FcsComponent>;

fn build_filter(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Filter::from_element(el, ctx.store).map(FcsComponent::Filter)
}

fn build_gain(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Gain::from_element(el, ctx.store).map(FcsComponent::Gain)
}

fn build_summer(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Summer::from_element(el, ctx.store).map(FcsComponent::Summer)
}

fn build_deadband(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    DeadBand::from_element(el, ctx.store).map(FcsComponent::DeadBand)
}

fn build_switch(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Switch::from_element(el, ctx.store).map(FcsComponent::Switch)
}

fn build_kinemat(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Kinemat::from_element(el, ctx.store).map(FcsComponent::Kinemat)
}

fn build_function(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    FcsFunction::from_element(el, ctx.store).map(FcsComponent::Function)
}

fn build_pid(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Pid::from_element(el, ctx.store).map(FcsComponent::Pid)
}

fn build_sensor(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Sensor::from_element(el, ctx).map(FcsComponent::Sensor)
}

fn build_actuator(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Actuator::from_element(el, ctx.store).map(FcsComponent::Actuator)
}

fn build_accelerometer(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Accelerometer::from_element(el, ctx).map(FcsComponent::Accelerometer)
}

fn build_magnetometer(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Magnetometer::from_element(el, ctx).map(FcsComponent::Magnetometer)
}

fn build_gyro(el: &Element, ctx: &BuildContext<'_>) -> Result<FcsComponent> {
    Gyro::from_element(el, ctx).map(FcsComponent::Gyro)
}

/// Channel child tag to component kind and constructor.
pub static REGISTRY: [(&str, ComponentKind, Factory); 19] = [
    ("lag_filter", ComponentKind::Filter, build_filter),
    ("lead_lag_filter", ComponentKind::Filter, build_filter),
    ("washout_filter", ComponentKind::Filter, build_filter),
    ("second_order_filter", ComponentKind::Filter, build_filter),
    ("integrator", ComponentKind::Filter, build_filter),
    ("pure_gain", ComponentKind::Gain, build_gain),
    ("scheduled_gain", ComponentKind::Gain, build_gain),
    ("aerosurface_scale", ComponentKind::Gain, build_gain),
    ("summer", ComponentKind::Summer, build_summer),
    ("deadband", ComponentKind::DeadBand, build_deadband),
    ("switch", ComponentKind::Switch, build_switch),
    ("kinematic", ComponentKind::Kinemat, build_kinemat),
    ("fcs_function", ComponentKind::Function, build_function),
    ("pid", ComponentKind::Pid, build_pid),
    ("sensor", ComponentKind::Sensor, build_sensor),
    ("actuator", ComponentKind::Actuator, build_actuator),
    ("accelerometer", ComponentKind::Accelerometer, build_accelerometer),
    ("magnetometer", ComponentKind::Magnetometer, build_magnetometer),
    ("gyro", ComponentKind::Gyro, build_gyro),
];

impl ComponentKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(name, _, _)| *name == tag)
            .map(|(_, kind, _)| *kind)
    }
}

impl FcsComponent {
    /// Builds the component for a channel child element.
    ///
    /// Unregistered tags yield [`FcsError::UnknownComponentKind`].
    pub fn from_element(element: &Element, ctx: &BuildContext<'_>) -> Result<Self> {
        let (_, _, factory) = REGISTRY
            .iter()
            .find(|(tag, _, _)| *tag == element.name())
            .ok_or_else(|| FcsError::UnknownComponentKind(element.name().to_string()))?;
        factory(element, ctx)
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            FcsComponent::Filter(_) => ComponentKind::Filter,
            FcsComponent::Gain(_) => ComponentKind::Gain,
            FcsComponent::Summer(_) => ComponentKind::Summer,
            FcsComponent::DeadBand(_) => ComponentKind::DeadBand,
            FcsComponent::Switch(_) => ComponentKind::Switch,
            FcsComponent::Kinemat(_) => ComponentKind::Kinemat,
            FcsComponent::Function(_) => ComponentKind::Function,
            FcsComponent::Pid(_) => ComponentKind::Pid,
            FcsComponent::Sensor(_) => ComponentKind::Sensor,
            FcsComponent::Actuator(_) => ComponentKind::Actuator,
            FcsComponent::Accelerometer(_) => ComponentKind::Accelerometer,
            FcsComponent::Magnetometer(_) => ComponentKind::Magnetometer,
            FcsComponent::Gyro(_) => ComponentKind::Gyro,
        }
    }

    fn processor(&self) -> &dyn SignalProcessor {
        match self {
            FcsComponent::Filter(c) => c,
            FcsComponent::Gain(c) => c,
            FcsComponent::Summer(c) => c,
            FcsComponent::DeadBand(c) => c,
            FcsComponent::Switch(c) => c,
            FcsComponent::Kinemat(c) => c,
            FcsComponent::Function(c) => c,
            FcsComponent::Pid(c) => c,
            FcsComponent::Sensor(c) => c,
            FcsComponent::Actuator(c) => c,
            FcsComponent::Accelerometer(c) => c,
            FcsComponent::Magnetometer(c) => c,
            FcsComponent::Gyro(c) => c,
        }
    }

    fn processor_mut(&mut self) -> &mut dyn SignalProcessor {
        match self {
            FcsComponent::Filter(c) => c,
            FcsComponent::Gain(c) => c,
            FcsComponent::Summer(c) => c,
            FcsComponent::DeadBand(c) => c,
            FcsComponent::Switch(c) => c,
            FcsComponent::Kinemat(c) => c,
            FcsComponent::Function(c) => c,
            FcsComponent::Pid(c) => c,
            FcsComponent::Sensor(c) => c,
            FcsComponent::Actuator(c) => c,
            FcsComponent::Accelerometer(c) => c,
            FcsComponent::Magnetometer(c) => c,
            FcsComponent::Gyro(c) => c,
        }
    }

    pub fn run(&mut self, dt: f64) {
        self.processor_mut().run(dt);
    }

    pub fn reset(&mut self) {
        self.processor_mut().reset();
    }

    pub fn base(&self) -> &ComponentBase {
        self.processor().base()
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn output(&self) -> f64 {
        self.base().output()
    }

    pub fn input_paths(&self) -> Vec<String> {
        self.processor().input_paths()
    }

    pub fn output_paths(&self) -> Vec<String> {
        self.processor().output_paths()
    }
}

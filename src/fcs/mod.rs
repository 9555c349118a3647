//! The flight-control engine.
//!
//! [`FlightControlSystem`] owns the pilot command and surface position
//! registers, the per-engine and per-gear register families, and every
//! channel assembled from flight-control, autopilot and system documents.
//! It is driven one frame at a time through [`FlightControlSystem::run`].

mod channel;
mod indexed;
mod loader;
mod register;

pub use channel::{Channel, StaleRead};
pub use indexed::{
    EngineRegister, IndexedRegister, IndexedRegisterSet, ENGINE_PASSTHROUGH, ENGINE_PROPERTIES,
    STEER_POS_PROPERTY,
};
pub use loader::{find_document, resolve_document, search_paths, SystemType};
pub use register::{
    Angle, AngleUnit, BrakeGroup, Control, OutputForm, ScalarRegister, SetForm, Surface,
    SurfaceRegister,
};

use bevy::log::{error, info};
use bevy::prelude::*;
use std::sync::Arc;

use crate::components::BuildContext;
use crate::document::Element;
use crate::functions::Function;
use crate::properties::PropertyStore;
use crate::resources::config::FcsConfig;
use crate::resources::errors::Result;
use crate::utils::{format_significant, RngManager, GEAR_DOWN};
use loader::Assembly;

/// Whether a call to [`FlightControlSystem::run`] did any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunOutcome {
    Executed,
    #[default]
    Skipped,
}

#[derive(Resource)]
pub struct FlightControlSystem {
    store: Arc<dyn PropertyStore>,
    config: FcsConfig,
    rng: RngManager,

    surfaces: [SurfaceRegister; 7],
    controls: [ScalarRegister; 17],
    engines: IndexedRegisterSet,
    gear: IndexedRegisterSet,
    max_steer_deg: Vec<f64>,

    channels: Vec<Channel>,
    pre_functions: Vec<Function>,
    post_functions: Vec<Function>,
    documents: Vec<(Element, SystemType)>,

    frame: u64,
}

impl FlightControlSystem {
    pub fn new(store: Arc<dyn PropertyStore>, config: FcsConfig) -> Self {
        let controls = Control::ALL.map(|control| match control {
            Control::GearCmd | Control::GearPos => ScalarRegister::new(GEAR_DOWN),
            _ => ScalarRegister::new(0.0),
        });
        let fcs = Self {
            store,
            config,
            rng: RngManager::default(),
            surfaces: Surface::ALL.map(|_| SurfaceRegister::new()),
            controls,
            engines: IndexedRegisterSet::new(&ENGINE_PROPERTIES),
            gear: IndexedRegisterSet::new(&[STEER_POS_PROPERTY]),
            max_steer_deg: Vec::new(),
            channels: Vec::new(),
            pre_functions: Vec::new(),
            post_functions: Vec::new(),
            documents: Vec::new(),
            frame: 0,
        };
        fcs.bind();
        fcs
    }

    /// Replaces the seed used for noisy sensors built by later loads.
    pub fn with_rng(mut self, rng: RngManager) -> Self {
        self.rng = rng;
        self
    }

    fn bind(&self) {
        let store = self.store.as_ref();
        for (surface, register) in Surface::ALL.iter().zip(&self.surfaces) {
            register.tie(store, surface.prefix(), surface.has_magnitude());
        }
        for (control, register) in Control::ALL.iter().zip(&self.controls) {
            register.tie(store, control.property());
        }
    }

    pub fn store(&self) -> &Arc<dyn PropertyStore> {
        &self.store
    }

    pub fn config(&self) -> &FcsConfig {
        &self.config
    }

    pub fn set_delta_t(&mut self, dt: f64) {
        self.config.time_step = dt;
    }

    /// Time step handed to components on an executed tick.
    pub fn delta_t(&self) -> f64 {
        self.config.component_dt()
    }

    /// Adds one engine and returns its index.
    pub fn add_throttle(&mut self) -> usize {
        self.engines.add_unit(self.store.as_ref(), true)
    }

    /// Adds one landing-gear unit and returns its index. `fcs/steer-pos-deg[i]`
    /// is published only when the unit can steer.
    pub fn add_gear(&mut self, max_steer_deg: f64) -> usize {
        let steerable = max_steer_deg != 0.0;
        let index = self.gear.add_unit(self.store.as_ref(), steerable);
        self.max_steer_deg.push(max_steer_deg);
        index
    }

    pub fn num_engines(&self) -> usize {
        self.engines.units()
    }

    pub fn num_gear(&self) -> usize {
        self.gear.units()
    }

    /// Assembles a document and adds its channels and functions.
    ///
    /// Nothing is added when any part of the document fails.
    pub fn load(&mut self, element: &Element, kind: SystemType) -> Result<()> {
        let assembly = self.assemble(element, kind)?;
        self.commit(assembly);
        self.documents.push((element.clone(), kind));
        Ok(())
    }

    /// Rebuilds every channel and function from the documents loaded so far.
    /// The current graph is kept if any document no longer assembles.
    pub fn reload(&mut self) -> Result<()> {
        let mut assemblies = Vec::with_capacity(self.documents.len());
        for (element, kind) in &self.documents {
            assemblies.push(self.assemble(element, *kind)?);
        }
        self.channels.clear();
        self.pre_functions.clear();
        self.post_functions.clear();
        for assembly in assemblies {
            self.commit(assembly);
        }
        info!("Reloaded {} flight-control document(s)", self.documents.len());
        Ok(())
    }

    fn assemble(&self, element: &Element, kind: SystemType) -> Result<Assembly> {
        let ctx = BuildContext::new(self.store.as_ref(), &self.rng);
        loader::assemble(element, kind, &self.config, &ctx).map_err(|err| {
            error!("Failed to load {} document: {}", kind.label(), err);
            err
        })
    }

    fn commit(&mut self, assembly: Assembly) {
        self.channels.extend(assembly.channels);
        self.pre_functions.extend(assembly.pre_functions);
        self.post_functions.extend(assembly.post_functions);
    }

    /// Runs one frame. The engine executes only on every `rate`-th frame
    /// and never while `holding`.
    pub fn run(&mut self, holding: bool) -> RunOutcome {
        if holding {
            return RunOutcome::Skipped;
        }
        let rate = u64::from(self.config.rate.max(1));
        let due = self.frame % rate == 0;
        self.frame += 1;
        if !due {
            return RunOutcome::Skipped;
        }

        for (cmd, pos) in ENGINE_PASSTHROUGH {
            self.engine(pos).copy_from(self.engine(cmd));
        }

        let steer_cmd = self.control(Control::SteerCmd);
        let steer_pos = self.gear.register(0);
        for (index, max_steer) in self.max_steer_deg.iter().enumerate() {
            steer_pos.set(index as i32, steer_cmd * max_steer);
        }

        for function in &mut self.pre_functions {
            function.evaluate();
        }
        let dt = self.config.component_dt();
        for channel in &mut self.channels {
            channel.execute(dt);
        }
        for function in &mut self.post_functions {
            function.evaluate();
        }
        RunOutcome::Executed
    }

    /// Zeroes every register and resets component state. The graph is kept.
    pub fn init_model(&mut self) {
        self.surfaces.iter().for_each(SurfaceRegister::clear);
        self.controls.iter().for_each(|register| register.set(0.0));
        self.engines.clear();
        self.gear.clear();
        self.channels.iter_mut().for_each(Channel::reset);
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn documents(&self) -> impl Iterator<Item = (&Element, SystemType)> {
        self.documents.iter().map(|(element, kind)| (element, *kind))
    }

    /// Names of every component in execution order.
    pub fn component_names(&self, delimiter: &str) -> String {
        self.channels
            .iter()
            .flat_map(|channel| channel.components())
            .map(|component| component.name().to_string())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Outputs of every component in execution order, 9 significant digits.
    pub fn component_values(&self, delimiter: &str) -> String {
        self.channels
            .iter()
            .flat_map(|channel| channel.components())
            .map(|component| format_significant(component.output(), 9))
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    // Scalar registers

    pub fn control(&self, control: Control) -> f64 {
        self.controls[control as usize].get()
    }

    pub fn set_control(&mut self, control: Control, value: f64) {
        self.controls[control as usize].set(value);
    }

    pub fn brake(&self, group: BrakeGroup) -> f64 {
        match group {
            BrakeGroup::Left => self.control(Control::LeftBrakeCmd),
            BrakeGroup::Right => self.control(Control::RightBrakeCmd),
            BrakeGroup::Center | BrakeGroup::Nose | BrakeGroup::Tail => {
                self.control(Control::CenterBrakeCmd)
            }
            BrakeGroup::None => 0.0,
        }
    }

    // Surface registers

    pub fn surface(&self, surface: Surface, form: OutputForm) -> f64 {
        self.surfaces[surface as usize].get(form)
    }

    pub fn set_surface(&mut self, surface: Surface, form: SetForm, value: f64) {
        self.surfaces[surface as usize].set(form, value);
    }

    pub fn set_surface_angle(&mut self, surface: Surface, angle: Angle) {
        self.surfaces[surface as usize].set_angle(angle);
    }

    // Engine registers

    pub fn engine(&self, register: EngineRegister) -> &IndexedRegister {
        self.engines.register(register as usize)
    }

    pub fn throttle_cmd(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::ThrottleCmd).get(engine)
    }

    pub fn set_throttle_cmd(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::ThrottleCmd).set(engine, value);
    }

    pub fn throttle_pos(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::ThrottlePos).get(engine)
    }

    pub fn set_throttle_pos(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::ThrottlePos).set(engine, value);
    }

    pub fn mixture_cmd(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::MixtureCmd).get(engine)
    }

    pub fn set_mixture_cmd(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::MixtureCmd).set(engine, value);
    }

    pub fn mixture_pos(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::MixturePos).get(engine)
    }

    pub fn set_mixture_pos(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::MixturePos).set(engine, value);
    }

    pub fn advance_cmd(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::AdvanceCmd).get(engine)
    }

    pub fn set_advance_cmd(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::AdvanceCmd).set(engine, value);
    }

    pub fn advance_pos(&self, engine: i32) -> f64 {
        self.engine(EngineRegister::AdvancePos).get(engine)
    }

    pub fn set_advance_pos(&mut self, engine: i32, value: f64) {
        self.engine(EngineRegister::AdvancePos).set(engine, value);
    }

    pub fn feather_cmd(&self, engine: i32) -> bool {
        self.engine(EngineRegister::FeatherCmd).get(engine) != 0.0
    }

    pub fn set_feather_cmd(&mut self, engine: i32, feather: bool) {
        self.engine(EngineRegister::FeatherCmd)
            .set(engine, if feather { 1.0 } else { 0.0 });
    }

    pub fn feather_pos(&self, engine: i32) -> bool {
        self.engine(EngineRegister::FeatherPos).get(engine) != 0.0
    }

    pub fn set_feather_pos(&mut self, engine: i32, feather: bool) {
        self.engine(EngineRegister::FeatherPos)
            .set(engine, if feather { 1.0 } else { 0.0 });
    }

    // Gear registers

    pub fn steer_pos_deg(&self, gear: i32) -> f64 {
        self.gear.register(0).get(gear)
    }

    pub fn set_steer_pos_deg(&mut self, gear: i32, value: f64) {
        self.gear.register(0).set(gear, value);
    }
}

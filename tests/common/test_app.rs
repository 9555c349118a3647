use bevy::prelude::*;
use flyer_fcs::{
    document::Element,
    fcs::{FlightControlSystem, SystemType},
    plugins::FlightControlPlugin,
    properties::{PropertyManager, PropertyStore},
    resources::FcsConfig,
    systems::{FcsHold, FcsStatus},
};

// Builder for creating a test application with customizable configuration
pub struct TestAppBuilder {
    config: FcsConfig,
    documents: Vec<(Element, SystemType)>,
    engines: usize,
    gear: Vec<f64>,
    seed: u64,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            config: FcsConfig::default(),
            documents: Vec::new(),
            engines: 0,
            gear: Vec::new(),
            seed: 0,
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: FcsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rate(mut self, rate: u32) -> Self {
        self.config.rate = rate;
        self
    }

    pub fn with_document(mut self, element: Element, kind: SystemType) -> Self {
        self.documents.push((element, kind));
        self
    }

    pub fn with_engines(mut self, engines: usize) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_gear(mut self, max_steer_deg: f64) -> Self {
        self.gear.push(max_steer_deg);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> TestApp {
        let properties = PropertyManager::new();
        let mut app = App::new();
        app.insert_resource(properties.clone());

        let mut plugin = FlightControlPlugin::with_config(self.config).with_seed(self.seed);
        plugin.documents = self.documents;
        app.add_plugins(plugin);

        {
            let mut fcs = app.world_mut().resource_mut::<FlightControlSystem>();
            for _ in 0..self.engines {
                fcs.add_throttle();
            }
            for max_steer in self.gear {
                fcs.add_gear(max_steer);
            }
        }

        TestApp { app, properties }
    }
}

/// Main test application wrapper
pub struct TestApp {
    pub app: App,
    pub properties: PropertyManager,
}

impl TestApp {
    /// Runs one fixed step of the flight-control schedule.
    pub fn run_frame(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.run_frame();
        }
    }

    pub fn set_hold(&mut self, hold: bool) {
        self.app.world_mut().resource_mut::<FcsHold>().0 = hold;
    }

    pub fn status(&self) -> FcsStatus {
        *self.app.world().resource::<FcsStatus>()
    }

    pub fn fcs(&self) -> &FlightControlSystem {
        self.app.world().resource::<FlightControlSystem>()
    }

    pub fn fcs_mut(&mut self) -> Mut<FlightControlSystem> {
        self.app.world_mut().resource_mut::<FlightControlSystem>()
    }

    pub fn property(&self, path: &str) -> f64 {
        self.properties.get_double(path)
    }

    pub fn set_property(&self, path: &str, value: f64) {
        self.properties.set_double(path, value);
    }
}

use bevy::prelude::*;
use std::sync::Arc;

use crate::document::Element;
use crate::fcs::{FlightControlSystem, SystemType};
use crate::properties::{PropertyManager, PropertyStore};
use crate::resources::config::FcsConfig;
use crate::systems::{flight_control_system, FcsHold, FcsStatus};
use crate::utils::RngManager;

/// Flight-control stages within the fixed step
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum FcsSet {
    Run,
}

/// Installs the flight-control engine as a fixed-step system.
///
/// The engine shares the `PropertyManager` resource's tree; if the app has
/// none yet, a fresh one is inserted.
#[derive(Default)]
pub struct FlightControlPlugin {
    pub config: FcsConfig,
    pub seed: u64,
    pub documents: Vec<(Element, SystemType)>,
}

impl FlightControlPlugin {
    pub fn with_config(config: FcsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_document(mut self, element: Element, kind: SystemType) -> Self {
        self.documents.push((element, kind));
        self
    }
}

impl Plugin for FlightControlPlugin {
    fn build(&self, app: &mut App) {
        let properties = match app.world().get_resource::<PropertyManager>() {
            Some(properties) => properties.clone(),
            None => {
                let properties = PropertyManager::new();
                app.insert_resource(properties.clone());
                properties
            }
        };
        let store: Arc<dyn PropertyStore> = Arc::new(properties);

        let mut fcs = FlightControlSystem::new(store, self.config.clone())
            .with_rng(RngManager::new(self.seed));
        for (element, kind) in &self.documents {
            if let Err(err) = fcs.load(element, *kind) {
                warn!(
                    "Skipping {} document {}: {}",
                    kind.label(),
                    element.describe(),
                    err
                );
            }
        }

        app.insert_resource(self.config.clone())
            .insert_resource(fcs)
            .init_resource::<FcsHold>()
            .init_resource::<FcsStatus>();

        app.insert_resource(Time::<Fixed>::from_seconds(self.config.time_step));

        app.configure_sets(FixedUpdate, FcsSet::Run);
        app.add_systems(FixedUpdate, flight_control_system.in_set(FcsSet::Run));
    }
}

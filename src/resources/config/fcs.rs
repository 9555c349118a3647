use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resources::errors::Result;

/// Settings for the flight-control engine and its document search paths.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FcsConfig {
    /// Frame time step in seconds.
    pub time_step: f64,
    /// The engine executes once every `rate` frames.
    pub rate: u32,
    /// Shared systems library searched for `file=` references.
    pub systems_path: PathBuf,
    /// Aircraft root directory; may contain a `Systems/` subdirectory.
    pub aircraft_path: PathBuf,
    /// Extension appended to document file names that lack one.
    pub document_extension: String,
}

impl Default for FcsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 120.0,
            rate: 1,
            systems_path: default_systems_path(),
            aircraft_path: PathBuf::from("."),
            document_extension: "yaml".to_string(),
        }
    }
}

impl FcsConfig {
    pub fn new(aircraft_path: impl Into<PathBuf>, systems_path: impl Into<PathBuf>) -> Self {
        Self {
            aircraft_path: aircraft_path.into(),
            systems_path: systems_path.into(),
            ..Default::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&file_contents)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Effective component time step, accounting for the rate divider.
    pub fn component_dt(&self) -> f64 {
        self.time_step * self.rate.max(1) as f64
    }
}

fn default_systems_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("flyer").join("systems"))
        .unwrap_or_else(|| PathBuf::from("systems"))
}

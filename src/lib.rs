//! Configurable flight-control execution engine.
//!
//! Flight-control, autopilot and system documents describe channels of
//! signal-processing components wired together through a shared property
//! tree. [`fcs::FlightControlSystem`] assembles them and executes every
//! channel once per frame; [`plugins::FlightControlPlugin`] runs it inside a
//! bevy app.

pub mod components;
pub mod document;
pub mod fcs;
pub mod functions;
pub mod plugins;
pub mod properties;
pub mod resources;
pub mod systems;
pub mod utils;

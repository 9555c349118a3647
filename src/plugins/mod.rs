mod fcs;

pub use fcs::{FcsSet, FlightControlPlugin};

mod fcs;

pub use fcs::{flight_control_system, FcsHold, FcsStatus};

pub mod fcs;

pub use fcs::FcsConfig;

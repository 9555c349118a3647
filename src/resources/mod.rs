pub mod config;
pub mod errors;

pub use config::FcsConfig;
pub use errors::{FcsError, Result};

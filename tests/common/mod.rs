#![allow(dead_code)]

mod assertions;
mod fixtures;
mod test_app;

// Re-export
pub use assertions::{assert_property_eq, assert_registers_finite};
pub use fixtures::*;
pub use test_app::{TestApp, TestAppBuilder};

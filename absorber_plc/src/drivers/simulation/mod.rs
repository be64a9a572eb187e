//! Simulation driver module.
//!
//! This module provides an in-memory PLC for development and testing
//! without a physical controller.

mod config;
mod driver;
mod tags;

pub use config::{LinkedTagConfig, SimTagConfig, SimulationConfig};
pub use driver::SimulationTransport;
pub use tags::{TagTable, WriteRecord};

use absorber_common::transport::PlcTransport;

/// Registry name of the simulation driver.
pub const DRIVER_NAME: &str = "simulation";

/// Factory function to create a simulation transport instance.
pub fn create_driver() -> Box<dyn PlcTransport> {
    Box::new(SimulationTransport::new())
}

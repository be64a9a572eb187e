//! Transport driver implementations.
//!
//! - [`simulation`] - In-memory tag table for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `PlcTransport` trait from `absorber_common::transport`
//! 3. Register the driver in [`register_all_drivers`]

pub mod simulation;

use crate::driver_registry::TransportRegistry;

/// Register all built-in drivers into `registry`.
pub fn register_all_drivers(registry: &mut TransportRegistry) {
    registry.register(simulation::DRIVER_NAME, simulation::create_driver);
}

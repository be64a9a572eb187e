//! # Absorber PLC Library
//!
//! Endpoint transports with pluggable driver architecture.
//!
//! Drivers implement the `PlcTransport` trait defined in
//! `absorber_common::transport` and are created by name through a
//! [`TransportRegistry`].
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Transport factory registration
//! - [`drivers`] - Transport implementations
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     absorber_plc                           │
//! │  ┌──────────────────┐        ┌──────────────────────────┐  │
//! │  │ TransportRegistry│──────► │  PlcTransport            │  │
//! │  │ (name → factory) │ create │  (trait object)          │  │
//! │  └──────────────────┘        └────────────┬─────────────┘  │
//! │                                           │                │
//! │                              ┌────────────▼─────────────┐  │
//! │                              │ SimulationTransport      │  │
//! │                              │ (in-memory tag table)    │  │
//! │                              └──────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::driver_registry::TransportRegistry;
pub use crate::drivers::simulation::{SimulationConfig, SimulationTransport, WriteRecord};

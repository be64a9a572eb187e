//! # Absorber
//!
//! Facade device for one vacuum absorber on a beamline PLC.
//!
//! - [`alarm`]: four read-only water-flow alarm mirrors
//! - [`status`]: `InsertedStatus`, derived from the two PLC state flags
//! - [`actuation`]: `Insert` / `Extract` with a clear-then-assert interlock
//! - [`device`]: the [`Absorber`] facade exposing named attributes
//!
//! All PLC traffic goes through one [`binding::EndpointBinding`] built on
//! a [`PlcTransport`](absorber_common::transport::PlcTransport).
//!
//! ```no_run
//! use absorber::Absorber;
//! use absorber_common::prelude::*;
//! use absorber_plc::TransportRegistry;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AbsorberConfig::load_validated(Path::new("absorber.toml"))?;
//! let transport = TransportRegistry::with_builtin().create_transport(&config.transport)?;
//! let absorber = Absorber::new(&config, Arc::from(transport))?;
//! absorber.insert()?;
//! # Ok(())
//! # }
//! ```

pub mod actuation;
pub mod alarm;
pub mod binding;
pub mod device;
pub mod status;

pub use actuation::{ActuationError, ActuationStep, Command, CommandOutcome};
pub use alarm::{AlarmFlags, AlarmSummary};
pub use device::{Absorber, Attribute, AttributeError, AttributeValue, DeviceState};
pub use status::{DerivedStatus, inserted_status};

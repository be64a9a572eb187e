//! Simulation transport implementation.
//!
//! The `SimulationTransport` implements the `PlcTransport` trait on top of
//! an in-memory [`TagTable`] for development and testing without a PLC.

use absorber_common::endpoint::{EndpointSample, EndpointTarget, Quality};
use absorber_common::transport::{PlcTransport, TransportConfig, TransportError};
use parking_lot::Mutex;
use std::time::Instant;
use tracing::info;

use super::config::SimulationConfig;
use super::tags::{TagTable, WriteRecord};
use super::DRIVER_NAME;

/// Simulation transport implementing the PlcTransport trait.
pub struct SimulationTransport {
    /// Driver version
    version: &'static str,
    /// Initialized flag
    initialized: bool,
    /// Simulated PLC
    table: Mutex<TagTable>,
}

impl SimulationTransport {
    /// Create an uninitialized transport; `init()` loads the tag table.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            initialized: false,
            table: Mutex::new(TagTable::new(&SimulationConfig::default())),
        }
    }

    /// Create an initialized transport directly from its section.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            initialized: true,
            table: Mutex::new(TagTable::new(config)),
        }
    }

    fn ensure_initialized(&self) -> Result<(), TransportError> {
        if self.initialized {
            Ok(())
        } else {
            Err(TransportError::Unreachable(
                "simulation transport not initialized".to_string(),
            ))
        }
    }

    /// Force a tag value (external change of the PLC).
    pub fn set_value(&self, target: &EndpointTarget, value: bool) {
        self.table.lock().set_value(target, value);
    }

    /// Take a tag offline or bring it back.
    pub fn set_reachable(&self, target: &EndpointTarget, reachable: bool) {
        self.table.lock().set_reachable(target, reachable);
    }

    /// Make a tag refuse (or accept again) every write.
    pub fn set_refuse_writes(&self, target: &EndpointTarget, refuse: bool) {
        self.table.lock().set_refuse_writes(target, refuse);
    }

    /// Change the quality reported for a tag.
    pub fn set_quality(&self, target: &EndpointTarget, quality: Quality) {
        self.table.lock().set_quality(target, quality);
    }

    /// Current tag value, ignoring reachability.
    pub fn peek(&self, target: &EndpointTarget) -> Option<bool> {
        self.table.lock().peek(target)
    }

    /// Copy of the write journal, oldest first.
    pub fn journal(&self) -> Vec<WriteRecord> {
        self.table.lock().journal().to_vec()
    }

    /// Forget all journaled writes.
    pub fn clear_journal(&self) {
        self.table.lock().clear_journal();
    }
}

impl Default for SimulationTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl PlcTransport for SimulationTransport {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &TransportConfig) -> Result<(), TransportError> {
        let section: SimulationConfig = config.driver_section(DRIVER_NAME)?;
        info!(
            "Simulation transport: {} tags, {} linked reactions, auto_create={}",
            section.tags.len(),
            section.links.len(),
            section.auto_create
        );
        self.table = Mutex::new(TagTable::new(&section));
        self.initialized = true;
        Ok(())
    }

    fn read(&self, target: &EndpointTarget) -> Result<EndpointSample, TransportError> {
        self.ensure_initialized()?;
        self.table.lock().read(target, Instant::now())
    }

    fn write(&self, target: &EndpointTarget, value: bool) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        self.table.lock().write(target, value, Instant::now())
    }
}

//! Driver registry for PLC transports.
//!
//! Provides a `TransportRegistry` struct for registering transport factories
//! and creating initialized transports by name. Constructor-injected, no
//! global state.

use absorber_common::transport::{PlcTransport, TransportConfig, TransportError, TransportFactory};
use std::collections::HashMap;
use tracing::info;

use crate::drivers::register_all_drivers;

/// Registry of available transport drivers.
pub struct TransportRegistry {
    factories: HashMap<&'static str, TransportFactory>,
}

impl TransportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in driver.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        register_all_drivers(&mut registry);
        registry
    }

    /// Register a transport factory.
    ///
    /// # Panics
    /// Panics if a driver with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: TransportFactory) {
        if self.factories.contains_key(name) {
            panic!("Driver '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a transport factory by name.
    pub fn get_factory(&self, name: &str) -> Option<TransportFactory> {
        self.factories.get(name).copied()
    }

    /// Create and initialize the transport named by `config.driver`.
    ///
    /// # Errors
    /// Returns `TransportError::DriverNotFound` if no driver with that name
    /// is registered, or the driver's own error if `init()` fails.
    pub fn create_transport(
        &self,
        config: &TransportConfig,
    ) -> Result<Box<dyn PlcTransport>, TransportError> {
        let factory = self
            .get_factory(&config.driver)
            .ok_or_else(|| TransportError::DriverNotFound(config.driver.clone()))?;
        let mut transport = factory();
        transport.init(config)?;
        info!(
            "Created transport: {} v{}",
            transport.name(),
            transport.version()
        );
        Ok(transport)
    }

    /// List all registered driver names.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! PLC transport trait and error types.
//!
//! This module defines:
//! - `PlcTransport` trait - Interface for pluggable endpoint transports
//! - `TransportError` enum - Error types for transport operations
//! - `TransportFactory` type alias - Factory function type
//! - `TransportConfig` struct - The `[transport]` table of `absorber.toml`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::consts::DEFAULT_DRIVER;
use crate::endpoint::{EndpointSample, EndpointTarget};

/// Error types for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Driver configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Endpoint cannot be reached
    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    /// Endpoint refused the operation
    #[error("Refused: {0}")]
    Refused(String),
}

/// Factory function type for creating transport instances.
pub type TransportFactory = fn() -> Box<dyn PlcTransport>;

/// Trait defining the interface for endpoint transports.
///
/// The facade reaches every remote tag through this trait, so connection
/// management, polling and the wire protocol stay behind it.
///
/// # Lifecycle
///
/// 1. `init()` - Called once, before the transport is shared
/// 2. `read()` / `write()` - Called from any thread afterwards
///
/// Neither `read()` nor `write()` retries; a timeout, if the transport has
/// one, surfaces as `TransportError::Unreachable`.
pub trait PlcTransport: Send + Sync {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver from its `[transport.driver_config.<name>]` table.
    ///
    /// # Errors
    /// Return `TransportError::InitFailed` or `TransportError::ConfigError`
    /// if the driver cannot start.
    fn init(&mut self, config: &TransportConfig) -> Result<(), TransportError>;

    /// Read the current value, timestamp and quality of `target`.
    fn read(&self, target: &EndpointTarget) -> Result<EndpointSample, TransportError>;

    /// Push `value` to `target`. `Ok` means the endpoint acknowledged it.
    fn write(&self, target: &EndpointTarget, value: bool) -> Result<(), TransportError>;
}

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

/// The `[transport]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Driver to load.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Per-driver configuration sections.
    /// Key = driver name, Value = driver-specific TOML table.
    #[serde(default)]
    pub driver_config: HashMap<String, toml::Value>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            driver_config: HashMap::new(),
        }
    }
}

impl TransportConfig {
    /// Deserialize the section for `driver`, or `T::default()` if absent.
    ///
    /// # Errors
    /// Returns `TransportError::ConfigError` if the section does not match `T`.
    pub fn driver_section<T>(&self, driver: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Default,
    {
        match self.driver_config.get(driver) {
            Some(value) => value.clone().try_into().map_err(|e| {
                TransportError::ConfigError(format!("[transport.driver_config.{driver}]: {e}"))
            }),
            None => Ok(T::default()),
        }
    }
}

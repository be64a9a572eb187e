//! Absorber-wide constants.

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/absorber/absorber.toml";

/// Transport driver used when the config names none.
pub const DEFAULT_DRIVER: &str = "simulation";

/// Prefix carried by the property names of the original device class.
/// Accepted on input, never produced.
pub const LEGACY_PROPERTY_PREFIX: &str = "PlcAttrName_";

/// Status string reported once the device is constructed.
pub const STATUS_RUNNING: &str = "Device is running";

/// Default polling period of the `monitor` command [ms].
pub const DEFAULT_MONITOR_INTERVAL_MS: u64 = 1000;

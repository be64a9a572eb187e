//! Prelude module for common re-exports.
//!
//! ```rust
//! use absorber_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{AbsorberConfig, ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Endpoints ──────────────────────────────────────────────────────
pub use crate::endpoint::{
    AccessMode, EndpointError, EndpointKind, EndpointOption, EndpointProperties, EndpointRef,
    EndpointSample, EndpointTarget, NameResolver, Quality, RejectCause,
};

// ─── Transport ──────────────────────────────────────────────────────
pub use crate::transport::{PlcTransport, TransportConfig, TransportError, TransportFactory};

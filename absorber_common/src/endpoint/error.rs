//! Endpoint-level error types.

use core::fmt;
use thiserror::Error;

use super::target::EndpointTarget;

/// Why a write did not reach the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectCause {
    /// The endpoint is configured read-only.
    ReadOnly,
    /// The transport could not reach the endpoint.
    Unreachable(String),
    /// The endpoint refused the value.
    Refused(String),
}

impl fmt::Display for RejectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "endpoint is read-only"),
            Self::Unreachable(reason) => write!(f, "endpoint unreachable: {reason}"),
            Self::Refused(reason) => write!(f, "endpoint refused the value: {reason}"),
        }
    }
}

/// Errors raised by endpoint resolution, reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Missing or invalid endpoint mapping. Fatal at startup.
    #[error("Configuration error for {name}: {reason}")]
    Configuration { name: String, reason: String },

    /// The remote target cannot currently be reached.
    #[error("Endpoint {target} unreachable: {reason}")]
    Unreachable {
        target: EndpointTarget,
        reason: String,
    },

    /// The write did not commit.
    #[error("Write of {value} to {target} rejected: {cause}")]
    WriteRejected {
        target: EndpointTarget,
        value: bool,
        cause: RejectCause,
    },
}

impl EndpointError {
    /// Shorthand for a configuration error.
    pub fn configuration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_target_and_cause() {
        let target: EndpointTarget = "plc/FSW_1".parse().unwrap();
        let err = EndpointError::WriteRejected {
            target,
            value: true,
            cause: RejectCause::ReadOnly,
        };
        let msg = err.to_string();
        assert!(msg.contains("plc/FSW_1"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn configuration_shorthand() {
        let err = EndpointError::configuration("InsertAttribute", "not configured");
        assert!(matches!(err, EndpointError::Configuration { ref name, .. } if name == "InsertAttribute"));
        assert!(err.to_string().contains("not configured"));
    }
}

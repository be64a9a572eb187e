//! Endpoint vocabulary shared by the facade and the transport drivers.
//!
//! An endpoint is a remote boolean PLC tag. The facade never holds a
//! connection to it; it holds an [`EndpointRef`] (option + resolved target)
//! and exchanges [`EndpointSample`] values through a transport.

pub mod error;
pub mod option;
pub mod properties;
pub mod sample;
pub mod target;

pub use error::{EndpointError, RejectCause};
pub use option::{AccessMode, EndpointKind, EndpointOption};
pub use properties::{EndpointProperties, NameResolver};
pub use sample::{EndpointSample, Quality};
pub use target::EndpointTarget;

/// Handle to one configured endpoint. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    option: EndpointOption,
    target: EndpointTarget,
}

impl EndpointRef {
    pub fn new(option: EndpointOption, target: EndpointTarget) -> Self {
        Self { option, target }
    }

    /// Parse `target` and bind it to `option`.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Configuration` if `target` is not a valid
    /// `device/attribute` address.
    pub fn parse(option: EndpointOption, target: &str) -> Result<Self, EndpointError> {
        let target = target
            .parse()
            .map_err(|reason: String| EndpointError::configuration(option.property_name(), reason))?;
        Ok(Self::new(option, target))
    }

    /// Symbolic name, e.g. `"InsertAttribute"`.
    pub fn name(&self) -> &'static str {
        self.option.property_name()
    }

    pub fn option(&self) -> EndpointOption {
        self.option
    }

    pub fn target(&self) -> &EndpointTarget {
        &self.target
    }

    pub fn access(&self) -> AccessMode {
        self.option.access()
    }
}

impl core::fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} -> {}", self.name(), self.target)
    }
}

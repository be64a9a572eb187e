//! Simulation driver configuration.
//!
//! Parsed from `[transport.driver_config.simulation]`:
//!
//! ```toml
//! [transport.driver_config.simulation]
//! tags = [
//!     { target = "plc/Insert" },
//!     { target = "plc/Inserted", init = false },
//!     { target = "plc/FSW_1", quality = "uncertain" },
//! ]
//! links = [
//!     { source = "plc/Insert", value = true, target = "plc/Inserted", set = true, delay_ms = 2000 },
//! ]
//! ```

use absorber_common::endpoint::{EndpointTarget, Quality};
use serde::{Deserialize, Serialize};

/// One simulated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimTagConfig {
    /// Address of the tag.
    pub target: EndpointTarget,
    /// Initial value. Default: false.
    #[serde(default)]
    pub init: bool,
    /// Initial quality. Default: good.
    #[serde(default)]
    pub quality: Quality,
}

/// Linked reaction: when `source` changes to `value`, `target` becomes
/// `set` after `delay_ms`.
///
/// Models the mechanism answering an actuation command through its
/// state tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkedTagConfig {
    /// Tag whose change triggers the reaction.
    pub source: EndpointTarget,
    /// Edge direction that triggers.
    pub value: bool,
    /// Tag changed by the reaction.
    pub target: EndpointTarget,
    /// New value of `target`.
    pub set: bool,
    /// Reaction delay [ms]. Default: 0 (applied with the write).
    #[serde(default)]
    pub delay_ms: u64,
}

/// Driver-specific section of the transport configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Tags known to the simulated PLC. Unknown targets are unreachable.
    #[serde(default)]
    pub tags: Vec<SimTagConfig>,
    /// Linked reactions between tags.
    #[serde(default)]
    pub links: Vec<LinkedTagConfig>,
    /// Create unknown tags on first access instead of failing.
    #[serde(default)]
    pub auto_create: bool,
}

impl SimulationConfig {
    /// Add a tag with an initial value and good quality.
    pub fn with_tag(mut self, target: &EndpointTarget, init: bool) -> Self {
        self.tags.push(SimTagConfig {
            target: target.clone(),
            init,
            quality: Quality::Good,
        });
        self
    }

    /// Add a zero-delay linked reaction.
    pub fn with_link(
        mut self,
        source: &EndpointTarget,
        value: bool,
        target: &EndpointTarget,
        set: bool,
    ) -> Self {
        self.links.push(LinkedTagConfig {
            source: source.clone(),
            value,
            target: target.clone(),
            set,
            delay_ms: 0,
        });
        self
    }
}

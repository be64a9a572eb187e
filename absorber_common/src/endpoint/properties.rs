//! Endpoint properties: the `[endpoints]` table of `absorber.toml`.
//!
//! Every option is optional at parse time so that a missing option is
//! reported as a `ConfigurationError` naming the option, rather than a
//! generic TOML error.

use serde::{Deserialize, Serialize};

use super::error::EndpointError;
use super::option::EndpointOption;

/// Name-to-target lookup consulted by the endpoint binding.
pub trait NameResolver: Send + Sync {
    /// Configured target string for `option`, if any.
    fn lookup(&self, option: EndpointOption) -> Option<&str>;
}

/// The eight endpoint target options of one absorber.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointProperties {
    #[serde(rename = "AchromatFSW", alias = "PlcAttrName_AchromatFSW", default)]
    pub achromat_fsw: Option<String>,

    #[serde(rename = "FSW_1", alias = "PlcAttrName_FSW_1", default)]
    pub fsw_1: Option<String>,

    #[serde(rename = "FSW_2", alias = "PlcAttrName_FSW_2", default)]
    pub fsw_2: Option<String>,

    #[serde(rename = "FSW_3", alias = "PlcAttrName_FSW_3", default)]
    pub fsw_3: Option<String>,

    #[serde(
        rename = "InsertAttribute",
        alias = "PlcAttrName_InsertAttribute",
        default
    )]
    pub insert: Option<String>,

    #[serde(
        rename = "ExtractAttribute",
        alias = "PlcAttrName_ExtractAttribute",
        default
    )]
    pub extract: Option<String>,

    #[serde(
        rename = "StateInsertedAttribute",
        alias = "PlcAttrName_StateInsertedAttribute",
        default
    )]
    pub state_inserted: Option<String>,

    #[serde(
        rename = "StateExtractedAttribute",
        alias = "PlcAttrName_StateExtractedAttribute",
        default
    )]
    pub state_extracted: Option<String>,
}

impl EndpointProperties {
    /// Mutable slot for `option`.
    pub fn slot_mut(&mut self, option: EndpointOption) -> &mut Option<String> {
        match option {
            EndpointOption::AchromatFsw => &mut self.achromat_fsw,
            EndpointOption::Fsw1 => &mut self.fsw_1,
            EndpointOption::Fsw2 => &mut self.fsw_2,
            EndpointOption::Fsw3 => &mut self.fsw_3,
            EndpointOption::Insert => &mut self.insert,
            EndpointOption::Extract => &mut self.extract,
            EndpointOption::StateInserted => &mut self.state_inserted,
            EndpointOption::StateExtracted => &mut self.state_extracted,
        }
    }

    /// Builder-style setter, mostly for tests.
    pub fn with(mut self, option: EndpointOption, target: impl Into<String>) -> Self {
        *self.slot_mut(option) = Some(target.into());
        self
    }

    /// Options with no (or a blank) target.
    pub fn missing(&self) -> Vec<EndpointOption> {
        EndpointOption::ALL
            .into_iter()
            .filter(|option| self.lookup(*option).is_none())
            .collect()
    }

    /// Check that every option has a target.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Configuration` listing every missing option.
    pub fn validate(&self) -> Result<(), EndpointError> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|o| o.property_name()).collect();
        Err(EndpointError::configuration(
            names.join(", "),
            "no endpoint target configured",
        ))
    }
}

impl NameResolver for EndpointProperties {
    fn lookup(&self, option: EndpointOption) -> Option<&str> {
        let slot = match option {
            EndpointOption::AchromatFsw => &self.achromat_fsw,
            EndpointOption::Fsw1 => &self.fsw_1,
            EndpointOption::Fsw2 => &self.fsw_2,
            EndpointOption::Fsw3 => &self.fsw_3,
            EndpointOption::Insert => &self.insert,
            EndpointOption::Extract => &self.extract,
            EndpointOption::StateInserted => &self.state_inserted,
            EndpointOption::StateExtracted => &self.state_extracted,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

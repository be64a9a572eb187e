//! Absorber facade device.
//!
//! Ties the endpoint binding, the four alarm mirrors, the derived status
//! and the actuation coordinator together behind named attributes and the
//! `Insert` / `Extract` commands.

use absorber_common::config::AbsorberConfig;
use absorber_common::consts::STATUS_RUNNING;
use absorber_common::endpoint::{
    EndpointError, EndpointKind, EndpointOption, EndpointProperties, EndpointRef, EndpointSample,
    Quality,
};
use absorber_common::transport::PlcTransport;
use core::fmt;
use core::str::FromStr;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{info, warn};

use crate::actuation::{ActuationCoordinator, ActuationError, Command, CommandOutcome};
use crate::alarm::{AlarmMirrors, AlarmSummary};
use crate::binding::EndpointBinding;
use crate::status::StatusDeriver;

// ─── Attribute ──────────────────────────────────────────────────────

/// Attributes exposed by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    WaterFlowAlarmAchromat,
    WaterFlowAlarm1,
    WaterFlowAlarm2,
    WaterFlowAlarm3,
    InsertedStatus,
    PlcAttrNameInsert,
    PlcAttrNameExtract,
    PlcAttrNameStateInserted,
    PlcAttrNameStateExtracted,
}

impl Attribute {
    pub const ALL: [Self; 9] = [
        Self::WaterFlowAlarmAchromat,
        Self::WaterFlowAlarm1,
        Self::WaterFlowAlarm2,
        Self::WaterFlowAlarm3,
        Self::InsertedStatus,
        Self::PlcAttrNameInsert,
        Self::PlcAttrNameExtract,
        Self::PlcAttrNameStateInserted,
        Self::PlcAttrNameStateExtracted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::WaterFlowAlarmAchromat => "waterFlowAlarm_Achromat",
            Self::WaterFlowAlarm1 => "waterFlowAlarm_1",
            Self::WaterFlowAlarm2 => "waterFlowAlarm_2",
            Self::WaterFlowAlarm3 => "waterFlowAlarm_3",
            Self::InsertedStatus => "InsertedStatus",
            Self::PlcAttrNameInsert => "PlcAttrName_Insert",
            Self::PlcAttrNameExtract => "PlcAttrName_Extract",
            Self::PlcAttrNameStateInserted => "PlcAttrName_StateInserted",
            Self::PlcAttrNameStateExtracted => "PlcAttrName_StateExtracted",
        }
    }

    /// Backing endpoint option; `None` for the derived status.
    pub fn option(self) -> Option<EndpointOption> {
        match self {
            Self::WaterFlowAlarmAchromat => Some(EndpointOption::AchromatFsw),
            Self::WaterFlowAlarm1 => Some(EndpointOption::Fsw1),
            Self::WaterFlowAlarm2 => Some(EndpointOption::Fsw2),
            Self::WaterFlowAlarm3 => Some(EndpointOption::Fsw3),
            Self::InsertedStatus => None,
            Self::PlcAttrNameInsert => Some(EndpointOption::Insert),
            Self::PlcAttrNameExtract => Some(EndpointOption::Extract),
            Self::PlcAttrNameStateInserted => Some(EndpointOption::StateInserted),
            Self::PlcAttrNameStateExtracted => Some(EndpointOption::StateExtracted),
        }
    }

    pub fn is_writable(self) -> bool {
        self.option().is_some_and(|o| o.access().is_writable())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "InExStatus" {
            return Ok(Self::InsertedStatus);
        }
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown attribute: {s:?}"))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── AttributeValue ─────────────────────────────────────────────────

/// Value of an attribute read. Never fails: an unreadable attribute comes
/// back with its stale value (or none) and `Bad` quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    pub value: Option<bool>,
    pub quality: Quality,
    pub timestamp: Option<SystemTime>,
}

impl AttributeValue {
    /// No value has ever been read.
    pub fn invalid() -> Self {
        Self {
            value: None,
            quality: Quality::Bad,
            timestamp: None,
        }
    }
}

impl From<EndpointSample> for AttributeValue {
    fn from(sample: EndpointSample) -> Self {
        Self {
            value: Some(sample.value),
            quality: sample.quality,
            timestamp: Some(sample.timestamp),
        }
    }
}

// ─── Errors / state ─────────────────────────────────────────────────

/// Attribute write failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("Attribute {0} is read-only")]
    ReadOnly(&'static str),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Actuation(#[from] ActuationError),
}

/// Device state as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceState {
    On,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
        }
    }
}

// ─── Absorber ───────────────────────────────────────────────────────

/// One vacuum absorber.
pub struct Absorber {
    name: String,
    binding: Arc<EndpointBinding>,
    alarms: AlarmMirrors,
    status: StatusDeriver,
    actuation: ActuationCoordinator,
}

impl Absorber {
    /// Build the device from its configuration.
    ///
    /// # Errors
    ///
    /// `EndpointError::Configuration` if any endpoint option is missing or
    /// malformed.
    pub fn new(
        config: &AbsorberConfig,
        transport: Arc<dyn PlcTransport>,
    ) -> Result<Self, EndpointError> {
        Self::with_properties(
            &config.shared.service_name,
            config.endpoints.clone(),
            transport,
        )
    }

    pub fn with_properties(
        name: &str,
        properties: EndpointProperties,
        transport: Arc<dyn PlcTransport>,
    ) -> Result<Self, EndpointError> {
        properties.validate()?;
        let binding = Arc::new(EndpointBinding::new(Box::new(properties), transport));
        let alarms = AlarmMirrors::resolve(&binding)?;
        let status = StatusDeriver::resolve(Arc::clone(&binding))?;
        let actuation = ActuationCoordinator::resolve(Arc::clone(&binding))?;

        info!("Absorber {} initialized", name);
        for option in EndpointOption::ALL {
            if let Some(endpoint) = Self::lookup(&alarms, &status, &actuation, option) {
                info!("  {} ({})", endpoint, endpoint.access());
            }
        }

        Ok(Self {
            name: name.to_string(),
            binding,
            alarms,
            status,
            actuation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::On
    }

    pub fn status(&self) -> &'static str {
        STATUS_RUNNING
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Clear Extract-tag, then assert Insert-tag.
    pub fn insert(&self) -> CommandOutcome {
        self.actuation.insert()
    }

    /// Clear Insert-tag, then assert Extract-tag.
    pub fn extract(&self) -> CommandOutcome {
        self.actuation.extract()
    }

    pub fn execute(&self, command: Command) -> CommandOutcome {
        self.actuation.execute(command)
    }

    // ── Attributes ──────────────────────────────────────────────────

    pub fn read_attribute(&self, attribute: Attribute) -> AttributeValue {
        let result = match attribute.option() {
            None => self.status.derive().map(EndpointSample::from),
            Some(option) => match self.endpoint(option) {
                Some(endpoint) => self.binding.read_or_degraded(&endpoint),
                None => return AttributeValue::invalid(),
            },
        };
        match result {
            Ok(sample) => sample.into(),
            Err(e) => {
                warn!("{} unreadable: {}", attribute, e);
                AttributeValue::invalid()
            }
        }
    }

    /// Read every attribute, in declaration order.
    pub fn read_attributes(&self) -> Vec<(Attribute, AttributeValue)> {
        Attribute::ALL
            .into_iter()
            .map(|a| (a, self.read_attribute(a)))
            .collect()
    }

    /// Write a pass-through attribute.
    ///
    /// Actuation tags go through the coordinator: writing `true` runs the
    /// matching command, writing `false` only releases that tag.
    ///
    /// # Errors
    ///
    /// `AttributeError::ReadOnly` for the derived status, the endpoint's
    /// `WriteRejected` for read-only endpoints, or the command's error.
    pub fn write_attribute(&self, attribute: Attribute, value: bool) -> Result<(), AttributeError> {
        let option = attribute
            .option()
            .ok_or(AttributeError::ReadOnly(attribute.name()))?;
        match Command::asserting(option) {
            Some(command) if value => self.actuation.execute(command)?,
            Some(command) => self.actuation.release(command)?,
            None => {
                let endpoint = self
                    .endpoint(option)
                    .ok_or(AttributeError::ReadOnly(attribute.name()))?;
                self.binding.write(&endpoint, value)?;
            }
        }
        Ok(())
    }

    pub fn alarm_summary(&self) -> AlarmSummary {
        self.alarms.summary()
    }

    // ── Endpoint names ──────────────────────────────────────────────

    /// Current endpoint handle for any option.
    pub fn endpoint(&self, option: EndpointOption) -> Option<EndpointRef> {
        Self::lookup(&self.alarms, &self.status, &self.actuation, option)
    }

    /// Current target of `option`, as `device/attribute`.
    pub fn endpoint_target(&self, option: EndpointOption) -> Option<String> {
        self.endpoint(option).map(|e| e.target().to_string())
    }

    fn lookup(
        alarms: &AlarmMirrors,
        status: &StatusDeriver,
        actuation: &ActuationCoordinator,
        option: EndpointOption,
    ) -> Option<EndpointRef> {
        match option.kind() {
            EndpointKind::Alarm => alarms.get(option).map(|m| m.endpoint().clone()),
            EndpointKind::State => status.endpoint(option),
            EndpointKind::Actuation => actuation.endpoint(option),
        }
    }

    /// Point an actuation or state option at a new target.
    ///
    /// Returns the previous endpoint. Alarm mirrors are fixed at startup.
    ///
    /// # Errors
    ///
    /// `EndpointError::Configuration` for a malformed target, an alarm
    /// option, or an Insert/Extract target clash.
    pub fn repoint(&self, option: EndpointOption, target: &str) -> Result<EndpointRef, EndpointError> {
        let endpoint = EndpointRef::parse(option, target)?;
        let previous = match option.kind() {
            EndpointKind::Actuation => self.actuation.repoint(endpoint)?,
            EndpointKind::State => self.status.repoint(endpoint)?,
            EndpointKind::Alarm => {
                return Err(EndpointError::configuration(
                    option.property_name(),
                    "alarm endpoints cannot be re-pointed at runtime",
                ));
            }
        };
        info!(
            "{} re-pointed: {} -> {}",
            option,
            previous.target(),
            target.trim()
        );
        Ok(previous)
    }
}

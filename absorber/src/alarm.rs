//! Water-flow alarm mirrors.
//!
//! Four read-only pass-through mirrors of the PLC flow switches. A mirror
//! adds no semantics: it returns the binding's sample or error unchanged.
//! [`AlarmFlags`] only summarizes them for operators.

use absorber_common::endpoint::{EndpointError, EndpointOption, EndpointRef, EndpointSample};
use bitflags::bitflags;
use std::sync::Arc;

use crate::binding::EndpointBinding;

bitflags! {
    /// One bit per water-flow switch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AlarmFlags: u8 {
        const FSW_1    = 0x01;
        const FSW_2    = 0x02;
        const FSW_3    = 0x04;
        const ACHROMAT = 0x08;
    }
}

impl AlarmFlags {
    fn for_option(option: EndpointOption) -> Self {
        match option {
            EndpointOption::Fsw1 => Self::FSW_1,
            EndpointOption::Fsw2 => Self::FSW_2,
            EndpointOption::Fsw3 => Self::FSW_3,
            EndpointOption::AchromatFsw => Self::ACHROMAT,
            _ => Self::empty(),
        }
    }
}

/// Read-through mirror of one alarm endpoint.
pub struct AlarmMirror {
    endpoint: EndpointRef,
    binding: Arc<EndpointBinding>,
}

impl AlarmMirror {
    pub fn new(endpoint: EndpointRef, binding: Arc<EndpointBinding>) -> Self {
        Self { endpoint, binding }
    }

    pub fn endpoint(&self) -> &EndpointRef {
        &self.endpoint
    }

    /// Current sample, verbatim.
    pub fn read(&self) -> Result<EndpointSample, EndpointError> {
        self.binding.read(&self.endpoint)
    }
}

/// Alarm state of all four mirrors at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSummary {
    /// Switches reading `true`.
    pub active: AlarmFlags,
    /// Switches whose sample is missing or not good. Never counted as clear.
    pub unreliable: AlarmFlags,
}

impl AlarmSummary {
    /// No active alarm and every switch read with good quality.
    pub fn all_clear(&self) -> bool {
        self.active.is_empty() && self.unreliable.is_empty()
    }
}

/// The four water-flow mirrors of one absorber.
pub struct AlarmMirrors {
    mirrors: [AlarmMirror; 4],
}

impl AlarmMirrors {
    /// Resolve the four alarm options through `binding`.
    pub fn resolve(binding: &Arc<EndpointBinding>) -> Result<Self, EndpointError> {
        let mirror = |option: EndpointOption| -> Result<AlarmMirror, EndpointError> {
            let endpoint = binding.resolve(option.property_name())?;
            Ok(AlarmMirror::new(endpoint, Arc::clone(binding)))
        };
        Ok(Self {
            mirrors: [
                mirror(EndpointOption::AchromatFsw)?,
                mirror(EndpointOption::Fsw1)?,
                mirror(EndpointOption::Fsw2)?,
                mirror(EndpointOption::Fsw3)?,
            ],
        })
    }

    /// Mirror for an alarm option; `None` for non-alarm options.
    pub fn get(&self, option: EndpointOption) -> Option<&AlarmMirror> {
        self.mirrors
            .iter()
            .find(|m| m.endpoint().option() == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlarmMirror> {
        self.mirrors.iter()
    }

    /// Read every mirror and fold the results into flags.
    pub fn summary(&self) -> AlarmSummary {
        let mut summary = AlarmSummary {
            active: AlarmFlags::empty(),
            unreliable: AlarmFlags::empty(),
        };
        for mirror in self.iter() {
            let flag = AlarmFlags::for_option(mirror.endpoint().option());
            match mirror.read() {
                Ok(sample) => {
                    if sample.value {
                        summary.active |= flag;
                    }
                    if !sample.quality.is_good() {
                        summary.unreliable |= flag;
                    }
                }
                Err(_) => summary.unreliable |= flag,
            }
        }
        summary
    }
}

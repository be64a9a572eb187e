//! Derived inserted/extracted status.
//!
//! `InsertedStatus = stateInserted AND NOT stateExtracted`, recomputed on
//! every read from the two state endpoints. Both-true and both-false are
//! reported as `false`.

use absorber_common::endpoint::{
    EndpointError, EndpointOption, EndpointRef, EndpointSample, Quality,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::warn;

use crate::binding::EndpointBinding;

/// `true` only when purely inserted.
#[inline]
pub fn inserted_status(inserted: bool, extracted: bool) -> bool {
    inserted && !extracted
}

/// Result of one status derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedStatus {
    pub value: bool,
    /// Worst quality of the two inputs.
    pub quality: Quality,
    /// Newest timestamp of the two inputs.
    pub timestamp: SystemTime,
}

impl DerivedStatus {
    /// Combine two state samples.
    pub fn from_inputs(inserted: &EndpointSample, extracted: &EndpointSample) -> Self {
        Self {
            value: inserted_status(inserted.value, extracted.value),
            quality: inserted.quality.worst(extracted.quality),
            timestamp: inserted.timestamp.max(extracted.timestamp),
        }
    }
}

impl From<DerivedStatus> for EndpointSample {
    fn from(status: DerivedStatus) -> Self {
        EndpointSample::new(status.value, status.timestamp, status.quality)
    }
}

/// The two state endpoints feeding the derivation.
#[derive(Debug, Clone)]
struct StatePair {
    inserted: EndpointRef,
    extracted: EndpointRef,
}

/// Computes [`DerivedStatus`] from the state endpoints.
pub struct StatusDeriver {
    binding: Arc<EndpointBinding>,
    inputs: RwLock<StatePair>,
}

impl StatusDeriver {
    /// Resolve both state options through `binding`.
    pub fn resolve(binding: Arc<EndpointBinding>) -> Result<Self, EndpointError> {
        let inserted = binding.resolve(EndpointOption::StateInserted.property_name())?;
        let extracted = binding.resolve(EndpointOption::StateExtracted.property_name())?;
        Ok(Self {
            binding,
            inputs: RwLock::new(StatePair {
                inserted,
                extracted,
            }),
        })
    }

    /// Read both inputs and derive the status.
    ///
    /// An unreachable input contributes its stale sample with `Bad`
    /// quality, so the derived quality is degraded rather than the value
    /// silently defaulted.
    ///
    /// # Errors
    ///
    /// `EndpointError::Unreachable` if an unreachable input has never been
    /// sampled.
    pub fn derive(&self) -> Result<DerivedStatus, EndpointError> {
        let inputs = self.inputs.read().clone();
        let inserted = self.binding.read_or_degraded(&inputs.inserted)?;
        let extracted = self.binding.read_or_degraded(&inputs.extracted)?;
        let status = DerivedStatus::from_inputs(&inserted, &extracted);
        if !status.quality.is_good() {
            warn!(
                "InsertedStatus derived with {} quality (inserted={}, extracted={})",
                status.quality, inserted.quality, extracted.quality
            );
        }
        Ok(status)
    }

    /// Current endpoint for a state option.
    pub fn endpoint(&self, option: EndpointOption) -> Option<EndpointRef> {
        let inputs = self.inputs.read();
        match option {
            EndpointOption::StateInserted => Some(inputs.inserted.clone()),
            EndpointOption::StateExtracted => Some(inputs.extracted.clone()),
            _ => None,
        }
    }

    /// Swap the endpoint of a state option; returns the previous one.
    ///
    /// # Errors
    ///
    /// `EndpointError::Configuration` if `endpoint` is not a state option.
    pub fn repoint(&self, endpoint: EndpointRef) -> Result<EndpointRef, EndpointError> {
        let mut guard = self.inputs.write();
        let inputs = &mut *guard;
        let slot = match endpoint.option() {
            EndpointOption::StateInserted => &mut inputs.inserted,
            EndpointOption::StateExtracted => &mut inputs.extracted,
            other => {
                return Err(EndpointError::configuration(
                    other.property_name(),
                    "not a state endpoint",
                ));
            }
        };
        Ok(std::mem::replace(slot, endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use absorber_common::endpoint::{EndpointProperties, EndpointTarget};
    use absorber_plc::{SimulationConfig, SimulationTransport};
    use std::time::Duration;

    fn t(s: &str) -> EndpointTarget {
        s.parse().unwrap()
    }

    fn setup(inserted: bool, extracted: bool) -> (Arc<SimulationTransport>, StatusDeriver) {
        let props = EndpointProperties::default()
            .with(EndpointOption::StateInserted, "plc/Inserted")
            .with(EndpointOption::StateExtracted, "plc/Extracted");
        let sim = Arc::new(SimulationTransport::from_config(
            &SimulationConfig::default()
                .with_tag(&t("plc/Inserted"), inserted)
                .with_tag(&t("plc/Extracted"), extracted)
                .with_tag(&t("plc/Inserted2"), true),
        ));
        let binding = Arc::new(EndpointBinding::new(Box::new(props), sim.clone()));
        (sim, StatusDeriver::resolve(binding).unwrap())
    }

    #[test]
    fn truth_table() {
        assert!(!inserted_status(false, false));
        assert!(!inserted_status(false, true));
        assert!(inserted_status(true, false));
        assert!(!inserted_status(true, true));
    }

    #[test]
    fn derive_matches_truth_table_for_all_pairs() {
        for (ins, exs) in [(false, false), (false, true), (true, false), (true, true)] {
            let (_, deriver) = setup(ins, exs);
            let status = deriver.derive().unwrap();
            assert_eq!(status.value, ins && !exs, "ins={ins} exs={exs}");
            assert_eq!(status.quality, Quality::Good);
        }
    }

    #[test]
    fn from_inputs_takes_worst_quality_and_newest_timestamp() {
        let older = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let newer = SystemTime::UNIX_EPOCH + Duration::from_secs(20);
        let ins = EndpointSample::new(true, older, Quality::Uncertain);
        let exs = EndpointSample::new(false, newer, Quality::Good);
        let status = DerivedStatus::from_inputs(&ins, &exs);
        assert!(status.value);
        assert_eq!(status.quality, Quality::Uncertain);
        assert_eq!(status.timestamp, newer);
    }

    #[test]
    fn bad_input_degrades_derived_quality_but_still_computes() {
        let (sim, deriver) = setup(true, false);
        assert_eq!(deriver.derive().unwrap().quality, Quality::Good);

        sim.set_reachable(&t("plc/Inserted"), false);
        let status = deriver.derive().unwrap();
        assert!(status.value, "computed on the stale inserted sample");
        assert_eq!(status.quality, Quality::Bad);
    }

    #[test]
    fn uncertain_input_propagates() {
        let (sim, deriver) = setup(false, true);
        sim.set_quality(&t("plc/Extracted"), Quality::Uncertain);
        let status = deriver.derive().unwrap();
        assert!(!status.value);
        assert_eq!(status.quality, Quality::Uncertain);
    }

    #[test]
    fn never_sampled_unreachable_input_is_error() {
        let (sim, deriver) = setup(true, false);
        sim.set_reachable(&t("plc/Extracted"), false);
        assert!(matches!(
            deriver.derive(),
            Err(EndpointError::Unreachable { .. })
        ));
    }

    #[test]
    fn derive_does_not_write() {
        let (sim, deriver) = setup(true, true);
        deriver.derive().unwrap();
        assert!(sim.journal().is_empty());
    }

    #[test]
    fn repoint_state_input() {
        let (_, deriver) = setup(false, false);
        assert!(!deriver.derive().unwrap().value);

        let new = EndpointRef::parse(EndpointOption::StateInserted, "plc/Inserted2").unwrap();
        let old = deriver.repoint(new).unwrap();
        assert_eq!(old.target(), &t("plc/Inserted"));
        assert!(deriver.derive().unwrap().value);

        let wrong = EndpointRef::parse(EndpointOption::Insert, "plc/Insert").unwrap();
        assert!(deriver.repoint(wrong).is_err());
    }
}

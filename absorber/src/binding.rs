//! Endpoint binding: name resolution plus sampled reads and writes.
//!
//! The binding owns the last known [`EndpointSample`] of every target it
//! has touched. Samples are replaced wholesale on every successful read or
//! write; a failed operation keeps the stale sample and degrades its
//! quality to `Bad`.
//!
//! A committed write stays unconfirmed until the next read of the same
//! target. That one read may still carry the pre-write value (a PLC poll
//! cycle behind); it then reports the written value with the quality the
//! transport gave. Every later read is the transport's sample as is.

use absorber_common::endpoint::{
    EndpointError, EndpointOption, EndpointRef, EndpointSample, EndpointTarget, NameResolver,
    RejectCause,
};
use absorber_common::transport::{PlcTransport, TransportError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resolves endpoint names and moves samples through the transport.
pub struct EndpointBinding {
    resolver: Box<dyn NameResolver>,
    transport: Arc<dyn PlcTransport>,
    samples: RwLock<HashMap<EndpointTarget, EndpointSample>>,
    /// Writes not yet followed by a read of the same target.
    unconfirmed: Mutex<HashMap<EndpointTarget, EndpointSample>>,
}

impl EndpointBinding {
    pub fn new(resolver: Box<dyn NameResolver>, transport: Arc<dyn PlcTransport>) -> Self {
        Self {
            resolver,
            transport,
            samples: RwLock::new(HashMap::new()),
            unconfirmed: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a symbolic option name (`"InsertAttribute"`, legacy
    /// `"PlcAttrName_InsertAttribute"`) to an endpoint handle.
    ///
    /// # Errors
    ///
    /// `EndpointError::Configuration` if the name is unknown, has no target,
    /// or the target is malformed.
    pub fn resolve(&self, name: &str) -> Result<EndpointRef, EndpointError> {
        let option: EndpointOption = name
            .parse()
            .map_err(|reason: String| EndpointError::configuration(name, reason))?;
        let target = self
            .resolver
            .lookup(option)
            .ok_or_else(|| EndpointError::configuration(name, "no endpoint target configured"))?;
        EndpointRef::parse(option, target)
    }

    /// Read the endpoint through the transport and refresh its sample.
    ///
    /// The first read after a committed write keeps the written value if
    /// the transport still reports the previous one with an older
    /// timestamp. Quality always comes from the transport.
    ///
    /// # Errors
    ///
    /// `EndpointError::Unreachable` if the transport fails. The cached
    /// sample, if any, is kept with `Bad` quality.
    pub fn read(&self, endpoint: &EndpointRef) -> Result<EndpointSample, EndpointError> {
        let target = endpoint.target();
        let committed = self.unconfirmed.lock().remove(target);
        match self.transport.read(target) {
            Ok(fresh) => {
                let sample = match committed {
                    Some(written)
                        if fresh.value != written.value && fresh.timestamp < written.timestamp =>
                    {
                        EndpointSample::new(written.value, written.timestamp, fresh.quality)
                    }
                    _ => fresh,
                };
                self.samples.write().insert(target.clone(), sample);
                trace!("{} = {} ({})", endpoint, sample.value, sample.quality);
                Ok(sample)
            }
            Err(e) => {
                self.degrade(target);
                warn!("Read of {} failed: {}", endpoint, e);
                Err(EndpointError::Unreachable {
                    target: target.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Read the endpoint, falling back to the stale sample with `Bad`
    /// quality when the transport fails.
    ///
    /// # Errors
    ///
    /// The read error if the endpoint has never been sampled.
    pub fn read_or_degraded(&self, endpoint: &EndpointRef) -> Result<EndpointSample, EndpointError> {
        self.read(endpoint)
            .or_else(|err| self.last_sample(endpoint).ok_or(err))
    }

    /// Push `value` to the endpoint.
    ///
    /// On success the cached sample becomes `value`, stamped now, good.
    ///
    /// # Errors
    ///
    /// `EndpointError::WriteRejected` if the endpoint is read-only (the
    /// transport is not contacted), unreachable, or refuses the value.
    pub fn write(&self, endpoint: &EndpointRef, value: bool) -> Result<(), EndpointError> {
        let target = endpoint.target();
        if !endpoint.access().is_writable() {
            return Err(EndpointError::WriteRejected {
                target: target.clone(),
                value,
                cause: RejectCause::ReadOnly,
            });
        }

        debug!("Writing {} = {}", endpoint, value);
        match self.transport.write(target, value) {
            Ok(()) => {
                let sample = EndpointSample::now(value);
                self.samples.write().insert(target.clone(), sample);
                self.unconfirmed.lock().insert(target.clone(), sample);
                Ok(())
            }
            Err(e) => {
                let cause = match e {
                    TransportError::Refused(reason) => RejectCause::Refused(reason),
                    other => {
                        self.degrade(target);
                        RejectCause::Unreachable(other.to_string())
                    }
                };
                Err(EndpointError::WriteRejected {
                    target: target.clone(),
                    value,
                    cause,
                })
            }
        }
    }

    /// Last cached sample, without contacting the transport.
    pub fn last_sample(&self, endpoint: &EndpointRef) -> Option<EndpointSample> {
        self.samples.read().get(endpoint.target()).copied()
    }

    fn degrade(&self, target: &EndpointTarget) {
        if let Some(sample) = self.samples.write().get_mut(target) {
            *sample = sample.degraded();
        }
    }
}

//! Insert/Extract actuation with clear-then-assert ordering.
//!
//! Each command is a one-shot two-write sequence:
//!
//! ```text
//! Idle ──Insert()──► ClearOpposing (Extract-tag := false)
//!                        │ ok
//!                        ▼
//!                    AssertRequested (Insert-tag := true) ──ok──► Idle (success)
//! ```
//!
//! `Extract()` is the mirror image. The opposing tag is always cleared
//! first so the mechanism never sees both actuation tags true; the worst
//! intermediate state is both false, in which the mechanism holds
//! position. A failed first write aborts the sequence. A failed second
//! write is reported as [`ActuationError::PartialActuation`] and the
//! cleared tag is left as is: repeating the command is idempotent.
//!
//! The coordinator confirms only that the writes were accepted. Mechanical
//! completion shows up later on the state endpoints.

use absorber_common::endpoint::{EndpointError, EndpointOption, EndpointRef};
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::binding::EndpointBinding;

/// Actuation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Insert,
    Extract,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "Insert"),
            Self::Extract => write!(f, "Extract"),
        }
    }
}

impl Command {
    /// Command asserting the given actuation tag.
    pub fn asserting(option: EndpointOption) -> Option<Self> {
        match option {
            EndpointOption::Insert => Some(Self::Insert),
            EndpointOption::Extract => Some(Self::Extract),
            _ => None,
        }
    }
}

/// Step of the two-write sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuationStep {
    /// Write #1: opposing actuation tag := false.
    ClearOpposing,
    /// Write #2: requested actuation tag := true.
    AssertRequested,
    /// Single write outside a command: one actuation tag := false.
    Release,
}

/// Failed command, tagged with the write that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuationError {
    /// Clearing the opposing tag failed; nothing was changed.
    #[error("{command}: clearing {endpoint} failed: {source}")]
    ClearFailed {
        command: Command,
        endpoint: &'static str,
        #[source]
        source: EndpointError,
    },

    /// Opposing tag cleared, requested tag not asserted. Safe to retry.
    #[error("{command}: {endpoint} not asserted after clearing the opposing tag: {source}")]
    PartialActuation {
        command: Command,
        endpoint: &'static str,
        #[source]
        source: EndpointError,
    },

    /// A standalone release of one actuation tag failed. No command ran.
    #[error("release of {endpoint} failed: {source}")]
    ReleaseFailed {
        command: Command,
        endpoint: &'static str,
        #[source]
        source: EndpointError,
    },
}

impl ActuationError {
    pub fn step(&self) -> ActuationStep {
        match self {
            Self::ClearFailed { .. } => ActuationStep::ClearOpposing,
            Self::PartialActuation { .. } => ActuationStep::AssertRequested,
            Self::ReleaseFailed { .. } => ActuationStep::Release,
        }
    }

    pub fn command(&self) -> Command {
        match self {
            Self::ClearFailed { command, .. }
            | Self::PartialActuation { command, .. }
            | Self::ReleaseFailed { command, .. } => *command,
        }
    }

    /// The endpoint error behind the failed write.
    pub fn endpoint_error(&self) -> &EndpointError {
        match self {
            Self::ClearFailed { source, .. }
            | Self::PartialActuation { source, .. }
            | Self::ReleaseFailed { source, .. } => source,
        }
    }
}

/// Outcome of `Insert()` / `Extract()`.
pub type CommandOutcome = Result<(), ActuationError>;

/// The Insert-tag / Extract-tag pair.
#[derive(Debug, Clone)]
struct ActuationPair {
    insert: EndpointRef,
    extract: EndpointRef,
}

impl ActuationPair {
    /// `(opposing, requested)` for `command`.
    fn sequence(&self, command: Command) -> (&EndpointRef, &EndpointRef) {
        match command {
            Command::Insert => (&self.extract, &self.insert),
            Command::Extract => (&self.insert, &self.extract),
        }
    }
}

/// Serializes actuation commands for one absorber.
///
/// The mutex is held across both writes of a sequence, so an `Insert` and
/// an `Extract` from different callers never interleave their sub-writes.
/// Re-pointing the actuation endpoints takes the same mutex.
pub struct ActuationCoordinator {
    binding: Arc<EndpointBinding>,
    pair: Mutex<ActuationPair>,
}

impl ActuationCoordinator {
    /// Resolve both actuation options through `binding`.
    pub fn resolve(binding: Arc<EndpointBinding>) -> Result<Self, EndpointError> {
        let insert = binding.resolve(EndpointOption::Insert.property_name())?;
        let extract = binding.resolve(EndpointOption::Extract.property_name())?;
        if insert.target() == extract.target() {
            return Err(EndpointError::configuration(
                extract.name(),
                format!("{} is already the {} target", insert.target(), insert.name()),
            ));
        }
        Ok(Self {
            binding,
            pair: Mutex::new(ActuationPair { insert, extract }),
        })
    }

    pub fn insert(&self) -> CommandOutcome {
        self.execute(Command::Insert)
    }

    pub fn extract(&self) -> CommandOutcome {
        self.execute(Command::Extract)
    }

    /// Run the clear-then-assert sequence for `command`.
    pub fn execute(&self, command: Command) -> CommandOutcome {
        let pair = self.pair.lock();
        let (opposing, requested) = pair.sequence(command);

        debug!("{}: clearing {}", command, opposing);
        if let Err(source) = self.binding.write(opposing, false) {
            warn!("{} aborted, {} not cleared: {}", command, opposing, source);
            return Err(ActuationError::ClearFailed {
                command,
                endpoint: opposing.name(),
                source,
            });
        }

        debug!("{}: asserting {}", command, requested);
        if let Err(source) = self.binding.write(requested, true) {
            warn!(
                "{} partially applied, {} cleared but {} not asserted: {}",
                command, opposing, requested, source
            );
            return Err(ActuationError::PartialActuation {
                command,
                endpoint: requested.name(),
                source,
            });
        }

        info!("{} command accepted", command);
        Ok(())
    }

    /// Clear the tag `command` asserts, without asserting anything.
    /// Runs under the same lock as the command sequences.
    pub fn release(&self, command: Command) -> CommandOutcome {
        let pair = self.pair.lock();
        let (_, requested) = pair.sequence(command);
        debug!("Releasing {}", requested);
        self.binding
            .write(requested, false)
            .map_err(|source| ActuationError::ReleaseFailed {
                command,
                endpoint: requested.name(),
                source,
            })
    }

    /// Current endpoint for an actuation option.
    pub fn endpoint(&self, option: EndpointOption) -> Option<EndpointRef> {
        let pair = self.pair.lock();
        match option {
            EndpointOption::Insert => Some(pair.insert.clone()),
            EndpointOption::Extract => Some(pair.extract.clone()),
            _ => None,
        }
    }

    /// Swap the endpoint of an actuation option; returns the previous one.
    /// Waits for any in-flight sequence to finish.
    ///
    /// # Errors
    ///
    /// `EndpointError::Configuration` if `endpoint` is not an actuation
    /// option, or would point both actuation options at the same target.
    pub fn repoint(&self, endpoint: EndpointRef) -> Result<EndpointRef, EndpointError> {
        let mut guard = self.pair.lock();
        let pair = &mut *guard;
        let (slot, other) = match endpoint.option() {
            EndpointOption::Insert => (&mut pair.insert, &pair.extract),
            EndpointOption::Extract => (&mut pair.extract, &pair.insert),
            option => {
                return Err(EndpointError::configuration(
                    option.property_name(),
                    "not an actuation endpoint",
                ));
            }
        };
        if endpoint.target() == other.target() {
            return Err(EndpointError::configuration(
                endpoint.name(),
                format!("{} is already the {} target", other.target(), other.name()),
            ));
        }
        Ok(std::mem::replace(slot, endpoint))
    }
}

//! Endpoint option names and access modes.
//!
//! `EndpointOption` maps a configuration property name like
//! `"InsertAttribute"` to a typed enum variant. The legacy
//! `PlcAttrName_` prefix is accepted on input.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::consts::LEGACY_PROPERTY_PREFIX;

// ─── AccessMode ─────────────────────────────────────────────────────

/// Access mode of a remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::ReadWrite => write!(f, "read-write"),
        }
    }
}

// ─── EndpointKind ───────────────────────────────────────────────────

/// Functional group an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Water-flow interlock mirrored verbatim.
    Alarm,
    /// Drives the mechanism (Insert-tag / Extract-tag).
    Actuation,
    /// Mechanical confirmation feeding the derived status.
    State,
}

// ─── EndpointOption ─────────────────────────────────────────────────

/// One of the eight endpoint options configured per absorber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointOption {
    AchromatFsw,
    Fsw1,
    Fsw2,
    Fsw3,
    Insert,
    Extract,
    StateInserted,
    StateExtracted,
}

impl EndpointOption {
    /// All options in configuration order.
    pub const ALL: [Self; 8] = [
        Self::AchromatFsw,
        Self::Fsw1,
        Self::Fsw2,
        Self::Fsw3,
        Self::Insert,
        Self::Extract,
        Self::StateInserted,
        Self::StateExtracted,
    ];

    /// Property name as written in `absorber.toml`.
    pub fn property_name(self) -> &'static str {
        match self {
            Self::AchromatFsw => "AchromatFSW",
            Self::Fsw1 => "FSW_1",
            Self::Fsw2 => "FSW_2",
            Self::Fsw3 => "FSW_3",
            Self::Insert => "InsertAttribute",
            Self::Extract => "ExtractAttribute",
            Self::StateInserted => "StateInsertedAttribute",
            Self::StateExtracted => "StateExtractedAttribute",
        }
    }

    pub fn kind(self) -> EndpointKind {
        match self {
            Self::AchromatFsw | Self::Fsw1 | Self::Fsw2 | Self::Fsw3 => EndpointKind::Alarm,
            Self::Insert | Self::Extract => EndpointKind::Actuation,
            Self::StateInserted | Self::StateExtracted => EndpointKind::State,
        }
    }

    /// Only the actuation pair accepts writes.
    pub fn access(self) -> AccessMode {
        match self.kind() {
            EndpointKind::Actuation => AccessMode::ReadWrite,
            EndpointKind::Alarm | EndpointKind::State => AccessMode::ReadOnly,
        }
    }

    /// The actuation endpoint driven in the opposite direction.
    pub fn opposing(self) -> Option<Self> {
        match self {
            Self::Insert => Some(Self::Extract),
            Self::Extract => Some(Self::Insert),
            _ => None,
        }
    }
}

impl FromStr for EndpointOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(LEGACY_PROPERTY_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|option| option.property_name() == name)
            .ok_or_else(|| format!("unknown endpoint option: {s:?}"))
    }
}

impl fmt::Display for EndpointOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

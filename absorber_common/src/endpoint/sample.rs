//! Endpoint samples: value, timestamp and quality.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// ─── Quality ────────────────────────────────────────────────────────

/// Validity of a sample, ordered from best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Good,
    Uncertain,
    /// Endpoint unreachable or value stale.
    Bad,
}

impl Quality {
    pub fn is_good(self) -> bool {
        self == Self::Good
    }

    /// The worse of two qualities.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Uncertain => write!(f, "uncertain"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "uncertain" => Ok(Self::Uncertain),
            "bad" => Ok(Self::Bad),
            _ => Err(format!("unknown quality: {s:?}")),
        }
    }
}

// ─── EndpointSample ─────────────────────────────────────────────────

/// Last known value of one endpoint.
///
/// Samples are plain values: the binding hands out copies and replaces
/// its cached copy wholesale on every successful read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSample {
    pub value: bool,
    pub timestamp: SystemTime,
    pub quality: Quality,
}

impl EndpointSample {
    pub fn new(value: bool, timestamp: SystemTime, quality: Quality) -> Self {
        Self {
            value,
            timestamp,
            quality,
        }
    }

    /// A good-quality sample taken now.
    pub fn now(value: bool) -> Self {
        Self::new(value, SystemTime::now(), Quality::Good)
    }

    /// Same value and timestamp, quality forced to `Bad`.
    pub fn degraded(self) -> Self {
        Self {
            quality: Quality::Bad,
            ..self
        }
    }
}

//! Remote endpoint addresses.
//!
//! A target is written `device/attribute`, where the device part may itself
//! contain slashes (`r1-101/vac/plc-01/Insert` → device `r1-101/vac/plc-01`,
//! attribute `Insert`).

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Resolved address of one remote boolean tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointTarget {
    device: String,
    attribute: String,
}

impl EndpointTarget {
    /// Device part of the address.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Attribute (tag) part of the address.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl FromStr for EndpointTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.chars().any(char::is_whitespace) {
            return Err(format!("endpoint target {s:?} contains whitespace"));
        }
        let Some((device, attribute)) = s.rsplit_once('/') else {
            return Err(format!(
                "endpoint target {s:?} is not of the form device/attribute"
            ));
        };
        if device.is_empty() || device.split('/').any(str::is_empty) {
            return Err(format!("endpoint target {s:?} has an empty device segment"));
        }
        if attribute.is_empty() {
            return Err(format!("endpoint target {s:?} has an empty attribute"));
        }
        Ok(Self {
            device: device.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

impl TryFrom<String> for EndpointTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EndpointTarget> for String {
    fn from(target: EndpointTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for EndpointTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device, self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_slash() {
        let target: EndpointTarget = "r1-101/vac/plc-01/Insert".parse().unwrap();
        assert_eq!(target.device(), "r1-101/vac/plc-01");
        assert_eq!(target.attribute(), "Insert");
        assert_eq!(target.to_string(), "r1-101/vac/plc-01/Insert");
    }

    #[test]
    fn single_segment_device() {
        let target: EndpointTarget = "plc/FSW_1".parse().unwrap();
        assert_eq!(target.device(), "plc");
        assert_eq!(target.attribute(), "FSW_1");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let target: EndpointTarget = "  plc/X \n".parse().unwrap();
        assert_eq!(target.to_string(), "plc/X");
    }

    #[test]
    fn malformed_targets_rejected() {
        for bad in ["", "Insert", "/Insert", "plc/", "a//b/Insert", "plc/In sert"] {
            assert!(bad.parse::<EndpointTarget>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn deserializes_from_toml_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            target: EndpointTarget,
        }
        let w: Wrapper = toml::from_str(r#"target = "sys/plc/1/Extract""#).unwrap();
        assert_eq!(w.target.attribute(), "Extract");

        let bad = toml::from_str::<Wrapper>(r#"target = "Extract""#);
        assert!(bad.is_err());
    }
}

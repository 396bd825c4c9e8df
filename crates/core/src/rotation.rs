//! Rotation modes declared by shipments.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a shipment may be oriented inside a bin.
///
/// Descriptors carry the mode as free text. Anything other than the three
/// recognized names is kept verbatim as [`RotationType::Unrecognized`]; such a
/// shipment never fits any bin, which is ordinary control flow rather than an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum RotationType {
    /// Laid on its side: height along the bin width, width along the bin
    /// length, length along the bin height.
    Horizontal,
    /// Upright, axes matched one to one.
    Vertical,
    /// Tested with the horizontal orientation only.
    #[default]
    Any,
    /// A mode name outside the recognized set.
    Unrecognized(String),
}

impl RotationType {
    /// Parses a mode name. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Self {
        match value {
            "horizontal" => Self::Horizontal,
            "vertical" => Self::Vertical,
            "any" => Self::Any,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire name of this mode.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Any => "any",
            Self::Unrecognized(name) => name,
        }
    }

    /// Returns true for the three recognized modes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for RotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RotationType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for RotationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "horizontal" | "vertical" | "any" => Self::parse(&value),
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<RotationType> for String {
    fn from(value: RotationType) -> Self {
        match value {
            RotationType::Unrecognized(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

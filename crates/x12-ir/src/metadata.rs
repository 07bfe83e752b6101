//! Validation findings recorded against result nodes
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent setters are designed for chaining.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Acknowledgment level a finding is reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Interchange envelope (TA1)
    Interchange,

    /// Functional group (AK9)
    Group,

    /// Transaction set (AK5)
    Transaction,
}

/// Envelope segment an element finding was raised against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeSegment {
    /// Interchange control header
    Isa,

    /// Interchange control trailer
    Iea,

    /// Functional group header
    Gs,

    /// Functional group trailer
    Ge,

    /// Transaction set header
    St,

    /// Transaction set trailer
    Se,
}

impl EnvelopeSegment {
    /// Level whose acknowledgment segment reports this finding
    pub fn level(self) -> Level {
        match self {
            Self::Isa | Self::Iea => Level::Interchange,
            Self::Gs | Self::Ge => Level::Group,
            Self::St | Self::Se => Level::Transaction,
        }
    }

    /// X12 segment identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isa => "ISA",
            Self::Iea => "IEA",
            Self::Gs => "GS",
            Self::Ge => "GE",
            Self::St => "ST",
            Self::Se => "SE",
        }
    }
}

impl fmt::Display for EnvelopeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgment code (AK5-01, AK9-01)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckCode {
    /// Accepted
    #[serde(rename = "A")]
    Accepted,

    /// Accepted but errors were noted
    #[serde(rename = "E")]
    AcceptedWithErrors,

    /// Rejected, message authentication code failed
    #[serde(rename = "M")]
    RejectedAuthentication,

    /// Partially accepted, at least one transaction set was rejected
    #[serde(rename = "P")]
    PartiallyAccepted,

    /// Rejected
    #[serde(rename = "R")]
    Rejected,

    /// Rejected, assurance failed validity tests
    #[serde(rename = "W")]
    RejectedAssurance,

    /// Rejected, content after decryption could not be analyzed
    #[serde(rename = "X")]
    RejectedDecryption,
}

impl AckCode {
    /// Single-letter X12 value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "A",
            Self::AcceptedWithErrors => "E",
            Self::RejectedAuthentication => "M",
            Self::PartiallyAccepted => "P",
            Self::Rejected => "R",
            Self::RejectedAssurance => "W",
            Self::RejectedDecryption => "X",
        }
    }

    /// Whether the acknowledged unit counts as accepted
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted | Self::AcceptedWithErrors)
    }
}

impl fmt::Display for AckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Implementation guide error code (e.g. "8", "SEG1", "I12")
    pub code: String,

    /// Human-readable description from the validator
    #[serde(default)]
    pub message: String,

    /// Offending raw value (if applicable)
    #[serde(default)]
    pub bad_value: Option<String>,

    /// Envelope segment the finding concerns, for envelope element errors
    #[serde(default)]
    pub origin: Option<EnvelopeSegment>,
}

impl ErrorRecord {
    /// Create a new finding
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            bad_value: None,
            origin: None,
        }
    }

    /// Attach the offending value
    pub fn with_bad_value(mut self, value: impl Into<String>) -> Self {
        self.bad_value = Some(value.into());
        self
    }

    /// Tag the finding with the envelope segment it concerns
    pub fn with_origin(mut self, origin: EnvelopeSegment) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Offending value, treating an empty string as absent
    pub fn bad_value(&self) -> Option<&str> {
        self.bad_value.as_deref().filter(|v| !v.is_empty())
    }
}

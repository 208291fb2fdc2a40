//! ESR result interpretation
//!
//! The instrument reports a measurement, an out-of-range flag, or a negative
//! error code in the result value field. Interpretation is total: every
//! input string maps to a variant, never an error, so a malformed value from
//! the wire still produces a usable classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named instrument error codes
///
/// The code space skips -6; the instrument never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentError {
    NoFlow,
    NoSpike,
    ReverseFlow,
    InsufficientPoints,
    TooDark,
    TooClear,
    Withdrawal,
    FlowIn,
    FlowOut,
    Acquisition,
    TriggerDelay,
}

impl InstrumentError {
    /// Map a wire error code such as `-3` to its named error
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "-1" => Some(Self::NoFlow),
            "-2" => Some(Self::NoSpike),
            "-3" => Some(Self::ReverseFlow),
            "-4" => Some(Self::InsufficientPoints),
            "-5" => Some(Self::TooDark),
            "-7" => Some(Self::TooClear),
            "-8" => Some(Self::Withdrawal),
            "-9" => Some(Self::FlowIn),
            "-10" => Some(Self::FlowOut),
            "-11" => Some(Self::Acquisition),
            "-12" => Some(Self::TriggerDelay),
            _ => None,
        }
    }

    /// The numeric wire code for this error
    pub fn code(&self) -> i32 {
        match self {
            Self::NoFlow => -1,
            Self::NoSpike => -2,
            Self::ReverseFlow => -3,
            Self::InsufficientPoints => -4,
            Self::TooDark => -5,
            Self::TooClear => -7,
            Self::Withdrawal => -8,
            Self::FlowIn => -9,
            Self::FlowOut => -10,
            Self::Acquisition => -11,
            Self::TriggerDelay => -12,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoFlow => "No flow detected",
            Self::NoSpike => "No spike detected",
            Self::ReverseFlow => "Reverse flow detected",
            Self::InsufficientPoints => "Insufficient data points",
            Self::TooDark => "Sample too dark",
            Self::TooClear => "Sample too clear",
            Self::Withdrawal => "Withdrawal error",
            Self::FlowIn => "Flow in error",
            Self::FlowOut => "Flow out error",
            Self::Acquisition => "Acquisition error",
            Self::TriggerDelay => "Trigger delay error",
        }
    }
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Classification of one result value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Interpretation {
    /// A named negative error code
    InstrumentError(InstrumentError),
    /// A negative code outside the known set, raw value kept
    UnknownError(String),
    /// Flagged `<`, below the measurable range of 1 mm/hr
    BelowRange,
    /// Flagged `>`, above the measurable range of 130 mm/hr
    AboveRange,
    /// A plain numeric measurement
    Normal(f64),
    /// Not negative, not flagged, not numeric; raw value kept
    InvalidFormat(String),
}

impl Interpretation {
    /// Classify a result value together with its abnormal flag
    ///
    /// Precedence follows the instrument contract: error codes win over
    /// range flags, range flags win over numeric parsing.
    pub fn classify(value: &str, abnormal_flag: &str) -> Self {
        if value.starts_with('-') {
            return match InstrumentError::from_code(value) {
                Some(error) => Self::InstrumentError(error),
                None => Self::UnknownError(value.to_string()),
            };
        }

        match abnormal_flag {
            "<" => return Self::BelowRange,
            ">" => return Self::AboveRange,
            _ => {}
        }

        match value.parse::<f64>() {
            Ok(numeric) => Self::Normal(numeric),
            Err(_) => Self::InvalidFormat(value.to_string()),
        }
    }

    /// True only for a plain numeric measurement
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal(_))
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstrumentError(error) => write!(f, "{}", error),
            Self::UnknownError(raw) => write!(f, "Unknown error: {}", raw),
            Self::BelowRange => write!(f, "Below range (< 1 mm/hr)"),
            Self::AboveRange => write!(f, "Above range (> 130 mm/hr)"),
            Self::Normal(value) => write!(f, "Normal measurement: {} mm/hr", value),
            Self::InvalidFormat(raw) => write!(f, "Invalid format: {}", raw),
        }
    }
}

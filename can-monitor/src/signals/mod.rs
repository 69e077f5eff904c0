//! Signal decoders for the well-known addresses
//!
//! Each decoder is a pure function from payload bytes to a [`SignalValue`].
//! Decoders never panic on short payloads; they return [`SignalValue::Empty`].

use crate::types::{MonitorError, Result, SignalValue};
use serde::Serialize;
use std::fmt;

pub mod bits;
pub mod body;
pub mod clock;
pub mod radio;
pub mod registry;

pub use registry::{DecodeFn, DecodedSignals, SignalRegistry};

/// Radio data system text
pub const RDS_ADDR: u32 = 0x0a194005;
/// Tuner frequency / media track state
pub const FREQUENCY_ADDR: u32 = 0x0a114005;
/// Steering wheel / head unit buttons
pub const BUTTONS_ADDR: u32 = 0x06354000;
/// Dashboard clock
pub const DATE_ADDR: u32 = 0x0c214003;
/// Brake light state
pub const BRAKE_ADDR: u32 = 0x063d4000;

/// The signals the monitor knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    RadioText,
    Frequency,
    Buttons,
    Date,
    Brake,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::RadioText,
        SignalKind::Frequency,
        SignalKind::Buttons,
        SignalKind::Date,
        SignalKind::Brake,
    ];

    /// Address this signal is broadcast on
    pub fn address(&self) -> u32 {
        match self {
            SignalKind::RadioText => RDS_ADDR,
            SignalKind::Frequency => FREQUENCY_ADDR,
            SignalKind::Buttons => BUTTONS_ADDR,
            SignalKind::Date => DATE_ADDR,
            SignalKind::Brake => BRAKE_ADDR,
        }
    }

    /// Short label for display panes
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::RadioText => "LCD",
            SignalKind::Frequency => "Frequency",
            SignalKind::Buttons => "Buttons",
            SignalKind::Date => "Date",
            SignalKind::Brake => "Brake",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Check that a payload carries at least `needed` bytes
pub(crate) fn require(data: &[u8], needed: usize) -> Result<&[u8]> {
    if data.len() < needed {
        return Err(MonitorError::ShortPayload {
            needed,
            got: data.len(),
        });
    }
    Ok(data)
}

/// Turn a decoder result into a display value, logging short payloads
pub(crate) fn or_empty(name: &str, result: Result<SignalValue>) -> SignalValue {
    result.unwrap_or_else(|e| {
        log::trace!("{} decoder: {}", name, e);
        SignalValue::Empty
    })
}

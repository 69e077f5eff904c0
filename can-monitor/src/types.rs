//! Core types for the CAN monitor library
//!
//! This module defines the frame record kept by the store, the raw frame produced
//! by the line parser, the decoded signal values, and the library error type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Timestamp type used throughout the monitor
pub type Timestamp = DateTime<Utc>;

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// A frame exactly as parsed from one input line, before it enters the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// CAN address (11-bit or 29-bit identifier, stored as u32)
    pub address: u32,
    /// Payload bytes (0-8 for classic CAN, not enforced by the parser)
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(address: u32, data: Vec<u8>) -> Self {
        Self { address, data }
    }
}

/// The state kept for one address in the frame store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// CAN address (unique key in the store)
    pub address: u32,
    /// Most recently observed payload
    pub data: Vec<u8>,
    /// Payload held immediately before `data` was written
    pub previous: Vec<u8>,
    /// Number of upserts seen for this address
    pub count: u64,
    /// Wall-clock time of the most recent upsert
    pub last_seen: Timestamp,
}

impl Frame {
    /// Create a frame for an address seen for the first time
    ///
    /// With no prior value, `previous` mirrors `data` so nothing shows as changed.
    pub fn first_seen(address: u32, data: Vec<u8>) -> Self {
        Self {
            address,
            previous: data.clone(),
            data,
            count: 1,
            last_seen: Utc::now(),
        }
    }

    /// Replace the payload, shifting the current one into `previous`
    pub fn update(&mut self, data: Vec<u8>) {
        self.previous = std::mem::replace(&mut self.data, data);
        self.count += 1;
        self.last_seen = Utc::now();
    }

    /// Per-byte flags marking which bytes of `data` differ from `previous`
    ///
    /// A byte with no counterpart in `previous` counts as changed.
    pub fn changed_bytes(&self) -> Vec<bool> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, b)| self.previous.get(i) != Some(b))
            .collect()
    }

    /// True if any byte differs from the previous payload
    pub fn has_changed(&self) -> bool {
        self.data != self.previous
    }

    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Errors that can occur while ingesting or decoding
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Malformed line {line:?}: {reason}")]
    MalformedLine { line: String, reason: String },

    #[error("Payload too short: need {needed} bytes, got {got}")]
    ShortPayload { needed: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        MonitorError::MalformedLine {
            line: line.trim_end().to_string(),
            reason: reason.into(),
        }
    }
}

/// A decoded signal value, recomputed from the store on every refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SignalValue {
    /// Text rendering of the signal (radio text, frequency, buttons, date)
    Text(String),
    /// On/off signal (brake)
    Flag(bool),
    /// No value: address not seen yet, payload too short, or unknown tag
    Empty,
}

impl SignalValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, SignalValue::Empty)
    }

    /// Text content if this is a text signal
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SignalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is a set flag
    pub fn as_flag(&self) -> bool {
        matches!(self, SignalValue::Flag(true))
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Text(s) => write!(f, "{}", s),
            SignalValue::Flag(true) => write!(f, "BRAKE-ENGAGED"),
            SignalValue::Flag(false) | SignalValue::Empty => Ok(()),
        }
    }
}

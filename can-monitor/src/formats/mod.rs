//! Line-oriented dump format parsers
//!
//! This module contains parsers for the two text dump grammars the monitor
//! accepts on its input. Each parser turns a single line into a [`RawFrame`].

use crate::types::{MonitorError, RawFrame, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod compact;
pub mod verbose;

/// Input grammar selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineFormat {
    /// Pick the grammar per line: compact if a frame token contains `#`
    #[default]
    Auto,
    /// `<ignored> <addr> [<len>] <b0> <b1> ...`
    Verbose,
    /// `<ignored> <addr>#<payload>`
    Compact,
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineFormat::Auto => write!(f, "auto"),
            LineFormat::Verbose => write!(f, "verbose"),
            LineFormat::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LineFormat {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(LineFormat::Auto),
            "verbose" => Ok(LineFormat::Verbose),
            "compact" => Ok(LineFormat::Compact),
            other => Err(MonitorError::Config(format!(
                "unknown line format '{}' (expected auto, verbose or compact)",
                other
            ))),
        }
    }
}

/// Parse one input line with the given grammar
pub fn parse_line(line: &str, format: LineFormat) -> Result<RawFrame> {
    match format {
        LineFormat::Verbose => verbose::parse(line),
        LineFormat::Compact => compact::parse(line),
        LineFormat::Auto => {
            if compact::looks_compact(line) {
                compact::parse(line)
            } else {
                verbose::parse(line)
            }
        }
    }
}

/// Parse a hexadecimal CAN address, with or without a `0x` prefix
pub(crate) fn parse_address(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a single hexadecimal byte token (one or two digits)
pub(crate) fn parse_hex_byte(token: &str) -> Option<u8> {
    if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}

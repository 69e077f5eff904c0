//! Compact dump grammar
//!
//! `<ignored> <hex-address>#<hex-payload>`, as written by `candump -l` and
//! similar capture tools. The payload is a contiguous, even-length hex string.

use super::parse_address;
use crate::types::{MonitorError, RawFrame, Result};

/// Find the `addr#payload` token: second column, or third after a timestamp
fn frame_token(line: &str) -> Option<&str> {
    line.split_whitespace().skip(1).take(2).find(|t| t.contains('#'))
}

/// True if the second or third column is an `addr#payload` token
pub fn looks_compact(line: &str) -> bool {
    frame_token(line).is_some()
}

pub fn parse(line: &str) -> Result<RawFrame> {
    let token = frame_token(line)
        .ok_or_else(|| MonitorError::malformed(line, "no addr#payload token"))?;

    let (address_part, payload_part) = token
        .split_once('#')
        .ok_or_else(|| MonitorError::malformed(line, "missing '#'"))?;

    let address = parse_address(address_part)
        .ok_or_else(|| MonitorError::malformed(line, format!("bad address '{}'", address_part)))?;

    let data = hex::decode(payload_part).map_err(|e| {
        MonitorError::malformed(line, format!("bad payload '{}': {}", payload_part, e))
    })?;

    Ok(RawFrame::new(address, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_line() {
        let frame = parse("x 0a194005#48656c6c6f21").unwrap();
        assert_eq!(frame.address, 0x0a194005);
        assert_eq!(frame.data, vec![0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x21]);
    }

    #[test]
    fn test_parse_candump_log_line() {
        // (timestamp) interface frame
        let frame = parse("(1436509052.249713) vcan0 063D4000#00FE").unwrap();
        assert_eq!(frame.address, 0x063d4000);
        assert_eq!(frame.data, vec![0x00, 0xfe]);
    }

    #[test]
    fn test_empty_payload() {
        let frame = parse("x 123#").unwrap();
        assert!(frame.data.is_empty());
    }

    #[test]
    fn test_odd_length_payload() {
        assert!(parse("x 123#abc").is_err());
    }

    #[test]
    fn test_non_hex_payload() {
        assert!(parse("x 123#zz").is_err());
        assert!(parse("x 12g#00").is_err());
        assert!(parse("x #00").is_err());
    }

    #[test]
    fn test_missing_token() {
        assert!(parse("123#00").is_err());
        assert!(!looks_compact("can0 123 [1] 00"));
    }

    #[test]
    fn test_hash_in_trailing_column_is_not_compact() {
        assert!(!looks_compact("can0 123 [1] 23 '#'"));
        assert!(!looks_compact("can0 123 [3] 41 23 42 A#B"));
        assert!(looks_compact("(1436509052.249713) vcan0 063D4000#00FE"));
    }
}

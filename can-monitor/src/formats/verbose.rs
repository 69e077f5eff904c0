//! Verbose dump grammar
//!
//! `<ignored> <hex-address> [<decimal-length>] <hex-byte> <hex-byte> ...`
//!
//! The bracketed length says how many of the following byte tokens belong to the
//! payload. Anything after those bytes (an ASCII column, for instance) is ignored.

use super::{parse_address, parse_hex_byte};
use crate::types::{MonitorError, RawFrame, Result};

pub fn parse(line: &str) -> Result<RawFrame> {
    let mut tokens = line.split_whitespace();

    // Interface / timestamp column
    tokens
        .next()
        .ok_or_else(|| MonitorError::malformed(line, "empty line"))?;

    let address_token = tokens
        .next()
        .ok_or_else(|| MonitorError::malformed(line, "missing address"))?;
    let address = parse_address(address_token)
        .ok_or_else(|| MonitorError::malformed(line, format!("bad address '{}'", address_token)))?;

    let length_token = tokens
        .next()
        .ok_or_else(|| MonitorError::malformed(line, "missing length"))?;
    let length: usize = length_token
        .trim_matches(|c| c == '[' || c == ']')
        .parse()
        .map_err(|_| MonitorError::malformed(line, format!("bad length '{}'", length_token)))?;

    // A CAN payload is at most 8 bytes; the length token is untrusted
    let mut data = Vec::with_capacity(length.min(8));
    for i in 0..length {
        let token = tokens.next().ok_or_else(|| {
            MonitorError::malformed(line, format!("length {} but only {} bytes", length, i))
        })?;
        let byte = parse_hex_byte(token)
            .ok_or_else(|| MonitorError::malformed(line, format!("bad byte '{}'", token)))?;
        data.push(byte);
    }

    Ok(RawFrame::new(address, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verbose_line() {
        let frame = parse("  can0  0C214003   [6]  12 30 24 05 23 00").unwrap();
        assert_eq!(frame.address, 0x0c214003);
        assert_eq!(frame.data, vec![0x12, 0x30, 0x24, 0x05, 0x23, 0x00]);
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let frame = parse("can0 123 [2] 48 69 'Hi'").unwrap();
        assert_eq!(frame.data, vec![0x48, 0x69]);
    }

    #[test]
    fn test_zero_length_payload() {
        let frame = parse("can0 7FF [0]").unwrap();
        assert_eq!(frame.address, 0x7ff);
        assert!(frame.data.is_empty());
    }

    #[test]
    fn test_length_exceeds_tokens() {
        assert!(parse("can0 123 [4] 01 02").is_err());
    }

    #[test]
    fn test_huge_length_is_malformed() {
        let err = parse("can0 123 [18446744073709551615] 00").unwrap_err();
        assert!(matches!(err, MonitorError::MalformedLine { .. }));
        assert!(parse("can0 123 [1000000000000] 00 01").is_err());
    }

    #[test]
    fn test_bad_tokens() {
        assert!(parse("").is_err());
        assert!(parse("can0").is_err());
        assert!(parse("can0 zz [1] 00").is_err());
        assert!(parse("can0 123").is_err());
        assert!(parse("can0 123 [x] 00").is_err());
        assert!(parse("can0 123 [1] g0").is_err());
        assert!(parse("can0 123 [1] 100").is_err());
    }
}

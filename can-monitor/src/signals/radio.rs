//! Head unit display decoders: radio text and frequency / track state

use super::bits::extract_msb_first;
use super::{or_empty, require};
use crate::types::{Result, SignalValue};
use byteorder::{BigEndian, ByteOrder};

/// Number of characters in one radio text frame
pub const RDS_CHAR_COUNT: usize = 8;
/// Bits per radio text character code
const RDS_CODE_BITS: usize = 6;
/// Code 12 is 'A', code 37 is 'Z'
const RDS_LETTER_BASE: u64 = 12;
const RDS_LETTER_LAST: u64 = RDS_LETTER_BASE + 25;
/// Code the head unit sends for a blank cell
pub const RDS_BLANK_CODE: u64 = 40;

/// First byte of a frequency frame while the tuner is the active source
pub const TUNER_TAG: u8 = 0x46;
/// First byte of a frequency frame while a media track is playing
pub const TRACK_TAG: u8 = 0xc3;
pub const TRACK_PLAY: u8 = 0x02;
pub const TRACK_PAUSE: u8 = 0x01;

/// Decode eight 6-bit character codes packed MSB-first into 48 bits
pub fn decode_radio_text(data: &[u8]) -> SignalValue {
    or_empty("radio text", try_decode_radio_text(data))
}

fn try_decode_radio_text(data: &[u8]) -> Result<SignalValue> {
    let data = require(data, RDS_CHAR_COUNT * RDS_CODE_BITS / 8)?;

    let text = (0..RDS_CHAR_COUNT)
        .map(|i| rds_char(extract_msb_first(data, i * RDS_CODE_BITS, RDS_CODE_BITS)))
        .collect();

    Ok(SignalValue::Text(text))
}

fn rds_char(code: u64) -> char {
    match code {
        RDS_LETTER_BASE..=RDS_LETTER_LAST => char::from(b'A' + (code - RDS_LETTER_BASE) as u8),
        // RDS_BLANK_CODE and every unassigned code
        _ => ' ',
    }
}

/// Decode the tuned frequency (tenths of MHz) or the current track state
pub fn decode_frequency(data: &[u8]) -> SignalValue {
    or_empty("frequency", try_decode_frequency(data))
}

fn try_decode_frequency(data: &[u8]) -> Result<SignalValue> {
    let data = require(data, 1)?;

    match data[0] {
        TUNER_TAG => {
            let data = require(data, 3)?;
            let freq = BigEndian::read_u16(&data[1..3]);
            Ok(SignalValue::Text(format!("{}.{}", freq / 10, freq % 10)))
        }
        TRACK_TAG => {
            let data = require(data, 5)?;
            let mut text = format!("Track: {}", data[3]);
            match data[4] {
                TRACK_PLAY => text.push_str("Play"),
                TRACK_PAUSE => text.push_str("Pause"),
                _ => {}
            }
            Ok(SignalValue::Text(text))
        }
        _ => Ok(SignalValue::Empty),
    }
}

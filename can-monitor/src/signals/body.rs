//! Body controller decoders: button panel and brake light

use super::{or_empty, require};
use crate::types::{Result, SignalValue};

/// One button: which payload byte, which bit mask, which glyph
struct Button {
    byte: usize,
    mask: u8,
    glyph: char,
}

/// Display order of the button glyphs
const BUTTONS: [Button; 8] = [
    Button { byte: 0, mask: 0x80, glyph: '+' }, // volume up
    Button { byte: 0, mask: 0x40, glyph: '-' }, // volume down
    Button { byte: 0, mask: 0x10, glyph: '^' }, // seek up
    Button { byte: 0, mask: 0x08, glyph: 'v' }, // seek down
    Button { byte: 0, mask: 0x04, glyph: 'O' }, // select
    Button { byte: 0, mask: 0x20, glyph: 'E' }, // eject / mode
    Button { byte: 1, mask: 0x80, glyph: 'M' }, // mute
    Button { byte: 1, mask: 0x40, glyph: 'W' }, // wheel
];

/// Decode the eight button flags into an 8-character status string
pub fn decode_buttons(data: &[u8]) -> SignalValue {
    or_empty("buttons", try_decode_buttons(data))
}

fn try_decode_buttons(data: &[u8]) -> Result<SignalValue> {
    let data = require(data, 2)?;

    let text = BUTTONS
        .iter()
        .map(|b| if data[b.byte] & b.mask != 0 { b.glyph } else { ' ' })
        .collect();

    Ok(SignalValue::Text(text))
}

/// Brake is engaged while bit 0 of byte 1 is clear
pub fn decode_brake(data: &[u8]) -> SignalValue {
    or_empty("brake", try_decode_brake(data))
}

fn try_decode_brake(data: &[u8]) -> Result<SignalValue> {
    let data = require(data, 2)?;
    Ok(SignalValue::Flag(data[1] & 0x01 == 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_buttons_pressed() {
        assert_eq!(decode_buttons(&[0xff, 0xff]).to_string(), "+-^vOEMW");
    }

    #[test]
    fn test_no_buttons_pressed() {
        assert_eq!(decode_buttons(&[0x00, 0x00]).to_string(), "        ");
    }

    #[test]
    fn test_single_buttons() {
        assert_eq!(decode_buttons(&[0x20, 0x00]).to_string(), "     E  ");
        assert_eq!(decode_buttons(&[0x00, 0x40]).to_string(), "       W");
        // Bits not mapped to a button are ignored
        assert_eq!(decode_buttons(&[0x03, 0x3f]).to_string(), "        ");
    }

    #[test]
    fn test_buttons_short_payload() {
        assert_eq!(decode_buttons(&[0xff]), SignalValue::Empty);
        assert_eq!(decode_buttons(&[]), SignalValue::Empty);
    }

    #[test]
    fn test_brake() {
        assert_eq!(decode_brake(&[0x00, 0x00]), SignalValue::Flag(true));
        assert_eq!(decode_brake(&[0x00, 0xfe]), SignalValue::Flag(true));
        assert_eq!(decode_brake(&[0x00, 0x01]), SignalValue::Flag(false));
        assert_eq!(decode_brake(&[0x00, 0x00]).to_string(), "BRAKE-ENGAGED");
        assert_eq!(decode_brake(&[0x00, 0x01]).to_string(), "");
    }

    #[test]
    fn test_brake_short_payload() {
        assert_eq!(decode_brake(&[0x00]), SignalValue::Empty);
        assert_eq!(decode_brake(&[]), SignalValue::Empty);
    }
}

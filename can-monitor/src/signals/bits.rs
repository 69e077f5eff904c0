//! Bit extraction helpers

/// Extract `length` bits starting at `start_bit`, MSB-first across the payload
///
/// Bit 0 is the MSB of byte 0, bit 7 its LSB, bit 8 the MSB of byte 1, and so on.
/// The caller must make sure the payload is long enough; bits past the end read
/// as zero.
pub fn extract_msb_first(data: &[u8], start_bit: usize, length: usize) -> u64 {
    let mut result: u64 = 0;

    for i in 0..length {
        let bit_pos = start_bit + i;
        let byte_idx = bit_pos / 8;
        let bit_in_byte = 7 - (bit_pos % 8);

        result <<= 1;
        if let Some(byte) = data.get(byte_idx) {
            result |= ((byte >> bit_in_byte) & 0x01) as u64;
        }
    }

    result
}

/// Split a packed BCD byte into its two ASCII digits (tens, units)
///
/// No range check: a nibble above 9 yields the character after `'9'`.
pub fn bcd_digits(byte: u8) -> [char; 2] {
    [
        char::from(b'0' + (byte >> 4)),
        char::from(b'0' + (byte & 0x0f)),
    ]
}

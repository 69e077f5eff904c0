//! Dashboard clock decoder

use super::bits::bcd_digits;
use super::{or_empty, require};
use crate::types::{Result, SignalValue};

/// Bytes in a clock frame: hours, minutes, day, month, year, trailing byte
const CLOCK_LEN: usize = 6;

/// Render the packed-BCD clock frame as `HH:MM DD/MM/YY`
pub fn decode_date(data: &[u8]) -> SignalValue {
    or_empty("date", try_decode_date(data))
}

fn try_decode_date(data: &[u8]) -> Result<SignalValue> {
    let data = require(data, CLOCK_LEN)?;

    let [h, m, d, mo, y] = [data[0], data[1], data[2], data[3], data[4]].map(bcd_digits);
    let mut text = String::with_capacity(14);
    text.extend(h);
    text.push(':');
    text.extend(m);
    text.push(' ');
    text.extend(d);
    text.push('/');
    text.extend(mo);
    text.push('/');
    text.extend(y);

    Ok(SignalValue::Text(text))
}

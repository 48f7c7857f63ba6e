//! Decoder for the encoded polyline format used by the transit API's shape
//! resources.
//!
//! Each coordinate component is a signed delta in 1e-5 degree units, written
//! as little-endian 5-bit groups offset by 63. Bit `0x20` marks a continuation
//! group and the LSB of the assembled value carries the sign.

use thiserror::Error;

const CHAR_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
const PRECISION: f64 = 1e5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid character {ch:?} at byte {index}")]
    InvalidCharacter { ch: char, index: usize },
    #[error("encoded value truncated at byte {index}")]
    Truncated { index: usize },
    #[error("value at byte {index} overflows 64 bits")]
    Overflow { index: usize },
}

/// Decode an encoded polyline into `[lng, lat]` pairs, in encoded order.
///
/// # Errors
///
/// Returns an error if the input contains a byte outside `?`..=`~`, ends in
/// the middle of a value, ends between a latitude and its longitude, or
/// encodes a value or running total that does not fit in 64 bits.
pub fn decode(encoded: &str) -> Result<Vec<[f64; 2]>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::with_capacity(bytes.len() / 4);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let start = index;
        lat = lat
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow { index: start })?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated { index });
        }
        let start = index;
        lng = lng
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow { index: start })?;

        #[allow(clippy::cast_precision_loss)]
        coordinates.push([lng as f64 / PRECISION, lat as f64 / PRECISION]);
    }

    Ok(coordinates)
}

/// Read one zig-zag varint starting at `index`, advancing past it
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated { index: *index });
        };
        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                ch: char::from(byte),
                index: *index,
            });
        }
        let chunk = u64::from(byte - CHAR_OFFSET);
        let bits = chunk & CHUNK_MASK;
        // Only 4 bits remain at shift 60
        if shift >= 64 || (shift > 59 && bits >> (64 - shift) != 0) {
            return Err(PolylineError::Overflow { index: *index });
        }

        result |= bits << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}

//! Endianness utility functions

/// Encode a u16 as two little-endian bytes
#[inline]
pub fn u16_to_le_bytes(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Decode a little-endian u16 from the first two bytes of `bytes`
///
/// Returns `None` when fewer than two bytes are available.
#[inline]
pub fn u16_from_le_bytes(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
        _ => None,
    }
}

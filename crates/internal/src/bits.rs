//! Bit addressing inside byte strings
//!
//! Bits are numbered MSB-first within each byte: bit `i` of a buffer is
//! `(buf[i / 8] >> (7 - i % 8)) & 1`. Every bit-packed field of the
//! signature format (auxiliary bits, broadcast messages, hash chunks) uses
//! this order.

/// Number of bytes needed to hold `bits` bits
#[inline]
pub const fn num_bytes(bits: usize) -> usize {
    (bits + 7) / 8
}

/// Smallest `k` with `2^k >= x`; zero for `x <= 1`
#[inline]
pub const fn ceil_log2(x: usize) -> usize {
    if x <= 1 {
        return 0;
    }
    (usize::BITS - (x - 1).leading_zeros()) as usize
}

/// Read bit `index`
#[inline]
pub fn get_bit(bytes: &[u8], index: usize) -> u8 {
    (bytes[index / 8] >> (7 - (index % 8))) & 1
}

/// Write bit `index`
#[inline]
pub fn set_bit(bytes: &mut [u8], index: usize, value: u8) {
    let shift = 7 - (index % 8);
    let byte = &mut bytes[index / 8];
    *byte = (*byte & !(1 << shift)) | ((value & 1) << shift);
}

/// XOR of all bits of a word
#[inline]
pub fn parity64(word: u64) -> u8 {
    (word.count_ones() & 1) as u8
}

/// True if every bit at position `>= bit_len` in `bytes` is zero
pub fn padding_is_zero(bytes: &[u8], bit_len: usize) -> bool {
    (bit_len..bytes.len() * 8).all(|i| get_bit(bytes, i) == 0)
}

//! Bit manipulation on 64-bit words.
//!
//! These are the only primitives the packed stores use to read and write their buffers.
#![cfg(target_pointer_width = "64")]

use crate::error::{Error, Result};

/// The number of bits in a machine word.
pub const WORD_LEN: usize = 64;

const ONES_STEP_4: u64 = 0x1111_1111_1111_1111;
const ONES_STEP_8: u64 = 0x0101_0101_0101_0101;
const MSBS_STEP_8: u64 = 0x80 * ONES_STEP_8;

/// Returns a mask of the lowest `k` bits, saturating at [`WORD_LEN`].
#[inline(always)]
pub const fn mask(k: usize) -> u64 {
    if k < WORD_LEN {
        (1 << k) - 1
    } else {
        u64::MAX
    }
}

/// Extracts the `k` bits of `word` starting at bit `pos`, right-aligned.
///
/// # Arguments
///
/// - `word`: Source word.
/// - `pos`: Starting bit position.
/// - `k`: Number of bits extracted.
///
/// `pos + k` must be no greater than [`WORD_LEN`].
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::extract;
///
/// assert_eq!(extract(0b1011_0100, 2, 4), 0b1101);
/// assert_eq!(extract(u64::MAX, 0, 64), u64::MAX);
/// assert_eq!(extract(0b1, 0, 0), 0);
/// ```
#[inline(always)]
pub const fn extract(word: u64, pos: usize, k: usize) -> u64 {
    debug_assert!(pos + k <= WORD_LEN);
    if k == 0 {
        return 0;
    }
    (word >> pos) & mask(k)
}

/// Returns the zero-based position of the least significant set bit.
///
/// # Errors
///
/// [`Error::Domain`] is returned if `word` is zero.
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::least_set_bit;
///
/// assert_eq!(least_set_bit(0b1000).unwrap(), 3);
/// assert!(least_set_bit(0).is_err());
/// ```
#[inline(always)]
pub fn least_set_bit(word: u64) -> Result<usize> {
    lsb(word).ok_or_else(|| Error::Domain("least_set_bit is undefined on a zero word.".to_string()))
}

/// Returns `word` masked to its lowest `k` bits.
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::low_bits_of;
///
/// assert_eq!(low_bits_of(0b1011_0111, 4), 0b0111);
/// assert_eq!(low_bits_of(42, 0), 0);
/// ```
#[inline(always)]
pub const fn low_bits_of(word: u64, k: usize) -> u64 {
    word & mask(k)
}

/// Overwrites bits `[pos, pos + k)` of `word` with the lowest `k` bits of `val`.
///
/// Bits outside the range are unchanged.
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::replace;
///
/// assert_eq!(replace(0b1111_1111, 2, 3, 0b010), 0b1110_1011);
/// assert_eq!(replace(0, 60, 4, 0xFF), 0xF << 60);
/// ```
#[inline(always)]
pub const fn replace(word: u64, pos: usize, k: usize, val: u64) -> u64 {
    debug_assert!(pos + k <= WORD_LEN);
    if k == 0 {
        return word;
    }
    let m = mask(k) << pos;
    (word & !m) | ((val << pos) & m)
}

/// Returns `word` with bit `k` forced to one.
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::set_bit;
///
/// assert_eq!(set_bit(0b0001, 3), 0b1001);
/// assert_eq!(set_bit(0b1001, 3), 0b1001);
/// ```
#[inline(always)]
pub const fn set_bit(word: u64, k: usize) -> u64 {
    debug_assert!(k < WORD_LEN);
    word | (1 << k)
}

/// Returns the number of set bits.
#[inline(always)]
pub const fn popcount(word: u64) -> usize {
    word.count_ones() as usize
}

/// Returns the position of the least significant set bit, or [`None`] if `word` is zero.
#[inline(always)]
pub const fn lsb(word: u64) -> Option<usize> {
    if word != 0 {
        Some(word.trailing_zeros() as usize)
    } else {
        None
    }
}

/// Returns the position of the `k`-th (zero-based) set bit in `word`,
/// or [`None`] if `word` has no more than `k` set bits.
///
/// The byte containing the answer is located with broadword byte sums,
/// then the remaining ranks are cleared inside that byte.
///
/// # Examples
///
/// ```
/// use eliasfano::broadword::select_in_word;
///
/// assert_eq!(select_in_word(0b1010_0110, 0), Some(1));
/// assert_eq!(select_in_word(0b1010_0110, 3), Some(7));
/// assert_eq!(select_in_word(0b1010_0110, 4), None);
/// assert_eq!(select_in_word(1 << 63, 0), Some(63));
/// ```
#[inline(always)]
pub fn select_in_word(word: u64, k: usize) -> Option<usize> {
    if popcount(word) <= k {
        return None;
    }
    let byte_sums = bytes_sum(word);
    let k_step_8 = k as u64 * ONES_STEP_8;
    let geq_k_step_8 = ((k_step_8 | MSBS_STEP_8) - byte_sums) & MSBS_STEP_8;
    let place = popcount(geq_k_step_8) * 8;
    let byte_rank = k as u64 - (((byte_sums << 8) >> place) & 0xFF);
    let mut byte = (word >> place) & 0xFF;
    for _ in 0..byte_rank {
        byte &= byte - 1;
    }
    lsb(byte).map(|p| place + p)
}

/// Cumulative popcounts of the bytes of `word`: byte `j` of the result holds
/// the number of set bits in bytes `0..=j`.
#[inline(always)]
const fn bytes_sum(word: u64) -> u64 {
    let mut s = word - ((word & (0xA * ONES_STEP_4)) >> 1);
    s = (s & (3 * ONES_STEP_4)) + ((s >> 2) & (3 * ONES_STEP_4));
    s = (s + (s >> 4)) & (0x0F * ONES_STEP_8);
    s.wrapping_mul(ONES_STEP_8)
}

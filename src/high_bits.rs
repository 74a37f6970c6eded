//! Unary-coded bit vector holding the high parts of Elias-Fano encoded values.
#![cfg(target_pointer_width = "64")]

pub mod select_index;

use std::io::{Read, Write};

use anyhow::Result;

use crate::bit_vector::{unary::UnaryIter, BitVector};
use crate::broadword::{self, WORD_LEN};
use crate::error::Error;
use crate::Serializable;
use select_index::SelectIndex;

/// Bit vector in which the `i`-th set bit sits at position $`h_i + i`$
/// for a non-decreasing sequence of high parts $`h_0 \leq h_1 \leq \dots`$.
///
/// The zeros preceding the `i`-th set bit are the unary code of $`h_i`$, so the high part is
/// recovered as `select(i) - i`.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::HighBitsBuilder;
///
/// // High parts 0, 1, 1, 3.
/// let mut hbb = HighBitsBuilder::new(8);
/// for (i, h) in [0, 1, 1, 3].into_iter().enumerate() {
///     hbb.push(h + i)?;
/// }
/// let hb = hbb.build();
///
/// assert_eq!(hb.num_ones(), 4);
/// assert_eq!(hb.select(2), Some(3));
/// assert_eq!(hb.select(3), Some(6));
/// assert_eq!(hb.select_linear(3), Some(6));
/// assert_eq!(hb.select(4), None);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct HighBits {
    bits: BitVector,
    index: SelectIndex,
}

impl HighBits {
    fn new(bits: BitVector) -> Self {
        let index = SelectIndex::new(&bits);
        Self { bits, index }
    }

    /// Returns the position of the `k`-th set bit, or [`None`] if `self.num_ones() <= k`.
    ///
    /// # Complexity
    ///
    /// Constant, through the select index.
    #[inline(always)]
    pub fn select(&self, k: usize) -> Option<usize> {
        self.index.select(&self.bits, k)
    }

    /// Returns the position of the `k`-th set bit by scanning words from the beginning,
    /// or [`None`] if `self.num_ones() <= k`.
    ///
    /// This is the reference for [`Self::select`] and does not use the index.
    ///
    /// # Complexity
    ///
    /// Linear
    pub fn select_linear(&self, k: usize) -> Option<usize> {
        let mut cur_rank = 0;
        for (wpos, &word) in self.bits.words().iter().enumerate() {
            let cnt = broadword::popcount(word);
            if k < cur_rank + cnt {
                let mut word = word;
                for _ in 0..k - cur_rank {
                    word &= word - 1;
                }
                return broadword::least_set_bit(word)
                    .ok()
                    .map(|p| wpos * WORD_LEN + p);
            }
            cur_rank += cnt;
        }
        None
    }

    /// Returns the number of words [`Self::select`] inspects to answer `k`,
    /// or [`None`] if `self.num_ones() <= k`.
    ///
    /// It never exceeds [`select_index::MAX_SCAN_WORDS`].
    pub fn select_cost(&self, k: usize) -> Option<usize> {
        self.index
            .select_with_cost(&self.bits, k)
            .map(|(_, cost)| cost)
    }

    /// Creates an iterator for enumerating positions of set bits, starting at bit position `pos`.
    pub fn unary_iter(&self, pos: usize) -> UnaryIter {
        self.bits.unary_iter(pos)
    }

    /// Gets the number of bits.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.bits.len()
    }

    /// Checks if the vector has no bit.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Gets the number of set bits.
    #[inline(always)]
    pub const fn num_ones(&self) -> usize {
        self.index.num_ones()
    }

    /// Returns the underlying bits.
    pub const fn bit_vector(&self) -> &BitVector {
        &self.bits
    }
}

impl Serializable for HighBits {
    /// Only the bits are written; the select index is rebuilt on load.
    fn serialize_into<W: Write>(&self, writer: W) -> Result<usize> {
        self.bits.serialize_into(writer)
    }

    fn deserialize_from<R: Read>(reader: R) -> Result<Self> {
        BitVector::deserialize_from(reader).map(Self::new)
    }

    fn size_in_bytes(&self) -> usize {
        self.bits.size_in_bytes()
    }
}

/// Builder for [`HighBits`], filled with strictly increasing bit positions.
pub struct HighBitsBuilder {
    bits: BitVector,
    next: usize,
}

impl HighBitsBuilder {
    /// Creates a builder for a vector of `len` bits, all unset.
    pub fn new(len: usize) -> Self {
        Self {
            bits: BitVector::from_bit(false, len),
            next: 0,
        }
    }

    /// Sets the bit at `pos`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if
    ///
    /// - `pos` is no greater than the last pushed position, or
    /// - `pos` is no less than the length given to [`Self::new()`].
    pub fn push(&mut self, pos: usize) -> Result<(), Error> {
        if pos < self.next {
            return Err(Error::InvalidInput(format!(
                "pos must be greater than the last one {}, but got {pos}.",
                self.next - 1
            )));
        }
        self.bits.set_bit(pos, true).map_err(|e| Error::InvalidInput(e.to_string()))?;
        self.next = pos + 1;
        Ok(())
    }

    /// Freezes the bits and builds the select index.
    pub fn build(self) -> HighBits {
        HighBits::new(self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn gen_high_bits(n: usize, max_gap: usize, seed: u64) -> (HighBits, Vec<usize>) {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(n);
        let mut pos = 0;
        for _ in 0..n {
            pos += rng.gen_range(0..=max_gap);
            positions.push(pos);
            pos += 1;
        }
        let mut hbb = HighBitsBuilder::new(pos + 1);
        for &p in &positions {
            hbb.push(p).unwrap();
        }
        (hbb.build(), positions)
    }

    #[test]
    fn test_push_not_increasing() {
        let mut hbb = HighBitsBuilder::new(10);
        hbb.push(3).unwrap();
        let e = hbb.push(3);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: pos must be greater than the last one 3, but got 3.".to_string())
        );
    }

    #[test]
    fn test_push_oob() {
        let mut hbb = HighBitsBuilder::new(10);
        let e = hbb.push(10);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: pos must be no greater than self.len()=10, but got 10."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_select_matches_linear() {
        for (seed, max_gap) in [(1, 0), (2, 3), (3, 100), (4, 5000)] {
            let (hb, positions) = gen_high_bits(3000, max_gap, seed);
            assert_eq!(hb.num_ones(), positions.len());
            for (k, &p) in positions.iter().enumerate() {
                assert_eq!(hb.select(k), Some(p));
                assert_eq!(hb.select_linear(k), Some(p));
                assert_eq!(hb.bit_vector().get_bit(p), Some(true));
            }
            assert_eq!(hb.select(positions.len()), None);
            assert_eq!(hb.select_linear(positions.len()), None);
        }
    }

    #[test]
    fn test_select_cost_bounded() {
        let (hb, positions) = gen_high_bits(10000, 2, 5);
        let words = hb.bit_vector().num_words();
        for k in 0..positions.len() {
            let cost = hb.select_cost(k).unwrap();
            assert!(cost <= select_index::MAX_SCAN_WORDS);
            assert!(cost <= 64, "cost {cost} of {words} words for k={k}");
        }
    }

    #[test]
    fn test_serialize() {
        let mut bytes = vec![];
        let (hb, _) = gen_high_bits(500, 10, 6);
        let size = hb.serialize_into(&mut bytes).unwrap();
        let other = HighBits::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(hb, other);
        assert_eq!(size, bytes.len());
        assert_eq!(size, hb.size_in_bytes());
    }
}

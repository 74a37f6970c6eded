//! Iterator on EliasFanoArray.
#![cfg(target_pointer_width = "64")]

use std::iter::FusedIterator;

use super::join;
use crate::bit_vector::unary::UnaryIter;
use crate::EliasFanoArray;

/// Iterator for enumerating integers stored in [`EliasFanoArray`], created by [`EliasFanoArray::iter`].
///
/// High parts are decoded by walking the set bits of the high bits sequentially,
/// so a full traversal costs $`O(n + u / 2^l)`$ instead of $`n`$ selects.
pub struct Iter<'a> {
    efa: &'a EliasFanoArray,
    k: usize,
    high_iter: Option<UnaryIter<'a>>,
}

impl<'a> Iter<'a> {
    /// Creates an iterator for enumerating integers from position `k`.
    pub fn new(efa: &'a EliasFanoArray, k: usize) -> Self {
        let high_iter = efa
            .high_bits()
            .select(k)
            .map(|pos| efa.high_bits().unary_iter(pos));
        Self { efa, k, high_iter }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.efa.len() <= self.k {
            self.high_iter = None;
        }
        let high = self.high_iter.as_mut()?.next()?;
        let low = self.efa.low_bits().get(self.k)?;
        let raw = join((high - self.k) as u64, low, self.efa.low_len());
        self.k += 1;
        Some(self.efa.shift_down(raw))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = if self.high_iter.is_some() {
            self.efa.len().saturating_sub(self.k)
        } else {
            0
        };
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

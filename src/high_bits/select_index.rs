//! Constant-time select index over the set bits of a [`BitVector`].
#![cfg(target_pointer_width = "64")]

use crate::bit_vector::BitVector;
use crate::broadword::{self, WORD_LEN};

const BLOCK_LEN: usize = 1024;
const SUBBLOCK_LEN: usize = 32;
const MAX_IN_BLOCK_DISTANCE: usize = 1 << 16;

/// Upper bound on the number of words a single [`SelectIndex::select`] inspects.
pub const MAX_SCAN_WORDS: usize = MAX_IN_BLOCK_DISTANCE / WORD_LEN + 1;

/// Dense-array select index, kept apart from the bit vector it was built on.
///
/// Set bits are grouped in blocks of 1024. A block spanning fewer than $`2^{16}`$ bits
/// records its first position and a 16-bit offset every 32 set bits; a wider block
/// stores all of its positions explicitly. A query therefore scans at most
/// $`2^{16}`$ bits, whatever the length of the vector.
///
/// # Credits
///
/// Okanohara and Sadakane's darray, as in
/// [succinct::darray](https://github.com/ot/succinct/blob/master/darray.hpp).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SelectIndex {
    block_inventory: Vec<isize>,
    subblock_inventory: Vec<u16>,
    overflow_positions: Vec<usize>,
    num_positions: usize,
}

impl SelectIndex {
    /// Builds the index over the set bits of `bv`.
    pub fn new(bv: &BitVector) -> Self {
        let mut cur_block_positions = Vec::with_capacity(BLOCK_LEN);
        let mut this = Self::default();

        for pos in bv.unary_iter(0) {
            if bv.len() <= pos {
                break;
            }
            cur_block_positions.push(pos);
            if cur_block_positions.len() == BLOCK_LEN {
                this.flush_cur_block(&mut cur_block_positions);
            }
            this.num_positions += 1;
        }
        if !cur_block_positions.is_empty() {
            this.flush_cur_block(&mut cur_block_positions);
        }

        this.block_inventory.shrink_to_fit();
        this.subblock_inventory.shrink_to_fit();
        this.overflow_positions.shrink_to_fit();
        this
    }

    /// Returns the position of the `k`-th set bit of `bv`, or [`None`] if `self.num_ones() <= k`.
    ///
    /// `bv` must be the vector the index was built on.
    ///
    /// # Complexity
    ///
    /// Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use eliasfano::{BitVector, high_bits::select_index::SelectIndex};
    ///
    /// let bv = BitVector::from_bits([true, false, false, true]);
    /// let si = SelectIndex::new(&bv);
    ///
    /// assert_eq!(si.select(&bv, 0), Some(0));
    /// assert_eq!(si.select(&bv, 1), Some(3));
    /// assert_eq!(si.select(&bv, 2), None);
    /// ```
    #[inline(always)]
    pub fn select(&self, bv: &BitVector, k: usize) -> Option<usize> {
        self.select_with_cost(bv, k).map(|(pos, _)| pos)
    }

    /// Same as [`Self::select`], also returning the number of words inspected.
    pub(crate) fn select_with_cost(&self, bv: &BitVector, k: usize) -> Option<(usize, usize)> {
        if self.num_ones() <= k {
            return None;
        }

        let block_pos = self.block_inventory[k / BLOCK_LEN];
        if block_pos < 0 {
            let overflow_pos = (-block_pos - 1) as usize;
            return Some((self.overflow_positions[overflow_pos + (k % BLOCK_LEN)], 0));
        }

        let mut reminder = k % SUBBLOCK_LEN;
        let start_pos =
            block_pos as usize + self.subblock_inventory[k / SUBBLOCK_LEN] as usize;
        if reminder == 0 {
            return Some((start_pos, 0));
        }

        let words = bv.words();
        let mut word_idx = start_pos / WORD_LEN;
        let mut word = *words.get(word_idx)? & (u64::MAX << (start_pos % WORD_LEN));
        let mut cost = 1;
        loop {
            let popcnt = broadword::popcount(word);
            if reminder < popcnt {
                break;
            }
            reminder -= popcnt;
            word_idx += 1;
            word = *words.get(word_idx)?;
            cost += 1;
        }
        let sel = WORD_LEN * word_idx + broadword::select_in_word(word, reminder)?;
        Some((sel, cost))
    }

    /// Gets the number of indexed positions.
    #[inline(always)]
    pub const fn num_ones(&self) -> usize {
        self.num_positions
    }

    fn flush_cur_block(&mut self, cur_block_positions: &mut Vec<usize>) {
        let (first, last) = match (cur_block_positions.first(), cur_block_positions.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return,
        };
        if last - first < MAX_IN_BLOCK_DISTANCE {
            self.block_inventory.push(first as isize);
            for i in (0..cur_block_positions.len()).step_by(SUBBLOCK_LEN) {
                self.subblock_inventory
                    .push((cur_block_positions[i] - first) as u16);
            }
        } else {
            self.block_inventory
                .push(-((self.overflow_positions.len() + 1) as isize));
            self.overflow_positions
                .extend_from_slice(cur_block_positions);
            for _ in (0..cur_block_positions.len()).step_by(SUBBLOCK_LEN) {
                self.subblock_inventory.push(u16::MAX);
            }
        }
        cur_block_positions.clear();
    }
}

//! Unary iterator on bit vectors.
use crate::bit_vector::BitVector;
use crate::broadword::{self, WORD_LEN};

/// Iterator for enumerating positions of set bits, created by [`BitVector::unary_iter`].
pub struct UnaryIter<'a> {
    bv: &'a BitVector,
    pos: usize,
    buf: u64,
}

impl<'a> UnaryIter<'a> {
    /// Creates the iterator from the given bit position.
    pub fn new(bv: &'a BitVector, pos: usize) -> Self {
        let buf = bv
            .words()
            .get(pos / WORD_LEN)
            .map_or(0, |&w| w & u64::MAX.wrapping_shl((pos % WORD_LEN) as u32));
        Self { bv, pos, buf }
    }
}

impl Iterator for UnaryIter<'_> {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = self.buf;
        while buf == 0 {
            self.pos += WORD_LEN;
            let word_pos = self.pos / WORD_LEN;
            if self.bv.num_words() <= word_pos {
                return None;
            }
            buf = self.bv.words()[word_pos];
        }
        let pos_in_word = broadword::lsb(buf)?;
        self.buf = buf & (buf - 1); // clear LSB
        self.pos = (self.pos & !(WORD_LEN - 1)) + pos_in_word;
        Some(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_all_zeros() {
        let bv = BitVector::from_bit(false, 100);
        let mut it = bv.unary_iter(0);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_next_empty() {
        let bv = BitVector::new();
        let mut it = bv.unary_iter(0);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_next_across_words() {
        let bv = BitVector::from_bits((0..300).map(|i| i == 3 || i == 64 || i == 299));
        let positions: Vec<usize> = bv.unary_iter(4).collect();
        assert_eq!(positions, vec![64, 299]);
    }
}

//! Plain bit vector that the packed stores are laid on.
#![cfg(target_pointer_width = "64")]

pub mod unary;

use std::io::{Read, Write};

use anyhow::{anyhow, Result};

use crate::broadword::{self, WORD_LEN};
use crate::serial::varint;
use crate::Serializable;
use unary::UnaryIter;

/// Fixed-length bit vector in a plain word-packed format.
///
/// The length is decided at creation; bits can be rewritten but not appended,
/// which is all the encoders need.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::BitVector;
///
/// let mut bv = BitVector::from_bit(false, 70);
/// bv.set_bit(1, true)?;
/// bv.set_bits(62, 0b101, 3)?;
///
/// assert_eq!(bv.get_bit(1), Some(true));
/// assert_eq!(bv.get_bits(62, 3), Some(0b101));
/// assert_eq!(bv.get_bit(70), None);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Clone, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// Creates a new empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new vector that stores `len` bits,
    /// where each bit is initialized by `bit`.
    ///
    /// # Arguments
    ///
    ///  - `bit`: Bit value used for intinialization.
    ///  - `len`: Number of bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use eliasfano::BitVector;
    ///
    /// let bv = BitVector::from_bit(true, 5);
    /// assert_eq!(bv.len(), 5);
    /// assert_eq!(bv.get_bits(0, 5), Some(0b11111));
    /// assert_eq!(bv.words(), &[0b11111]);
    /// ```
    pub fn from_bit(bit: bool, len: usize) -> Self {
        let word = if bit { u64::MAX } else { 0 };
        let mut words = vec![word; Self::words_for(len)];
        let shift = len % WORD_LEN;
        if shift != 0 {
            if let Some(last) = words.last_mut() {
                *last = broadword::low_bits_of(*last, shift);
            }
        }
        Self { words, len }
    }

    /// Creates a new vector from input bit stream `bits`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eliasfano::BitVector;
    ///
    /// let bv = BitVector::from_bits([false, true, false]);
    /// assert_eq!(bv.len(), 3);
    /// assert_eq!(bv.get_bit(1), Some(true));
    /// ```
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let bits: Vec<bool> = bits.into_iter().collect();
        let mut words = vec![0; Self::words_for(bits.len())];
        for (i, _) in bits.iter().enumerate().filter(|(_, &b)| b) {
            let w = &mut words[i / WORD_LEN];
            *w = broadword::set_bit(*w, i % WORD_LEN);
        }
        Self {
            words,
            len: bits.len(),
        }
    }

    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    #[inline(always)]
    pub fn get_bit(&self, pos: usize) -> Option<bool> {
        if pos < self.len {
            let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
            Some(broadword::extract(self.words[block], shift, 1) == 1)
        } else {
            None
        }
    }

    /// Updates the `pos`-th bit to `bit`.
    ///
    /// # Errors
    ///
    /// An error is returned if `self.len() <= pos`.
    #[inline(always)]
    pub fn set_bit(&mut self, pos: usize, bit: bool) -> Result<()> {
        if self.len() <= pos {
            return Err(anyhow!(
                "pos must be no greater than self.len()={}, but got {pos}.",
                self.len()
            ));
        }
        let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
        let w = &mut self.words[block];
        *w = if bit {
            broadword::set_bit(*w, shift)
        } else {
            broadword::replace(*w, shift, 1, 0)
        };
        Ok(())
    }

    /// Returns the `len` bits starting at the `pos`-th bit, or [`None`] if
    ///
    ///  - `len` is greater than [`WORD_LEN`], or
    ///  - `self.len() < pos + len`.
    ///
    /// The chunk may straddle two words.
    ///
    /// # Examples
    ///
    /// ```
    /// use eliasfano::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, false, true, false]);
    /// assert_eq!(bv.get_bits(1, 2), Some(0b10));
    /// assert_eq!(bv.get_bits(2, 3), None);
    /// ```
    #[inline(always)]
    pub fn get_bits(&self, pos: usize, len: usize) -> Option<u64> {
        if WORD_LEN < len || self.len() < pos + len {
            return None;
        }
        if len == 0 {
            return Some(0);
        }
        let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
        let bits = if shift + len <= WORD_LEN {
            broadword::extract(self.words[block], shift, len)
        } else {
            let lo_len = WORD_LEN - shift;
            let lo = broadword::extract(self.words[block], shift, lo_len);
            let hi = broadword::extract(self.words[block + 1], 0, len - lo_len);
            lo | (hi << lo_len)
        };
        Some(bits)
    }

    /// Updates the `len` bits starting at the `pos`-th bit to `bits`.
    ///
    /// Bits of `bits` above the lowest `len` are ignored.
    ///
    /// # Errors
    ///
    /// An error is returned if
    ///
    ///  - `len` is greater than [`WORD_LEN`], or
    ///  - `self.len() < pos + len`.
    #[inline(always)]
    pub fn set_bits(&mut self, pos: usize, bits: u64, len: usize) -> Result<()> {
        if WORD_LEN < len {
            return Err(anyhow!(
                "len must be no greater than {WORD_LEN}, but got {len}."
            ));
        }
        if self.len() < pos + len {
            return Err(anyhow!(
                "pos+len must be no greater than self.len()={}, but got {}.",
                self.len(),
                pos + len
            ));
        }
        if len == 0 {
            return Ok(());
        }
        let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
        let stored = (WORD_LEN - shift).min(len);
        self.words[block] = broadword::replace(self.words[block], shift, stored, bits);
        if stored < len {
            self.words[block + 1] =
                broadword::replace(self.words[block + 1], 0, len - stored, bits >> stored);
        }
        Ok(())
    }

    /// Creates an iterator for enumerating positions of set bits, starting at bit position `pos`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eliasfano::BitVector;
    ///
    /// let bv = BitVector::from_bits([true, true, false, true]);
    /// let mut it = bv.unary_iter(1);
    /// assert_eq!(it.next(), Some(1));
    /// assert_eq!(it.next(), Some(3));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn unary_iter(&self, pos: usize) -> UnaryIter {
        UnaryIter::new(self, pos)
    }

    /// Returns the number of bits stored.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the vector is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the slice of raw words.
    #[inline(always)]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Gets the number of words.
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Returns the number of bits set, counted word by word.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|&w| broadword::popcount(w)).sum()
    }

    /// Writes the bits as `ceil(len / 8)` little-endian bytes, without any header.
    pub(crate) fn write_packed<W: Write>(&self, mut writer: W) -> Result<usize> {
        let num_bytes = Self::bytes_for(self.len);
        let mut written = 0;
        for w in &self.words {
            let bytes = w.to_le_bytes();
            let take = (num_bytes - written).min(bytes.len());
            writer.write_all(&bytes[..take])?;
            written += take;
        }
        Ok(written)
    }

    /// Reads `len` bits written by [`Self::write_packed`].
    ///
    /// Padding bits in the last byte must be zero.
    pub(crate) fn read_packed<R: Read>(mut reader: R, len: usize) -> Result<Self> {
        let mut bytes = vec![0; Self::bytes_for(len)];
        reader.read_exact(&mut bytes)?;
        let words: Vec<u64> = bytes
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();
        let shift = len % WORD_LEN;
        if shift != 0 {
            if let Some(&last) = words.last() {
                if broadword::low_bits_of(last, shift) != last {
                    return Err(anyhow!("padding bits past len={len} must be unset."));
                }
            }
        }
        Ok(Self { words, len })
    }

    /// Returns the number of bytes [`Self::write_packed`] produces.
    #[inline(always)]
    pub(crate) const fn packed_size(&self) -> usize {
        Self::bytes_for(self.len)
    }

    #[inline(always)]
    const fn words_for(n: usize) -> usize {
        (n + WORD_LEN - 1) / WORD_LEN
    }

    #[inline(always)]
    const fn bytes_for(n: usize) -> usize {
        (n + 7) / 8
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits: String = (0..self.len())
            .map(|i| match self.get_bit(i) {
                Some(true) => '1',
                _ => '0',
            })
            .collect();
        f.debug_struct("BitVector")
            .field("bits", &bits)
            .field("len", &self.len)
            .finish()
    }
}

impl Serializable for BitVector {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = varint::write(&mut writer, self.len as u64)?;
        mem += self.write_packed(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = varint::read_usize(&mut reader)?;
        Self::read_packed(&mut reader, len)
    }

    fn size_in_bytes(&self) -> usize {
        varint::encoded_len(self.len as u64) + self.packed_size()
    }
}

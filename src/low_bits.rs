//! Fixed-width array holding the low parts of Elias-Fano encoded values.
#![cfg(target_pointer_width = "64")]

use std::io::{Read, Write};

use anyhow::Result;

use crate::bit_vector::BitVector;
use crate::broadword::{self, WORD_LEN};
use crate::error::Error;
use crate::serial::varint;
use crate::Serializable;

/// Array of `len` unsigned integers, each stored in exactly `width` bits.
///
/// A width of zero is valid: nothing is allocated and every slot reads as zero.
///
/// # Memory usage
///
/// $`n \cdot w`$ bits for $`n`$ integers of width $`w`$.
///
/// # Examples
///
/// ```
/// use eliasfano::LowBits;
///
/// let lb = LowBits::from_slice(&[5, 1, 7], 3).unwrap();
/// assert_eq!(lb.len(), 3);
/// assert_eq!(lb.width(), 3);
/// assert_eq!(lb.get(0), Some(5));
/// assert_eq!(lb.get(2), Some(7));
/// assert_eq!(lb.get(3), None);
/// ```
#[derive(Default, Clone, PartialEq, Eq)]
pub struct LowBits {
    chunks: BitVector,
    len: usize,
    width: usize,
}

impl LowBits {
    /// Creates a zero-filled array of `len` slots with `width` bits each.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if `width` is greater than [`WORD_LEN`].
    pub fn new(len: usize, width: usize) -> Result<Self, Error> {
        let num_bits = Self::num_bits_for(len, width)?;
        Ok(Self {
            chunks: BitVector::from_bit(false, num_bits),
            len,
            width,
        })
    }

    /// Creates an array from `vals`, each masked to `width` bits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if `width` is greater than [`WORD_LEN`].
    pub fn from_slice(vals: &[u64], width: usize) -> Result<Self, Error> {
        let mut lb = Self::new(vals.len(), width)?;
        for (i, &x) in vals.iter().enumerate() {
            lb.set(i, x)?;
        }
        Ok(lb)
    }

    /// Writes the lowest `self.width()` bits of `val` into slot `pos`.
    ///
    /// Only used while an encoder is being filled.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] is returned if `self.len() <= pos`.
    #[inline(always)]
    pub(crate) fn set(&mut self, pos: usize, val: u64) -> Result<(), Error> {
        if self.len <= pos {
            return Err(Error::OutOfRange {
                index: pos,
                len: self.len,
            });
        }
        if self.width == 0 {
            return Ok(());
        }
        // The slot is inside the buffer, so writing cannot fail.
        self.chunks
            .set_bits(pos * self.width, broadword::low_bits_of(val, self.width), self.width)
            .map_err(|e| Error::Domain(e.to_string()))
    }

    /// Returns the value in slot `pos`, or [`None`] if out of bounds.
    ///
    /// # Complexity
    ///
    /// Constant
    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<u64> {
        if self.len <= pos {
            return None;
        }
        if self.width == 0 {
            return Some(0);
        }
        self.chunks.get_bits(pos * self.width, self.width)
    }

    /// Gets the number of slots.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the array has no slot.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the number of bits per slot.
    #[inline(always)]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the underlying bits.
    pub const fn bit_vector(&self) -> &BitVector {
        &self.chunks
    }

    /// Writes only the packed slots; length and width are left to the caller.
    pub(crate) fn write_packed<W: Write>(&self, writer: W) -> Result<usize> {
        self.chunks.write_packed(writer)
    }

    /// Reads slots written by [`Self::write_packed`].
    pub(crate) fn read_packed<R: Read>(reader: R, len: usize, width: usize) -> Result<Self> {
        let num_bits = Self::num_bits_for(len, width)?;
        let chunks = BitVector::read_packed(reader, num_bits)?;
        Ok(Self { chunks, len, width })
    }

    /// Returns the number of bytes [`Self::write_packed`] produces.
    pub(crate) const fn packed_size(&self) -> usize {
        self.chunks.packed_size()
    }

    fn num_bits_for(len: usize, width: usize) -> Result<usize, Error> {
        if WORD_LEN < width {
            return Err(Error::InvalidInput(format!(
                "width must be in 0..={WORD_LEN}, but got {width}."
            )));
        }
        len.checked_mul(width).ok_or_else(|| {
            Error::InvalidInput(format!("{len} slots of {width} bits overflow usize."))
        })
    }
}

impl std::fmt::Debug for LowBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ints: Vec<u64> = (0..self.len).filter_map(|i| self.get(i)).collect();
        f.debug_struct("LowBits")
            .field("ints", &ints)
            .field("len", &self.len)
            .field("width", &self.width)
            .finish()
    }
}

impl Serializable for LowBits {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = varint::write(&mut writer, self.len as u64)?;
        mem += varint::write(&mut writer, self.width as u64)?;
        mem += self.write_packed(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = varint::read_usize(&mut reader)?;
        let width = varint::read_usize(&mut reader)?;
        Self::read_packed(&mut reader, len, width)
    }

    fn size_in_bytes(&self) -> usize {
        varint::encoded_len(self.len as u64)
            + varint::encoded_len(self.width as u64)
            + self.packed_size()
    }
}

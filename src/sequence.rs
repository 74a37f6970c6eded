//! An interface for handling immutable sorted integer sequences.

use crate::elias_fano_array::iter::Iter;
use crate::error::{Error, Result};
use crate::EliasFanoArray;

/// An interface for handling immutable, non-decreasing integer sequences,
/// whether compressed or plain.
///
/// The implementations for plain slices do not check the ordering,
/// and their [`IntSequence::contains`] scans linearly.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::{EliasFanoArray, IntSequence};
///
/// fn sum<S: IntSequence + ?Sized>(seq: &S) -> i64 {
///     seq.iter_values().sum()
/// }
///
/// let plain = vec![-1, 4, 4, 9];
/// let efa = EliasFanoArray::build(plain.iter().copied(), true)?;
///
/// assert_eq!(sum(&plain), 16);
/// assert_eq!(sum(&efa), 16);
/// assert_eq!(IntSequence::get(&efa, 1)?, 4);
/// # Ok(())
/// # }
/// ```
pub trait IntSequence {
    /// Iterator returned by [`IntSequence::iter_values`].
    type Iter<'a>: Iterator<Item = i64>
    where
        Self: 'a;

    /// Returns the number of integers.
    fn len(&self) -> usize;

    /// Checks if the sequence is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `index`-th integer.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] is returned if `self.len() <= index`.
    fn get(&self, index: usize) -> Result<i64>;

    /// Checks if `value` is stored.
    fn contains(&self, value: i64) -> bool {
        self.iter_values().any(|x| x == value)
    }

    /// Creates an iterator enumerating the integers in order.
    fn iter_values(&self) -> Self::Iter<'_>;
}

impl IntSequence for EliasFanoArray {
    type Iter<'a> = Iter<'a>;

    #[inline(always)]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn get(&self, index: usize) -> Result<i64> {
        self.get(index)
    }

    #[inline(always)]
    fn contains(&self, value: i64) -> bool {
        self.contains(value)
    }

    fn iter_values(&self) -> Self::Iter<'_> {
        self.iter()
    }
}

impl IntSequence for [i64] {
    type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, i64>>;

    #[inline(always)]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn get(&self, index: usize) -> Result<i64> {
        <[i64]>::get(self, index).copied().ok_or(Error::OutOfRange {
            index,
            len: self.len(),
        })
    }

    fn iter_values(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }
}

impl IntSequence for Vec<i64> {
    type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, i64>>;

    #[inline(always)]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn get(&self, index: usize) -> Result<i64> {
        IntSequence::get(self.as_slice(), index)
    }

    fn iter_values(&self) -> Self::Iter<'_> {
        self.iter().copied()
    }
}

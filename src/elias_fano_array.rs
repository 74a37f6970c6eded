//! Immutable Elias-Fano encoded array of non-decreasing integers.
#![cfg(target_pointer_width = "64")]

pub mod iter;

use std::io::{Read, Write};

use anyhow::anyhow;
use num_traits::ToPrimitive;

use crate::broadword::{self, WORD_LEN};
use crate::error::{Error, Result};
use crate::high_bits::{HighBits, HighBitsBuilder};
use crate::low_bits::LowBits;
use crate::serial::varint;
use crate::Serializable;
use iter::Iter;

/// Options controlling how [`EliasFanoArray::build_with()`] treats its input.
///
/// # Examples
///
/// ```
/// use eliasfano::{BuildConfig, EliasFanoArray, Error};
///
/// let config = BuildConfig::default().with_validate_sorted(true);
/// let e = EliasFanoArray::build_with([3, 1], true, &config);
/// assert!(matches!(e, Err(Error::InvalidInput(_))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Checks that a sequence asserted as sorted really is non-decreasing,
    /// before anything is allocated.
    ///
    /// Enabled by default in debug builds.
    pub validate_sorted: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            validate_sorted: cfg!(debug_assertions),
        }
    }
}

impl BuildConfig {
    /// Sets [`Self::validate_sorted`].
    #[must_use]
    pub const fn with_validate_sorted(mut self, yes: bool) -> Self {
        self.validate_sorted = yes;
        self
    }
}

/// Quasi-succinct array of non-decreasing integers through Elias-Fano encoding.
///
/// Each value is shifted by a global offset so that the smallest one is no less than zero,
/// then split into `low_len` low bits, packed in a [`LowBits`],
/// and the remaining high bits, unary-coded in a [`HighBits`].
/// When $`n`$ integers are drawn from a universe $`[0, u)`$,
/// the representation takes $`n \lfloor \lg \frac{u}{n} \rfloor + 3n + o(n)`$ bits of space.
///
/// The array is immutable: it exposes no mutating operation, and can be shared
/// between threads without synchronization.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::EliasFanoArray;
///
/// let efa = EliasFanoArray::build([7, -3, 3, 3, 1], false)?;
///
/// assert_eq!(efa.len(), 5);
/// assert_eq!(efa.offset(), 3);
///
/// assert_eq!(efa.get(0)?, -3);
/// assert_eq!(efa.get(4)?, 7);
/// assert!(efa.get(5).is_err());
///
/// assert!(efa.contains(3));
/// assert!(!efa.contains(5));
///
/// assert_eq!(efa.iter().collect::<Vec<_>>(), vec![-3, 1, 3, 3, 7]);
/// # Ok(())
/// # }
/// ```
///
/// # Credits
///
/// The layout follows [succinct::elias_fano](https://github.com/ot/succinct/blob/master/elias_fano.hpp).
///
/// # References
///
///  - P. Elias, "Efficient storage and retrieval by content and address of static files,"
///    Journal of the ACM, 1974.
///  - R. Fano, "On the number of bits required to implement an associative memory,"
///    Memorandum 61. Computer Structures Group, Project MAC, MIT, 1971.
///  - S. Vigna, "Quasi-succinct indices," In WSDM, 2013.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct EliasFanoArray {
    high_bits: HighBits,
    low_bits: LowBits,
    low_len: usize,
    universe: u128,
    offset: u64,
}

impl EliasFanoArray {
    /// Encodes `sequence` with the default [`BuildConfig`].
    ///
    /// # Arguments
    ///
    /// - `sequence`: Integers to be stored.
    /// - `is_sorted`: Whether `sequence` is already non-decreasing. If `false`, it is sorted first.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if `sequence` is empty,
    /// or if `is_sorted` is `true` but `sequence` decreases somewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([5, 1, 3], false)?;
    /// assert_eq!(efa.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    ///
    /// assert!(EliasFanoArray::build([], false).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn build<I>(sequence: I, is_sorted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        Self::build_with(sequence, is_sorted, &BuildConfig::default())
    }

    /// Encodes `sequence` under `config`.
    ///
    /// When `is_sorted` is `true` and [`BuildConfig::validate_sorted`] is off,
    /// sortedness is not checked upfront. A decreasing sequence is still rejected by the encoder
    /// at the first element it cannot place, so no inconsistent array is ever returned.
    ///
    /// # Errors
    ///
    /// See [`Self::build()`].
    pub fn build_with<I>(sequence: I, is_sorted: bool, config: &BuildConfig) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut sequence: Vec<i64> = sequence.into_iter().collect();
        if sequence.is_empty() {
            return Err(Error::InvalidInput("sequence must not be empty.".to_string()));
        }

        if !is_sorted {
            log::trace!("sorting {} integers", sequence.len());
            sequence.sort_unstable();
        } else if config.validate_sorted {
            if let Some(i) = sequence.windows(2).position(|w| w[1] < w[0]) {
                return Err(Error::InvalidInput(format!(
                    "sequence must be non-decreasing, but got {} followed by {} at position {}.",
                    sequence[i],
                    sequence[i + 1],
                    i + 1
                )));
            }
        } else {
            log::debug!("sortedness of {} integers is not checked", sequence.len());
        }

        let offset = sequence[0].min(0).unsigned_abs();
        let last = shift_up(sequence[sequence.len() - 1], offset)?;
        let mut efb = EliasFanoBuilder::new(u128::from(last) + 1, sequence.len())?.offset(offset);
        for &x in &sequence {
            efb.push(shift_up(x, offset)?)?;
        }
        // The working copy is dropped here; only the packed arrays survive.
        drop(sequence);
        efb.build()
    }

    /// Encodes a slice of any primitive integer type.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`Self::build()`],
    /// [`Error::InvalidInput`] is returned if a value does not fit in [`i64`].
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::from_slice(&[3u32, 10, 4], false)?;
    /// assert_eq!(efa.get(1)?, 4);
    ///
    /// assert!(EliasFanoArray::from_slice(&[u64::MAX], true).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_slice<T>(vals: &[T], is_sorted: bool) -> Result<Self>
    where
        T: ToPrimitive + Copy,
    {
        let vals = vals
            .iter()
            .map(|x| {
                x.to_i64().ok_or_else(|| {
                    Error::InvalidInput("every value must fit in i64.".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::build(vals, is_sorted)
    }

    /// Returns the `index`-th smallest integer.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] is returned if `self.len() <= index`.
    ///
    /// # Complexity
    ///
    /// Constant
    #[inline(always)]
    pub fn get(&self, index: usize) -> Result<i64> {
        if self.len() <= index {
            return Err(Error::OutOfRange {
                index,
                len: self.len(),
            });
        }
        self.get_raw(index)
            .map(|x| self.shift_down(x))
            .ok_or_else(|| Error::Domain(format!("no set bit for index {index} in high bits.")))
    }

    /// Checks if `value` is stored.
    ///
    /// # Complexity
    ///
    /// $`O(\lg n)`$
    #[inline(always)]
    pub fn contains(&self, value: i64) -> bool {
        self.position(value).is_some()
    }

    /// Returns the index of the first occurrence of `value`, or [`None`] if not stored.
    ///
    /// # Complexity
    ///
    /// $`O(\lg n)`$
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([1, 3, 3, 6, 7, 10], true)?;
    ///
    /// assert_eq!(efa.position(3), Some(1));
    /// assert_eq!(efa.position(10), Some(5));
    /// assert_eq!(efa.position(9), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn position(&self, value: i64) -> Option<usize> {
        let raw = self.to_raw(value)?;
        let k = self.lower_bound(raw);
        (self.get_raw(k)? == raw).then_some(k)
    }

    /// Returns the number of stored integers less than `value`.
    ///
    /// # Complexity
    ///
    /// $`O(\lg n)`$
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([1, 3, 3, 7], true)?;
    ///
    /// assert_eq!(efa.rank(-5), 0);
    /// assert_eq!(efa.rank(3), 1);
    /// assert_eq!(efa.rank(4), 3);
    /// assert_eq!(efa.rank(100), 4);
    /// # Ok(())
    /// # }
    /// ```
    pub fn rank(&self, value: i64) -> usize {
        match self.to_raw_clamped(value) {
            RawPos::Below => 0,
            RawPos::At(raw) => self.lower_bound(raw),
            RawPos::Above => self.len(),
        }
    }

    /// Gets the largest stored integer no greater than `value`, or [`None`] if not found.
    ///
    /// # Complexity
    ///
    /// $`O(\lg n)`$
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([1, 3, 3, 7], true)?;
    ///
    /// assert_eq!(efa.predecessor(4), Some(3));
    /// assert_eq!(efa.predecessor(3), Some(3));
    /// assert_eq!(efa.predecessor(0), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn predecessor(&self, value: i64) -> Option<i64> {
        let k = match self.to_raw_clamped(value) {
            RawPos::Below => 0,
            RawPos::At(raw) => self.upper_bound(raw),
            RawPos::Above => self.len(),
        };
        k.checked_sub(1).and_then(|k| self.get(k).ok())
    }

    /// Gets the smallest stored integer no less than `value`, or [`None`] if not found.
    ///
    /// # Complexity
    ///
    /// $`O(\lg n)`$
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([1, 3, 3, 7], true)?;
    ///
    /// assert_eq!(efa.successor(0), Some(1));
    /// assert_eq!(efa.successor(4), Some(7));
    /// assert_eq!(efa.successor(8), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn successor(&self, value: i64) -> Option<i64> {
        self.get(self.rank(value)).ok()
    }

    /// Creates an iterator enumerating the integers in ascending order.
    ///
    /// Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter {
        Iter::new(self, 0)
    }

    /// Creates an iterator enumerating the integers from the `k`-th one.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use eliasfano::EliasFanoArray;
    ///
    /// let efa = EliasFanoArray::build([1, 3, 3, 7], true)?;
    ///
    /// let mut it = efa.iter_from(1);
    /// assert_eq!(it.next(), Some(3));
    /// assert_eq!(it.next(), Some(3));
    /// assert_eq!(it.next(), Some(7));
    /// assert_eq!(it.next(), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter_from(&self, k: usize) -> Iter {
        Iter::new(self, k)
    }

    /// Gets the number of integers.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.high_bits.num_ones()
    }

    /// Checks if the array is empty, which never happens for a built one.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the smallest integer.
    pub fn first(&self) -> Option<i64> {
        self.get(0).ok()
    }

    /// Gets the largest integer.
    pub fn last(&self) -> Option<i64> {
        self.len().checked_sub(1).and_then(|k| self.get(k).ok())
    }

    /// Returns the value added to every integer before encoding,
    /// i.e., the negated minimum if it is negative or zero otherwise.
    #[inline(always)]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the universe, i.e., one past the largest encoded (offset-adjusted) integer.
    #[inline(always)]
    pub const fn universe(&self) -> u128 {
        self.universe
    }

    /// Gets the number of low bits per integer.
    #[inline(always)]
    pub const fn low_len(&self) -> usize {
        self.low_len
    }

    /// Returns the high bits.
    pub const fn high_bits(&self) -> &HighBits {
        &self.high_bits
    }

    /// Returns the low bits.
    pub const fn low_bits(&self) -> &LowBits {
        &self.low_bits
    }

    /// Returns the number of bits of the two packed arrays, excluding the select index.
    pub const fn size_in_bits(&self) -> usize {
        self.high_bits.len() + self.low_bits.bit_vector().len()
    }

    /// `universe - 1`, which always fits in `u64`.
    fn max_universe(&self) -> u64 {
        self.universe.saturating_sub(1) as u64
    }

    /// Decodes the `k`-th offset-adjusted integer.
    #[inline(always)]
    pub(crate) fn get_raw(&self, k: usize) -> Option<u64> {
        let high = (self.high_bits.select(k)? - k) as u64;
        let low = self.low_bits.get(k)?;
        Some(join(high, low, self.low_len))
    }

    #[inline(always)]
    pub(crate) fn shift_down(&self, raw: u64) -> i64 {
        (i128::from(raw) - i128::from(self.offset)) as i64
    }

    fn to_raw(&self, value: i64) -> Option<u64> {
        match self.to_raw_clamped(value) {
            RawPos::At(raw) => Some(raw),
            _ => None,
        }
    }

    fn to_raw_clamped(&self, value: i64) -> RawPos {
        let raw = i128::from(value) + i128::from(self.offset);
        if raw < 0 {
            RawPos::Below
        } else if raw >= self.universe as i128 {
            RawPos::Above
        } else {
            RawPos::At(raw as u64)
        }
    }

    /// Index of the first integer no less than `raw`.
    fn lower_bound(&self, raw: u64) -> usize {
        self.partition_point(|x| x < raw)
    }

    /// Index of the first integer greater than `raw`.
    fn upper_bound(&self, raw: u64) -> usize {
        self.partition_point(|x| x <= raw)
    }

    fn partition_point<P>(&self, pred: P) -> usize
    where
        P: Fn(u64) -> bool,
    {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mi = lo + (hi - lo) / 2;
            match self.get_raw(mi) {
                Some(x) if pred(x) => lo = mi + 1,
                _ => hi = mi,
            }
        }
        lo
    }
}

enum RawPos {
    Below,
    At(u64),
    Above,
}

/// Adds `offset` to `x`, failing if the result leaves `u64`.
fn shift_up(x: i64, offset: u64) -> Result<u64> {
    let raw = i128::from(x) + i128::from(offset);
    u64::try_from(raw).map_err(|_| {
        Error::InvalidInput(format!(
            "{x} is below the smallest value {}; the sequence is not sorted.",
            -i128::from(offset)
        ))
    })
}

/// Checks that every offset-adjusted integer below `universe` decodes into [`i64`].
fn check_decodable(universe: u128, offset: u64) -> std::result::Result<(), String> {
    if offset > 1 << 63 {
        return Err(format!(
            "offset must be no greater than 2^63, but got {offset}."
        ));
    }
    if universe.saturating_sub(1) > u128::from(offset) + i64::MAX as u128 {
        return Err(format!(
            "universe={universe} with offset={offset} decodes integers beyond i64::MAX."
        ));
    }
    Ok(())
}

/// Returns `floor(lg(universe / num_vals))`, or zero if `universe <= num_vals`.
fn low_len_for(universe: u128, num_vals: usize) -> usize {
    let ratio = universe / num_vals.max(1) as u128;
    if ratio == 0 {
        0
    } else {
        127 - ratio.leading_zeros() as usize
    }
}

#[inline(always)]
fn split(x: u64, low_len: usize) -> (u64, u64) {
    let high = x.checked_shr(low_len as u32).unwrap_or(0);
    (high, broadword::low_bits_of(x, low_len))
}

#[inline(always)]
fn join(high: u64, low: u64, low_len: usize) -> u64 {
    high.checked_shl(low_len as u32).unwrap_or(0) | low
}

impl<'a> IntoIterator for &'a EliasFanoArray {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serializable for EliasFanoArray {
    /// Writes `offset`, `len`, `low_len`, and `universe - 1` as varints, then the high bits
    /// (varint bit length and packed bytes), then the packed low bits.
    fn serialize_into<W: Write>(&self, mut writer: W) -> anyhow::Result<usize> {
        let mut mem = varint::write(&mut writer, self.offset)?;
        mem += varint::write(&mut writer, self.len() as u64)?;
        mem += varint::write(&mut writer, self.low_len as u64)?;
        mem += varint::write(&mut writer, self.max_universe())?;
        mem += self.high_bits.serialize_into(&mut writer)?;
        mem += self.low_bits.write_packed(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let offset = varint::read(&mut reader)?;
        let num_vals = varint::read_usize(&mut reader)?;
        let low_len = varint::read_usize(&mut reader)?;
        let universe = u128::from(varint::read(&mut reader)?) + 1;
        if num_vals == 0 {
            return Err(anyhow!("len must not be zero."));
        }
        if WORD_LEN < low_len {
            return Err(anyhow!(
                "low_len must be no greater than {WORD_LEN}, but got {low_len}."
            ));
        }
        check_decodable(universe, offset).map_err(|e| anyhow!(e))?;
        let high_bits = HighBits::deserialize_from(&mut reader)?;
        let num_ones = high_bits.bit_vector().count_ones();
        if num_ones != num_vals {
            return Err(anyhow!(
                "high bits must have len={num_vals} set bits, but got {num_ones}."
            ));
        }
        let low_bits = LowBits::read_packed(&mut reader, num_vals, low_len)?;

        if low_len != low_len_for(universe, num_vals) {
            return Err(anyhow!(
                "low_len={low_len} is inconsistent with universe={universe} and len={num_vals}."
            ));
        }
        let high_len = num_vals + (universe >> low_len) as usize;
        if high_bits.len() != high_len {
            return Err(anyhow!(
                "high bits must have {high_len} bits, but got {}.",
                high_bits.len()
            ));
        }

        let efa = Self {
            high_bits,
            low_bits,
            low_len,
            universe,
            offset,
        };
        let last = efa
            .get_raw(num_vals - 1)
            .ok_or_else(|| anyhow!("the last integer cannot be decoded."))?;
        if universe <= u128::from(last) {
            return Err(anyhow!(
                "the last integer {last} must be less than universe={universe}."
            ));
        }
        Ok(efa)
    }

    fn size_in_bytes(&self) -> usize {
        varint::encoded_len(self.offset)
            + varint::encoded_len(self.len() as u64)
            + varint::encoded_len(self.low_len as u64)
            + varint::encoded_len(self.max_universe())
            + self.high_bits.size_in_bytes()
            + self.low_bits.packed_size()
    }
}

/// Builder for [`EliasFanoArray`] over already offset-adjusted, non-decreasing integers.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::EliasFanoBuilder;
///
/// let mut efb = EliasFanoBuilder::new(8, 4)?;
/// efb.extend([1, 3, 3, 7])?;
/// let efa = efb.build()?;
///
/// assert_eq!(efa.len(), 4);
/// assert_eq!(efa.universe(), 8);
/// assert_eq!(efa.get(3)?, 7);
/// # Ok(())
/// # }
/// ```
pub struct EliasFanoBuilder {
    high_bits: HighBitsBuilder,
    low_bits: LowBits,
    universe: u128,
    num_vals: usize,
    pos: usize,
    last: u64,
    low_len: usize,
    offset: u64,
}

impl EliasFanoBuilder {
    /// Creates a new builder.
    ///
    /// # Arguments
    ///
    /// - `universe`: The (exclusive) upper bound of integers to be pushed.
    /// - `num_vals`: The number of integers that will be pushed (> 0).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if
    ///
    /// - `num_vals` is zero, or
    /// - `universe` is zero or greater than $`2^{64}`$.
    pub fn new(universe: u128, num_vals: usize) -> Result<Self> {
        if num_vals == 0 {
            return Err(Error::InvalidInput("num_vals must not be zero.".to_string()));
        }
        if universe == 0 || universe > 1 << 64 {
            return Err(Error::InvalidInput(format!(
                "universe must be in 1..=2^64, but got {universe}."
            )));
        }
        let low_len = low_len_for(universe, num_vals);
        let high_len = num_vals + (universe >> low_len) as usize;
        Ok(Self {
            high_bits: HighBitsBuilder::new(high_len),
            low_bits: LowBits::new(num_vals, low_len)?,
            universe,
            num_vals,
            pos: 0,
            last: 0,
            low_len,
            offset: 0,
        })
    }

    /// Sets the offset recorded in the built array, subtracted from every decoded integer.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Pushes integer `val` at the end.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if
    ///
    /// - `val` is less than the last one,
    /// - `val` is no less than [`Self::universe()`], or
    /// - [`Self::num_vals()`] integers have already been pushed.
    pub fn push(&mut self, val: u64) -> Result<()> {
        if val < self.last {
            return Err(Error::InvalidInput(format!(
                "val must be no less than the last one {}, but got {val}.",
                self.last
            )));
        }
        if self.universe <= u128::from(val) {
            return Err(Error::InvalidInput(format!(
                "val must be less than self.universe()={}, but got {val}.",
                self.universe
            )));
        }
        if self.num_vals <= self.pos {
            return Err(Error::InvalidInput(format!(
                "the number of pushed integers must not exceed self.num_vals()={}.",
                self.num_vals
            )));
        }

        let (high, low) = split(val, self.low_len);
        self.low_bits.set(self.pos, low)?;
        self.high_bits.push(high as usize + self.pos)?;
        self.last = val;
        self.pos += 1;
        Ok(())
    }

    /// Appends non-decreasing integers at the end.
    ///
    /// # Errors
    ///
    /// See [`Self::push()`].
    pub fn extend<I>(&mut self, vals: I) -> Result<()>
    where
        I: IntoIterator<Item = u64>,
    {
        for x in vals {
            self.push(x)?;
        }
        Ok(())
    }

    /// Builds [`EliasFanoArray`] from the pushed integers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] is returned if
    ///
    /// - fewer than [`Self::num_vals()`] integers were pushed, or
    /// - some integer below [`Self::universe()`] minus the offset would not fit in [`i64`].
    pub fn build(self) -> Result<EliasFanoArray> {
        if self.pos != self.num_vals {
            return Err(Error::InvalidInput(format!(
                "self.num_vals()={} integers must be pushed, but got {}.",
                self.num_vals, self.pos
            )));
        }
        check_decodable(self.universe, self.offset).map_err(Error::InvalidInput)?;
        let efa = EliasFanoArray {
            high_bits: self.high_bits.build(),
            low_bits: self.low_bits,
            low_len: self.low_len,
            universe: self.universe,
            offset: self.offset,
        };
        log::debug!(
            "encoded {} integers: universe={}, low_len={}, offset={}, high_bits={} bits, low_bits={} bits",
            efa.len(),
            efa.universe,
            efa.low_len,
            efa.offset,
            efa.high_bits.len(),
            efa.low_bits.bit_vector().len()
        );
        Ok(efa)
    }

    /// Returns the universe, i.e., the (exclusive) upper bound of possible integers.
    #[inline(always)]
    pub const fn universe(&self) -> u128 {
        self.universe
    }

    /// Returns the number of integers that can be stored.
    #[inline(always)]
    pub const fn num_vals(&self) -> usize {
        self.num_vals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn gen_random_ints(len: usize, min: i64, max: i64, seed: u64) -> Vec<i64> {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(min..=max)).collect()
    }

    fn test_access(vals: &[i64], efa: &EliasFanoArray) {
        let mut sorted = vals.to_vec();
        sorted.sort_unstable();
        assert_eq!(efa.len(), sorted.len());
        for (i, &x) in sorted.iter().enumerate() {
            assert_eq!(efa.get(i).unwrap(), x);
        }
        assert_eq!(efa.iter().collect::<Vec<_>>(), sorted);
        assert_eq!(
            efa.get(sorted.len()),
            Err(Error::OutOfRange {
                index: sorted.len(),
                len: sorted.len()
            })
        );
    }

    fn test_search(vals: &[i64], efa: &EliasFanoArray, queries: &[i64]) {
        let mut sorted = vals.to_vec();
        sorted.sort_unstable();
        for &q in queries {
            assert_eq!(efa.contains(q), sorted.contains(&q), "contains({q})");
            let rank = sorted.iter().filter(|&&x| x < q).count();
            assert_eq!(efa.rank(q), rank, "rank({q})");
            let pred = sorted.iter().rev().find(|&&x| x <= q).copied();
            assert_eq!(efa.predecessor(q), pred, "predecessor({q})");
            let succ = sorted.iter().find(|&&x| x >= q).copied();
            assert_eq!(efa.successor(q), succ, "successor({q})");
            let pos = sorted.iter().position(|&x| x == q);
            assert_eq!(efa.position(q), pos, "position({q})");
        }
    }

    #[test]
    fn test_empty() {
        let e = EliasFanoArray::build([], false);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: sequence must not be empty.".to_string())
        );
    }

    #[test]
    fn test_unsorted_validated() {
        let config = BuildConfig::default().with_validate_sorted(true);
        let e = EliasFanoArray::build_with([1, 4, 2], true, &config);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: sequence must be non-decreasing, but got 4 followed by 2 at position 2."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_unsorted_unvalidated() {
        let config = BuildConfig::default().with_validate_sorted(false);
        let e = EliasFanoArray::build_with([1, 4, 2], true, &config);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: val must be less than self.universe()=3, but got 4.".to_string())
        );
        let e = EliasFanoArray::build_with([-1, -5, 3], true, &config);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: -5 is below the smallest value -1; the sequence is not sorted."
                    .to_string()
            )
        );
        let e = EliasFanoArray::build_with([0, 5, 2, 9], true, &config);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: val must be no less than the last one 5, but got 2.".to_string())
        );
    }

    #[test]
    fn test_zero_low_len() {
        let efa = EliasFanoArray::build([0, 0, 1, 1, 2, 2], true).unwrap();
        assert_eq!(efa.low_len(), 0);
        assert!(efa.low_bits().bit_vector().is_empty());
        test_access(&[0, 0, 1, 1, 2, 2], &efa);
    }

    #[test]
    fn test_layout() {
        // u = 8, n = 4, l = 1: high parts 0, 1, 1, 3.
        let efa = EliasFanoArray::build([1, 3, 3, 7], true).unwrap();
        assert_eq!(efa.universe(), 8);
        assert_eq!(efa.low_len(), 1);
        assert_eq!(efa.high_bits().len(), 8);
        assert_eq!(efa.high_bits().bit_vector().words(), &[0b0100_1101]);
        assert_eq!(efa.low_bits().bit_vector().words(), &[0b1111]);
        assert_eq!(efa.size_in_bits(), 12);
    }

    #[test]
    fn test_extreme_values() {
        let vals = [i64::MIN, -1, 0, 1, i64::MAX];
        let efa = EliasFanoArray::build(vals, true).unwrap();
        assert_eq!(efa.offset(), 1 << 63);
        assert_eq!(efa.universe(), 1 << 64);
        test_access(&vals, &efa);
        test_search(&vals, &efa, &[i64::MIN, i64::MIN + 1, -2, -1, 0, 2, i64::MAX - 1, i64::MAX]);
    }

    #[test]
    fn test_single_max() {
        let efa = EliasFanoArray::build([i64::MAX, i64::MIN], false).unwrap();
        assert_eq!(efa.low_len(), 63);
        let efa = EliasFanoArray::build([i64::MAX], true).unwrap();
        assert_eq!(efa.get(0).unwrap(), i64::MAX);
        let efa = EliasFanoArray::from_slice(&[u64::MAX >> 1], true).unwrap();
        assert_eq!(efa.get(0).unwrap(), i64::MAX);
    }

    #[test]
    fn test_full_width_low_len() {
        // n = 1 and u = 2^64 gives l = 64.
        let mut efb = EliasFanoBuilder::new(1 << 64, 1).unwrap().offset(1 << 63);
        efb.push(u64::MAX).unwrap();
        let efa = efb.build().unwrap();
        assert_eq!(efa.low_len(), 64);
        assert_eq!(efa.get_raw(0), Some(u64::MAX));
        assert_eq!(efa.get(0), Ok(i64::MAX));
        assert!(efa.contains(i64::MAX));
    }

    #[test]
    fn test_builder_beyond_i64() {
        let mut efb = EliasFanoBuilder::new(1 << 64, 2).unwrap();
        efb.extend([1, u64::MAX]).unwrap();
        let e = efb.build();
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: universe=18446744073709551616 with offset=0 decodes integers beyond i64::MAX."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_builder_offset_too_large() {
        let mut efb = EliasFanoBuilder::new(4, 1).unwrap().offset(u64::MAX);
        efb.push(0).unwrap();
        let e = efb.build();
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: offset must be no greater than 2^63, but got 18446744073709551615."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_builder_offset() {
        let mut efb = EliasFanoBuilder::new(10, 4).unwrap().offset(5);
        efb.extend([0, 2, 2, 9]).unwrap();
        let efa = efb.build().unwrap();
        assert_eq!(efa.offset(), 5);
        assert_eq!(efa.iter().collect::<Vec<_>>(), vec![-5, -3, -3, 4]);
        assert_eq!(efa.get(1), Ok(-3));
        assert_eq!(efa.get(3), Ok(4));
        assert!(efa.contains(-5));
        assert!(efa.contains(-3));
        assert!(!efa.contains(0));
        assert!(!efa.contains(5));
        assert_eq!(efa.rank(-3), 1);
        assert_eq!(efa.predecessor(3), Some(-3));
        assert_eq!(efa.successor(-2), Some(4));
        assert_eq!(efa.first(), Some(-5));
        assert_eq!(efa.last(), Some(4));
    }

    #[test]
    fn test_random_dense() {
        for seed in 0..20 {
            let vals = gen_random_ints(1000, -50, 500, seed);
            let efa = EliasFanoArray::build(vals.iter().copied(), false).unwrap();
            test_access(&vals, &efa);
            let queries: Vec<i64> = (-60..510).collect();
            test_search(&vals, &efa, &queries);
        }
    }

    #[test]
    fn test_random_sparse() {
        for seed in 0..5 {
            let vals = gen_random_ints(3000, -(1 << 40), 1 << 40, seed);
            let efa = EliasFanoArray::build(vals.iter().copied(), false).unwrap();
            test_access(&vals, &efa);
            let mut queries = gen_random_ints(300, -(1 << 41), 1 << 41, seed + 100);
            queries.extend(vals.iter().take(300));
            test_search(&vals, &efa, &queries);
        }
    }

    #[test]
    fn test_builder_new_zero_size() {
        let e = EliasFanoBuilder::new(3, 0);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: num_vals must not be zero.".to_string())
        );
    }

    #[test]
    fn test_builder_push_decrease() {
        let mut b = EliasFanoBuilder::new(3, 2).unwrap();
        b.push(2).unwrap();
        let e = b.push(1);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: val must be no less than the last one 2, but got 1.".to_string())
        );
    }

    #[test]
    fn test_builder_overflow_universe() {
        let mut b = EliasFanoBuilder::new(3, 2).unwrap();
        let e = b.push(3);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: val must be less than self.universe()=3, but got 3.".to_string())
        );
    }

    #[test]
    fn test_builder_overflow_num_vals() {
        let mut b = EliasFanoBuilder::new(3, 1).unwrap();
        b.push(1).unwrap();
        let e = b.push(2);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "invalid input: the number of pushed integers must not exceed self.num_vals()=1."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_builder_underflow_num_vals() {
        let mut b = EliasFanoBuilder::new(3, 2).unwrap();
        b.push(1).unwrap();
        let e = b.build();
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid input: self.num_vals()=2 integers must be pushed, but got 1.".to_string())
        );
    }

    #[test]
    fn test_serialize() {
        let mut bytes = vec![];
        let efa = EliasFanoArray::build(gen_random_ints(1000, -100, 100_000, 42), false).unwrap();
        let size = efa.serialize_into(&mut bytes).unwrap();
        let other = EliasFanoArray::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(efa, other);
        assert_eq!(size, bytes.len());
        assert_eq!(size, efa.size_in_bytes());
    }

    #[test]
    fn test_deserialize_inconsistent_len() {
        let efa = EliasFanoArray::build([1, 3, 3, 7], true).unwrap();
        let mut bytes = vec![];
        efa.serialize_into(&mut bytes).unwrap();
        // offset = 0, len = 4 -> 5
        bytes[1] = 5;
        let e = EliasFanoArray::deserialize_from(&bytes[..]);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("high bits must have len=5 set bits, but got 4.".to_string())
        );
    }

    #[test]
    fn test_deserialize_inconsistent_low_len() {
        let efa = EliasFanoArray::build([1, 3, 3, 7], true).unwrap();
        let mut bytes = vec![];
        efa.serialize_into(&mut bytes).unwrap();
        // low_len = 1 -> 2
        bytes[2] = 2;
        let e = EliasFanoArray::deserialize_from(&bytes[..]);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("low_len=2 is inconsistent with universe=8 and len=4.".to_string())
        );
    }

    #[test]
    fn test_deserialize_inconsistent_offset() {
        // offset = u64::MAX, len = 1, low_len = 0, universe - 1 = 0, high bits "10".
        let mut bytes = vec![0xFFu8; 9];
        bytes.extend([0x01, 1, 0, 0, 2, 0b01]);
        let e = EliasFanoArray::deserialize_from(&bytes[..]);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("offset must be no greater than 2^63, but got 18446744073709551615.".to_string())
        );
    }

    #[test]
    fn test_deserialize_universe_beyond_i64() {
        let mut efb = EliasFanoBuilder::new(1 << 63, 1).unwrap();
        efb.push(7).unwrap();
        let mut bytes = vec![];
        efb.build().unwrap().serialize_into(&mut bytes).unwrap();
        // offset = 0, len = 1, low_len = 63, then universe - 1 = 2^63 - 1 as nine varint bytes.
        assert_eq!(&bytes[3..12], &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        // Bump universe - 1 to 2^63.
        bytes.splice(3..12, [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        let e = EliasFanoArray::deserialize_from(&bytes[..]);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some(
                "universe=9223372036854775809 with offset=0 decodes integers beyond i64::MAX."
                    .to_string()
            )
        );
    }

    #[test]
    fn test_serialize_loose_universe() {
        let mut efb = EliasFanoBuilder::new(1000, 3).unwrap();
        efb.extend([4, 10, 20]).unwrap();
        let efa = efb.build().unwrap();
        let mut bytes = vec![];
        efa.serialize_into(&mut bytes).unwrap();
        let other = EliasFanoArray::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(other.universe(), 1000);
        assert_eq!(other.iter().collect::<Vec<_>>(), vec![4, 10, 20]);
    }
}

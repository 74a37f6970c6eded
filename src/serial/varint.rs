//! LEB128 variable-length encoding of unsigned integers.
//!
//! Each byte carries seven payload bits, least significant group first;
//! the high bit marks that another byte follows.
#![cfg(target_pointer_width = "64")]

use std::io::{Read, Write};

use anyhow::{anyhow, Result};

use super::Serializable;

const MAX_ENCODED_LEN: usize = 10;

/// Writes `val` and returns the number of bytes written.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::serial::varint;
///
/// let mut bytes = vec![];
/// assert_eq!(varint::write(&mut bytes, 300)?, 2);
/// assert_eq!(bytes, vec![0xAC, 0x02]);
/// assert_eq!(varint::read(&bytes[..])?, 300);
/// # Ok(())
/// # }
/// ```
pub fn write<W: Write>(mut writer: W, mut val: u64) -> Result<usize> {
    let mut mem = 0;
    loop {
        let byte = (val & 0x7F) as u8;
        val >>= 7;
        if val == 0 {
            mem += byte.serialize_into(&mut writer)?;
            return Ok(mem);
        }
        mem += (byte | 0x80).serialize_into(&mut writer)?;
    }
}

/// Reads a value written by [`write`].
///
/// # Errors
///
/// An error is returned if the reader ends early or the encoding overflows 64 bits.
pub fn read<R: Read>(mut reader: R) -> Result<u64> {
    let mut val = 0u64;
    for i in 0..MAX_ENCODED_LEN {
        let byte = u8::deserialize_from(&mut reader)?;
        let payload = u64::from(byte & 0x7F);
        let shift = 7 * i;
        if shift == 63 && payload > 1 {
            return Err(anyhow!("varint overflows 64 bits."));
        }
        val |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(val);
        }
    }
    Err(anyhow!(
        "varint must be no longer than {MAX_ENCODED_LEN} bytes."
    ))
}

/// Reads a value written by [`write`] that must fit in [`usize`].
pub fn read_usize<R: Read>(reader: R) -> Result<usize> {
    let val = read(reader)?;
    usize::try_from(val).map_err(|_| anyhow!("varint {val} does not fit in usize."))
}

/// Returns the number of bytes [`write`] produces for `val`.
pub const fn encoded_len(val: u64) -> usize {
    let bits = 64 - val.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

//! Utilities for serialization.
#![cfg(target_pointer_width = "64")]

pub mod primitive;
pub mod varint;

use std::io::{Read, Write};

use anyhow::Result;

/// Trait to serialize/deserialize data structures.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use eliasfano::{EliasFanoArray, Serializable};
///
/// let efa = EliasFanoArray::build([-3, 0, 5, 5, 12], true)?;
///
/// let mut bytes = vec![];
/// let size = efa.serialize_into(&mut bytes)?;
/// let other = EliasFanoArray::deserialize_from(&bytes[..])?;
///
/// assert_eq!(efa, other);
/// assert_eq!(size, bytes.len());
/// assert_eq!(size, efa.size_in_bytes());
/// # Ok(())
/// # }
/// ```
pub trait Serializable: Sized {
    /// Serializes the data structure into the writer,
    /// returning the number of serialized bytes.
    ///
    /// # Arguments
    ///
    /// - `writer`: [`Write`] variable.
    fn serialize_into<W: Write>(&self, writer: W) -> Result<usize>;

    /// Deserializes the data structure from the reader.
    ///
    /// # Arguments
    ///
    /// - `reader`: [`Read`] variable.
    fn deserialize_from<R: Read>(reader: R) -> Result<Self>;

    /// Returns the number of bytes to serialize the data structure.
    fn size_in_bytes(&self) -> usize;

    /// Returns the size of a primitive type in bytes (if the type is so).
    fn size_of() -> Option<usize> {
        None
    }
}

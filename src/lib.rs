//! # `eliasfano`: Quasi-succinct integer sequences in Rust
//!
//! `eliasfano` stores a non-decreasing sequence of 64-bit signed integers
//! in the [Elias-Fano](https://www.antoniomallia.it/sorted-integers-compression-with-elias-fano-encoding.html)
//! representation, using close to the information-theoretic minimum number of bits
//! while keeping random access and membership queries fast.
//!
//! ## Data structures
//!
//! - [`EliasFanoArray`]
//!   - Immutable compressed array supporting access, membership, rank, predecessor/successor, and iteration.
//! - [`LowBits`]
//!   - Fixed-width packed array holding the low part of every element.
//! - [`HighBits`]
//!   - Unary-coded bit vector holding the high parts, with a constant-time select index.
//! - [`BitVector`]
//!   - Plain bit vector underlying both stores.
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use eliasfano::EliasFanoArray;
//!
//! let efa = EliasFanoArray::build([12, -4, 0, 7, 7], false)?;
//!
//! assert_eq!(efa.get(0)?, -4);
//! assert!(efa.contains(7));
//! assert_eq!(efa.iter().collect::<Vec<_>>(), vec![-4, 0, 7, 7, 12]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitation
//!
//! This library is designed to run on 64-bit machines.
#![deny(missing_docs)]

#[cfg(not(target_pointer_width = "64"))]
compile_error!("`target_pointer_width` must be 64");

pub mod bit_vector;
pub mod broadword;
pub mod elias_fano_array;
pub mod error;
pub mod high_bits;
pub mod low_bits;
pub mod sequence;
pub mod serial;

pub use bit_vector::BitVector;
pub use elias_fano_array::{BuildConfig, EliasFanoArray, EliasFanoBuilder};
pub use error::{Error, Result};
pub use high_bits::{HighBits, HighBitsBuilder};
pub use low_bits::LowBits;
pub use sequence::IntSequence;
pub use serial::Serializable;

//! Systematic linear erasure codes over GF(2^8).
//!
//! * [`ReedSolomon`], Cauchy (MDS) or Vandermonde generators,
//! * [`Lrc`], global Cauchy parities plus local XOR parity per data group,
//! * [`MsrCode`], minimum storage regenerating codes repairing a single node
//!   from a fraction of every survivor.
//!
//! Each code yields a [`DecodePlan`] per erasure pattern, built either by
//! inverting survivor rows of the generator or by eliminating the parity
//! check matrix, see [`Strategy`]. Plans are applied to byte buffers by a
//! [`LinearCombine`] engine.

pub mod errors;
pub use errors::*;

pub mod util;
pub use util::*;

pub mod field;

mod shard;
pub use shard::*;

pub mod matrix;
pub use matrix::Matrix;

pub mod engine;
pub use engine::{LinearCombine, TableCombine};

pub mod generator;
pub use generator::{gen_cauchy, gen_rs, Construction};

pub mod decode;
pub use decode::{DecodePlan, Strategy};

pub mod codec;
pub use codec::*;

mod rs;
pub use rs::ReedSolomon;

pub mod lrc;
pub use lrc::Lrc;

pub mod msr;
pub use msr::{MsrCode, MsrParams, SubPacketLayout};

#[cfg(test)]
mod tests;

//! Arithmetic in GF(2^8).

mod f256;
pub use f256::*;

//! Bulk linear combination of byte buffers.
//!
//! `dst[l][i] = XOR_j coeffs[l][j] * src[j][i]`, the only operation the codes
//! need from the data path.

use crate::field::*;
use crate::matrix::Matrix;

/// Applies a coefficient matrix to equally sized source buffers.
pub trait LinearCombine {
	/// `coeffs` is `targets.len() x sources.len()`.
	fn combine(&self, coeffs: &Matrix, sources: &[&[u8]], targets: &mut [&mut [u8]]);
}

/// Products of one coefficient with every low and every high nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulTable {
	lo: [u8; 16],
	hi: [u8; 16],
}

impl MulTable {
	pub fn new(coeff: Additive) -> Self {
		let mut lo = [0u8; 16];
		let mut hi = [0u8; 16];
		for i in 0..16_u8 {
			lo[i as usize] = (coeff * Additive(i)).0;
			hi[i as usize] = (coeff * Additive(i << 4)).0;
		}
		Self { lo, hi }
	}

	#[inline(always)]
	pub fn apply(&self, x: u8) -> u8 {
		self.lo[(x & 0x0F) as usize] ^ self.hi[(x >> 4) as usize]
	}
}

/// One table per coefficient, row-major like `coeffs`.
pub fn init_tables(coeffs: &Matrix) -> Vec<MulTable> {
	coeffs.iter_rows().flat_map(|row| row.iter().map(|&c| MulTable::new(c))).collect()
}

/// `dst = c * src`
pub fn mul_slice(table: &MulTable, src: &[u8], dst: &mut [u8]) {
	assert_eq!(src.len(), dst.len());
	for (d, &s) in dst.iter_mut().zip(src) {
		*d = table.apply(s);
	}
}

/// `dst ^= c * src`
pub fn mul_add_slice(table: &MulTable, src: &[u8], dst: &mut [u8]) {
	assert_eq!(src.len(), dst.len());
	for (d, &s) in dst.iter_mut().zip(src) {
		*d ^= table.apply(s);
	}
}

/// Portable table driven engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableCombine;

impl LinearCombine for TableCombine {
	fn combine(&self, coeffs: &Matrix, sources: &[&[u8]], targets: &mut [&mut [u8]]) {
		assert_eq!(coeffs.rows(), targets.len());
		assert_eq!(coeffs.cols(), sources.len());
		let tables = init_tables(coeffs);
		let n_src = sources.len();
		for (l, dst) in targets.iter_mut().enumerate() {
			// the first nonzero term overwrites, later ones accumulate
			let mut written = false;
			for (j, src) in sources.iter().enumerate() {
				let coeff = coeffs[(l, j)];
				if coeff.is_zero() {
					continue;
				}
				let table = &tables[l * n_src + j];
				match (written, coeff == Additive::ONE) {
					(false, true) => dst.copy_from_slice(src),
					(false, false) => mul_slice(table, src, dst),
					(true, true) => {
						assert_eq!(src.len(), dst.len());
						dst.iter_mut().zip(src.iter()).for_each(|(d, s)| *d ^= s);
					},
					(true, false) => mul_add_slice(table, src, dst),
				}
				written = true;
			}
			if !written {
				dst.fill(0);
			}
		}
	}
}

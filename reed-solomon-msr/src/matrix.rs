use std::fmt;
use std::ops::{Index, IndexMut, Range};

use crate::errors::*;
use crate::field::*;

/// Dense row-major matrix over GF(2^8).
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
	rows: usize,
	cols: usize,
	data: Vec<Additive>,
}

impl Matrix {
	pub fn zero(rows: usize, cols: usize) -> Self {
		Self { rows, cols, data: vec![Additive::ZERO; rows * cols] }
	}

	pub fn identity(n: usize) -> Self {
		let mut m = Self::zero(n, n);
		for i in 0..n {
			m[(i, i)] = Additive::ONE;
		}
		m
	}

	/// Build from byte rows, all rows must share one length.
	pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
		let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
		let mut data = Vec::with_capacity(rows.len() * cols);
		for row in rows {
			let row = row.as_ref();
			assert_eq!(row.len(), cols, "ragged rows");
			data.extend(row.iter().copied().map(Additive));
		}
		Self { rows: rows.len(), cols, data }
	}

	pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Additive) -> Self {
		let mut data = Vec::with_capacity(rows * cols);
		for r in 0..rows {
			for c in 0..cols {
				data.push(f(r, c));
			}
		}
		Self { rows, cols, data }
	}

	#[inline(always)]
	pub fn rows(&self) -> usize {
		self.rows
	}

	#[inline(always)]
	pub fn cols(&self) -> usize {
		self.cols
	}

	pub fn is_square(&self) -> bool {
		self.rows == self.cols
	}

	#[inline(always)]
	pub fn get(&self, row: usize, col: usize) -> Option<Additive> {
		if row < self.rows && col < self.cols {
			Some(self.data[row * self.cols + col])
		} else {
			None
		}
	}

	#[inline(always)]
	pub fn row(&self, row: usize) -> &[Additive] {
		assert!(row < self.rows, "row {} out of {} rows", row, self.rows);
		&self.data[row * self.cols..(row + 1) * self.cols]
	}

	#[inline(always)]
	pub fn row_mut(&mut self, row: usize) -> &mut [Additive] {
		assert!(row < self.rows, "row {} out of {} rows", row, self.rows);
		&mut self.data[row * self.cols..(row + 1) * self.cols]
	}

	/// Iterate rows as slices.
	pub fn iter_rows(&self) -> impl Iterator<Item = &[Additive]> + '_ {
		// `chunks` of a zero width matrix would panic
		(0..self.rows).map(move |r| self.row(r))
	}

	pub fn swap_rows(&mut self, a: usize, b: usize) {
		if a == b {
			return;
		}
		let (lo, hi) = if a < b { (a, b) } else { (b, a) };
		let cols = self.cols;
		let (head, tail) = self.data.split_at_mut(hi * cols);
		head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
	}

	pub fn scale_row(&mut self, row: usize, factor: Additive) {
		match factor.to_multiplier() {
			None => self.row_mut(row).fill(Additive::ZERO),
			Some(factor) => self.row_mut(row).iter_mut().for_each(|x| *x = x.mul(factor)),
		}
	}

	/// `row[dst] ^= factor * row[src]`
	pub fn add_scaled_row(&mut self, dst: usize, src: usize, factor: Additive) {
		assert_ne!(dst, src);
		let Some(factor) = factor.to_multiplier() else {
			return;
		};
		for c in 0..self.cols {
			let v = self[(src, c)].mul(factor);
			self[(dst, c)] ^= v;
		}
	}

	/// Rows picked by index, in the given order.
	pub fn select_rows(&self, rows: &[usize]) -> Matrix {
		let mut data = Vec::with_capacity(rows.len() * self.cols);
		for &r in rows {
			data.extend_from_slice(self.row(r));
		}
		Matrix { rows: rows.len(), cols: self.cols, data }
	}

	/// Columns picked by index, in the given order.
	pub fn select_cols(&self, cols: &[usize]) -> Matrix {
		Matrix::from_fn(self.rows, cols.len(), |r, c| self[(r, cols[c])])
	}

	pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Matrix {
		assert!(rows.end <= self.rows && cols.end <= self.cols);
		let cols_start = cols.start;
		Matrix::from_fn(rows.len(), cols.len(), |r, c| self[(rows.start + r, cols_start + c)])
	}

	/// Stack `self` on top of `below`.
	pub fn vstack(&self, below: &Matrix) -> Matrix {
		assert_eq!(self.cols, below.cols);
		let mut data = self.data.clone();
		data.extend_from_slice(&below.data);
		Matrix { rows: self.rows + below.rows, cols: self.cols, data }
	}

	pub fn mul(&self, rhs: &Matrix) -> Matrix {
		assert_eq!(self.cols, rhs.rows, "dimension mismatch {}x{} * {}x{}", self.rows, self.cols, rhs.rows, rhs.cols);
		let mut out = Matrix::zero(self.rows, rhs.cols);
		for r in 0..self.rows {
			for (i, &coeff) in self.row(r).iter().enumerate() {
				let Some(coeff) = coeff.to_multiplier() else {
					continue;
				};
				let src = rhs.row(i);
				for (dst, &x) in out.row_mut(r).iter_mut().zip(src) {
					*dst ^= x.mul(coeff);
				}
			}
		}
		out
	}

	pub fn is_identity(&self) -> bool {
		self.is_square() &&
			(0..self.rows).all(|r| {
				(0..self.cols).all(|c| self.get(r, c) == Some(if r == c { Additive::ONE } else { Additive::ZERO }))
			})
	}

	/// Columns which are zero in every row.
	pub fn zero_cols(&self) -> Vec<usize> {
		(0..self.cols).filter(|&c| (0..self.rows).all(|r| self[(r, c)].is_zero())).collect()
	}

	/// Gauss-Jordan inversion with partial pivoting.
	pub fn invert(&self) -> Result<Matrix> {
		assert!(self.is_square(), "only square matrices are invertible, got {}x{}", self.rows, self.cols);
		let n = self.rows;
		let mut work = self.clone();
		let mut inv = Matrix::identity(n);

		for i in 0..n {
			if work[(i, i)].is_zero() {
				let pivot = (i + 1..n).find(|&j| !work[(j, i)].is_zero()).ok_or(Error::SingularMatrix { column: i })?;
				work.swap_rows(i, pivot);
				inv.swap_rows(i, pivot);
			}

			let scale = work[(i, i)].inv();
			work.scale_row(i, scale);
			inv.scale_row(i, scale);

			for j in 0..n {
				if j == i {
					continue;
				}
				let factor = work[(j, i)];
				if factor.is_zero() {
					continue;
				}
				work.add_scaled_row(j, i, factor);
				inv.add_scaled_row(j, i, factor);
			}
		}
		Ok(inv)
	}
}

impl Index<(usize, usize)> for Matrix {
	type Output = Additive;

	#[inline(always)]
	fn index(&self, (row, col): (usize, usize)) -> &Additive {
		assert!(row < self.rows && col < self.cols, "({}, {}) out of {}x{}", row, col, self.rows, self.cols);
		&self.data[row * self.cols + col]
	}
}

impl IndexMut<(usize, usize)> for Matrix {
	#[inline(always)]
	fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Additive {
		assert!(row < self.rows && col < self.cols, "({}, {}) out of {}x{}", row, col, self.rows, self.cols);
		&mut self.data[row * self.cols + col]
	}
}

impl fmt::Debug for Matrix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Matrix {}x{}", self.rows, self.cols)?;
		for row in self.iter_rows() {
			for x in row {
				write!(f, " {:02x}", x.0)?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use rand::prelude::*;
	use rand::rngs::SmallRng;
	use reed_solomon_tester::SMALL_RNG_SEED;

	fn random_matrix(rng: &mut impl Rng, rows: usize, cols: usize) -> Matrix {
		Matrix::from_fn(rows, cols, |_, _| Additive(rng.gen()))
	}

	#[test]
	fn identity_inverts_to_itself() {
		let id = Matrix::identity(7);
		assert!(id.is_identity());
		assert_eq!(id.invert().unwrap(), id);
	}

	#[test]
	fn inverse_times_self_is_identity() {
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		let mut inverted = 0;
		for n in 1..=24 {
			let m = random_matrix(&mut rng, n, n);
			if let Ok(inv) = m.invert() {
				assert!(m.mul(&inv).is_identity());
				assert!(inv.mul(&m).is_identity());
				inverted += 1;
			}
		}
		// a random square matrix over GF(256) is singular with probability ~1/255
		assert!(inverted >= 20);
	}

	#[test]
	fn zero_on_diagonal_needs_row_swap() {
		let m = Matrix::from_rows(&[[0u8, 1], [1, 0]]);
		let inv = m.invert().unwrap();
		assert_eq!(inv, m);

		let m = Matrix::from_rows(&[[0u8, 0, 3], [0, 5, 0], [7, 0, 0]]);
		assert!(m.mul(&m.invert().unwrap()).is_identity());
	}

	#[test]
	fn singular_is_reported() {
		let m = Matrix::from_rows(&[[1u8, 2, 3], [2, 4, 6], [0, 0, 1]]);
		assert_matches!(m.invert(), Err(Error::SingularMatrix { .. }));

		let m = Matrix::zero(3, 3);
		assert_matches!(m.invert(), Err(Error::SingularMatrix { column: 0 }));
	}

	#[test]
	fn select_and_stack() {
		let m = Matrix::from_rows(&[[1u8, 2, 3], [4, 5, 6], [7, 8, 9]]);
		assert_eq!(m.select_rows(&[2, 0]), Matrix::from_rows(&[[7u8, 8, 9], [1, 2, 3]]));
		assert_eq!(m.select_cols(&[1]), Matrix::from_rows(&[[2u8], [5], [8]]));
		assert_eq!(m.submatrix(1..3, 0..2), Matrix::from_rows(&[[4u8, 5], [7, 8]]));
		assert_eq!(m.submatrix(0..1, 0..3).vstack(&m.submatrix(2..3, 0..3)), m.select_rows(&[0, 2]));
		assert_eq!(m.get(3, 0), None);
		assert_eq!(m.get(2, 2), Some(Additive(9)));
	}

	#[test]
	fn swap_rows_both_directions() {
		let mut m = Matrix::from_rows(&[[1u8, 1], [2, 2], [3, 3]]);
		m.swap_rows(2, 0);
		assert_eq!(m, Matrix::from_rows(&[[3u8, 3], [2, 2], [1, 1]]));
		m.swap_rows(1, 1);
		m.swap_rows(0, 1);
		assert_eq!(m, Matrix::from_rows(&[[2u8, 2], [3, 3], [1, 1]]));
	}

	#[test]
	#[should_panic]
	fn out_of_bounds_column_panics() {
		let m = Matrix::zero(2, 2);
		let _ = m[(0, 2)];
	}

	#[test]
	fn zero_columns() {
		let m = Matrix::from_rows(&[[0u8, 1, 0], [0, 0, 0]]);
		assert_eq!(m.zero_cols(), vec![0, 2]);
	}
}

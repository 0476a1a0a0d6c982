//! Construction of erasure specific decode matrices.
//!
//! Two strategies are offered which, fed with the same survivors, must
//! recover identical bytes:
//!
//! * selection: invert the generator rows of `k` survivors,
//! * parity check: eliminate the erased columns of a parity check matrix
//!   until every erased unit is expressed in the remaining columns.

use crate::errors::*;
use crate::field::*;
use crate::matrix::Matrix;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
	/// Invert the generator rows of the chosen survivors.
	#[default]
	Selection,
	/// Gauss-Jordan elimination on the parity check matrix, no `k x k` inversion.
	ParityCheck,
}

/// How to recover a set of erased indices from a set of surviving ones.
///
/// Indices refer to units for plain codes and to sub-packets
/// (`unit * l + sub_packet`) for codes with sub-packetization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodePlan {
	/// Indices read, in the column order of `matrix`.
	pub sources: Vec<usize>,
	/// Indices recovered, in the row order of `matrix`.
	pub targets: Vec<usize>,
	/// `targets.len() x sources.len()` coefficients.
	pub matrix: Matrix,
}

impl DecodePlan {
	pub fn empty() -> Self {
		Self { sources: Vec::new(), targets: Vec::new(), matrix: Matrix::zero(0, 0) }
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	/// Drop target rows for which `keep` is false.
	pub fn retain_targets(&mut self, mut keep: impl FnMut(usize) -> bool) {
		let rows = (0..self.targets.len()).filter(|&i| keep(self.targets[i])).collect::<Vec<_>>();
		self.matrix = self.matrix.select_rows(&rows);
		self.targets = rows.into_iter().map(|i| self.targets[i]).collect();
	}

	/// Drop sources no target depends on.
	pub fn prune_unused_sources(&mut self) {
		let unused = self.matrix.zero_cols();
		if unused.is_empty() {
			return;
		}
		let used = (0..self.sources.len()).filter(|c| unused.binary_search(c).is_err()).collect::<Vec<_>>();
		self.matrix = self.matrix.select_cols(&used);
		self.sources = used.into_iter().map(|c| self.sources[c]).collect();
	}
}

/// Validate an erasure set against `n` units and a tolerance, return it sorted.
pub fn validate_erasures(erasures: &[usize], n: usize, tolerance: usize) -> Result<Vec<usize>> {
	if let Some(&index) = erasures.iter().find(|&&e| e >= n) {
		return Err(Error::ErasureOutOfRange { index, n });
	}
	let mut sorted = erasures.to_vec();
	sorted.sort_unstable();
	if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
		return Err(Error::DuplicateErasure(w[0]));
	}
	if sorted.len() > tolerance {
		return Err(Error::UnrecoverableErasureCount { have: sorted.len(), max: tolerance });
	}
	Ok(sorted)
}

/// The lowest `count` indices in `range` which are not in the sorted `erased`.
pub(crate) fn first_survivors(range: std::ops::Range<usize>, erased: &[usize], count: usize) -> Vec<usize> {
	range.filter(|i| erased.binary_search(i).is_err()).take(count).collect()
}

/// Selection strategy over a systematic generator.
///
/// The first `generator.cols()` entries of `survivors` are used. Erased
/// systematic rows copy the inverse, erased redundancy rows project it
/// through their generator row.
pub fn selection_plan(generator: &Matrix, survivors: &[usize], erased: &[usize]) -> Result<DecodePlan> {
	let k = generator.cols();
	if survivors.len() < k {
		return Err(Error::InsufficientSurvivors { have: survivors.len(), min: k });
	}
	let survivors = &survivors[..k];
	let inv = generator.select_rows(survivors).invert()?;

	let mut matrix = Matrix::zero(erased.len(), k);
	for (row, &e) in erased.iter().enumerate() {
		if e < k {
			matrix.row_mut(row).copy_from_slice(inv.row(e));
		} else {
			let g = generator.row(e);
			for i in 0..k {
				matrix[(row, i)] = (0..k).fold(Additive::ZERO, |acc, j| acc ^ inv[(j, i)] * g[j]);
			}
		}
	}
	Ok(DecodePlan { sources: survivors.to_vec(), targets: erased.to_vec(), matrix })
}

/// Reduce `pcm` so row `i` holds a unit pivot in `erased_cols[i]` and zeros in
/// every other erased column.
pub fn eliminate_erased_columns(pcm: &mut Matrix, erased_cols: &[usize]) -> Result<()> {
	if pcm.rows() != erased_cols.len() {
		return Err(Error::UnsupportedErasureCount { erasures: erased_cols.len(), checks: pcm.rows() });
	}
	let rows = pcm.rows();
	for (i, &col) in erased_cols.iter().enumerate() {
		if pcm[(i, col)].is_zero() {
			// rows above `i` already own a pivot
			let pivot = (i + 1..rows).find(|&r| !pcm[(r, col)].is_zero()).ok_or(Error::SingularMatrix { column: col })?;
			pcm.swap_rows(i, pivot);
		}
		let tar = pcm[(i, col)];
		if tar != Additive::ONE {
			pcm.scale_row(i, tar.inv());
		}
		for j in 0..rows {
			if j == i {
				continue;
			}
			let factor = pcm[(j, col)];
			if !factor.is_zero() {
				pcm.add_scaled_row(j, i, factor);
			}
		}
	}
	Ok(())
}

/// Parity check strategy on an explicit parity check matrix.
///
/// Sources are the non-erased columns in ascending order, targets the erased
/// columns in the given order.
pub fn solve_parity_checks(mut pcm: Matrix, erased_cols: &[usize]) -> Result<DecodePlan> {
	eliminate_erased_columns(&mut pcm, erased_cols)?;
	let mut erased = vec![false; pcm.cols()];
	for &c in erased_cols {
		erased[c] = true;
	}
	let valid = (0..pcm.cols()).filter(|&c| !erased[c]).collect::<Vec<_>>();
	let matrix = pcm.select_cols(&valid);
	Ok(DecodePlan { sources: valid, targets: erased_cols.to_vec(), matrix })
}

/// Parity check strategy for a systematic generator punctured to the data
/// units plus `checks`.
///
/// Column `c < k` is data unit `c`, column `k + i` is redundancy unit
/// `checks[i]`. Every erased unit must be one of these columns and there must
/// be exactly as many checks as erasures.
pub fn punctured_parity_check_plan(generator: &Matrix, checks: &[usize], erased: &[usize]) -> Result<DecodePlan> {
	let k = generator.cols();
	let units = (0..k).chain(checks.iter().copied()).collect::<Vec<_>>();
	let pcm = Matrix::from_fn(checks.len(), units.len(), |i, c| {
		if c < k {
			generator[(checks[i], c)]
		} else if c == k + i {
			Additive::ONE
		} else {
			Additive::ZERO
		}
	});
	let erased_cols = erased
		.iter()
		.map(|e| units.iter().position(|u| u == e))
		.collect::<Option<Vec<_>>>()
		.ok_or(Error::UnsupportedErasureCount { erasures: erased.len(), checks: checks.len() })?;

	let mut plan = solve_parity_checks(pcm, &erased_cols)?;
	plan.sources = plan.sources.into_iter().map(|c| units[c]).collect();
	plan.targets = erased.to_vec();
	Ok(plan)
}

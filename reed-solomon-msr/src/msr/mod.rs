//! Minimum storage regenerating codes.
//!
//! Every unit is split into `l = s^m` sub-packets with `s = n - k` and
//! `m = n / s`. Node `j` sits at column `u = j % s` of row `y = j / s` in an
//! `s x m` grid, and sub-packet `a` is addressed by its `m` base `s` digits.
//! Repairing node `j` needs only the sub-packets whose digit `y` equals `u`
//! from every survivor, `l / s` of them.

mod layout;
mod meta;
mod repair;


pub use layout::*;
pub use meta::*;

use crate::codec::ErasureCode;
use crate::decode::*;
use crate::errors::*;
use crate::field::FIELD_SIZE;
use crate::generator::check_params;
use crate::matrix::Matrix;
use crate::util::{checked_ipow, compose_digits, digits_base_s};

/// Largest sub-packetization accepted.
pub const MAX_SUBPACKETS: usize = 1024;

/// Parameters derived from `(n, k)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MsrParams {
	pub n: usize,
	pub k: usize,
	pub r: usize,
	/// Digit radix, equal to `r`.
	pub s: usize,
	/// Digits per sub-packet index, `n / s`.
	pub m: usize,
	/// Sub-packets per unit, `s^m`.
	pub l: usize,
}

impl MsrParams {
	pub fn new(n: usize, k: usize) -> Result<Self> {
		check_params(n, k)?;
		let r = n - k;
		let s = r;
		if s < 2 {
			return Err(Error::InvalidConfiguration { n, k, reason: "needs at least two redundancy units" });
		}
		if n % s != 0 {
			return Err(Error::InvalidConfiguration { n, k, reason: "n must be a multiple of n - k" });
		}
		// node coefficients run through 1..=n and must stay distinct nonzero elements
		if n >= FIELD_SIZE {
			return Err(Error::InvalidConfiguration { n, k, reason: "at most 255 units fit the field" });
		}
		let m = n / s;
		let l = checked_ipow(s, m)
			.filter(|&l| l <= MAX_SUBPACKETS)
			.ok_or(Error::InvalidConfiguration { n, k, reason: "sub-packetization exceeds the supported maximum" })?;
		Ok(Self { n, k, r, s, m, l })
	}

	/// Grid position `(u, y)` of a node.
	#[inline(always)]
	pub fn node(&self, j: usize) -> (usize, usize) {
		(j % self.s, j / self.s)
	}

	/// Digits of sub-packet index `a`, least significant first.
	pub fn digits(&self, a: usize) -> Vec<usize> {
		digits_base_s(a, self.s, self.m)
	}

	/// Digit `pos` of sub-packet index `a`.
	#[inline(always)]
	pub fn digit(&self, a: usize, pos: usize) -> usize {
		(a / self.s.pow(pos as u32)) % self.s
	}

	/// `a` with digit `pos` replaced by `q`.
	#[inline(always)]
	pub fn with_digit(&self, a: usize, pos: usize, q: usize) -> usize {
		let mut digits = self.digits(a);
		digits[pos] = q;
		compose_digits(&digits, self.s)
	}

	/// Sub-packets a survivor contributes to the repair of node `j`, ascending.
	pub fn repair_subpackets(&self, j: usize) -> Vec<usize> {
		let (u, y) = self.node(j);
		(0..self.l).filter(|&a| self.digit(a, y) == u).collect()
	}
}

/// Minimum storage regenerating code over `n` nodes, `k` of which carry data.
#[derive(Clone, Debug)]
pub struct MsrCode {
	params: MsrParams,
	layout: SubPacketLayout,
	meta: Matrix,
	encode: Matrix,
}

impl MsrCode {
	/// Code with the default slice unit, see [`SubPacketLayout::with_default_slice_unit`].
	pub fn new(n: usize, k: usize) -> Result<Self> {
		let params = MsrParams::new(n, k)?;
		let layout = SubPacketLayout::with_default_slice_unit(params.l)?;
		Self::from_parts(params, layout)
	}

	pub fn with_slice_unit(n: usize, k: usize, slice_unit: usize) -> Result<Self> {
		let params = MsrParams::new(n, k)?;
		let layout = SubPacketLayout::new(params.l, slice_unit)?;
		Self::from_parts(params, layout)
	}

	fn from_parts(params: MsrParams, layout: SubPacketLayout) -> Result<Self> {
		let meta = gen_msr_meta(&params);
		let encode = gen_msr_encode(&params, &meta)?;
		log::debug!(
			"msr code n = {}, k = {}, s = {}, m = {}, l = {}, slice unit {}",
			params.n,
			params.k,
			params.s,
			params.m,
			params.l,
			layout.slice_unit()
		);
		Ok(Self { params, layout, meta, encode })
	}

	pub fn params(&self) -> &MsrParams {
		&self.params
	}

	/// The `(r * l) x (n * l)` parity check matrix.
	pub fn meta(&self) -> &Matrix {
		&self.meta
	}

	/// Sub-packet indices of node `unit`.
	pub fn subpackets_of(&self, unit: usize) -> std::ops::Range<usize> {
		let l = self.params.l;
		unit * l..(unit + 1) * l
	}

	fn all_subpackets(&self, units: &[usize]) -> Vec<usize> {
		units.iter().flat_map(|&u| self.subpackets_of(u)).collect()
	}

	/// Selection over the encode matrix, reading every sub-packet of the
	/// lowest `k` survivors.
	pub fn selection_plan(&self, erasures: &[usize]) -> Result<DecodePlan> {
		let MsrParams { n, k, r, .. } = self.params;
		let erased = validate_erasures(erasures, n, r)?;
		if erased.is_empty() {
			return Ok(DecodePlan::empty());
		}
		let survivors = first_survivors(0..n, &erased, k);
		selection_plan(&self.encode, &self.all_subpackets(&survivors), &self.all_subpackets(&erased))
	}

	/// Elimination on the parity check matrix at sub-packet granularity.
	///
	/// Fewer than `r` erasures are padded with the highest numbered survivors so
	/// the elimination sees a square block, their rows are dropped afterwards.
	pub fn parity_check_plan(&self, erasures: &[usize]) -> Result<DecodePlan> {
		let MsrParams { n, r, .. } = self.params;
		let erased = validate_erasures(erasures, n, r)?;
		if erased.is_empty() {
			return Ok(DecodePlan::empty());
		}
		let mut padded = erased.clone();
		padded.extend((0..n).rev().filter(|u| erased.binary_search(u).is_err()).take(r - erased.len()));

		let mut plan = solve_parity_checks(self.meta.clone(), &self.all_subpackets(&padded))?;
		let l = self.params.l;
		plan.retain_targets(|t| erased.binary_search(&(t / l)).is_ok());
		Ok(plan)
	}
}

impl ErasureCode for MsrCode {
	fn n(&self) -> usize {
		self.params.n
	}

	fn k(&self) -> usize {
		self.params.k
	}

	fn layout(&self) -> SubPacketLayout {
		self.layout
	}

	fn encode_matrix(&self) -> &Matrix {
		&self.encode
	}

	/// The parity check strategy repairs a single node from `l / s` sub-packets
	/// per survivor, more erasures fall back to [`MsrCode::parity_check_plan`].
	fn decode_plan(&self, erasures: &[usize], strategy: Strategy) -> Result<DecodePlan> {
		log::debug!("msr {:?} plan for erasures {:?}", strategy, erasures);
		match (strategy, erasures) {
			(Strategy::Selection, _) => self.selection_plan(erasures),
			(Strategy::ParityCheck, &[single]) => self.single_node_plan(single),
			(Strategy::ParityCheck, _) => self.parity_check_plan(erasures),
		}
	}
}

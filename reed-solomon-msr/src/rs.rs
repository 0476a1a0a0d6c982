use crate::codec::ErasureCode;
use crate::decode::*;
use crate::errors::*;
use crate::generator::{generator, Construction};
use crate::matrix::Matrix;

/// Systematic reed solomon code, `k` data units and `n - k` parity units.
#[derive(Clone, Debug)]
pub struct ReedSolomon {
	n: usize,
	k: usize,
	construction: Construction,
	generator: Matrix,
}

impl ReedSolomon {
	/// Cauchy based code.
	pub fn new(n: usize, k: usize) -> Result<Self> {
		Self::with_construction(n, k, Construction::Cauchy)
	}

	pub fn with_construction(n: usize, k: usize, construction: Construction) -> Result<Self> {
		let generator = generator(construction, n, k)?;
		log::debug!("reed solomon code n = {}, k = {} from {:?} generator", n, k, construction);
		Ok(Self { n, k, construction, generator })
	}

	pub fn construction(&self) -> Construction {
		self.construction
	}

	pub fn generator(&self) -> &Matrix {
		&self.generator
	}

	/// Surviving units a plan for `erased` reads, the lowest `k` indices.
	pub fn survivors(&self, erased: &[usize]) -> Vec<usize> {
		first_survivors(0..self.n, erased, self.k)
	}

	/// Parity rows taking part in the punctured parity check matrix: every
	/// erased parity unit plus one surviving parity unit per erased data unit.
	fn checks(&self, erased: &[usize]) -> Vec<usize> {
		let lost_data = erased.iter().filter(|&&e| e < self.k).count();
		let mut checks = first_survivors(self.k..self.n, erased, lost_data);
		checks.extend(erased.iter().copied().filter(|&e| e >= self.k));
		checks.sort_unstable();
		checks
	}

	pub fn selection_plan(&self, erasures: &[usize]) -> Result<DecodePlan> {
		let erased = validate_erasures(erasures, self.n, self.r())?;
		if erased.is_empty() {
			return Ok(DecodePlan::empty());
		}
		selection_plan(&self.generator, &self.survivors(&erased), &erased)
	}

	pub fn parity_check_plan(&self, erasures: &[usize]) -> Result<DecodePlan> {
		let erased = validate_erasures(erasures, self.n, self.r())?;
		if erased.is_empty() {
			return Ok(DecodePlan::empty());
		}
		punctured_parity_check_plan(&self.generator, &self.checks(&erased), &erased)
	}
}

impl ErasureCode for ReedSolomon {
	fn n(&self) -> usize {
		self.n
	}

	fn k(&self) -> usize {
		self.k
	}

	fn encode_matrix(&self) -> &Matrix {
		&self.generator
	}

	fn decode_plan(&self, erasures: &[usize], strategy: Strategy) -> Result<DecodePlan> {
		log::debug!("reed solomon {:?} plan for erasures {:?}", strategy, erasures);
		match strategy {
			Strategy::Selection => self.selection_plan(erasures),
			Strategy::ParityCheck => self.parity_check_plan(erasures),
		}
	}
}

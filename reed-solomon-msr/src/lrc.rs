//! Locally repairable codes.
//!
//! Units are laid out as `k` data units, `global` Cauchy parities over all
//! data, then one XOR parity per group of `k / groups` consecutive data units.
//! A data unit lost alone in its group is rebuilt from that group.

use std::ops::Range;

use crate::codec::ErasureCode;
use crate::decode::*;
use crate::errors::*;
use crate::field::Additive;
use crate::generator::gen_cauchy;
use crate::matrix::Matrix;

#[derive(Clone, Debug)]
pub struct Lrc {
	k: usize,
	global: usize,
	groups: usize,
	generator: Matrix,
}

impl Lrc {
	pub fn new(k: usize, global: usize, groups: usize) -> Result<Self> {
		let n = k + global + groups;
		if groups == 0 || k % groups != 0 {
			return Err(Error::InvalidConfiguration { n, k, reason: "data units must split evenly into groups" });
		}
		let group_size = k / groups;
		let local = Matrix::from_fn(groups, k, |g, j| if j / group_size == g { Additive::ONE } else { Additive::ZERO });
		let generator = gen_cauchy(k + global, k)?.vstack(&local);
		log::debug!("lrc k = {}, global = {}, groups = {}", k, global, groups);
		Ok(Self { k, global, groups, generator })
	}

	pub fn global(&self) -> usize {
		self.global
	}

	pub fn groups(&self) -> usize {
		self.groups
	}

	pub fn group_size(&self) -> usize {
		self.k / self.groups
	}

	/// Group of a data unit.
	pub fn group_of(&self, data_unit: usize) -> usize {
		data_unit / self.group_size()
	}

	/// Data units of a group.
	pub fn members(&self, group: usize) -> Range<usize> {
		group * self.group_size()..(group + 1) * self.group_size()
	}

	/// Unit index of a group's local parity.
	pub fn local_parity(&self, group: usize) -> usize {
		self.k + self.global + group
	}

	pub fn generator(&self) -> &Matrix {
		&self.generator
	}

	fn global_parities(&self) -> Range<usize> {
		self.k..self.k + self.global
	}

	/// Candidate survivor sets in order of preference, each sorted.
	///
	/// Lost data is first covered by the local parities of the affected
	/// groups, then by global parities. The second candidate prefers global
	/// parities, for patterns where the local rows turn out dependent.
	fn survivor_candidates(&self, erased: &[usize]) -> Vec<Vec<usize>> {
		let is_erased = |u: &usize| erased.binary_search(u).is_ok();
		let data = (0..self.k).filter(|u| !is_erased(u)).collect::<Vec<_>>();
		let needed = self.k - data.len();
		let (locals, globals) = self.usable_parities(erased);

		let mut candidates = Vec::with_capacity(2);
		for extra in [locals.iter().chain(&globals), globals.iter().chain(&locals)] {
			let mut survivors = data.clone();
			survivors.extend(extra.take(needed));
			survivors.sort_unstable();
			if !candidates.contains(&survivors) {
				candidates.push(survivors);
			}
		}
		candidates
	}

	/// Surviving parities able to stand in for lost data: the local parities of
	/// groups with a lost data unit, and the global parities.
	fn usable_parities(&self, erased: &[usize]) -> (Vec<usize>, Vec<usize>) {
		let is_erased = |u: &usize| erased.binary_search(u).is_ok();
		let mut hit_groups = erased.iter().filter(|&&e| e < self.k).map(|&e| self.group_of(e)).collect::<Vec<_>>();
		hit_groups.dedup();
		let locals = hit_groups.into_iter().map(|g| self.local_parity(g)).filter(|u| !is_erased(u)).collect();
		let globals = self.global_parities().filter(|u| !is_erased(u)).collect();
		(locals, globals)
	}

	fn plan_with(&self, erasures: &[usize], strategy: Strategy) -> Result<DecodePlan> {
		let erased = validate_erasures(erasures, self.n(), self.r())?;
		if erased.is_empty() {
			return Ok(DecodePlan::empty());
		}
		let lost_data = erased.iter().filter(|&&e| e < self.k).count();
		let (locals, globals) = self.usable_parities(&erased);
		if locals.len() + globals.len() < lost_data {
			return Err(Error::UnrecoverableErasureCount { have: lost_data, max: locals.len() + globals.len() });
		}
		let mut last = Error::InsufficientSurvivors { have: self.n() - erased.len(), min: self.k };
		for survivors in self.survivor_candidates(&erased) {
			let attempt = match strategy {
				Strategy::Selection => selection_plan(&self.generator, &survivors, &erased),
				Strategy::ParityCheck => {
					let mut checks = survivors.iter().copied().filter(|&u| u >= self.k).collect::<Vec<_>>();
					checks.extend(erased.iter().copied().filter(|&u| u >= self.k));
					checks.sort_unstable();
					if survivors.len() < self.k {
						Err(Error::InsufficientSurvivors { have: survivors.len(), min: self.k })
					} else {
						punctured_parity_check_plan(&self.generator, &checks, &erased)
					}
				},
			};
			match attempt {
				Ok(mut plan) => {
					plan.prune_unused_sources();
					return Ok(plan);
				},
				Err(e @ Error::SingularMatrix { .. }) | Err(e @ Error::InsufficientSurvivors { .. }) => {
					log::debug!("lrc survivors {:?} unusable: {}", survivors, e);
					last = e;
				},
				Err(e) => return Err(e),
			}
		}
		Err(last)
	}
}

impl ErasureCode for Lrc {
	fn n(&self) -> usize {
		self.k + self.global + self.groups
	}

	fn k(&self) -> usize {
		self.k
	}

	fn encode_matrix(&self) -> &Matrix {
		&self.generator
	}

	fn decode_plan(&self, erasures: &[usize], strategy: Strategy) -> Result<DecodePlan> {
		log::debug!("lrc {:?} plan for erasures {:?}", strategy, erasures);
		self.plan_with(erasures, strategy)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::*;
	use assert_matches::assert_matches;
	use itertools::Itertools;
	use rand::prelude::*;
	use rand::rngs::SmallRng;
	use reed_solomon_tester::*;

	fn stripe_of(code: &Lrc, len: usize) -> Vec<Vec<u8>> {
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		let data = random_units(&mut rng, code.k(), len);
		let parity = encode(code, &data).unwrap();
		data.into_iter().chain(parity).collect()
	}

	#[test]
	fn layout_of_units() {
		let lrc = Lrc::new(8, 2, 2).unwrap();
		assert_eq!(lrc.n(), 12);
		assert_eq!(lrc.r(), 4);
		assert_eq!(lrc.members(1), 4..8);
		assert_eq!(lrc.local_parity(0), 10);
		assert_eq!(lrc.group_of(5), 1);
		assert_matches!(Lrc::new(8, 2, 3), Err(Error::InvalidConfiguration { .. }));
		assert_matches!(Lrc::new(8, 2, 0), Err(Error::InvalidConfiguration { .. }));
	}

	#[test]
	fn local_parity_is_xor_of_group() {
		let lrc = Lrc::new(8, 2, 2).unwrap();
		let units = stripe_of(&lrc, 64);
		for g in 0..2 {
			let mut xor = vec![0u8; 64];
			for m in lrc.members(g) {
				xor.iter_mut().zip(&units[m]).for_each(|(x, d)| *x ^= d);
			}
			assert_eq!(units[lrc.local_parity(g)], xor);
		}
	}

	#[test]
	fn single_data_loss_reads_only_its_group() {
		let lrc = Lrc::new(8, 2, 2).unwrap();
		for strategy in [Strategy::Selection, Strategy::ParityCheck] {
			let plan = lrc.decode_plan(&[2], strategy).unwrap();
			assert_eq!(plan.targets, vec![2]);
			assert_eq!(plan.sources, vec![0, 1, 3, 10]);
			assert!(plan.matrix.row(0).iter().all(|&c| c == Additive::ONE));
		}

		let units = stripe_of(&lrc, 100);
		let mut shards = units.iter().cloned().map(Some).collect::<Vec<_>>();
		shards[2] = None;
		// global parities and the other group are not needed
		for u in [4, 5, 6, 7, 8, 9, 11] {
			shards[u] = Some(vec![0xEE; 100]);
		}
		reconstruct(&lrc, &mut shards, Strategy::Selection).unwrap();
		assert_eq!(shards[2].as_ref(), Some(&units[2]));
	}

	#[test]
	fn every_erasure_pattern_up_to_global_plus_one() {
		let lrc = Lrc::new(8, 2, 2).unwrap();
		let units = stripe_of(&lrc, 65);
		for count in 1..=3 {
			for erased in (0..lrc.n()).combinations(count) {
				let sel = lrc.decode_plan(&erased, Strategy::Selection).unwrap();
				let pcm = lrc.decode_plan(&erased, Strategy::ParityCheck).unwrap();
				assert_eq!(sel, pcm, "erased {:?}", erased);

				let mut shards = drop_units(&units, &erased);
				reconstruct(&lrc, &mut shards, Strategy::ParityCheck).unwrap();
				assert_units_recovered(&units, &shards, &erased);
			}
		}
	}

	#[test]
	fn too_many_in_one_group() {
		let lrc = Lrc::new(8, 2, 2).unwrap();
		// four data units of one group exceed the two globals and its local parity
		for strategy in [Strategy::Selection, Strategy::ParityCheck] {
			assert_matches!(
				lrc.decode_plan(&[0, 1, 2, 3], strategy),
				Err(Error::UnrecoverableErasureCount { have: 4, max: 3 })
			);
			// a lost global leaves one global and the local parity for three data units
			assert_matches!(
				lrc.decode_plan(&[0, 1, 2, 8], strategy),
				Err(Error::UnrecoverableErasureCount { have: 3, max: 2 })
			);
		}
		let units = stripe_of(&lrc, 16);
		let mut shards = drop_units(&units, &[0, 1, 2, 3]);
		assert_matches!(
			reconstruct(&lrc, &mut shards, Strategy::ParityCheck),
			Err(Error::UnrecoverableErasureCount { .. })
		);
		assert_matches!(
			lrc.decode_plan(&[0, 1, 2, 3, 4], Strategy::Selection),
			Err(Error::UnrecoverableErasureCount { have: 5, max: 4 })
		);
	}

	#[test]
	fn lost_local_parity_is_recomputed_from_group() {
		let lrc = Lrc::new(6, 2, 3).unwrap();
		let plan = lrc.decode_plan(&[lrc.local_parity(1)], Strategy::ParityCheck).unwrap();
		assert_eq!(plan.sources, vec![2, 3]);
	}
}

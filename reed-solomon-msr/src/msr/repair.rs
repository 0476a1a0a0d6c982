use super::{MsrCode, MsrParams};
use crate::decode::*;
use crate::errors::*;
use crate::matrix::Matrix;

impl MsrCode {
	/// Regenerate one node from `l / s` sub-packets of every survivor.
	///
	/// The checks restricted to the failed node's repair sub-packets give `l`
	/// equations in the `l` unknown sub-packets, only their `l x l` block on the
	/// failed node is inverted.
	pub fn single_node_plan(&self, failed: usize) -> Result<DecodePlan> {
		let MsrParams { n, r, l, .. } = self.params;
		validate_erasures(&[failed], n, r)?;
		let group = self.params.repair_subpackets(failed);

		let rows = (0..r).flat_map(|i| group.iter().map(move |&a| i * l + a)).collect::<Vec<_>>();
		let sources = (0..n)
			.filter(|&p| p != failed)
			.flat_map(|p| group.iter().map(move |&b| p * l + b))
			.collect::<Vec<_>>();

		let left = Matrix::from_fn(rows.len(), l, |row, b| self.meta[(rows[row], failed * l + b)]);
		let right = Matrix::from_fn(rows.len(), sources.len(), |row, c| self.meta[(rows[row], sources[c])]);
		let matrix = left.invert()?.mul(&right);

		log::trace!("msr repair of node {} reads {} sub-packets", failed, sources.len());
		Ok(DecodePlan { sources, targets: self.subpackets_of(failed).collect(), matrix })
	}

	/// Per node, the sub-packet offsets a repair of `erasures` reads.
	pub fn required_subpackets(&self, erasures: &[usize], strategy: Strategy) -> Result<Vec<Vec<usize>>> {
		let MsrParams { n, k, r, l, .. } = self.params;
		let erased = validate_erasures(erasures, n, r)?;
		let mut reads = vec![Vec::new(); n];
		match (strategy, erased.as_slice()) {
			(_, []) => {},
			(Strategy::ParityCheck, &[failed]) => {
				let group = self.params.repair_subpackets(failed);
				for (p, read) in reads.iter_mut().enumerate() {
					if p != failed {
						read.clone_from(&group);
					}
				}
			},
			_ => {
				for p in first_survivors(0..n, &erased, k) {
					reads[p] = (0..l).collect();
				}
			},
		}
		Ok(reads)
	}
}

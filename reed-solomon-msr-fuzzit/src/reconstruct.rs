use hongg::fuzz;

use msr::{ReedSolomon, Strategy, WrappedShard};

use arbitrary::*;

use rand::prelude::*;

#[derive(Debug, Clone)]
struct ReconstructionFeed {
	n: usize,
	k: usize,
	strategy: Strategy,
	received: Vec<Option<WrappedShard>>,
}

impl<'a> Arbitrary<'a> for ReconstructionFeed {
	fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
		let n = u.int_in_range(0_usize..=64)?;
		let k = u.int_in_range(0_usize..=n)?;
		let drop_count = u.int_in_range(0_usize..=n)?;
		let strategy = if u.arbitrary::<bool>()? { Strategy::ParityCheck } else { Strategy::Selection };

		let present = n - drop_count;
		let bytes_per_unit = if present > 0 { u.len() / present } else { 0 };

		let mut rng = rand_chacha::ChaCha8Rng::from_seed([0u8; 32]);
		let dropped = rand::seq::index::sample(&mut rng, n, drop_count).into_vec();

		// unit lengths may disagree once the input runs dry
		let received = (0..n)
			.map(|idx| {
				if dropped.contains(&idx) {
					None
				} else {
					Some(WrappedShard::new(u.bytes(bytes_per_unit).ok()?.to_vec()))
				}
			})
			.collect::<Vec<Option<_>>>();

		Ok(Self { n, k, strategy, received })
	}
}

fn main() {
	loop {
		fuzz!(|feed: ReconstructionFeed| {
			let ReconstructionFeed { n, k, strategy, mut received } = feed;
			let Ok(code) = ReedSolomon::new(n, k) else {
				return;
			};
			let _ = msr::reconstruct(&code, &mut received, strategy);
		});
	}
}

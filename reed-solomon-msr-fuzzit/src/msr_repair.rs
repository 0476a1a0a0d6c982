use hongg::fuzz;

use msr::{ErasureCode, MsrCode, MsrParams, Strategy, WrappedShard};

use arbitrary::*;

use rand::seq::index::IndexVec;

const SHAPES: &[(usize, usize)] = &[(4, 2), (6, 4), (6, 3), (8, 6), (9, 6)];

#[derive(Debug, Clone, Copy)]
struct RepairFeed<'a> {
	shape: (usize, usize),
	failed: usize,
	data: &'a [u8],
}

impl<'a> Arbitrary<'a> for RepairFeed<'a> {
	fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
		let shape = *u.choose(SHAPES)?;
		let failed = u.int_in_range(0..=shape.0 - 1)?;
		Ok(Self { shape, failed, data: u.bytes(u.len())? })
	}
}

fn main() {
	loop {
		fuzz!(|feed: RepairFeed| {
			let (n, k) = feed.shape;
			let Ok(params) = MsrParams::new(n, k) else {
				return;
			};
			// smallest aligned unit keeps the stripes short
			let Ok(code) = MsrCode::with_slice_unit(n, k, params.l) else {
				return;
			};

			let single = code.decode_plan(&[feed.failed], Strategy::ParityCheck).expect("single node is repairable. qed");
			let full = code.decode_plan(&[feed.failed], Strategy::Selection).expect("single node is repairable. qed");
			assert_eq!(single.targets, full.targets);
			assert!(single.sources.len() < full.sources.len());

			let _ = rstester::roundtrip_w_drop_closure(
				|payload| msr::encode_payload::<_, WrappedShard>(&code, payload),
				|received, len| msr::reconstruct_payload(&code, received, len, Strategy::ParityCheck),
				feed.data,
				|shards: &mut [Option<WrappedShard>]| {
					shards[feed.failed] = None;
					IndexVec::from(vec![feed.failed])
				},
			);
		});
	}
}

use hongg::fuzz;

use msr::{ReedSolomon, Strategy, WrappedShard};

use arbitrary::*;

#[derive(Debug, Clone, Copy)]
struct RoundtripFeed<'a> {
	k: usize,
	r: usize,
	strategy: Strategy,
	data: &'a [u8],
}

impl<'a> Arbitrary<'a> for RoundtripFeed<'a> {
	fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
		let k = u.int_in_range(1..=64)?;
		let r = u.int_in_range(1..=16)?;
		let strategy = if u.arbitrary::<bool>()? { Strategy::ParityCheck } else { Strategy::Selection };
		Ok(Self { k, r, strategy, data: u.bytes(u.len())? })
	}
}

fn main() {
	loop {
		fuzz!(|feed: RoundtripFeed| {
			let Ok(code) = ReedSolomon::new(feed.k + feed.r, feed.k) else {
				return;
			};
			let _ = rstester::roundtrip(
				|payload| msr::encode_payload::<_, WrappedShard>(&code, payload),
				|received, len| msr::reconstruct_payload(&code, received, len, feed.strategy),
				feed.data,
				feed.r,
			);
		});
	}
}

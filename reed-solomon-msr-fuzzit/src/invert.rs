use hongg::fuzz;

use msr::Matrix;

use arbitrary::*;

#[derive(Debug, Clone)]
struct InvertFeed {
	rows: Vec<Vec<u8>>,
}

impl<'a> Arbitrary<'a> for InvertFeed {
	fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
		let dim = u.int_in_range(1_usize..=32)?;
		let rows = (0..dim)
			.map(|_| (0..dim).map(|_| u.arbitrary::<u8>()).collect::<Result<Vec<u8>>>())
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { rows })
	}
}

fn main() {
	loop {
		fuzz!(|feed: InvertFeed| {
			let m = Matrix::from_rows(&feed.rows);
			if let Ok(inv) = m.invert() {
				assert!(m.mul(&inv).is_identity(), "{:?} * {:?}", m, inv);
				assert!(inv.mul(&m).is_identity());
			}
		});
	}
}

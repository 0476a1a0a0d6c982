use super::*;

use assert_matches::assert_matches;
use rand::prelude::*;
use rand::rngs::SmallRng;
use reed_solomon_tester::*;

fn stripe_with<C: ErasureCode>(code: &C, data: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
	let parity = encode(code, &data).unwrap();
	assert_eq!(parity.len(), code.r());
	data.into_iter().chain(parity).collect()
}

fn random_stripe<C: ErasureCode>(code: &C, rng: &mut SmallRng, len: usize) -> Vec<Vec<u8>> {
	let data = random_units(rng, code.k(), len);
	stripe_with(code, data)
}

fn assert_plan_shape(plan: &DecodePlan, erased: &[usize]) {
	assert_eq!(plan.matrix.rows(), plan.targets.len());
	assert_eq!(plan.matrix.cols(), plan.sources.len());
	assert_eq!(plan.targets, erased);
	assert!(plan.sources.iter().all(|s| !erased.contains(s)));
}

#[test]
fn rs_8_2_erase_3_and_9() {
	let rs = ReedSolomon::new(10, 8).unwrap();
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let units = random_stripe(&rs, &mut rng, 1024);

	let selection = rs.decode_plan(&[9, 3], Strategy::Selection).unwrap();
	let parity_check = rs.decode_plan(&[3, 9], Strategy::ParityCheck).unwrap();
	assert_plan_shape(&selection, &[3, 9]);
	assert_eq!(selection.sources, vec![0, 1, 2, 4, 5, 6, 7, 8]);
	assert_eq!(selection, parity_check);

	for strategy in [Strategy::Selection, Strategy::ParityCheck] {
		let mut shards = drop_units(&units, &[3, 9]);
		reconstruct(&rs, &mut shards, strategy).unwrap();
		assert_units_recovered(&units, &shards, &[3, 9]);
	}
}

#[test]
fn every_erasure_set_at_edge_lengths() {
	let rs = ReedSolomon::new(12, 8).unwrap();
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	for &len in &EDGE_LENGTHS[..4] {
		let units = random_stripe(&rs, &mut rng, len);
		for erased in erasure_sets(rs.n(), rs.r()) {
			let mut shards = drop_units(&units, &erased);
			reconstruct(&rs, &mut shards, Strategy::Selection).unwrap();
			assert_units_recovered(&units, &shards, &erased);
		}
	}
}

#[test]
fn sampled_erasures_at_large_length() {
	let rs = ReedSolomon::new(12, 8).unwrap();
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let len = *EDGE_LENGTHS.last().unwrap();
	let units = random_stripe(&rs, &mut rng, len);
	for count in 1..=rs.r() {
		for _ in 0..8 {
			let erased = sample_erasures(&mut rng, rs.n(), count);
			for strategy in [Strategy::Selection, Strategy::ParityCheck] {
				let mut shards = drop_units(&units, &erased);
				reconstruct(&rs, &mut shards, strategy).unwrap();
				assert_units_recovered(&units, &shards, &erased);
			}
		}
	}
}

#[test]
fn constant_data() {
	let rs = ReedSolomon::new(9, 6).unwrap();

	let zeros = stripe_with(&rs, constant_units(6, 77, 0));
	assert!(zeros.iter().all(|u| u.iter().all(|&b| b == 0)));

	let ones = stripe_with(&rs, constant_units(6, 77, 0xFF));
	for erased in erasure_sets(rs.n(), rs.r()) {
		for units in [&zeros, &ones] {
			let mut shards = drop_units(units, &erased);
			reconstruct(&rs, &mut shards, Strategy::ParityCheck).unwrap();
			assert_units_recovered(units, &shards, &erased);
		}
	}
}

#[test]
fn strategies_agree_on_every_erasure_set() {
	let rs = ReedSolomon::new(14, 10).unwrap();
	for erased in erasure_sets(rs.n(), rs.r()) {
		let selection = rs.decode_plan(&erased, Strategy::Selection).unwrap();
		let parity_check = rs.decode_plan(&erased, Strategy::ParityCheck).unwrap();
		assert_plan_shape(&selection, &erased);
		assert_eq!(selection, parity_check, "erased {:?}", erased);
	}
}

#[test]
fn vandermonde_single_erasures() {
	let rs = ReedSolomon::with_construction(12, 8, Construction::Vandermonde).unwrap();
	assert_eq!(rs.construction(), Construction::Vandermonde);
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let units = random_stripe(&rs, &mut rng, 33);
	for erased in erasure_sets(rs.n(), 1) {
		let mut shards = drop_units(&units, &erased);
		reconstruct(&rs, &mut shards, Strategy::Selection).unwrap();
		assert_units_recovered(&units, &shards, &erased);
	}
}

#[test]
fn no_erasures_is_a_no_op() {
	let rs = ReedSolomon::new(5, 3).unwrap();
	assert!(rs.decode_plan(&[], Strategy::Selection).unwrap().is_empty());
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let units = random_stripe(&rs, &mut rng, 10);
	let mut shards = drop_units(&units, &[]);
	reconstruct(&rs, &mut shards, Strategy::ParityCheck).unwrap();
	assert_units_recovered(&units, &shards, &[]);
}

#[test]
fn rejections() {
	let rs = ReedSolomon::new(10, 8).unwrap();
	for strategy in [Strategy::Selection, Strategy::ParityCheck] {
		assert_matches!(
			rs.decode_plan(&[0, 1, 2], strategy),
			Err(Error::UnrecoverableErasureCount { have: 3, max: 2 })
		);
		assert_matches!(rs.decode_plan(&[10], strategy), Err(Error::ErasureOutOfRange { index: 10, n: 10 }));
		assert_matches!(rs.decode_plan(&[1, 1], strategy), Err(Error::DuplicateErasure(1)));
	}
	assert_matches!(ReedSolomon::new(8, 8), Err(Error::InvalidConfiguration { .. }));
	assert_matches!(ReedSolomon::new(300, 8), Err(Error::InvalidConfiguration { .. }));

	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let data = random_units(&mut rng, 7, 16);
	assert_matches!(encode(&rs, &data), Err(Error::ShardCountMismatch { have: 7, want: 8 }));

	let mut units = random_stripe(&rs, &mut rng, 16);
	units[4].push(0);
	let mut shards = drop_units(&units, &[0]);
	assert_matches!(reconstruct(&rs, &mut shards, Strategy::Selection), Err(Error::ShardLengthMismatch { .. }));

	let mut shards = drop_units(&units[..9], &[0]);
	assert_matches!(
		reconstruct(&rs, &mut shards, Strategy::Selection),
		Err(Error::ShardCountMismatch { have: 9, want: 10 })
	);
}

#[test]
fn payload_roundtrips() {
	let payload = &BYTES[..TEST_DATA_CHUNK_SIZE];

	let rs = ReedSolomon::new(12, 8).unwrap();
	roundtrip(
		|p| encode_payload::<_, WrappedShard>(&rs, p),
		|shards, len| reconstruct_payload(&rs, shards, len, Strategy::Selection),
		payload,
		rs.r(),
	)
	.unwrap();

	let lrc = Lrc::new(8, 2, 2).unwrap();
	roundtrip(
		|p| encode_payload::<_, WrappedShard>(&lrc, p),
		|shards, len| reconstruct_payload(&lrc, shards, len, Strategy::ParityCheck),
		payload,
		3,
	)
	.unwrap();

	let msr = MsrCode::with_slice_unit(6, 4, 8).unwrap();
	roundtrip(
		|p| encode_payload::<_, WrappedShard>(&msr, p),
		|shards, len| reconstruct_payload(&msr, shards, len, Strategy::ParityCheck),
		payload,
		msr.r(),
	)
	.unwrap();
}

#[test]
fn striping() {
	let rs = ReedSolomon::new(6, 4).unwrap();
	assert_matches!(stripe::<_, Vec<u8>>(&rs, &[]), Err(Error::PayloadSizeIsZero));
	assert_eq!(unit_len(&rs, 9), 3);

	let units = stripe::<_, Vec<u8>>(&rs, b"abcdefghi").unwrap();
	assert_eq!(units, vec![b"abc".to_vec(), b"def".to_vec(), b"ghi".to_vec(), vec![0, 0, 0]]);
	itertools::assert_equal(unstripe(&units, 9), b"abcdefghi".iter().copied());
	itertools::assert_equal(unstripe(&units, 4), b"abcd".iter().copied());

	let msr = MsrCode::with_slice_unit(6, 4, 16).unwrap();
	assert_eq!(unit_len(&msr, 9), 16);
}

#[test]
fn cached_decoder_reuses_plan() {
	let rs = ReedSolomon::new(10, 6).unwrap();
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let units = random_stripe(&rs, &mut rng, 40);
	let mut decoder = CachedDecoder::new(rs);

	let first = decoder.decode_plan(&[7, 2], Strategy::Selection).unwrap().clone();
	assert_eq!(first.targets, vec![2, 7]);
	assert_eq!(decoder.decode_plan(&[2, 7], Strategy::Selection).unwrap(), &first);
	assert_ne!(decoder.decode_plan(&[2, 8], Strategy::Selection).unwrap(), &first);

	for _ in 0..3 {
		let mut shards = drop_units(&units, &[2, 8]);
		decoder.reconstruct(&mut shards, Strategy::Selection).unwrap();
		assert_units_recovered(&units, &shards, &[2, 8]);
	}
	assert_eq!(decoder.into_inner().n(), 10);
}

#[test]
fn custom_engine_sees_plan_matrix() {
	use std::cell::Cell;

	struct Counting(Cell<usize>);

	impl LinearCombine for Counting {
		fn combine(&self, coeffs: &Matrix, sources: &[&[u8]], targets: &mut [&mut [u8]]) {
			self.0.set(self.0.get() + coeffs.rows() * coeffs.cols());
			TableCombine.combine(coeffs, sources, targets)
		}
	}

	let rs = ReedSolomon::new(7, 4).unwrap();
	let engine = Counting(Cell::new(0));
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let data = random_units(&mut rng, 4, 12);
	let parity = encode_with(&rs, &engine, &data).unwrap();
	assert_eq!(engine.0.get(), 3 * 4);

	let units = data.into_iter().chain(parity).collect::<Vec<_>>();
	let mut shards = drop_units(&units, &[1, 5]);
	reconstruct_with(&rs, &engine, &mut shards, Strategy::ParityCheck).unwrap();
	assert_eq!(engine.0.get(), 3 * 4 + 2 * 4);
	assert_units_recovered(&units, &shards, &[1, 5]);
}

use itertools::Itertools;
use rand::prelude::*;
use rand::seq::index::IndexVec;
use std::error;
use std::fmt::Debug;
use std::result;

pub static SMALL_RNG_SEED: [u8; 32] = [
	0, 6, 0xFA, 0, 0x37, 3, 19, 89, 32, 032, 0x37, 0x77, 77, 0b11, 112, 52, 12, 40, 82, 34, 0, 0, 0, 1, 4, 4, 1, 4, 99,
	127, 121, 107,
];

/// Demo test data, generated via `build.rs`.
pub const BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/rand_data.bin"));

/// Shared payload size for simple, quirk turnaround tests:
pub const TEST_DATA_CHUNK_SIZE: usize = 1337;

/// Unit lengths around typical vector widths, plus one large odd length.
pub const EDGE_LENGTHS: &[usize] = &[1, 63, 64, 65, 4099];

/// `count` units of `len` random bytes.
pub fn random_units(rng: &mut impl Rng, count: usize, len: usize) -> Vec<Vec<u8>> {
	(0..count)
		.map(|_| {
			let mut unit = vec![0u8; len];
			rng.fill_bytes(&mut unit);
			unit
		})
		.collect()
}

/// `count` units of `len` copies of `byte`.
pub fn constant_units(count: usize, len: usize, byte: u8) -> Vec<Vec<u8>> {
	vec![vec![byte; len]; count]
}

/// Every erasure set of size `1..=max` over `n` units, ascending.
pub fn erasure_sets(n: usize, max: usize) -> impl Iterator<Item = Vec<usize>> {
	(1..=max).flat_map(move |count| (0..n).combinations(count))
}

/// `count` distinct unit indices below `n`, sorted.
pub fn sample_erasures(rng: &mut impl Rng, n: usize, count: usize) -> Vec<usize> {
	let mut erased = rand::seq::index::sample(rng, n, count).into_vec();
	erased.sort_unstable();
	erased
}

/// Clone `units` into the received arrangement with `erased` missing.
pub fn drop_units<T: Clone>(units: &[T], erased: &[usize]) -> Vec<Option<T>> {
	units
		.iter()
		.enumerate()
		.map(|(i, unit)| if erased.contains(&i) { None } else { Some(unit.clone()) })
		.collect()
}

/// Assert all units are present again and the erased ones match their originals.
pub fn assert_units_recovered<T: AsRef<[u8]> + Debug>(expected: &[T], recovered: &[Option<T>], erased: &[usize]) {
	assert_eq!(expected.len(), recovered.len());
	for (i, unit) in recovered.iter().enumerate() {
		let unit = unit.as_ref().unwrap_or_else(|| panic!("unit {} was not recovered (erased {:?})", i, erased));
		assert_eq!(unit.as_ref(), expected[i].as_ref(), "unit {} differs (erased {:?})", i, erased);
	}
}

/// Drop `max` random units.
pub fn drop_random_max<T>(shards: &mut [Option<T>], max: usize, rng: &mut impl rand::Rng) -> IndexVec {
	let iv = rand::seq::index::sample(rng, shards.len(), max.min(shards.len()));
	iv.iter().for_each(|idx| {
		shards[idx] = None;
	});
	iv
}

/// Encode `payload`, lose `max_erasures` random units and check the payload comes back.
pub fn roundtrip<'s, Enc, Recon, S, E>(
	encode: Enc,
	reconstruct: Recon,
	payload: &'s [u8],
	max_erasures: usize,
) -> result::Result<(), E>
where
	Enc: Fn(&'s [u8]) -> result::Result<Vec<S>, E>,
	Recon: Fn(Vec<Option<S>>, usize) -> result::Result<Vec<u8>, E>,
	E: error::Error + Send + Sync + 'static,
	S: Clone + AsRef<[u8]>,
{
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	roundtrip_w_drop_closure(encode, reconstruct, payload, |shards: &mut [Option<S>]| {
		drop_random_max(shards, max_erasures, &mut rng)
	})
}

pub fn roundtrip_w_drop_closure<'s, Enc, Recon, DropFun, S, E>(
	encode: Enc,
	reconstruct: Recon,
	payload: &'s [u8],
	mut drop: DropFun,
) -> result::Result<(), E>
where
	Enc: Fn(&'s [u8]) -> result::Result<Vec<S>, E>,
	Recon: Fn(Vec<Option<S>>, usize) -> result::Result<Vec<u8>, E>,
	DropFun: FnMut(&mut [Option<S>]) -> IndexVec,
	E: error::Error + Send + Sync + 'static,
	S: Clone + AsRef<[u8]>,
{
	let shards = encode(payload)?;

	// Make a copy and transform it into option shards arrangement
	// for feeding into reconstruct
	let mut received = shards.into_iter().map(Some).collect::<Vec<Option<S>>>();
	let dropped = drop(received.as_mut_slice());

	let recovered = reconstruct(received, payload.len())?;
	assert_eq!(recovered.as_slice(), payload, "payload mismatch after dropping {:?}", dropped.into_vec());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn erasure_sets_are_complete() {
		// 5 + 10 + 10
		assert_eq!(erasure_sets(5, 3).count(), 25);
		assert_matches!(erasure_sets(4, 2).next(), Some(v) if v == vec![0]);
		assert!(erasure_sets(6, 2).all(|e| e.windows(2).all(|w| w[0] < w[1])));
	}

	#[test]
	fn sampled_erasures_are_sorted_and_distinct() {
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		for _ in 0..100 {
			let erased = sample_erasures(&mut rng, 12, 4);
			assert_eq!(erased.len(), 4);
			assert!(erased.windows(2).all(|w| w[0] < w[1]));
			assert!(erased.iter().all(|&e| e < 12));
		}
	}

	#[test]
	fn dropping() {
		let units = constant_units(4, 3, 7);
		let dropped = drop_units(&units, &[1, 3]);
		assert_eq!(dropped.iter().filter(|u| u.is_none()).count(), 2);
		assert_eq!(dropped[0].as_deref(), Some(&[7u8, 7, 7][..]));

		let mut shards = units.into_iter().map(Some).collect::<Vec<_>>();
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		let iv = drop_random_max(&mut shards, 2, &mut rng);
		assert_eq!(iv.len(), 2);
		assert_eq!(shards.iter().filter(|u| u.is_none()).count(), 2);
	}

	#[test]
	fn shipped_random_data() {
		assert_eq!(BYTES.len(), 10_000_000);
		assert!(BYTES.iter().any(|&b| b != BYTES[0]));
	}
}

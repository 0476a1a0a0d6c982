//! Code independent encoding and reconstruction of byte units.

use crate::decode::{DecodePlan, Strategy};
use crate::engine::{LinearCombine, TableCombine};
use crate::errors::*;
use crate::matrix::Matrix;
use crate::msr::SubPacketLayout;
use crate::shard::Shard;
use crate::util::next_multiple_of;

/// A systematic linear erasure code over `n` units, the first `k` carry data.
pub trait ErasureCode {
	/// Total number of units.
	fn n(&self) -> usize;

	/// Number of data units.
	fn k(&self) -> usize;

	/// Number of redundancy units.
	fn r(&self) -> usize {
		self.n() - self.k()
	}

	/// How each unit splits into sub-packets.
	fn layout(&self) -> SubPacketLayout {
		SubPacketLayout::whole()
	}

	/// Systematic generator of `n * l` rows and `k * l` columns.
	fn encode_matrix(&self) -> &Matrix;

	/// Plan the recovery of the erased units.
	///
	/// Plan indices refer to sub-packets, `unit * l + j`.
	fn decode_plan(&self, erasures: &[usize], strategy: Strategy) -> Result<DecodePlan>;
}

fn common_len(mut lens: impl Iterator<Item = usize>) -> Result<Option<usize>> {
	let Some(first) = lens.next() else {
		return Ok(None);
	};
	for len in lens {
		if len != first {
			return Err(Error::ShardLengthMismatch { have: len, want: first });
		}
	}
	Ok(Some(first))
}

/// Compute the `n - k` redundancy units for `data`.
pub fn encode<C, S>(code: &C, data: &[S]) -> Result<Vec<S>>
where
	C: ErasureCode + ?Sized,
	S: Shard,
{
	encode_with(code, &TableCombine, data)
}

pub fn encode_with<C, E, S>(code: &C, engine: &E, data: &[S]) -> Result<Vec<S>>
where
	C: ErasureCode + ?Sized,
	E: LinearCombine + ?Sized,
	S: Shard,
{
	let k = code.k();
	if data.len() != k {
		return Err(Error::ShardCountMismatch { have: data.len(), want: k });
	}
	let len = common_len(data.iter().map(|d| d.as_ref().len()))?.unwrap_or(0);
	let layout = code.layout();
	let l = layout.count();

	let mut pieces = Vec::with_capacity(k * l);
	for unit in data {
		pieces.extend(layout.split(unit.as_ref())?);
	}
	let sources = pieces.iter().map(Vec::as_slice).collect::<Vec<_>>();

	let g = code.encode_matrix();
	let parity = g.submatrix(k * l..g.rows(), 0..k * l);
	let mut out = vec![vec![0u8; len / l]; parity.rows()];
	{
		let mut targets = out.iter_mut().map(Vec::as_mut_slice).collect::<Vec<_>>();
		engine.combine(&parity, &sources, &mut targets);
	}
	Ok(out.chunks(l).map(|subs| S::from(layout.join(subs))).collect())
}

/// Recover all `None` units in place.
pub fn reconstruct<C, S>(code: &C, shards: &mut [Option<S>], strategy: Strategy) -> Result<()>
where
	C: ErasureCode + ?Sized,
	S: Shard,
{
	reconstruct_with(code, &TableCombine, shards, strategy)
}

pub fn reconstruct_with<C, E, S>(code: &C, engine: &E, shards: &mut [Option<S>], strategy: Strategy) -> Result<()>
where
	C: ErasureCode + ?Sized,
	E: LinearCombine + ?Sized,
	S: Shard,
{
	if shards.len() != code.n() {
		return Err(Error::ShardCountMismatch { have: shards.len(), want: code.n() });
	}
	let erasures = erased_units(shards);
	if erasures.is_empty() {
		return Ok(());
	}
	let plan = code.decode_plan(&erasures, strategy)?;
	apply_plan(code, engine, &plan, shards)
}

/// Indices of the missing units.
pub fn erased_units<S>(shards: &[Option<S>]) -> Vec<usize> {
	shards.iter().enumerate().filter_map(|(i, s)| s.is_none().then_some(i)).collect()
}

/// Run `plan` against the present units and store every unit it fully recovers.
pub fn apply_plan<C, E, S>(code: &C, engine: &E, plan: &DecodePlan, shards: &mut [Option<S>]) -> Result<()>
where
	C: ErasureCode + ?Sized,
	E: LinearCombine + ?Sized,
	S: Shard,
{
	let n = code.n();
	let layout = code.layout();
	let l = layout.count();
	let survivors = shards.iter().filter(|s| s.is_some()).count();
	let missing = || Error::InsufficientSurvivors { have: survivors, min: code.k() };

	let len = common_len(shards.iter().flatten().map(|s| s.as_ref().len()))?.ok_or_else(missing)?;

	let mut pieces: Vec<Option<Vec<Vec<u8>>>> = vec![None; n];
	for &src in &plan.sources {
		let unit = src / l;
		if pieces[unit].is_none() {
			let shard = shards[unit].as_ref().ok_or_else(missing)?;
			pieces[unit] = Some(layout.split(shard.as_ref())?);
		}
	}
	let sources = plan
		.sources
		.iter()
		.map(|&src| pieces[src / l].as_ref().map(|subs| subs[src % l].as_slice()))
		.collect::<Option<Vec<_>>>()
		.ok_or_else(missing)?;

	let mut out = vec![vec![0u8; len / l]; plan.targets.len()];
	{
		let mut targets = out.iter_mut().map(Vec::as_mut_slice).collect::<Vec<_>>();
		engine.combine(&plan.matrix, &sources, &mut targets);
	}

	let mut recovered: Vec<Option<Vec<u8>>> = vec![None; n * l];
	for (&t, sub) in plan.targets.iter().zip(out) {
		recovered[t] = Some(sub);
	}
	for unit in 0..n {
		if shards[unit].is_some() {
			continue;
		}
		if let Some(subs) = recovered[unit * l..(unit + 1) * l].iter_mut().map(Option::take).collect::<Option<Vec<_>>>() {
			shards[unit] = Some(S::from(layout.join(&subs)));
		}
	}
	Ok(())
}

/// Length of each data unit needed to carry `payload_len` bytes.
pub fn unit_len<C: ErasureCode + ?Sized>(code: &C, payload_len: usize) -> usize {
	let k = code.k();
	next_multiple_of((payload_len + k - 1) / k, code.layout().unit_multiple())
}

/// Split `payload` into `k` zero padded data units.
pub fn stripe<C, S>(code: &C, payload: &[u8]) -> Result<Vec<S>>
where
	C: ErasureCode + ?Sized,
	S: Shard,
{
	if payload.is_empty() {
		return Err(Error::PayloadSizeIsZero);
	}
	let len = unit_len(code, payload.len());
	let mut units = vec![vec![0u8; len]; code.k()];
	for (chunk, unit) in payload.chunks(len).zip(units.iter_mut()) {
		unit[..chunk.len()].copy_from_slice(chunk);
	}
	Ok(units.into_iter().map(S::from).collect())
}

/// Striped data units followed by their redundancy, `n` units in total.
pub fn encode_payload<C, S>(code: &C, payload: &[u8]) -> Result<Vec<S>>
where
	C: ErasureCode + ?Sized,
	S: Shard,
{
	let mut units = stripe::<C, S>(code, payload)?;
	let parity = encode(code, &units)?;
	units.extend(parity);
	Ok(units)
}

/// Concatenate the data units and cut the padding.
pub fn unstripe<S: Shard>(data: &[S], payload_len: usize) -> Vec<u8> {
	let mut payload = Vec::with_capacity(payload_len);
	for unit in data {
		let rest = payload_len - payload.len();
		let unit = unit.as_ref();
		payload.extend_from_slice(&unit[..rest.min(unit.len())]);
	}
	payload
}

/// Reconstruct whatever is missing and return the first `payload_len` bytes.
pub fn reconstruct_payload<C, S>(
	code: &C,
	mut shards: Vec<Option<S>>,
	payload_len: usize,
	strategy: Strategy,
) -> Result<Vec<u8>>
where
	C: ErasureCode + ?Sized,
	S: Shard,
{
	let have = shards.iter().filter(|s| s.is_some()).count();
	reconstruct(code, &mut shards, strategy)?;
	let data = shards
		.into_iter()
		.take(code.k())
		.collect::<Option<Vec<S>>>()
		.ok_or(Error::InsufficientSurvivors { have, min: code.k() })?;
	Ok(unstripe(&data, payload_len))
}

/// Keeps the plan of the last erasure pattern, repeated failures of the same
/// units skip the matrix work.
pub struct CachedDecoder<C> {
	code: C,
	erasures: Vec<usize>,
	strategy: Option<Strategy>,
	plan: DecodePlan,
}

impl<C: ErasureCode> CachedDecoder<C> {
	pub fn new(code: C) -> Self {
		Self { code, erasures: Vec::new(), strategy: None, plan: DecodePlan::empty() }
	}

	pub fn code(&self) -> &C {
		&self.code
	}

	pub fn into_inner(self) -> C {
		self.code
	}

	pub fn decode_plan(&mut self, erasures: &[usize], strategy: Strategy) -> Result<&DecodePlan> {
		let mut key = erasures.to_vec();
		key.sort_unstable();
		if self.strategy != Some(strategy) || self.erasures != key {
			log::trace!("decode plan cache miss for {:?}", key);
			self.plan = self.code.decode_plan(&key, strategy)?;
			self.erasures = key;
			self.strategy = Some(strategy);
		}
		Ok(&self.plan)
	}

	pub fn reconstruct<S: Shard>(&mut self, shards: &mut [Option<S>], strategy: Strategy) -> Result<()> {
		if shards.len() != self.code.n() {
			return Err(Error::ShardCountMismatch { have: shards.len(), want: self.code.n() });
		}
		let erasures = erased_units(shards);
		if erasures.is_empty() {
			return Ok(());
		}
		self.decode_plan(&erasures, strategy)?;
		apply_plan(&self.code, &TableCombine, &self.plan, shards)
	}
}

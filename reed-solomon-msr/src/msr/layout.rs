use crate::errors::*;

/// Upper bound for the default slice unit.
pub const DEFAULT_SLICE_UNIT: usize = 1024;

/// Split of a unit into `count` equally sized sub-packets.
///
/// The unit is cut into chunks of `slice_unit` bytes, every chunk contributes
/// one slice of `slice_unit / count` bytes to each sub-packet in order. With
/// `slice_unit == unit length` the sub-packets are contiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubPacketLayout {
	count: usize,
	slice_unit: usize,
}

impl SubPacketLayout {
	/// One sub-packet covering the whole unit.
	pub const fn whole() -> Self {
		Self { count: 1, slice_unit: 1 }
	}

	pub fn new(count: usize, slice_unit: usize) -> Result<Self> {
		if count == 0 || slice_unit == 0 || slice_unit % count != 0 {
			return Err(Error::ShardLengthNotAligned { len: slice_unit, multiple: count.max(1) });
		}
		Ok(Self { count, slice_unit })
	}

	/// Largest multiple of `count` not above [`DEFAULT_SLICE_UNIT`], at least `count`.
	pub fn with_default_slice_unit(count: usize) -> Result<Self> {
		let slice_unit = (DEFAULT_SLICE_UNIT / count.max(1)).max(1) * count;
		Self::new(count, slice_unit)
	}

	#[inline(always)]
	pub fn count(&self) -> usize {
		self.count
	}

	#[inline(always)]
	pub fn slice_unit(&self) -> usize {
		self.slice_unit
	}

	/// Bytes each chunk contributes to one sub-packet.
	#[inline(always)]
	pub fn slice(&self) -> usize {
		self.slice_unit / self.count
	}

	/// Unit lengths must be a multiple of this.
	#[inline(always)]
	pub fn unit_multiple(&self) -> usize {
		self.slice_unit
	}

	pub fn check_unit_len(&self, len: usize) -> Result<()> {
		if len % self.slice_unit != 0 {
			return Err(Error::ShardLengthNotAligned { len, multiple: self.slice_unit });
		}
		Ok(())
	}

	pub fn split(&self, unit: &[u8]) -> Result<Vec<Vec<u8>>> {
		self.check_unit_len(unit.len())?;
		if self.count == 1 {
			return Ok(vec![unit.to_vec()]);
		}
		let slice = self.slice();
		let mut subs = vec![Vec::with_capacity(unit.len() / self.count); self.count];
		for chunk in unit.chunks_exact(self.slice_unit) {
			for (sub, piece) in subs.iter_mut().zip(chunk.chunks_exact(slice)) {
				sub.extend_from_slice(piece);
			}
		}
		Ok(subs)
	}

	/// Inverse of [`split`](Self::split).
	pub fn join<T: AsRef<[u8]>>(&self, subs: &[T]) -> Vec<u8> {
		assert_eq!(subs.len(), self.count, "expected {} sub-packets", self.count);
		if self.count == 1 {
			return subs[0].as_ref().to_vec();
		}
		let slice = self.slice();
		let sub_len = subs[0].as_ref().len();
		assert!(subs.iter().all(|s| s.as_ref().len() == sub_len));
		let mut unit = Vec::with_capacity(sub_len * self.count);
		for c in 0..(sub_len / slice) {
			for sub in subs {
				unit.extend_from_slice(&sub.as_ref()[c * slice..(c + 1) * slice]);
			}
		}
		unit
	}
}

impl Default for SubPacketLayout {
	fn default() -> Self {
		Self::whole()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn slices_are_interleaved() {
		let layout = SubPacketLayout::new(4, 8).unwrap();
		assert_eq!(layout.slice(), 2);
		let unit = (0u8..16).collect::<Vec<_>>();
		let subs = layout.split(&unit).unwrap();
		assert_eq!(subs, vec![vec![0, 1, 8, 9], vec![2, 3, 10, 11], vec![4, 5, 12, 13], vec![6, 7, 14, 15]]);
		assert_eq!(layout.join(&subs), unit);
	}

	#[test]
	fn contiguous_when_slice_unit_is_unit() {
		let layout = SubPacketLayout::new(3, 12).unwrap();
		let unit = (0u8..12).collect::<Vec<_>>();
		let subs = layout.split(&unit).unwrap();
		assert_eq!(subs[1], vec![4, 5, 6, 7]);
	}

	#[test]
	fn default_slice_unit() {
		assert_eq!(SubPacketLayout::with_default_slice_unit(16).unwrap().slice_unit(), 1024);
		assert_eq!(SubPacketLayout::with_default_slice_unit(27).unwrap().slice_unit(), 999);
		assert_eq!(SubPacketLayout::with_default_slice_unit(2048).unwrap().slice_unit(), 2048);
		assert_eq!(SubPacketLayout::whole().unit_multiple(), 1);
	}

	#[test]
	fn misaligned() {
		assert_matches!(SubPacketLayout::new(4, 6), Err(Error::ShardLengthNotAligned { .. }));
		let layout = SubPacketLayout::new(4, 8).unwrap();
		assert_matches!(layout.split(&[0u8; 12]), Err(Error::ShardLengthNotAligned { len: 12, multiple: 8 }));
	}
}

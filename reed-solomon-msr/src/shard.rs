/// A byte buffer holding one unit of a stripe.
pub trait Shard: Clone + AsRef<[u8]> + AsMut<[u8]> + From<Vec<u8>> {}

impl<T> Shard for T where T: Clone + AsRef<[u8]> + AsMut<[u8]> + From<Vec<u8>> {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WrappedShard {
	inner: Vec<u8>,
}

impl WrappedShard {
	/// Wrap `data`.
	pub fn new(data: Vec<u8>) -> Self {
		Self { inner: data }
	}

	/// Unwrap and yield inner data.
	pub fn into_inner(self) -> Vec<u8> {
		self.inner
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl AsRef<[u8]> for WrappedShard {
	fn as_ref(&self) -> &[u8] {
		self.inner.as_slice()
	}
}

impl AsMut<[u8]> for WrappedShard {
	fn as_mut(&mut self) -> &mut [u8] {
		self.inner.as_mut_slice()
	}
}

impl From<Vec<u8>> for WrappedShard {
	fn from(data: Vec<u8>) -> Self {
		Self::new(data)
	}
}

impl From<WrappedShard> for Vec<u8> {
	fn from(shard: WrappedShard) -> Self {
		shard.into_inner()
	}
}

impl std::iter::FromIterator<u8> for WrappedShard {
	fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
		Self::new(Vec::from_iter(iter))
	}
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Matrix is singular, no pivot in column {column}")]
	SingularMatrix { column: usize },

	#[error("{have} erasures exceed the tolerance of {max}")]
	UnrecoverableErasureCount { have: usize, max: usize },

	#[error("Invalid code configuration n = {n}, k = {k}: {reason}")]
	InvalidConfiguration { n: usize, k: usize, reason: &'static str },

	#[error("Needs at least {min} surviving units to decode, have {have}")]
	InsufficientSurvivors { have: usize, min: usize },

	#[error("Erased index {index} is out of range for {n} units")]
	ErasureOutOfRange { index: usize, n: usize },

	#[error("Erased index {0} is listed more than once")]
	DuplicateErasure(usize),

	#[error("Parity check elimination needs as many check rows ({checks}) as erased columns ({erasures})")]
	UnsupportedErasureCount { erasures: usize, checks: usize },

	#[error("Expected {want} shards, got {have}")]
	ShardCountMismatch { have: usize, want: usize },

	#[error("Shard length {have} differs from {want}")]
	ShardLengthMismatch { have: usize, want: usize },

	#[error("Shard length {len} is not a multiple of {multiple}")]
	ShardLengthNotAligned { len: usize, multiple: usize },

	#[error("Size of the payload is zero")]
	PayloadSizeIsZero,
}

pub type Result<T> = std::result::Result<T, Error>;

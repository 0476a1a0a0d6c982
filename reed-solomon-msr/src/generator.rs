use crate::errors::*;
use crate::field::*;
use crate::matrix::Matrix;

/// Choice of systematic generator for plain reed solomon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Construction {
	/// `G[i][j] = 1 / (i xor j)` below the identity, every `k x k` row subset is invertible.
	#[default]
	Cauchy,
	/// Powers of `2^(i-k)` below the identity. Not guaranteed MDS, kept for compatibility.
	Vandermonde,
}

pub(crate) fn check_params(n: usize, k: usize) -> Result<()> {
	if k == 0 {
		return Err(Error::InvalidConfiguration { n, k, reason: "needs at least one data unit" });
	}
	if n <= k {
		return Err(Error::InvalidConfiguration { n, k, reason: "needs at least one redundancy unit" });
	}
	if n > FIELD_SIZE {
		return Err(Error::InvalidConfiguration { n, k, reason: "at most 256 units fit the field" });
	}
	Ok(())
}

/// `n x k` systematic Cauchy generator.
pub fn gen_cauchy(n: usize, k: usize) -> Result<Matrix> {
	check_params(n, k)?;
	Ok(Matrix::from_fn(n, k, |i, j| {
		if i < k {
			if i == j {
				Additive::ONE
			} else {
				Additive::ZERO
			}
		} else {
			// i >= k > j so the xor is never zero
			Additive((i ^ j) as Elt).inv()
		}
	}))
}

/// `n x k` systematic Vandermonde-style generator.
pub fn gen_rs(n: usize, k: usize) -> Result<Matrix> {
	check_params(n, k)?;
	let mut m = Matrix::identity(k).vstack(&Matrix::zero(n - k, k));
	let mut gen = Additive::ONE;
	for i in k..n {
		let mut p = Additive::ONE;
		for j in 0..k {
			m[(i, j)] = p;
			p *= gen;
		}
		gen *= Additive(2);
	}
	Ok(m)
}

pub fn generator(construction: Construction, n: usize, k: usize) -> Result<Matrix> {
	match construction {
		Construction::Cauchy => gen_cauchy(n, k),
		Construction::Vandermonde => gen_rs(n, k),
	}
}

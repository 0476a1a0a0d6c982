use super::MsrParams;
use crate::errors::*;
use crate::field::*;
use crate::matrix::Matrix;

/// Coupling factor between the diagonal blocks above and below a node's digit.
pub const GAMMA: Additive = Additive(2);

/// Parity check matrix of `r * l` rows and `n * l` columns.
///
/// Row `i * l + a` is check `i` on sub-packet `a`, column `j * l + b` is
/// sub-packet `b` of node `j`. With node coefficient `lambda = j + 1` and `d`
/// the digit of `a` at the node's grid row:
///
/// * `d < u`: `lambda^i` on the diagonal,
/// * `d > u`: `GAMMA * lambda^i` on the diagonal,
/// * `d == u`: every `b` differing from `a` only in that digit, say with value
///   `q`, gets `(y * s + 1 + q)^i`.
pub fn gen_msr_meta(params: &MsrParams) -> Matrix {
	let MsrParams { n, r, s, l, .. } = *params;
	log::trace!("msr meta matrix {}x{}", r * l, n * l);
	let mut h = Matrix::zero(r * l, n * l);
	for i in 0..r {
		for j in 0..n {
			let (u, y) = params.node(j);
			let lambda = Additive((j + 1) as Elt);
			let diag = lambda.pow(i);
			for a in 0..l {
				let row = i * l + a;
				let d = params.digit(a, y);
				if d < u {
					h[(row, j * l + a)] = diag;
				} else if d > u {
					h[(row, j * l + a)] = GAMMA * diag;
				} else {
					for q in 0..s {
						let b = params.with_digit(a, y, q);
						h[(row, j * l + b)] = Additive((y * s + 1 + q) as Elt).pow(i);
					}
				}
			}
		}
	}
	h
}

/// Systematic encode matrix of `n * l` rows and `k * l` columns.
///
/// The redundancy block of the parity check matrix is inverted and multiplied
/// through the data block.
pub fn gen_msr_encode(params: &MsrParams, meta: &Matrix) -> Result<Matrix> {
	let MsrParams { n, k, l, .. } = *params;
	let rows = meta.rows();
	let parity_inv = meta.submatrix(0..rows, k * l..n * l).invert()?;
	let data = meta.submatrix(0..rows, 0..k * l);
	log::trace!("msr encode matrix {}x{}", n * l, k * l);
	Ok(Matrix::identity(k * l).vstack(&parity_inv.mul(&data)))
}

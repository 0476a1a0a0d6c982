/// Decompose `index` into `count` digits of base `radix`, least significant first.
///
/// Digits beyond the magnitude of `index` are zero, surplus magnitude beyond
/// `radix^count` is dropped.
pub fn digits_base_s(index: usize, radix: usize, count: usize) -> Vec<usize> {
	assert!(radix >= 2, "radix must be at least 2");
	let mut rest = index;
	(0..count)
		.map(|_| {
			let digit = rest % radix;
			rest /= radix;
			digit
		})
		.collect()
}

/// Inverse of [`digits_base_s`].
pub fn compose_digits(digits: &[usize], radix: usize) -> usize {
	digits.iter().rev().fold(0, |acc, &d| {
		debug_assert!(d < radix);
		acc * radix + d
	})
}

/// `base^exp`, `None` on overflow.
pub fn checked_ipow(base: usize, exp: usize) -> Option<usize> {
	let exp = u32::try_from(exp).ok()?;
	base.checked_pow(exp)
}

/// Round `len` up to the next multiple of `multiple`.
pub const fn next_multiple_of(len: usize, multiple: usize) -> usize {
	(len + multiple - 1) / multiple * multiple
}

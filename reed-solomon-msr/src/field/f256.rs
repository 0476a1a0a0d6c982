use derive_more::{BitXor, BitXorAssign};
use static_init::dynamic;

pub type Elt = u8;
pub type Wide = u16;

pub const FIELD_BITS: usize = 8;
pub const FIELD_SIZE: usize = 1 << FIELD_BITS;

/// Order of the multiplicative group, also the largest element.
pub const ONEMASK: Elt = (FIELD_SIZE - 1) as Elt;

/// Lower bits of the reduction polynomial `x^8 + x^4 + x^3 + x^2 + 1`.
pub const GENERATOR: Wide = 0x1D;

/// Element of GF(2^8) in its normal (additive) representation.
#[derive(Clone, Copy, Debug, Default, BitXor, BitXorAssign, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Additive(pub Elt);

/// Nonzero element of GF(2^8) in logarithm form, base `2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Multiplier(pub Elt);

pub struct Tables {
	/// `log[a]` for nonzero `a`, `log[0]` is unused.
	pub log: [Multiplier; FIELD_SIZE],
	/// `exp[i] = 2^i`, doubled so a sum of two logs indexes without reduction.
	pub exp: [Additive; FIELD_SIZE * 2],
}

impl Tables {
	fn generate() -> Self {
		let mut log = [Multiplier(0); FIELD_SIZE];
		let mut exp = [Additive(0); FIELD_SIZE * 2];
		let mut state: Wide = 1;
		for i in 0..(ONEMASK as usize) {
			exp[i] = Additive(state as Elt);
			log[state as usize] = Multiplier(i as Elt);
			state <<= 1;
			if state & (1 << FIELD_BITS) != 0 {
				state ^= (1 << FIELD_BITS) | GENERATOR;
			}
		}
		for i in (ONEMASK as usize)..exp.len() {
			exp[i] = exp[i - ONEMASK as usize];
		}
		Self { log, exp }
	}
}

#[dynamic(lazy)]
pub static TABLES: Tables = Tables::generate();

impl Additive {
	pub const ZERO: Additive = Additive(0);
	pub const ONE: Additive = Additive(1);

	#[inline(always)]
	pub fn to_wide(self) -> Wide {
		self.0 as Wide
	}

	#[inline(always)]
	pub fn is_zero(self) -> bool {
		self.0 == 0
	}

	/// Return the logarithm, `None` for zero.
	#[inline(always)]
	pub fn to_multiplier(self) -> Option<Multiplier> {
		if self.is_zero() {
			None
		} else {
			Some(TABLES.log[self.0 as usize])
		}
	}

	/// Multiply by a field element in log form.
	#[inline(always)]
	pub fn mul(self, other: Multiplier) -> Additive {
		if self.is_zero() {
			return self;
		}
		let log = TABLES.log[self.0 as usize].0 as usize + other.0 as usize;
		TABLES.exp[log]
	}

	/// Multiplicative inverse, zero maps to zero.
	#[inline(always)]
	pub fn inv(self) -> Additive {
		match self.to_multiplier() {
			None => Additive::ZERO,
			Some(Multiplier(log)) => TABLES.exp[(ONEMASK - log) as usize],
		}
	}

	/// `self^exponent` by repeated multiplication, `x^0 == 1` including `0^0`.
	pub fn pow(self, exponent: usize) -> Additive {
		(0..exponent).fold(Additive::ONE, |acc, _| acc * self)
	}
}

impl std::ops::Mul for Additive {
	type Output = Additive;

	#[inline(always)]
	fn mul(self, rhs: Additive) -> Additive {
		match rhs.to_multiplier() {
			None => Additive::ZERO,
			Some(rhs) => Additive::mul(self, rhs),
		}
	}
}

impl std::ops::MulAssign for Additive {
	fn mul_assign(&mut self, rhs: Additive) {
		*self = *self * rhs;
	}
}

impl std::ops::Div for Additive {
	type Output = Additive;

	/// Division by zero yields zero, as does the inverse.
	fn div(self, rhs: Additive) -> Additive {
		self * rhs.inv()
	}
}

impl From<Elt> for Additive {
	fn from(elt: Elt) -> Self {
		Additive(elt)
	}
}

impl From<Additive> for Elt {
	fn from(a: Additive) -> Self {
		a.0
	}
}

impl Multiplier {
	#[inline(always)]
	pub fn to_additive(self) -> Additive {
		TABLES.exp[self.0 as usize]
	}
}

/// Carry-less product of two field elements, not reduced.
pub fn bitpoly_mul16(a: Wide, b: Wide) -> Wide {
	let mut r: Wide = 0;
	for i in 0..FIELD_BITS {
		if (b >> i) & 1 != 0 {
			r ^= a << i;
		}
	}
	r
}

/// Table free multiplication, reduced by the field polynomial.
pub fn mul_bitpoly_reduced(a: Elt, b: Elt) -> Elt {
	let len = FIELD_BITS;
	let mut r: Wide = bitpoly_mul16(a as Wide, b as Wide);
	let red: Wide = (1 << FIELD_BITS) + GENERATOR;
	for i in (len..=(len * 2 - 1)).rev() {
		if r & (1 << i) != 0 {
			r ^= red << (i - len);
		}
	}
	(r & (ONEMASK as Wide)) as Elt
}

#[cfg(test)]
mod tests {
	use super::*;
	use quickcheck::{quickcheck, TestResult};

	#[test]
	fn tables_are_shared_across_threads() {
		let handles = (0..4)
			.map(|t| std::thread::spawn(move || (Additive(t + 2) * Additive(t + 2).inv(), TABLES.exp[ONEMASK as usize])))
			.collect::<Vec<_>>();
		for handle in handles {
			assert_eq!(handle.join().unwrap(), (Additive::ONE, Additive::ONE));
		}
		assert_eq!(TABLES.log[1], Multiplier(0));
	}

	#[test]
	fn generator_cycles_through_all_nonzero() {
		let mut seen = [false; FIELD_SIZE];
		for i in 0..(ONEMASK as usize) {
			let a = TABLES.exp[i];
			assert!(!a.is_zero());
			assert!(!seen[a.0 as usize], "2^{} repeats", i);
			seen[a.0 as usize] = true;
		}
		assert_eq!(seen.iter().filter(|x| **x).count(), ONEMASK as usize);
	}

	#[test]
	fn known_products() {
		assert_eq!(Additive(2) * Additive(0x80), Additive(0x1D));
		assert_eq!(Additive(3) * Additive(7), Additive(9));
		assert_eq!(Additive(0) * Additive(0xFF), Additive::ZERO);
		assert_eq!(Additive(0x53) * Additive::ONE, Additive(0x53));
	}

	#[test]
	fn table_mul_eq_bitpoly_mul() {
		for a in 0..=ONEMASK {
			for b in 0..=ONEMASK {
				assert_eq!((Additive(a) * Additive(b)).0, mul_bitpoly_reduced(a, b), "{} * {}", a, b);
			}
		}
	}

	#[test]
	fn inverse_of_every_nonzero() {
		assert_eq!(Additive::ZERO.inv(), Additive::ZERO);
		for a in 1..=ONEMASK {
			let a = Additive(a);
			assert_eq!(a * a.inv(), Additive::ONE);
		}
	}

	#[test]
	fn pow_matches_log_form() {
		assert_eq!(Additive::ZERO.pow(0), Additive::ONE);
		assert_eq!(Additive::ZERO.pow(3), Additive::ZERO);
		for a in 1..=ONEMASK {
			let a = Additive(a);
			let log = a.to_multiplier().unwrap().0 as usize;
			for t in 0..6 {
				assert_eq!(a.pow(t), Multiplier(((log * t) % ONEMASK as usize) as Elt).to_additive());
			}
		}
	}

	#[test]
	fn field_laws() {
		fn prop(a: u8, b: u8, c: u8) -> TestResult {
			let (a, b, c) = (Additive(a), Additive(b), Additive(c));
			if a * b != b * a {
				return TestResult::failed();
			}
			if (a * b) * c != a * (b * c) {
				return TestResult::failed();
			}
			TestResult::from_bool(a * (b ^ c) == (a * b) ^ (a * c))
		}
		quickcheck(prop as fn(u8, u8, u8) -> TestResult);
	}
}

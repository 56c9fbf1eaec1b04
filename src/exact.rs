//! Exact arithmetic on the magnitudes the oracle compares.
//!
//! Both binary values (`c · 2^q`) and decimals (`d · 10^k`) are represented
//! as `coefficient · 2^pow2 · 10^pow10` over arbitrary precision integers,
//! so comparisons and distances never lose precision.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;

use crate::constants::flog10pow2;

/// A non-negative exact value `coefficient · 2^pow2 · 10^pow10`.
#[derive(Debug, Clone)]
pub struct Exact {
    coefficient: BigUint,
    pow2: i32,
    pow10: i32,
}

/// The two decimals with a fixed number of significant digits that
/// bracket a value, on the grid of the value's own decade.
#[derive(Debug, Clone)]
pub struct GridNeighbors {
    /// Decimal exponent of one grid step.
    pub exp10: i32,
    /// Largest grid point not above the value.
    pub floor: BigUint,
    /// Smallest grid point above the value, absent when the value is on the grid.
    pub ceil: Option<BigUint>,
}

impl GridNeighbors {
    /// Grid points in the order they should be considered.
    pub fn candidates(&self) -> Vec<BigUint> {
        let mut candidates = vec![self.floor.clone()];
        if let Some(ceil) = &self.ceil {
            candidates.push(ceil.clone());
        }
        candidates
    }
}

fn ten_to(k: u32) -> BigUint {
    num_traits::pow(BigUint::from(10u32), k as usize)
}

impl Exact {
    pub fn zero() -> Exact {
        Exact { coefficient: BigUint::zero(), pow2: 0, pow10: 0 }
    }

    /// `c · 2^q`.
    pub fn binary(c: u64, q: i32) -> Exact {
        Exact { coefficient: BigUint::from(c), pow2: q, pow10: 0 }
    }

    /// `digits · 10^exp10`.
    pub fn decimal(digits: BigUint, exp10: i32) -> Exact {
        Exact { coefficient: digits, pow2: 0, pow10: exp10 }
    }

    pub fn power_of_ten(exp10: i32) -> Exact {
        Exact::decimal(BigUint::one(), exp10)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Coefficient rescaled to the (smaller or equal) base `2^pow2 · 10^pow10`.
    fn scaled_to(&self, pow2: i32, pow10: i32) -> BigUint {
        debug_assert!(self.pow2 >= pow2 && self.pow10 >= pow10);
        let shifted = &self.coefficient << ((self.pow2 - pow2) as usize);
        shifted * ten_to((self.pow10 - pow10) as u32)
    }

    fn common_base(&self, other: &Exact) -> (i32, i32) {
        (self.pow2.min(other.pow2), self.pow10.min(other.pow10))
    }

    /// `|self - other|`.
    pub fn abs_diff(&self, other: &Exact) -> Exact {
        let (pow2, pow10) = self.common_base(other);
        let a = self.scaled_to(pow2, pow10);
        let b = other.scaled_to(pow2, pow10);
        let coefficient = if a >= b { a - b } else { b - a };
        Exact { coefficient, pow2, pow10 }
    }

    /// Splits the value into an integer numerator and denominator after
    /// dividing it by `10^exp10`.
    fn ratio_over_pow10(&self, exp10: i32) -> (BigUint, BigUint) {
        let mut numerator = self.coefficient.clone();
        let mut denominator = BigUint::one();
        if self.pow2 >= 0 {
            numerator <<= self.pow2 as usize;
        } else {
            denominator <<= (-self.pow2) as usize;
        }
        let k = self.pow10 - exp10;
        if k >= 0 {
            numerator *= ten_to(k as u32);
        } else {
            denominator *= ten_to((-k) as u32);
        }
        (numerator, denominator)
    }

    /// `floor(self / 10^exp10)` and whether the division was exact.
    pub fn floor_on_grid(&self, exp10: i32) -> (BigUint, bool) {
        let (numerator, denominator) = self.ratio_over_pow10(exp10);
        let (quotient, remainder) = numerator.div_rem(&denominator);
        (quotient, remainder.is_zero())
    }

    /// The integer `e` with `10^e <= self < 10^(e+1)`. The value must be nonzero.
    pub fn decimal_exponent(&self) -> i32 {
        debug_assert!(!self.is_zero());
        let (numerator, denominator) = self.ratio_over_pow10(0);
        let log2_lower = numerator.bits() as i64 - denominator.bits() as i64 - 1;
        // 2^log2_lower <= value, so this estimate never exceeds the answer.
        let mut e = flog10pow2(log2_lower as i32);
        while Exact::power_of_ten(e + 1) <= *self {
            e += 1;
        }
        while Exact::power_of_ten(e) > *self {
            e -= 1;
        }
        e
    }

    /// The decimals with `digits` significant digits on either side of the value.
    pub fn grid_neighbors(&self, digits: usize) -> GridNeighbors {
        let exp10 = self.decimal_exponent() - digits as i32 + 1;
        let (floor, exact) = self.floor_on_grid(exp10);
        let ceil = if exact { None } else { Some(&floor + 1u32) };
        GridNeighbors { exp10, floor, ceil }
    }
}

impl PartialEq for Exact {
    fn eq(&self, other: &Exact) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Exact {}

impl PartialOrd for Exact {
    fn partial_cmp(&self, other: &Exact) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Exact {
    fn cmp(&self, other: &Exact) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        let (pow2, pow10) = self.common_base(other);
        self.scaled_to(pow2, pow10).cmp(&other.scaled_to(pow2, pow10))
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}·2^{}·10^{}", self.coefficient, self.pow2, self.pow10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_and_decimal_compare_exactly() {
        // 2^-1 == 5·10^-1
        assert_eq!(Exact::binary(1, -1), Exact::decimal(BigUint::from(5u32), -1));
        assert!(Exact::binary(3, -2) > Exact::decimal(BigUint::from(7u32), -1));
        assert!(Exact::zero() < Exact::binary(1, -149));
    }

    #[test]
    fn test_decimal_exponent() {
        assert_eq!(Exact::binary(1, 0).decimal_exponent(), 0);
        assert_eq!(Exact::binary(100, 0).decimal_exponent(), 2);
        assert_eq!(Exact::binary(99, 0).decimal_exponent(), 1);
        assert_eq!(Exact::binary(1, -149).decimal_exponent(), -45);
        assert_eq!(Exact::binary((1 << 24) - 1, 104).decimal_exponent(), 38);
        assert_eq!(Exact::binary(1, -1074).decimal_exponent(), -324);
        assert_eq!(Exact::power_of_ten(-7).decimal_exponent(), -7);
    }

    #[test]
    fn test_floor_on_grid() {
        // 2^-149 ≈ 1.401298e-45
        let (floor, exact) = Exact::binary(1, -149).floor_on_grid(-46);
        assert_eq!(floor, BigUint::from(14u32));
        assert!(!exact);

        let (floor, exact) = Exact::binary(100, 0).floor_on_grid(1);
        assert_eq!(floor, BigUint::from(10u32));
        assert!(exact);
    }

    #[test]
    fn test_grid_neighbors() {
        let neighbors = Exact::binary(1, -149).grid_neighbors(2);
        assert_eq!(neighbors.exp10, -46);
        assert_eq!(neighbors.floor, BigUint::from(14u32));
        assert_eq!(neighbors.ceil, Some(BigUint::from(15u32)));

        // the ceiling may carry into the next decade
        let below_decade = Exact::binary(9_999_999, 0).grid_neighbors(2);
        assert_eq!(below_decade.exp10, 5);
        assert_eq!(below_decade.floor, BigUint::from(99u32));
        assert_eq!(below_decade.ceil, Some(BigUint::from(100u32)));

        let below_decade = Exact::binary(19, -1).grid_neighbors(1);
        assert_eq!(below_decade.exp10, 0);
        assert_eq!(below_decade.floor, BigUint::from(9u32));
        assert_eq!(below_decade.ceil, Some(BigUint::from(10u32)));

        let on_grid = Exact::binary(25, 0).grid_neighbors(2);
        assert_eq!(on_grid.candidates(), vec![BigUint::from(25u32)]);
    }

    #[test]
    fn test_abs_diff() {
        let a = Exact::decimal(BigUint::from(14u32), -1);
        let b = Exact::binary(3, -1);
        assert_eq!(a.abs_diff(&b), Exact::decimal(BigUint::one(), -1));
        assert_eq!(b.abs_diff(&a), Exact::decimal(BigUint::one(), -1));
    }
}

// Numeric boundaries of a binary floating-point format.
// Everything here is derived from the precision and exponent width alone,
// then cross-checked against the platform and the converter elsewhere.

use num_bigint::BigUint;
use std::convert::TryFrom;
use num_integer::Integer;
use num_traits::Zero;

use crate::exact::Exact;
use crate::format::FloatFormat;

/// `floor(q · log10(2))`, exact for `|q| <= 5_456_721`.
pub fn flog10pow2(q: i32) -> i32 {
    ((q as i64 * 661_971_961_083) >> 41) as i32
}

/// The smallest `c` such that `c · 2^q_min` no longer takes the
/// sub-minimal path: `ceil(2^-q_min · 10^(k_min + 1))`.
///
/// `k_min` is `flog10pow2(q_min)`, so `10^k_min <= 2^q_min < 10^(k_min + 1)`
/// and the result always lies in `2..=10`.
pub fn c_tiny(q_min: i32, k_min: i32) -> u64 {
    let numerator = BigUint::from(1u32) << ((-q_min) as usize);
    let denominator = num_traits::pow(BigUint::from(10u32), (-(k_min + 1)) as usize);
    let (quotient, remainder) = numerator.div_rem(&denominator);
    let quotient = if remainder.is_zero() { quotient } else { quotient + 1u32 };
    debug_assert!(quotient.bits() < 64, "C_TINY = {} does not fit in 64 bits", quotient);
    u64::try_from(&quotient).unwrap_or(u64::MAX)
}

fn decimal_digit_count(mut n: u32) -> u32 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// Immutable boundaries of one binary format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatConstants<F: FloatFormat> {
    /// Significand bits, including the implicit bit.
    pub p: u32,
    /// Exponent field width.
    pub w: u32,
    pub q_min: i32,
    pub q_max: i32,
    pub c_min: u64,
    pub c_max: u64,
    pub k_min: i32,
    pub k_max: i32,
    /// Most significant digits a shortest rendering can need.
    pub h: u32,
    pub e_min: i32,
    pub e_max: i32,
    pub c_tiny: u64,
    pub min_value: F,
    pub min_normal: F,
    pub max_value: F,
    pub max_string_length: usize,
}

impl<F: FloatFormat> FormatConstants<F> {
    /// Measures the precision and exponent width of `F` from its bit layout.
    pub fn derive() -> Self {
        Self::from_parameters(F::precision(), F::exponent_width())
    }

    pub fn from_parameters(precision_bits: u32, exponent_width: u32) -> Self {
        let p = precision_bits as i32;
        let w = exponent_width;
        let q_min = -(1 << (w - 1)) - p + 3;
        let q_max = (1 << (w - 1)) - p;
        let c_min = 1u64 << (precision_bits - 1);
        let c_max = (1u64 << precision_bits) - 1;

        let k_min = flog10pow2(q_min);
        let k_max = flog10pow2(q_max);
        let h = (flog10pow2(p) + 2) as u32;

        let e_min = Exact::binary(1, q_min).decimal_exponent();
        let e_max = Exact::binary(c_max, q_max).decimal_exponent();

        // sign, point, exponent marker and exponent sign around the digits
        let exponent_digits = decimal_digit_count(e_min.unsigned_abs().max(e_max.unsigned_abs()));
        let max_string_length = (h + 4 + exponent_digits) as usize;

        FormatConstants {
            p: precision_bits,
            w,
            q_min,
            q_max,
            c_min,
            c_max,
            k_min,
            k_max,
            h,
            e_min,
            e_max,
            c_tiny: c_tiny(q_min, k_min),
            min_value: F::scalb(1, q_min),
            min_normal: F::scalb(c_min, q_min),
            max_value: F::scalb(c_max, q_max),
            max_string_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flog10pow2_matches_float_log() {
        for q in -2000..=2000 {
            let expected = (q as f64 * std::f64::consts::LOG10_2).floor() as i32;
            assert_eq!(flog10pow2(q), expected, "q = {}", q);
        }
    }

    #[test]
    fn test_c_tiny_stays_small_for_every_width() {
        for exponent_width in 2..=15 {
            for precision in 2..=60 {
                let q_min = -(1 << (exponent_width - 1)) - precision + 3;
                let value = c_tiny(q_min, flog10pow2(q_min));
                assert!((1..=10).contains(&value), "w = {}, p = {}: {}", exponent_width, precision, value);
            }
        }
        // binary16
        assert_eq!(c_tiny(-24, flog10pow2(-24)), 2);
    }

    #[test]
    fn test_binary32_constants() {
        let c = FormatConstants::<f32>::derive();
        assert_eq!(c.p, 24);
        assert_eq!(c.w, 8);
        assert_eq!(c.q_min, -149);
        assert_eq!(c.q_max, 104);
        assert_eq!(c.c_min, 1 << 23);
        assert_eq!(c.c_max, (1 << 24) - 1);
        assert_eq!(c.k_min, -45);
        assert_eq!(c.k_max, 31);
        assert_eq!(c.h, 9);
        assert_eq!(c.e_min, -45);
        assert_eq!(c.e_max, 38);
        assert_eq!(c.c_tiny, 8);
        assert_eq!(c.max_string_length, 15);
        assert_eq!(c.min_value.to_bits(), 1);
        assert_eq!(c.min_normal, f32::MIN_POSITIVE);
        assert_eq!(c.max_value, f32::MAX);
    }

    #[test]
    fn test_binary64_constants() {
        let c = FormatConstants::<f64>::derive();
        assert_eq!(c.p, 53);
        assert_eq!(c.w, 11);
        assert_eq!(c.q_min, -1074);
        assert_eq!(c.q_max, 971);
        assert_eq!(c.k_min, -324);
        assert_eq!(c.k_max, 292);
        assert_eq!(c.h, 17);
        assert_eq!(c.e_min, -324);
        assert_eq!(c.e_max, 308);
        assert_eq!(c.c_tiny, 3);
        assert_eq!(c.max_string_length, 24);
        assert_eq!(c.min_value.to_bits(), 1);
        assert_eq!(c.min_normal, f64::MIN_POSITIVE);
        assert_eq!(c.max_value, f64::MAX);
    }

    #[test]
    fn test_derivation_is_pure() {
        assert_eq!(FormatConstants::<f32>::derive(), FormatConstants::<f32>::derive());
        assert_eq!(
            FormatConstants::<f32>::derive(),
            FormatConstants::<f32>::from_parameters(24, 8)
        );
    }
}

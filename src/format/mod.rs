//! # Format adapters
//!
//! Binds the generic oracle to a concrete IEEE 754 layout. The capability
//! set is the [`FloatFormat`] trait: raw bit access, classification, exact
//! decomposition, hexadecimal rendering and the platform's own constants.
//! Most capabilities are provided methods computed from the bit pattern so
//! that an implementation only states how to move between the value and
//! its bits.

use std::fmt;
use std::ops::{Div, Mul, Neg};
use std::str::FromStr;

use crate::exact::Exact;

mod binary32;
mod binary64;

/// A fixed-width binary floating-point format whose every bit pattern is a
/// valid value.
pub trait FloatFormat:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::LowerExp
    + FromStr
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Short name used in campaign labels.
    const NAME: &'static str;
    const TOTAL_BITS: u32;
    /// Appended to the hexadecimal rendering.
    const HEX_SUFFIX: &'static str;
    /// Literals historically rendered too long or not closest.
    const ANOMALIES: &'static [&'static str];
    /// `(significand, binary exponent)` pairs from Paxson's test tables.
    const PAXSON: &'static [(u64, i32)];

    fn to_raw_bits(self) -> u64;
    /// Bits above the format width are ignored.
    fn from_raw_bits(bits: u64) -> Self;
    /// Nearest value to `i`.
    fn from_u64(i: u64) -> Self;

    fn platform_precision() -> u32;
    fn platform_min_value() -> Self;
    fn platform_min_normal() -> Self;
    fn platform_max_value() -> Self;

    fn bits_mask() -> u64 {
        u64::MAX >> (64 - Self::TOTAL_BITS)
    }

    fn sign_mask() -> u64 {
        1 << (Self::TOTAL_BITS - 1)
    }

    /// Significand bits including the implicit one, read off the layout of 3.
    fn precision() -> u32 {
        Self::from_u64(3).to_raw_bits().trailing_zeros() + 2
    }

    fn exponent_width() -> u32 {
        Self::TOTAL_BITS - Self::precision()
    }

    fn mantissa_mask() -> u64 {
        (1 << (Self::precision() - 1)) - 1
    }

    fn exponent_mask() -> u64 {
        Self::bits_mask() & !Self::sign_mask() & !Self::mantissa_mask()
    }

    /// The inverse parser.
    fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    /// Wrapping offset of the raw bit pattern.
    fn offset_bits(self, offset: i64) -> Self {
        Self::from_raw_bits(self.to_raw_bits().wrapping_add(offset as u64))
    }

    fn abs(self) -> Self {
        Self::from_raw_bits(self.to_raw_bits() & !Self::sign_mask())
    }

    fn is_sign_negative(self) -> bool {
        self.to_raw_bits() & Self::sign_mask() != 0
    }

    fn is_nan(self) -> bool {
        let bits = self.to_raw_bits();
        bits & Self::exponent_mask() == Self::exponent_mask() && bits & Self::mantissa_mask() != 0
    }

    fn is_infinite(self) -> bool {
        self.to_raw_bits() & !Self::sign_mask() == Self::exponent_mask()
    }

    fn is_positive_infinity(self) -> bool {
        self.to_raw_bits() == Self::exponent_mask()
    }

    fn is_negative_infinity(self) -> bool {
        self.to_raw_bits() == Self::exponent_mask() | Self::sign_mask()
    }

    /// All bits clear.
    fn is_plus_zero(self) -> bool {
        self.to_raw_bits() == 0
    }

    /// Only the sign bit set.
    fn is_minus_zero(self) -> bool {
        self.to_raw_bits() == Self::sign_mask()
    }

    fn is_zero(self) -> bool {
        self.is_plus_zero() || self.is_minus_zero()
    }

    /// `(negative, c, q)` with `|self| = c · 2^q`, for finite values.
    fn decompose(self) -> (bool, u64, i32) {
        let bits = self.to_raw_bits();
        let p = Self::precision();
        let q_min = -(1 << (Self::exponent_width() - 1)) - p as i32 + 3;
        let field = ((bits & Self::exponent_mask()) >> (p - 1)) as i32;
        let mantissa = bits & Self::mantissa_mask();
        let (c, q) = if field == 0 {
            (mantissa, q_min)
        } else {
            (mantissa | 1 << (p - 1), q_min + field - 1)
        };
        (self.is_sign_negative(), c, q)
    }

    /// Exact magnitude of a finite value.
    fn to_exact(self) -> Exact {
        let (_, c, q) = self.decompose();
        Exact::binary(c, q)
    }

    /// `c · 2^q` rounded to nearest, ties to even, built directly on the bit
    /// layout so no intermediate rounding happens.
    fn scalb(c: u64, q: i32) -> Self {
        compose::<Self>(false, c, q)
    }

    /// Whether the inverse parser gives back exactly this bit pattern.
    fn recovers(self, s: &str) -> bool {
        Self::parse(s).map_or(false, |v| v.to_raw_bits() == self.to_raw_bits())
    }

    /// The raw bit pattern, zero padded to the format width.
    fn bits_string(self) -> String {
        let width = (Self::TOTAL_BITS / 4) as usize;
        format!("0x{:0width$X}", self.to_raw_bits(), width = width)
    }

    /// Hexadecimal significand and binary exponent, `0x1.8p1` style.
    fn hex_string(self) -> String {
        if self.is_nan() {
            return "NaN".to_string();
        }
        let sign = if self.is_sign_negative() { "-" } else { "" };
        if self.is_infinite() {
            return format!("{}Infinity", sign);
        }
        if self.is_zero() {
            return format!("{}0x0.0p0{}", sign, Self::HEX_SUFFIX);
        }

        let p = Self::precision();
        let fraction_bits = p - 1;
        let hex_digits = (fraction_bits + 3) / 4;
        let bits = self.to_raw_bits();
        let field = (bits & Self::exponent_mask()) >> fraction_bits;
        let fraction = (bits & Self::mantissa_mask()) << (hex_digits * 4 - fraction_bits);
        let mut digits = format!("{:0width$x}", fraction, width = hex_digits as usize);
        while digits.len() > 1 && digits.ends_with('0') {
            digits.pop();
        }

        let min_normal_exponent = 2 - (1 << (Self::exponent_width() - 1));
        let (lead, exponent) = if field == 0 {
            (0, min_normal_exponent)
        } else {
            (1, field as i32 + min_normal_exponent - 1)
        };
        format!("{}0x{}.{}p{}{}", sign, lead, digits, exponent, Self::HEX_SUFFIX)
    }
}

/// Shifts `c` right by `shift` bits, rounding to nearest with ties to even.
fn round_shift_right(c: u64, shift: u32) -> u64 {
    if shift == 0 {
        return c;
    }
    if shift > 64 {
        return 0;
    }
    let kept = if shift == 64 { 0 } else { c >> shift };
    let dropped = if shift == 64 { c } else { c & ((1 << shift) - 1) };
    let half = 1u64 << (shift - 1);
    if dropped > half || (dropped == half && kept & 1 == 1) {
        kept + 1
    } else {
        kept
    }
}

/// Nearest value to `(-1)^negative · c · 2^q`.
pub(crate) fn compose<F: FloatFormat>(negative: bool, c: u64, q: i32) -> F {
    let sign = if negative { F::sign_mask() } else { 0 };
    if c == 0 {
        return F::from_raw_bits(sign);
    }
    let p = F::precision() as i32;
    let half_range = 1 << (F::exponent_width() - 1);
    let q_min = -half_range - p + 3;
    let q_max = half_range - p;

    let length = 64 - c.leading_zeros() as i32;
    let mut shift = length - p;
    if q + shift < q_min {
        shift = q_min - q;
    }
    let (mut m, mut e) = if shift > 0 {
        (round_shift_right(c, shift as u32), q + shift)
    } else {
        (c << (-shift) as u32, q + shift)
    };
    if m == 1 << p {
        m >>= 1;
        e += 1;
    }
    if e > q_max {
        return F::from_raw_bits(sign | F::exponent_mask());
    }

    let implicit = 1u64 << (p - 1);
    let bits = if m < implicit {
        m
    } else {
        (((e - q_min + 1) as u64) << (p - 1)) | (m - implicit)
    };
    F::from_raw_bits(sign | bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_layout() {
        assert_eq!(f32::precision(), 24);
        assert_eq!(f32::exponent_width(), 8);
        assert_eq!(f64::precision(), 53);
        assert_eq!(f64::exponent_width(), 11);
        assert_eq!(f32::bits_mask(), 0xFFFF_FFFF);
        assert_eq!(f32::exponent_mask(), 0x7F80_0000);
        assert_eq!(f64::sign_mask(), 1 << 63);
    }

    #[test]
    fn test_classification() {
        assert!(f32::from_raw_bits(0x7FC0_0001).is_nan());
        assert!(f32::from_raw_bits(0xFF80_0001).is_nan());
        assert!(!f32::from_raw_bits(0x7F80_0000).is_nan());
        assert!(f32::INFINITY.is_positive_infinity());
        assert!(f32::NEG_INFINITY.is_negative_infinity());
        assert!(!f32::NEG_INFINITY.is_positive_infinity());
        assert!(0.0f32.is_plus_zero());
        assert!((-0.0f32).is_minus_zero());
        assert!(!(-0.0f32).is_plus_zero());
        assert!(f64::NAN.is_nan());
        assert!((-0.0f64).is_minus_zero());
    }

    #[test]
    fn test_decompose() {
        assert_eq!(f32::from_raw_bits(1).decompose(), (false, 1, -149));
        assert_eq!(1.0f32.decompose(), (false, 1 << 23, -23));
        assert_eq!((-2.0f64).decompose(), (true, 1 << 52, -51));
        assert_eq!(f32::MAX.decompose(), (false, (1 << 24) - 1, 104));
    }

    #[test]
    fn test_scalb_is_exact_or_correctly_rounded() {
        assert_eq!(f32::scalb(1, -149).to_bits(), 1);
        assert_eq!(f32::scalb(1 << 23, -149), f32::MIN_POSITIVE);
        assert_eq!(f32::scalb((1 << 24) - 1, 104), f32::MAX);
        assert_eq!(f32::scalb(1, 128), f32::INFINITY);
        assert_eq!(f32::scalb(3, -150), f32::from_bits(2));
        assert_eq!(f32::scalb(1, -150), 0.0);
        assert_eq!(f64::scalb(1, -1074).to_bits(), 1);
        assert_eq!(f64::scalb((1 << 53) - 1, 971), f64::MAX);
        for &(c, q) in f32::PAXSON {
            let expected = (c as f64 * 2f64.powi(q)) as f32;
            assert_eq!(f32::scalb(c, q), expected, "{} * 2^{}", c, q);
        }
    }

    #[test]
    fn test_offset_bits_wraps() {
        assert_eq!(f32::from_raw_bits(0).offset_bits(-1).to_raw_bits(), 0xFFFF_FFFF);
        assert_eq!(f32::from_raw_bits(0xFFFF_FFFF).offset_bits(1).to_raw_bits(), 0);
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(1.0f32.hex_string(), "0x1.0p0F");
        assert_eq!(3.0f32.hex_string(), "0x1.8p1F");
        assert_eq!(f32::from_bits(1).hex_string(), "0x0.000002p-126F");
        assert_eq!(f32::MAX.hex_string(), "0x1.fffffep127F");
        assert_eq!((-0.0f32).hex_string(), "-0x0.0p0F");
        assert_eq!(f32::NAN.hex_string(), "NaN");
        assert_eq!(f64::from_bits(1).hex_string(), "0x0.0000000000001p-1022");
        assert_eq!(1.0f64.hex_string(), "0x1.0p0");
    }

    #[test]
    fn test_bits_string() {
        assert_eq!(f32::from_raw_bits(1).bits_string(), "0x00000001");
        assert_eq!((-0.0f64).bits_string(), "0x8000000000000000");
    }
}

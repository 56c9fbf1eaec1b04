//! # Value oracle
//!
//! Judges one rendering of one value. The checks run in a fixed order and
//! the first violated property is reported:
//!
//! 1. special values have exactly one canonical rendering each
//! 2. finite renderings follow the grammar of [`crate::rendering`] with the
//!    sign of the value and a decimal exponent within the format's range
//! 3. length and significant digit budget
//! 4. the inverse parser gives back the same bit pattern
//! 5. no neighbouring decimal of the same length that also round-trips is
//!    closer to the value (ties go to the even digit)
//! 6. no shorter decimal round-trips
//!
//! Checking a value never aborts a campaign: violations are recorded in the
//! [`FailureLog`] and the scan moves on.

use num_bigint::BigUint;
use num_integer::Integer;
use std::fmt;

use crate::constants::FormatConstants;
use crate::converter::Converter;
use crate::exact::Exact;
use crate::failure::{Failure, FailureLog};
use crate::format::FloatFormat;
use crate::rendering::{ParsedRendering, RenderingError};

pub const NAN: &str = "NaN";
pub const POSITIVE_INFINITY: &str = "Infinity";
pub const NEGATIVE_INFINITY: &str = "-Infinity";
pub const PLUS_ZERO: &str = "0.0";
pub const MINUS_ZERO: &str = "-0.0";

/// A property a rendering failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// NaN, an infinity or a zero was not rendered canonically.
    SpecialValue { expected: &'static str },
    Malformed(RenderingError),
    SignMismatch,
    ExponentOutOfRange { exponent: i32, min: i32, max: i32 },
    TooLong { length: usize, max: usize },
    TooManyDigits { digits: usize, max: u32 },
    /// The inverse parser does not give back the original bits.
    NotRecovering,
    NotClosest { closer: String },
    NotShortest { shorter: String },
}

impl Violation {
    /// Short name of the violated property.
    pub fn property(&self) -> &'static str {
        match self {
            Violation::SpecialValue { .. } => "special value",
            Violation::Malformed(_) | Violation::SignMismatch | Violation::ExponentOutOfRange { .. } => {
                "shape"
            }
            Violation::TooLong { .. } | Violation::TooManyDigits { .. } => "length",
            Violation::NotRecovering => "round trip",
            Violation::NotClosest { .. } => "closest",
            Violation::NotShortest { .. } => "shortest",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SpecialValue { expected } => write!(f, "expected {:?}", expected),
            Violation::Malformed(e) => write!(f, "malformed: {}", e),
            Violation::SignMismatch => write!(f, "sign does not match the value"),
            Violation::ExponentOutOfRange { exponent, min, max } => {
                write!(f, "decimal exponent {} outside [{}, {}]", exponent, min, max)
            }
            Violation::TooLong { length, max } => write!(f, "length {} exceeds {}", length, max),
            Violation::TooManyDigits { digits, max } => {
                write!(f, "{} significant digits exceed {}", digits, max)
            }
            Violation::NotRecovering => write!(f, "does not parse back to the same bits"),
            Violation::NotClosest { closer } => write!(f, "{} is closer and also round-trips", closer),
            Violation::NotShortest { shorter } => write!(f, "{} is shorter and also round-trips", shorter),
        }
    }
}

impl std::error::Error for Violation {}

/// Pass, or the first violated property.
pub type PropertyVerdict = Result<(), Violation>;

/// Checks renderings against the boundaries of one format.
#[derive(Debug, Clone, Copy)]
pub struct ValueOracle<'a, F: FloatFormat> {
    constants: &'a FormatConstants<F>,
}

fn candidate_string(negative: bool, digits: &BigUint, exp10: i32) -> String {
    format!("{}{}E{}", if negative { "-" } else { "" }, digits, exp10)
}

impl<'a, F: FloatFormat> ValueOracle<'a, F> {
    pub fn new(constants: &'a FormatConstants<F>) -> Self {
        ValueOracle { constants }
    }

    /// Converts `v` and records a failure if the rendering violates a property.
    /// Returns whether the value passed.
    pub fn record(&self, converter: &dyn Converter<F>, v: F, log: &mut FailureLog) -> bool {
        let rendering = converter.to_decimal(v);
        match self.check(v, &rendering) {
            Ok(()) => true,
            Err(violation) => {
                let failure = Failure::new(v, rendering, violation);
                log::warn!("{}", failure);
                log.push(failure);
                false
            }
        }
    }

    pub fn check(&self, v: F, s: &str) -> PropertyVerdict {
        if let Some(expected) = canonical_special(v) {
            return check_special::<F>(s, expected);
        }

        let parsed = ParsedRendering::parse(s).map_err(Violation::Malformed)?;
        if parsed.negative != v.is_sign_negative() {
            return Err(Violation::SignMismatch);
        }
        let c = self.constants;
        if parsed.exponent < c.e_min || parsed.exponent > c.e_max {
            return Err(Violation::ExponentOutOfRange {
                exponent: parsed.exponent,
                min: c.e_min,
                max: c.e_max,
            });
        }

        if s.len() > c.max_string_length {
            return Err(Violation::TooLong { length: s.len(), max: c.max_string_length });
        }
        let n = parsed.significant_digits();
        if n > c.h as usize {
            return Err(Violation::TooManyDigits { digits: n, max: c.h });
        }

        if !v.recovers(s) {
            return Err(Violation::NotRecovering);
        }

        let exact = v.to_exact();
        let rendered = parsed.to_exact();
        self.check_closest(v, &exact, &rendered, n)?;
        self.check_shortest(v, &exact, &rendered, n)
    }

    /// A one digit result may be written with two digits when that is
    /// closer, so the comparison grid never has fewer than two digits.
    fn check_closest(&self, v: F, exact: &Exact, rendered: &Exact, n: usize) -> PropertyVerdict {
        let negative = v.is_sign_negative();
        let neighbors = exact.grid_neighbors(n.max(2));
        let distance = rendered.abs_diff(exact);
        let (rendered_on_grid, on_grid) = rendered.floor_on_grid(neighbors.exp10);
        let rendered_even = on_grid && rendered_on_grid.is_even();

        for candidate in neighbors.candidates() {
            let value = Exact::decimal(candidate.clone(), neighbors.exp10);
            if value == *rendered {
                continue;
            }
            let text = candidate_string(negative, &candidate, neighbors.exp10);
            if !v.recovers(&text) {
                continue;
            }
            let candidate_distance = value.abs_diff(exact);
            let closer = candidate_distance < distance
                || (candidate_distance == distance && candidate.is_even() && !rendered_even);
            if closer {
                return Err(Violation::NotClosest { closer: text });
            }
        }
        Ok(())
    }

    fn check_shortest(&self, v: F, exact: &Exact, rendered: &Exact, n: usize) -> PropertyVerdict {
        if n < 3 {
            return Ok(());
        }
        let negative = v.is_sign_negative();
        let neighbors = exact.grid_neighbors(n - 1);
        for candidate in neighbors.candidates() {
            if Exact::decimal(candidate.clone(), neighbors.exp10) == *rendered {
                continue;
            }
            let text = candidate_string(negative, &candidate, neighbors.exp10);
            if v.recovers(&text) {
                return Err(Violation::NotShortest { shorter: text });
            }
        }
        Ok(())
    }
}

/// The canonical rendering of NaN, the infinities and the zeros.
pub fn canonical_special<F: FloatFormat>(v: F) -> Option<&'static str> {
    if v.is_nan() {
        Some(NAN)
    } else if v.is_positive_infinity() {
        Some(POSITIVE_INFINITY)
    } else if v.is_negative_infinity() {
        Some(NEGATIVE_INFINITY)
    } else if v.is_plus_zero() {
        Some(PLUS_ZERO)
    } else if v.is_minus_zero() {
        Some(MINUS_ZERO)
    } else {
        None
    }
}

/// NaN payloads need not survive the round trip, so the parsed value is only
/// compared by classification.
fn check_special<F: FloatFormat>(s: &str, expected: &'static str) -> PropertyVerdict {
    if s != expected {
        return Err(Violation::SpecialValue { expected });
    }
    let recovered = match F::parse(s) {
        Some(parsed) => parsed,
        None => return Err(Violation::NotRecovering),
    };
    if canonical_special(recovered) != Some(expected) {
        return Err(Violation::NotRecovering);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check32(v: f32, s: &str) -> PropertyVerdict {
        let constants = FormatConstants::<f32>::derive();
        ValueOracle::new(&constants).check(v, s)
    }

    #[test]
    fn test_accepts_canonical_renderings() {
        assert_eq!(check32(f32::from_bits(1), "1.4E-45"), Ok(()));
        assert_eq!(check32(100.0, "100.0"), Ok(()));
        assert_eq!(check32(-0.0, "-0.0"), Ok(()));
        assert_eq!(check32(0.0, "0.0"), Ok(()));
        assert_eq!(check32(f32::MAX, "3.4028235E38"), Ok(()));
        assert_eq!(check32(f32::MIN_POSITIVE, "1.1754944E-38"), Ok(()));
        assert_eq!(check32(0.1, "0.1"), Ok(()));
        assert_eq!(check32(-1.5, "-1.5"), Ok(()));
        assert_eq!(check32(f32::NEG_INFINITY, "-Infinity"), Ok(()));
    }

    #[test]
    fn test_special_values_are_canonical() {
        for &bits in &[0x7FC0_0001u32, 0xFFC0_0001, 0x7F80_0001, 0xFF80_0001] {
            let v = f32::from_bits(bits);
            assert_eq!(check32(v, "NaN"), Ok(()));
            assert_eq!(check32(v, "-NaN"), Err(Violation::SpecialValue { expected: NAN }));
        }
        assert_eq!(check32(f32::INFINITY, "inf"), Err(Violation::SpecialValue { expected: POSITIVE_INFINITY }));
        assert_eq!(check32(-0.0, "0.0"), Err(Violation::SpecialValue { expected: MINUS_ZERO }));
        assert_eq!(check32(0.0, "0"), Err(Violation::SpecialValue { expected: PLUS_ZERO }));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(matches!(check32(100.0, "1.0E2"), Err(Violation::Malformed(_))));
        assert!(matches!(check32(100.0, "100"), Err(Violation::Malformed(_))));
        assert_eq!(check32(100.0, "-100.0"), Err(Violation::SignMismatch));
    }

    #[test]
    fn test_rejects_non_recovering() {
        assert_eq!(check32(100.0, "101.0"), Err(Violation::NotRecovering));
    }

    #[test]
    fn test_rejects_too_long() {
        // 1.4012984643E-45 is MIN_VALUE too, but needs more than 15 characters
        assert_eq!(
            check32(f32::from_bits(1), "1.4012984643E-45"),
            Err(Violation::TooLong { length: 16, max: 15 })
        );
    }

    #[test]
    fn test_rejects_not_closest() {
        // 1E-45 round-trips to MIN_VALUE but 1.4E-45 is closer
        assert_eq!(
            check32(f32::from_bits(1), "1.0E-45"),
            Err(Violation::NotClosest { closer: "14E-46".to_string() })
        );
        // 71 * MIN_VALUE is 9.949...E-44
        assert_eq!(
            check32(f32::from_bits(71), "1.0E-43"),
            Err(Violation::NotClosest { closer: "99E-45".to_string() })
        );
    }

    #[test]
    fn test_exact_ties_go_to_even_digit() {
        // 1.37890625 sits halfway between two round-tripping 8 digit decimals
        let v = f32::from_bits(0x3FB0_8000);
        assert_eq!(check32(v, "1.3789062"), Ok(()));
        assert_eq!(
            check32(v, "1.3789063"),
            Err(Violation::NotClosest { closer: "13789062E-7".to_string() })
        );

        // 2.65234375, with the even neighbour above
        let v = f32::from_bits(0x4029_C000);
        assert_eq!(check32(v, "2.6523438"), Ok(()));
        assert_eq!(
            check32(v, "2.6523437"),
            Err(Violation::NotClosest { closer: "26523438E-7".to_string() })
        );
    }

    #[test]
    fn test_rejects_not_shortest() {
        // 0.1f32 is 0.100000001490116...; 0.100000001 round-trips but 0.1 does too
        assert_eq!(
            check32(0.1, "0.100000001"),
            Err(Violation::NotShortest { shorter: "10000000E-8".to_string() })
        );
    }
}

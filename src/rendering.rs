//! Lexical grammar of a finite, nonzero decimal rendering.
//!
//! A rendering is `-?I.F` in plain notation or `-?D.FE-?X` in computerized
//! scientific notation. Plain notation is used exactly when the decimal's
//! scientific exponent lies in `[-3, 7)`.

use num_bigint::BigUint;
use std::fmt;

use crate::exact::Exact;

/// Smallest scientific exponent rendered in plain notation.
pub const PLAIN_MIN_EXPONENT: i32 = -3;
/// Scientific exponents from here on are rendered with an exponent marker.
pub const PLAIN_MAX_EXPONENT: i32 = 7;

/// Why a rendering does not follow the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderingError {
    Empty,
    UnexpectedCharacter { position: usize, found: char },
    MissingIntegerDigits,
    MissingPoint,
    MissingFractionDigits,
    MissingExponentDigits,
    LeadingZero,
    TrailingZero,
    ExponentOverflow,
    /// Scientific notation needs exactly one nonzero digit before the point.
    BadScientificLead,
    /// All digits are zero.
    ZeroValue,
    /// Plain notation outside `[-3, 7)` or scientific notation inside it.
    WrongNotation { exponent: i32, notation: Notation },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderingError::Empty => write!(f, "empty rendering"),
            RenderingError::UnexpectedCharacter { position, found } => {
                write!(f, "unexpected {:?} at position {}", found, position)
            }
            RenderingError::MissingIntegerDigits => write!(f, "no digits before the point"),
            RenderingError::MissingPoint => write!(f, "no decimal point"),
            RenderingError::MissingFractionDigits => write!(f, "no digits after the point"),
            RenderingError::MissingExponentDigits => write!(f, "no exponent digits"),
            RenderingError::LeadingZero => write!(f, "superfluous leading zero"),
            RenderingError::TrailingZero => write!(f, "superfluous trailing zero"),
            RenderingError::ExponentOverflow => write!(f, "exponent out of integer range"),
            RenderingError::BadScientificLead => {
                write!(f, "scientific notation needs one nonzero digit before the point")
            }
            RenderingError::ZeroValue => write!(f, "digits denote zero"),
            RenderingError::WrongNotation { exponent, notation } => {
                write!(f, "{} notation used for decimal exponent {}", notation, exponent)
            }
        }
    }
}

impl std::error::Error for RenderingError {}

pub type RenderingResult<T> = Result<T, RenderingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Plain,
    Scientific,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Plain => write!(f, "plain"),
            Notation::Scientific => write!(f, "scientific"),
        }
    }
}

/// A finite nonzero rendering taken apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRendering {
    pub negative: bool,
    /// Significant digits, without leading or trailing zeros.
    pub digits: String,
    /// `e` such that the value is `d.ddd × 10^e`.
    pub exponent: i32,
    pub notation: Notation,
}

fn take_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn unexpected(s: &str, position: usize) -> RenderingError {
    let found = s[position..].chars().next().unwrap_or('\u{FFFD}');
    RenderingError::UnexpectedCharacter { position, found }
}

impl ParsedRendering {
    pub fn parse(s: &str) -> RenderingResult<ParsedRendering> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(RenderingError::Empty);
        }

        let mut pos = 0;
        let negative = bytes[0] == b'-';
        if negative {
            pos += 1;
        }

        let int_end = take_digits(bytes, pos);
        if int_end == pos {
            return if pos < bytes.len() { Err(unexpected(s, pos)) } else { Err(RenderingError::MissingIntegerDigits) };
        }
        let integer = &s[pos..int_end];
        pos = int_end;

        if pos >= bytes.len() {
            return Err(RenderingError::MissingPoint);
        }
        if bytes[pos] != b'.' {
            return Err(unexpected(s, pos));
        }
        pos += 1;

        let frac_end = take_digits(bytes, pos);
        if frac_end == pos {
            return Err(RenderingError::MissingFractionDigits);
        }
        let fraction = &s[pos..frac_end];
        pos = frac_end;

        let mut marked_exponent = None;
        if pos < bytes.len() {
            if bytes[pos] != b'E' {
                return Err(unexpected(s, pos));
            }
            pos += 1;
            let exp_negative = pos < bytes.len() && bytes[pos] == b'-';
            if exp_negative {
                pos += 1;
            }
            let exp_end = take_digits(bytes, pos);
            if exp_end == pos {
                return Err(RenderingError::MissingExponentDigits);
            }
            if exp_end < bytes.len() {
                return Err(unexpected(s, exp_end));
            }
            let exp_digits = &s[pos..exp_end];
            if exp_digits.len() > 1 && exp_digits.starts_with('0') {
                return Err(RenderingError::LeadingZero);
            }
            let magnitude: i32 = exp_digits.parse().map_err(|_| RenderingError::ExponentOverflow)?;
            marked_exponent = Some(if exp_negative { -magnitude } else { magnitude });
        }

        if integer.len() > 1 && integer.starts_with('0') {
            return Err(RenderingError::LeadingZero);
        }
        if fraction.len() > 1 && fraction.ends_with('0') {
            return Err(RenderingError::TrailingZero);
        }
        if marked_exponent.is_some() && (integer.len() != 1 || integer == "0") {
            return Err(RenderingError::BadScientificLead);
        }

        let all_digits = format!("{}{}", integer, fraction);
        let leading_zeros = all_digits.len() - all_digits.trim_start_matches('0').len();
        let significant = all_digits.trim_matches('0');
        if significant.is_empty() {
            return Err(RenderingError::ZeroValue);
        }

        let marker = marked_exponent.unwrap_or(0);
        let exponent = marker
            .checked_add(integer.len() as i32 - 1 - leading_zeros as i32)
            .ok_or(RenderingError::ExponentOverflow)?;
        let notation = if marked_exponent.is_some() { Notation::Scientific } else { Notation::Plain };
        let plain_range = PLAIN_MIN_EXPONENT <= exponent && exponent < PLAIN_MAX_EXPONENT;
        if plain_range != (notation == Notation::Plain) {
            return Err(RenderingError::WrongNotation { exponent, notation });
        }

        Ok(ParsedRendering { negative, digits: significant.to_string(), exponent, notation })
    }

    pub fn significant_digits(&self) -> usize {
        self.digits.len()
    }

    /// Exact magnitude.
    pub fn to_exact(&self) -> Exact {
        let mut coefficient = BigUint::from(0u32);
        for digit in self.digits.bytes() {
            coefficient = coefficient * 10u32 + u32::from(digit - b'0');
        }
        Exact::decimal(coefficient, self.exponent - self.digits.len() as i32 + 1)
    }
}

/// Lays significant `digits` with scientific exponent `exponent` out in the
/// canonical notation. `digits` must start with a nonzero digit.
pub fn layout(negative: bool, digits: &str, exponent: i32) -> String {
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    if PLAIN_MIN_EXPONENT <= exponent && exponent < PLAIN_MAX_EXPONENT {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() > int_len {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            } else {
                out.push_str(digits);
                for _ in digits.len()..int_len {
                    out.push('0');
                }
                out.push_str(".0");
            }
        } else {
            out.push_str("0.");
            for _ in 0..(-exponent - 1) {
                out.push('0');
            }
            out.push_str(digits);
        }
    } else {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        out.push('E');
        out.push_str(&exponent.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(s: &str) -> ParsedRendering {
        match ParsedRendering::parse(s) {
            Ok(parsed) => parsed,
            Err(e) => panic!("{:?} should parse: {}", s, e),
        }
    }

    #[test]
    fn test_plain_renderings() {
        let p = parsed("100.0");
        assert_eq!(p.digits, "1");
        assert_eq!(p.exponent, 2);
        assert_eq!(p.notation, Notation::Plain);

        let p = parsed("-0.001");
        assert!(p.negative);
        assert_eq!(p.digits, "1");
        assert_eq!(p.exponent, -3);

        let p = parsed("1234567.8");
        assert_eq!(p.digits, "12345678");
        assert_eq!(p.exponent, 6);
    }

    #[test]
    fn test_scientific_renderings() {
        let p = parsed("1.4E-45");
        assert_eq!(p.digits, "14");
        assert_eq!(p.exponent, -45);
        assert_eq!(p.notation, Notation::Scientific);
        assert_eq!(p.significant_digits(), 2);

        let p = parsed("3.4028235E38");
        assert_eq!(p.digits, "34028235");
        assert_eq!(p.exponent, 38);
        assert_eq!(p.to_exact(), Exact::decimal(BigUint::from(34_028_235u32), 31));
    }

    #[test]
    fn test_malformed_renderings() {
        assert_eq!(ParsedRendering::parse(""), Err(RenderingError::Empty));
        assert_eq!(ParsedRendering::parse("100"), Err(RenderingError::MissingPoint));
        assert_eq!(ParsedRendering::parse("1."), Err(RenderingError::MissingFractionDigits));
        assert_eq!(ParsedRendering::parse(".5"), Err(unexpected(".5", 0)));
        assert_eq!(ParsedRendering::parse("1.50"), Err(RenderingError::TrailingZero));
        assert_eq!(ParsedRendering::parse("01.5"), Err(RenderingError::LeadingZero));
        assert_eq!(ParsedRendering::parse("1.0E08"), Err(RenderingError::LeadingZero));
        assert_eq!(ParsedRendering::parse("1.4e-45"), Err(unexpected("1.4e-45", 3)));
        assert_eq!(ParsedRendering::parse("12.0E7"), Err(RenderingError::BadScientificLead));
        assert_eq!(ParsedRendering::parse("0.0"), Err(RenderingError::ZeroValue));
        assert_eq!(
            ParsedRendering::parse("10000000.0"),
            Err(RenderingError::WrongNotation { exponent: 7, notation: Notation::Plain })
        );
        assert_eq!(
            ParsedRendering::parse("1.0E-4").map(|p| p.exponent),
            Ok(-4)
        );
        assert_eq!(
            ParsedRendering::parse("1.0E2"),
            Err(RenderingError::WrongNotation { exponent: 2, notation: Notation::Scientific })
        );
        assert_eq!(
            ParsedRendering::parse("0.0001"),
            Err(RenderingError::WrongNotation { exponent: -4, notation: Notation::Plain })
        );
    }

    #[test]
    fn test_layout() {
        assert_eq!(layout(false, "1", 2), "100.0");
        assert_eq!(layout(true, "1", 0), "-1.0");
        assert_eq!(layout(false, "12345678", 6), "1234567.8");
        assert_eq!(layout(false, "1", -3), "0.001");
        assert_eq!(layout(false, "125", -2), "0.0125");
        assert_eq!(layout(false, "14", -45), "1.4E-45");
        assert_eq!(layout(false, "1", 7), "1.0E7");
        assert_eq!(layout(true, "34028235", 38), "-3.4028235E38");
        assert_eq!(layout(false, "1", -4), "1.0E-4");
    }

    #[test]
    fn test_layout_parses_back() {
        for &(digits, exponent) in &[("1", -4), ("1", -3), ("9999999", 6), ("17", 0), ("25", 16)] {
            let s = layout(false, digits, exponent);
            let p = parsed(&s);
            assert_eq!(p.digits, digits);
            assert_eq!(p.exponent, exponent);
        }
    }
}

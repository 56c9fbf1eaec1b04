//! Converters under test.
//!
//! The oracle judges any [`Converter`]. Two are provided: [`ShortestDecimal`],
//! the converter under development, and [`PlatformDebug`], the standard
//! library's `{:?}` rendering with only the spelling of special values and
//! of the exponent marker adjusted. Running a campaign against the latter
//! is expected to report violations.

use num_bigint::BigUint;
use num_integer::Integer;

use crate::exact::Exact;
use crate::format::FloatFormat;
use crate::oracle::canonical_special;
use crate::rendering::layout;

/// The layout constants a converter states it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedConstants {
    pub p: u32,
    pub q_min: i32,
    pub q_max: i32,
    pub k_min: i32,
    pub k_max: i32,
    pub h: u32,
    pub e_min: i32,
    pub e_max: i32,
    pub c_tiny: u64,
}

pub const BINARY32: PublishedConstants = PublishedConstants {
    p: 24,
    q_min: -149,
    q_max: 104,
    k_min: -45,
    k_max: 31,
    h: 9,
    e_min: -45,
    e_max: 38,
    c_tiny: 8,
};

pub const BINARY64: PublishedConstants = PublishedConstants {
    p: 53,
    q_min: -1074,
    q_max: 971,
    k_min: -324,
    k_max: 292,
    h: 17,
    e_min: -324,
    e_max: 308,
    c_tiny: 3,
};

/// Renders binary values as decimal strings. Must be total: every bit
/// pattern gets a rendering.
pub trait Converter<F: FloatFormat> {
    fn name(&self) -> &'static str;

    fn to_decimal(&self, v: F) -> String;

    /// `None` when the converter does not publish its layout constants.
    fn published_constants(&self) -> Option<PublishedConstants>;
}

/// Which converter a campaign exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    Shortest,
    Platform,
}

impl ConverterKind {
    pub fn name(self) -> &'static str {
        match self {
            ConverterKind::Shortest => "shortest",
            ConverterKind::Platform => "platform",
        }
    }
}

/// Shortest round-trip digits, closest to the value, in canonical notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestDecimal;

impl ShortestDecimal {
    pub fn render<F: FloatFormat>(v: F) -> String {
        if let Some(special) = canonical_special(v) {
            return special.to_string();
        }
        let negative = v.is_sign_negative();
        let magnitude = v.abs();

        // Only the length is taken from here; the digits are re-chosen below.
        let scientific = format!("{:e}", magnitude);
        let mantissa = scientific.split('e').next().unwrap_or("");
        let length = mantissa.bytes().filter(u8::is_ascii_digit).count().max(1);

        let (digits, exponent) = closest_recovering(magnitude, length.max(2));
        layout(negative, &digits, exponent)
    }
}

/// The decimal with `width` significant digits closest to `v` among those
/// that parse back to `v`, ties to even, as significant digits and
/// scientific exponent.
fn closest_recovering<F: FloatFormat>(v: F, width: usize) -> (String, i32) {
    let exact = v.to_exact();
    let neighbors = exact.grid_neighbors(width);
    let mut best: Option<(BigUint, Exact)> = None;
    for candidate in neighbors.candidates() {
        let text = format!("{}E{}", candidate, neighbors.exp10);
        if !v.recovers(&text) {
            continue;
        }
        let distance = Exact::decimal(candidate.clone(), neighbors.exp10).abs_diff(&exact);
        let better = match &best {
            None => true,
            Some((current, current_distance)) => {
                distance < *current_distance || (distance == *current_distance && candidate.is_even() && current.is_odd())
            }
        };
        if better {
            best = Some((candidate, distance));
        }
    }

    // The shortest digits always leave a recovering neighbour at this width.
    let chosen = best.map(|(candidate, _)| candidate).unwrap_or(neighbors.floor);
    let text = chosen.to_string();
    let digits = text.trim_end_matches('0');
    let exponent = neighbors.exp10 + text.len() as i32 - 1;
    (digits.to_string(), exponent)
}

impl Converter<f32> for ShortestDecimal {
    fn name(&self) -> &'static str {
        "shortest"
    }

    fn to_decimal(&self, v: f32) -> String {
        Self::render(v)
    }

    fn published_constants(&self) -> Option<PublishedConstants> {
        Some(BINARY32)
    }
}

impl Converter<f64> for ShortestDecimal {
    fn name(&self) -> &'static str {
        "shortest"
    }

    fn to_decimal(&self, v: f64) -> String {
        Self::render(v)
    }

    fn published_constants(&self) -> Option<PublishedConstants> {
        Some(BINARY64)
    }
}

/// The standard library's `{:?}` rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDebug;

impl PlatformDebug {
    pub fn render<F: FloatFormat>(v: F) -> String {
        let debug = format!("{:?}", v);
        match debug.as_str() {
            "inf" => return "Infinity".to_string(),
            "-inf" => return "-Infinity".to_string(),
            _ => {}
        }
        match debug.find('e') {
            Some(marker) => {
                let (mantissa, exponent) = debug.split_at(marker);
                let point = if mantissa.contains('.') { "" } else { ".0" };
                format!("{}{}E{}", mantissa, point, &exponent[1..])
            }
            None => debug,
        }
    }
}

impl<F: FloatFormat> Converter<F> for PlatformDebug {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn to_decimal(&self, v: F) -> String {
        Self::render(v)
    }

    fn published_constants(&self) -> Option<PublishedConstants> {
        None
    }
}

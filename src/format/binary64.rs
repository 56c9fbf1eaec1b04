// IEEE 754 binary64. No Paxson pairs are carried for this width; the
// anomalies are values older converters printed with extra digits.

use super::FloatFormat;

impl FloatFormat for f64 {
    const NAME: &'static str = "binary64";
    const TOTAL_BITS: u32 = 64;
    const HEX_SUFFIX: &'static str = "";

    const ANOMALIES: &'static [&'static str] = &[
        "2.0E-3", "1.0E23",
        "2.82879384806159E17", "1.387364135037754E18", "1.45800632428665E17",
        "4.9E-324", "2.2250738585072014E-308", "1.7976931348623157E308",
    ];

    const PAXSON: &'static [(u64, i32)] = &[];

    fn to_raw_bits(self) -> u64 {
        self.to_bits()
    }

    fn from_raw_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn from_u64(i: u64) -> Self {
        i as f64
    }

    fn platform_precision() -> u32 {
        f64::MANTISSA_DIGITS
    }

    fn platform_min_value() -> Self {
        f64::from_bits(1)
    }

    fn platform_min_normal() -> Self {
        f64::MIN_POSITIVE
    }

    fn platform_max_value() -> Self {
        f64::MAX
    }
}

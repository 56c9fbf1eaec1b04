// IEEE 754 binary32.

use super::FloatFormat;

impl FloatFormat for f32 {
    const NAME: &'static str = "binary32";
    const TOTAL_BITS: u32 = 32;
    const HEX_SUFFIX: &'static str = "F";

    const ANOMALIES: &'static [&'static str] = &[
        // Rendered longer than needed by naive converters
        "1.1754944E-38", "2.2E-44",
        "1.0E16", "2.0E16", "3.0E16", "5.0E16", "3.0E17",
        "3.2E18", "3.7E18", "3.7E16", "3.72E17", "2.432902E18",
        // Rendered, but not as the closest decimal
        "9.9E-44",
    ];

    // Paxson, "A Program for Testing IEEE Decimal-Binary Conversion",
    // tables 16 and 17
    const PAXSON: &'static [(u64, i32)] = &[
        (12_676_506, -102),
        (15_445_013, -103),
        (13_734_123, 86),
        (12_428_269, -138),
        (12_676_506, -130),
        (15_334_037, -146),
        (11_518_287, -41),
        (12_584_953, -145),
        (15_961_084, -125),
        (14_915_817, -146),
        (10_845_484, -102),
        (16_431_059, -61),

        (16_093_626, 69),
        (9_983_778, 25),
        (12_745_034, 104),
        (12_706_553, 72),
        (11_005_028, 45),
        (15_059_547, 71),
        (16_015_691, -99),
        (8_667_859, 56),
        (14_855_922, -82),
        (14_855_922, -83),
        (10_144_164, -110),
        (13_248_074, 95),
    ];

    fn to_raw_bits(self) -> u64 {
        self.to_bits() as u64
    }

    fn from_raw_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn from_u64(i: u64) -> Self {
        i as f32
    }

    fn platform_precision() -> u32 {
        f32::MANTISSA_DIGITS
    }

    fn platform_min_value() -> Self {
        f32::from_bits(1)
    }

    fn platform_min_normal() -> Self {
        f32::MIN_POSITIVE
    }

    fn platform_max_value() -> Self {
        f32::MAX
    }
}

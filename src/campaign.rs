//! # Campaign orchestrator
//!
//! A campaign feeds values chosen by a fixed library of strategies to the
//! [`ValueOracle`] one at a time. Violations accumulate in the campaign's
//! own [`FailureLog`]; [`Campaign::finish`] turns a non-empty log into a
//! single [`CampaignError`] named after the campaign.
//!
//! The strategies are the classic ones for shortest-decimal converters:
//! neighbourhoods of the format's extremes, powers of two and ten, values
//! known to trip older converters, Paxson's hard cases, dense sweeps of
//! integers and decimal fractions, random values and exhaustive scans.
//! Values are checked in exactly the order each strategy enumerates them,
//! so a failure found from a seed reproduces with the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::FormatConstants;
use crate::converter::{Converter, ConverterKind, PlatformDebug, ShortestDecimal};
use crate::exact::Exact;
use crate::failure::{CampaignError, CampaignResult, FailureLog};
use crate::format::FloatFormat;
use crate::oracle::ValueOracle;

/// Default number of raw bit patterns drawn by the random strategy.
pub const DEFAULT_RANDOM_COUNT: usize = 100_000;

/// Default half width of a neighbourhood probe.
pub const Z: u64 = 1_024;

/// Configuration for a campaign
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    /// Label used in logs and in the consolidated failure
    pub name: String,

    /// Raw bit patterns drawn by [`Campaign::test_random`] in a seeded run
    pub random_count: usize,

    /// Seed for the random strategies of [`Campaign::run_seeded`]
    pub seed: u64,

    /// Half width of the neighbourhoods around extremes and powers
    pub neighborhood: u64,

    /// Half width of the neighbourhoods around decimal fractions
    pub decimal_neighborhood: u64,

    /// Integers are swept up to `2^(P-1)` or this limit, whichever is lower
    pub int_scan_limit: u64,

    /// Converter exercised when built through [`Campaign::from_config`]
    pub converter: ConverterKind,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            random_count: DEFAULT_RANDOM_COUNT,
            seed: 0,
            neighborhood: Z,
            decimal_neighborhood: 10,
            int_scan_limit: 1 << 23,
            converter: ConverterKind::Shortest,
        }
    }
}

/// Outcome of a campaign that found no violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignReport {
    pub campaign: String,
    pub values_checked: u64,
}

pub struct Campaign<F: FloatFormat> {
    config: CampaignConfig,
    constants: FormatConstants<F>,
    converter: Box<dyn Converter<F>>,
    log: FailureLog,
    values_checked: u64,
}

impl<F> Campaign<F>
where
    F: FloatFormat,
    ShortestDecimal: Converter<F>,
{
    /// Builds the converter named by `config.converter`.
    pub fn from_config(config: CampaignConfig) -> Self {
        let converter: Box<dyn Converter<F>> = match config.converter {
            ConverterKind::Shortest => Box::new(ShortestDecimal),
            ConverterKind::Platform => Box::new(PlatformDebug),
        };
        Campaign::with_converter(config, converter)
    }
}

impl<F: FloatFormat> Campaign<F> {
    pub fn with_converter(mut config: CampaignConfig, converter: Box<dyn Converter<F>>) -> Self {
        if config.name.is_empty() {
            config.name = format!("{} {}", F::NAME, converter.name());
        }
        Campaign {
            config,
            constants: FormatConstants::derive(),
            converter,
            log: FailureLog::new(),
            values_checked: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    pub fn constants(&self) -> &FormatConstants<F> {
        &self.constants
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.log
    }

    pub fn values_checked(&self) -> u64 {
        self.values_checked
    }

    /// Checks one value.
    pub fn test_dec(&mut self, v: F) {
        self.values_checked += 1;
        ValueOracle::new(&self.constants).record(&*self.converter, v, &mut self.log);
    }

    /// Checks the `2z + 1` values whose bit patterns lie within `z` of `v`'s.
    /// Offsets wrap around the width, since every bit pattern is valid.
    pub fn test_around(&mut self, v: F, z: u64) {
        let z = z as i64;
        for offset in -z..=z {
            self.test_dec(v.offset_bits(offset));
        }
    }

    /// Checks every bit pattern in `start..=end`. Exhaustive scans can be
    /// split across independent invocations with this.
    pub fn test_bits_range(&mut self, start: u64, end: u64) {
        let end = end.min(F::bits_mask());
        for bits in start..=end {
            self.test_dec(F::from_raw_bits(bits));
        }
    }

    pub fn test_extreme_values(&mut self) {
        let z = self.config.neighborhood;
        let c = self.constants;
        self.test_dec(F::from_raw_bits(F::exponent_mask() | F::sign_mask()));
        self.test_around(-c.max_value, z);
        self.test_around(-c.min_normal, z);
        self.test_around(-c.min_value, z);
        self.test_dec(F::from_raw_bits(F::sign_mask()));
        self.test_dec(F::from_raw_bits(0));
        self.test_around(c.min_value, z);
        self.test_around(c.min_normal, z);
        self.test_around(c.max_value, z);
        self.test_dec(F::from_raw_bits(F::exponent_mask()));

        // Quiet NaNs have the top mantissa bit set, signaling NaNs clear;
        // each comes with either sign.
        let quiet = F::exponent_mask() | (F::mantissa_mask() + 1) >> 1;
        let signaling = F::exponent_mask();
        self.test_dec(F::from_raw_bits(quiet));
        for &pattern in &[quiet | 1, signaling | 1, F::sign_mask() | quiet | 1, F::sign_mask() | signaling | 1] {
            self.test_dec(F::from_raw_bits(pattern));
        }

        // Multiples of MIN_VALUE below C_TINY take the sub-minimal path
        for multiple in 1..c.c_tiny {
            self.test_dec(F::from_u64(multiple) * c.min_value);
        }
    }

    pub fn test_powers_of_10(&mut self) {
        let z = self.config.neighborhood;
        for e in self.constants.e_min..=self.constants.e_max {
            if let Some(v) = F::parse(&format!("1e{}", e)) {
                self.test_around(v, z);
            }
        }
    }

    pub fn test_powers_of_2(&mut self) {
        let z = self.config.neighborhood;
        let two = F::from_u64(2);
        let mut v = self.constants.min_value;
        while v <= self.constants.max_value {
            self.test_around(v, z);
            v = v * two;
        }
    }

    pub fn test_some_anomalies(&mut self) {
        for literal in F::ANOMALIES {
            if let Some(v) = F::parse(literal) {
                self.test_dec(v);
            }
        }
    }

    pub fn test_paxson(&mut self) {
        for &(significand, exponent) in F::PAXSON {
            self.test_dec(F::scalb(significand, exponent));
        }
    }

    /// Positive integers below `2^(P-1)`, all exactly representable.
    pub fn test_ints(&mut self) {
        let limit = (1u64 << (self.constants.p - 1)).min(self.config.int_scan_limit);
        for i in 1..limit {
            self.test_dec(F::from_u64(i));
        }
    }

    fn test_fractions(&mut self, denominator: u64) {
        let z = self.config.decimal_neighborhood;
        let d = F::from_u64(denominator);
        for i in 1..10_000 {
            self.test_around(F::from_u64(i) / d, z);
        }
    }

    /// 0.1, 0.2, ..., 999.9 and around
    pub fn test_deci(&mut self) {
        self.test_fractions(10);
    }

    /// 0.01, 0.02, ..., 99.99 and around
    pub fn test_centi(&mut self) {
        self.test_fractions(100);
    }

    /// 0.001, 0.002, ..., 9.999 and around
    pub fn test_milli(&mut self) {
        self.test_fractions(1_000);
    }

    /// For one random decimal exponent, a random integer of each magnitude
    /// from one to four digits with that exponent, and around.
    pub fn test_random_short_decimals<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let z = self.config.neighborhood;
        let e = rng.gen_range(self.constants.e_min..=self.constants.e_max);
        let mut pow10 = 1u32;
        while pow10 < 10_000 {
            let significand = rng.gen_range(pow10..10 * pow10);
            if let Some(v) = F::parse(&format!("{}e{}", significand, e)) {
                self.test_around(v, z);
            }
            pow10 *= 10;
        }
    }

    /// Uniformly random raw bit patterns.
    pub fn test_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            self.test_dec(F::from_raw_bits(rng.gen::<u64>()));
        }
    }

    /// Compares every derived constant against the platform and against the
    /// converter's published constants. Any mismatch fails immediately.
    pub fn test_constants(&self) -> CampaignResult<()> {
        let c = &self.constants;
        let same = |a: F, b: F| a.to_raw_bits() == b.to_raw_bits();
        let representable = |i: u64| F::from_u64(i).to_exact() == Exact::binary(i, 0);

        let mut checks = vec![
            (c.p == F::platform_precision(), "P"),
            (representable(c.c_min), "C_MIN"),
            (representable(c.c_max), "C_MAX"),
            (same(c.min_value, F::platform_min_value()), "MIN_VALUE"),
            (same(c.min_normal, F::platform_min_normal()), "MIN_NORMAL"),
            (same(c.max_value, F::platform_max_value()), "MAX_VALUE"),
        ];
        if let Some(published) = self.converter.published_constants() {
            checks.extend(vec![
                (c.p == published.p, "P"),
                (c.q_min == published.q_min, "Q_MIN"),
                (c.q_max == published.q_max, "Q_MAX"),
                (c.k_min == published.k_min, "K_MIN"),
                (c.k_max == published.k_max, "K_MAX"),
                (c.h == published.h, "H"),
                (c.e_min == published.e_min, "E_MIN"),
                (c.e_max == published.e_max, "E_MAX"),
                (c.c_tiny == published.c_tiny, "C_TINY"),
            ]);
        }

        let mut fields: Vec<&'static str> = Vec::new();
        for (ok, name) in checks {
            if !ok && !fields.contains(&name) {
                fields.push(name);
            }
        }
        if fields.is_empty() {
            Ok(())
        } else {
            log::error!("{}: constants mismatch in {:?}", self.config.name, fields);
            Err(CampaignError::ConstantsMismatch { campaign: self.config.name.clone(), fields })
        }
    }

    fn step(&mut self, strategy: &str, run: impl FnOnce(&mut Self)) {
        let before = self.values_checked;
        let failures_before = self.log.len();
        run(self);
        log::debug!(
            "{}: {} checked {} values, {} new failures",
            self.config.name,
            strategy,
            self.values_checked - before,
            self.log.len() - failures_before
        );
    }

    /// The standard campaign: constants, then every deterministic strategy,
    /// then the random ones.
    pub fn run<R: Rng + ?Sized>(&mut self, random_count: usize, rng: &mut R) -> CampaignResult<CampaignReport> {
        log::info!("{}: starting standard campaign", self.config.name);
        self.test_constants()?;
        self.step("extreme values", |c| c.test_extreme_values());
        self.step("anomalies", |c| c.test_some_anomalies());
        self.step("powers of 2", |c| c.test_powers_of_2());
        self.step("powers of 10", |c| c.test_powers_of_10());
        self.step("Paxson", |c| c.test_paxson());
        self.step("ints", |c| c.test_ints());
        self.step("deci", |c| c.test_deci());
        self.step("centi", |c| c.test_centi());
        self.step("milli", |c| c.test_milli());
        self.step("random short decimals", |c| c.test_random_short_decimals(rng));
        self.step("random", |c| c.test_random(random_count, rng));
        self.finish()
    }

    /// [`Campaign::run`] with `config.random_count` values from a
    /// `ChaCha8Rng` seeded with `config.seed`.
    pub fn run_seeded(&mut self) -> CampaignResult<CampaignReport> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let count = self.config.random_count;
        self.run(count, &mut rng)
    }

    /// Every bit pattern of the format, starting from the one with only the
    /// sign bit set. Long running; it has no cancellation point.
    pub fn test_all(&mut self) {
        let sign = F::sign_mask();
        self.step("negative bit patterns", |c| c.test_bits_range(sign, F::bits_mask()));
        self.test_positive();
    }

    /// Every bit pattern with the sign bit clear.
    pub fn test_positive(&mut self) {
        let sign = F::sign_mask();
        self.step("positive bit patterns", |c| c.test_bits_range(0, sign - 1));
    }

    pub fn run_all(&mut self) -> CampaignResult<CampaignReport> {
        log::info!("{}: starting exhaustive scan", self.config.name);
        self.test_constants()?;
        self.test_all();
        self.finish()
    }

    pub fn run_positive(&mut self) -> CampaignResult<CampaignReport> {
        log::info!("{}: starting positive scan", self.config.name);
        self.test_constants()?;
        self.test_positive();
        self.finish()
    }

    /// Drains the failure log: an error naming the campaign if anything was
    /// recorded since the last call, a report otherwise.
    pub fn finish(&mut self) -> CampaignResult<CampaignReport> {
        let failures = self.log.take();
        let values_checked = std::mem::replace(&mut self.values_checked, 0);
        if failures.is_empty() {
            log::info!("{}: {} values checked, no failures", self.config.name, values_checked);
            Ok(CampaignReport { campaign: self.config.name.clone(), values_checked })
        } else {
            log::warn!("{}: {} failures in {} values", self.config.name, failures.len(), values_checked);
            Err(CampaignError::Violations { campaign: self.config.name.clone(), failures })
        }
    }
}

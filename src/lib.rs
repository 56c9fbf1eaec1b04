//! # Decimal Oracle
//!
//! A correctness oracle for converters that render binary floating point
//! values as their shortest round-trip decimal string, plus the campaigns
//! that drive a converter through millions of values.
//!
//! For a finite nonzero value the oracle accepts exactly one rendering: the
//! decimal with the fewest significant digits that parses back to the same
//! bits, the closest one to the value among those (ties to even), laid out in
//! plain notation for magnitudes in `[1e-3, 1e7)` and in scientific notation
//! otherwise. The format constants every bound depends on are derived from
//! the precision and exponent width alone, for binary32 and binary64.

pub mod campaign;
pub mod constants;
pub mod converter;
pub mod exact;
pub mod failure;
pub mod format;
pub mod oracle;
pub mod rendering;

pub use campaign::{Campaign, CampaignConfig, CampaignReport};
pub use constants::FormatConstants;
pub use converter::{Converter, ConverterKind, PlatformDebug, PublishedConstants, ShortestDecimal};
pub use exact::Exact;
pub use failure::{CampaignError, CampaignResult, Failure, FailureLog};
pub use format::FloatFormat;
pub use oracle::{PropertyVerdict, ValueOracle, Violation};
pub use rendering::{Notation, ParsedRendering, RenderingError};

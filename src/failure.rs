//! Failure aggregation and campaign errors.
//!
//! Violations found during a campaign are collected in a [`FailureLog`]
//! owned by that campaign and turned into one [`CampaignError`] at the end.
//! A constants mismatch is raised on its own, before any value is checked.

use std::fmt;

use crate::format::FloatFormat;
use crate::oracle::Violation;

/// One value whose rendering violated a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Raw bit pattern, `0x00000001` style.
    pub bits: String,
    pub hex: String,
    pub rendering: String,
    pub violation: Violation,
}

impl Failure {
    pub fn new<F: FloatFormat>(v: F, rendering: String, violation: Violation) -> Self {
        Failure { bits: v.bits_string(), hex: v.hex_string(), rendering, violation }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) rendered as {:?}: {} property violated, {}",
            self.bits,
            self.hex,
            self.rendering,
            self.violation.property(),
            self.violation
        )
    }
}

/// Accumulates failures without stopping the scan.
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    failures: Vec<Failure>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Empties the log, returning what it held.
    pub fn take(&mut self) -> Vec<Failure> {
        std::mem::take(&mut self.failures)
    }
}

/// Why a campaign failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    /// Derived constants disagree with the platform or the converter. Every
    /// scan bound depends on them, so nothing else is run.
    ConstantsMismatch { campaign: String, fields: Vec<&'static str> },
    /// Values whose renderings violated a property.
    Violations { campaign: String, failures: Vec<Failure> },
}

impl CampaignError {
    pub fn campaign(&self) -> &str {
        match self {
            CampaignError::ConstantsMismatch { campaign, .. } => campaign,
            CampaignError::Violations { campaign, .. } => campaign,
        }
    }
}

impl fmt::Display for CampaignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignError::ConstantsMismatch { campaign, fields } => {
                write!(f, "{}: constants mismatch in {}", campaign, fields.join(", "))
            }
            CampaignError::Violations { campaign, failures } => {
                write!(f, "{}: {} failure(s)", campaign, failures.len())?;
                for failure in failures {
                    write!(f, "\n    {}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CampaignError {}

pub type CampaignResult<T> = Result<T, CampaignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_accumulates_and_drains() {
        let mut log = FailureLog::new();
        assert!(log.is_empty());
        log.push(Failure::new(100.0f32, "1.0E2".to_string(), Violation::NotRecovering));
        log.push(Failure::new(f32::from_bits(1), "1.0E-45".to_string(), Violation::SignMismatch));
        assert_eq!(log.len(), 2);
        assert_eq!(log.failures()[0].bits, "0x42C80000");

        let drained = log.take();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_error_names_campaign_and_every_failure() {
        let failures = vec![
            Failure::new(1.0f32, "1".to_string(), Violation::NotRecovering),
            Failure::new(2.0f32, "2".to_string(), Violation::NotRecovering),
        ];
        let error = CampaignError::Violations { campaign: "binary32 shortest".to_string(), failures };
        let message = error.to_string();
        assert!(message.starts_with("binary32 shortest: 2 failure(s)"));
        assert!(message.contains("0x3F800000 (0x1.0p0F)"));
        assert!(message.contains("0x40000000 (0x1.0p1F)"));
        assert_eq!(error.campaign(), "binary32 shortest");
    }
}

use crate::rules::{RuleLevel, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = Self::default();
        for v in violations {
            counts.add(v.severity);
        }
        counts
    }

    pub fn add(&mut self, level: RuleLevel) {
        match level {
            RuleLevel::Error => self.error += 1,
            RuleLevel::Warning => self.warning += 1,
            RuleLevel::Info => self.info += 1,
        }
    }

    pub fn merge(&mut self, other: &SeverityCounts) {
        self.error += other.error;
        self.warning += other.warning;
        self.info += other.info;
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }
}

/// `100 - 10·errors - 5·warnings - 2·infos`, floored at 0.
pub fn score(counts: &SeverityCounts) -> u8 {
    let penalty = counts
        .error
        .saturating_mul(10)
        .saturating_add(counts.warning.saturating_mul(5))
        .saturating_add(counts.info.saturating_mul(2));
    100usize.saturating_sub(penalty) as u8
}

pub fn is_compliant(counts: &SeverityCounts) -> bool {
    counts.error == 0
}

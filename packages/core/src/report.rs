//! Aggregation of findings across many checked responses.
//!
//! A [`Report`] collects one [`ReportEntry`] per validated response (for
//! example one per endpoint in a test run) and reduces them to a
//! [`Summary`]: counts per rule and an overall [`Outcome`]. Only
//! Error-severity findings fail a run; warnings are informational.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Finding, Rule, Severity};

/// The findings for one checked response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// What was checked: an endpoint URL, a case name, or a file path.
    pub target: String,
    pub status: u16,
    pub findings: Vec<Finding>,
}

impl ReportEntry {
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }
}

/// Pass/fail verdict for a whole report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    /// Process exit status for this outcome: `0` on pass, `1` on fail.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
        }
    }
}

/// Totals derived from a [`Report`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of responses checked.
    pub checked: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Finding count per violated rule.
    pub by_rule: BTreeMap<Rule, usize>,
    pub outcome: Outcome,
}

/// Findings for a sequence of checked responses, in the order recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings for one response.
    pub fn record(&mut self, target: impl Into<String>, status: u16, findings: Vec<Finding>) {
        self.entries.push(ReportEntry {
            target: target.into(),
            status,
            findings,
        });
    }

    /// Append every entry of `other`. Reports built on separate threads or
    /// tasks are combined this way.
    pub fn merge(&mut self, other: Report) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every finding across all entries.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().flat_map(|e| e.findings.iter())
    }

    pub fn summary(&self) -> Summary {
        let mut errors = 0;
        let mut warnings = 0;
        let mut by_rule = BTreeMap::new();
        for finding in self.findings() {
            match finding.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
            *by_rule.entry(finding.rule_violated).or_insert(0) += 1;
        }
        Summary {
            checked: self.entries.len(),
            errors,
            warnings,
            by_rule,
            outcome: if errors == 0 { Outcome::Pass } else { Outcome::Fail },
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.findings().any(Finding::is_error) {
            Outcome::Fail
        } else {
            Outcome::Pass
        }
    }
}

// --- tests -------------------------------------------------------------------

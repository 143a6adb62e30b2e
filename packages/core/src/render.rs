//! Human-readable text rendering of findings, reports, and the status table.
//!
//! The output is stable plain text suitable for terminals or logs. It is not
//! a canonical format; use the serde representation of [`Report`] and
//! [`Finding`] for machine consumption.

use crate::report::{Outcome, Report};
use crate::rules::RuleTable;
use crate::types::Finding;

/// Render the findings for one response, one line each.
///
/// ```text
/// error    naming-convention              /data/owner_id  key "owner_id" is not camelCase
/// warning  code-mismatch                  /code           body code 200 differs from HTTP status 404 Not Found
/// ```
///
/// An empty slice renders as `ok`.
pub fn render_findings(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "ok\n".to_string();
    }
    let path_width = findings
        .iter()
        .map(|f| display_path(&f.path).len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for f in findings {
        out.push_str(&format!(
            "{:<8} {:<30} {:<width$}  {}\n",
            f.severity.to_string(),
            f.rule_violated.as_str(),
            display_path(&f.path),
            f.message,
            width = path_width,
        ));
    }
    out
}

/// Render a whole [`Report`]: one block per entry that has findings, then a
/// summary with counts per rule.
///
/// ```text
/// GET /users/1  (200)
///   error    naming-convention  /data/owner_id  key "owner_id" is not camelCase
///
/// checked 3 responses: 1 error, 0 warnings
///   naming-convention  1
/// result: fail
/// ```
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();

    for entry in report.entries() {
        if entry.findings.is_empty() {
            continue;
        }
        out.push_str(&format!("{}  ({})\n", entry.target, entry.status));
        for line in render_findings(&entry.findings).lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    let summary = report.summary();
    out.push_str(&format!(
        "checked {} {}: {} {}, {} {}\n",
        summary.checked,
        plural(summary.checked, "response", "responses"),
        summary.errors,
        plural(summary.errors, "error", "errors"),
        summary.warnings,
        plural(summary.warnings, "warning", "warnings"),
    ));
    if !summary.by_rule.is_empty() {
        let width = summary
            .by_rule
            .keys()
            .map(|r| r.as_str().len())
            .max()
            .unwrap_or(0);
        for (rule, count) in &summary.by_rule {
            out.push_str(&format!("  {:<width$}  {}\n", rule.as_str(), count));
        }
    }
    out.push_str(&format!("result: {}\n", summary.outcome));
    out
}

/// Render the status table.
///
/// ```text
/// 200  OK           success
/// 404  Not Found    client error
/// ```
pub fn render_rules(table: &RuleTable) -> String {
    let width = table.iter().map(|r| r.alias.len()).max().unwrap_or(0);
    let mut out = String::new();
    for rule in table.iter() {
        out.push_str(&format!(
            "{}  {:<width$}  {}\n",
            rule.code, rule.alias, rule.category
        ));
    }
    out
}

/// One-word verdict line used by single-response commands.
pub fn render_outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Pass => "conformant",
        Outcome::Fail => "not conformant",
    }
}

// --- helpers -----------------------------------------------------------------

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

// --- tests -------------------------------------------------------------------

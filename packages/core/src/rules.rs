//! The status table: HTTP code → alias and category.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::{Category, StatusRule};

/// Errors returned by [`RuleTable`] operations.
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("status code {0} is not in the rule table")]
    UnknownStatusCode(u16),

    #[error("status code {0} is outside the HTTP range 100..=599")]
    InvalidStatusCode(u16),

    #[error("rules file is not a JSON array of status rules: {0}")]
    Parse(String),
}

/// The fixed rows documented by the style guide.
const STANDARD: &[(u16, &str, Category)] = &[
    (200, "OK", Category::Success),
    (201, "Created", Category::Success),
    (204, "No Content", Category::Success),
    (304, "Not Modified", Category::Redirection),
    (400, "Bad Request", Category::ClientError),
    (401, "Unauthorized", Category::ClientError),
    (403, "Forbidden", Category::ClientError),
    (404, "Not Found", Category::ClientError),
    (405, "Method Not Allowed", Category::ClientError),
    (408, "Request Timeout", Category::ClientError),
    (410, "Gone", Category::ClientError),
    (422, "Unprocessable Entity", Category::ClientError),
    (429, "Too Many Requests", Category::ClientError),
    (500, "Internal Server Error", Category::ServerError),
];

/// An immutable mapping from status code to [`StatusRule`].
///
/// Build it once at startup and hand it to the
/// [`Validator`](crate::validation::Validator); nothing in the crate keeps a
/// global copy.
///
/// ```rust
/// use envelint::{Category, RuleTable};
///
/// let table = RuleTable::standard();
/// let rule = table.lookup(404).unwrap();
/// assert_eq!(rule.alias, "Not Found");
/// assert_eq!(rule.category, Category::ClientError);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: BTreeMap<u16, StatusRule>,
}

impl RuleTable {
    /// The 14-row table from the style guide.
    pub fn standard() -> Self {
        let rules = STANDARD
            .iter()
            .map(|&(code, alias, category)| (code, StatusRule::new(code, alias, category)))
            .collect();
        Self { rules }
    }

    /// Extend the table with project-specific rules. A rule whose code is
    /// already present replaces the existing row.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = StatusRule>) -> Self {
        for rule in rules {
            self.rules.insert(rule.code, rule);
        }
        self
    }

    /// Parse a JSON array of status rules and append them to the standard table.
    ///
    /// ```json
    /// [ { "code": 409, "alias": "Conflict", "category": "ClientError" } ]
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let extra: Vec<StatusRule> =
            serde_json::from_str(json).map_err(|e| RuleError::Parse(e.to_string()))?;
        if let Some(bad) = extra.iter().find(|r| !(100..=599).contains(&r.code)) {
            return Err(RuleError::InvalidStatusCode(bad.code));
        }
        Ok(Self::standard().with_rules(extra))
    }

    /// Look up the rule for `code`.
    pub fn lookup(&self, code: u16) -> Result<&StatusRule, RuleError> {
        self.rules.get(&code).ok_or(RuleError::UnknownStatusCode(code))
    }

    /// All rules in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_fourteen_rows() {
        assert_eq!(RuleTable::standard().len(), 14);
    }

    #[test]
    fn lookup_returns_exact_aliases() {
        let table = RuleTable::standard();
        let expected = [
            (200, "OK", Category::Success),
            (201, "Created", Category::Success),
            (204, "No Content", Category::Success),
            (304, "Not Modified", Category::Redirection),
            (400, "Bad Request", Category::ClientError),
            (401, "Unauthorized", Category::ClientError),
            (403, "Forbidden", Category::ClientError),
            (404, "Not Found", Category::ClientError),
            (405, "Method Not Allowed", Category::ClientError),
            (408, "Request Timeout", Category::ClientError),
            (410, "Gone", Category::ClientError),
            (422, "Unprocessable Entity", Category::ClientError),
            (429, "Too Many Requests", Category::ClientError),
            (500, "Internal Server Error", Category::ServerError),
        ];
        for (code, alias, category) in expected {
            let rule = table.lookup(code).unwrap();
            assert_eq!(rule.code, code);
            assert_eq!(rule.alias, alias, "alias for {code}");
            assert_eq!(rule.category, category, "category for {code}");
        }
    }

    #[test]
    fn unknown_code_is_an_error() {
        let table = RuleTable::standard();
        assert_eq!(table.lookup(409), Err(RuleError::UnknownStatusCode(409)));
        assert_eq!(table.lookup(503), Err(RuleError::UnknownStatusCode(503)));
    }

    #[test]
    fn iter_is_sorted_by_code() {
        let codes: Vec<u16> = RuleTable::standard().iter().map(|r| r.code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn with_rules_extends_and_overrides() {
        let table = RuleTable::standard().with_rules([
            StatusRule::new(409, "Conflict", Category::ClientError),
            StatusRule::new(200, "Okay", Category::Success),
        ]);
        assert_eq!(table.len(), 15);
        assert_eq!(table.lookup(409).unwrap().alias, "Conflict");
        assert_eq!(table.lookup(200).unwrap().alias, "Okay");
    }

    #[test]
    fn from_json_appends_rules() {
        let table = RuleTable::from_json(
            r#"[{"code": 503, "alias": "Service Unavailable", "category": "ServerError"}]"#,
        )
        .unwrap();
        assert_eq!(table.lookup(503).unwrap().category, Category::ServerError);
        assert_eq!(table.lookup(404).unwrap().alias, "Not Found");
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(RuleTable::from_json("{}"), Err(RuleError::Parse(_))));
        assert_eq!(
            RuleTable::from_json(r#"[{"code": 42, "alias": "x", "category": "Success"}]"#),
            Err(RuleError::InvalidStatusCode(42))
        );
    }
}

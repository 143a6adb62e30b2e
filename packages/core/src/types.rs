//! Core data types for envelope conformance checking.
//!
//! This module defines the values the validator works with:
//! [`StatusRule`], [`Category`], [`Severity`], [`Rule`], [`Finding`],
//! [`EnvelopeShape`], and [`JsonType`]. Findings serialise to JSON with the
//! camelCase keys used by the style guide itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The coarse class an HTTP status belongs to.
///
/// Serialises as a PascalCase string (e.g. `"ClientError"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    /// 2xx.
    Success,
    /// 3xx. Only 304 Not Modified appears in the guide's table.
    Redirection,
    /// 4xx.
    ClientError,
    /// 5xx.
    ServerError,
}

impl Category {
    /// Derive the category from the status class, or `None` when `code` lies
    /// outside `200..=599`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200..=299 => Some(Category::Success),
            300..=399 => Some(Category::Redirection),
            400..=499 => Some(Category::ClientError),
            500..=599 => Some(Category::ServerError),
            _ => None,
        }
    }

    /// `true` for client and server errors.
    pub fn is_error(self) -> bool {
        matches!(self, Category::ClientError | Category::ServerError)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Success => write!(f, "success"),
            Category::Redirection => write!(f, "redirection"),
            Category::ClientError => write!(f, "client error"),
            Category::ServerError => write!(f, "server error"),
        }
    }
}

/// One row of the status table: an HTTP code, its alias, and its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRule {
    pub code: u16,
    pub alias: String,
    pub category: Category,
}

impl StatusRule {
    pub fn new(code: u16, alias: impl Into<String>, category: Category) -> Self {
        Self {
            code,
            alias: alias.into(),
            category,
        }
    }
}

/// How serious a [`Finding`] is. Only `Error` findings fail a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The convention a [`Finding`] reports as violated.
///
/// Serialises as a stable string identifier (see [`Rule::as_str`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    #[serde(rename = "missing success discriminator")]
    MissingDiscriminator,
    #[serde(rename = "missing-field")]
    MissingField,
    #[serde(rename = "type-mismatch")]
    TypeMismatch,
    #[serde(rename = "code-mismatch")]
    CodeMismatch,
    #[serde(rename = "unknown-status-code")]
    UnknownStatusCode,
    #[serde(rename = "status-category-mismatch")]
    StatusCategoryMismatch,
    #[serde(rename = "naming-convention")]
    NamingConvention,
}

impl Rule {
    /// The wire identifier, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::MissingDiscriminator => "missing success discriminator",
            Rule::MissingField => "missing-field",
            Rule::TypeMismatch => "type-mismatch",
            Rule::CodeMismatch => "code-mismatch",
            Rule::UnknownStatusCode => "unknown-status-code",
            Rule::StatusCategoryMismatch => "status-category-mismatch",
            Rule::NamingConvention => "naming-convention",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conformance violation discovered in a response body.
///
/// ```json
/// { "path": "/data/owner_id", "ruleViolated": "naming-convention",
///   "severity": "error", "message": "key \"owner_id\" is not camelCase" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// JSON pointer (RFC 6901) to the offending value; `""` is the whole body.
    pub path: String,
    pub rule_violated: Rule,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(path: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule_violated: rule,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(path: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule_violated: rule,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The documented envelope variants a response body can take.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeShape {
    /// `{ success: true, code, data }`
    Success,
    /// Success plus `metadata.pagination { count, total, currentPage, totalPages }`.
    Paginated,
    /// `{ success: false, code, message, errors }`
    Error,
    /// `{ data, metadata? }` with no `success`/`code`, the guide's second form.
    Bare,
}

impl EnvelopeShape {
    /// The value the `success` discriminator must carry, if the shape has one.
    pub fn success_flag(self) -> Option<bool> {
        match self {
            EnvelopeShape::Success | EnvelopeShape::Paginated => Some(true),
            EnvelopeShape::Error => Some(false),
            EnvelopeShape::Bare => None,
        }
    }
}

impl std::fmt::Display for EnvelopeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeShape::Success => write!(f, "success"),
            EnvelopeShape::Paginated => write!(f, "paginated"),
            EnvelopeShape::Error => write!(f, "error"),
            EnvelopeShape::Bare => write!(f, "bare"),
        }
    }
}

/// The JSON type a required envelope field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Bool,
    /// A JSON number with no fractional part.
    Integer,
    String,
    Object,
    Array,
    /// `errors` may be either a mapping or a sequence.
    ObjectOrArray,
    Any,
}

impl JsonType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::Bool => value.is_boolean(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
            JsonType::String => value.is_string(),
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::ObjectOrArray => value.is_object() || value.is_array(),
            JsonType::Any => true,
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::Bool => write!(f, "boolean"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::String => write!(f, "string"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::ObjectOrArray => write!(f, "object or array"),
            JsonType::Any => write!(f, "any value"),
        }
    }
}

/// Name the JSON type of `value` for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

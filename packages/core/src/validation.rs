use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pointer;
use crate::rules::RuleTable;
use crate::types::{type_name, Category, EnvelopeShape, Finding, JsonType, Rule};

type Object = Map<String, Value>;

/// Tunable knobs for a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// How many object nesting levels are checked for camelCase keys.
    /// `1` checks only the envelope's own keys; `0` disables the check.
    pub naming_depth: usize,

    /// Accept `{data, metadata}` bodies that carry no `success`/`code` pair.
    pub accept_bare_envelope: bool,

    /// Warn when the `success` flag contradicts the status class, e.g. a
    /// success envelope under a 404. Off unless asked for.
    pub check_status_category: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            naming_depth: 2,
            accept_bare_envelope: true,
            check_status_category: false,
        }
    }
}

/// Checks response bodies against the documented envelope conventions.
///
/// A validator owns its [`RuleTable`] and holds no other state, so one
/// instance can be shared freely across threads and reused for any number of
/// responses.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    table: RuleTable,
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(table: RuleTable, options: ValidatorOptions) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Decide which envelope variant `body` claims to be, without checking
    /// any of its fields. Returns `None` when the shape is indeterminate.
    pub fn resolve_shape(&self, body: &Value) -> Option<EnvelopeShape> {
        let obj = body.as_object()?;
        match obj.get("success") {
            Some(Value::Bool(true)) if has_pagination(obj) => Some(EnvelopeShape::Paginated),
            Some(Value::Bool(true)) => Some(EnvelopeShape::Success),
            Some(Value::Bool(false)) => Some(EnvelopeShape::Error),
            Some(_) => None,
            None if self.options.accept_bare_envelope && obj.contains_key("data") => {
                Some(EnvelopeShape::Bare)
            }
            None => None,
        }
    }

    /// Validate one response body received with HTTP status `status`.
    ///
    /// Returns every violation found, in discovery order: discriminator,
    /// required fields, code cross-check, naming. An empty vector means the
    /// body is fully conformant. The result depends only on the arguments.
    pub fn validate(&self, status: u16, body: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();

        let Some(obj) = body.as_object() else {
            // 204 and 304 carry no body at all.
            if !(body.is_null() && matches!(status, 204 | 304)) {
                findings.push(Finding::error(
                    "",
                    Rule::MissingDiscriminator,
                    format!("body is {}, not an envelope object", type_name(body)),
                ));
            }
            return findings;
        };

        // 1. discriminator
        let shape = self.resolve_shape(body);
        if shape.is_none() {
            match obj.get("success") {
                Some(other) => {
                    findings.push(Finding::error(
                        "/success",
                        Rule::TypeMismatch,
                        format!("success must be a boolean, found {}", type_name(other)),
                    ));
                    findings.push(Finding::error(
                        "",
                        Rule::MissingDiscriminator,
                        "success discriminator is not true or false; envelope shape is indeterminate",
                    ));
                }
                None => findings.push(Finding::error(
                    "",
                    Rule::MissingDiscriminator,
                    "body has no success discriminator; envelope shape is indeterminate",
                )),
            }
        }

        // 2. required fields
        match shape {
            Some(EnvelopeShape::Success) => check_success(obj, &mut findings),
            Some(EnvelopeShape::Paginated) => check_paginated(obj, &mut findings),
            Some(EnvelopeShape::Error) => check_error(obj, &mut findings),
            Some(EnvelopeShape::Bare) => check_bare(obj, &mut findings),
            None => {}
        }

        // 3. code cross-check
        self.cross_check(status, obj, shape, &mut findings);

        // 4. naming
        check_naming(body, "", 1, self.options.naming_depth, &mut findings);

        tracing::debug!(
            status,
            shape = ?shape,
            findings = findings.len(),
            "validated response body"
        );

        findings
    }

    fn cross_check(
        &self,
        status: u16,
        obj: &Object,
        shape: Option<EnvelopeShape>,
        findings: &mut Vec<Finding>,
    ) {
        let rule = match self.table.lookup(status) {
            Ok(rule) => rule,
            Err(e) => {
                findings.push(Finding::warning(
                    "",
                    Rule::UnknownStatusCode,
                    format!("{e}; it cannot be cross-checked"),
                ));
                return;
            }
        };

        if let Some(code) = obj.get("code").filter(|c| JsonType::Integer.matches(c)) {
            if code.as_i64() != Some(i64::from(status)) {
                findings.push(Finding::warning(
                    "/code",
                    Rule::CodeMismatch,
                    format!(
                        "body code {code} differs from HTTP status {} {}",
                        rule.code, rule.alias
                    ),
                ));
            }
        }

        if !self.options.check_status_category {
            return;
        }
        if let Some(flag) = shape.and_then(EnvelopeShape::success_flag) {
            let consistent = match rule.category {
                Category::Success => flag,
                Category::ClientError | Category::ServerError => !flag,
                Category::Redirection => true,
            };
            if !consistent {
                findings.push(Finding::warning(
                    "/success",
                    Rule::StatusCategoryMismatch,
                    format!(
                        "success is {flag} but HTTP status {} {} is a {} status",
                        rule.code, rule.alias, rule.category
                    ),
                ));
            }
        }
    }
}

/// Validate against the standard table with default options.
///
/// ```rust
/// use envelint::validate_response;
/// use serde_json::json;
///
/// let body = json!({ "success": true, "code": 200, "data": { "ownerId": 3 } });
/// assert!(validate_response(200, &body).is_empty());
/// ```
pub fn validate_response(status: u16, body: &Value) -> Vec<Finding> {
    Validator::default().validate(status, body)
}

// --- shape checks ------------------------------------------------------------

fn check_success(obj: &Object, findings: &mut Vec<Finding>) {
    require(obj, "", "success", JsonType::Bool, findings);
    require(obj, "", "code", JsonType::Integer, findings);
    require(obj, "", "data", JsonType::Any, findings);
}

fn check_paginated(obj: &Object, findings: &mut Vec<Finding>) {
    check_success(obj, findings);
    check_pagination(obj, findings);
}

fn check_error(obj: &Object, findings: &mut Vec<Finding>) {
    require(obj, "", "success", JsonType::Bool, findings);
    require(obj, "", "code", JsonType::Integer, findings);
    require(obj, "", "message", JsonType::String, findings);
    require(obj, "", "errors", JsonType::ObjectOrArray, findings);
}

fn check_bare(obj: &Object, findings: &mut Vec<Finding>) {
    require(obj, "", "data", JsonType::Any, findings);
    match obj.get("metadata") {
        Some(meta) if !meta.is_object() => findings.push(mistyped("/metadata", JsonType::Object, meta)),
        Some(meta) if meta.get("pagination").is_some() => check_pagination(obj, findings),
        _ => {}
    }
}

const PAGINATION_FIELDS: [&str; 4] = ["count", "total", "currentPage", "totalPages"];

fn check_pagination(obj: &Object, findings: &mut Vec<Finding>) {
    let Some(meta) = require(obj, "", "metadata", JsonType::Object, findings) else {
        return;
    };
    let Some(pagination) = meta
        .as_object()
        .and_then(|m| require(m, "/metadata", "pagination", JsonType::Object, findings))
        .and_then(Value::as_object)
    else {
        return;
    };
    for field in PAGINATION_FIELDS {
        require(pagination, "/metadata/pagination", field, JsonType::Integer, findings);
    }
}

/// Check that `obj[field]` exists and has type `ty`, recording one finding
/// otherwise. Returns the value only when it is present and well typed.
fn require<'a>(
    obj: &'a Object,
    base: &str,
    field: &str,
    ty: JsonType,
    findings: &mut Vec<Finding>,
) -> Option<&'a Value> {
    let path = pointer::join(base, field);
    match obj.get(field) {
        None => {
            findings.push(Finding::error(
                path,
                Rule::MissingField,
                format!("required field {field:?} is missing"),
            ));
            None
        }
        Some(value) if !ty.matches(value) => {
            findings.push(mistyped(path, ty, value));
            None
        }
        Some(value) => Some(value),
    }
}

fn mistyped(path: impl Into<String>, expected: JsonType, found: &Value) -> Finding {
    Finding::error(
        path,
        Rule::TypeMismatch,
        format!("expected {expected}, found {}", type_name(found)),
    )
}

fn has_pagination(obj: &Object) -> bool {
    obj.get("metadata")
        .and_then(|m| m.get("pagination"))
        .is_some()
}

// --- naming ------------------------------------------------------------------

/// `^[a-z][a-zA-Z0-9]*$`
static CAMEL_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("invalid camelCase regex"));

/// Whether `key` follows the camelCase naming convention.
pub fn is_camel_case(key: &str) -> bool {
    CAMEL_CASE_RE.is_match(key)
}

fn check_naming(
    value: &Value,
    path: &str,
    level: usize,
    max_depth: usize,
    findings: &mut Vec<Finding>,
) {
    if level > max_depth {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = pointer::join(path, key);
                if !is_camel_case(key) {
                    findings.push(Finding::error(
                        child_path.clone(),
                        Rule::NamingConvention,
                        format!("key {key:?} is not camelCase"),
                    ));
                }
                check_naming(child, &child_path, level + 1, max_depth, findings);
            }
        }
        // Arrays don't add a level: `data: [{..}]` items sit beside `data`'s keys.
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_naming(item, &pointer::join_index(path, i), level, max_depth, findings);
            }
        }
        _ => {}
    }
}

// --- tests -------------------------------------------------------------------

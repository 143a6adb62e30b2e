//! Conformance checking for REST API response envelopes.
//!
//! This crate checks whether an API's HTTP responses follow the envelope,
//! status-code, pagination, and naming conventions of the API style guide.
//! It is the foundation for the `envelint` CLI, the `envelint-wasm`
//! WebAssembly bindings, and the `envelint-conformance` live HTTP harness.
//!
//! The checker never performs I/O: callers decode the response body and pass
//! it in together with the HTTP status.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Core values: [`StatusRule`], [`Category`], [`Finding`], [`Rule`], [`Severity`], [`EnvelopeShape`] |
//! | [`rules`] | The status table via [`RuleTable`] |
//! | [`validation`] | Envelope checking via [`Validator`] |
//! | [`report`] | Aggregation of findings into a pass/fail [`Summary`] |
//! | [`render`] | Human-readable text rendering |
//! | [`pointer`] | JSON pointer construction for finding paths |
//!
//! # Quick start
//!
//! ```rust
//! use envelint::{Report, RuleTable, Validator, ValidatorOptions};
//! use serde_json::json;
//!
//! let validator = Validator::new(RuleTable::standard(), ValidatorOptions::default());
//!
//! let body = json!({ "success": false, "code": 404, "message": "Not Found", "errors": {} });
//! let findings = validator.validate(404, &body);
//! assert!(findings.is_empty());
//!
//! let mut report = Report::new();
//! report.record("GET /users/42", 404, findings);
//! assert_eq!(report.summary().outcome.exit_code(), 0);
//! ```

pub mod pointer;
pub mod render;
pub mod report;
pub mod rules;
pub mod types;
pub mod validation;

pub use report::{Outcome, Report, ReportEntry, Summary};
pub use rules::{RuleError, RuleTable};
pub use types::{Category, EnvelopeShape, Finding, JsonType, Rule, Severity, StatusRule};
pub use validation::{is_camel_case, validate_response, Validator, ValidatorOptions};

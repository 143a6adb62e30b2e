//! WebAssembly bindings for the envelint checker.
//!
//! Exposes the validator and the status table to JavaScript/TypeScript via
//! `wasm-bindgen`. Compile with `wasm-pack build` to produce an npm-ready
//! package that works in browsers, Node.js, and any other WASM host.
//!
//! ```js
//! import init, { validate, passes, lookupStatus, render } from './envelint_wasm.js';
//! await init();
//!
//! const res = await fetch('/v1/users/42');
//! const body = await res.text();
//!
//! const findings = JSON.parse(validate(res.status, body));
//! if (!passes(res.status, body)) console.log(render(res.status, body));
//!
//! JSON.parse(lookupStatus(404)); // { code: 404, alias: "Not Found", category: "ClientError" }
//! ```

use envelint::{RuleTable, Validator, ValidatorOptions};
use wasm_bindgen::prelude::*;

/// One-time initialisation called at the start of every exported function.
///
/// Installs the `console_error_panic_hook` when the feature is enabled so
/// that Rust panics are forwarded to the browser console as readable errors
/// rather than appearing as generic "unreachable" WASM traps.
fn setup() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate a response body given as a JSON string.
///
/// Returns the findings as a JSON array string (`"[]"` when conformant).
/// An empty `json` string means "no body". `options` is an optional JSON
/// object:
///
/// ```json
/// { "namingDepth": 2, "acceptBareEnvelope": true }
/// ```
///
/// Throws a descriptive string if `json` or `options` is not valid JSON.
#[wasm_bindgen]
pub fn validate(status: u16, json: &str, options: Option<String>) -> Result<String, JsValue> {
    setup();
    let validator = build_validator(options)?;
    let body = parse_body(json)?;
    let findings = validator.validate(status, &body);
    serde_json::to_string(&findings).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `true` when the body produces no Error-severity finding.
///
/// Warnings (code mismatch, unknown status) do not make this return `false`.
#[wasm_bindgen]
pub fn passes(status: u16, json: &str) -> Result<bool, JsValue> {
    setup();
    let body = parse_body(json)?;
    Ok(!envelint::validate_response(status, &body)
        .iter()
        .any(envelint::Finding::is_error))
}

/// Render the findings for a response body as human-readable text.
#[wasm_bindgen]
pub fn render(status: u16, json: &str) -> Result<String, JsValue> {
    setup();
    let body = parse_body(json)?;
    let findings = envelint::validate_response(status, &body);
    Ok(envelint::render::render_findings(&findings))
}

/// Look up a status code in the standard table and return its rule as JSON:
///
/// ```json
/// { "code": 404, "alias": "Not Found", "category": "ClientError" }
/// ```
///
/// Throws if the code is not in the table.
#[wasm_bindgen(js_name = lookupStatus)]
pub fn lookup_status(code: u16) -> Result<String, JsValue> {
    setup();
    let table = RuleTable::standard();
    let rule = table
        .lookup(code)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(rule).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn build_validator(options: Option<String>) -> Result<Validator, JsValue> {
    let options = match options {
        Some(json) => serde_json::from_str::<ValidatorOptions>(&json)
            .map_err(|e| JsValue::from_str(&format!("options parse error: {e}")))?,
        None => ValidatorOptions::default(),
    };
    Ok(Validator::new(RuleTable::standard(), options))
}

fn parse_body(json: &str) -> Result<serde_json::Value, JsValue> {
    if json.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("parse error: {e}")))
}

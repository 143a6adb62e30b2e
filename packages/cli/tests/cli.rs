use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::runtime::Runtime;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("envelint").unwrap();
    for var in [
        "ENVELINT_FORMAT",
        "ENVELINT_NAMING_DEPTH",
        "ENVELINT_STRICT_ENVELOPE",
        "ENVELINT_CHECK_STATUS_CATEGORY",
        "ENVELINT_RULES",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn json_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp file");
    f.write_all(contents.as_bytes()).expect("write temp file");
    f
}

#[test]
fn validate_conformant_body() {
    let f = json_file(r#"{"success":true,"code":200,"data":{"ownerId":3}}"#);
    cmd()
        .args(["validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("conformant"));
}

#[test]
fn validate_reports_naming_violation() {
    let f = json_file(r#"{"success":true,"code":200,"data":{"owner_id":3}}"#);
    cmd()
        .args(["validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .code(1)
        .stdout(contains("naming-convention"))
        .stdout(contains("/data/owner_id"))
        .stdout(contains("not conformant"));
}

#[test]
fn validate_warning_only_still_passes() {
    let f = json_file(r#"{"success":false,"code":200,"message":"Not Found","errors":{}}"#);
    cmd()
        .args(["validate", "-s", "404"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("code-mismatch"));
}

#[test]
fn validate_reads_stdin() {
    cmd()
        .args(["validate", "--status", "404", "-"])
        .write_stdin(r#"{"success":false,"code":404,"errors":{}}"#)
        .assert()
        .code(1)
        .stdout(contains("missing-field"))
        .stdout(contains("/message"));
}

#[test]
fn validate_json_output() {
    let f = json_file(r#"{"success":true,"code":200,"data":{"owner_id":3}}"#);
    let out = cmd()
        .args(["--format", "json", "validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(v["summary"]["errors"], 1);
    assert_eq!(v["summary"]["outcome"], "fail");
    assert_eq!(v["entries"][0]["findings"][0]["ruleViolated"], "naming-convention");
}

#[test]
fn status_category_check_is_opt_in() {
    let f = json_file(r#"{"success":true,"code":404,"data":{}}"#);
    cmd()
        .args(["validate", "--status", "404"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("conformant"))
        .stdout(contains("status-category-mismatch").not());
    cmd()
        .args(["--check-status-category", "validate", "--status", "404"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("status-category-mismatch"));
}

#[test]
fn negative_code_is_reported() {
    let f = json_file(r#"{"success":false,"code":-404,"message":"Not Found","errors":{}}"#);
    cmd()
        .args(["validate", "--status", "404"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("code-mismatch"))
        .stdout(contains("-404"));
}

#[test]
fn strict_envelope_rejects_bare_body() {
    let f = json_file(r#"{"data":[],"metadata":{}}"#);
    cmd()
        .args(["validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .success();
    cmd()
        .args(["--strict-envelope", "validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .code(1)
        .stdout(contains("missing success discriminator"));
}

#[test]
fn invalid_json_exits_with_usage_error() {
    let f = json_file("{not json");
    cmd()
        .args(["validate", "--status", "200"])
        .arg(f.path())
        .assert()
        .code(2)
        .stderr(contains("failed to parse"));
}

#[test]
fn missing_file_exits_with_usage_error() {
    cmd()
        .args(["validate", "--status", "200", "/definitely/not/here.json"])
        .assert()
        .code(2)
        .stderr(contains("failed to read"));
}

#[test]
fn batch_summarises_cases() {
    let f = json_file(
        r#"[
            {"name": "GET /users", "status": 200,
             "body": {"success":true,"code":200,"data":[],
                      "metadata":{"pagination":{"count":5,"total":618,"currentPage":2,"totalPages":124}}}},
            {"name": "GET /users/9", "status": 404,
             "body": {"success":false,"code":404,"message":"Not Found","errors":{}}},
            {"status": 204}
        ]"#,
    );
    cmd()
        .arg("batch")
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("checked 3 responses: 0 errors, 0 warnings"))
        .stdout(contains("result: pass"));
}

#[test]
fn batch_fails_on_error_findings() {
    let f = json_file(r#"[{"name": "GET /broken", "status": 200, "body": {"code": 200}}]"#);
    cmd()
        .arg("batch")
        .arg(f.path())
        .assert()
        .code(1)
        .stdout(contains("GET /broken  (200)"))
        .stdout(contains("result: fail"));
}

#[test]
fn batch_empty_array_passes() {
    let f = json_file("[]");
    cmd()
        .arg("batch")
        .arg(f.path())
        .assert()
        .success()
        .stdout(contains("checked 0 responses: 0 errors, 0 warnings"))
        .stdout(contains("result: pass"));
}

#[test]
fn rules_lists_table() {
    cmd()
        .arg("rules")
        .assert()
        .success()
        .stdout(contains("404  Not Found"))
        .stdout(contains("429  Too Many Requests"));
}

#[test]
fn rules_single_code() {
    cmd()
        .args(["rules", "422"])
        .assert()
        .success()
        .stdout(contains("Unprocessable Entity"));
}

#[test]
fn rules_unknown_code_fails() {
    cmd()
        .args(["rules", "418"])
        .assert()
        .code(1)
        .stderr(contains("not in the rule table"));
}

#[test]
fn extra_rules_file_extends_table() {
    let rules = json_file(r#"[{"code":409,"alias":"Conflict","category":"ClientError"}]"#);
    cmd()
        .arg("--rules")
        .arg(rules.path())
        .args(["rules", "409"])
        .assert()
        .success()
        .stdout(contains("Conflict"));
}

#[test]
fn live_request_rejects_bad_method() {
    cmd()
        .args(["probe", "--method", "GE T", "http://127.0.0.1:9/"])
        .assert()
        .code(2)
        .stderr(contains("invalid HTTP method"));
}

/// Start the fixture API on a runtime the caller keeps alive for the test.
fn fixture_api() -> (Runtime, String) {
    let rt = Runtime::new().expect("build tokio runtime");
    let base = rt.block_on(envelint_conformance::spawn_fixture_api());
    (rt, base)
}

#[test]
fn live_conformant_endpoint() {
    let (_rt, base) = fixture_api();
    cmd()
        .args(["probe", &format!("{base}/v1/users/1")])
        .assert()
        .success()
        .stdout(contains("conformant"));
}

#[test]
fn live_endpoint_reports_naming_violation() {
    let (_rt, base) = fixture_api();
    cmd()
        .args(["probe", &format!("{base}/v1/broken/naming")])
        .assert()
        .code(1)
        .stdout(contains("naming-convention"))
        .stdout(contains("/data/owner_id"));
}

#[test]
fn live_no_content_passes() {
    let (_rt, base) = fixture_api();
    cmd()
        .args(["probe", "--method", "delete", &format!("{base}/v1/users/1")])
        .assert()
        .success()
        .stdout(contains("conformant"));
}

#[test]
fn live_plain_text_body_is_a_finding() {
    let (_rt, base) = fixture_api();
    cmd()
        .args(["probe", &format!("{base}/v1/broken/text")])
        .assert()
        .code(1)
        .stdout(contains("missing success discriminator"));
}

#[test]
fn live_json_output_names_request() {
    let (_rt, base) = fixture_api();
    let url = format!("{base}/v1/broken/code");
    let out = cmd()
        .args(["--format", "json", "probe", &url])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(v["entries"][0]["target"], format!("GET {url}"));
    assert_eq!(v["entries"][0]["status"], 404);
    assert_eq!(v["summary"]["warnings"], 1);
}

#[test]
fn live_unreachable_host_exits_with_usage_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    cmd()
        .args(["probe", "--timeout-secs", "5", &format!("http://{addr}/v1/users")])
        .assert()
        .code(2)
        .stderr(contains("request to"));
}

//! `envelint`: REST API response conformance command-line interface.
//!
//! Provides four subcommands:
//!
//! - **`validate`**: check one response body received with a given status.
//! - **`batch`**: check an array of `{name, status, body}` cases and print a
//!   summary report.
//! - **`probe`**: send one HTTP request and check the live response.
//! - **`rules`**: print the status table, or a single row of it.
//!
//! Files are read from a path or from stdin (`-`). Exit status is `0` when no
//! Error-severity finding was reported, `1` otherwise, and `2` on usage or
//! input errors.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use envelint::render::{render_findings, render_outcome, render_report, render_rules};
use envelint::{Report, RuleError, RuleTable, Summary, Validator, ValidatorOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// envelint: REST API response envelope checker
///
/// Check response bodies against the style guide's envelope, status-code,
/// pagination, and naming conventions.
#[derive(Parser)]
#[command(name = "envelint", version, about, long_about = None)]
struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = Format::Text, env = "ENVELINT_FORMAT")]
    format: Format,

    /// Number of object nesting levels checked for camelCase keys.
    #[arg(long, global = true, default_value_t = 2, env = "ENVELINT_NAMING_DEPTH")]
    naming_depth: usize,

    /// Reject bodies using the bare `{data, metadata}` envelope.
    #[arg(long, global = true, env = "ENVELINT_STRICT_ENVELOPE")]
    strict_envelope: bool,

    /// Warn when the `success` flag contradicts the status class.
    #[arg(long, global = true, env = "ENVELINT_CHECK_STATUS_CATEGORY")]
    check_status_category: bool,

    /// JSON file with extra status rules: [{"code":409,"alias":"Conflict","category":"ClientError"}].
    #[arg(long, global = true, value_name = "FILE", env = "ENVELINT_RULES")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a single response body.
    ///
    /// Pass `-` as FILE to read the body from stdin.
    Validate {
        /// HTTP status the body was returned with.
        #[arg(short, long)]
        status: u16,

        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Validate a JSON array of recorded responses.
    ///
    /// Each element is `{"name": "...", "status": 200, "body": {...}}`;
    /// `name` is optional and `body` defaults to null.
    Batch {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Send one HTTP request and validate the response.
    ///
    /// Examples:
    ///   envelint probe https://api.example.com/v1/users
    ///   envelint probe --method DELETE https://api.example.com/v1/users/42
    Probe {
        url: String,

        /// HTTP method to use.
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },

    /// Print the status table, or the rule for one status code.
    Rules {
        code: Option<u16>,
    },
}

/// A recorded response in a `batch` input file.
#[derive(Debug, Deserialize)]
struct Case {
    name: Option<String>,
    status: u16,
    #[serde(default)]
    body: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOut<'a> {
    entries: &'a [envelint::ReportEntry],
    summary: Summary,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse {what} as JSON: {source}")]
    Json {
        what: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("invalid HTTP method {0:?}")]
    Method(String),

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to serialise output: {0}")]
    Serialize(serde_json::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "envelint=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => fatal(&e.to_string()),
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    let table = match &cli.rules {
        Some(path) => RuleTable::from_json(&read_input(path)?)?,
        None => RuleTable::standard(),
    };
    let options = ValidatorOptions {
        naming_depth: cli.naming_depth,
        accept_bare_envelope: !cli.strict_envelope,
        check_status_category: cli.check_status_category,
    };
    let validator = Validator::new(table, options);

    match cli.command {
        Command::Validate { status, file } => {
            let body = parse_json(&read_input(&file)?, &file.display().to_string())?;
            let mut report = Report::new();
            report.record(file.display().to_string(), status, validator.validate(status, &body));
            emit_single(cli.format, &report)
        }

        Command::Batch { file } => {
            let json = read_input(&file)?;
            let cases: Vec<Case> = serde_json::from_str(&json).map_err(|source| CliError::Json {
                what: file.display().to_string(),
                source,
            })?;
            let mut report = Report::new();
            for (i, case) in cases.into_iter().enumerate() {
                let target = case.name.unwrap_or_else(|| format!("case {i}"));
                let findings = validator.validate(case.status, &case.body);
                tracing::debug!(case = %target, findings = findings.len(), "checked case");
                report.record(target, case.status, findings);
            }
            match cli.format {
                Format::Text => print!("{}", render_report(&report)),
                Format::Json => print_json(&report)?,
            }
            Ok(report.outcome().exit_code())
        }

        Command::Probe {
            url,
            method,
            timeout_secs,
        } => {
            let (status, body) = probe(&url, &method, Duration::from_secs(timeout_secs))?;
            let mut report = Report::new();
            report.record(
                format!("{} {url}", method.to_uppercase()),
                status,
                validator.validate(status, &body),
            );
            emit_single(cli.format, &report)
        }

        Command::Rules { code } => {
            let table = validator.table();
            match code {
                None => match cli.format {
                    Format::Text => print!("{}", render_rules(table)),
                    Format::Json => print_json_value(&table.iter().collect::<Vec<_>>())?,
                },
                Some(code) => match table.lookup(code) {
                    Ok(rule) => match cli.format {
                        Format::Text => println!("{}  {}  {}", rule.code, rule.alias, rule.category),
                        Format::Json => print_json_value(rule)?,
                    },
                    Err(e) => {
                        eprintln!("envelint: {e}");
                        return Ok(1);
                    }
                },
            }
            Ok(0)
        }
    }
}

/// Print the result of a single-response check and return its exit code.
fn emit_single(format: Format, report: &Report) -> Result<i32, CliError> {
    match format {
        Format::Text => {
            let findings: Vec<_> = report.findings().cloned().collect();
            if !findings.is_empty() {
                print!("{}", render_findings(&findings));
            }
            println!("{}", render_outcome(report.outcome()));
        }
        Format::Json => print_json(report)?,
    }
    Ok(report.outcome().exit_code())
}

/// Send a request and decode the response body.
///
/// An empty body decodes to `null`. A body that is not JSON is passed on as a
/// string so the validator reports it rather than the CLI aborting.
fn probe(url: &str, method: &str, timeout: Duration) -> Result<(u16, Value), CliError> {
    let method = reqwest::Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| CliError::Method(method.to_string()))?;
    let http_err = |source: reqwest::Error| CliError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_err)?;
    let resp = client
        .request(method, url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(http_err)?;
    let status = resp.status().as_u16();
    let text = resp.text().map_err(http_err)?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("response from {url} is not JSON: {e}");
            Value::String(text)
        })
    };
    Ok((status, body))
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read {
                path: "stdin".into(),
                source,
            })?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Parse a response body. An empty input is treated as "no body" (`null`).
fn parse_json(json: &str, what: &str) -> Result<Value, CliError> {
    if json.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(json).map_err(|source| CliError::Json {
        what: what.to_string(),
        source,
    })
}

fn print_json(report: &Report) -> Result<(), CliError> {
    print_json_value(&JsonOut {
        entries: report.entries(),
        summary: report.summary(),
    })
}

fn print_json_value<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::Serialize)?;
    println!("{json}");
    Ok(())
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("envelint: {}", msg);
    process::exit(2);
}

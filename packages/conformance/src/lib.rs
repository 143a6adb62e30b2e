//! Live HTTP conformance harness for envelint.
//!
//! Provides [`check_endpoint`] and [`check_all`], which fetch real responses
//! with `reqwest`, decode them, and run them through an
//! [`envelint::Validator`], plus [`spawn_fixture_api`], an in-process `axum`
//! server serving the style guide's example responses for end-to-end tests.

use std::sync::Arc;

use envelint::{Finding, Report, Validator};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;

mod fixture;

pub use fixture::spawn_fixture_api;

/// Errors raised while fetching a response. Conformance problems are never
/// errors; they are reported as [`Finding`]s.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("check task did not complete: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// Fetch `url` with a GET request and validate the response.
///
/// Returns the HTTP status together with the findings. An empty body is
/// validated as `null`; a body that is not JSON is validated as a string, so
/// it surfaces as a missing-discriminator finding rather than an error.
pub async fn check_endpoint(
    client: &reqwest::Client,
    validator: &Validator,
    url: &str,
) -> Result<(u16, Vec<Finding>), ProbeError> {
    let http_err = |source: reqwest::Error| ProbeError::Http {
        url: url.to_string(),
        source,
    };
    let resp = client.get(url).send().await.map_err(http_err)?;
    let status = resp.status().as_u16();
    let text = resp.text().await.map_err(http_err)?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("response from {url} is not JSON: {e}");
            Value::String(text)
        })
    };

    if validator.table().lookup(status).is_err() {
        tracing::warn!("{url} answered with status {status}, which is not in the rule table");
    }

    let findings = validator.validate(status, &body);
    tracing::debug!(url, status, findings = findings.len(), "checked endpoint");
    Ok((status, findings))
}

/// Check every URL concurrently and return one report, entries in input order.
///
/// Each check runs in its own `tokio` task with a private report; the
/// reports are merged once all tasks finish. The first failure aborts the
/// run, and dropping the [`JoinSet`] cancels every check still in flight.
pub async fn check_all(
    client: &reqwest::Client,
    validator: Arc<Validator>,
    urls: &[String],
) -> Result<Report, ProbeError> {
    let mut set = JoinSet::new();
    for (index, url) in urls.iter().cloned().enumerate() {
        let client = client.clone();
        let validator = Arc::clone(&validator);
        set.spawn(async move {
            let (status, findings) = check_endpoint(&client, &validator, &url).await?;
            let mut report = Report::new();
            report.record(url, status, findings);
            Ok::<_, ProbeError>((index, report))
        });
    }

    let mut parts: Vec<Option<Report>> = vec![None; urls.len()];
    while let Some(joined) = set.join_next().await {
        let (index, part) = joined.map_err(ProbeError::Task)??;
        parts[index] = Some(part);
    }

    let mut report = Report::new();
    for part in parts.into_iter().flatten() {
        report.merge(part);
    }
    Ok(report)
}

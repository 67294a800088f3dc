// crates/caresync-analytics/src/client.rs
// ============================================================================
// Module: Analytics Client
// Description: HTTP client for the analytics query service.
// Purpose: Execute parameterized statements and surface engine errors.
// Dependencies: caresync-config, base64, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! Statements post form-encoded to `{base}/analytics/service` with basic
//! auth. Named parameters are JSON-encoded values under `$NAME` form fields.
//! A query succeeds only on HTTP 200 with body `status == "success"`; any
//! other answer surfaces the engine's joined error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use caresync_config::EndpointConfig;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalyticsError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Connect timeout for analytics requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for analytics requests; scans can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// SECTION: Executor Seam
// ============================================================================

/// Executes parameterized analytics statements.
///
/// Parameter names carry their `$` prefix; values are already JSON-encoded.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs one statement and returns the engine's result rows.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] on transport failure or engine rejection.
    async fn execute(
        &self,
        statement: &str,
        params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, AnalyticsError>;
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Analytics service response envelope.
#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    /// Engine status; `"success"` on completed queries.
    #[serde(default)]
    status: Option<String>,
    /// Result rows in engine order.
    #[serde(default)]
    results: Vec<Value>,
    /// Engine error entries when the query failed.
    #[serde(default)]
    errors: Vec<Value>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the analytics query service.
///
/// # Invariants
/// - `url` points at the service endpoint, not the bare host.
pub struct AnalyticsClient {
    /// Full service endpoint URL.
    url: String,
    /// Precomputed `Basic` authorization header value.
    auth_header: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl AnalyticsClient {
    /// Builds a client from endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &EndpointConfig) -> Result<Self, AnalyticsError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AnalyticsError::Http(err.to_string()))?;
        let credentials = STANDARD.encode(format!("{}:{}", config.user, config.password));
        Ok(Self {
            url: format!("{}/analytics/service", config.url.trim_end_matches('/')),
            auth_header: format!("Basic {credentials}"),
            client,
        })
    }

    /// Posts one statement with its named parameters.
    async fn post_statement(
        &self,
        statement: &str,
        params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, AnalyticsError> {
        let mut form: Vec<(String, String)> =
            vec![("statement".to_string(), statement.trim().to_string())];
        form.extend(params);
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.auth_header)
            .form(&form)
            .send()
            .await
            .map_err(|err| AnalyticsError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| AnalyticsError::Http(err.to_string()))?;
        let parsed: AnalyticsResponse =
            serde_json::from_str(&body).unwrap_or_else(|_| AnalyticsResponse {
                status: None,
                results: Vec::new(),
                errors: vec![Value::String("Could not parse response body".to_string())],
            });
        if status != 200 || parsed.status.as_deref() != Some("success") {
            return Err(AnalyticsError::QueryFailed(join_errors(&parsed.errors)));
        }
        Ok(parsed.results)
    }
}

#[async_trait]
impl QueryExecutor for AnalyticsClient {
    async fn execute(
        &self,
        statement: &str,
        params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, AnalyticsError> {
        self.post_statement(statement, params).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Joins engine error entries into one diagnosable message.
fn join_errors(errors: &[Value]) -> String {
    if errors.is_empty() {
        return "no error detail returned".to_string();
    }
    errors
        .iter()
        .map(|entry| match entry {
            Value::String(message) => message.clone(),
            Value::Object(fields) => fields
                .get("msg")
                .and_then(Value::as_str)
                .map_or_else(|| entry.to_string(), str::to_string),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON-encodes a statement parameter value.
#[must_use]
pub fn quote_param(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// JSON-encodes a string-array statement parameter value.
#[must_use]
pub fn quote_param_list(values: &[String]) -> String {
    Value::Array(values.iter().cloned().map(Value::String).collect()).to_string()
}

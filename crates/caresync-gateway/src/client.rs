// crates/caresync-gateway/src/client.rs
// ============================================================================
// Module: Gateway Client
// Description: HTTP client for the document store.
// Purpose: Implement the store operations with batch splitting and no retries.
// Dependencies: caresync-config, caresync-core, base64, reqwest, serde_json, tokio
// ============================================================================

//! ## Overview
//! The client speaks the store's REST dialect against `{base}/{bucket}/...`
//! with a persistent basic-auth header. Batch reads split in half and run
//! concurrently when the URL would exceed the store's length ceiling, and
//! bulk writes split the same way on payload size; halves merge positionally
//! so result order matches input order. Failures surface upstream status and
//! body; nothing is retried here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use caresync_config::EndpointConfig;
use caresync_core::SyncDocument;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::encoding::encode_component;
use crate::encoding::encode_uri;
use crate::error::GatewayError;
use crate::types::AllDocsResponse;
use crate::types::BulkUpdateResult;
use crate::types::DbInfo;
use crate::types::UpdateResult;
use crate::types::ViewRow;
use crate::types::ViewResponse;
use crate::view::ViewQuery;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest `_all_docs` URL issued as a single request.
const MAX_ALL_DOCS_URL_CHARS: usize = 2084;

/// View URLs longer than this split their key set.
const MAX_VIEW_URL_CHARS: usize = 2083;

/// Bulk payloads over this many serialized bytes split in half.
const MAX_BULK_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Connect timeout for store requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for store requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Password assigned to store sync users when none is supplied.
pub const DEFAULT_SYNC_USER_PASSWORD: &str = "in2luser";

/// Boxed future used by the self-splitting batch operations.
type BatchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// `_bulk_docs` request envelope.
#[derive(Serialize)]
struct BulkDocsRequest<'a> {
    /// Documents written in one round trip.
    docs: &'a [SyncDocument],
}

/// `_user` upsert body.
#[derive(Serialize)]
struct UserRecord<'a> {
    /// Sync username.
    name: &'a str,
    /// Sync password.
    password: &'a str,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the document store.
///
/// # Invariants
/// - `base_url` carries no trailing slash.
/// - Every request carries the precomputed basic-auth header.
pub struct GatewayClient {
    /// Store base URL without a trailing slash.
    base_url: String,
    /// Precomputed `Basic` authorization header value.
    auth_header: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl GatewayClient {
    /// Builds a client from endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &EndpointConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GatewayError::Http(err.to_string()))?;
        let credentials = STANDARD.encode(format!("{}:{}", config.user, config.password));
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
            client,
        })
    }

    /// Fetches one document; absent documents read as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or unexpected status.
    pub async fn get(&self, bucket: &str, id: &str) -> Result<Option<SyncDocument>, GatewayError> {
        let url = format!("{}/{bucket}/{}", self.base_url, encode_component(id));
        let (status, body) = self.send(self.client.get(url)).await?;
        match status {
            404 => Ok(None),
            200 => Ok(Some(parse_body(&body)?)),
            status => Err(GatewayError::UnexpectedStatus { status, body }),
        }
    }

    /// Fetches documents for the given keys, preserving key order.
    ///
    /// Over-long URLs halve the key set and issue both halves concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when any half fails.
    pub async fn get_all_by_keys(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<SyncDocument>, GatewayError> {
        self.keys_request(bucket, keys).await
    }

    /// Recursive half-splitting fetch behind [`Self::get_all_by_keys`].
    fn keys_request<'a>(
        &'a self,
        bucket: &'a str,
        keys: &'a [String],
    ) -> BatchFuture<'a, Vec<SyncDocument>> {
        Box::pin(async move {
            if keys.is_empty() {
                return Ok(Vec::new());
            }
            let quoted: Vec<String> = keys.iter().map(|key| format!("\"{key}\"")).collect();
            let url = format!(
                "{}/{bucket}/_all_docs?include_docs=true&keys=[{}]",
                self.base_url,
                quoted.join(",")
            );
            if url.len() <= MAX_ALL_DOCS_URL_CHARS || keys.len() < 2 {
                let (status, body) = self.send(self.client.get(url)).await?;
                if status != 200 {
                    return Err(GatewayError::UnexpectedStatus { status, body });
                }
                let response: AllDocsResponse = parse_body(&body)?;
                return Ok(response.rows.into_iter().filter_map(|row| row.doc).collect());
            }
            let mid = keys.len() / 2;
            let (first, second) = tokio::join!(
                self.keys_request(bucket, &keys[.. mid]),
                self.keys_request(bucket, &keys[mid ..]),
            );
            let mut docs = first?;
            docs.extend(second?);
            Ok(docs)
        })
    }

    /// Queries a design-document view.
    ///
    /// Over-long URLs halve the `keys` set and issue both halves
    /// concurrently; rows merge in input order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or unexpected status.
    pub async fn get_view(
        &self,
        bucket: &str,
        view: &str,
        query: ViewQuery,
    ) -> Result<Vec<ViewRow>, GatewayError> {
        self.view_request(bucket, view, query).await
    }

    /// Recursive half-splitting fetch behind [`Self::get_view`].
    fn view_request<'a>(
        &'a self,
        bucket: &'a str,
        view: &'a str,
        query: ViewQuery,
    ) -> BatchFuture<'a, Vec<ViewRow>> {
        Box::pin(async move {
            let host = format!("{}/{bucket}/_design/{view}", self.base_url);
            let url = encode_uri(&format!("{host}{}", query.to_query_string()));
            if url.len() > MAX_VIEW_URL_CHARS && query.keys_len() >= 2 {
                let (first_half, second_half) = query.split_keys();
                let (first, second) = tokio::join!(
                    self.view_request(bucket, view, first_half),
                    self.view_request(bucket, view, second_half),
                );
                let mut rows = first?;
                rows.extend(second?);
                return Ok(rows);
            }
            let (status, body) = self.send(self.client.get(url)).await?;
            if status != 200 {
                return Err(GatewayError::UnexpectedStatus { status, body });
            }
            let response: ViewResponse = parse_body(&body)?;
            Ok(response.rows)
        })
    }

    /// Writes one document, passing `?rev=` when the caller holds one.
    ///
    /// The returned document carries the revision the store assigned. A
    /// stale revision surfaces as [`GatewayError::WriteRejected`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or store rejection.
    pub async fn update(
        &self,
        bucket: &str,
        mut doc: SyncDocument,
    ) -> Result<SyncDocument, GatewayError> {
        let id = require_id(&doc)?;
        let url = self.doc_url(bucket, &id, doc.rev.as_deref());
        let (_, body) = self.send(self.client.put(url).json(&doc)).await?;
        let result: UpdateResult = parse_body(&body)?;
        if !result.ok {
            return Err(write_rejected(result));
        }
        doc.rev = result.rev;
        Ok(doc)
    }

    /// Writes one document, first adopting the currently stored revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the read or the write fails.
    pub async fn upsert(
        &self,
        bucket: &str,
        mut doc: SyncDocument,
    ) -> Result<SyncDocument, GatewayError> {
        let id = require_id(&doc)?;
        if let Some(existing) = self.get(bucket, &id).await?
            && existing.rev.is_some()
        {
            doc.rev = existing.rev;
        }
        self.update(bucket, doc).await
    }

    /// Writes many documents through `_bulk_docs`.
    ///
    /// Payloads over the size ceiling halve and issue concurrently; the
    /// per-document results merge in input order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when any half fails.
    pub async fn bulk_update(
        &self,
        bucket: &str,
        docs: &[SyncDocument],
    ) -> Result<Vec<BulkUpdateResult>, GatewayError> {
        self.bulk_request(bucket, docs).await
    }

    /// Recursive half-splitting write behind [`Self::bulk_update`].
    fn bulk_request<'a>(
        &'a self,
        bucket: &'a str,
        docs: &'a [SyncDocument],
    ) -> BatchFuture<'a, Vec<BulkUpdateResult>> {
        Box::pin(async move {
            if docs.is_empty() {
                return Ok(Vec::new());
            }
            let serialized = serde_json::to_string(docs)
                .map_err(|err| GatewayError::InvalidRequest(err.to_string()))?;
            if serialized.len() > MAX_BULK_PAYLOAD_BYTES && docs.len() >= 2 {
                let mid = docs.len() / 2;
                let (first, second) = tokio::join!(
                    self.bulk_request(bucket, &docs[.. mid]),
                    self.bulk_request(bucket, &docs[mid ..]),
                );
                let mut results = first?;
                results.extend(second?);
                return Ok(results);
            }
            let url = format!("{}/{bucket}/_bulk_docs", self.base_url);
            let request = self.client.post(url).json(&BulkDocsRequest { docs });
            let (status, body) = self.send(request).await?;
            if status != 200 && status != 201 {
                return Err(GatewayError::UnexpectedStatus { status, body });
            }
            parse_body(&body)
        })
    }

    /// Deletes one document at its current revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or store rejection.
    pub async fn delete(
        &self,
        bucket: &str,
        doc: &SyncDocument,
    ) -> Result<UpdateResult, GatewayError> {
        let id = require_id(doc)?;
        let url = self.doc_url(bucket, &id, doc.rev.as_deref());
        let (_, body) = self.send(self.client.delete(url)).await?;
        let result: UpdateResult = parse_body(&body)?;
        if !result.ok {
            return Err(write_rejected(result));
        }
        Ok(result)
    }

    /// Creates or updates a store sync user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty username and
    /// [`GatewayError`] on transport failure.
    pub async fn update_user(
        &self,
        bucket: &str,
        username: &str,
        password: &str,
    ) -> Result<UpdateResult, GatewayError> {
        if username.is_empty() {
            return Err(GatewayError::InvalidRequest("username is required".to_string()));
        }
        let url = format!("{}/{bucket}/_user/{}", self.base_url, encode_component(username));
        let body = UserRecord {
            name: username,
            password,
        };
        let (status, _) = self.send(self.client.put(url).json(&body)).await?;
        Ok(UpdateResult {
            ok: status == 200 || status == 201,
            id: Some(username.to_string()),
            rev: Some(String::new()),
            error: None,
            reason: None,
        })
    }

    /// Fetches bucket root info for health probing.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or unexpected status.
    pub async fn db_info(&self, bucket: &str) -> Result<DbInfo, GatewayError> {
        let url = format!("{}/{bucket}/", self.base_url);
        let (status, body) = self.send(self.client.get(url)).await?;
        if status != 200 {
            return Err(GatewayError::UnexpectedStatus { status, body });
        }
        parse_body(&body)
    }

    /// Builds a document URL with an optional `?rev=` query.
    fn doc_url(&self, bucket: &str, id: &str, rev: Option<&str>) -> String {
        let mut url = format!("{}/{bucket}/{}", self.base_url, encode_component(id));
        if let Some(rev) = rev {
            url.push_str("?rev=");
            url.push_str(rev);
        }
        url
    }

    /// Sends a request with the auth header, returning status and body.
    async fn send(&self, request: RequestBuilder) -> Result<(u16, String), GatewayError> {
        let response = request
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|err| GatewayError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::Http(err.to_string()))?;
        Ok((status, body))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a response body, mapping failures to [`GatewayError::MalformedBody`].
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|err| GatewayError::MalformedBody(err.to_string()))
}

/// Extracts the document id required by write operations.
fn require_id(doc: &SyncDocument) -> Result<String, GatewayError> {
    doc.id
        .clone()
        .ok_or_else(|| GatewayError::InvalidRequest("document id is required".to_string()))
}

/// Maps a non-`ok` write result to [`GatewayError::WriteRejected`].
fn write_rejected(result: UpdateResult) -> GatewayError {
    GatewayError::WriteRejected {
        error: result.error.unwrap_or_default(),
        reason: result.reason.unwrap_or_default(),
    }
}

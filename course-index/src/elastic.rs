//! Elasticsearch REST helpers: index lifecycle, bulk ingestion and search.
//!
//! Only plain HTTP + JSON is used (`reqwest`), so any Elasticsearch-compatible
//! endpoint works (self-hosted, Elastic Cloud, OpenSearch with the same DSL).
//!
//! ## Public API
//! - [`ElasticClient::new`] → client bound to one index
//! - [`ElasticClient::reset_index`] → drop (if present) + create with mapping
//! - [`ElasticClient::bulk_index`] → NDJSON bulk with `refresh=true`
//! - [`SearchGateway::search`] → `_source` documents of the top hits

use reqwest::{StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use ai_llm_service::BoxFuture;

use crate::{
    config::ElasticConfig,
    errors::CourseIndexError,
    gateway::SearchGateway,
    query::SearchRequest,
    structs::course_record::CourseRecord,
};

/// Thin client for one Elasticsearch index.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    base: String,
    index: String,
}

impl ElasticClient {
    /// Builds the HTTP client (API-key auth header when configured).
    ///
    /// This call does not touch the cluster.
    pub fn new(cfg: &ElasticConfig) -> Result<Self, CourseIndexError> {
        let base = cfg.url.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CourseIndexError::InvalidConfig(format!(
                "ELASTIC_URL must start with http:// or https:// (got '{}')",
                cfg.url
            )));
        }

        let mut headers = header::HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            let value = header::HeaderValue::from_str(&format!("ApiKey {key}"))
                .map_err(|e| CourseIndexError::InvalidConfig(format!("ELASTIC_API_KEY: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base,
            index: cfg.index.clone(),
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base, self.index)
    }

    /// `HEAD /{index}`.
    pub async fn index_exists(&self) -> Result<bool, CourseIndexError> {
        let resp = self.http.head(self.index_url()).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(status_error(resp, &self.index_url()).await),
        }
    }

    /// Drops the index when present, then creates it with `mapping`.
    #[instrument(skip_all, fields(index = %self.index))]
    pub async fn reset_index(&self, mapping: &Value) -> Result<(), CourseIndexError> {
        let url = self.index_url();

        if self.index_exists().await? {
            let resp = self.http.delete(&url).send().await?;
            if !resp.status().is_success() {
                return Err(status_error(resp, &url).await);
            }
            info!("existing index deleted");
        }

        let resp = self.http.put(&url).json(mapping).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }
        info!("index created");
        Ok(())
    }

    /// Bulk-indexes `records` with `refresh=true` and returns the number of
    /// documents accepted. Per-item failures are logged and left out of the
    /// count; only a failed request is an error.
    #[instrument(skip_all, fields(index = %self.index, docs = records.len()))]
    pub async fn bulk_index(&self, records: &[CourseRecord]) -> Result<usize, CourseIndexError> {
        if records.is_empty() {
            return Ok(0);
        }

        let body = bulk_body(&self.index, records)?;
        let url = format!("{}/_bulk?refresh=true", self.base);

        let resp = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }

        let out: BulkResponse = resp
            .json()
            .await
            .map_err(|e| CourseIndexError::Decode(format!("bulk response: {e}")))?;

        let indexed = accepted_items(&out, records.len());
        if indexed < records.len() {
            warn!(indexed, total = records.len(), "bulk indexing partially failed");
        }
        Ok(indexed)
    }
}

impl SearchGateway for ElasticClient {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Vec<Value>, CourseIndexError>> {
        Box::pin(async move {
            let url = format!("{}/_search", self.index_url());
            debug!(index = %self.index, query = %request.query, size = request.size, "POST {url}");

            let resp = self.http.post(&url).json(request).send().await?;
            if !resp.status().is_success() {
                return Err(status_error(resp, &url).await);
            }

            let body: Value = resp.json().await?;
            parse_search_response(&body)
        })
    }
}

/// NDJSON body for `_bulk`: an `index` action line followed by the document.
/// The course code is used as `_id` so the index keeps `id` unique.
fn bulk_body(index: &str, records: &[CourseRecord]) -> Result<String, CourseIndexError> {
    let mut out = String::new();
    for rec in records {
        let action = serde_json::json!({ "index": { "_index": index, "_id": rec.id } });
        out.push_str(&serde_json::to_string(&action)?);
        out.push('\n');
        out.push_str(&serde_json::to_string(rec)?);
        out.push('\n');
    }
    Ok(out)
}

/// Logs every failed item of a bulk response and returns how many of
/// `total` documents were accepted.
fn accepted_items(resp: &BulkResponse, total: usize) -> usize {
    if !resp.errors {
        return total;
    }
    let mut failed = 0usize;
    for op in resp.items.iter().filter_map(|item| item.get("index")) {
        if let Some(err) = op.get("error") {
            failed += 1;
            warn!(id = %op.get("_id").unwrap_or(&serde_json::Value::Null), error = %err, "bulk item failed");
        }
    }
    total.saturating_sub(failed)
}

/// Extracts `hits.hits[*]._source` from a search response.
pub fn parse_search_response(body: &Value) -> Result<Vec<Value>, CourseIndexError> {
    let hits = body
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .ok_or_else(|| CourseIndexError::Decode("missing `hits.hits`".into()))?;

    Ok(hits
        .iter()
        .map(|hit| hit.get("_source").cloned().unwrap_or(Value::Object(Default::default())))
        .collect())
}

async fn status_error(resp: reqwest::Response, url: &str) -> CourseIndexError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    CourseIndexError::HttpStatus {
        status,
        url: url.to_string(),
        snippet: text.chars().take(240).collect(),
    }
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

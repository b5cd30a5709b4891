//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for the search backend and the index
//! bootstrap.

use std::path::PathBuf;

use crate::{errors::CourseIndexError, schema::DEFAULT_EMBEDDING_DIM};

/// Default location of the public course feed.
pub const DEFAULT_COURSE_DATA_URL: &str =
    "https://joe-rabbit.github.io/subjects_elastic_search/data.json";

/// Which search backend serves course queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBackend {
    /// Elasticsearch over its REST API.
    Elastic(ElasticConfig),
    /// Local in-process index loaded from a feed file.
    Memory { data_path: PathBuf },
}

/// Elasticsearch connectivity and index parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticConfig {
    /// Base URL, e.g. `https://my-deployment.es.us-east-1.aws.elastic.cloud`.
    pub url: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<String>,
    /// Index name (default `course_index`).
    pub index: String,
}

/// Index rebuild settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Drop, recreate and reingest the index at startup.
    pub rebuild: bool,
    /// Course feed URL.
    pub data_url: String,
    /// Expected embedding dimensionality.
    pub embedding_dim: usize,
    /// Max concurrent embedding requests during ingestion.
    pub embedding_concurrency: usize,
}

/// Top-level runtime configuration of the course index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub backend: SearchBackend,
    pub bootstrap: BootstrapConfig,
}

impl IndexConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `SEARCH_BACKEND` (`elastic` | `memory`; default: `elastic`)
    /// - `ELASTIC_URL` (required for `elastic`)
    /// - `ELASTIC_API_KEY` (optional)
    /// - `ELASTIC_INDEX` (default: `course_index`)
    /// - `COURSE_DATA_PATH` (required for `memory`)
    /// - `COURSE_INDEX_REBUILD` (default: false)
    /// - `COURSE_DATA_URL` (default: the public course feed)
    /// - `EMBEDDING_DIM` (default: 384)
    /// - `EMBEDDING_CONCURRENCY` (default: 4)
    pub fn from_env() -> Result<Self, CourseIndexError> {
        let backend = match env_or("SEARCH_BACKEND", "elastic").to_ascii_lowercase().as_str() {
            "elastic" | "elasticsearch" => SearchBackend::Elastic(ElasticConfig {
                url: must_env("ELASTIC_URL")?,
                api_key: std::env::var("ELASTIC_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                index: env_or("ELASTIC_INDEX", "course_index"),
            }),
            "memory" => SearchBackend::Memory {
                data_path: PathBuf::from(must_env("COURSE_DATA_PATH")?),
            },
            other => {
                return Err(CourseIndexError::InvalidConfig(format!(
                    "unknown SEARCH_BACKEND '{other}'"
                )));
            }
        };

        let bootstrap = BootstrapConfig {
            rebuild: read_bool_env("COURSE_INDEX_REBUILD")?.unwrap_or(false),
            data_url: env_or("COURSE_DATA_URL", DEFAULT_COURSE_DATA_URL),
            embedding_dim: read_usize_env("EMBEDDING_DIM")?.unwrap_or(DEFAULT_EMBEDDING_DIM),
            embedding_concurrency: read_usize_env("EMBEDDING_CONCURRENCY")?.unwrap_or(4),
        };

        if bootstrap.embedding_dim == 0 {
            return Err(CourseIndexError::InvalidConfig(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        if bootstrap.embedding_concurrency == 0 {
            return Err(CourseIndexError::InvalidConfig(
                "EMBEDDING_CONCURRENCY must be > 0".into(),
            ));
        }

        Ok(Self { backend, bootstrap })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn must_env(key: &str) -> Result<String, CourseIndexError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CourseIndexError::EnvMissing { key: key.into() })
}

/// Read an optional `usize` from env; set-but-invalid values are errors.
fn read_usize_env(key: &str) -> Result<Option<usize>, CourseIndexError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| CourseIndexError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}

/// Read an optional `bool` from env.
fn read_bool_env(key: &str) -> Result<Option<bool>, CourseIndexError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(CourseIndexError::EnvParse {
                key: key.into(),
                value: v,
            }),
        },
        _ => Ok(None),
    }
}

//! Course search index.
//!
//! - [`query`] builds the disjunctive `bool.should` course query.
//! - [`gateway::SearchGateway`] runs it: [`elastic::ElasticClient`] against
//!   Elasticsearch, [`memory::InMemoryIndex`] in-process.
//! - [`normalize`] flattens raw hits into [`structs::course_hit::CourseHit`].
//! - [`ingest`] rebuilds the index from the public course feed.
//!
//! [`CourseIndex`] ties these together for callers.

pub mod config;
pub mod elastic;
pub mod errors;
pub mod gateway;
pub mod ingest;
pub mod memory;
pub mod normalize;
pub mod query;
pub mod schema;
pub mod structs;

use std::sync::Arc;

use tracing::{debug, info};

use ai_llm_service::EmbeddingGateway;

use crate::{
    config::{IndexConfig, SearchBackend},
    elastic::ElasticClient,
    errors::CourseIndexError,
    gateway::SearchGateway,
    memory::InMemoryIndex,
    normalize::normalize_hits,
    query::{build_course_query, match_all_query},
    structs::{course_filters::CourseFilters, course_hit::CourseHit},
};

/// Search facade over one [`SearchGateway`].
#[derive(Clone)]
pub struct CourseIndex {
    gateway: Arc<dyn SearchGateway>,
}

impl CourseIndex {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self { gateway }
    }

    /// Connects the configured backend, rebuilding the Elasticsearch index
    /// first when `COURSE_INDEX_REBUILD` is set.
    pub async fn from_config(
        cfg: &IndexConfig,
        embedder: &dyn EmbeddingGateway,
    ) -> Result<Self, CourseIndexError> {
        match &cfg.backend {
            SearchBackend::Elastic(es) => {
                let client = ElasticClient::new(es)?;
                if cfg.bootstrap.rebuild {
                    ingest::rebuild_index(&cfg.bootstrap, &client, embedder).await?;
                }
                info!(index = %client.index(), "course index: elasticsearch");
                Ok(Self::new(Arc::new(client)))
            }
            SearchBackend::Memory { data_path } => {
                let idx = InMemoryIndex::from_feed_file(data_path).await?;
                info!(courses = idx.len(), "course index: in-memory");
                Ok(Self::new(Arc::new(idx)))
            }
        }
    }

    /// Runs the disjunctive query for `filters` and returns normalized hits,
    /// at most [`query::PAGE_SIZE`]. No active filter means no request and
    /// an empty result.
    pub async fn search_courses(
        &self,
        filters: &CourseFilters,
    ) -> Result<Vec<CourseHit>, CourseIndexError> {
        let Some(request) = build_course_query(filters) else {
            debug!("no active filters; search skipped");
            return Ok(Vec::new());
        };
        let docs = self.gateway.search(&request).await?;
        debug!(hits = docs.len(), "course search done");
        Ok(normalize_hits(&docs))
    }

    /// Up to ten arbitrary courses (`match_all`).
    pub async fn sample_courses(&self) -> Result<Vec<CourseHit>, CourseIndexError> {
        let docs = self.gateway.search(&match_all_query()).await?;
        Ok(normalize_hits(&docs))
    }
}

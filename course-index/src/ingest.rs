//! Index bootstrap: fetch the course feed, embed subject names, rebuild the
//! Elasticsearch index and bulk-load the records.

use std::path::Path;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use ai_llm_service::EmbeddingGateway;

use crate::{
    config::BootstrapConfig,
    elastic::ElasticClient,
    errors::CourseIndexError,
    schema::course_index_mapping,
    structs::course_record::CourseRecord,
};

/// Converts a feed (JSON array of course objects) into records.
/// Objects without an `id` are skipped with a warning.
pub fn records_from_feed(feed: &Value) -> Result<Vec<CourseRecord>, CourseIndexError> {
    let items = feed
        .as_array()
        .ok_or_else(|| CourseIndexError::Decode("course feed must be a JSON array".into()))?;

    let mut out = Vec::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        match item.as_object().and_then(CourseRecord::from_feed) {
            Some(rec) => out.push(rec),
            None => warn!(position = pos, "course feed entry without id skipped"),
        }
    }
    Ok(out)
}

/// Downloads the course feed from `url`.
pub async fn fetch_feed(url: &str) -> Result<Value, CourseIndexError> {
    let resp = reqwest::get(url).await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(CourseIndexError::HttpStatus {
            status,
            url: url.to_string(),
            snippet: text.chars().take(240).collect(),
        });
    }
    Ok(resp.json().await?)
}

/// Reads the course feed from a local file.
pub async fn read_feed(path: &Path) -> Result<Value, CourseIndexError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Fills `subject_name_vector` for every record and keeps only the records
/// that received one.
///
/// Runs up to `concurrency` embedding calls at a time. Records without a
/// subject name, whose embedding call fails, or whose vector has the wrong
/// size are skipped with a warning. Feed order is preserved.
pub async fn embed_subject_names(
    records: Vec<CourseRecord>,
    embedder: &dyn EmbeddingGateway,
    expected_dim: usize,
    concurrency: usize,
) -> Vec<CourseRecord> {
    let mut vectors: Vec<Option<Vec<f32>>> = vec![None; records.len()];

    let jobs: Vec<(usize, String)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.subject_name.trim().is_empty())
        .map(|(i, r)| (i, r.subject_name.clone()))
        .collect();
    debug!(jobs = jobs.len(), "embedding subject names");

    let results: Vec<(usize, Result<Vec<f32>, String>)> = stream::iter(jobs)
        .map(|(i, text)| async move {
            let v = embedder.embed(&text).await.map_err(|e| e.to_string());
            (i, v)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for (i, res) in results {
        match res {
            Ok(v) if v.len() == expected_dim => vectors[i] = Some(v),
            Ok(v) => warn!(
                course = %records[i].id,
                got = v.len(),
                want = expected_dim,
                "embedding dimension mismatch; course skipped"
            ),
            Err(e) => warn!(course = %records[i].id, error = %e, "embedding failed; course skipped"),
        }
    }

    records
        .into_iter()
        .zip(vectors)
        .filter_map(|(mut rec, vector)| match vector {
            Some(v) => {
                rec.subject_name_vector = v;
                Some(rec)
            }
            None => {
                if rec.subject_name.trim().is_empty() {
                    warn!(course = %rec.id, "course without subject name skipped");
                }
                None
            }
        })
        .collect()
}

/// Drops and recreates the index, then bulk-loads the feed.
///
/// Returns the number of documents indexed.
#[instrument(skip_all, fields(index = %client.index(), source = %cfg.data_url))]
pub async fn rebuild_index(
    cfg: &BootstrapConfig,
    client: &ElasticClient,
    embedder: &dyn EmbeddingGateway,
) -> Result<usize, CourseIndexError> {
    let feed = if cfg.data_url.starts_with("http://") || cfg.data_url.starts_with("https://") {
        fetch_feed(&cfg.data_url).await?
    } else {
        read_feed(Path::new(&cfg.data_url)).await?
    };
    let records = records_from_feed(&feed)?;
    let total = records.len();
    info!(courses = total, "course feed loaded");

    let records = embed_subject_names(
        records,
        embedder,
        cfg.embedding_dim,
        cfg.embedding_concurrency,
    )
    .await;
    info!(embedded = records.len(), total, "subject names embedded");

    client
        .reset_index(&course_index_mapping(cfg.embedding_dim))
        .await?;
    let indexed = client.bulk_index(&records).await?;
    info!(indexed, "course index rebuilt");
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{
        AiLlmError, BoxFuture,
        error_handler::{Provider, ProviderError, ProviderErrorKind},
    };
    use serde_json::json;

    struct FixedEmbedder {
        dim: usize,
    }

    impl EmbeddingGateway for FixedEmbedder {
        fn embed<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>> {
            Box::pin(async move {
                // Names starting with "Short" get a wrong-sized vector.
                if input.starts_with("Short") {
                    Ok(vec![0.0; self.dim - 1])
                } else {
                    Ok(vec![0.5; self.dim])
                }
            })
        }
    }

    #[test]
    fn feed_entries_without_id_are_dropped() {
        let feed = json!([
            { "id": "CSE 110", "Subject_Name": "Java" },
            { "Subject_Name": "No code" },
            "not an object",
            { "id": "CSE 230" }
        ]);
        let recs = records_from_feed(&feed).unwrap();
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["CSE 110", "CSE 230"]);
    }

    #[test]
    fn feed_must_be_an_array() {
        assert!(records_from_feed(&json!({ "id": "CSE 110" })).is_err());
    }

    struct FailingEmbedder;

    impl EmbeddingGateway for FailingEmbedder {
        fn embed<'a>(&'a self, _input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>> {
            Box::pin(async move {
                Err(AiLlmError::Provider(ProviderError::new(
                    Provider::Ollama,
                    ProviderErrorKind::EmptyChoices,
                )))
            })
        }
    }

    fn named(id: &str, name: &str) -> CourseRecord {
        CourseRecord { id: id.into(), subject_name: name.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn keeps_only_records_with_a_vector_of_the_right_dimension() {
        let recs = vec![
            named("A", "Algebra"),
            named("B", "Short name"),
            named("C", ""),
            named("D", "Discrete Math"),
        ];
        let kept = embed_subject_names(recs, &FixedEmbedder { dim: 4 }, 4, 2).await;

        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "D"]);
        assert!(kept.iter().all(|r| r.subject_name_vector.len() == 4));
    }

    #[tokio::test]
    async fn failed_embeddings_exclude_the_course() {
        let kept = embed_subject_names(vec![named("A", "Algebra")], &FailingEmbedder, 4, 2).await;
        assert!(kept.is_empty());
    }
}

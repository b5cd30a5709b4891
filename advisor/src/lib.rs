//! Course advising pipeline.
//!
//! [`Advisor`] wires the field extractor, the course index, the context
//! accumulator, background enrichment and the answer composer together. It
//! is cheap to clone and meant to live in the HTTP app state.
//!
//! `/ask` flow:
//! 1. settle enrichment queued by earlier requests;
//! 2. `map` → course map over the accumulated context;
//! 3. otherwise extract fields and queue enrichment seeded with them;
//! 4. search (cold-start sample on the first search of the process);
//! 5. compose the answer.

pub mod accumulator;
pub mod cfg;
pub mod composer;
pub mod enrichment;
pub mod error;
pub mod extractor;
pub mod prompt;
pub mod search;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use ai_llm_service::CompletionGateway;
use course_index::{CourseIndex, structs::course_hit::CourseHit};

pub use accumulator::{ContextAccumulator, ContextEntry};
pub use cfg::AdvisorConfig;
pub use composer::{CourseMap, NO_COURSE_DATA};
pub use error::AdvisorError;
pub use extractor::{Extraction, FilterSet};

use composer::AnswerComposer;
use enrichment::BackgroundEnricher;
use extractor::FieldExtractor;
use search::search_by_filter_set;

/// Result of the `/search` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// First search of the process: unfiltered sample.
    ColdStart(Vec<CourseHit>),
    /// Later searches: the extraction, not searched.
    Extracted(FilterSet),
    Unparsed { raw: String, reason: String },
}

struct Inner {
    extractor: FieldExtractor,
    index: CourseIndex,
    composer: AnswerComposer,
    accumulator: Arc<ContextAccumulator>,
    enricher: BackgroundEnricher,
}

#[derive(Clone)]
pub struct Advisor {
    inner: Arc<Inner>,
}

/// `true` when the question asks for the course map.
pub fn is_map_request(question: &str) -> bool {
    question.trim().eq_ignore_ascii_case("map")
}

impl Advisor {
    pub fn new(llm: Arc<dyn CompletionGateway>, index: CourseIndex, cfg: &AdvisorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                extractor: FieldExtractor::new(llm.clone()),
                index,
                composer: AnswerComposer::new(llm, cfg.max_context_chars),
                accumulator: Arc::new(ContextAccumulator::new(cfg.context_capacity)),
                enricher: BackgroundEnricher::new(cfg.max_background),
            }),
        }
    }

    pub fn accumulator(&self) -> &ContextAccumulator {
        &self.inner.accumulator
    }

    /// Joins background enrichment queued so far.
    pub async fn settle(&self) {
        self.inner.enricher.settle().await;
    }

    /// Answers one question (or produces the course map for `map`).
    #[instrument(skip_all, fields(question = %question.trim()))]
    pub async fn ask(&self, question: &str) -> Result<String, AdvisorError> {
        self.settle().await;

        if is_map_request(question) {
            let map = self.inner.composer.course_map(&self.accumulator().snapshot()).await?;
            return Ok(match map {
                CourseMap::Generated(text) => format!("Course Map: {text}"),
                CourseMap::NoData => NO_COURSE_DATA.to_string(),
            });
        }

        let extraction = self.inner.extractor.extract(question).await?;
        match &extraction {
            Extraction::Parsed(set) => {
                self.queue_enrichment(serde_json::to_string(set)?);
            }
            Extraction::Unparsed { reason, .. } => {
                warn!(%reason, "enrichment skipped: unparsed extraction");
            }
        }

        let results = if self.accumulator().take_first_call() {
            info!("first search of the process: cold-start sample");
            self.inner.index.sample_courses().await?
        } else {
            match extraction.filter_set() {
                Some(set) => search_by_filter_set(&self.inner.index, set).await?,
                None => Vec::new(),
            }
        };

        let context = self.accumulator().snapshot();
        self.inner.composer.compose(question, &context, &results).await
    }

    /// Extraction only; nothing is recorded.
    pub async fn parse_question(&self, question: &str) -> Result<Extraction, AdvisorError> {
        self.inner.extractor.extract(question).await
    }

    /// Cold-start sample on the first search of the process, the extracted
    /// filter set afterwards.
    #[instrument(skip_all)]
    pub async fn search(&self, question: &str) -> Result<SearchOutcome, AdvisorError> {
        if self.accumulator().take_first_call() {
            info!("first search of the process: cold-start sample");
            return Ok(SearchOutcome::ColdStart(self.inner.index.sample_courses().await?));
        }
        Ok(match self.inner.extractor.extract(question).await? {
            Extraction::Parsed(set) => SearchOutcome::Extracted(set),
            Extraction::Unparsed { raw, reason } => SearchOutcome::Unparsed { raw, reason },
        })
    }

    /// Course map over everything accumulated so far.
    pub async fn course_map(&self) -> Result<CourseMap, AdvisorError> {
        self.settle().await;
        self.inner
            .composer
            .course_map(&self.accumulator().snapshot())
            .await
    }

    /// Queues enrichment seeded with `completion`.
    pub fn store_course_info(&self, completion: String) {
        self.queue_enrichment(completion);
    }

    fn queue_enrichment(&self, seed: String) {
        let extractor = self.inner.extractor.clone();
        let index = self.inner.index.clone();
        let accumulator = self.inner.accumulator.clone();

        self.inner.enricher.spawn(async move {
            if let Err(e) = enrichment::enrich(extractor, index, accumulator, seed).await {
                warn!(error = %e, "background enrichment failed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::{AiLlmError, BoxFuture};
    use course_index::{
        memory::InMemoryIndex,
        structs::course_record::CourseRecord,
    };

    use super::*;
    use crate::prompt::EXTRACTION_SYSTEM;

    /// Answers extraction prompts with a fixed reply and every other prompt
    /// with `answer:` + the system message, recording each call.
    struct ScriptedLlm {
        extraction_reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedLlm {
        fn new(extraction_reply: &str) -> Arc<Self> {
            Arc::new(Self {
                extraction_reply: extraction_reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CompletionGateway for ScriptedLlm {
        fn complete<'a>(
            &'a self,
            system: &'a str,
            user: &'a str,
        ) -> BoxFuture<'a, Result<String, AiLlmError>> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .unwrap()
                    .push((system.to_string(), user.to_string()));
                if system == EXTRACTION_SYSTEM {
                    Ok(self.extraction_reply.clone())
                } else {
                    Ok(format!("answer:{system}"))
                }
            })
        }
    }

    const AFTER_CSE_110: &str = r#"{"Course Codes": ["CSE 110"], "Next Subject Codes": ["CSE 230"]}"#;

    fn catalog() -> CourseIndex {
        let rec = |id: &str, next: &str| CourseRecord {
            id: id.into(),
            subject_name: format!("Course {id}"),
            next_subject_code: next.into(),
            ..Default::default()
        };
        let idx = InMemoryIndex::new(vec![
            rec("CSE 110", "CSE 230"),
            rec("CSE 230", "CSE 310"),
            rec("MAT 117", "MAT 170"),
        ])
        .unwrap();
        CourseIndex::new(Arc::new(idx))
    }

    fn advisor(llm: Arc<ScriptedLlm>) -> Advisor {
        Advisor::new(llm, catalog(), &AdvisorConfig::default())
    }

    #[test]
    fn map_request_is_trimmed_and_case_insensitive() {
        assert!(is_map_request("map"));
        assert!(is_map_request("  MAP \n"));
        assert!(!is_map_request("course map"));
    }

    #[tokio::test]
    async fn map_with_empty_context_reports_no_data() {
        let llm = ScriptedLlm::new(AFTER_CSE_110);
        let adv = advisor(llm.clone());

        assert_eq!(adv.ask("Map").await.unwrap(), NO_COURSE_DATA);
        assert_eq!(adv.course_map().await.unwrap(), CourseMap::NoData);
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn next_course_is_found_through_the_exact_id_clause() {
        let llm = ScriptedLlm::new(AFTER_CSE_110);
        let adv = advisor(llm.clone());

        let set = match adv.parse_question("What comes after CSE 110?").await.unwrap() {
            Extraction::Parsed(set) => set,
            other => panic!("expected parsed, got {other:?}"),
        };
        assert_eq!(set.course_codes, vec!["CSE 110", "CSE 230"]);

        let hits = search_by_filter_set(&catalog(), &set).await.unwrap();
        let codes: Vec<&str> = hits.iter().map(CourseHit::course_code).collect();
        assert!(codes.contains(&"CSE 230"));
        assert!(codes.contains(&"CSE 110"));
    }

    #[tokio::test]
    async fn ask_composes_with_results_and_enriches_context() {
        let llm = ScriptedLlm::new(AFTER_CSE_110);
        let adv = advisor(llm.clone());
        assert!(adv.accumulator().take_first_call());

        let answer = adv.ask("What comes after CSE 110?").await.unwrap();
        assert!(answer.starts_with("answer:"));
        assert!(answer.contains("MAT 265"));
        assert!(answer.contains("CSE 230"));

        adv.settle().await;
        assert_eq!(adv.accumulator().len(), 2);

        let map = adv.ask("map").await.unwrap();
        assert!(map.starts_with("Course Map: answer:"));
        let (_, user) = llm.calls().last().cloned().unwrap();
        assert_eq!(user, prompt::COURSE_MAP_USER);
    }

    #[tokio::test]
    async fn first_ask_uses_the_cold_start_sample() {
        let llm = ScriptedLlm::new(r#"{"Course Codes": ["NOPE 999"]}"#);
        let adv = advisor(llm);

        let answer = adv.ask("Anything?").await.unwrap();
        // CSE 310 only appears as a next subject in the sampled catalog.
        assert!(answer.contains("CSE 310"));
        assert!(!adv.accumulator().take_first_call());
    }

    #[tokio::test]
    async fn unparsed_extraction_skips_enrichment_and_searches_nothing() {
        let llm = ScriptedLlm::new("no json here");
        let adv = advisor(llm);
        assert!(adv.accumulator().take_first_call());

        let answer = adv.ask("What comes after CSE 110?").await.unwrap();
        assert!(answer.contains(r#""results":[]"#));
        adv.settle().await;
        assert!(adv.accumulator().is_empty());
    }

    #[tokio::test]
    async fn search_is_cold_start_once_then_extraction() {
        let llm = ScriptedLlm::new(AFTER_CSE_110);
        let adv = advisor(llm);

        match adv.search("first").await.unwrap() {
            SearchOutcome::ColdStart(hits) => assert_eq!(hits.len(), 3),
            other => panic!("expected cold start, got {other:?}"),
        }
        match adv.search("What comes after CSE 110?").await.unwrap() {
            SearchOutcome::Extracted(set) => assert_eq!(set.course_codes.len(), 2),
            other => panic!("expected extraction, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn exactly_one_of_many_concurrent_searches_gets_the_sample() {
        let adv = advisor(ScriptedLlm::new(AFTER_CSE_110));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let adv = adv.clone();
                tokio::spawn(async move { adv.search(&format!("question {i}")).await })
            })
            .collect();

        let mut cold_starts = 0;
        for h in handles {
            match h.await.unwrap().unwrap() {
                SearchOutcome::ColdStart(_) => cold_starts += 1,
                SearchOutcome::Extracted(_) => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(cold_starts, 1);
    }

    #[tokio::test]
    async fn store_course_info_records_two_rounds() {
        let llm = ScriptedLlm::new(AFTER_CSE_110);
        let adv = advisor(llm);

        adv.store_course_info("CSE 110 is followed by CSE 230".into());
        adv.settle().await;

        let snap = adv.accumulator().snapshot();
        assert_eq!(snap.len(), 2);
        assert!(matches!(&snap[0], ContextEntry::Hits(h) if !h.is_empty()));
        // Enrichment never consumes the cold-start flag.
        assert!(adv.accumulator().take_first_call());
    }
}

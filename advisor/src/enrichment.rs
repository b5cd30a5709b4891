//! Best-effort background enrichment of the advising context.
//!
//! Jobs run as detached tasks and wait for one of a bounded number of
//! permits, so every accepted job eventually runs. Failures are logged and
//! never reach the HTTP caller. [`BackgroundEnricher::settle`] waits until no
//! job is pending so the next reader sees the results; dropping a settling
//! future leaves the jobs running.

use std::{future::Future, sync::Arc};

use tokio::sync::{Semaphore, watch};
use tracing::{debug, info, instrument, warn};

use course_index::CourseIndex;

use crate::{
    accumulator::{ContextAccumulator, ContextEntry},
    error::AdvisorError,
    extractor::{Extraction, FieldExtractor},
    search::search_by_filter_set,
};

/// Extract → search → record, applied this many times per seed.
const ROUNDS: usize = 2;

pub struct BackgroundEnricher {
    pending: Arc<watch::Sender<usize>>,
    permits: Arc<Semaphore>,
}

/// Decrements the pending count when a job finishes, panics or is aborted.
struct PendingGuard(Arc<watch::Sender<usize>>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl BackgroundEnricher {
    pub fn new(max_in_flight: usize) -> Self {
        let (pending, _) = watch::channel(0usize);
        Self {
            pending: Arc::new(pending),
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Queues `job`. At most `max_in_flight` jobs run at once; the rest wait
    /// for a permit.
    pub fn spawn<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.send_modify(|n| *n += 1);
        let guard = PendingGuard(self.pending.clone());
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let _guard = guard;
            let Ok(_permit) = permits.acquire_owned().await else {
                warn!("background enrichment semaphore closed; job dropped");
                return;
            };
            // Inner task so a panicking job is reported instead of lost.
            if let Err(e) = tokio::spawn(job).await {
                warn!(error = %e, "background enrichment task aborted");
            }
        });
    }

    /// Waits until no queued or running job is left. Concurrent callers all
    /// wait for the same jobs.
    pub async fn settle(&self) {
        let mut rx = self.pending.subscribe();
        let pending = *rx.borrow_and_update();
        if pending == 0 {
            return;
        }

        debug!(tasks = pending, "settling background enrichment");
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

/// Two rounds of extract → search → record, seeded with `seed`.
///
/// Each round records its hits; a round whose extraction parsed but found no
/// courses records the filter set instead. The next round extracts from the
/// JSON of what the previous round recorded.
#[instrument(skip_all, fields(seed_len = seed.len()))]
pub async fn enrich(
    extractor: FieldExtractor,
    index: CourseIndex,
    accumulator: Arc<ContextAccumulator>,
    seed: String,
) -> Result<(), AdvisorError> {
    let mut input = seed;
    for round in 1..=ROUNDS {
        let set = match extractor.extract(&input).await? {
            Extraction::Parsed(set) => set,
            Extraction::Unparsed { reason, .. } => {
                warn!(round, %reason, "enrichment stopped: unparsed extraction");
                return Ok(());
            }
        };

        let hits = search_by_filter_set(&index, &set).await?;
        let entry = if hits.is_empty() {
            ContextEntry::Filters(set)
        } else {
            ContextEntry::Hits(hits)
        };
        input = serde_json::to_string(&entry)?;
        let total = accumulator.record(entry).len();
        info!(round, context_entries = total, "context enriched");
    }
    Ok(())
}

//! Process-wide advising context: a bounded, mutex-guarded deque of recorded
//! items plus the one-shot first-call flag.

use std::{
    collections::VecDeque,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::Serialize;

use course_index::structs::course_hit::CourseHit;

use crate::extractor::FilterSet;

/// One recorded item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextEntry {
    Filters(FilterSet),
    Hits(Vec<CourseHit>),
}

#[derive(Debug)]
pub struct ContextAccumulator {
    entries: Mutex<VecDeque<ContextEntry>>,
    capacity: usize,
    first_call: AtomicBool,
}

impl ContextAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            first_call: AtomicBool::new(true),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ContextEntry>> {
        // Entries stay consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends `item`, evicting the oldest entries over capacity, and returns
    /// a snapshot.
    pub fn record(&self, item: ContextEntry) -> Vec<ContextEntry> {
        let mut entries = self.lock();
        entries.push_back(item);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        entries.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<ContextEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// `true` for exactly one caller over the accumulator's lifetime.
    pub fn take_first_call(&self) -> bool {
        self.first_call
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

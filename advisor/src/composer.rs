//! Answer and course-map composition over the accumulated context.

use std::sync::Arc;

use tracing::{debug, instrument};

use ai_llm_service::CompletionGateway;
use course_index::structs::course_hit::CourseHit;

use crate::{
    accumulator::ContextEntry,
    error::AdvisorError,
    prompt::{COURSE_MAP_USER, advising_system, course_map_system},
};

/// Reply when a course map is requested before any context exists.
pub const NO_COURSE_DATA: &str = "No course data available to generate a map.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseMap {
    Generated(String),
    NoData,
}

#[derive(Clone)]
pub struct AnswerComposer {
    llm: Arc<dyn CompletionGateway>,
    max_context_chars: usize,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn CompletionGateway>, max_context_chars: usize) -> Self {
        Self {
            llm,
            max_context_chars,
        }
    }

    /// Advising rules + context + `results` as system, `question` as user.
    #[instrument(skip_all, fields(context = context.len(), results = results.len()))]
    pub async fn compose(
        &self,
        question: &str,
        context: &[ContextEntry],
        results: &[CourseHit],
    ) -> Result<String, AdvisorError> {
        let system = advising_system(context, results, self.max_context_chars)?;
        debug!(system_chars = system.len(), "composing answer");
        Ok(self.llm.complete(&system, question).await?)
    }

    /// Course map over `context`; [`CourseMap::NoData`] without calling the
    /// model when `context` is empty.
    #[instrument(skip_all, fields(context = context.len()))]
    pub async fn course_map(&self, context: &[ContextEntry]) -> Result<CourseMap, AdvisorError> {
        if context.is_empty() {
            return Ok(CourseMap::NoData);
        }
        let system = course_map_system(context, self.max_context_chars)?;
        let text = self.llm.complete(&system, COURSE_MAP_USER).await?;
        Ok(CourseMap::Generated(text))
    }
}

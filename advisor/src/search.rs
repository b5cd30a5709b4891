//! Course lookup driven by an extracted [`FilterSet`].

use tracing::debug;

use course_index::{CourseIndex, structs::course_hit::CourseHit};

use crate::{error::AdvisorError, extractor::FilterSet};

/// One query per course code (other filters zipped by position), hits
/// concatenated in course-code order. No course codes, no queries.
pub async fn search_by_filter_set(
    index: &CourseIndex,
    set: &FilterSet,
) -> Result<Vec<CourseHit>, AdvisorError> {
    let mut hits = Vec::new();
    for filters in set.course_filters() {
        let found = index.search_courses(&filters).await?;
        debug!(course = ?filters.course_id, hits = found.len(), "filter-set lookup");
        hits.extend(found);
    }
    Ok(hits)
}

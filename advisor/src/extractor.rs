//! Field extraction: question (or prior result) → [`FilterSet`] via the
//! completion API.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use ai_llm_service::CompletionGateway;
use course_index::structs::{course_filters::CourseFilters, course_record::stringify};

use crate::{
    error::AdvisorError,
    prompt::{EXTRACTION_SYSTEM, extraction_prompt},
};

/// Twelve labeled lists extracted from one input. Labels match
/// [`course_index::structs::course_hit::labels`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(rename = "Course Codes", default, deserialize_with = "lenient_list")]
    pub course_codes: Vec<String>,
    #[serde(rename = "Categories", default, deserialize_with = "lenient_list")]
    pub categories: Vec<String>,
    #[serde(rename = "Semesters", default, deserialize_with = "lenient_list")]
    pub semesters: Vec<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_list")]
    pub description: Vec<String>,
    #[serde(rename = "Critical Requirement", default, deserialize_with = "lenient_list")]
    pub critical_requirement: Vec<String>,
    #[serde(rename = "Total Credits", default, deserialize_with = "lenient_list")]
    pub total_credits: Vec<String>,
    #[serde(rename = "Next Subject Codes", default, deserialize_with = "lenient_list")]
    pub next_subject_codes: Vec<String>,
    #[serde(rename = "Prior Requirements", default, deserialize_with = "lenient_list")]
    pub prior_requirements: Vec<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_list")]
    pub category: Vec<String>,
    #[serde(rename = "Session", default, deserialize_with = "lenient_list")]
    pub session: Vec<String>,
    #[serde(rename = "Optional", default, deserialize_with = "lenient_list")]
    pub optional: Vec<String>,
    #[serde(rename = "Minimum_passing_Grade", default, deserialize_with = "lenient_list")]
    pub minimum_passing_grade: Vec<String>,
}

/// Accepts a list, a scalar or `null`; every member becomes text.
fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(stringify)
            .collect(),
        Some(other) => vec![stringify(&other)],
    })
}

impl FilterSet {
    /// Appends prior requirements, then next subject codes, to the course
    /// codes. Order is kept and duplicates are not removed.
    pub fn merge_linked_codes(&mut self) {
        self.course_codes.extend(self.prior_requirements.iter().cloned());
        self.course_codes.extend(self.next_subject_codes.iter().cloned());
    }

    /// One [`CourseFilters`] per course code; the other filters are taken
    /// from the same position of their lists when present.
    pub fn course_filters(&self) -> Vec<CourseFilters> {
        let at = |list: &[String], i: usize| list.get(i).cloned();

        self.course_codes
            .iter()
            .enumerate()
            .map(|(i, code)| CourseFilters {
                course_id: Some(code.clone()),
                category: at(&self.categories, i),
                semester: at(&self.semesters, i),
                description: at(&self.description, i),
                critical_requirement: at(&self.critical_requirement, i),
                total_credits: at(&self.total_credits, i),
                next_subject_code: at(&self.next_subject_codes, i),
                prior_requirement: at(&self.prior_requirements, i),
                session: at(&self.session, i),
                optional: at(&self.optional, i),
                minimum_passing_grade: at(&self.minimum_passing_grade, i),
                ..CourseFilters::default()
            })
            .collect()
    }
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Parsed(FilterSet),
    /// The model reply held no parseable JSON object.
    Unparsed { raw: String, reason: String },
}

impl Extraction {
    pub fn filter_set(&self) -> Option<&FilterSet> {
        match self {
            Extraction::Parsed(set) => Some(set),
            Extraction::Unparsed { .. } => None,
        }
    }
}

/// Parses a model reply: trim, slice from the first `{` to the last `}`
/// when both exist, strict JSON parse, then merge linked codes.
pub fn parse_model_reply(reply: &str) -> Extraction {
    let text = reply.trim();
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };

    match serde_json::from_str::<FilterSet>(candidate) {
        Ok(mut set) => {
            set.merge_linked_codes();
            Extraction::Parsed(set)
        }
        Err(e) => Extraction::Unparsed {
            raw: text.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Completion-backed extractor.
#[derive(Clone)]
pub struct FieldExtractor {
    llm: Arc<dyn CompletionGateway>,
}

impl FieldExtractor {
    pub fn new(llm: Arc<dyn CompletionGateway>) -> Self {
        Self { llm }
    }

    #[instrument(skip_all, fields(input_len = input.len()))]
    pub async fn extract(&self, input: &str) -> Result<Extraction, AdvisorError> {
        let prompt = extraction_prompt(input);
        let reply = self.llm.complete(EXTRACTION_SYSTEM, &prompt).await?;
        let out = parse_model_reply(&reply);
        match &out {
            Extraction::Parsed(set) => debug!(codes = set.course_codes.len(), "fields extracted"),
            Extraction::Unparsed { reason, .. } => warn!(%reason, "model reply is not a JSON object"),
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(reply: &str) -> FilterSet {
        match parse_model_reply(reply) {
            Extraction::Parsed(set) => set,
            other => panic!("expected parsed, got {other:?}"),
        }
    }

    #[test]
    fn merge_keeps_order_and_duplicates() {
        let set = parsed(
            r#"{"Course Codes": ["CSE 110", "CSE 230"],
                "Prior Requirements": ["CSE 110"],
                "Next Subject Codes": ["CSE 230", "CSE 310"]}"#,
        );
        assert_eq!(
            set.course_codes,
            vec!["CSE 110", "CSE 230", "CSE 110", "CSE 230", "CSE 310"]
        );
    }

    #[test]
    fn surrounding_commentary_is_ignored() {
        let set = parsed("Sure! Here it is:\n```json\n{\"Course Codes\": [\"MAT 117\"]}\n```\nDone.");
        assert_eq!(set.course_codes, vec!["MAT 117"]);
    }

    #[test]
    fn reply_without_braces_is_unparsed() {
        match parse_model_reply("  I could not find any courses.  ") {
            Extraction::Unparsed { raw, reason } => {
                assert_eq!(raw, "I could not find any courses.");
                assert!(!reason.is_empty());
            }
            other => panic!("expected unparsed, got {other:?}"),
        }
    }

    #[test]
    fn broken_json_is_unparsed() {
        let out = parse_model_reply(r#"{"Course Codes": ["CSE 110",]"#);
        assert!(out.filter_set().is_none());
        let out = parse_model_reply("} backwards {");
        assert!(out.filter_set().is_none());
    }

    #[test]
    fn missing_labels_default_and_scalars_become_text() {
        let set = parsed(
            r#"{"Course Codes": "CSE 110", "Total Credits": [3], "Critical Requirement": [true],
                "Session": null, "Optional": [null, "False"]}"#,
        );
        assert_eq!(set.course_codes, vec!["CSE 110"]);
        assert_eq!(set.total_credits, vec!["3"]);
        assert_eq!(set.critical_requirement, vec!["True"]);
        assert!(set.session.is_empty());
        assert_eq!(set.optional, vec!["False"]);
        assert!(set.semesters.is_empty());
    }

    #[test]
    fn course_filters_zip_by_position() {
        let set = FilterSet {
            course_codes: vec!["CSE 110".into(), "CSE 230".into()],
            semesters: vec!["1".into()],
            next_subject_codes: vec!["CSE 230".into(), "CSE 310".into()],
            ..Default::default()
        };
        let filters = set.course_filters();

        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].course_id.as_deref(), Some("CSE 110"));
        assert_eq!(filters[0].semester.as_deref(), Some("1"));
        assert_eq!(filters[0].next_subject_code.as_deref(), Some("CSE 230"));
        assert_eq!(filters[1].course_id.as_deref(), Some("CSE 230"));
        assert_eq!(filters[1].semester, None);
        assert_eq!(filters[1].subject_name, None);
    }

    #[test]
    fn serialized_shape_uses_labels() {
        let v = serde_json::to_value(FilterSet::default()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 12);
        assert!(obj.contains_key("Minimum_passing_Grade"));
        assert!(obj.contains_key("Course Codes"));
    }
}

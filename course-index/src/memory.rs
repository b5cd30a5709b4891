//! In-process course index.
//!
//! Evaluates the same query DSL the builder emits (`match_all`, and
//! `bool.should` over `term`, `wildcard` and `match` clauses) against a list of
//! course documents held in memory. Used for local runs without a cluster
//! (`SEARCH_BACKEND=memory`) and as the search backend in tests.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use ai_llm_service::BoxFuture;

use crate::{
    errors::CourseIndexError,
    gateway::SearchGateway,
    query::SearchRequest,
    structs::course_record::{CourseRecord, stringify},
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    docs: Vec<Value>,
}

impl InMemoryIndex {
    pub fn new(records: Vec<CourseRecord>) -> Result<Self, CourseIndexError> {
        let docs = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { docs })
    }

    /// Loads a course feed file (a JSON array of course objects).
    pub async fn from_feed_file(path: &Path) -> Result<Self, CourseIndexError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let feed: Value = serde_json::from_str(&raw)?;
        let records = crate::ingest::records_from_feed(&feed)?;
        info!(path = %path.display(), courses = records.len(), "in-memory course index loaded");
        Self::new(records)
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.len()
    }

    /// Runs `request` synchronously; unsupported clauses are errors.
    pub fn run(&self, request: &SearchRequest) -> Result<Vec<Value>, CourseIndexError> {
        let mut out = Vec::new();
        for doc in &self.docs {
            if out.len() >= request.size {
                break;
            }
            if eval_query(doc, &request.query)? {
                out.push(doc.clone());
            }
        }
        Ok(out)
    }
}

impl SearchGateway for InMemoryIndex {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Vec<Value>, CourseIndexError>> {
        Box::pin(async move { self.run(request) })
    }
}

fn eval_query(doc: &Value, query: &Value) -> Result<bool, CourseIndexError> {
    let obj = query
        .as_object()
        .ok_or_else(|| CourseIndexError::Decode("query must be an object".into()))?;
    let (kind, body) = obj
        .iter()
        .next()
        .ok_or_else(|| CourseIndexError::Decode("empty query".into()))?;

    match kind.as_str() {
        "match_all" => Ok(true),
        "bool" => eval_bool(doc, body),
        "term" | "wildcard" | "match" => {
            let (field, expected) = single_field(body)?;
            let actual = field_text(doc, field);
            Ok(match kind.as_str() {
                "term" => actual == expected,
                "wildcard" => wildcard_match(&expected, &actual),
                _ => text_match(&expected, &actual),
            })
        }
        other => Err(CourseIndexError::Decode(format!("unsupported clause `{other}`"))),
    }
}

fn eval_bool(doc: &Value, body: &Value) -> Result<bool, CourseIndexError> {
    let should = body
        .get("should")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let min = body
        .get("minimum_should_match")
        .and_then(Value::as_u64)
        .unwrap_or(if should.is_empty() { 0 } else { 1 }) as usize;

    let mut matched = 0usize;
    for clause in &should {
        if eval_query(doc, clause)? {
            matched += 1;
        }
    }
    Ok(matched >= min)
}

fn single_field(body: &Value) -> Result<(&str, String), CourseIndexError> {
    let (field, value) = body
        .as_object()
        .and_then(|o| o.iter().next())
        .ok_or_else(|| CourseIndexError::Decode("clause without field".into()))?;
    Ok((field.as_str(), stringify(value)))
}

/// Stored text of `field`; `x.keyword` reads the same value as `x`.
fn field_text(doc: &Value, field: &str) -> String {
    let name = field.strip_suffix(".keyword").unwrap_or(field);
    doc.get(name).map(stringify).unwrap_or_default()
}

/// `*` matches any run of characters; everything else is literal.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let mut rest = text;
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == last {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

/// Full-text `match`: any shared lowercase token.
fn text_match(query: &str, text: &str) -> bool {
    let tokens = |s: &str| -> Vec<String> {
        s.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect()
    };
    let haystack = tokens(text);
    tokens(query).iter().any(|t| haystack.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_course_query, match_all_query};
    use crate::structs::course_filters::CourseFilters;

    fn record(id: &str, next: &str, semester: &str, description: &str) -> CourseRecord {
        CourseRecord {
            id: id.into(),
            subject_name: format!("Subject {id}"),
            next_subject_code: next.into(),
            semester: semester.into(),
            description: description.into(),
            category: "Core".into(),
            ..Default::default()
        }
    }

    fn index() -> InMemoryIndex {
        InMemoryIndex::new(vec![
            record("CSE 110", "CSE 230", "1", "Introductory Java programming."),
            record("CSE 230", "CSE 310", "2", "Computer organization and assembly."),
            record("MAT 117", "MAT 170", "1", "College algebra."),
        ])
        .unwrap()
    }

    fn ids(docs: &[Value]) -> Vec<String> {
        docs.iter().map(|d| d["id"].as_str().unwrap().to_string()).collect()
    }

    #[test]
    fn term_on_id_is_exact() {
        let req = build_course_query(&CourseFilters::for_course("CSE 230")).unwrap();
        assert_eq!(ids(&index().run(&req).unwrap()), vec!["CSE 230"]);

        let req = build_course_query(&CourseFilters::for_course("cse 230")).unwrap();
        assert!(index().run(&req).unwrap().is_empty());
    }

    #[test]
    fn wildcard_semester_is_substring() {
        let req = build_course_query(&CourseFilters {
            semester: Some("2".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ids(&index().run(&req).unwrap()), vec!["CSE 230"]);
        assert!(wildcard_match("*all*", "fall 2024"));
        assert!(wildcard_match("CSE*", "CSE 110"));
        assert!(!wildcard_match("*x*", "spring"));
    }

    #[test]
    fn description_is_full_text() {
        let req = build_course_query(&CourseFilters {
            description: Some("java basics".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ids(&index().run(&req).unwrap()), vec!["CSE 110"]);
    }

    #[test]
    fn subject_name_keyword_reads_subject_name() {
        let req = build_course_query(&CourseFilters {
            subject_name: Some("Subject MAT 117".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ids(&index().run(&req).unwrap()), vec!["MAT 117"]);
    }

    #[test]
    fn extra_filters_never_shrink_results() {
        let idx = index();
        let base = CourseFilters::for_course("CSE 110");
        let base_hits = idx.run(&build_course_query(&base).unwrap()).unwrap().len();

        let widened = [
            CourseFilters { semester: Some("1".into()), ..base.clone() },
            CourseFilters { category: Some("Elective".into()), ..base.clone() },
            CourseFilters { next_subject_code: Some("CSE 310".into()), ..base.clone() },
            CourseFilters { description: Some("algebra".into()), ..base.clone() },
        ];
        for f in &widened {
            let n = idx.run(&build_course_query(f).unwrap()).unwrap().len();
            assert!(n >= base_hits, "{f:?} returned {n} < {base_hits}");
        }
    }

    #[test]
    fn match_all_respects_page_size() {
        let records = (0..25)
            .map(|i| record(&format!("GEN {i}"), "", "", ""))
            .collect();
        let idx = InMemoryIndex::new(records).unwrap();
        assert_eq!(idx.len(), 25);
        assert_eq!(idx.run(&match_all_query()).unwrap().len(), 10);
    }

    #[test]
    fn unsupported_clause_is_an_error() {
        let req = SearchRequest {
            query: serde_json::json!({ "knn": {} }),
            size: 10,
        };
        assert!(index().run(&req).is_err());
    }
}

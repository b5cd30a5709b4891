//! Disjunctive course query construction.
//!
//! One `should` clause per active filter, `minimum_should_match = 1`:
//! exact `term` for identifier/category/code-like fields, `wildcard`
//! substring for the semester, full-text `match` for the description.

use serde::Serialize;
use serde_json::{Value, json};

use crate::structs::{course_filters::CourseFilters, course_record::fields};

/// Fixed page size for every course search. No pagination beyond it.
pub const PAGE_SIZE: usize = 10;

/// Request handed to a [`crate::gateway::SearchGateway`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: Value,
    pub size: usize,
}

/// How a clause compares the filter value with the stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Term,
    Wildcard,
    Match,
}

/// Field/operator mapping for each of the thirteen filters, in clause order.
pub fn active_clauses(filters: &CourseFilters) -> Vec<(ClauseKind, &'static str, &str)> {
    let table: [(&Option<String>, ClauseKind, &'static str); 13] = [
        (&filters.course_id, ClauseKind::Term, fields::ID),
        (&filters.subject_name, ClauseKind::Term, fields::SUBJECT_NAME_KEYWORD),
        (&filters.subject_code, ClauseKind::Term, fields::ID),
        (&filters.category, ClauseKind::Term, fields::CATEGORY),
        (&filters.semester, ClauseKind::Wildcard, fields::SEMESTER),
        (&filters.description, ClauseKind::Match, fields::DESCRIPTION),
        (&filters.critical_requirement, ClauseKind::Term, fields::CRITICAL_REQUIREMENT),
        (&filters.total_credits, ClauseKind::Term, fields::TOTAL_CREDITS),
        (&filters.next_subject_code, ClauseKind::Term, fields::NEXT_SUBJECT_CODE),
        (&filters.prior_requirement, ClauseKind::Term, fields::PRIOR_REQUIREMENTS),
        (&filters.session, ClauseKind::Term, fields::SESSION),
        (&filters.optional, ClauseKind::Term, fields::OPTIONAL),
        (&filters.minimum_passing_grade, ClauseKind::Term, fields::MINIMUM_PASSING_GRADE),
    ];

    table
        .into_iter()
        .filter_map(|(value, kind, field)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (kind, field, v))
        })
        .collect()
}

fn clause(kind: ClauseKind, field: &str, value: &str) -> Value {
    match kind {
        ClauseKind::Term => json!({ "term": { field: value } }),
        ClauseKind::Wildcard => json!({ "wildcard": { field: format!("*{value}*") } }),
        ClauseKind::Match => json!({ "match": { field: value } }),
    }
}

/// Builds the `bool.should` query for `filters`.
///
/// Returns `None` when no filter is active: an empty `should` list with
/// `minimum_should_match = 1` can never match, so there is nothing to send.
pub fn build_course_query(filters: &CourseFilters) -> Option<SearchRequest> {
    let should: Vec<Value> = active_clauses(filters)
        .into_iter()
        .map(|(kind, field, value)| clause(kind, field, value))
        .collect();

    if should.is_empty() {
        return None;
    }

    Some(SearchRequest {
        query: json!({
            "bool": {
                "should": should,
                "minimum_should_match": 1
            }
        }),
        size: PAGE_SIZE,
    })
}

/// Cold-start query: every document, capped at the page size.
pub fn match_all_query() -> SearchRequest {
    SearchRequest {
        query: json!({ "match_all": {} }),
        size: PAGE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn should(req: &SearchRequest) -> &Vec<Value> {
        req.query["bool"]["should"].as_array().unwrap()
    }

    #[test]
    fn empty_filters_build_no_query() {
        assert!(build_course_query(&CourseFilters::default()).is_none());
    }

    #[test]
    fn blank_filters_are_ignored() {
        let f = CourseFilters {
            course_id: Some("   ".into()),
            ..Default::default()
        };
        assert!(build_course_query(&f).is_none());
    }

    #[test]
    fn course_id_is_exact_term_on_id() {
        let req = build_course_query(&CourseFilters::for_course("CSE 230")).unwrap();
        assert_eq!(req.size, PAGE_SIZE);
        assert_eq!(req.query["bool"]["minimum_should_match"], 1);
        assert_eq!(should(&req), &vec![json!({ "term": { "id": "CSE 230" } })]);
    }

    #[test]
    fn every_filter_maps_to_its_field_and_operator() {
        let f = CourseFilters {
            course_id: Some("CSE 110".into()),
            subject_name: Some("Principles of Programming Java".into()),
            subject_code: Some("CSE 110".into()),
            category: Some("Gold".into()),
            semester: Some("1".into()),
            description: Some("java programming".into()),
            critical_requirement: Some("True".into()),
            total_credits: Some("3".into()),
            next_subject_code: Some("CSE 230".into()),
            prior_requirement: Some("MAT 117".into()),
            session: Some("C".into()),
            optional: Some("False".into()),
            minimum_passing_grade: Some("C".into()),
        };
        let req = build_course_query(&f).unwrap();

        let expected = vec![
            json!({ "term": { "id": "CSE 110" } }),
            json!({ "term": { "subject_name.keyword": "Principles of Programming Java" } }),
            json!({ "term": { "id": "CSE 110" } }),
            json!({ "term": { "category": "Gold" } }),
            json!({ "wildcard": { "semester": "*1*" } }),
            json!({ "match": { "description": "java programming" } }),
            json!({ "term": { "critical_requirement": "True" } }),
            json!({ "term": { "total_credits": "3" } }),
            json!({ "term": { "next_subject_code": "CSE 230" } }),
            json!({ "term": { "prior_requirements": "MAT 117" } }),
            json!({ "term": { "session": "C" } }),
            json!({ "term": { "optional": "False" } }),
            json!({ "term": { "minimum_passing_grade": "C" } }),
        ];
        assert_eq!(should(&req), &expected);
    }

    #[test]
    fn adding_filters_only_adds_clauses() {
        let one = build_course_query(&CourseFilters::for_course("CSE 110")).unwrap();
        let two = build_course_query(&CourseFilters {
            category: Some("Gold".into()),
            ..CourseFilters::for_course("CSE 110")
        })
        .unwrap();

        assert_eq!(should(&one).len(), 1);
        assert_eq!(should(&two).len(), 2);
        assert_eq!(should(&two)[0], should(&one)[0]);
        assert_eq!(two.query["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn match_all_is_capped() {
        let req = match_all_query();
        assert_eq!(req.query, json!({ "match_all": {} }));
        assert_eq!(req.size, 10);
    }
}

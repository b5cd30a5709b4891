//! Flattening of search hits into the fixed labeled shape.
//!
//! Each label is read from the stored record field first and from the label
//! itself second, so an already-normalized hit passes through unchanged.

use serde_json::Value;

use crate::structs::{
    course_hit::{CourseHit, labels},
    course_record::{fields, stringify},
};

/// Reads `field` (or `label` as a fallback) from `doc` as a single text value.
/// Lists contribute their first element; missing values become `""`.
fn pick(doc: &Value, field: &str, label: &str) -> Vec<String> {
    let raw = doc.get(field).or_else(|| doc.get(label));
    let text = match raw {
        Some(Value::Array(items)) => items.first().map(stringify).unwrap_or_default(),
        Some(v) => stringify(v),
        None => String::new(),
    };
    vec![text]
}

/// Normalizes one `_source` document (or an already-normalized hit).
pub fn normalize_hit(doc: &Value) -> CourseHit {
    CourseHit {
        course_codes: pick(doc, fields::ID, labels::COURSE_CODES),
        categories: pick(doc, fields::CATEGORY, labels::CATEGORIES),
        semesters: pick(doc, fields::SEMESTER, labels::SEMESTERS),
        description: pick(doc, fields::DESCRIPTION, labels::DESCRIPTION),
        critical_requirement: pick(doc, fields::CRITICAL_REQUIREMENT, labels::CRITICAL_REQUIREMENT),
        total_credits: pick(doc, fields::TOTAL_CREDITS, labels::TOTAL_CREDITS),
        next_subject_codes: pick(doc, fields::NEXT_SUBJECT_CODE, labels::NEXT_SUBJECT_CODES),
        prior_requirements: pick(doc, fields::PRIOR_REQUIREMENTS, labels::PRIOR_REQUIREMENTS),
        category: pick(doc, fields::CATEGORY, labels::CATEGORY),
        session: pick(doc, fields::SESSION, labels::SESSION),
        optional: pick(doc, fields::OPTIONAL, labels::OPTIONAL),
        minimum_passing_grade: pick(
            doc,
            fields::MINIMUM_PASSING_GRADE,
            labels::MINIMUM_PASSING_GRADE,
        ),
    }
}

/// Normalizes a list of `_source` documents, preserving ranking order.
pub fn normalize_hits(docs: &[Value]) -> Vec<CourseHit> {
    docs.iter().map(normalize_hit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> Value {
        json!({
            "id": "CSE 230",
            "subject_name": "Computer Organization",
            "description": "Registers, assembly and memory.",
            "category": "Core",
            "semester": "2",
            "total_credits": "3",
            "next_subject_code": "CSE 310",
            "prior_requirements": "CSE 110",
            "session": "C",
            "subject_name_vector": [0.1, 0.2]
        })
    }

    #[test]
    fn wraps_every_value_in_a_single_element_list() {
        let hit = normalize_hit(&source());

        assert_eq!(hit.course_codes, vec!["CSE 230"]);
        assert_eq!(hit.categories, vec!["Core"]);
        assert_eq!(hit.category, vec!["Core"]);
        assert_eq!(hit.semesters, vec!["2"]);
        assert_eq!(hit.next_subject_codes, vec!["CSE 310"]);
        assert_eq!(hit.prior_requirements, vec!["CSE 110"]);
    }

    #[test]
    fn missing_fields_default_to_empty_text() {
        let hit = normalize_hit(&json!({ "id": "MAT 117" }));

        assert_eq!(hit.critical_requirement, vec![""]);
        assert_eq!(hit.optional, vec![""]);
        assert_eq!(hit.minimum_passing_grade, vec![""]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_hit(&source());
        let again = normalize_hit(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, again);

        let sparse = normalize_hit(&json!({}));
        let sparse_again = normalize_hit(&serde_json::to_value(&sparse).unwrap());
        assert_eq!(sparse, sparse_again);
    }

    #[test]
    fn serialized_shape_uses_labels() {
        let v = serde_json::to_value(normalize_hit(&source())).unwrap();
        assert_eq!(v["Course Codes"], json!(["CSE 230"]));
        assert_eq!(v["Minimum_passing_Grade"], json!([""]));
        assert_eq!(v.as_object().unwrap().len(), 12);
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored field names of a course document.
pub mod fields {
    pub const ID: &str = "id";
    pub const SUBJECT_NAME: &str = "subject_name";
    pub const SUBJECT_NAME_KEYWORD: &str = "subject_name.keyword";
    pub const DESCRIPTION: &str = "description";
    pub const CRITICAL_REQUIREMENT: &str = "critical_requirement";
    pub const OPTIONAL: &str = "optional";
    pub const MINIMUM_PASSING_GRADE: &str = "minimum_passing_grade";
    pub const TOTAL_CREDITS: &str = "total_credits";
    pub const NEXT_SUBJECT_CODE: &str = "next_subject_code";
    pub const CATEGORY: &str = "category";
    pub const SESSION: &str = "session";
    pub const SEMESTER: &str = "semester";
    pub const PRIOR_REQUIREMENTS: &str = "prior_requirements";
    pub const MANDATORY_PRIORS: &str = "mandatory_priors";
    pub const SUBJECT_NAME_VECTOR: &str = "subject_name_vector";
}

/// A course document as stored in the index.
///
/// Every non-vector field is text, even when the feed carried a number or a
/// boolean. `id` is the course code (e.g. `"CSE 110"`) and is unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    pub subject_name: String,
    pub description: String,
    pub critical_requirement: String,
    pub optional: String,
    pub minimum_passing_grade: String,
    pub total_credits: String,
    pub next_subject_code: String,
    pub category: String,
    pub session: String,
    pub semester: String,
    pub prior_requirements: String,
    pub mandatory_priors: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_name_vector: Vec<f32>,
}

impl CourseRecord {
    /// Builds a record from one object of the course feed.
    ///
    /// Feed keys are matched case-insensitively (`Subject_Name` →
    /// `subject_name`) and the feed's `Critical_Requirment` spelling is
    /// accepted. Returns `None` when the object has no usable `id`.
    pub fn from_feed(obj: &Map<String, Value>) -> Option<Self> {
        let mut rec = CourseRecord::default();

        for (key, value) in obj {
            let text = stringify(value);
            match key.to_ascii_lowercase().as_str() {
                "id" => rec.id = text,
                "subject_name" => rec.subject_name = text,
                "description" => rec.description = text,
                "critical_requirement" | "critical_requirment" => rec.critical_requirement = text,
                "optional" => rec.optional = text,
                "minimum_passing_grade" => rec.minimum_passing_grade = text,
                "total_credits" => rec.total_credits = text,
                "next_subject_code" => rec.next_subject_code = text,
                "category" => rec.category = text,
                "session" => rec.session = text,
                "semester" => rec.semester = text,
                "prior_requirements" => rec.prior_requirements = text,
                "mandatory_priors" => rec.mandatory_priors = text,
                _ => {}
            }
        }

        if rec.id.trim().is_empty() {
            None
        } else {
            Some(rec)
        }
    }
}

/// Text form of a feed value: strings verbatim, `null` as empty, lists joined
/// with `", "`, everything else via its JSON rendering.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_values_become_text() {
        let obj = json!({
            "id": "CSE 110",
            "Subject_Name": "Principles of Programming Java",
            "Critical_Requirment": true,
            "Total_Credits": 3,
            "Next_Subject_Code": "CSE 230",
            "prior_requirements": ["MAT 117", "CSE 100"],
            "Optional": null
        });
        let rec = CourseRecord::from_feed(obj.as_object().unwrap()).unwrap();

        assert_eq!(rec.id, "CSE 110");
        assert_eq!(rec.subject_name, "Principles of Programming Java");
        assert_eq!(rec.critical_requirement, "True");
        assert_eq!(rec.total_credits, "3");
        assert_eq!(rec.next_subject_code, "CSE 230");
        assert_eq!(rec.prior_requirements, "MAT 117, CSE 100");
        assert_eq!(rec.optional, "");
    }

    #[test]
    fn records_without_id_are_rejected() {
        let obj = json!({ "Subject_Name": "Orphan" });
        assert!(CourseRecord::from_feed(obj.as_object().unwrap()).is_none());
    }

    #[test]
    fn empty_vector_is_not_serialized() {
        let rec = CourseRecord {
            id: "X".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert!(v.get(fields::SUBJECT_NAME_VECTOR).is_none());
    }
}

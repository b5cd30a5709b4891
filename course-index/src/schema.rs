//! Index mapping for course documents.

use serde_json::{Value, json};

/// Dimensionality of the subject-name embedding (MiniLM-class models).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Mapping body for `PUT /{index}`: keyword fields for exact matches, text
/// fields for full-text search and a cosine `dense_vector` for the subject
/// name embedding.
pub fn course_index_mapping(dims: usize) -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "subject_name": {
                    "type": "text",
                    "fields": {
                        "keyword": { "type": "keyword", "ignore_above": 256 }
                    }
                },
                "description": { "type": "text" },
                "critical_requirement": { "type": "keyword" },
                "optional": { "type": "keyword" },
                "minimum_passing_grade": { "type": "keyword" },
                "total_credits": { "type": "keyword" },
                "next_subject_code": { "type": "keyword" },
                "category": { "type": "keyword" },
                "session": { "type": "keyword" },
                "semester": { "type": "keyword" },
                "prior_requirements": { "type": "keyword" },
                "mandatory_priors": { "type": "keyword" },
                "subject_name_vector": {
                    "type": "dense_vector",
                    "dims": dims,
                    "index": true,
                    "similarity": "cosine"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_field_is_cosine_with_requested_dims() {
        let m = course_index_mapping(DEFAULT_EMBEDDING_DIM);
        let v = &m["mappings"]["properties"]["subject_name_vector"];
        assert_eq!(v["dims"], 384);
        assert_eq!(v["similarity"], "cosine");
        assert_eq!(m["mappings"]["properties"]["id"]["type"], "keyword");
    }
}

//! Search seam: anything that can run a [`SearchRequest`] and hand back the
//! stored `_source` documents of the hits, in ranking order.

use ai_llm_service::BoxFuture;
use serde_json::Value;

use crate::{errors::CourseIndexError, query::SearchRequest};

pub trait SearchGateway: Send + Sync {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> BoxFuture<'a, Result<Vec<Value>, CourseIndexError>>;
}

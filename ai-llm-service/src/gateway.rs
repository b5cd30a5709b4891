//! Object-safe seams over the completion and embedding providers.
//!
//! Callers hold `Arc<dyn CompletionGateway>` / `Arc<dyn EmbeddingGateway>`
//! so the advising pipeline can be driven by the real profiles in production
//! and by in-process stubs in tests. No `async-trait`: methods return boxed
//! futures directly.

use std::{future::Future, pin::Pin};

use crate::error_handler::AiLlmError;

/// Boxed, sendable future returned by gateway methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Hosted completion API: a `system` + `user` message pair in, free text out.
pub trait CompletionGateway: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, AiLlmError>>;
}

/// Embedding model used to vectorize text before indexing.
pub trait EmbeddingGateway: Send + Sync {
    fn embed<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>>;
}

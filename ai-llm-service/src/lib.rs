//! Completion and embedding gateways for the course advisor.
//!
//! Public surface:
//! - [`service_profiles::LlmServiceProfiles`]: chat + embedding profiles backed
//!   by OpenAI or Ollama, implementing the [`gateway`] traits.
//! - [`config`]: env-driven profile configs.
//! - [`error_handler`]: unified [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod gateway;
pub mod service_profiles;
pub mod services;

pub use error_handler::AiLlmError;
pub use gateway::{BoxFuture, CompletionGateway, EmbeddingGateway};
pub use service_profiles::LlmServiceProfiles;

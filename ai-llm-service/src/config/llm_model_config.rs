use crate::config::llm_provider::LlmProvider;

/// Configuration for one model invocation profile.
///
/// # Fields
///
/// - `provider`: Which backend to use (Ollama or OpenAI).
/// - `model`: The model identifier (e.g., `"gpt-4o"`, `"all-minilm"`).
/// - `endpoint`: Base URL of the API (without the `/v1/...` path).
/// - `api_key`: Optional API key for providers that require authentication.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness.
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

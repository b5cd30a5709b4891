//! Default model configs loaded strictly from environment variables.
//!
//! Two roles are supported:
//!
//! - **Chat**      → the completion model used for extraction and answers
//! - **Embedding** → the model used to vectorize subject names at index time
//!
//! # Environment variables
//!
//! Chat:
//! - `LLM_KIND`         = `openai` (default) or `ollama`
//! - `OPENAI_API_KEY`   = required for `openai`
//! - `OPENAI_URL`       = base URL (default `https://api.openai.com`)
//! - `OPENAI_MODEL`     = model id (default `gpt-4o`)
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (required for `ollama`)
//! - `OLLAMA_MODEL`     = model id (required for `ollama`)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = request timeout (default 120)
//!
//! Embedding:
//! - `EMBEDDING_KIND`   = `ollama` (default) or `openai`
//! - `EMBEDDING_MODEL`  = model id (default `all-minilm`, 384 dims)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, must_env},
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs the config for the **chat** profile.
///
/// # Defaults
/// - `temperature = Some(0.2)`, extraction must be as stable as possible
/// - `timeout_secs = Some(120)`
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let provider = LlmProvider::parse(&env_or("LLM_KIND", "openai"))?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS));

    let (endpoint, model, api_key) = match provider {
        LlmProvider::OpenAI => (
            env_or("OPENAI_URL", DEFAULT_OPENAI_URL),
            env_or("OPENAI_MODEL", DEFAULT_CHAT_MODEL),
            Some(must_env("OPENAI_API_KEY")?),
        ),
        LlmProvider::Ollama => (ollama_endpoint()?, must_env("OLLAMA_MODEL")?, None),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.2),
        timeout_secs,
    })
}

/// Constructs the config for the **embedding** profile.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = LlmProvider::parse(&env_or("EMBEDDING_KIND", "ollama"))?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    let (endpoint, api_key) = match provider {
        LlmProvider::OpenAI => (
            env_or("OPENAI_URL", DEFAULT_OPENAI_URL),
            Some(must_env("OPENAI_API_KEY")?),
        ),
        LlmProvider::Ollama => (ollama_endpoint()?, None),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        timeout_secs: Some(30),
    })
}

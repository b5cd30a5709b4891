//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+timeout).
//! - Implements [`CompletionGateway`] with the chat profile and
//!   [`EmbeddingGateway`] with the embedding profile.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{CompletionGateway, LlmServiceProfiles};
//! use ai_llm_service::config::default_config::{config_chat, config_embedding};
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::new(config_chat()?, config_embedding()?));
//! let text = svc.complete("You are terse.", "Hello").await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    gateway::{BoxFuture, CompletionGateway, EmbeddingGateway},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service that manages the **chat** and **embedding** profiles.
///
/// Internally, it caches Ollama/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or the request fails.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, AiLlmError> {
        match self.chat.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.chat).await?;
                cli.chat(system, user).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.chat).await?;
                cli.chat(system, user).await
            }
        }
    }

    /// Computes embeddings using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(cli.clone());
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(cli.clone());
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

impl CompletionGateway for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.chat(system, user))
    }
}

impl EmbeddingGateway for LlmServiceProfiles {
    fn embed<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>> {
        Box::pin(LlmServiceProfiles::embed(self, input))
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.2),
            timeout_secs: Some(30),
        }
    }

    #[tokio::test]
    async fn clients_are_cached_per_config() {
        let svc = LlmServiceProfiles::new(ollama("chat"), ollama("all-minilm"));

        let a = svc.get_or_init_ollama(&svc.chat).await.unwrap();
        let b = svc.get_or_init_ollama(&svc.chat).await.unwrap();
        let c = svc.get_or_init_ollama(&svc.embedding).await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(svc.ollama.read().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_openai_profile_surfaces_error() {
        let mut chat = ollama("gpt-4o");
        chat.provider = LlmProvider::OpenAI;
        let svc = LlmServiceProfiles::new(chat, ollama("all-minilm"));

        let err = svc.chat("s", "u").await.unwrap_err();
        assert!(matches!(err, AiLlmError::Provider(_)));
    }
}

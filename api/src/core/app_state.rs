use std::sync::Arc;

use advisor::{Advisor, AdvisorConfig};
use ai_llm_service::{
    AiLlmError, LlmServiceProfiles,
    config::default_config::{config_chat, config_embedding},
};
use course_index::{CourseIndex, config::IndexConfig, errors::CourseIndexError};
use thiserror::Error;
use tracing::info;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LLM configuration: {0}")]
    Llm(#[from] AiLlmError),

    #[error("course index: {0}")]
    Index(#[from] CourseIndexError),
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
}

impl AppState {
    pub fn new(advisor: Advisor) -> Self {
        Self { advisor }
    }

    /// Builds the LLM profiles, connects (and optionally rebuilds) the course
    /// index and assembles the advisor, all from environment variables.
    pub async fn from_env() -> Result<Self, ConfigError> {
        let profiles = Arc::new(LlmServiceProfiles::new(config_chat()?, config_embedding()?));
        info!(
            chat = %profiles.profiles().0.model,
            embedding = %profiles.profiles().1.model,
            "LLM profiles ready"
        );

        let index_cfg = IndexConfig::from_env()?;
        let index = CourseIndex::from_config(&index_cfg, profiles.as_ref()).await?;

        let advisor_cfg = AdvisorConfig::from_env();
        info!(?advisor_cfg, "advisor ready");
        Ok(Self::new(Advisor::new(profiles, index, &advisor_cfg)))
    }
}

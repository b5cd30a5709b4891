use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for completions or embeddings.
///
/// Adding more providers in the future can be done by extending this enum
/// and the dispatch in [`crate::service_profiles::LlmServiceProfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI-compatible REST API.
    OpenAI,
}

impl LlmProvider {
    /// Parses `LLM_KIND` / `EMBEDDING_KIND` values (case-insensitive).
    pub fn parse(kind: &str) -> Result<Self, ConfigError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAI);
        assert_eq!(LlmProvider::parse(" ollama ").unwrap(), LlmProvider::Ollama);
        assert!(LlmProvider::parse("bard").is_err());
    }
}

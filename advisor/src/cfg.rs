//! Runtime configuration loaded from environment variables.

/// Advisor knobs. All fields have defaults via [`AdvisorConfig::from_env`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// Max entries kept by the context accumulator (oldest evicted first).
    pub context_capacity: usize,
    /// Character budget for the context block embedded in prompts.
    pub max_context_chars: usize,
    /// Max background enrichment tasks in flight.
    pub max_background: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            context_capacity: 32,
            max_context_chars: 24_000,
            max_background: 4,
        }
    }
}

impl AdvisorConfig {
    /// Build from `ADVISOR_CONTEXT_CAPACITY`, `ADVISOR_MAX_CONTEXT_CHARS` and
    /// `ADVISOR_MAX_BACKGROUND`. Unset or unparsable values fall back to the
    /// defaults; zero is raised to one.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            context_capacity: parse("ADVISOR_CONTEXT_CAPACITY", d.context_capacity).max(1),
            max_context_chars: parse("ADVISOR_MAX_CONTEXT_CHARS", d.max_context_chars).max(1),
            max_background: parse("ADVISOR_MAX_BACKGROUND", d.max_background).max(1),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

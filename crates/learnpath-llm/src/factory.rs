//! Provider construction from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::llm::{
    ClaudeProvider, DEFAULT_CLAUDE_MODEL, DEFAULT_GEMINI_MODEL, GeminiProvider, LlmProvider,
    RetryWrapper,
};
use crate::{Error, Result};

/// Which LLM backend to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini.
    #[default]
    Gemini,
    /// Anthropic Claude.
    Claude,
    /// No provider; LLM features are unavailable.
    None,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Claude => Some("ANTHROPIC_API_KEY"),
            Self::None => None,
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some(DEFAULT_GEMINI_MODEL),
            Self::Claude => Some(DEFAULT_CLAUDE_MODEL),
            Self::None => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::None => "none",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            "none" | "off" | "disabled" | "" => Ok(Self::None),
            other => Err(Error::config(format!("unknown LLM provider: {other}"))),
        }
    }
}

/// Settings needed to build a provider.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    /// Backend.
    pub kind: ProviderKind,
    /// Model ID; the backend default when unset.
    pub model: Option<String>,
    /// API key; read from the backend's environment variable when unset.
    pub api_key: Option<String>,
    /// Attempts per call, the first included.
    pub max_attempts: u32,
}

impl ProviderSettings {
    /// Settings for `kind` with defaults for everything else.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: None,
            api_key: None,
            max_attempts: 3,
        }
    }
}

/// Build the configured provider, wrapped in retries.
///
/// Returns `Ok(None)` for [`ProviderKind::None`].
///
/// # Errors
///
/// Returns [`Error::Config`] when no API key is configured or exported.
pub fn build_provider(settings: &ProviderSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    build_provider_with_env(settings, |name| std::env::var(name).ok())
}

fn build_provider_with_env(
    settings: &ProviderSettings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Option<Arc<dyn LlmProvider>>> {
    let (Some(env_var), Some(default_model)) =
        (settings.kind.api_key_env(), settings.kind.default_model())
    else {
        return Ok(None);
    };

    let api_key = settings
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env(env_var).filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            Error::config(format!(
                "no API key for {}: set llm.api_key or {env_var}",
                settings.kind
            ))
        })?;

    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| default_model.to_string());

    let inner: Arc<dyn LlmProvider> = match settings.kind {
        ProviderKind::Claude => Arc::new(ClaudeProvider::new(api_key, &model)),
        _ => Arc::new(GeminiProvider::new(api_key, &model)),
    };

    tracing::info!(provider = %settings.kind, %model, "LLM provider ready");
    Ok(Some(Arc::new(
        RetryWrapper::new(inner).with_max_attempts(settings.max_attempts),
    )))
}

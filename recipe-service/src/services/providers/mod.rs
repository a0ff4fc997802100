//! AI provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for text generation,
//! allowing the Gemini backend to be swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use crate::config::GeminiSettings;
use async_trait::async_trait;
use gemini::{GeminiConfig, GeminiTextProvider};
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

/// Message returned to callers while no model client is configured.
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "AI model not initialized";

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for the `error_type` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::GenerationFailed(anyhow::Error::new(err))
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response for `prompt`. The text is returned verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Model identifier the provider calls.
    fn model(&self) -> &str;
}

/// Process-lifetime state of the model client.
///
/// Built once at start-up. A missing API key, or a client that cannot be
/// constructed, yields `Unavailable` instead of failing start-up.
#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn TextProvider>),
    Unavailable(String),
}

impl ModelHandle {
    /// Build the Gemini-backed handle from configuration.
    pub fn from_settings(settings: &GeminiSettings) -> Self {
        let Some(api_key) = settings.api_key() else {
            tracing::warn!("GEMINI_API_KEY not set - recipe transformation is disabled");
            return ModelHandle::Unavailable("GEMINI_API_KEY is not set".to_string());
        };

        let config = GeminiConfig {
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
        };

        match GeminiTextProvider::new(config) {
            Ok(provider) => {
                tracing::info!(model = %settings.model, "Initialized Gemini text provider");
                ModelHandle::Ready(Arc::new(provider))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize Gemini text provider");
                ModelHandle::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }

    /// The provider, or a 503 application error when unavailable.
    pub fn provider(&self) -> Result<&Arc<dyn TextProvider>, AppError> {
        match self {
            ModelHandle::Ready(provider) => Ok(provider),
            ModelHandle::Unavailable(reason) => {
                tracing::warn!(reason = %reason, "Model requested while unavailable");
                Err(AppError::ServiceUnavailable(
                    MODEL_UNAVAILABLE_MESSAGE.to_string(),
                ))
            }
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Ready(provider) => f
                .debug_struct("Ready")
                .field("provider", &provider.name())
                .field("model", &provider.model())
                .finish(),
            ModelHandle::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

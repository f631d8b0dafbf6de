//! Pluggable AI fallback classifier
//!
//! Last tier of the resolution pipeline: merchants nothing else recognizes
//! are sent to an external model. The response is free text and treated as
//! untrusted; the resolver revalidates it against the category taxonomy.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the classifier interface
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (absence is a valid state: the resolver
//!   degrades to "Others" instead of calling out)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)

mod gemini;
mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for AI fallback backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Classify a merchant token into a spending category.
    ///
    /// Returns the model's raw free-text response; callers must revalidate
    /// it against the taxonomy before trusting it.
    async fn classify(&self, merchant: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini API over HTTP
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None when `GEMINI_API_KEY` is not set; a missing credential is
    /// not an error, it just disables the AI tier.
    pub fn from_env() -> Option<Self> {
        GeminiBackend::from_env().map(AIClient::Gemini)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn classify(&self, merchant: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.classify(merchant).await,
            AIClient::Mock(b) => b.classify(merchant).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

//! Mock backend for testing
//!
//! Configurable canned responses for the classifier, so resolver tests run
//! without a network or an API key.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// Mock AI backend for testing
///
/// By default answers with a category guess for a few well-known merchants
/// and "Others" for everything else. Tests can pin a fixed reply or force
/// the call to fail.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Fixed reply returned for every classify call, when set
    pub reply: Option<String>,
    /// Whether classify calls should fail
    pub failing: bool,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            reply: None,
            failing: false,
            healthy: true,
        }
    }

    /// Mock that answers every classify call with the given text
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            failing: false,
            healthy: true,
        }
    }

    /// Mock whose classify calls always fail
    pub fn failing() -> Self {
        Self {
            reply: None,
            failing: true,
            healthy: false,
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn classify(&self, merchant: &str) -> Result<String> {
        if self.failing {
            return Err(Error::InvalidData("mock classifier failure".into()));
        }

        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        let lower = merchant.to_lowercase();
        let category = if lower.contains("netflix") || lower.contains("hotstar") {
            "Entertainment"
        } else if lower.contains("swiggy") || lower.contains("zomato") {
            "Food"
        } else if lower.contains("uber") || lower.contains("ola") {
            "Transport"
        } else if lower.contains("apollo") {
            "Healthcare"
        } else {
            "Others"
        };

        Ok(category.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reply() {
        let mock = MockBackend::with_reply("The category is Travel.");
        assert_eq!(mock.classify("indigo").await.unwrap(), "The category is Travel.");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing();
        assert!(mock.classify("anything").await.is_err());
        assert!(!mock.health_check().await);
    }
}

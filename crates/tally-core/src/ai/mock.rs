//! Mock backend for testing
//!
//! Returns a configurable canned response, so the field extractor and the
//! pipeline can be exercised without a running LLM server.

use async_trait::async_trait;

use crate::error::Result;

use super::TextGenBackend;

/// Mock text-generation backend
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    response: String,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock that answers with an empty raw field map
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: "{}".to_string(),
        }
    }

    /// Create a mock that answers with the given text
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            healthy: true,
            response: response.into(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            response: "{}".to_string(),
        }
    }
}

#[async_trait]
impl TextGenBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
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
    async fn test_mock_returns_canned_response() {
        let backend = MockBackend::with_response("hello");
        assert_eq!(backend.generate("prompt").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_unhealthy_mock() {
        let backend = MockBackend::unhealthy();
        assert!(!backend.health_check().await);
    }
}

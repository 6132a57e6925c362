//! Mock completion model for tests
//!
//! Returns queued responses in order, or an injected error, without any
//! network traffic. Lives outside `#[cfg(test)]` so integration tests can
//! use it too.

use crate::completion::{ChatMessage, CompletionError, CompletionModel};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A scripted stand-in for the completion collaborator
#[derive(Clone, Default)]
pub struct MockCompletionModel {
    responses: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockCompletionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text response.
    pub async fn push_response(&self, text: &str) {
        self.responses
            .lock()
            .await
            .push_back(Ok(text.to_string()));
    }

    /// Queues a failure.
    pub async fn push_error(&self, error: CompletionError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Messages received so far, one entry per call.
    pub async fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, CompletionError> {
        self.requests.lock().await.push(messages.to_vec());

        match self.responses.lock().await.pop_front() {
            Some(result) => result,
            // An unscripted call behaves like an empty model answer
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_returned_in_order() {
        let mock = MockCompletionModel::new();
        mock.push_response("first").await;
        mock.push_response("second").await;

        let a = mock.complete(&[ChatMessage::user("x")], 0.0).await.unwrap();
        let b = mock.complete(&[ChatMessage::user("y")], 0.0).await.unwrap();
        assert_eq!(a, "first");
        assert_eq!(b, "second");
        assert_eq!(mock.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_injected_error_surfaces() {
        let mock = MockCompletionModel::new();
        mock.push_error(CompletionError::Network("down".to_string()))
            .await;

        let result = mock.complete(&[ChatMessage::user("x")], 0.0).await;
        assert!(matches!(result.unwrap_err(), CompletionError::Network(_)));
    }
}

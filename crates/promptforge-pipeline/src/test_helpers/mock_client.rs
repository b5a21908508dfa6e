//! Scripted completion client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use promptforge_gateway::{CompletionClient, ContentPart, GatewayError};

/// Returns queued responses in order; an exhausted queue yields
/// `EmptyCompletion`. Counts calls so tests can assert the gateway was (or
/// was not) reached.
#[derive(Default)]
pub struct MockCompletionClient {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: AtomicUsize,
    last_parts: Mutex<Option<Vec<ContentPart>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: String) -> Self {
        let client = Self::default();
        client.push(Ok(text));
        client
    }

    pub fn with_error(error: GatewayError) -> Self {
        let client = Self::default();
        client.push(Err(error));
        client
    }

    pub fn push(&self, response: Result<String, GatewayError>) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The content parts of the most recent call.
    pub fn last_parts(&self) -> Option<Vec<ContentPart>> {
        self.last_parts
            .lock()
            .expect("last_parts lock poisoned")
            .clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, parts: Vec<ContentPart>) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_parts.lock().expect("last_parts lock poisoned") = Some(parts);
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyCompletion))
    }
}

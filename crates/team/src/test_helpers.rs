//! Shared test helpers for agent and dispatch tests.

use roundtable_core::backend::{
    Completion, CompletionBackend, CompletionRequest, ToolCallRequest, Usage,
};
use roundtable_core::error::BackendError;
use std::sync::Mutex;

/// A mock backend that returns a sequence of scripted completions.
///
/// Each call to `complete` returns the next completion in the queue and
/// records the request it was given. Panics if more calls are made than
/// completions provided.
pub struct SequentialMockBackend {
    completions: Mutex<Vec<Completion>>,
    requests: Mutex<Vec<CompletionRequest>>,
    call_count: Mutex<usize>,
}

impl SequentialMockBackend {
    pub fn new(completions: Vec<Completion>) -> Self {
        Self {
            completions: Mutex::new(completions),
            requests: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The requests seen so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionBackend for SequentialMockBackend {
    fn name(&self) -> &str {
        "sequential-mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        self.requests.lock().unwrap().push(request);

        let mut count = self.call_count.lock().unwrap();
        let completions = self.completions.lock().unwrap();

        if *count >= completions.len() {
            panic!(
                "SequentialMockBackend: no more completions (call #{}, have {})",
                *count,
                completions.len()
            );
        }

        let completion = completions[*count].clone();
        *count += 1;
        Ok(completion)
    }
}

/// A backend whose every call fails with a network error.
pub struct FailingBackend;

#[async_trait::async_trait]
impl CompletionBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing-mock"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, BackendError> {
        Err(BackendError::Network("connection refused".into()))
    }
}

/// Create a plain text completion (no tool calls).
pub fn text_completion(text: &str) -> Completion {
    Completion {
        content: text.into(),
        tool_calls: vec![],
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Create a completion that directs tool calls.
pub fn tool_call_completion(tool_calls: Vec<ToolCallRequest>) -> Completion {
    Completion {
        content: String::new(),
        tool_calls,
        usage: None,
    }
}

/// Helper to create a tool call request.
pub fn tool_call(name: &str, arguments: serde_json::Value) -> ToolCallRequest {
    ToolCallRequest {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments,
    }
}

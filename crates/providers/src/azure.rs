//! Azure OpenAI chat-completions backend.
//!
//! Requests are addressed to a deployment:
//! `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
//! with an `api-key` header. Tool use / function calling is supported.

use async_trait::async_trait;
use roundtable_core::backend::{
    Completion, CompletionBackend, CompletionRequest, PromptMessage, PromptRole, ToolCallRequest,
    ToolDefinition, Usage,
};
use roundtable_core::error::BackendError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A completion backend speaking the Azure OpenAI chat-completions dialect.
pub struct AzureChatBackend {
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    model: String,
    client: reqwest::Client,
}

impl AzureChatBackend {
    /// Create a new backend bound to one deployment.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
            model: model.into(),
            client,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, self.deployment
        )
    }

    /// Convert prompt messages to the wire format.
    fn to_api_messages(messages: &[PromptMessage]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    PromptRole::System => "system".into(),
                    PromptRole::User => "user".into(),
                    PromptRole::Assistant => "assistant".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: None,
            })
            .collect()
    }

    /// Convert tool definitions to the wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    /// Parse a tool call's argument string into a JSON object. The wire
    /// carries arguments as a string; an empty string means no arguments.
    fn parse_arguments(raw: &str) -> Result<serde_json::Value, BackendError> {
        if raw.trim().is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_str(raw).map_err(|e| {
            BackendError::MalformedResponse(format!("Unparseable tool arguments: {e}"))
        })
    }
}

#[async_trait]
impl CompletionBackend for AzureChatBackend {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        let url = self.completions_url();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(
            backend = %self.name(),
            deployment = %self.deployment,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout(e.to_string())
                } else {
                    BackendError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(BackendError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(BackendError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Backend returned error");
            return Err(BackendError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            BackendError::MalformedResponse("No choices in response".into())
        })?;

        let mut tool_calls = Vec::new();
        for tc in choice.message.tool_calls.unwrap_or_default() {
            tool_calls.push(ToolCallRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: Self::parse_arguments(&tc.function.arguments)?,
            });
        }

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

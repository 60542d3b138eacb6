// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completions request/response types, reduced to the tool-call subset
//! this adapter uses.

use serde::{Deserialize, Serialize};

/// A chat-completions request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "gpt-4o").
    pub model: String,

    /// Deterministic sampling seed; fixed at 0 for reproducible output.
    pub seed: i64,

    /// System + user messages.
    pub messages: Vec<ChatMessage>,

    /// Declared tools; exactly one for this adapter.
    pub tools: Vec<ToolParam>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role: "system" or "user".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A tool declaration in the request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolParam {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function definition.
    pub function: FunctionDef,
}

/// A function definition with its JSON-Schema parameters.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A chat-completions response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Model that served the request.
    pub model: String,
    /// Reply choices; the adapter reads the first.
    pub choices: Vec<Choice>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
}

/// One reply choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The assistant message within a choice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChoiceMessage {
    pub tool_calls: Vec<ToolCall>,
}

/// A structured function invocation in the reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

/// The invoked function name plus its JSON-encoded arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

/// API error envelope (non-2xx responses).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_tool_declaration() {
        let req = ChatRequest {
            model: "gpt-4o".into(),
            seed: 0,
            messages: vec![ChatMessage {
                role: "system".into(),
                content: "prompt".into(),
            }],
            tools: vec![ToolParam {
                tool_type: "function".into(),
                function: FunctionDef {
                    name: "emit_structured_standup".into(),
                    description: "Return the final standup payload.".into(),
                    parameters: serde_json::json!({"type": "object"}),
                },
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["seed"], 0);
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "emit_structured_standup");
    }

    #[test]
    fn response_with_tool_call_deserializes() {
        let json = r#"{
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "emit_structured_standup", "arguments": "{\"repo\":\"a/b\"}"}
                    }]
                }
            }],
            "usage": {"prompt_tokens": 100, "completion_tokens": 40, "total_tokens": 140}
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices.len(), 1);
        let call = &resp.choices[0].message.tool_calls[0];
        assert_eq!(call.function.name, "emit_structured_standup");
        assert_eq!(resp.usage.total_tokens, 140);
    }

    #[test]
    fn response_without_tool_calls_defaults_empty() {
        let json = r#"{
            "model": "gpt-4o",
            "choices": [{"message": {"content": "plain text"}}]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.choices[0].message.tool_calls.is_empty());
        assert_eq!(resp.usage.prompt_tokens, 0);
    }
}

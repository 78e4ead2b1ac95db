// SPDX-License-Identifier: MIT

//! Message model - atomic content units with request/response linkage
//!
//! A message with a non-empty `tool_calls` list is itself a request for
//! tool invocations; a message with a non-empty `tool_call_id` answers
//! a prior request. A plain content message is neither.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One requested tool invocation embedded in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier the matching response message must echo back
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A message in the workflow, owned by the event that carries it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Non-empty when this message responds to a prior tool call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Ordered tool invocations this message requests
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// An assistant message requesting the given tool invocations
    pub fn tool_request(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_call_id: None,
            tool_calls,
        }
    }

    /// A tool message answering the request identified by `tool_call_id`
    pub fn tool_response(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: Vec::new(),
        }
    }

    /// True when this message requests at least one tool invocation
    pub fn is_tool_request(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// True when this message answers a prior tool call
    pub fn is_tool_response(&self) -> bool {
        self.tool_call_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Capability descriptor advertised by a command: name plus the JSON
/// schema of the invocation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

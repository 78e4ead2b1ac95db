// SPDX-License-Identifier: MIT

//! Execution context - correlation handle for a single request lifecycle

use serde::{Deserialize, Serialize};

/// Opaque correlation handle threaded through a request's lifecycle.
///
/// The core never mutates a context; it only reads the assistant
/// request id when flattening audit events. Construction policy
/// (where the ids come from) belongs to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    conversation_id: String,
    execution_id: String,
    assistant_request_id: String,
}

impl ExecutionContext {
    pub fn new(
        conversation_id: impl Into<String>,
        execution_id: impl Into<String>,
        assistant_request_id: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            execution_id: execution_id.into(),
            assistant_request_id: assistant_request_id.into(),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// The correlation id surfaced by flattened audit events
    pub fn assistant_request_id(&self) -> &str {
        &self.assistant_request_id
    }

    /// A context is usable for audit records only when it carries a
    /// request id to correlate them under
    pub fn is_valid(&self) -> bool {
        !self.assistant_request_id.is_empty()
    }
}

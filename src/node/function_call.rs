// SPDX-License-Identifier: MIT

//! Function-call node - forwards pending tool-call requests to a command

use std::collections::HashSet;
use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_stream::StreamExt;

use crate::command::{Command, MessageStream};
use crate::error::PlexusError;
use crate::events::ConsumeFromTopicEvent;
use crate::model::{ExecutionContext, FunctionSpec, Message};
use crate::node::{Node, SpanKind};

/// Reduce a batch to the tool-call requests still awaiting an answer.
///
/// The batch payloads are flattened in order, the `tool_call_id`
/// values of the response messages are collected, and every request
/// message whose first tool call is unanswered within the batch is
/// kept in its original relative order.
///
/// Suppression consults only the *first* tool call's id even when a
/// message requests several; the message is kept or dropped as a unit
/// on that id alone. Only responses in the same batch count -
/// redelivery across batches is not deduplicated.
pub fn pending_tool_calls(input: &[ConsumeFromTopicEvent]) -> Vec<Message> {
    let flattened: Vec<&Message> = input
        .iter()
        .flat_map(ConsumeFromTopicEvent::messages)
        .collect();

    let answered: HashSet<&str> = flattened
        .iter()
        .copied()
        .filter_map(|message| message.tool_call_id.as_deref())
        .filter(|id| !id.is_empty())
        .collect();

    flattened
        .into_iter()
        .filter(|message| {
            message
                .tool_calls
                .first()
                .is_some_and(|call| !answered.contains(call.id.as_str()))
        })
        .cloned()
        .collect()
}

/// Node that executes the pending tool calls of its input through an
/// attached command. The command decides what to call and how; this
/// node only selects the requests and carries the results back.
pub struct FunctionCallNode {
    name: String,
    command: Arc<dyn Command>,
}

impl std::fmt::Debug for FunctionCallNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCallNode")
            .field("name", &self.name)
            .finish()
    }
}

impl FunctionCallNode {
    /// Create a node over the given command. The name identifies the
    /// node in audit snapshots and must be non-empty.
    pub fn new(name: impl Into<String>, command: Arc<dyn Command>) -> Result<Self, PlexusError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PlexusError::construction("node name must not be empty"));
        }
        Ok(Self { name, command })
    }
}

#[async_trait]
impl Node for FunctionCallNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext,
        input: &[ConsumeFromTopicEvent],
    ) -> Result<Vec<Message>, PlexusError> {
        let mut output = Vec::new();
        for request in pending_tool_calls(input) {
            let results = self.command.execute(ctx, &request).await?;
            output.extend(results);
        }
        Ok(output)
    }

    fn stream_execute(
        &self,
        ctx: &ExecutionContext,
        input: Vec<ConsumeFromTopicEvent>,
    ) -> MessageStream {
        let pending = pending_tool_calls(&input);
        let ctx = ctx.clone();
        let name = self.name.clone();
        let command = Arc::clone(&self.command);

        Box::pin(stream! {
            for request in pending {
                let mut results = command.stream_execute(ctx.clone(), request);
                while let Some(item) = results.next().await {
                    match item {
                        Ok(message) => yield Ok(message),
                        Err(err) => {
                            log::error!("node {} command stream failed: {}", name, err);
                            yield Err(err);
                            return;
                        }
                    }
                }
            }
        })
    }

    fn function_specs(&self) -> Vec<FunctionSpec> {
        self.command.function_specs()
    }

    fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "type": "FunctionCallNode",
            "span_kind": SpanKind::Chain.as_str(),
            "command": self.command.function_specs(),
        })
    }
}

// SPDX-License-Identifier: MIT

//! Node module - the execution contract over topic-delivered batches
//!
//! A node consumes an ordered batch of consume-from-topic events,
//! reduces it to the tool-call requests still awaiting an answer and
//! forwards each one to its command. Every node offers both execution
//! modes: fully materialized ([Node::execute]) and incremental
//! ([Node::stream_execute]). When the command's blocking and streaming
//! forms agree on order, the two modes produce the same messages in
//! the same order.

mod function_call;
mod recorder;

pub use function_call::{pending_tool_calls, FunctionCallNode};
pub use recorder::{record_execution, record_stream_execution, EventSink};

use async_trait::async_trait;
use serde_json::Value;

use crate::command::MessageStream;
use crate::error::PlexusError;
use crate::events::ConsumeFromTopicEvent;
use crate::model::{ExecutionContext, FunctionSpec, Message};

/// Closed set of trace span categories a node reports in its
/// [describe] snapshot
///
/// [describe]: Node::describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Agent,
    Chain,
    Llm,
    Tool,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Agent => "AGENT",
            SpanKind::Chain => "CHAIN",
            SpanKind::Llm => "LLM",
            SpanKind::Tool => "TOOL",
        }
    }
}

/// Contract every node variant satisfies.
///
/// A node holds no mutable state beyond its immutable command
/// reference; it is reentrant and may be invoked from multiple
/// concurrent contexts with independent execution contexts. Timeouts,
/// retries and audit recording belong to the caller (see [recorder]
/// for the audit wrappers).
///
/// [recorder]: record_execution
#[async_trait]
pub trait Node: Send + Sync {
    /// Node name used in audit snapshots
    fn name(&self) -> &str;

    /// Blocking mode. Runs the pending requests strictly in order on
    /// the caller's task and returns the concatenation of the
    /// command's result sequences. A command error propagates
    /// unchanged and aborts the remaining requests; the caller sees
    /// zero output.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        input: &[ConsumeFromTopicEvent],
    ) -> Result<Vec<Message>, PlexusError>;

    /// Streaming mode. Same pending requests in the same order, but
    /// each command item is re-emitted to the caller as soon as it is
    /// produced: no buffering, no reordering, no internal fan-out. A
    /// command error is logged once and re-raised, terminating the
    /// sequence; items already emitted stand. Dropping the stream
    /// mid-flight discards the remaining requests with no
    /// compensation.
    fn stream_execute(
        &self,
        ctx: &ExecutionContext,
        input: Vec<ConsumeFromTopicEvent>,
    ) -> MessageStream;

    /// Ordered invocation descriptors advertised by the attached
    /// command
    fn function_specs(&self) -> Vec<FunctionSpec>;

    /// One-way serialization used for audit snapshots. No inverse
    /// constructor exists at this layer.
    fn describe(&self) -> Value;
}

// SPDX-License-Identifier: MIT

//! Audit recording - lifecycle events around node execution
//!
//! Recording is explicit wrapper composition, never hidden control
//! flow: the node operations stay directly callable, and the wrappers
//! return results unchanged - values, ordering and errors all intact.

use std::sync::Arc;

use async_stream::stream;
use tokio_stream::StreamExt;

use crate::command::MessageStream;
use crate::error::PlexusError;
use crate::events::{ConsumeFromTopicEvent, EventRecord, EventType};
use crate::model::{ExecutionContext, Message};
use crate::node::Node;

/// Destination for lifecycle audit records. Retention and storage
/// policy belong to the implementation behind it; the core hands a
/// record over and forgets it.
pub trait EventSink: Send + Sync {
    fn record(&self, event: EventRecord);
}

/// Run [Node::execute] with lifecycle records emitted around it:
/// NodeInvoke before, then NodeRespond on success or NodeFailed on
/// error. The inner result passes through unchanged.
pub async fn record_execution(
    node: &dyn Node,
    sink: &dyn EventSink,
    ctx: &ExecutionContext,
    input: &[ConsumeFromTopicEvent],
) -> Result<Vec<Message>, PlexusError> {
    sink.record(EventRecord::new(ctx.clone(), EventType::NodeInvoke)?);

    match node.execute(ctx, input).await {
        Ok(messages) => {
            sink.record(EventRecord::new(ctx.clone(), EventType::NodeRespond)?);
            Ok(messages)
        }
        Err(err) => {
            // the invoke record already validated this context
            if let Ok(record) = EventRecord::new(ctx.clone(), EventType::NodeFailed) {
                sink.record(record);
            }
            Err(err)
        }
    }
}

/// Run [Node::stream_execute] with lifecycle records around it: a
/// NodeInvoke emitted eagerly before the stream is handed back, a
/// NodeRespond after a clean finish, a NodeFailed at the failing
/// item. Every item passes through untouched, in order.
pub fn record_stream_execution(
    node: &dyn Node,
    sink: Arc<dyn EventSink>,
    ctx: &ExecutionContext,
    input: Vec<ConsumeFromTopicEvent>,
) -> MessageStream {
    match EventRecord::new(ctx.clone(), EventType::NodeInvoke) {
        Ok(record) => sink.record(record),
        Err(err) => return Box::pin(tokio_stream::once(Err(err))),
    }

    let mut inner = node.stream_execute(ctx, input);
    let ctx = ctx.clone();

    Box::pin(stream! {
        while let Some(item) = inner.next().await {
            match item {
                Ok(message) => yield Ok(message),
                Err(err) => {
                    // the invoke record already validated this context
                    if let Ok(record) = EventRecord::new(ctx.clone(), EventType::NodeFailed) {
                        sink.record(record);
                    }
                    yield Err(err);
                    return;
                }
            }
        }

        if let Ok(record) = EventRecord::new(ctx.clone(), EventType::NodeRespond) {
            sink.record(record);
        }
    })
}

use crate::error::PlexusError;
use crate::model::{ExecutionContext, FunctionSpec, Message};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Finite, forward-only sequence of messages. Single traversal only:
/// dropping it mid-flight cancels whatever work remains behind it, and
/// items already yielded stand.
pub type MessageStream = BoxStream<'static, Result<Message, PlexusError>>;

/// Trait for the capability a node delegates tool execution to.
///
/// A node consumes exactly these three operations and never inspects
/// the implementation behind them. Deciding what function to call and
/// how to call it is entirely the command's business.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute one tool-call request, fully materialized. The result
    /// sequence may be empty.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        message: &Message,
    ) -> Result<Vec<Message>, PlexusError>;

    /// Execute one tool-call request incrementally. Items are produced
    /// lazily as the caller pulls them.
    fn stream_execute(&self, ctx: ExecutionContext, message: Message) -> MessageStream;

    /// Ordered capability descriptors this command advertises
    fn function_specs(&self) -> Vec<FunctionSpec>;
}

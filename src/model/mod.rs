// SPDX-License-Identifier: MIT

//! Model module - the value types flowing through a workflow
//!
//! This module provides the correlation handle and the message model:
//! - [context] - opaque execution context threaded through a request
//! - [message] - messages, tool-call requests and capability specs

mod context;
mod message;

pub use context::ExecutionContext;
pub use message::{FunctionSpec, Message, ToolCall};

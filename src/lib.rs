// SPDX-License-Identifier: MIT

//! plexus-rs - execution core for agent workflows
//!
//! This crate provides the pieces a workflow runtime is built from:
//! - [model] - execution context, messages and tool-call requests
//! - [events] - immutable audit events with a closed type taxonomy
//! - [command] - the delegate boundary a node forwards work to
//! - [node] - the node execution contract (blocking and streaming)
//!
//! Topic transport, event persistence and the command implementations
//! themselves live outside this crate and are reached through traits.

pub mod command;
pub mod error;
pub mod events;
pub mod model;
pub mod node;

pub use error::PlexusError;

// SPDX-License-Identifier: MIT

//! Event module - immutable audit records with a closed type taxonomy
//!
//! Every occurrence in a workflow run is captured as an [EventRecord]
//! carrying a generated id, the execution context it belongs to, a tag
//! from the closed [EventType] set and a UTC timestamp. Records are
//! created once and never mutated; retention belongs to an external
//! store. Concrete event shapes are in [topic].

mod topic;

pub use topic::{ConsumeFromTopicEvent, PublishToTopicEvent, TopicPayload};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::PlexusError;
use crate::model::ExecutionContext;

/// Closed set of event tags. Lifecycle tags cross the subject
/// (node, tool, workflow, assistant) with the phase (invoke, respond,
/// failed); the remaining tags mark topic traffic. Unknown tags are
/// rejected at every serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    NodeInvoke,
    NodeRespond,
    NodeFailed,
    ToolInvoke,
    ToolRespond,
    ToolFailed,
    WorkflowInvoke,
    WorkflowRespond,
    WorkflowFailed,
    AssistantInvoke,
    AssistantRespond,
    AssistantFailed,
    TopicEvent,
    StreamTopicEvent,
    PublishToTopic,
    ConsumeFromTopic,
    OutputTopic,
}

impl EventType {
    /// The string tag used on every serialization surface
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NodeInvoke => "NodeInvoke",
            EventType::NodeRespond => "NodeRespond",
            EventType::NodeFailed => "NodeFailed",
            EventType::ToolInvoke => "ToolInvoke",
            EventType::ToolRespond => "ToolRespond",
            EventType::ToolFailed => "ToolFailed",
            EventType::WorkflowInvoke => "WorkflowInvoke",
            EventType::WorkflowRespond => "WorkflowRespond",
            EventType::WorkflowFailed => "WorkflowFailed",
            EventType::AssistantInvoke => "AssistantInvoke",
            EventType::AssistantRespond => "AssistantRespond",
            EventType::AssistantFailed => "AssistantFailed",
            EventType::TopicEvent => "TopicEvent",
            EventType::StreamTopicEvent => "StreamTopicEvent",
            EventType::PublishToTopic => "PublishToTopic",
            EventType::ConsumeFromTopic => "ConsumeFromTopic",
            EventType::OutputTopic => "OutputTopic",
        }
    }

    /// Parse a string tag, rejecting anything outside the closed set
    pub fn from_tag(tag: &str) -> Result<Self, PlexusError> {
        match tag {
            "NodeInvoke" => Ok(EventType::NodeInvoke),
            "NodeRespond" => Ok(EventType::NodeRespond),
            "NodeFailed" => Ok(EventType::NodeFailed),
            "ToolInvoke" => Ok(EventType::ToolInvoke),
            "ToolRespond" => Ok(EventType::ToolRespond),
            "ToolFailed" => Ok(EventType::ToolFailed),
            "WorkflowInvoke" => Ok(EventType::WorkflowInvoke),
            "WorkflowRespond" => Ok(EventType::WorkflowRespond),
            "WorkflowFailed" => Ok(EventType::WorkflowFailed),
            "AssistantInvoke" => Ok(EventType::AssistantInvoke),
            "AssistantRespond" => Ok(EventType::AssistantRespond),
            "AssistantFailed" => Ok(EventType::AssistantFailed),
            "TopicEvent" => Ok(EventType::TopicEvent),
            "StreamTopicEvent" => Ok(EventType::StreamTopicEvent),
            "PublishToTopic" => Ok(EventType::PublishToTopic),
            "ConsumeFromTopic" => Ok(EventType::ConsumeFromTopic),
            "OutputTopic" => Ok(EventType::OutputTopic),
            other => Err(PlexusError::deserialization(format!(
                "unknown event type tag: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier of an event record, generated at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable audit entry describing one occurrence during a run.
///
/// Timestamps come from the wall clock at creation and are not
/// guaranteed monotonic across concurrently created records.
#[derive(Debug, Clone)]
pub struct EventRecord {
    id: EventId,
    execution_context: ExecutionContext,
    event_type: EventType,
    timestamp: DateTime<Utc>,
}

impl EventRecord {
    /// Create a record with a fresh id and the current UTC instant.
    ///
    /// Fails with a construction error when the context carries no
    /// request id to correlate the record under.
    pub fn new(
        execution_context: ExecutionContext,
        event_type: EventType,
    ) -> Result<Self, PlexusError> {
        Self::from_parts(EventId::new(), execution_context, event_type, Utc::now())
    }

    /// Rebuild a record from already-known parts. Used by concrete
    /// event types when reconstructing from their serialized form.
    pub fn from_parts(
        id: EventId,
        execution_context: ExecutionContext,
        event_type: EventType,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, PlexusError> {
        if !execution_context.is_valid() {
            return Err(PlexusError::construction(
                "execution context has no assistant request id",
            ));
        }
        Ok(Self {
            id,
            execution_context,
            event_type,
            timestamp,
        })
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn execution_context(&self) -> &ExecutionContext {
        &self.execution_context
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Lossy summary of the record: id, the correlation id from the
    /// execution context, the type tag and an RFC 3339 timestamp.
    /// Type-specific payload is dropped; a base record cannot be
    /// rebuilt from this map.
    pub fn flatten(&self) -> Value {
        json!({
            "event_id": self.id.as_str(),
            "assistant_request_id": self.execution_context.assistant_request_id(),
            "event_type": self.event_type.as_str(),
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }

    /// Parse the base fields out of a serialized event map. Concrete
    /// event types call this to bootstrap their own reconstruction.
    pub fn parse_base(value: &Value) -> Result<(EventId, EventType, DateTime<Utc>), PlexusError> {
        let id = value
            .get("event_id")
            .and_then(Value::as_str)
            .ok_or_else(|| PlexusError::deserialization("event map missing event_id"))?;
        let tag = value
            .get("event_type")
            .and_then(Value::as_str)
            .ok_or_else(|| PlexusError::deserialization("event map missing event_type"))?;
        let event_type = EventType::from_tag(tag)?;
        let raw_timestamp = value
            .get("timestamp")
            .and_then(Value::as_str)
            .ok_or_else(|| PlexusError::deserialization("event map missing timestamp"))?;
        let timestamp = DateTime::parse_from_rfc3339(raw_timestamp)
            .map_err(|e| PlexusError::deserialization(format!("bad event timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok((EventId::from(id), event_type, timestamp))
    }

    /// A flattened summary drops the execution context and payload, so
    /// full reconstruction at the base level is unsupported and fails
    /// explicitly. Only concrete event types round-trip.
    pub fn from_flattened(_value: &Value) -> Result<Self, PlexusError> {
        Err(PlexusError::deserialization(
            "base event summaries are lossy; reconstruct through a concrete event type",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("conv-1", "exec-1", "req-1")
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let a = EventRecord::new(ctx(), EventType::NodeInvoke).unwrap();
        let b = EventRecord::new(ctx(), EventType::NodeInvoke).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_create_rejects_context_without_request_id() {
        let invalid = ExecutionContext::new("conv-1", "exec-1", "");
        let err = EventRecord::new(invalid, EventType::NodeInvoke).unwrap_err();
        assert!(matches!(err, PlexusError::Construction(_)));
    }

    #[test]
    fn test_flatten_exposes_base_fields() {
        let record = EventRecord::new(ctx(), EventType::ToolRespond).unwrap();
        let flat = record.flatten();

        assert_eq!(flat["event_id"], record.id().as_str());
        assert_eq!(flat["assistant_request_id"], "req-1");
        assert_eq!(flat["event_type"], "ToolRespond");
        assert_eq!(flat["timestamp"], record.timestamp().to_rfc3339());
    }

    #[test]
    fn test_parse_base_round_trips_flatten() {
        let record = EventRecord::new(ctx(), EventType::WorkflowFailed).unwrap();
        let (id, event_type, timestamp) = EventRecord::parse_base(&record.flatten()).unwrap();

        assert_eq!(&id, record.id());
        assert_eq!(event_type, EventType::WorkflowFailed);
        assert_eq!(timestamp, record.timestamp());
    }

    #[test]
    fn test_parse_base_rejects_unknown_tag() {
        let mut flat = EventRecord::new(ctx(), EventType::NodeInvoke).unwrap().flatten();
        flat["event_type"] = "NodeRetired".into();

        let err = EventRecord::parse_base(&flat).unwrap_err();
        assert!(matches!(err, PlexusError::Deserialization(_)));
    }

    #[test]
    fn test_base_reconstruction_is_unsupported() {
        let record = EventRecord::new(ctx(), EventType::OutputTopic).unwrap();
        let err = EventRecord::from_flattened(&record.flatten()).unwrap_err();
        assert!(matches!(err, PlexusError::Deserialization(_)));
    }

    #[test]
    fn test_tag_round_trip_covers_the_closed_set() {
        let tags = [
            EventType::NodeInvoke,
            EventType::NodeRespond,
            EventType::NodeFailed,
            EventType::ToolInvoke,
            EventType::ToolRespond,
            EventType::ToolFailed,
            EventType::WorkflowInvoke,
            EventType::WorkflowRespond,
            EventType::WorkflowFailed,
            EventType::AssistantInvoke,
            EventType::AssistantRespond,
            EventType::AssistantFailed,
            EventType::TopicEvent,
            EventType::StreamTopicEvent,
            EventType::PublishToTopic,
            EventType::ConsumeFromTopic,
            EventType::OutputTopic,
        ];
        for tag in tags {
            assert_eq!(EventType::from_tag(tag.as_str()).unwrap(), tag);
        }
    }
}

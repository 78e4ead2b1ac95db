//! Topic event shapes - what a transport delivers to and from nodes

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PlexusError;
use crate::events::{EventRecord, EventType};
use crate::model::{ExecutionContext, Message};

/// Payload of a topic event: a single message or an ordered sequence.
/// Always normalized to a sequence before processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicPayload {
    One(Message),
    Many(Vec<Message>),
}

impl TopicPayload {
    /// Normalized view: one message and a one-element sequence are
    /// indistinguishable to consumers
    pub fn messages(&self) -> &[Message] {
        match self {
            TopicPayload::One(message) => std::slice::from_ref(message),
            TopicPayload::Many(messages) => messages,
        }
    }
}

impl From<Message> for TopicPayload {
    fn from(message: Message) -> Self {
        TopicPayload::One(message)
    }
}

impl From<Vec<Message>> for TopicPayload {
    fn from(messages: Vec<Message>) -> Self {
        TopicPayload::Many(messages)
    }
}

/// One batch entry delivered to a node by the topic transport
#[derive(Debug, Clone)]
pub struct ConsumeFromTopicEvent {
    record: EventRecord,
    consumer_name: String,
    topic_name: String,
    offset: u64,
    payload: TopicPayload,
}

impl ConsumeFromTopicEvent {
    pub fn new(
        ctx: ExecutionContext,
        consumer_name: impl Into<String>,
        topic_name: impl Into<String>,
        offset: u64,
        payload: impl Into<TopicPayload>,
    ) -> Result<Self, PlexusError> {
        Ok(Self {
            record: EventRecord::new(ctx, EventType::ConsumeFromTopic)?,
            consumer_name: consumer_name.into(),
            topic_name: topic_name.into(),
            offset,
            payload: payload.into(),
        })
    }

    pub fn record(&self) -> &EventRecord {
        &self.record
    }

    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn payload(&self) -> &TopicPayload {
        &self.payload
    }

    /// Normalized payload sequence
    pub fn messages(&self) -> &[Message] {
        self.payload.messages()
    }

    /// Full serialization. Unlike the base record's lossy summary this
    /// keeps the execution context and payload, so [from_value]
    /// reconstructs the event completely.
    ///
    /// [from_value]: ConsumeFromTopicEvent::from_value
    pub fn to_value(&self) -> Value {
        json!({
            "event_id": self.record.id().as_str(),
            "event_type": self.record.event_type().as_str(),
            "timestamp": self.record.timestamp().to_rfc3339(),
            "execution_context": self.record.execution_context(),
            "consumer_name": self.consumer_name,
            "topic_name": self.topic_name,
            "offset": self.offset,
            "data": self.payload,
        })
    }

    pub fn from_value(value: &Value) -> Result<Self, PlexusError> {
        let (id, event_type, timestamp) = EventRecord::parse_base(value)?;
        if event_type != EventType::ConsumeFromTopic {
            return Err(PlexusError::deserialization(format!(
                "expected a {} event, got {}",
                EventType::ConsumeFromTopic,
                event_type
            )));
        }

        let ctx: ExecutionContext = field(value, "execution_context")?;
        let record = EventRecord::from_parts(id, ctx, event_type, timestamp)?;

        Ok(Self {
            record,
            consumer_name: field(value, "consumer_name")?,
            topic_name: field(value, "topic_name")?,
            offset: field(value, "offset")?,
            payload: field(value, "data")?,
        })
    }
}

/// Record of a node publishing messages onto a topic
#[derive(Debug, Clone)]
pub struct PublishToTopicEvent {
    record: EventRecord,
    publisher_name: String,
    topic_name: String,
    payload: TopicPayload,
}

impl PublishToTopicEvent {
    pub fn new(
        ctx: ExecutionContext,
        publisher_name: impl Into<String>,
        topic_name: impl Into<String>,
        payload: impl Into<TopicPayload>,
    ) -> Result<Self, PlexusError> {
        Ok(Self {
            record: EventRecord::new(ctx, EventType::PublishToTopic)?,
            publisher_name: publisher_name.into(),
            topic_name: topic_name.into(),
            payload: payload.into(),
        })
    }

    pub fn record(&self) -> &EventRecord {
        &self.record
    }

    pub fn publisher_name(&self) -> &str {
        &self.publisher_name
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn messages(&self) -> &[Message] {
        self.payload.messages()
    }

    pub fn to_value(&self) -> Value {
        json!({
            "event_id": self.record.id().as_str(),
            "event_type": self.record.event_type().as_str(),
            "timestamp": self.record.timestamp().to_rfc3339(),
            "execution_context": self.record.execution_context(),
            "publisher_name": self.publisher_name,
            "topic_name": self.topic_name,
            "data": self.payload,
        })
    }

    pub fn from_value(value: &Value) -> Result<Self, PlexusError> {
        let (id, event_type, timestamp) = EventRecord::parse_base(value)?;
        if event_type != EventType::PublishToTopic {
            return Err(PlexusError::deserialization(format!(
                "expected a {} event, got {}",
                EventType::PublishToTopic,
                event_type
            )));
        }

        let ctx: ExecutionContext = field(value, "execution_context")?;
        let record = EventRecord::from_parts(id, ctx, event_type, timestamp)?;

        Ok(Self {
            record,
            publisher_name: field(value, "publisher_name")?,
            topic_name: field(value, "topic_name")?,
            payload: field(value, "data")?,
        })
    }
}

/// Extract and deserialize one field of a serialized event map
fn field<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Result<T, PlexusError> {
    let raw = value
        .get(key)
        .ok_or_else(|| PlexusError::deserialization(format!("event map missing {}", key)))?;
    Ok(serde_json::from_value(raw.clone())?)
}

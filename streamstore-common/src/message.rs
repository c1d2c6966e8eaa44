use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An append input: one message proposed by a caller. `payload`/`metadata`
/// are opaque UTF-8 JSON strings — the driver crate owns whatever
/// on-the-wire encoding a relational backend needs.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub message_id: Uuid,
    pub r#type: String,
    pub payload: String,
    pub metadata: String,
}

impl NewMessage {
    pub fn new(
        message_id: Uuid,
        r#type: impl Into<String>,
        payload: impl Into<String>,
        metadata: impl Into<String>,
    ) -> Self {
        Self {
            message_id,
            r#type: r#type.into(),
            payload: payload.into(),
            metadata: metadata.into(),
        }
    }
}

/// A message as it comes back from a read. `payload`/`metadata` are
/// populated only when the read was issued with `prefetch = true`;
/// otherwise the caller is expected to use `message_id` against
/// `StorageDriver::read_message_data`.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub message_id: Uuid,
    pub stream_canonical: String,
    pub stream_original: String,
    pub stream_version: i64,
    pub position: i64,
    pub created_utc: DateTime<Utc>,
    pub r#type: String,
    pub payload: Option<String>,
    pub metadata: Option<String>,
}

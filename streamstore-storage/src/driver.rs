use async_trait::async_trait;
use chrono::{DateTime, Utc};
use streamstore_common::{ExpectedVersion, NewMessage, ReadDirection, StoredMessage};
use uuid::Uuid;

/// Structured driver-level fault, so the append engine can tell a
/// concurrency conflict from a genuine backend fault by inspecting a
/// discriminator instead of string-matching an error message.
#[derive(Debug)]
pub enum DriverError {
    /// `expected_version` did not match the stream head, and the batch was
    /// not an idempotent replay of an existing contiguous run.
    Conflict { actual: Option<i64> },
    /// Connection lost, constraint violation other than the handled
    /// version/id uniqueness ones, deserialization failure, etc.
    Fault(eyre::Report),
}

impl DriverError {
    pub fn fault(report: eyre::Report) -> Self {
        Self::Fault(report)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AppendOutcome {
    pub version: i64,
    pub position: i64,
}

#[derive(Debug)]
pub struct StreamPageResult {
    pub exists: bool,
    pub rows: Vec<StoredMessage>,
    /// The stream's current head, independent of how many rows this page
    /// actually returned — lets the read engine fill `last_stream_version`/
    /// `last_stream_position` without a second round trip.
    pub head_version: i64,
    pub head_position: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteStreamOutcome {
    /// False for the `Any`-against-nonexistent no-op.
    pub deleted: bool,
}

/// Abstract contract over the relational backend. SQL generation and
/// connection handling for a concrete backend are out of scope for this
/// core; `crate::memory::InMemoryDriver` is the reference implementation the
/// engines and tests run against.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Creates the backing schema if it does not already exist. A no-op for
    /// drivers (like the in-memory one) that have no persistent schema.
    async fn create_schema(&self) -> Result<(), DriverError>;

    /// Atomic: allocates `stream_version`/`position` for every row, checks
    /// `expected` against the stream head (or an idempotent-replay match),
    /// and inserts — all inside one transaction.
    #[allow(clippy::too_many_arguments)]
    async fn append_to_stream(
        &self,
        canonical: &str,
        original: &str,
        expected: ExpectedVersion,
        rows: Vec<NewMessage>,
        created_utc: DateTime<Utc>,
    ) -> Result<AppendOutcome, DriverError>;

    /// Requests `count` rows starting at `from_version` in `direction`. The
    /// read engine is responsible for the `max_count + 1` look-ahead — this
    /// just returns what was asked for.
    async fn read_stream_page(
        &self,
        canonical: &str,
        from_version: i64,
        count: u64,
        direction: ReadDirection,
        prefetch: bool,
    ) -> Result<StreamPageResult, DriverError>;

    async fn read_all_page(
        &self,
        from_position: i64,
        count: u64,
        direction: ReadDirection,
        prefetch: bool,
    ) -> Result<Vec<StoredMessage>, DriverError>;

    /// Largest `position` currently committed, or -1 if empty.
    async fn read_head_position(&self) -> Result<i64, DriverError>;

    async fn delete_stream(
        &self,
        canonical: &str,
        expected: ExpectedVersion,
    ) -> Result<DeleteStreamOutcome, DriverError>;

    /// True iff a row was removed.
    async fn delete_message(
        &self,
        canonical: &str,
        message_id: Uuid,
    ) -> Result<bool, DriverError>;

    async fn read_message_data(
        &self,
        canonical: &str,
        message_id: Uuid,
    ) -> Result<(String, String), DriverError>;
}

use streamstore_common::{CanonicalStreamId, Clock, ExpectedVersion, NewMessage, StreamStoreError};
use streamstore_storage::StorageDriver;
use tokio_util::sync::CancellationToken;

use crate::errors::{check_cancelled, map_driver_error};

/// Result of a successful append: always the new head, even on an
/// idempotent no-op.
#[derive(Debug, Clone, Copy)]
pub struct AppendResult {
    pub current_version: i64,
    pub current_position: i64,
}

/// The optimistic-concurrency decision itself lives inside
/// `StorageDriver::append_to_stream` — it has to run inside the driver's own
/// transaction, alongside version allocation and the insert, so only the
/// driver has the scope to make it atomic. This function is the thin
/// orchestration around that call: canonicalize, call the driver, translate
/// the outcome.
pub(crate) async fn append<D: StorageDriver>(
    driver: &D,
    clock: &dyn Clock,
    stream: &str,
    expected: ExpectedVersion,
    messages: Vec<NewMessage>,
    cancellation: &CancellationToken,
) -> Result<AppendResult, StreamStoreError> {
    check_cancelled(cancellation)?;

    let id = CanonicalStreamId::new(stream)?;
    let created_utc = clock.now_utc();

    let span = tracing::info_span!("append", stream = id.original(), count = messages.len());
    let _enter = span.enter();

    let outcome = driver
        .append_to_stream(id.canonical(), id.original(), expected, messages, created_utc)
        .await
        .map_err(|err| map_driver_error(id.original(), expected, err))?;

    tracing::debug!(
        version = outcome.version,
        position = outcome.position,
        "append committed"
    );

    Ok(AppendResult {
        current_version: outcome.version,
        current_position: outcome.position,
    })
}

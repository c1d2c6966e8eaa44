use serde_json::json;
use streamstore_common::{
    CanonicalStreamId, Clock, ExpectedVersion, NewMessage, StreamStoreError, DELETED_STREAM,
};
use streamstore_storage::StorageDriver;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::errors::{check_cancelled, fault_only, map_driver_error};

/// System-stream protection is applied uniformly to both operations here
/// (`delete_stream` and `delete_message`): both reject any `$`-prefixed
/// target, keeping the audit stream itself immutable rather than carving
/// out a narrower exception per operation (see DESIGN.md for the reasoning).
pub(crate) async fn delete_stream<D: StorageDriver>(
    driver: &D,
    clock: &dyn Clock,
    stream: &str,
    expected: ExpectedVersion,
    cancellation: &CancellationToken,
) -> Result<(), StreamStoreError> {
    check_cancelled(cancellation)?;

    let id = CanonicalStreamId::new(stream)?;
    reject_system_target(&id)?;

    let outcome = driver
        .delete_stream(id.canonical(), expected)
        .await
        .map_err(|err| map_driver_error(id.original(), expected, err))?;

    if outcome.deleted {
        tracing::info!(stream = id.original(), "stream soft-deleted");
        append_audit(
            driver,
            clock,
            "$stream-deleted",
            json!({ "stream_id": id.original() }),
        )
        .await?;
    }

    Ok(())
}

pub(crate) async fn delete_message<D: StorageDriver>(
    driver: &D,
    clock: &dyn Clock,
    stream: &str,
    message_id: Uuid,
    cancellation: &CancellationToken,
) -> Result<(), StreamStoreError> {
    check_cancelled(cancellation)?;

    let id = CanonicalStreamId::new(stream)?;
    reject_system_target(&id)?;

    let removed = driver
        .delete_message(id.canonical(), message_id)
        .await
        .map_err(fault_only)?;

    if removed {
        tracing::info!(stream = id.original(), %message_id, "message hard-deleted");
        append_audit(
            driver,
            clock,
            "$message-deleted",
            json!({ "stream_id": id.original(), "message_id": message_id.to_string() }),
        )
        .await?;
    }

    Ok(())
}

fn reject_system_target(id: &CanonicalStreamId) -> Result<(), StreamStoreError> {
    if id.is_system() {
        return Err(StreamStoreError::InvalidStreamName {
            name: id.original().to_string(),
            reason: "system streams cannot be deleted by clients".to_string(),
        });
    }

    Ok(())
}

async fn append_audit<D: StorageDriver>(
    driver: &D,
    clock: &dyn Clock,
    r#type: &str,
    payload: serde_json::Value,
) -> Result<(), StreamStoreError> {
    let audit = CanonicalStreamId::new(DELETED_STREAM)
        .expect("'$deleted' is always a valid system stream name");

    let message = NewMessage::new(Uuid::new_v4(), r#type, payload.to_string(), "{}");

    driver
        .append_to_stream(
            audit.canonical(),
            audit.original(),
            ExpectedVersion::Any,
            vec![message],
            clock.now_utc(),
        )
        .await
        .map_err(|err| map_driver_error(audit.original(), ExpectedVersion::Any, err))?;

    Ok(())
}

use streamstore_common::{ExpectedVersion, StreamStoreError};
use streamstore_storage::DriverError;
use tokio_util::sync::CancellationToken;

pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), StreamStoreError> {
    if token.is_cancelled() {
        Err(StreamStoreError::OperationCancelled)
    } else {
        Ok(())
    }
}

/// For driver calls that should never surface a `Conflict` (reads,
/// `delete_message`) — collapses both variants onto `BackendFault` so a
/// misbehaving driver still produces a valid `StreamStoreError` rather than
/// panicking.
pub(crate) fn fault_only(err: DriverError) -> StreamStoreError {
    match err {
        DriverError::Fault(report) => StreamStoreError::BackendFault(report),
        DriverError::Conflict { .. } => StreamStoreError::BackendFault(eyre::eyre!(
            "storage driver reported a concurrency conflict where none was expected"
        )),
    }
}

/// Maps a driver-level conflict/fault onto the public error enum by
/// inspecting the driver's structured error discriminator, not by string
/// matching.
pub(crate) fn map_driver_error(
    stream: &str,
    expected: ExpectedVersion,
    err: DriverError,
) -> StreamStoreError {
    match err {
        DriverError::Conflict { actual } => {
            StreamStoreError::wrong_expected_version(stream, expected, actual)
        }
        DriverError::Fault(report) => StreamStoreError::BackendFault(report),
    }
}

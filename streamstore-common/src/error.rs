use thiserror::Error;

use crate::version::ExpectedVersion;

/// Error kinds this core can raise. `StreamNotFound` is deliberately absent
/// here — it is never an exception, it is a `PageReadStatus` carried on the
/// page (see `crate::page`).
#[derive(Error, Debug)]
pub enum StreamStoreError {
    #[error("expected version {expected} for stream '{stream}' but got {actual:?} instead")]
    WrongExpectedVersion {
        stream: String,
        expected: ExpectedVersion,
        actual: Option<i64>,
    },

    #[error("invalid stream name '{name}': {reason}")]
    InvalidStreamName { name: String, reason: String },

    #[error("operation attempted after close()")]
    ObjectDisposed,

    #[error("operation cancelled")]
    OperationCancelled,

    #[error("storage backend fault")]
    BackendFault(#[source] eyre::Report),
}

impl StreamStoreError {
    pub fn wrong_expected_version(
        stream: impl Into<String>,
        expected: ExpectedVersion,
        actual: Option<i64>,
    ) -> Self {
        Self::WrongExpectedVersion {
            stream: stream.into(),
            expected,
            actual,
        }
    }
}

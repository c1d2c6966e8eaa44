use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use streamstore_common::{position, ExpectedVersion, NewMessage, ReadDirection, StoredMessage};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::driver::{
    AppendOutcome, DeleteStreamOutcome, DriverError, StorageDriver, StreamPageResult,
};

/// Reference `StorageDriver` implementation: one append-ordered log plus a
/// per-stream index, with dual version/position allocation, idempotent-replay
/// detection, and soft-delete/resurrection.
///
/// The global position sequence starts at 1 so that `Position::Start` (0)
/// used as an *exclusive* lower bound includes the very first message
/// without needing a separate inclusive/exclusive switch.
#[derive(Default)]
pub struct InMemoryDriver {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    streams: HashMap<String, StreamState>,
    log: Vec<StoredMessage>,
    next_position: i64,
}

#[derive(Default)]
struct StreamState {
    original: String,
    rows: Vec<StoredMessage>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

fn version_matches(expected: ExpectedVersion, current_version: i64) -> bool {
    match expected {
        ExpectedVersion::NoStream | ExpectedVersion::EmptyStream => current_version == -1,
        ExpectedVersion::Any => true,
        ExpectedVersion::Exact(n) => current_version == n as i64,
    }
}

/// Finds the contiguous run of existing messages the submitted batch would
/// have landed on, returning `(version, position)` of its last message if
/// the ids match it exactly and in order.
fn detect_replay(
    rows: &[StoredMessage],
    expected: ExpectedVersion,
    batch_ids: &[Uuid],
) -> Option<(i64, i64)> {
    if batch_ids.is_empty() {
        return None;
    }

    let start = match expected {
        ExpectedVersion::NoStream | ExpectedVersion::EmptyStream => 0usize,
        ExpectedVersion::Exact(n) => (n as usize) + 1,
        ExpectedVersion::Any => rows.len().checked_sub(batch_ids.len())?,
    };

    let end = start + batch_ids.len();
    let candidate = rows.get(start..end)?;

    let matches = candidate
        .iter()
        .zip(batch_ids.iter())
        .all(|(row, id)| row.message_id == *id);

    if !matches {
        return None;
    }

    let last = candidate.last()?;
    Some((last.stream_version, last.position))
}

fn apply_prefetch(mut rows: Vec<StoredMessage>, prefetch: bool) -> Vec<StoredMessage> {
    if !prefetch {
        for row in rows.iter_mut() {
            row.payload = None;
            row.metadata = None;
        }
    }

    rows
}

#[async_trait]
impl StorageDriver for InMemoryDriver {
    async fn create_schema(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn append_to_stream(
        &self,
        canonical: &str,
        original: &str,
        expected: ExpectedVersion,
        rows: Vec<NewMessage>,
        created_utc: DateTime<Utc>,
    ) -> Result<AppendOutcome, DriverError> {
        let mut inner = self.inner.lock().await;
        let Inner {
            streams,
            log,
            next_position,
        } = &mut *inner;

        let state = streams.entry(canonical.to_string()).or_default();
        if state.original.is_empty() {
            state.original = original.to_string();
        }

        let current_version = state.rows.len() as i64 - 1;

        if version_matches(expected, current_version) {
            let batch_ids: Vec<Uuid> = rows.iter().map(|m| m.message_id).collect();
            if let Some(collision) = batch_ids.iter().find(|id| {
                state.rows.iter().any(|row| row.message_id == **id)
            }) {
                tracing::debug!(%collision, stream = canonical, "duplicate message id in non-replay append");
                return Err(DriverError::Conflict {
                    actual: if current_version >= 0 {
                        Some(current_version)
                    } else {
                        None
                    },
                });
            }

            let mut version = current_version;
            let mut position = 0i64;

            for proposed in rows {
                version += 1;
                *next_position += 1;
                position = *next_position;

                let stored = StoredMessage {
                    message_id: proposed.message_id,
                    stream_canonical: canonical.to_string(),
                    stream_original: state.original.clone(),
                    stream_version: version,
                    position,
                    created_utc,
                    r#type: proposed.r#type,
                    payload: Some(proposed.payload),
                    metadata: Some(proposed.metadata),
                };

                state.rows.push(stored.clone());
                log.push(stored);
            }

            if version == current_version {
                // Empty batch: report the unchanged head.
                position = state.rows.last().map(|r| r.position).unwrap_or(-1);
            }

            tracing::debug!(stream = canonical, new_version = version, new_position = position, "appended");

            Ok(AppendOutcome { version, position })
        } else {
            let batch_ids: Vec<Uuid> = rows.iter().map(|m| m.message_id).collect();
            if let Some((version, position)) = detect_replay(&state.rows, expected, &batch_ids) {
                tracing::debug!(stream = canonical, version, "idempotent replay detected");
                return Ok(AppendOutcome { version, position });
            }

            Err(DriverError::Conflict {
                actual: if current_version >= 0 {
                    Some(current_version)
                } else {
                    None
                },
            })
        }
    }

    async fn read_stream_page(
        &self,
        canonical: &str,
        from_version: i64,
        count: u64,
        direction: ReadDirection,
        prefetch: bool,
    ) -> Result<StreamPageResult, DriverError> {
        let inner = self.inner.lock().await;
        let count = count as usize;

        let Some(state) = inner.streams.get(canonical) else {
            return Ok(StreamPageResult {
                exists: false,
                rows: Vec::new(),
                head_version: -1,
                head_position: -1,
            });
        };

        if state.rows.is_empty() {
            return Ok(StreamPageResult {
                exists: false,
                rows: Vec::new(),
                head_version: -1,
                head_position: -1,
            });
        }

        let head = state.rows.last().expect("checked non-empty above");
        let (head_version, head_position) = (head.stream_version, head.position);

        let rows = match direction {
            ReadDirection::Forward => state
                .rows
                .iter()
                .filter(|r| r.stream_version >= from_version)
                .take(count)
                .cloned()
                .collect::<Vec<_>>(),
            ReadDirection::Backward => {
                let mut filtered: Vec<StoredMessage> = if from_version < 0 {
                    state.rows.clone()
                } else {
                    state
                        .rows
                        .iter()
                        .filter(|r| r.stream_version <= from_version)
                        .cloned()
                        .collect()
                };
                filtered.reverse();
                filtered.truncate(count);
                filtered
            }
        };

        Ok(StreamPageResult {
            exists: true,
            rows: apply_prefetch(rows, prefetch),
            head_version,
            head_position,
        })
    }

    async fn read_all_page(
        &self,
        from_position: i64,
        count: u64,
        direction: ReadDirection,
        prefetch: bool,
    ) -> Result<Vec<StoredMessage>, DriverError> {
        let inner = self.inner.lock().await;
        let count = count as usize;

        let rows = match direction {
            ReadDirection::Forward => inner
                .log
                .iter()
                .filter(|m| m.position > from_position)
                .take(count)
                .cloned()
                .collect::<Vec<_>>(),
            ReadDirection::Backward => {
                let mut filtered: Vec<StoredMessage> = if from_position == position::END {
                    inner.log.clone()
                } else {
                    inner
                        .log
                        .iter()
                        .filter(|m| m.position < from_position)
                        .cloned()
                        .collect()
                };
                filtered.reverse();
                filtered.truncate(count);
                filtered
            }
        };

        Ok(apply_prefetch(rows, prefetch))
    }

    async fn read_head_position(&self) -> Result<i64, DriverError> {
        let inner = self.inner.lock().await;
        Ok(inner.log.last().map(|m| m.position).unwrap_or(-1))
    }

    async fn delete_stream(
        &self,
        canonical: &str,
        expected: ExpectedVersion,
    ) -> Result<DeleteStreamOutcome, DriverError> {
        let mut inner = self.inner.lock().await;

        let current_version = inner
            .streams
            .get(canonical)
            .map(|s| s.rows.len() as i64 - 1)
            .unwrap_or(-1);

        if current_version == -1 {
            return if version_matches(expected, current_version) {
                Ok(DeleteStreamOutcome { deleted: false })
            } else {
                Err(DriverError::Conflict { actual: None })
            };
        }

        if !version_matches(expected, current_version) {
            return Err(DriverError::Conflict {
                actual: Some(current_version),
            });
        }

        if let Some(state) = inner.streams.get_mut(canonical) {
            state.rows.clear();
        }
        inner.log.retain(|m| m.stream_canonical != canonical);

        Ok(DeleteStreamOutcome { deleted: true })
    }

    async fn delete_message(
        &self,
        canonical: &str,
        message_id: Uuid,
    ) -> Result<bool, DriverError> {
        let mut inner = self.inner.lock().await;

        let removed = if let Some(state) = inner.streams.get_mut(canonical) {
            let before = state.rows.len();
            state.rows.retain(|r| r.message_id != message_id);
            before != state.rows.len()
        } else {
            false
        };

        if removed {
            inner
                .log
                .retain(|m| !(m.stream_canonical == canonical && m.message_id == message_id));
        }

        Ok(removed)
    }

    async fn read_message_data(
        &self,
        canonical: &str,
        message_id: Uuid,
    ) -> Result<(String, String), DriverError> {
        let inner = self.inner.lock().await;

        let row = inner
            .streams
            .get(canonical)
            .and_then(|s| s.rows.iter().find(|r| r.message_id == message_id));

        match row {
            Some(row) => Ok((
                row.payload.clone().unwrap_or_default(),
                row.metadata.clone().unwrap_or_default(),
            )),
            None => Err(DriverError::fault(eyre::eyre!(
                "message {message_id} not found in stream {canonical}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message() -> NewMessage {
        NewMessage::new(Uuid::new_v4(), "t", "p", "m")
    }

    #[tokio::test]
    async fn append_allocates_dense_version_and_increasing_position() {
        let driver = InMemoryDriver::new();
        let now = Utc::now();

        let a = driver
            .append_to_stream("s1", "s1", ExpectedVersion::NoStream, vec![new_message()], now)
            .await
            .unwrap();
        assert_eq!(a.version, 0);

        let b = driver
            .append_to_stream("s1", "s1", ExpectedVersion::Exact(0), vec![new_message()], now)
            .await
            .unwrap();
        assert_eq!(b.version, 1);
        assert!(b.position > a.position);
    }

    #[tokio::test]
    async fn replay_under_any_matches_the_tail_of_the_stream() {
        let driver = InMemoryDriver::new();
        let now = Utc::now();
        let message = new_message();

        let first = driver
            .append_to_stream(
                "s1",
                "s1",
                ExpectedVersion::Any,
                vec![message.clone()],
                now,
            )
            .await
            .unwrap();

        let replay = driver
            .append_to_stream("s1", "s1", ExpectedVersion::Any, vec![message], now)
            .await
            .unwrap();

        assert_eq!(first.version, replay.version);
        assert_eq!(first.position, replay.position);
    }

    #[tokio::test]
    async fn conflicting_version_is_reported_with_the_actual_head() {
        let driver = InMemoryDriver::new();
        let now = Utc::now();

        driver
            .append_to_stream("s1", "s1", ExpectedVersion::NoStream, vec![new_message()], now)
            .await
            .unwrap();

        let err = driver
            .append_to_stream("s1", "s1", ExpectedVersion::NoStream, vec![new_message()], now)
            .await
            .unwrap_err();

        assert!(matches!(err, DriverError::Conflict { actual: Some(0) }));
    }

    #[tokio::test]
    async fn delete_stream_then_append_any_resurrects_at_version_zero() {
        let driver = InMemoryDriver::new();
        let now = Utc::now();

        driver
            .append_to_stream("s1", "s1", ExpectedVersion::NoStream, vec![new_message()], now)
            .await
            .unwrap();

        driver.delete_stream("s1", ExpectedVersion::Any).await.unwrap();

        let page = driver
            .read_stream_page("s1", 0, 10, ReadDirection::Forward, true)
            .await
            .unwrap();
        assert!(!page.exists);

        let resurrected = driver
            .append_to_stream("s1", "s1", ExpectedVersion::Any, vec![new_message()], now)
            .await
            .unwrap();
        assert_eq!(resurrected.version, 0);
    }

    #[tokio::test]
    async fn backward_read_returns_descending_versions() {
        let driver = InMemoryDriver::new();
        let now = Utc::now();

        driver
            .append_to_stream(
                "s1",
                "s1",
                ExpectedVersion::NoStream,
                vec![new_message(), new_message(), new_message()],
                now,
            )
            .await
            .unwrap();

        let page = driver
            .read_stream_page("s1", -1, 10, ReadDirection::Backward, true)
            .await
            .unwrap();

        let versions: Vec<i64> = page.rows.iter().map(|r| r.stream_version).collect();
        assert_eq!(versions, vec![2, 1, 0]);
    }
}

use streamstore_common::{
    position, stream_version, AllPageCursor, CanonicalStreamId, PageReadStatus, ReadAllPage,
    ReadDirection, ReadStreamPage, StreamPageCursor, StreamStoreError,
};
use streamstore_storage::StorageDriver;
use tokio_util::sync::CancellationToken;

use crate::errors::{check_cancelled, fault_only};

fn clamp(max_count: u64, max_page_size: u64) -> u64 {
    max_count.min(max_page_size).max(1)
}

/// Stream paging: requests `max_count + 1` rows so the extra row tells us
/// `is_end` and the `next_version` cursor without a second round trip, and
/// shapes the `StreamNotFound` page when the stream doesn't exist.
pub(crate) async fn read_stream<D: StorageDriver>(
    driver: &D,
    stream: &str,
    from_version: i64,
    max_count: u64,
    direction: ReadDirection,
    prefetch: bool,
    max_page_size: u64,
    cancellation: &CancellationToken,
) -> Result<ReadStreamPage, StreamStoreError> {
    check_cancelled(cancellation)?;

    let id = CanonicalStreamId::new(stream)?;
    let max_count = clamp(max_count, max_page_size);

    let result = driver
        .read_stream_page(id.canonical(), from_version, max_count + 1, direction, prefetch)
        .await
        .map_err(fault_only)?;

    let next_cursor = |from_version: i64| StreamPageCursor {
        stream: id.original().to_string(),
        from_version,
        max_count,
        direction,
        prefetch,
    };

    if !result.exists {
        return Ok(ReadStreamPage {
            status: PageReadStatus::StreamNotFound,
            stream_original: id.original().to_string(),
            from_version,
            messages: Vec::new(),
            is_end: true,
            last_stream_version: -1,
            last_stream_position: -1,
            next: next_cursor(from_version),
        });
    }

    let mut rows = result.rows;
    let is_end = (rows.len() as u64) <= max_count;
    if !is_end {
        rows.truncate(max_count as usize);
    }

    let next_version = match (direction, rows.last()) {
        (ReadDirection::Forward, Some(last)) => last.stream_version + 1,
        (ReadDirection::Forward, None) => from_version + 1,
        (ReadDirection::Backward, Some(last)) => last.stream_version - 1,
        (ReadDirection::Backward, None) => stream_version::END,
    };

    Ok(ReadStreamPage {
        status: PageReadStatus::Success,
        stream_original: id.original().to_string(),
        from_version,
        messages: rows,
        is_end,
        last_stream_version: result.head_version,
        last_stream_position: result.head_position,
        next: next_cursor(next_version),
    })
}

pub(crate) async fn read_stream_cursor<D: StorageDriver>(
    driver: &D,
    cursor: &StreamPageCursor,
    max_page_size: u64,
    cancellation: &CancellationToken,
) -> Result<ReadStreamPage, StreamStoreError> {
    read_stream(
        driver,
        &cursor.stream,
        cursor.from_version,
        cursor.max_count,
        cursor.direction,
        cursor.prefetch,
        max_page_size,
        cancellation,
    )
    .await
}

/// Same look-ahead scheme, keyed on the global `position` rather than
/// `stream_version`.
pub(crate) async fn read_all<D: StorageDriver>(
    driver: &D,
    from_position: i64,
    max_count: u64,
    direction: ReadDirection,
    prefetch: bool,
    max_page_size: u64,
    cancellation: &CancellationToken,
) -> Result<ReadAllPage, StreamStoreError> {
    check_cancelled(cancellation)?;

    let max_count = clamp(max_count, max_page_size);

    let mut rows = driver
        .read_all_page(from_position, max_count + 1, direction, prefetch)
        .await
        .map_err(fault_only)?;

    let is_end = (rows.len() as u64) <= max_count;
    if !is_end {
        rows.truncate(max_count as usize);
    }

    let next_position = match (direction, rows.last()) {
        (ReadDirection::Forward, Some(last)) => last.position,
        (ReadDirection::Forward, None) => from_position,
        (ReadDirection::Backward, Some(last)) => last.position,
        (ReadDirection::Backward, None) => position::END,
    };

    Ok(ReadAllPage {
        from_position,
        messages: rows,
        is_end,
        next: AllPageCursor {
            from_position: next_position,
            max_count,
            direction,
            prefetch,
        },
    })
}

pub(crate) async fn read_all_cursor<D: StorageDriver>(
    driver: &D,
    cursor: &AllPageCursor,
    max_page_size: u64,
    cancellation: &CancellationToken,
) -> Result<ReadAllPage, StreamStoreError> {
    read_all(
        driver,
        cursor.from_position,
        cursor.max_count,
        cursor.direction,
        cursor.prefetch,
        max_page_size,
        cancellation,
    )
    .await
}

pub(crate) async fn read_head_position<D: StorageDriver>(
    driver: &D,
    cancellation: &CancellationToken,
) -> Result<i64, StreamStoreError> {
    check_cancelled(cancellation)?;
    driver.read_head_position().await.map_err(fault_only)
}

pub(crate) async fn read_message_data<D: StorageDriver>(
    driver: &D,
    stream: &str,
    message_id: uuid::Uuid,
    cancellation: &CancellationToken,
) -> Result<(String, String), StreamStoreError> {
    check_cancelled(cancellation)?;
    let id = CanonicalStreamId::new(stream)?;
    driver
        .read_message_data(id.canonical(), message_id)
        .await
        .map_err(fault_only)
}

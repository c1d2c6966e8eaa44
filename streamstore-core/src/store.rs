use std::sync::Arc;

use streamstore_common::{
    AllPageCursor, Clock, ExpectedVersion, NewMessage, ReadAllPage, ReadDirection, ReadStreamPage,
    StreamPageCursor, StreamStoreError,
};
use streamstore_storage::StorageDriver;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::append::{self, AppendResult};
use crate::delete;
use crate::errors::fault_only;
use crate::lifecycle::Lifecycle;
use crate::options::EventStoreOptions;
use crate::read;

/// Public facade over the append/read/delete engines, generic over a
/// `StorageDriver` implementation, so its behavior is identical across
/// backends. The underlying engines live in separate files for readability
/// but are recombined into one facade type here.
pub struct EventStore<D: StorageDriver> {
    driver: Arc<D>,
    clock: Arc<dyn Clock>,
    lifecycle: Arc<Lifecycle>,
    options: EventStoreOptions,
}

impl<D: StorageDriver> Clone for EventStore<D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            clock: self.clock.clone(),
            lifecycle: self.lifecycle.clone(),
            options: self.options.clone(),
        }
    }
}

impl<D: StorageDriver> EventStore<D> {
    pub fn new(driver: D, clock: Arc<dyn Clock>, options: EventStoreOptions) -> Self {
        Self {
            driver: Arc::new(driver),
            clock,
            lifecycle: Arc::new(Lifecycle::new()),
            options,
        }
    }

    /// Runs `driver.create_schema()` before handing back a store ready for
    /// use; a no-op for drivers without a persistent schema.
    pub async fn open(
        driver: D,
        clock: Arc<dyn Clock>,
        options: EventStoreOptions,
    ) -> Result<Self, StreamStoreError> {
        driver.create_schema().await.map_err(fault_only)?;
        Ok(Self::new(driver, clock, options))
    }

    pub async fn append(
        &self,
        stream: &str,
        expected_version: ExpectedVersion,
        messages: Vec<NewMessage>,
        cancellation: &CancellationToken,
    ) -> Result<AppendResult, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        append::append(
            &self.driver,
            self.clock.as_ref(),
            stream,
            expected_version,
            messages,
            cancellation,
        )
        .await
    }

    pub async fn read_stream_forwards(
        &self,
        stream: &str,
        from_version: i64,
        max_count: u64,
        prefetch: bool,
        cancellation: &CancellationToken,
    ) -> Result<ReadStreamPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_stream(
            &self.driver,
            stream,
            from_version,
            max_count,
            ReadDirection::Forward,
            prefetch,
            self.options.max_page_size(),
            cancellation,
        )
        .await
    }

    pub async fn read_stream_backwards(
        &self,
        stream: &str,
        from_version: i64,
        max_count: u64,
        prefetch: bool,
        cancellation: &CancellationToken,
    ) -> Result<ReadStreamPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_stream(
            &self.driver,
            stream,
            from_version,
            max_count,
            ReadDirection::Backward,
            prefetch,
            self.options.max_page_size(),
            cancellation,
        )
        .await
    }

    /// Re-enters stream paging at `cursor` (the `next` field of a prior
    /// page) — an explicit continuation operation in place of a captured
    /// `read_next` closure.
    pub async fn next_stream_page(
        &self,
        cursor: &StreamPageCursor,
        cancellation: &CancellationToken,
    ) -> Result<ReadStreamPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_stream_cursor(&self.driver, cursor, self.options.max_page_size(), cancellation)
            .await
    }

    pub async fn read_all_forwards(
        &self,
        from_position_exclusive: i64,
        max_count: u64,
        prefetch: bool,
        cancellation: &CancellationToken,
    ) -> Result<ReadAllPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_all(
            &self.driver,
            from_position_exclusive,
            max_count,
            ReadDirection::Forward,
            prefetch,
            self.options.max_page_size(),
            cancellation,
        )
        .await
    }

    pub async fn read_all_backwards(
        &self,
        from_position_exclusive: i64,
        max_count: u64,
        prefetch: bool,
        cancellation: &CancellationToken,
    ) -> Result<ReadAllPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_all(
            &self.driver,
            from_position_exclusive,
            max_count,
            ReadDirection::Backward,
            prefetch,
            self.options.max_page_size(),
            cancellation,
        )
        .await
    }

    pub async fn next_all_page(
        &self,
        cursor: &AllPageCursor,
        cancellation: &CancellationToken,
    ) -> Result<ReadAllPage, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_all_cursor(&self.driver, cursor, self.options.max_page_size(), cancellation)
            .await
    }

    pub async fn read_head_position(
        &self,
        cancellation: &CancellationToken,
    ) -> Result<i64, StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_head_position(&self.driver, cancellation).await
    }

    pub async fn read_message_data(
        &self,
        stream: &str,
        message_id: Uuid,
        cancellation: &CancellationToken,
    ) -> Result<(String, String), StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        read::read_message_data(&self.driver, stream, message_id, cancellation).await
    }

    pub async fn delete_stream(
        &self,
        stream: &str,
        expected_version: ExpectedVersion,
        cancellation: &CancellationToken,
    ) -> Result<(), StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        delete::delete_stream(
            &self.driver,
            self.clock.as_ref(),
            stream,
            expected_version,
            cancellation,
        )
        .await
    }

    pub async fn delete_message(
        &self,
        stream: &str,
        message_id: Uuid,
        cancellation: &CancellationToken,
    ) -> Result<(), StreamStoreError> {
        let _guard = self.lifecycle.enter()?;
        delete::delete_message(&self.driver, self.clock.as_ref(), stream, message_id, cancellation)
            .await
    }

    /// Idempotent; does not cancel in-flight operations, it waits for them.
    pub async fn close(&self) {
        if self.lifecycle.begin_close() {
            tracing::info!("event store closing");
        }

        while self.lifecycle.in_flight() > 0 {
            tokio::task::yield_now().await;
        }

        self.lifecycle.finish_close();
    }
}

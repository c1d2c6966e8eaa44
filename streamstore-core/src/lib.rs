mod append;
mod delete;
mod errors;
mod lifecycle;
mod options;
mod read;
mod store;


pub use append::AppendResult;
pub use options::EventStoreOptions;
pub use store::EventStore;

pub use streamstore_common::{
    AllPageCursor, CanonicalStreamId, Clock, ExpectedVersion, ManualClock, NewMessage,
    PageReadStatus, ReadAllPage, ReadDirection, ReadStreamPage, StoredMessage, StreamPageCursor,
    StreamStoreError, SystemClock,
};
pub use streamstore_storage::{InMemoryDriver, StorageDriver};

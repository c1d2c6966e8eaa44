mod clock;
mod direction;
mod error;
mod ident;
mod message;
mod page;
mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use direction::ReadDirection;
pub use error::StreamStoreError;
pub use ident::{CanonicalStreamId, CANONICAL_WIDTH, DELETED_STREAM};
pub use message::{NewMessage, StoredMessage};
pub use page::{AllPageCursor, PageReadStatus, ReadAllPage, ReadStreamPage, StreamPageCursor};
pub use version::{position, stream_version, ExpectedVersion};

use crate::direction::ReadDirection;
use crate::message::StoredMessage;

/// Outcome of a stream read. Never an exception — a missing stream is just
/// a page with this status and no messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageReadStatus {
    Success,
    StreamNotFound,
}

/// Bind parameters for re-entering `read_stream` at the next page.
///
/// The source this is modeled on has pages carry a captured `read_next`
/// closure; re-expressed here as a plain data cursor plus an explicit
/// `next_page` operation on the engine, avoiding the lifetime hazard of a
/// page holding a reference back into the object that produced it.
#[derive(Clone, Debug)]
pub struct StreamPageCursor {
    pub stream: String,
    pub from_version: i64,
    pub max_count: u64,
    pub direction: ReadDirection,
    pub prefetch: bool,
}

#[derive(Clone, Debug)]
pub struct ReadStreamPage {
    pub status: PageReadStatus,
    pub stream_original: String,
    pub from_version: i64,
    pub messages: Vec<StoredMessage>,
    pub is_end: bool,
    pub last_stream_version: i64,
    pub last_stream_position: i64,
    pub next: StreamPageCursor,
}

/// Bind parameters for re-entering `read_all_*` at the next page.
#[derive(Clone, Debug)]
pub struct AllPageCursor {
    pub from_position: i64,
    pub max_count: u64,
    pub direction: ReadDirection,
    pub prefetch: bool,
}

#[derive(Clone, Debug)]
pub struct ReadAllPage {
    pub from_position: i64,
    pub messages: Vec<StoredMessage>,
    pub is_end: bool,
    pub next: AllPageCursor,
}

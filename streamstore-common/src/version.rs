use std::fmt::Display;

/// A caller's belief about a stream's head at append/delete time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ExpectedVersion {
    /// Stream must not exist, or exist with zero messages.
    NoStream,
    /// Stream must exist with exactly zero messages.
    EmptyStream,
    /// No check performed.
    Any,
    /// Stream's current highest `stream_version` must equal this value.
    Exact(u64),
}

impl Display for ExpectedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedVersion::Exact(v) => write!(f, "{v}"),
            ExpectedVersion::NoStream => write!(f, "'no stream'"),
            ExpectedVersion::EmptyStream => write!(f, "'empty stream'"),
            ExpectedVersion::Any => write!(f, "'any'"),
        }
    }
}

/// Sentinels for `from_version` in stream reads.
pub mod stream_version {
    /// First message of a stream.
    pub const START: i64 = 0;
    /// Latest message, used only for backward reads.
    pub const END: i64 = -1;
}

/// Sentinels for `from_position` in all-stream reads.
pub mod position {
    /// Beginning of the global log.
    pub const START: i64 = 0;
    /// End of the global log.
    pub const END: i64 = -1;
}

/// Builder-style configuration for `EventStore`.
#[derive(Debug, Clone)]
pub struct EventStoreOptions {
    max_page_size: u64,
}

impl Default for EventStoreOptions {
    fn default() -> Self {
        Self {
            max_page_size: 4_096,
        }
    }
}

impl EventStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for more than this many rows in a single page are clamped
    /// down to it; the core never issues an unbounded backend query.
    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }
}

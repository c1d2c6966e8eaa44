/// Read direction, shared between per-stream and all-stream paging.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadDirection {
    Forward,
    Backward,
}

mod driver;
mod memory;

pub use driver::{
    AppendOutcome, DeleteStreamOutcome, DriverError, StorageDriver, StreamPageResult,
};
pub use memory::InMemoryDriver;

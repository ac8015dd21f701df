//! Save stats persistence.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStatsStore;
pub use memory::InMemoryStatsStore;

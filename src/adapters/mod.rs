// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

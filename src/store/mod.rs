//! Record storage: the store contract and the bundled in-memory backend

pub mod memory;
pub mod records;

pub use memory::MemoryStore;
pub use records::{EventKind, GameEvent, HistoryRecord, RecordStore, StoreError};

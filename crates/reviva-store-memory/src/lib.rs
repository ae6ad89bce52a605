//! In-memory backend for the Reviva customer store.
//!
//! State lives for the lifetime of the process. All access goes through a
//! single async `RwLock`, held only for the duration of each operation.

mod store;

pub use store::MemoryStore;

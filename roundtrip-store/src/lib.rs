//! Key/value store used by the response cache.
//!
//! If you want to keep cached responses somewhere else, implement
//! [`CacheStore`] for it. The store knows nothing about HTTP: keys are
//! strings, values are opaque bytes (the serialized response).
mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{CacheStore, StoreResult};

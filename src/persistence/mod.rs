//! Progress persistence
//!
//! A last-write-wins key/value mapping. The simulation never depends on a
//! write succeeding: failures are logged and the run continues in memory.

pub mod store;

pub use store::{JsonFileStore, MemoryStore, ProgressStore, StoreError};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;

//! Persisted slot storage
//!
//! The zone never touches browser storage directly. It talks to a
//! [`StatePort`]: a string-keyed store with `get`, `set` and `clear`, scoped
//! to one origin. `LocalStore` backs it with `window.localStorage`;
//! `MemoryStore` is the in-process fake used by tests and the native demo.

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(not(target_arch = "wasm32"))]
mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
#[cfg(not(target_arch = "wasm32"))]
pub use memory::MemoryStore;

use thiserror::Error;

/// Failure reported by a storage backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Storage is disabled or absent (private mode, sandboxed frame)
    #[error("storage is unavailable")]
    Unavailable,
    /// The write would exceed the origin's quota
    #[error("storage quota exceeded writing {len} bytes to `{key}`")]
    QuotaExceeded { key: String, len: usize },
    /// Any other rejection raised by the backend
    #[error("storage rejected the operation: {0}")]
    Rejected(String),
}

/// Origin-scoped string store
pub trait StatePort {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop every entry in the store, not only the zone's slot
    fn clear(&mut self) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

//! Stateful Zone - editable page regions that survive reloads
//!
//! Core modules:
//! - `zone`: Marks the editable set, saves on input, restores on load
//! - `persistence`: Origin-scoped string store (LocalStorage on web)
//! - `platform`: Browser/in-memory page abstraction
//! - `settings`: Container id, marker class and storage key

pub mod persistence;
pub mod platform;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod zone;

#[cfg(not(target_arch = "wasm32"))]
pub use persistence::MemoryStore;
pub use persistence::{StatePort, StoreError};
#[cfg(not(target_arch = "wasm32"))]
pub use platform::MemoryPage;
pub use platform::{InputHandler, Page, PageError};
pub use settings::{Settings, SettingsError};
pub use zone::{
    MarkReport, SharedZone, StartupState, StatefulZone, ZoneError, init, mark, save_handler, start,
};

/// Identifiers the page markup uses by default
pub mod consts {
    /// Element whose inner markup is the persisted state
    pub const CONTAINER_ID: &str = "state-zone";
    /// Class marking an element as user-editable
    pub const MARKER_CLASS: &str = "stateful";
    /// LocalStorage key of the persisted slot
    pub const STORAGE_KEY: &str = "state";
}

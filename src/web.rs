//! Browser entry points
//!
//! Exported under the names page markup already calls: `init` on load,
//! `reset` from a button, and `bulksave` / `bulkrestore` / `stateful` for
//! manual wiring. Errors are logged to the console and never thrown, so a
//! page with storage disabled keeps working without persistence.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStore;
use crate::platform::WebPage;
use crate::settings::Settings;
use crate::zone::{self, SharedZone};

type BrowserZone = SharedZone<WebPage, LocalStore>;

thread_local! {
    static ZONE: RefCell<Option<BrowserZone>> = const { RefCell::new(None) };
}

fn install_logging() {
    console_error_panic_hook::set_once();
    // Already installed when the page calls init more than once
    let _ = console_log::init_with_level(log::Level::Info);
}

fn current() -> Option<BrowserZone> {
    let zone = ZONE.with(|z| z.borrow().clone());
    if zone.is_none() {
        log::warn!("stateful-zone used before init()");
    }
    zone
}

fn start(settings: Settings) {
    let page = match WebPage::current() {
        Ok(page) => page,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return;
        }
    };
    let shared = zone::start(settings, page, LocalStore::open());
    ZONE.with(|z| *z.borrow_mut() = Some(shared));
}

/// Run the page-load sequence with the default identifiers
#[wasm_bindgen]
pub fn init() {
    install_logging();
    start(Settings::default());
}

/// Run the page-load sequence with identifiers overridden by `json`.
/// Rejected settings are logged and the defaults are used instead.
#[wasm_bindgen]
pub fn init_with_settings(json: &str) {
    install_logging();
    start(Settings::from_json_or_default(json));
}

#[wasm_bindgen(js_name = bulksave)]
pub fn bulk_save() {
    let Some(shared) = current() else { return };
    if let Err(e) = shared.borrow_mut().save() {
        log::warn!("Save failed: {}", e);
    }
}

/// Replace the container with the saved slot. Does not re-mark; call
/// `stateful` afterwards.
#[wasm_bindgen(js_name = bulkrestore)]
pub fn bulk_restore() -> bool {
    let Some(shared) = current() else { return false };
    let restored = shared.borrow_mut().restore();
    restored.unwrap_or_else(|e| {
        log::warn!("Restore failed: {}", e);
        false
    })
}

/// Mark the editable set; returns the number of marked elements
#[wasm_bindgen]
pub fn stateful() -> usize {
    let Some(shared) = current() else { return 0 };
    zone::mark(&shared).marked
}

#[wasm_bindgen]
pub fn reset() {
    let Some(shared) = current() else { return };
    if let Err(e) = shared.borrow_mut().reset() {
        log::warn!("Reset could not clear storage: {}", e);
    }
}

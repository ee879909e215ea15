use wasm_bindgen::JsValue;

use super::{StatePort, StoreError};

/// [`StatePort`] over `window.localStorage`
///
/// Opening never fails. Without LocalStorage (disabled, sandboxed frame)
/// every operation reports [`StoreError::Unavailable`], so the zone still
/// marks the page and only persistence is lost.
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    /// Open the origin's LocalStorage
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, edits will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

/// Map a thrown DOMException onto a [`StoreError`]
fn classify(err: JsValue, key: &str, len: usize) -> StoreError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default();
    match name.as_str() {
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StoreError::QuotaExceeded {
            key: key.to_string(),
            len,
        },
        "SecurityError" => StoreError::Unavailable,
        _ => StoreError::Rejected(err.as_string().unwrap_or(name)),
    }
}

impl StatePort for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| classify(e, key, 0))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| classify(e, key, value.len()))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.storage()?.clear().map_err(|e| classify(e, "", 0))
    }
}

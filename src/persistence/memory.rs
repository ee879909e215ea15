use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{StatePort, StoreError};

/// In-memory [`StatePort`]
///
/// Clones share one backing map, the way every page of an origin shares
/// `localStorage`. Hand a clone to a rebuilt zone to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    /// Total bytes of values allowed; `None` means unbounded
    quota: Option<usize>,
    unavailable: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once the stored values exceed `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().quota = Some(quota);
        store
    }

    /// Make every operation fail with [`StoreError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Read an entry bypassing availability checks
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl StatePort for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(StoreError::Unavailable);
        }
        if let Some(quota) = inner.quota {
            let others: usize = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    len: value.len(),
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(StoreError::Unavailable);
        }
        inner.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("state", "<p>one</p>").unwrap();
        store.set("state", "<p>two</p>").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("<p>two</p>"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let mut store = MemoryStore::new();
        let other = store.clone();
        store.set("state", "shared").unwrap();
        assert_eq!(other.get("state").unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_clear_drops_every_key() {
        let mut store = MemoryStore::new();
        store.set("state", "a").unwrap();
        store.set("theme", "dark").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(!store.contains("state").unwrap());
    }

    #[test]
    fn test_quota_rejects_and_keeps_old_value() {
        let mut store = MemoryStore::with_quota(8);
        store.set("state", "small").unwrap();
        let err = store.set("state", "far too large").unwrap_err();
        assert_eq!(
            err,
            StoreError::QuotaExceeded {
                key: "state".to_string(),
                len: 13
            }
        );
        assert_eq!(store.peek("state").as_deref(), Some("small"));
    }

    #[test]
    fn test_unavailable_store() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        assert_eq!(store.get("state"), Err(StoreError::Unavailable));
        assert_eq!(store.set("state", "x"), Err(StoreError::Unavailable));
        assert_eq!(store.clear(), Err(StoreError::Unavailable));
    }
}

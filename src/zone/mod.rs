//! Editable zone manager
//!
//! Ties a [`Page`] to a [`StatePort`]: marks the editable set, saves the
//! container on every input, restores it at startup and resets on demand.
//!
//! In the browser the zone is shared between the startup code and every
//! input listener, so it lives in an `Rc<RefCell<_>>` ([`SharedZone`]).
//! Listeners hold a `Weak` and never keep the zone alive.

mod startup;

pub use startup::{StartupState, init, mark, start};

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::persistence::{StatePort, StoreError};
use crate::platform::{InputHandler, Page, PageError};
use crate::settings::Settings;

pub type SharedZone<P, S> = Rc<RefCell<StatefulZone<P, S>>>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ZoneError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Outcome of one marking pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkReport {
    /// Elements carrying the marker class
    pub marked: usize,
    /// Elements that received a handler on this pass
    pub attached: usize,
}

pub struct StatefulZone<P, S> {
    settings: Settings,
    page: P,
    store: S,
}

impl<P: Page, S: StatePort> StatefulZone<P, S> {
    pub fn new(settings: Settings, page: P, store: S) -> Self {
        Self {
            settings,
            page,
            store,
        }
    }

    pub fn into_shared(self) -> SharedZone<P, S> {
        Rc::new(RefCell::new(self))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Make every marker-class element editable and give each element one
    /// input handler. The set is queried fresh on every call. Elements
    /// that already carry a handler keep it; nothing is attached twice.
    pub fn mark_editable(&mut self, on_input: &InputHandler) -> MarkReport {
        let elements = self.page.query_marked(&self.settings.marker_class);
        let mut report = MarkReport {
            marked: elements.len(),
            attached: 0,
        };
        for element in &elements {
            self.page.set_editable(element);
            if !self.page.has_input_handler(element) {
                self.page.attach_input_handler(element, on_input.clone());
                report.attached += 1;
            }
        }
        log::debug!(
            "Marked {} editable ({} new handlers)",
            report.marked,
            report.attached
        );
        report
    }

    /// Write the container's markup verbatim into the persisted slot
    pub fn save(&mut self) -> Result<(), ZoneError> {
        let markup = self.page.container_markup(&self.settings.container_id)?;
        self.store.set(&self.settings.storage_key, &markup)?;
        log::debug!("Saved {} bytes to `{}`", markup.len(), self.settings.storage_key);
        Ok(())
    }

    /// Overwrite the container with the persisted slot, if there is one.
    /// Returns whether markup was replaced. Replaced elements lose their
    /// editability, so callers re-run [`mark_editable`](Self::mark_editable).
    pub fn restore(&mut self) -> Result<bool, ZoneError> {
        let Some(markup) = self.store.get(&self.settings.storage_key)? else {
            return Ok(false);
        };
        self.page
            .replace_container_markup(&self.settings.container_id, &markup)?;
        log::debug!("Restored {} bytes from `{}`", markup.len(), self.settings.storage_key);
        Ok(true)
    }

    /// Whether a persisted slot exists
    pub fn has_saved_state(&self) -> Result<bool, ZoneError> {
        Ok(self.store.contains(&self.settings.storage_key)?)
    }

    /// Clear all persisted state and reload the page. The reload happens
    /// even when clearing fails, so the page still returns to its source
    /// markup for this load.
    pub fn reset(&mut self) -> Result<(), ZoneError> {
        let cleared = self.store.clear();
        log::info!("Resetting saved state and reloading");
        self.page.reload();
        cleared?;
        Ok(())
    }
}

/// Input handler that saves `zone` on each call. Failures are logged and
/// swallowed: an edit that cannot be stored simply stays unsaved.
pub fn save_handler<P, S>(zone: &SharedZone<P, S>) -> InputHandler
where
    P: Page + 'static,
    S: StatePort + 'static,
{
    let weak = Rc::downgrade(zone);
    Rc::new(move || {
        let Some(zone) = weak.upgrade() else {
            return;
        };
        let Ok(mut zone) = zone.try_borrow_mut() else {
            log::warn!("Input arrived while the zone was busy; edit not saved");
            return;
        };
        if let Err(e) = zone.save() {
            log::warn!("Edit not saved: {}", e);
        }
    })
}

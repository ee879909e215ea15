use super::{MarkReport, SharedZone, StatefulZone, ZoneError, save_handler};
use crate::persistence::StatePort;
use crate::platform::Page;
use crate::settings::Settings;

/// Where a page load ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    /// No persisted slot; the page shows its source markup
    Fresh,
    /// The persisted slot replaced the container markup
    Restored,
}

impl StartupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartupState::Fresh => "fresh",
            StartupState::Restored => "restored",
        }
    }
}

/// Page-load sequence: mark the editable set, then restore the persisted
/// slot if one exists and mark again, since the restored markup holds new
/// elements. Run once per page load.
pub fn init<P, S>(zone: &SharedZone<P, S>) -> Result<StartupState, ZoneError>
where
    P: Page + 'static,
    S: StatePort + 'static,
{
    let handler = save_handler(zone);
    let mut zone = zone.borrow_mut();

    zone.mark_editable(&handler);
    if !zone.has_saved_state()? {
        log::info!("No saved state, page is fresh");
        return Ok(StartupState::Fresh);
    }

    zone.restore()?;
    let report = zone.mark_editable(&handler);
    log::info!("Restored saved state ({} editable elements)", report.marked);
    Ok(StartupState::Restored)
}

/// Build a zone and run [`init`] on it. Startup failures are logged and
/// the zone is returned regardless: the page stays editable even when the
/// store cannot be read, and later edits fail to save quietly.
pub fn start<P, S>(settings: Settings, page: P, store: S) -> SharedZone<P, S>
where
    P: Page + 'static,
    S: StatePort + 'static,
{
    let shared = StatefulZone::new(settings, page, store).into_shared();
    match init(&shared) {
        Ok(state) => log::info!("stateful-zone ready ({})", state.as_str()),
        Err(e) => log::warn!("Startup incomplete: {}", e),
    }
    shared
}

/// Re-run marking on a shared zone, e.g. after a manual restore
pub fn mark<P, S>(zone: &SharedZone<P, S>) -> MarkReport
where
    P: Page + 'static,
    S: StatePort + 'static,
{
    let handler = save_handler(zone);
    zone.borrow_mut().mark_editable(&handler)
}

//! Stateful Zone native demo
//!
//! The browser build is driven by the page (`init()` on load). Natively
//! there is no DOM, so this runs one scripted session against the
//! in-memory page and store and logs every step.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Stateful Zone (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the exported `init`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use stateful_zone::{
        MemoryPage, MemoryStore, Page, Settings, SharedZone, StatefulZone, ZoneError, init,
    };

    type SharedMemoryZone = SharedZone<MemoryPage, MemoryStore>;

    const SOURCE: &str = r#"<h1 class="stateful">Notes</h1><p class="stateful">hello</p>"#;

    fn load(store: &MemoryStore) -> SharedMemoryZone {
        let settings = Settings::default();
        let page = MemoryPage::new(settings.container_id.clone(), SOURCE);
        StatefulZone::new(settings, page, store.clone()).into_shared()
    }

    fn markup(zone: &SharedMemoryZone) -> Result<String, ZoneError> {
        let zone = zone.borrow();
        Ok(zone
            .page()
            .container_markup(&zone.settings().container_id)?)
    }

    pub fn run() -> Result<(), ZoneError> {
        let store = MemoryStore::new();

        let zone = load(&store);
        log::info!("First load: {}", init(&zone)?.as_str());

        let handler = {
            let mut z = zone.borrow_mut();
            let marker = z.settings().marker_class.clone();
            let paragraph = z.page().query_marked(&marker).get(1).copied();
            paragraph.and_then(|el| z.page_mut().user_edit(&el, "world"))
        };
        if let Some(handler) = handler {
            handler();
        }
        log::info!("After edit: {}", markup(&zone)?);

        let zone = load(&store);
        log::info!("Reload: {} -> {}", init(&zone)?.as_str(), markup(&zone)?);

        zone.borrow_mut().reset()?;
        let zone = load(&store);
        log::info!("After reset: {} -> {}", init(&zone)?.as_str(), markup(&zone)?);
        Ok(())
    }
}

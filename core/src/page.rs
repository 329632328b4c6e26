//! Render targets: HTML containers addressed by id.
//!
//! The host mounts containers; loaders only replace their content. Each
//! container carries a load generation so that a load which has been
//! superseded by a newer one for the same container cannot overwrite it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Container {
    html: String,
    loading: bool,
    generation: u64,
}

/// Identifies one load against one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    containers: Arc<Mutex<HashMap<String, Container>>>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the given containers already mounted.
    pub fn with_containers<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let page = Self::new();
        for id in ids {
            page.mount(id);
        }
        page
    }

    /// Mount an empty container. Mounting an existing id is a no-op.
    pub fn mount(&self, id: &str) {
        self.lock().entry(id.to_string()).or_default();
    }

    pub fn unmount(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.lock().get(id).map(|c| c.html.clone())
    }

    pub fn is_loading(&self, id: &str) -> Option<bool> {
        self.lock().get(id).map(|c| c.loading)
    }

    /// Replace a container's content outside of any load. Returns false when
    /// the container is not mounted.
    pub fn set_html(&self, id: &str, html: impl Into<String>) -> bool {
        match self.lock().get_mut(id) {
            Some(container) => {
                container.html = html.into();
                true
            }
            None => false,
        }
    }

    /// Start a load: flag the container, write the placeholder and claim the
    /// next generation. `None` when the container is not mounted.
    pub(crate) fn begin_load(&self, id: &str, placeholder: String) -> Option<LoadTicket> {
        let mut containers = self.lock();
        let container = containers.get_mut(id)?;
        container.generation += 1;
        container.loading = true;
        container.html = placeholder;
        Some(LoadTicket {
            generation: container.generation,
        })
    }

    /// Finish a load with its final markup. Ignored (returns false) when a
    /// newer load has started on the container since `ticket` was issued.
    pub(crate) fn finish_load(&self, id: &str, ticket: LoadTicket, html: String) -> bool {
        let mut containers = self.lock();
        match containers.get_mut(id) {
            Some(container) if container.generation == ticket.generation => {
                container.html = html;
                container.loading = false;
                true
            }
            _ => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Container>> {
        self.containers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_container_cannot_start_a_load() {
        let page = Page::new();
        assert!(page.begin_load("customersContainer", "…".into()).is_none());
        assert!(!page.set_html("customersContainer", "x"));
    }

    #[test]
    fn load_lifecycle_flags_and_replaces_content() {
        let page = Page::with_containers(["list"]);
        let ticket = page.begin_load("list", "loading".into()).unwrap();
        assert_eq!(page.is_loading("list"), Some(true));
        assert_eq!(page.html("list").as_deref(), Some("loading"));

        assert!(page.finish_load("list", ticket, "<table></table>".into()));
        assert_eq!(page.is_loading("list"), Some(false));
        assert_eq!(page.html("list").as_deref(), Some("<table></table>"));
    }

    #[test]
    fn superseded_load_does_not_write() {
        let page = Page::with_containers(["list"]);
        let old = page.begin_load("list", "loading".into()).unwrap();
        let new = page.begin_load("list", "loading".into()).unwrap();

        assert!(page.finish_load("list", new, "new".into()));
        assert!(!page.finish_load("list", old, "old".into()));
        assert_eq!(page.html("list").as_deref(), Some("new"));
    }

    #[test]
    fn mount_is_idempotent() {
        let page = Page::with_containers(["a"]);
        page.set_html("a", "kept");
        page.mount("a");
        assert_eq!(page.html("a").as_deref(), Some("kept"));
        assert!(page.unmount("a"));
        assert!(!page.contains("a"));
    }
}

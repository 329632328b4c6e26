//! Injected UI services: transient notifications and the loading indicator.
//!
//! # Design
//! There is one loading indicator per `UiService` (clones share it). It is
//! reference-counted: `begin()` hands out a `LoadingGuard`, the indicator is
//! visible while any guard is alive, and dropping a guard is the only way to
//! release it, so every exit path of a request hides it again. Overlapping
//! requests keep the single indicator visible until the last one finishes.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Receives transient notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!(text = %notification.message, "notification"),
            NotificationLevel::Warning => tracing::warn!(text = %notification.message, "notification"),
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(level = %notification.level, text = %notification.message, "notification")
            }
        }
    }
}

/// Keeps every notification in memory until drained.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Point-in-time view of the loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinnerSnapshot {
    pub visible: bool,
    pub depth: usize,
    /// Number of hidden → visible transitions so far.
    pub shown: usize,
    /// Number of visible → hidden transitions so far.
    pub hidden: usize,
}

#[derive(Debug, Default)]
struct SpinnerState {
    depth: usize,
    shown: usize,
    hidden: usize,
}

#[derive(Clone)]
pub struct UiService {
    notifier: Arc<dyn Notifier>,
    spinner: Arc<Mutex<SpinnerState>>,
}

impl fmt::Debug for UiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiService")
            .field("spinner", &self.spinner())
            .finish_non_exhaustive()
    }
}

impl Default for UiService {
    fn default() -> Self {
        Self::new(Arc::new(TracingNotifier))
    }
}

impl UiService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            spinner: Arc::new(Mutex::new(SpinnerState::default())),
        }
    }

    /// A service recording into a fresh `NotificationLog`, returned alongside.
    pub fn recording() -> (Self, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        (Self::new(log.clone()), log)
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.notifier.notify(Notification {
            level,
            message: message.into(),
        });
    }

    /// Show the loading indicator until the returned guard is dropped.
    pub fn begin(&self) -> LoadingGuard {
        let mut state = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.depth == 0 {
            state.shown += 1;
            tracing::trace!("loading indicator shown");
        }
        state.depth += 1;
        LoadingGuard {
            spinner: self.spinner.clone(),
        }
    }

    pub fn spinner(&self) -> SpinnerSnapshot {
        let state = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        SpinnerSnapshot {
            visible: state.depth > 0,
            depth: state.depth,
            shown: state.shown,
            hidden: state.hidden,
        }
    }
}

/// Keeps the loading indicator visible while alive.
#[must_use = "the loading indicator is hidden as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    spinner: Arc<Mutex<SpinnerState>>,
}

impl LoadingGuard {
    /// Explicit release; equivalent to dropping the guard.
    pub fn end(self) {}
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.hidden += 1;
            tracing::trace!("loading indicator hidden");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_shows_then_hides_once() {
        let (ui, _) = UiService::recording();
        let guard = ui.begin();
        assert!(ui.spinner().visible);
        guard.end();
        assert_eq!(
            ui.spinner(),
            SpinnerSnapshot {
                visible: false,
                depth: 0,
                shown: 1,
                hidden: 1
            }
        );
    }

    #[test]
    fn overlapping_guards_share_one_indicator() {
        let (ui, _) = UiService::recording();
        let first = ui.begin();
        let second = ui.clone().begin();
        assert_eq!(ui.spinner().depth, 2);
        drop(first);
        assert!(ui.spinner().visible, "still visible while one request is in flight");
        drop(second);
        let snapshot = ui.spinner();
        assert!(!snapshot.visible);
        assert_eq!((snapshot.shown, snapshot.hidden), (1, 1));
    }

    #[test]
    fn notifications_are_recorded_in_order() {
        let (ui, log) = UiService::recording();
        ui.notify(NotificationLevel::Info, "Deleting customer...");
        ui.notify(NotificationLevel::Success, "Customer deleted");
        assert_eq!(log.count(NotificationLevel::Success), 1);
        let entries = log.take();
        assert_eq!(entries[0].message, "Deleting customer...");
        assert_eq!(entries[1].level, NotificationLevel::Success);
        assert!(log.entries().is_empty());
    }
}

//! External collaborators of the access gate: navigation and notification.
//!
//! Adapters only talk to these traits, so they can be driven by the router
//! in the browser, by the CLI, or by in-memory doubles in tests.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// How a redirect should touch the history stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RedirectOptions {
    /// Replace the current entry instead of pushing a new one.
    pub replace: bool,
}

impl RedirectOptions {
    pub fn push() -> Self {
        Self { replace: false }
    }

    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Navigation service.
pub trait Navigator {
    fn redirect(&self, path: &str, options: RedirectOptions);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn redirect(&self, path: &str, options: RedirectOptions) {
        (**self).redirect(path, options)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-visible notification (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Notification service.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// In-process browser-style history.
///
/// Starts with a single entry; `push` appends, `replace` overwrites the
/// current entry, `back` pops.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(vec![initial.into()]),
        }
    }

    /// Simulate the user following a link.
    pub fn visit(&self, path: impl Into<String>) {
        self.entries.borrow_mut().push(path.into());
    }

    pub fn current(&self) -> String {
        self.entries.borrow().last().cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Go back one entry; returns the new current path, if any.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.entries.borrow_mut();
        if entries.len() <= 1 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }

    /// Whether pressing back (any number of times) could land on `path`.
    pub fn can_go_back_to(&self, path: &str) -> bool {
        let entries = self.entries.borrow();
        let n = entries.len().saturating_sub(1);
        entries[..n].iter().any(|e| e == path)
    }
}

impl Navigator for MemoryHistory {
    fn redirect(&self, path: &str, options: RedirectOptions) {
        let mut entries = self.entries.borrow_mut();
        if options.replace && !entries.is_empty() {
            let last = entries.len() - 1;
            entries[last] = path.to_string();
        } else {
            entries.push(path.to_string());
        }
    }
}

/// Collects notifications instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.borrow_mut().push(notification);
    }
}

/// Emits notifications as log events.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Info => info!(title = %n.title, "{}", n.description),
            Severity::Warning => warn!(title = %n.title, "{}", n.description),
            Severity::Error => error!(title = %n.title, "{}", n.description),
        }
    }
}

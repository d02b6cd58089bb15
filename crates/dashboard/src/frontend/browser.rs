//! Browser-backed collaborators: localStorage session, router navigation, alerts.

use std::rc::Rc;

use chrono::Utc;
use leptos::*;
use leptos_router::{NavigateOptions, use_navigate};

use bizdash_auth::SessionState;

use crate::services::{Navigator, Notification, Notifier, RedirectOptions};

pub const SESSION_STORAGE_KEY: &str = "bizdash.session";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the persisted session (fail safe: anything unreadable is anonymous).
pub fn load_persisted_session() -> SessionState {
    let raw = storage().and_then(|s| s.get_item(SESSION_STORAGE_KEY).ok().flatten());
    SessionState::from_persisted(raw.as_deref(), Utc::now())
}

/// Forget the persisted session and publish the logout.
pub fn logout(session: RwSignal<SessionState>) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(SESSION_STORAGE_KEY);
    }
    session.set(SessionState::Anonymous);
}

/// Navigator backed by `leptos_router`. Must be created inside a `<Router>`.
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let navigate = use_navigate();
        Self {
            navigate: Rc::new(move |path, options| navigate(path, options)),
        }
    }
}

impl Navigator for RouterNavigator {
    fn redirect(&self, path: &str, options: RedirectOptions) {
        (self.navigate)(
            path,
            NavigateOptions {
                replace: options.replace,
                ..Default::default()
            },
        );
    }
}

/// Shows notifications with `window.alert`.
#[derive(Debug, Default, Copy, Clone)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, n: Notification) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(&format!("{}: {}", n.title, n.description));
        }
    }
}

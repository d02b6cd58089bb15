//! Imperative guard: navigate and notify on denial.

use tracing::debug;

use bizdash_auth::{AccessDecision, AccessRequirement, DenialReason, SessionState, evaluate};

use crate::config::GateConfig;
use crate::routes::ProtectedRegion;
use crate::services::{Navigator, Notification, Notifier, RedirectOptions, Severity};

/// What the guard renders for the current pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardView {
    /// Session still loading: render nothing and wait.
    Pending,
    /// Access allowed: render the protected children.
    Children,
    /// Access denied (or unmounted): render nothing.
    Nothing,
}

impl GuardView {
    pub fn renders_children(&self) -> bool {
        matches!(self, Self::Children)
    }
}

/// The notification shown for a denial.
///
/// Anonymous visitors are silently sent to login; only authenticated
/// denials are announced.
pub fn denial_notification(reason: &DenialReason) -> Option<Notification> {
    (!reason.is_anonymous()).then(|| Notification {
        title: "Access denied".to_string(),
        description: reason.describe(),
        severity: Severity::Error,
    })
}

/// Inputs the guard's effect depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EffectInputs {
    session: SessionState,
    requirement: AccessRequirement,
    fallback_path: Option<String>,
}

/// Guard that performs side effects on denial.
///
/// Every render re-evaluates, but navigation and notification fire only when
/// the session, requirement or fallback path actually changed since the last
/// pass, and never after `unmount`. Authenticated denials get a notification
/// naming what is missing; anonymous redirects to login are silent.
pub struct PermissionGuard<N, T> {
    navigator: N,
    notifier: T,
    config: GateConfig,
    last: Option<EffectInputs>,
    mounted: bool,
}

impl<N: Navigator, T: Notifier> PermissionGuard<N, T> {
    pub fn new(navigator: N, notifier: T, config: GateConfig) -> Self {
        Self {
            navigator,
            notifier,
            config,
            last: None,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear down: no effect fires after this.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn render(&mut self, session: &SessionState, region: &ProtectedRegion) -> GuardView {
        if !self.mounted {
            return GuardView::Nothing;
        }

        let inputs = EffectInputs {
            session: session.clone(),
            requirement: region.requirement.clone(),
            fallback_path: region.fallback_path.clone(),
        };
        let changed = self.last.as_ref() != Some(&inputs);
        self.last = Some(inputs);

        if session.is_loading() {
            return GuardView::Pending;
        }

        let options = self.config.options(region.fallback_path.as_deref());
        match evaluate(session.actor(), &region.requirement, &options) {
            AccessDecision::Allow => GuardView::Children,
            AccessDecision::DenyRedirect { path, reason } => {
                if changed {
                    if let Some(notification) = denial_notification(&reason) {
                        self.notifier.notify(notification);
                    }
                    debug!(to = %path, "guard redirecting");
                    self.navigator.redirect(&path, RedirectOptions::push());
                }
                GuardView::Nothing
            }
            AccessDecision::DenyRender { .. } => GuardView::Nothing,
        }
    }
}

//! Route redirect wrapper.

use bizdash_auth::{AccessDecision, SessionState, evaluate};

use crate::config::GateConfig;
use crate::routes::ProtectedRegion;
use crate::services::{Navigator, RedirectOptions};

/// Navigation instruction for a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Session still loading: render nothing, do not navigate.
    Pending,
    /// Render the protected subtree.
    Render,
    /// Replace the current history entry with `to`.
    Redirect { to: String },
}

/// Resolve a protected route without touching navigation.
pub fn resolve(session: &SessionState, region: &ProtectedRegion, config: &GateConfig) -> RouteOutcome {
    if session.is_loading() {
        return RouteOutcome::Pending;
    }

    let options = config.options(region.fallback_path.as_deref());
    match evaluate(session.actor(), &region.requirement, &options) {
        AccessDecision::Allow => RouteOutcome::Render,
        AccessDecision::DenyRedirect { path, .. } => RouteOutcome::Redirect { to: path },
        AccessDecision::DenyRender { .. } => RouteOutcome::Redirect {
            to: options.deny_path().to_string(),
        },
    }
}

/// Resolve and apply: denials replace the current entry so the denied page
/// is never reachable with "back".
pub fn enforce<N: Navigator>(
    navigator: &N,
    session: &SessionState,
    region: &ProtectedRegion,
    config: &GateConfig,
) -> RouteOutcome {
    let outcome = resolve(session, region, config);
    if let RouteOutcome::Redirect { to } = &outcome {
        navigator.redirect(to, RedirectOptions::replace());
    }
    outcome
}

//! Conditional visibility for inline elements.
//!
//! Denial here is an expected, silent state: no navigation, no notification.

use bizdash_auth::{AccessDecision, AccessRequirement, GateOptions, SessionState, evaluate};

/// Which branch an inline gated element shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Session loading: show nothing yet.
    Hidden,
    Children,
    Fallback,
}

pub fn visibility(session: &SessionState, requirement: &AccessRequirement) -> Visibility {
    if session.is_loading() {
        return Visibility::Hidden;
    }

    // Redirect targets are irrelevant here; only allow/deny matters.
    match evaluate(session.actor(), requirement, &GateOptions::default()).into_render(()) {
        AccessDecision::Allow => Visibility::Children,
        _ => Visibility::Fallback,
    }
}

/// Pick children or the fallback (default: nothing).
pub fn gated<T>(
    session: &SessionState,
    requirement: &AccessRequirement,
    children: impl FnOnce() -> T,
    fallback: Option<impl FnOnce() -> T>,
) -> Option<T> {
    match visibility(session, requirement) {
        Visibility::Hidden => None,
        Visibility::Children => Some(children()),
        Visibility::Fallback => fallback.map(|f| f()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdash_auth::{Actor, Role};
    use bizdash_core::ActorId;

    fn delete_button() -> AccessRequirement {
        AccessRequirement::permission("manage_employees")
    }

    #[test]
    fn allowed_renders_children() {
        let admin = SessionState::Authenticated(Actor::new(ActorId::new(), Role::ADMIN));
        let out = gated(&admin, &delete_button(), || "delete", Some(|| "read-only"));
        assert_eq!(out, Some("delete"));
    }

    #[test]
    fn denied_renders_fallback_or_nothing() {
        let employee = SessionState::Authenticated(Actor::new(ActorId::new(), Role::EMPLOYEE));
        assert_eq!(
            gated(&employee, &delete_button(), || "delete", Some(|| "read-only")),
            Some("read-only")
        );
        assert_eq!(gated(&employee, &delete_button(), || "delete", None::<fn() -> &'static str>), None);
        assert_eq!(gated(&SessionState::Anonymous, &delete_button(), || 1, Some(|| 2)), Some(2));
    }

    #[test]
    fn loading_shows_nothing_not_even_fallback() {
        assert_eq!(visibility(&SessionState::Loading, &delete_button()), Visibility::Hidden);
        assert_eq!(gated(&SessionState::Loading, &delete_button(), || 1, Some(|| 2)), None);
    }
}

//! Session source for the access gate.
//!
//! The gate never reaches into ambient storage: adapters receive a
//! `SessionState` (or a `SessionProvider`) explicitly.

use std::sync::{Mutex, mpsc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use bizdash_core::{ActorId, CoreError, CoreResult};

use crate::{Actor, PermissionKey, Role};

/// What the session provider currently knows about the actor.
///
/// `Loading` is distinct from `Anonymous`: adapters render nothing while
/// loading instead of flashing denied content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Anonymous,
    Authenticated(Actor),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Session shape as persisted by the auth provider (`{ user, role, permissions }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: PersistedUser,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub id: String,
}

impl PersistedSession {
    pub fn from_actor(actor: &Actor, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            user: PersistedUser {
                id: actor.id.to_string(),
            },
            role: actor.role().map(|r| r.as_str().to_string()),
            permissions: Some(actor.permissions.iter().map(|p| p.as_str().to_string()).collect()),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Convert into an actor. Missing role/permissions grant nothing.
    pub fn into_actor(self) -> CoreResult<Actor> {
        if self.user.id.trim().is_empty() {
            return Err(CoreError::malformed_session("session has no user id"));
        }
        let id: ActorId = self.user.id.parse()?;
        let role = self
            .role
            .filter(|r| !r.trim().is_empty())
            .map(Role::new);

        let permissions = self
            .permissions
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(PermissionKey::new)
            .collect();

        Ok(Actor {
            id,
            role,
            permissions,
        })
    }
}

impl SessionState {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Authenticated(actor) => Some(actor),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Strictly parse persisted session data.
    ///
    /// Blank input and JSON `null` mean "no session". An expired session
    /// restores as anonymous.
    pub fn parse_persisted(raw: &str, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "null" {
            return Ok(Self::Anonymous);
        }

        let persisted: PersistedSession = serde_json::from_str(raw)?;
        if persisted.is_expired(now) {
            info!(user_id = %persisted.user.id, "persisted session expired");
            return Ok(Self::Anonymous);
        }

        Ok(Self::Authenticated(persisted.into_actor()?))
    }

    /// Restore a session from storage, failing safe.
    ///
    /// Anything that cannot be parsed becomes `Anonymous`; it never errors
    /// and never grants access.
    pub fn from_persisted(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = raw else {
            return Self::Anonymous;
        };

        match Self::parse_persisted(raw, now) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "discarding malformed persisted session");
                Self::Anonymous
            }
        }
    }
}

/// Change feed of a session provider.
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: mpsc::Receiver<SessionState>,
}

impl SessionSubscription {
    pub fn new(receiver: mpsc::Receiver<SessionState>) -> Self {
        Self { receiver }
    }

    /// Try to receive the next change without blocking.
    pub fn try_recv(&self) -> Result<SessionState, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain pending changes, keeping only the most recent one.
    pub fn latest(&self) -> Option<SessionState> {
        self.receiver.try_iter().last()
    }
}

/// Source of the current actor (external collaborator).
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> SessionState;

    /// Subscribe to login/logout/expiry transitions.
    fn subscribe(&self) -> SessionSubscription;
}

impl<P> SessionProvider for std::sync::Arc<P>
where
    P: SessionProvider + ?Sized,
{
    fn current(&self) -> SessionState {
        (**self).current()
    }

    fn subscribe(&self) -> SessionSubscription {
        (**self).subscribe()
    }
}

/// In-memory session provider.
///
/// - No IO
/// - Starts in `Loading` until resolved
/// - Fans every transition out to live subscribers
#[derive(Debug, Default)]
pub struct InMemorySession {
    state: Mutex<SessionState>,
    subscribers: Mutex<Vec<mpsc::Sender<SessionState>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that is already resolved to `state`.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn login(&self, actor: Actor) {
        info!(actor_id = %actor.id, role = ?actor.role().map(Role::as_str), "session login");
        self.set(SessionState::Authenticated(actor));
    }

    pub fn logout(&self) {
        info!("session logout");
        self.set(SessionState::Anonymous);
    }

    /// Resolve the session from persisted data (fail safe).
    pub fn restore(&self, raw: Option<&str>, now: DateTime<Utc>) {
        self.set(SessionState::from_persisted(raw, now));
    }

    pub fn set(&self, next: SessionState) {
        {
            let Ok(mut state) = self.state.lock() else {
                warn!("session state lock poisoned; dropping transition");
                return;
            };
            if *state == next {
                return;
            }
            *state = next.clone();
        }

        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop dead subscribers while publishing.
            subs.retain(|tx| tx.send(next.clone()).is_ok());
        }
    }
}

impl SessionProvider for InMemorySession {
    fn current(&self) -> SessionState {
        // A poisoned lock cannot be trusted: fail safe.
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(SessionState::Anonymous)
    }

    fn subscribe(&self) -> SessionSubscription {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        SessionSubscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn raw_session(id: &str) -> String {
        format!(
            r#"{{"user":{{"id":"{id}","name":"Dana"}},"role":"employee","permissions":["view_orders"]}}"#
        )
    }

    #[test]
    fn restores_well_formed_session() {
        let id = ActorId::new();
        let state = SessionState::from_persisted(Some(&raw_session(&id.to_string())), now());
        let actor = state.actor().expect("authenticated");
        assert_eq!(actor.id, id);
        assert_eq!(actor.role(), Some(&Role::EMPLOYEE));
        assert!(actor.has_permission(&PermissionKey::new("view_orders")));
    }

    #[test]
    fn malformed_data_fails_safe_to_anonymous() {
        let bad_id = raw_session("not-a-uuid");
        for raw in ["{not json", r#"{"role":"admin"}"#, bad_id.as_str(), "42"] {
            assert_eq!(
                SessionState::from_persisted(Some(raw), now()),
                SessionState::Anonymous,
                "input {raw}"
            );
        }
    }

    #[test]
    fn strict_parse_surfaces_the_error() {
        let err = SessionState::parse_persisted(&raw_session("nope"), now()).unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::InvalidId(_))));

        let err = SessionState::parse_persisted(r#"{"user":{"id":" "}}"#, now()).unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::MalformedSession(_))));

        let err = SessionState::parse_persisted("{", now()).unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }

    #[test]
    fn missing_storage_blank_and_null_are_anonymous() {
        assert_eq!(SessionState::from_persisted(None, now()), SessionState::Anonymous);
        assert_eq!(SessionState::from_persisted(Some("  "), now()), SessionState::Anonymous);
        assert_eq!(SessionState::from_persisted(Some("null"), now()), SessionState::Anonymous);
    }

    #[test]
    fn missing_role_and_null_permissions_grant_nothing() {
        let id = ActorId::new();
        let raw = format!(r#"{{"user":{{"id":"{id}"}},"role":"  ","permissions":null}}"#);
        let state = SessionState::from_persisted(Some(&raw), now());
        let actor = state.actor().expect("authenticated");
        assert!(actor.role().is_none());
        assert!(actor.permissions.is_empty());
        assert!(!actor.is_privileged());
    }

    #[test]
    fn expired_session_is_anonymous() {
        let actor = Actor::new(ActorId::new(), Role::ADMIN);
        let persisted = PersistedSession::from_actor(&actor, Some(now() - Duration::minutes(1)));
        let raw = serde_json::to_string(&persisted).unwrap();
        assert_eq!(SessionState::from_persisted(Some(&raw), now()), SessionState::Anonymous);

        let fresh = PersistedSession::from_actor(&actor, Some(now() + Duration::hours(1)));
        let raw = serde_json::to_string(&fresh).unwrap();
        assert_eq!(
            SessionState::from_persisted(Some(&raw), now()),
            SessionState::Authenticated(actor)
        );
    }

    #[test]
    fn provider_starts_loading_and_notifies_transitions() {
        let session = InMemorySession::new();
        assert!(session.current().is_loading());

        let sub = session.subscribe();
        let actor = Actor::new(ActorId::new(), Role::MANAGER);
        session.login(actor.clone());
        session.logout();

        assert_eq!(sub.try_recv().unwrap(), SessionState::Authenticated(actor));
        assert_eq!(sub.try_recv().unwrap(), SessionState::Anonymous);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn unchanged_state_is_not_republished() {
        let session = InMemorySession::with_state(SessionState::Anonymous);
        let sub = session.subscribe();
        session.logout();
        assert!(sub.latest().is_none());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let session = InMemorySession::new();
        drop(session.subscribe());
        session.logout();
        assert!(session.subscribers.lock().unwrap().is_empty());
    }
}

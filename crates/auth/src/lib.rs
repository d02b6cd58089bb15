//! `bizdash-auth` — the dashboard's client-side access gate.
//!
//! A pure evaluator decides whether the current actor may see a protected
//! region; adapters (in `bizdash-dashboard`) turn the decision into
//! rendering, redirects and notifications. This is a visibility convenience,
//! never a security boundary: the API enforces authorization on its own.

pub mod actor;
pub mod decision;
pub mod explain;
pub mod gate;
pub mod permissions;
pub mod requirement;
pub mod roles;
pub mod session;

pub use actor::Actor;
pub use decision::{AccessDecision, DenialReason};
pub use explain::{AccessExplanation, ActorState, explain};
pub use gate::{DEFAULT_LOGIN_PATH, DEFAULT_ON_DENY_PATH, GateOptions, check, evaluate};
pub use permissions::PermissionKey;
pub use requirement::AccessRequirement;
pub use roles::Role;
pub use session::{
    InMemorySession, PersistedSession, PersistedUser, SessionError, SessionProvider,
    SessionState, SessionSubscription,
};

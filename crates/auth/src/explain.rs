//! Access explanations (audit/debug trail).

use serde::Serialize;

use bizdash_core::ActorId;

use crate::{AccessRequirement, Actor, DenialReason, Role, gate};

/// Detailed explanation of an access decision.
///
/// Answers "why was this region shown or hidden?" without performing any
/// navigation. Built on the same check as `evaluate`, so the two never disagree.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    /// The requirement that was checked.
    pub requirement: AccessRequirement,

    /// Whether access was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The actor's state, absent for anonymous sessions.
    pub actor: Option<ActorState>,

    /// If denied, what was missing.
    pub denial: Option<DenialReason>,

    /// Hints for an administrator wanting to grant access.
    pub suggestions: Vec<String>,
}

/// Snapshot of the actor being checked.
#[derive(Debug, Clone, Serialize)]
pub struct ActorState {
    pub id: ActorId,
    pub role: Option<Role>,
    pub permissions: Vec<String>,
    pub privileged: bool,
}

impl From<&Actor> for ActorState {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            role: actor.role().cloned(),
            permissions: actor.permissions.iter().map(|p| p.as_str().to_string()).collect(),
            privileged: actor.is_privileged(),
        }
    }
}

/// Explain why access would be granted or denied.
pub fn explain(actor: Option<&Actor>, requirement: &AccessRequirement) -> AccessExplanation {
    let state = actor.map(ActorState::from);

    match gate::check(actor, requirement) {
        Ok(()) => {
            let reason = match (actor, requirement) {
                (Some(a), _) if a.is_privileged() => format!(
                    "Role '{}' is privileged and bypasses every check",
                    a.role().map(Role::as_str).unwrap_or_default()
                ),
                (_, AccessRequirement::RequiredPermission(key)) => {
                    format!("Actor holds permission '{key}'")
                }
                (_, AccessRequirement::AllowedRoles(_)) => format!(
                    "Actor role '{}' is on the allow-list",
                    actor.and_then(Actor::role).map(Role::as_str).unwrap_or_default()
                ),
            };

            AccessExplanation {
                requirement: requirement.clone(),
                granted: true,
                reason,
                actor: state,
                denial: None,
                suggestions: Vec::new(),
            }
        }
        Err(denial) => {
            let suggestions = match &denial {
                DenialReason::Anonymous => vec!["Sign in and retry".to_string()],
                DenialReason::MissingPermission { permission } => vec![
                    format!("Grant the '{permission}' permission to the user"),
                    "Assign the user an admin or super_admin role".to_string(),
                ],
                DenialReason::RoleNotAllowed { allowed, .. } => {
                    let mut s = Vec::new();
                    if !allowed.is_empty() {
                        let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                        s.push(format!("Assign one of the roles: {}", names.join(", ")));
                    }
                    s.push("Assign the user an admin or super_admin role".to_string());
                    s
                }
            };

            AccessExplanation {
                requirement: requirement.clone(),
                granted: false,
                reason: denial.describe(),
                actor: state,
                denial: Some(denial),
                suggestions,
            }
        }
    }
}

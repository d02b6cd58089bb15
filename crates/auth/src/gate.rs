//! The access gate evaluator.
//!
//! - No IO
//! - No panics
//! - No side effects (navigation and notification belong to adapters)

use tracing::debug;

use crate::{AccessDecision, AccessRequirement, Actor, DenialReason};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_ON_DENY_PATH: &str = "/dashboard";

/// Where denied actors are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOptions {
    /// Target for anonymous actors. Always wins over any deny path.
    pub login_path: String,
    /// Used when the call site does not name its own deny path.
    pub default_on_deny_path: String,
    /// Call-site deny path.
    pub on_deny_path: Option<String>,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_on_deny_path: DEFAULT_ON_DENY_PATH.to_string(),
            on_deny_path: None,
        }
    }
}

impl GateOptions {
    pub fn with_on_deny_path(mut self, path: impl Into<String>) -> Self {
        self.on_deny_path = Some(path.into());
        self
    }

    pub fn deny_path(&self) -> &str {
        self.on_deny_path
            .as_deref()
            .unwrap_or(&self.default_on_deny_path)
    }
}

/// Decide whether `actor` satisfies `requirement`.
///
/// This is the single source of truth for the privileged bypass and for
/// membership semantics; `evaluate` and `explain` both build on it.
pub fn check(actor: Option<&Actor>, requirement: &AccessRequirement) -> Result<(), DenialReason> {
    let Some(actor) = actor else {
        return Err(DenialReason::Anonymous);
    };

    if actor.is_privileged() {
        return Ok(());
    }

    match requirement {
        AccessRequirement::RequiredPermission(key) => {
            if actor.has_permission(key) {
                Ok(())
            } else {
                Err(DenialReason::MissingPermission {
                    permission: key.clone(),
                })
            }
        }
        AccessRequirement::AllowedRoles(roles) => {
            if actor.has_role_in(roles) {
                Ok(())
            } else {
                Err(DenialReason::RoleNotAllowed {
                    role: actor.role().cloned(),
                    allowed: roles.clone(),
                })
            }
        }
    }
}

/// Evaluate access for a protected region.
///
/// Anonymous actors are redirected to the login path; authenticated actors
/// who fail the check are redirected to the call-site (or default) deny path.
pub fn evaluate(
    actor: Option<&Actor>,
    requirement: &AccessRequirement,
    options: &GateOptions,
) -> AccessDecision {
    let decision = match check(actor, requirement) {
        Ok(()) => AccessDecision::Allow,
        Err(reason) => {
            let path = if reason.is_anonymous() {
                options.login_path.clone()
            } else {
                options.deny_path().to_string()
            };
            AccessDecision::DenyRedirect { path, reason }
        }
    };

    debug!(
        actor_id = actor.map(|a| a.id.to_string()),
        requirement = %requirement,
        allowed = decision.is_allowed(),
        redirect = decision.redirect_path(),
        "access evaluated"
    );

    decision
}

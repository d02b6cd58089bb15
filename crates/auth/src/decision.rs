use serde::{Deserialize, Serialize};

use crate::{PermissionKey, Role};

/// Why an evaluation denied access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// No session exists (or it could not be trusted).
    Anonymous,
    /// The actor lacks the required permission.
    MissingPermission { permission: PermissionKey },
    /// The actor's role is not on the allow-list.
    RoleNotAllowed {
        role: Option<Role>,
        allowed: Vec<Role>,
    },
}

impl DenialReason {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Human-readable description, suitable for a user notification.
    pub fn describe(&self) -> String {
        match self {
            Self::Anonymous => "You need to sign in to view this page.".to_string(),
            Self::MissingPermission { permission } => {
                format!("You don't have the '{permission}' permission required to view this page.")
            }
            Self::RoleNotAllowed { role, allowed } => {
                let allowed: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                let role = role.as_ref().map(Role::as_str).unwrap_or("none");
                if allowed.is_empty() {
                    format!("Your role '{role}' cannot view this page; it is restricted to administrators.")
                } else {
                    format!(
                        "Your role '{role}' cannot view this page; it requires one of: {}.",
                        allowed.join(", ")
                    )
                }
            }
        }
    }
}

/// Outcome of one access evaluation.
///
/// Never cached: the session can change between renders, so every render
/// evaluates afresh. `F` is the fallback carried by `DenyRender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<F = ()> {
    Allow,
    DenyRedirect { path: String, reason: DenialReason },
    DenyRender { fallback: F, reason: DenialReason },
}

impl<F> AccessDecision<F> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn reason(&self) -> Option<&DenialReason> {
        match self {
            Self::Allow => None,
            Self::DenyRedirect { reason, .. } | Self::DenyRender { reason, .. } => Some(reason),
        }
    }

    /// The redirect target, if this is a redirect denial.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::DenyRedirect { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Re-express a denial as "render this fallback instead".
    ///
    /// Used by adapters that never navigate; the allow/deny outcome is unchanged.
    pub fn into_render<G>(self, fallback: G) -> AccessDecision<G> {
        match self {
            Self::Allow => AccessDecision::Allow,
            Self::DenyRedirect { reason, .. } | Self::DenyRender { reason, .. } => {
                AccessDecision::DenyRender { fallback, reason }
            }
        }
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use bizdash_core::ActorId;

use crate::{PermissionKey, Role};

/// The currently authenticated user, as seen by the access gate.
///
/// The gate only ever reads an actor; the session provider owns its lifecycle.
/// A missing role or an empty permission set grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub permissions: BTreeSet<PermissionKey>,
}

impl Actor {
    pub fn new(id: ActorId, role: Role) -> Self {
        Self {
            id,
            role: Some(role),
            permissions: BTreeSet::new(),
        }
    }

    /// An actor whose session carried no usable role.
    pub fn without_role(id: ActorId) -> Self {
        Self {
            id,
            role: None,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<PermissionKey>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PermissionKey>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// The role, if present and non-blank.
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref().filter(|r| !r.is_empty())
    }

    pub fn is_privileged(&self) -> bool {
        self.role().is_some_and(Role::is_privileged)
    }

    /// Exact membership check. Blank keys are never held.
    pub fn has_permission(&self, permission: &PermissionKey) -> bool {
        !permission.is_empty() && self.permissions.contains(permission)
    }

    pub fn has_role_in(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|role| roles.contains(role))
    }
}

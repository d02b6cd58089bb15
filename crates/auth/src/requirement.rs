use serde::{Deserialize, Serialize};

use crate::{PermissionKey, Role};

/// What a protected region demands of the actor.
///
/// Exactly one shape is used per call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequirement {
    /// The actor must hold this permission.
    RequiredPermission(PermissionKey),
    /// The actor's role must be one of these. An empty list admits only
    /// privileged roles.
    AllowedRoles(Vec<Role>),
}

impl AccessRequirement {
    pub fn permission(key: impl Into<PermissionKey>) -> Self {
        Self::RequiredPermission(key.into())
    }

    pub fn roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self::AllowedRoles(roles.into_iter().map(Into::into).collect())
    }
}

impl core::fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RequiredPermission(key) => write!(f, "permission '{key}'"),
            Self::AllowedRoles(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                write!(f, "one of roles [{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_both_shapes() {
        let perm: AccessRequirement =
            serde_json::from_str(r#"{"required_permission":"manage_employees"}"#).unwrap();
        assert_eq!(perm, AccessRequirement::permission("manage_employees"));

        let roles: AccessRequirement =
            serde_json::from_str(r#"{"allowed_roles":["admin","manager"]}"#).unwrap();
        assert_eq!(roles, AccessRequirement::roles([Role::ADMIN, Role::MANAGER]));
    }

    #[test]
    fn display_names_the_requirement() {
        assert_eq!(
            AccessRequirement::permission("view_orders").to_string(),
            "permission 'view_orders'"
        );
        assert_eq!(
            AccessRequirement::roles(["admin", "manager"]).to_string(),
            "one of roles [admin, manager]"
        );
    }
}

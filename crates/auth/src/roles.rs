use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role tag of a dashboard actor.
///
/// Roles are opaque strings; the well-known ones are exposed as constants.
/// `admin` and `super_admin` are privileged and satisfy every access check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("super_admin"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const EMPLOYEE: Role = Role(Cow::Borrowed("employee"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Privileged roles bypass every permission and role check.
    pub fn is_privileged(&self) -> bool {
        *self == Self::ADMIN || *self == Self::SUPER_ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_super_admin_are_privileged() {
        assert!(Role::ADMIN.is_privileged());
        assert!(Role::SUPER_ADMIN.is_privileged());
        assert!(Role::new("admin".to_string()).is_privileged());

        assert!(!Role::MANAGER.is_privileged());
        assert!(!Role::EMPLOYEE.is_privileged());
        assert!(!Role::new("Admin").is_privileged());
        assert!(!Role::new("").is_privileged());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::SUPER_ADMIN).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(back, Role::MANAGER);
    }
}

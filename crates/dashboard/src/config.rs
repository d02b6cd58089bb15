//! Gate configuration.

use thiserror::Error;

use bizdash_auth::{DEFAULT_LOGIN_PATH, DEFAULT_ON_DENY_PATH, GateOptions};

pub const LOGIN_PATH_ENV: &str = "BIZDASH_LOGIN_PATH";
pub const DENY_PATH_ENV: &str = "BIZDASH_DENY_PATH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be an absolute path starting with '/', got '{value}'")]
    InvalidPath { name: String, value: String },

    #[error("duplicate route pattern '{0}'")]
    DuplicateRoute(String),

    #[error("routes '{first}' and '{second}' are equally specific and overlap")]
    AmbiguousRoutes { first: String, second: String },

    #[error("route '{0}' redirects denied users to itself")]
    RedirectLoop(String),

    #[error("route table is not valid JSON: {0}")]
    Json(String),
}

/// Where denied users are sent, app-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub login_path: String,
    pub default_on_deny_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_on_deny_path: DEFAULT_ON_DENY_PATH.to_string(),
        }
    }
}

impl GateConfig {
    /// Load from process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (env, query string, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let login_path = lookup(LOGIN_PATH_ENV).unwrap_or(defaults.login_path);
        let default_on_deny_path = lookup(DENY_PATH_ENV).unwrap_or(defaults.default_on_deny_path);

        validate_path(LOGIN_PATH_ENV, &login_path)?;
        validate_path(DENY_PATH_ENV, &default_on_deny_path)?;

        Ok(Self {
            login_path,
            default_on_deny_path,
        })
    }

    /// Evaluator options for a call site with an optional deny path.
    pub fn options(&self, fallback_path: Option<&str>) -> GateOptions {
        GateOptions {
            login_path: self.login_path.clone(),
            default_on_deny_path: self.default_on_deny_path.clone(),
            on_deny_path: fallback_path.map(str::to_string),
        }
    }
}

pub(crate) fn validate_path(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::InvalidPath {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = GateConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.options(None).deny_path(), "/dashboard");
    }

    #[test]
    fn overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [(LOGIN_PATH_ENV, "/signin"), (DENY_PATH_ENV, "/home")].into();
        let config = GateConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.options(Some("/orders")).deny_path(), "/orders");
        assert_eq!(config.options(None).deny_path(), "/home");
    }

    #[test]
    fn rejects_relative_paths() {
        let err = GateConfig::from_lookup(|k| (k == DENY_PATH_ENV).then(|| "home".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { name, .. } if name == DENY_PATH_ENV));
    }
}

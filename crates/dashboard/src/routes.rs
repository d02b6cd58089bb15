//! Protected route table: the call-site configuration surface.

use serde::{Deserialize, Serialize};

use bizdash_auth::{AccessRequirement, Role};

use crate::config::{ConfigError, GateConfig, validate_path};

/// Declaration of one protected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedRegion {
    pub requirement: AccessRequirement,
    /// Where authenticated-but-denied users go; app default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<String>,
}

impl ProtectedRegion {
    pub fn new(requirement: AccessRequirement) -> Self {
        Self {
            requirement,
            fallback_path: None,
        }
    }

    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Path pattern, e.g. `/orders` or `/employees/:id/edit`.
    pub pattern: String,
    #[serde(flatten)]
    pub region: ProtectedRegion,
}

/// Maps route patterns to protected regions.
///
/// A pattern guards its own path and everything nested below it. When
/// several patterns match, the one with the most segments wins, then the one
/// with the most literal segments (`/orders/new` beats `/orders/:id`). Tables
/// where that still leaves a tie are rejected at load time. Paths that match
/// nothing are public.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteEntry>, config: &GateConfig) -> Result<Self, ConfigError> {
        let table = Self { routes };
        table.validate_with(config)?;
        Ok(table)
    }

    pub fn from_json(raw: &str, config: &GateConfig) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))?;
        table.validate_with(config)?;
        Ok(table)
    }

    /// The dashboard's built-in protected pages.
    pub fn dashboard_default() -> Self {
        let entry = |pattern: &str, region: ProtectedRegion| RouteEntry {
            pattern: pattern.to_string(),
            region,
        };

        Self {
            routes: vec![
                entry(
                    "/employees",
                    ProtectedRegion::new(AccessRequirement::permission("manage_employees")),
                ),
                entry(
                    "/orders",
                    ProtectedRegion::new(AccessRequirement::permission("view_orders")),
                ),
                entry(
                    "/analytics",
                    ProtectedRegion::new(AccessRequirement::roles([Role::ADMIN, Role::MANAGER])),
                ),
                entry(
                    "/settings",
                    ProtectedRegion::new(AccessRequirement::roles([Role::ADMIN, Role::SUPER_ADMIN])),
                ),
                entry(
                    "/messages",
                    ProtectedRegion::new(AccessRequirement::permission("view_messages")),
                ),
            ],
        }
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Find the region guarding `path`, if any.
    pub fn region_for(&self, path: &str) -> Option<&ProtectedRegion> {
        let path = segments(strip_query(path));

        self.routes
            .iter()
            .filter_map(|entry| {
                let pattern = segments(&entry.pattern);
                matches_prefix(&pattern, &path).then(|| (specificity(&pattern), &entry.region))
            })
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, region)| region)
    }

    /// Check the table against the paths denied users are sent to.
    ///
    /// Rejects relative paths, duplicate or equally specific overlapping
    /// patterns, and any route whose login or deny target falls inside the
    /// route itself (the redirect would land on the same gate again).
    pub fn validate_with(&self, config: &GateConfig) -> Result<(), ConfigError> {
        let mut seen: Vec<(&str, Vec<&str>)> = Vec::new();
        let login = segments(&config.login_path);

        for entry in &self.routes {
            validate_path("pattern", &entry.pattern)?;

            let normalized = segments(&entry.pattern);
            for (other, other_segments) in &seen {
                if *other_segments == normalized {
                    return Err(ConfigError::DuplicateRoute(entry.pattern.clone()));
                }
                if specificity(other_segments) == specificity(&normalized)
                    && overlaps(other_segments, &normalized)
                {
                    return Err(ConfigError::AmbiguousRoutes {
                        first: other.to_string(),
                        second: entry.pattern.clone(),
                    });
                }
            }

            if let Some(fallback) = &entry.region.fallback_path {
                validate_path("fallback_path", fallback)?;
            }
            let deny_path = entry
                .region
                .fallback_path
                .as_deref()
                .unwrap_or(&config.default_on_deny_path);

            if matches_prefix(&normalized, &segments(deny_path)) || matches_prefix(&normalized, &login) {
                return Err(ConfigError::RedirectLoop(entry.pattern.clone()));
            }

            seen.push((&entry.pattern, normalized));
        }

        Ok(())
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Ranking key: segment count, then literal (non-`:param`) segment count.
fn specificity(pattern: &[&str]) -> (usize, usize) {
    let literals = pattern.iter().filter(|s| !s.starts_with(':')).count();
    (pattern.len(), literals)
}

/// Whether some path matches both equal-length patterns.
fn overlaps(a: &[&str], b: &[&str]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.starts_with(':') || y.starts_with(':') || x == y)
}

fn matches_prefix(pattern: &[&str], path: &[&str]) -> bool {
    pattern.len() <= path.len()
        && pattern
            .iter()
            .zip(path)
            .all(|(p, s)| p.starts_with(':') || p == s)
}

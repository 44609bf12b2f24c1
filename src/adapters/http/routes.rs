//! Route sets the pipeline treats specially.

use axum::http::Method;

/// Path prefixes owned by the identity provider (sign in, sign out,
/// password reset, confirmation).
pub const DEFAULT_IDENTITY_PROVIDER_PREFIXES: [&str; 5] = [
    "/users/sign_in",
    "/users/sign_out",
    "/users/password",
    "/users/confirmation",
    "/all_casa_admins/sign_in",
];

/// Routes served by the identity provider.
///
/// These never need an authorization decision and their locations are
/// never remembered as a place to return to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderRoutes {
    prefixes: Vec<String>,
}

impl Default for IdentityProviderRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_PROVIDER_PREFIXES)
    }
}

impl IdentityProviderRoutes {
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .map(|p: String| p.trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns true when `path` is one of the prefixes or lies below one.
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| match path.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('.'),
            None => false,
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// Routes that may complete without an authorization decision.
///
/// Matched on method and route pattern (e.g. `GET /volunteers`), typically
/// listing endpoints whose results are already scoped to the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptRoutes {
    routes: Vec<(Method, String)>,
}

impl ExemptRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, method: Method, pattern: impl Into<String>) -> Self {
        self.routes.push((method, pattern.into()));
        self
    }

    pub fn is_exempt(&self, method: &Method, pattern: &str) -> bool {
        self.routes
            .iter()
            .any(|(m, p)| m == method && p == pattern)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<(Method, String)> for ExemptRoutes {
    fn from_iter<T: IntoIterator<Item = (Method, String)>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

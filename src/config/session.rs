//! Session and route configuration

use axum::http::Method;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session cookie, store TTL and the route sets the pipeline treats
/// specially.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Only send the cookie over HTTPS
    #[serde(default)]
    pub secure_cookie: bool,

    /// Lifetime of stored session entries in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Identity-provider path prefixes (comma-separated); defaults apply
    /// when unset
    pub identity_provider_prefixes: Option<String>,

    /// Routes allowed to skip authorization (comma-separated
    /// `METHOD /pattern` pairs)
    pub exempt_routes: Option<String>,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Configured identity-provider prefixes, if any.
    pub fn identity_provider_prefix_list(&self) -> Option<Vec<String>> {
        self.identity_provider_prefixes.as_ref().map(|s| {
            s.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
    }

    /// Parses the exempt routes into method and route pattern pairs.
    pub fn exempt_route_list(&self) -> Result<Vec<(Method, String)>, ValidationError> {
        let Some(routes) = &self.exempt_routes else {
            return Ok(Vec::new());
        };

        routes
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(parse_route)
            .collect()
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cookie_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SESSION__COOKIE_NAME"));
        }
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        self.exempt_route_list()?;
        Ok(())
    }
}

fn parse_route(route: &str) -> Result<(Method, String), ValidationError> {
    let invalid = || ValidationError::InvalidExemptRoute(route.to_string());

    let (method, pattern) = route.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let pattern = pattern.trim();
    if !pattern.starts_with('/') {
        return Err(invalid());
    }
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| invalid())?;

    Ok((method, pattern.to_string()))
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            ttl_secs: default_ttl(),
            identity_provider_prefixes: None,
            exempt_routes: None,
        }
    }
}

fn default_cookie_name() -> String {
    "_casa_session".to_string()
}

fn default_ttl() -> u64 {
    // Two weeks
    14 * 24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "_casa_session");
        assert_eq!(config.ttl(), Duration::from_secs(1_209_600));
        assert!(config.identity_provider_prefix_list().is_none());
        assert!(config.exempt_route_list().unwrap().is_empty());
    }

    #[test]
    fn test_identity_provider_prefixes_parsing() {
        let config = SessionConfig {
            identity_provider_prefixes: Some("/auth/login, /auth/logout,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.identity_provider_prefix_list().unwrap(),
            vec!["/auth/login".to_string(), "/auth/logout".to_string()]
        );
    }

    #[test]
    fn test_exempt_routes_parsing() {
        let config = SessionConfig {
            exempt_routes: Some("GET /volunteers, get /cases".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.exempt_route_list().unwrap(),
            vec![
                (Method::GET, "/volunteers".to_string()),
                (Method::GET, "/cases".to_string()),
            ]
        );
    }

    #[test]
    fn test_exempt_route_without_method_is_invalid() {
        let config = SessionConfig {
            exempt_routes: Some("/volunteers".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidExemptRoute(_))
        ));
    }

    #[test]
    fn test_exempt_route_without_leading_slash_is_invalid() {
        let config = SessionConfig {
            exempt_routes: Some("GET volunteers".to_string()),
            ..Default::default()
        };
        assert!(config.exempt_route_list().is_err());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let config = SessionConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer. Loaded once at startup and
//! shared read-only behind `Arc`.

use std::sync::Arc;
use std::time::Duration;

use platform::clock::Clock;
use platform::password::{HashingError, PasswordHasher};
use platform::token::{DEFAULT_TOKEN_TTL, SecretError, SigningSecret, TokenService};
use thiserror::Error;

pub const ENV_TOKEN_SECRET: &str = "AUTH_TOKEN_SECRET";
pub const ENV_TOKEN_TTL_SECS: &str = "AUTH_TOKEN_TTL_SECS";
pub const ENV_LOOKUP_TIMEOUT_MS: &str = "AUTH_LOOKUP_TIMEOUT_MS";
pub const ENV_BCRYPT_COST: &str = "BCRYPT_COST";
/// Opt-in for a random per-process secret when `AUTH_TOKEN_SECRET` is unset
pub const ENV_ALLOW_EPHEMERAL_SECRET: &str = "AUTH_ALLOW_EPHEMERAL_SECRET";

/// Default bound on the role lookup in `require_role`
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Startup configuration errors (fatal)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be a positive integer (got {value:?})")]
    InvalidNumber { var: &'static str, value: String },

    #[error("AUTH_TOKEN_SECRET: {0}")]
    Secret(#[from] SecretError),

    #[error("BCRYPT_COST: {0}")]
    Cost(#[from] HashingError),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret (immutable after startup)
    pub token_secret: Arc<SigningSecret>,
    /// Identity token lifetime
    pub token_ttl: Duration,
    /// Upper bound for the user lookup during role checks
    pub lookup_timeout: Duration,
    /// Credential hasher with the configured bcrypt cost
    pub hasher: PasswordHasher,
}

impl AuthConfig {
    pub fn new(token_secret: SigningSecret) -> Self {
        Self {
            token_secret: Arc::new(token_secret),
            token_ttl: DEFAULT_TOKEN_TTL,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            hasher: PasswordHasher::default(),
        }
    }

    /// Config with a random signing secret (for development)
    ///
    /// Tokens do not survive a restart.
    pub fn development() -> Self {
        Self::new(SigningSecret::generate())
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(ENV_TOKEN_SECRET).filter(|s| !s.trim().is_empty());

        let mut config = match secret {
            Some(secret) => Self::new(SigningSecret::from_base64(&secret)?),
            None if is_enabled(&lookup, ENV_ALLOW_EPHEMERAL_SECRET) => {
                tracing::warn!(
                    "{} not set; using a random secret, tokens will not survive a restart",
                    ENV_TOKEN_SECRET
                );
                Self::development()
            }
            None => return Err(ConfigError::Missing(ENV_TOKEN_SECRET)),
        };

        if let Some(secs) = parse_positive(&lookup, ENV_TOKEN_TTL_SECS)? {
            config.token_ttl = Duration::from_secs(secs);
        }
        if let Some(millis) = parse_positive(&lookup, ENV_LOOKUP_TIMEOUT_MS)? {
            config.lookup_timeout = Duration::from_millis(millis);
        }
        if let Some(cost) = parse_positive(&lookup, ENV_BCRYPT_COST)? {
            let cost = u32::try_from(cost).map_err(|_| HashingError::InvalidCost(u32::MAX))?;
            config.hasher = PasswordHasher::with_cost(cost)?;
        }

        Ok(config)
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Build the token service for this configuration
    pub fn token_service(&self, clock: Arc<dyn Clock>) -> TokenService {
        TokenService::new(&self.token_secret, self.token_ttl, clock)
    }
}

fn is_enabled<F>(lookup: &F, var: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).is_some_and(|v| {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true")
    })
}

fn parse_positive<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY="; // 32 bytes

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, SECRET)])).unwrap();
        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.lookup_timeout, DEFAULT_LOOKUP_TIMEOUT);
        assert_eq!(config.hasher.cost(), PasswordHasher::DEFAULT_COST);
    }

    #[test]
    fn test_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            (ENV_TOKEN_SECRET, SECRET),
            (ENV_TOKEN_TTL_SECS, "3600"),
            (ENV_LOOKUP_TIMEOUT_MS, "250"),
            (ENV_BCRYPT_COST, "12"),
        ]))
        .unwrap();

        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.hasher.cost(), 12);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(ENV_TOKEN_SECRET))
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, "  ")])),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_ephemeral_secret_requires_opt_in() {
        let config = AuthConfig::from_lookup(lookup(&[(ENV_ALLOW_EPHEMERAL_SECRET, "true")]));
        assert!(config.is_ok());

        for value in ["0", "false", "yes", ""] {
            assert!(
                matches!(
                    AuthConfig::from_lookup(lookup(&[(ENV_ALLOW_EPHEMERAL_SECRET, value)])),
                    Err(ConfigError::Missing(ENV_TOKEN_SECRET))
                ),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_configured_secret_wins_over_ephemeral() {
        let (_, clock) = crate::test_support::manual_clock();
        let vars = [(ENV_TOKEN_SECRET, SECRET), (ENV_ALLOW_EPHEMERAL_SECRET, "1")];
        let first = AuthConfig::from_lookup(lookup(&vars)).unwrap().token_service(clock.clone());
        let second = AuthConfig::from_lookup(lookup(&vars)).unwrap().token_service(clock);

        let token = first.issue("u1").unwrap();
        assert_eq!(second.verify(&token).unwrap().subject, "u1");
    }

    #[test]
    fn test_short_secret_is_fatal() {
        // "short" -> 5 bytes
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, "c2hvcnQ=")])),
            Err(ConfigError::Secret(SecretError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        for (var, value) in [
            (ENV_TOKEN_TTL_SECS, "0"),
            (ENV_TOKEN_TTL_SECS, "soon"),
            (ENV_LOOKUP_TIMEOUT_MS, "-5"),
        ] {
            let result = AuthConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, SECRET), (var, value)]));
            assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })), "{var}={value}");
        }
    }

    #[test]
    fn test_invalid_cost() {
        let result = AuthConfig::from_lookup(lookup(&[
            (ENV_TOKEN_SECRET, SECRET),
            (ENV_BCRYPT_COST, "40"),
        ]));
        assert!(matches!(result, Err(ConfigError::Cost(HashingError::InvalidCost(40)))));
    }
}

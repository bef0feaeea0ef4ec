/*
[INPUT]:  Explicit API key/secret/tokens or BITPIN_* environment variables
[OUTPUT]: Resolved credentials used for login and the initial token store
[POS]:    Auth layer - credential sourcing at client construction
[UPDATE]: When credential sources or environment variable names change
*/

use std::fmt;

use super::TokenStore;

pub const ENV_API_KEY: &str = "BITPIN_API_KEY";
pub const ENV_API_SECRET: &str = "BITPIN_API_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "BITPIN_ACCESS_TOKEN";
pub const ENV_REFRESH_TOKEN: &str = "BITPIN_REFRESH_TOKEN";

/// Credentials for authenticated requests
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Key and secret given explicitly; tokens still fall back to the environment
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Default::default()
        }
        .or_env()
    }

    /// Everything from `BITPIN_*` environment variables
    pub fn from_env() -> Self {
        Self::default().or_env()
    }

    /// Fill every missing field from the process environment
    pub fn or_env(self) -> Self {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Fill every missing field from `lookup`, keyed by environment variable name
    pub fn resolve_with(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |explicit: Option<String>, name: &str| {
            explicit.or_else(|| lookup(name).filter(|value| !value.is_empty()))
        };

        Self {
            api_key: pick(self.api_key, ENV_API_KEY),
            api_secret: pick(self.api_secret, ENV_API_SECRET),
            access_token: pick(self.access_token, ENV_ACCESS_TOKEN),
            refresh_token: pick(self.refresh_token, ENV_REFRESH_TOKEN),
        }
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Login is attempted at construction only when both are known
    pub fn can_login(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }

    pub(crate) fn token_store(&self) -> TokenStore {
        TokenStore::with_tokens(self.access_token.clone(), self.refresh_token.clone())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

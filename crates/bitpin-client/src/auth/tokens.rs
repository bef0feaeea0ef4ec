/*
[INPUT]:  Access/refresh tokens from login and refresh responses
[OUTPUT]: Consistent token snapshots for request signing
[POS]:    Auth layer - token lifecycle storage shared with background renewal
[UPDATE]: When changing token storage or rotation rules
*/

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};

/// Stored token pair with rotation timestamps
#[derive(Clone, Default, PartialEq)]
pub struct TokenData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub access_updated_at: Option<DateTime<Utc>>,
    pub refresh_updated_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenData")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("access_updated_at", &self.access_updated_at)
            .field("refresh_updated_at", &self.refresh_updated_at)
            .finish()
    }
}

/// Thread-safe token store.
///
/// Single writer at a time; readers always observe a pair written by one
/// login, never half of it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    data: Arc<RwLock<TokenData>>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with tokens known at startup
    pub fn with_tokens(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        let now = Utc::now();
        let data = TokenData {
            access_updated_at: access_token.as_ref().map(|_| now),
            refresh_updated_at: refresh_token.as_ref().map(|_| now),
            access_token,
            refresh_token,
        };
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Store both tokens returned by a login
    pub fn set_pair(&self, access_token: String, refresh_token: String) {
        let now = Utc::now();
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.access_token = Some(access_token);
        guard.refresh_token = Some(refresh_token);
        guard.access_updated_at = Some(now);
        guard.refresh_updated_at = Some(now);
    }

    /// Replace only the access token; the refresh token is not rotated
    pub fn set_access_token(&self, access_token: String) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.access_token = Some(access_token);
        guard.access_updated_at = Some(Utc::now());
    }

    pub fn access_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.refresh_token.clone()
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> TokenData {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Forget both tokens
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = TokenData::default();
    }
}

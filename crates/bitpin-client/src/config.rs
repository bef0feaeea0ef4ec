/*
[INPUT]:  Caller choices for endpoints, timeouts and background renewal
[OUTPUT]: Immutable client configuration shared by both client flavours
[POS]:    Configuration layer - read once at client construction
[UPDATE]: When adding connection options or renewal knobs
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::RenewalKind;
use crate::http::{BitpinError, RequestOptions};
use crate::types::ApiVersion;

/// Base URL for the Bitpin REST API
pub const API_URL: &str = "https://api.bitpin.ir";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RELOGIN_INTERVAL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Callback notified when one background renewal iteration fails
#[derive(Clone)]
pub struct RenewalObserver(Arc<dyn Fn(RenewalKind, &BitpinError) + Send + Sync>);

impl RenewalObserver {
    pub fn new(callback: impl Fn(RenewalKind, &BitpinError) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub(crate) fn notify(&self, kind: RenewalKind, err: &BitpinError) {
        (self.0)(kind, err)
    }
}

impl fmt::Debug for RenewalObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenewalObserver(..)")
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Version used by endpoints that do not pin one
    pub api_version: ApiVersion,
    /// Absolute per-request timeout, overridable per call
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Options merged under every call's own options
    pub default_request_params: RequestOptions,
    pub background_relogin: bool,
    pub background_relogin_interval: Duration,
    pub background_refresh_token: bool,
    pub background_refresh_token_interval: Duration,
    pub renewal_observer: Option<RenewalObserver>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            api_version: ApiVersion::V1,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            default_request_params: RequestOptions::default(),
            background_relogin: false,
            background_relogin_interval: DEFAULT_RELOGIN_INTERVAL,
            background_refresh_token: false,
            background_refresh_token_interval: DEFAULT_REFRESH_INTERVAL,
            renewal_observer: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_request_params(mut self, params: RequestOptions) -> Self {
        self.default_request_params = params;
        self
    }

    /// Re-run login every `interval` in the background
    pub fn with_background_relogin(mut self, interval: Duration) -> Self {
        self.background_relogin = true;
        self.background_relogin_interval = interval;
        self
    }

    /// Refresh the access token every `interval` in the background
    pub fn with_background_refresh_token(mut self, interval: Duration) -> Self {
        self.background_refresh_token = true;
        self.background_refresh_token_interval = interval;
        self
    }

    pub fn with_renewal_observer(mut self, observer: RenewalObserver) -> Self {
        self.renewal_observer = Some(observer);
        self
    }

    /// Enabled renewal loops and their periods
    pub(crate) fn renewal_schedule(&self) -> Vec<(RenewalKind, Duration)> {
        let mut schedule = Vec::new();
        if self.background_relogin {
            schedule.push((RenewalKind::Relogin, self.background_relogin_interval));
        }
        if self.background_refresh_token {
            schedule.push((
                RenewalKind::RefreshToken,
                self.background_refresh_token_interval,
            ));
        }
        schedule
    }
}

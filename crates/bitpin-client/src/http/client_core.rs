/*
[INPUT]:  ClientConfig, Credentials, ApiCall, RawResponse
[OUTPUT]: Request envelopes, normalized results, token updates after login/refresh
[POS]:    HTTP layer - behaviour shared by the async and blocking clients
[UPDATE]: When request assembly or session state transitions change
*/

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::auth::{Credentials, TokenStore};
use crate::config::ClientConfig;
use crate::http::endpoints::{self, ApiCall};
use crate::http::request::build_envelope;
use crate::http::response::normalize;
use crate::http::{RawResponse, RequestEnvelope, RequestOptions, Result};
use crate::types::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};

/// Configuration, credentials and token state of one client instance.
///
/// Transport-agnostic: each client flavour pairs it with its own transport.
#[derive(Debug)]
pub struct ClientCore {
    config: ClientConfig,
    credentials: Credentials,
    tokens: TokenStore,
}

impl ClientCore {
    pub fn new(config: ClientConfig, credentials: Credentials) -> Self {
        let tokens = credentials.token_store();
        Self {
            config,
            credentials,
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Assemble the envelope, reading the access token now
    pub fn build_request(&self, call: ApiCall) -> RequestEnvelope {
        let uri = call.uri(&self.config.base_url, self.config.api_version);
        let access_token = if call.signed {
            self.tokens.access_token()
        } else {
            None
        };

        build_envelope(
            call.method,
            uri,
            call.signed,
            access_token.as_deref(),
            self.config.timeout,
            &self.config.default_request_params,
            call.options,
        )
    }

    pub fn normalize_response(&self, response: RawResponse) -> Result<Value> {
        normalize(response)
    }

    /// `POST usr/api/login/` with the configured key and secret
    pub fn login_call(&self, options: RequestOptions) -> ApiCall {
        let body = LoginRequest {
            api_key: self.credentials.api_key.clone(),
            secret_key: self.credentials.api_secret.clone(),
        };
        ApiCall::new(endpoints::LOGIN)
            .with_payload(to_object(&body))
            .with_options(options)
    }

    /// `POST usr/refresh_token/` with `refresh_token` or the stored one
    pub fn refresh_call(&self, refresh_token: Option<&str>, options: RequestOptions) -> ApiCall {
        let body = RefreshTokenRequest {
            refresh: refresh_token
                .map(str::to_string)
                .or_else(|| self.tokens.refresh_token()),
        };
        ApiCall::new(endpoints::REFRESH_TOKEN)
            .with_payload(to_object(&body))
            .with_options(options)
    }

    /// Decode a login result and store both tokens; nothing is stored on failure
    pub fn apply_login(&self, value: Value) -> Result<LoginResponse> {
        let response: LoginResponse = decode(value)?;
        self.tokens
            .set_pair(response.access.clone(), response.refresh.clone());
        info!("logged in, access and refresh tokens stored");
        Ok(response)
    }

    /// Decode a refresh result and store the new access token only
    pub fn apply_refresh(&self, value: Value) -> Result<RefreshTokenResponse> {
        let response: RefreshTokenResponse = decode(value)?;
        self.tokens.set_access_token(response.access.clone());
        info!("access token refreshed");
        Ok(response)
    }
}

/// Decode a normalized result into a typed response model
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn to_object<T: serde::Serialize>(value: &T) -> serde_json::Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    }
}

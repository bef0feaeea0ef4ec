/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Bitpin client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod blocking;
pub mod config;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{Credentials, RenewalKind, RenewalTask, TokenData, TokenStore};

pub use blocking::BlockingClient;

pub use config::{API_URL, ClientConfig, RenewalObserver};

// Re-export commonly used types from http
pub use http::{
    ApiCall,
    AsyncTransport,
    BitpinClient,
    BitpinError,
    BlockingTransport,
    RequestOptions,
    Result,
    pick,
};

// Re-export all types
pub use types::*;

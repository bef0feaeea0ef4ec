/*
[INPUT]:  Client configuration, endpoint table, caller options
[OUTPUT]: Normalized API results, typed responses and BitpinError
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding endpoints or changing request/response handling
*/

pub mod client;
pub mod client_core;
pub mod endpoints;
pub mod error;
pub mod public;
pub mod request;
pub mod response;
pub mod trade;
pub mod transport;
pub mod user;

pub use error::{BitpinError, Result};
pub use request::{RequestEnvelope, RequestOptions};
pub use response::{RawResponse, pick};

pub use client::BitpinClient;
pub use client_core::ClientCore;
pub use endpoints::{ApiCall, Endpoint};
pub use transport::{AsyncTransport, BlockingReqwestTransport, BlockingTransport, ReqwestTransport};

/*
[INPUT]:  API key/secret, pre-issued tokens, environment variables
[OUTPUT]: Credentials, shared token store, background renewal handles
[POS]:    Auth layer - session state for the Bitpin clients
[UPDATE]: When credential sources or token upkeep change
*/

pub mod credentials;
pub mod renewal;
pub mod tokens;

pub use credentials::{
    Credentials, ENV_ACCESS_TOKEN, ENV_API_KEY, ENV_API_SECRET, ENV_REFRESH_TOKEN,
};
pub use renewal::{RenewalKind, RenewalTask};
pub use tokens::{TokenData, TokenStore};

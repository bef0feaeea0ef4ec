/*
[INPUT]:  Same configuration and credentials as the async client
[OUTPUT]: BlockingClient for callers without an async runtime
[POS]:    Blocking layer - thread-based client flavour
[UPDATE]: When the blocking surface changes
*/

pub mod client;

pub use client::BlockingClient;

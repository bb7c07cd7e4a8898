//! Core traits and shared types for ddnsclient
//!
//! - [`HttpClient`]: the only way the core reaches the network
//! - [`AddressFamily`]: IPv4 or IPv6

pub mod address;
pub mod http_client;

pub use address::AddressFamily;
pub use http_client::{Credentials, HttpClient, HttpRequest, HttpResponse};

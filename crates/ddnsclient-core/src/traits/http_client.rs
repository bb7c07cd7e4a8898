// # HTTP Client Trait
//
// Defines the narrow HTTP capability the core depends on.
//
// ## Implementations
//
// - reqwest: `ddnsclient-http` crate
// - Test doubles: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use ddnsclient_core::{HttpClient, HttpRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* HttpClient implementation */;
//
//     let url = "https://api.ipify.org".parse()?;
//     let response = client.get(&HttpRequest::new(url)).await?;
//     println!("{} {}", response.status, response.body);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

/// HTTP Basic credentials
///
/// The password is a [`SecretString`]; Debug output shows it as redacted.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login / user name
    pub login: String,
    /// Password or update token
    pub password: SecretString,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// A GET request issued through an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Fully built request URL, query included
    pub url: Url,
    /// Optional HTTP Basic authentication
    pub basic_auth: Option<Credentials>,
}

impl HttpRequest {
    /// Create an unauthenticated request
    pub fn new(url: Url) -> Self {
        Self {
            url,
            basic_auth: None,
        }
    }

    /// Attach HTTP Basic credentials
    pub fn with_basic_auth(mut self, credentials: Credentials) -> Self {
        self.basic_auth = Some(credentials);
        self
    }
}

/// A completed HTTP exchange, whatever its status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport implementations
///
/// The core never talks to the network directly; every discovery and update
/// request goes through this trait.
///
/// # Contract
///
/// - Exactly one request per call, no retries
/// - Any HTTP status (including 4xx/5xx) is returned as `Ok(HttpResponse)`
/// - `Err(Error::Http)` means the exchange did not complete: connection
///   refused, DNS failure for the endpoint itself, timeout, TLS failure
/// - Timeouts are the implementation's concern
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, crate::Error>;
}

// # reqwest HTTP client
//
// This crate provides the production `HttpClient` for ddnsclient.
//
// ## Purpose
//
// The core only knows the narrow `HttpClient` contract: one GET, any status
// is a response, a transport problem is `Error::Http`. This crate maps that
// contract onto reqwest:
//
// - Every request carries `User-Agent: ddnsclient/<version>`
// - Every request is bounded by the configured timeout
// - Redirects are followed (reqwest default policy)
// - HTTP Basic credentials are sent when the request has them
//
// ## Security
//
// Credentials are handed to reqwest only; they never appear in logs.

use async_trait::async_trait;
use ddnsclient_core::{DdnsConfig, Error, HttpClient, HttpRequest, HttpResponse, Result};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("ddnsclient/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    /// HTTP client
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given request timeout
    ///
    /// # Errors
    ///
    /// `Error::Http` if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a client with the timeout from configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.http_timeout())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(request.url.clone());
        if let Some(credentials) = &request.basic_auth {
            builder = builder.basic_auth(&credentials.login, Some(credentials.password.expose_secret()));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", host_of(request), e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        debug!("GET {} -> {}", host_of(request), status);

        Ok(HttpResponse { status, body })
    }
}

/// Host (and port) of a request, for messages that must not echo the query
fn host_of(request: &HttpRequest) -> String {
    match (request.url.host_str(), request.url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => request.url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn builds_with_config_timeout() {
        let config = DdnsConfig::new(
            "members.example.org",
            "user",
            "secret",
            Url::parse("https://api.ipify.org").unwrap(),
        );

        assert!(ReqwestHttpClient::from_config(&config).is_ok());
    }

    #[test]
    fn host_of_strips_query() {
        let request = HttpRequest::new(
            Url::parse("https://members.example.org:8443/nic/update?myip=203.0.113.5").unwrap(),
        );
        assert_eq!(host_of(&request), "members.example.org:8443");
    }

    #[test]
    fn user_agent_names_version() {
        assert!(USER_AGENT.starts_with("ddnsclient/"));
    }
}

//! Public address discovery
//!
//! A discovery endpoint answers a plain GET with the caller's public address
//! as the response body (e.g. `https://api.ipify.org`,
//! `https://api6.ipify.org`). The resolver issues exactly one request per
//! call and never returns an error; failures are part of [`ResolveOutcome`].

use crate::traits::{HttpClient, HttpRequest};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Result of a single resolve attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The endpoint returned a valid address literal
    Resolved(IpAddr),
    /// The request did not complete
    TransportFailure(String),
    /// The request completed but the body is not an address
    ParseFailure(String),
}

/// Fetches the current public address from a discovery endpoint
#[derive(Clone)]
pub struct AddressResolver {
    /// HTTP capability
    client: Arc<dyn HttpClient>,
}

impl AddressResolver {
    /// Create a resolver on top of an HTTP client
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Ask `endpoint` for the current address
    ///
    /// The whole response body, trimmed of surrounding whitespace, is the
    /// address literal. The HTTP status is not checked: the body is parsed
    /// whatever the status, and a non-address body yields `ParseFailure`.
    pub async fn resolve(&self, endpoint: &Url) -> ResolveOutcome {
        let response = match self.client.get(&HttpRequest::new(endpoint.clone())).await {
            Ok(response) => response,
            Err(e) => return ResolveOutcome::TransportFailure(e.to_string()),
        };

        debug!("Discovery endpoint {} answered with status {}", endpoint, response.status);

        let literal = response.body.trim();
        match literal.parse::<IpAddr>() {
            Ok(ip) => ResolveOutcome::Resolved(ip),
            Err(_) => ResolveOutcome::ParseFailure(format!(
                "malformed address '{}' (HTTP {})",
                truncate(literal, 64),
                response.status
            )),
        }
    }
}

/// Keep error messages short when an endpoint returns an HTML page
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

//! Provider update requests
//!
//! The publisher speaks the dyndns2 update protocol used by most
//! dynamic-DNS providers:
//!
//! ```text
//! GET https://{ddns_server}/nic/update?myip={ipv4}[&myipv6={ipv6}]
//! Authorization: Basic base64(login:password)
//! ```
//!
//! Any 2xx answer is a success. Providers that report problems in a 200 body
//! (`badauth`, `nohost`, ...) are not interpreted; the body is kept in the
//! outcome only for non-2xx statuses.
//!
//! # Dry-Run Mode
//!
//! When `dry_run` is true, the publisher builds the request exactly as it
//! would send it and reports [`UpdateOutcome::Accepted`] without any network
//! call.

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::traits::{Credentials, HttpClient, HttpRequest};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use url::Url;

/// Path of the dyndns2 update endpoint
const UPDATE_PATH: &str = "/nic/update";

/// Result of a single publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider answered 2xx (or dry-run)
    Accepted,
    /// The provider answered with a non-2xx status
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// The request did not complete
    TransportFailure(String),
}

impl UpdateOutcome {
    /// Whether the provider accepted the update
    pub fn is_accepted(&self) -> bool {
        matches!(self, UpdateOutcome::Accepted)
    }
}

/// A publish attempt together with the URL it targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Effective request URL (no credentials)
    pub url: Url,
    /// Whether the request was actually sent
    pub dry_run: bool,
    /// What the provider said
    pub outcome: UpdateOutcome,
}

/// Sends address updates to the provider
pub struct UpdatePublisher {
    /// HTTP capability
    client: Arc<dyn HttpClient>,

    /// `https://{ddns_server}/nic/update`, without query
    base_url: Url,

    /// Basic auth credentials
    credentials: Credentials,

    /// Build requests but never send them
    dry_run: bool,
}

impl UpdatePublisher {
    /// Create a publisher for `ddns_server`
    ///
    /// # Errors
    ///
    /// `Error::Config` if `ddns_server` does not form a valid HTTPS URL.
    pub fn new(
        client: Arc<dyn HttpClient>,
        ddns_server: &str,
        credentials: Credentials,
        dry_run: bool,
    ) -> Result<Self> {
        let base_url = update_url(ddns_server)?;

        Ok(Self {
            client,
            base_url,
            credentials,
            dry_run,
        })
    }

    /// Create a publisher from configuration
    pub fn from_config(client: Arc<dyn HttpClient>, config: &DdnsConfig) -> Result<Self> {
        Self::new(
            client,
            &config.ddns_server,
            Credentials {
                login: config.login.clone(),
                password: config.password.clone(),
            },
            config.dry_run,
        )
    }

    /// Whether this publisher sends requests
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Build the update request without sending it
    ///
    /// `myipv6` is only added when `include_ipv6` is set and an address is
    /// given, so an IPv4-only change never resends an unchanged IPv6 value.
    pub fn build_request(
        &self,
        ipv4: Ipv4Addr,
        ipv6: Option<Ipv6Addr>,
        include_ipv6: bool,
    ) -> HttpRequest {
        let mut query = format!("myip={}", ipv4);
        if let Some(ipv6) = ipv6.filter(|_| include_ipv6) {
            query.push_str(&format!("&myipv6={}", ipv6));
        }

        let mut url = self.base_url.clone();
        url.set_query(Some(&query));

        HttpRequest::new(url).with_basic_auth(self.credentials.clone())
    }

    /// Publish the given addresses
    ///
    /// Exactly one network call, or none in dry-run mode. Never returns an
    /// error; failures are reported in [`Publication::outcome`].
    pub async fn publish(
        &self,
        ipv4: Ipv4Addr,
        ipv6: Option<Ipv6Addr>,
        include_ipv6: bool,
    ) -> Publication {
        let request = self.build_request(ipv4, ipv6, include_ipv6);

        if self.dry_run {
            return Publication {
                url: request.url,
                dry_run: true,
                outcome: UpdateOutcome::Accepted,
            };
        }

        let outcome = match self.client.get(&request).await {
            Ok(response) if response.is_success() => UpdateOutcome::Accepted,
            Ok(response) => UpdateOutcome::Rejected {
                status: response.status,
                body: response.body.trim().to_string(),
            },
            Err(e) => UpdateOutcome::TransportFailure(e.to_string()),
        };

        Publication {
            url: request.url,
            dry_run: false,
            outcome,
        }
    }
}

/// Build `https://{server}/nic/update`
///
/// `ddns_server` must be a bare `host[:port]`. Anything the URL parser would
/// treat as userinfo, path, query or fragment is rejected so the update path
/// cannot move and credentials never end up in the logged URL. The offending
/// value is not echoed since it may contain a password.
pub(crate) fn update_url(ddns_server: &str) -> Result<Url> {
    let server = ddns_server.trim();
    if server.is_empty() {
        return Err(Error::config("DDNS server cannot be empty"));
    }

    let not_bare = || Error::config("DDNS server must be a bare host[:port]");

    let mut url = Url::parse(&format!("https://{}", server)).map_err(|_| not_bare())?;

    if !url.username().is_empty()
        || url.password().is_some()
        || url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(not_bare());
    }

    url.set_path(UPDATE_PATH);
    Ok(url)
}

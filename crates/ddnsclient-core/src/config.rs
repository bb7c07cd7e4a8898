//! Configuration types for ddnsclient
//!
//! [`DdnsConfig`] is the immutable, validated record the daemon runs on. How
//! it is acquired (flags, environment, TOML file) is the binary's business.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Main ddnsclient configuration
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DdnsConfig {
    /// Host of the dynamic-DNS provider (e.g. "members.dyndns.org")
    pub ddns_server: String,

    /// Provider login
    pub login: String,

    /// Provider password or update token
    pub password: SecretString,

    /// Seconds between polling cycles
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,

    /// Discovery endpoint returning the public IPv4 address
    pub ipv4_endpoint: Url,

    /// Discovery endpoint returning the public IPv6 address;
    /// IPv6 is not tracked when absent
    #[serde(default)]
    pub ipv6_endpoint: Option<Url>,

    /// Build update requests but never send them
    #[serde(default)]
    pub dry_run: bool,

    /// Verbose logging; no effect on behavior
    #[serde(default)]
    pub debug: bool,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(
        ddns_server: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        ipv4_endpoint: Url,
    ) -> Self {
        Self {
            ddns_server: ddns_server.into(),
            login: login.into(),
            password: SecretString::from(password.into()),
            delay_secs: default_delay_secs(),
            ipv4_endpoint,
            ipv6_endpoint: None,
            dry_run: false,
            debug: false,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Set the polling delay
    pub fn with_delay_secs(mut self, delay_secs: u64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    /// Enable IPv6 tracking through the given discovery endpoint
    pub fn with_ipv6_endpoint(mut self, endpoint: Url) -> Self {
        self.ipv6_endpoint = Some(endpoint);
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Polling delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// HTTP timeout as a Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Whether IPv6 is tracked
    pub fn ipv6_enabled(&self) -> bool {
        self.ipv6_endpoint.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::publisher::update_url(&self.ddns_server)?;

        if self.login.is_empty() {
            return Err(crate::Error::config("Login cannot be empty"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }

        if self.delay_secs == 0 {
            return Err(crate::Error::config("Delay must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        validate_endpoint("IPv4 endpoint", &self.ipv4_endpoint)?;
        if let Some(endpoint) = &self.ipv6_endpoint {
            validate_endpoint("IPv6 endpoint", endpoint)?;
        }

        Ok(())
    }
}

// Endpoints render as plain URLs; the password renders redacted
impl fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("ddns_server", &self.ddns_server)
            .field("login", &self.login)
            .field("password", &self.password)
            .field("delay_secs", &self.delay_secs)
            .field("ipv4_endpoint", &self.ipv4_endpoint.as_str())
            .field("ipv6_endpoint", &self.ipv6_endpoint.as_ref().map(Url::as_str))
            .field("dry_run", &self.dry_run)
            .field("debug", &self.debug)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

fn validate_endpoint(name: &str, url: &Url) -> Result<(), crate::Error> {
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(crate::Error::config(format!(
                "{} must use HTTP or HTTPS scheme, got '{}'",
                name, other
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(crate::Error::config(format!("{} has no host: {}", name, url)));
    }

    Ok(())
}

fn default_delay_secs() -> u64 {
    600
}

fn default_http_timeout_secs() -> u64 {
    30
}

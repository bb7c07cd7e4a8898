//! Clap derive structures for the `ddnsclient` command line.
//!
//! Every flag can also be given through a `DDNSCLIENT_*` environment
//! variable or a TOML file passed with `--config`.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// ddnsclient -- keep a dynamic DNS record pointed at this host
#[derive(Debug, Parser)]
#[command(
    name = "ddnsclient",
    version,
    about = "Poll the public IPv4/IPv6 address and update a dyndns2 provider when it changes"
)]
pub struct Cli {
    /// Dynamic DNS provider host (e.g. members.dyndns.org)
    #[arg(long, short = 's', env = "DDNSCLIENT_SERVER")]
    pub ddns_server: Option<String>,

    /// Provider login
    #[arg(long, short = 'u', env = "DDNSCLIENT_LOGIN")]
    pub login: Option<String>,

    /// Provider password or update token
    #[arg(long, short = 'p', env = "DDNSCLIENT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds between checks [default: 600]
    #[arg(long, short = 'd', env = "DDNSCLIENT_DELAY", value_name = "SECONDS")]
    pub delay: Option<u64>,

    /// URL returning the public IPv4 address as plain text
    #[arg(long, short = 'w', env = "DDNSCLIENT_WEB", value_name = "URL")]
    pub web: Option<Url>,

    /// URL returning the public IPv6 address as plain text (enables IPv6)
    #[arg(long = "web-v6", short = '6', env = "DDNSCLIENT_WEB_V6", value_name = "URL")]
    pub web_v6: Option<Url>,

    /// Build update requests but do not send them
    #[arg(long, short = 'n', env = "DDNSCLIENT_DRY_RUN")]
    pub dry_run: bool,

    /// Verbose logging
    #[arg(long, short = 'v', env = "DDNSCLIENT_DEBUG")]
    pub debug: bool,

    /// HTTP request timeout [default: 30]
    #[arg(long, env = "DDNSCLIENT_HTTP_TIMEOUT", value_name = "SECONDS")]
    pub http_timeout: Option<u64>,

    /// TOML file with default values for the options above
    #[arg(long, short = 'c', env = "DDNSCLIENT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

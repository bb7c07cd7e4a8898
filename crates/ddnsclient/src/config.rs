//! Configuration loading for the ddnsclient binary.
//!
//! Values come from three layers: the optional TOML file named by
//! `--config`, then environment variables, then command-line flags. Clap
//! already folds the environment into [`Cli`], so only the file layer is
//! merged here. The file uses the field names of [`DdnsConfig`]:
//!
//! ```toml
//! ddns_server = "members.dyndns.org"
//! login = "user"
//! password = "secret"
//! delay_secs = 600
//! ipv4_endpoint = "https://api.ipify.org"
//! ipv6_endpoint = "https://api6.ipify.org"
//! dry_run = false
//! debug = false
//! http_timeout_secs = 30
//! ```

use anyhow::{Context, Result, bail};
use ddnsclient_core::DdnsConfig;
use std::fs;
use std::path::Path;
use toml::{Table, Value};

use crate::cli::Cli;

/// Required settings and the flag that supplies each one
const REQUIRED: &[(&str, &str)] = &[
    ("ddns_server", "--ddns-server / DDNSCLIENT_SERVER"),
    ("login", "--login / DDNSCLIENT_LOGIN"),
    ("password", "--password / DDNSCLIENT_PASSWORD"),
    ("ipv4_endpoint", "--web / DDNSCLIENT_WEB"),
];

/// Build the validated daemon configuration from the command line and the
/// optional config file
pub fn load(cli: &Cli) -> Result<DdnsConfig> {
    let file = match &cli.config {
        Some(path) => read_file(path)?,
        None => Table::new(),
    };

    merge(cli, file)
}

/// Parse a TOML config file into a raw table
fn read_file(path: &Path) -> Result<Table> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    text.parse::<Table>()
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Overlay command-line values onto the file table and deserialize
fn merge(cli: &Cli, mut table: Table) -> Result<DdnsConfig> {
    let mut set = |key: &str, value: Value| {
        table.insert(key.to_string(), value);
    };

    if let Some(server) = &cli.ddns_server {
        set("ddns_server", Value::String(server.clone()));
    }
    if let Some(login) = &cli.login {
        set("login", Value::String(login.clone()));
    }
    if let Some(password) = &cli.password {
        set("password", Value::String(password.clone()));
    }
    if let Some(delay) = cli.delay {
        set("delay_secs", Value::Integer(to_toml_int("delay", delay)?));
    }
    if let Some(web) = &cli.web {
        set("ipv4_endpoint", Value::String(web.to_string()));
    }
    if let Some(web_v6) = &cli.web_v6 {
        set("ipv6_endpoint", Value::String(web_v6.to_string()));
    }
    // Flags can only switch these on
    if cli.dry_run {
        set("dry_run", Value::Boolean(true));
    }
    if cli.debug {
        set("debug", Value::Boolean(true));
    }
    if let Some(timeout) = cli.http_timeout {
        set(
            "http_timeout_secs",
            Value::Integer(to_toml_int("http timeout", timeout)?),
        );
    }

    for (key, source) in REQUIRED {
        if !table.contains_key(*key) {
            bail!("{} is required. Set it via {} or the config file", key, source);
        }
    }

    let config: DdnsConfig = Value::Table(table)
        .try_into()
        .context("Invalid configuration")?;
    config.validate()?;

    Ok(config)
}

fn to_toml_int(name: &str, value: u64) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("{} is out of range: {}", name, value))
}

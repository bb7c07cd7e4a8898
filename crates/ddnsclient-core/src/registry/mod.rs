//! Last-known address registry
//!
//! The registry holds the most recently observed public addresses and tells
//! the caller whether a new observation differs from the previous one.
//!
//! ## Usage
//!
//! ```rust
//! use ddnsclient_core::registry::AddressRegistry;
//!
//! let mut registry = AddressRegistry::new(false);
//!
//! assert!(registry.observe_ipv4("203.0.113.5").unwrap());
//! assert!(!registry.observe_ipv4("203.0.113.5").unwrap());
//! assert!(registry.observe_ipv4("not-an-ip").is_err());
//! ```
//!
//! The registry performs no I/O and no logging; it is owned and mutated by a
//! single `PollingDaemon` and needs no locking.

use crate::error::{Error, Result};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Last-known IPv4/IPv6 addresses for one daemon run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRegistry {
    /// Last observed IPv4 address, `0.0.0.0` until the first observation
    last_ipv4: Ipv4Addr,

    /// Last observed IPv6 address, `::` until the first observation;
    /// `None` when IPv6 tracking is disabled
    last_ipv6: Option<Ipv6Addr>,
}

/// Point-in-time copy of the registry, used to roll back a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub ipv4: Ipv4Addr,
    pub ipv6: Option<Ipv6Addr>,
}

impl AddressRegistry {
    /// Create a registry holding the unspecified addresses
    ///
    /// # Parameters
    ///
    /// - `track_ipv6`: whether an IPv6 address is tracked at all
    pub fn new(track_ipv6: bool) -> Self {
        Self {
            last_ipv4: Ipv4Addr::UNSPECIFIED,
            last_ipv6: track_ipv6.then_some(Ipv6Addr::UNSPECIFIED),
        }
    }

    /// Record an IPv4 observation
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the address differs from the previous one
    /// - `Ok(false)`: same address as before
    /// - `Err(Error::InvalidAddress)`: `raw` is not an IPv4 literal; state untouched
    pub fn observe_ipv4(&mut self, raw: &str) -> Result<bool> {
        let parsed: Ipv4Addr = raw
            .trim()
            .parse()
            .map_err(|_| Error::invalid_address(format!("'{}' is not an IPv4 address", raw)))?;

        let changed = parsed != self.last_ipv4;
        self.last_ipv4 = parsed;
        Ok(changed)
    }

    /// Record an IPv6 observation
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the address differs from the previous one
    /// - `Ok(false)`: same address as before
    /// - `Err(Error::InvalidAddress)`: `raw` is not an IPv6 literal; state untouched
    /// - `Err(Error::InvalidInput)`: IPv6 tracking is disabled
    pub fn observe_ipv6(&mut self, raw: &str) -> Result<bool> {
        let Some(last) = self.last_ipv6 else {
            return Err(Error::invalid_input("IPv6 tracking is disabled"));
        };

        let parsed: Ipv6Addr = raw
            .trim()
            .parse()
            .map_err(|_| Error::invalid_address(format!("'{}' is not an IPv6 address", raw)))?;

        let changed = parsed != last;
        self.last_ipv6 = Some(parsed);
        Ok(changed)
    }

    /// Last observed IPv4 address
    pub fn ipv4(&self) -> Ipv4Addr {
        self.last_ipv4
    }

    /// Last observed IPv6 address, `None` if IPv6 is not tracked
    pub fn ipv6(&self) -> Option<Ipv6Addr> {
        self.last_ipv6
    }

    /// Whether IPv6 is tracked
    pub fn tracks_ipv6(&self) -> bool {
        self.last_ipv6.is_some()
    }

    /// Copy the current values
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            ipv4: self.last_ipv4,
            ipv6: self.last_ipv6,
        }
    }

    /// Return to previously captured values
    ///
    /// The IPv6 tracking mode is a property of the registry and is not
    /// changed by a restore.
    pub fn restore(&mut self, snapshot: RegistrySnapshot) {
        self.last_ipv4 = snapshot.ipv4;
        if self.last_ipv6.is_some() {
            self.last_ipv6 = Some(snapshot.ipv6.unwrap_or(Ipv6Addr::UNSPECIFIED));
        }
    }
}

//! Daemon observability
//!
//! The daemon reports everything it does as a [`DaemonEvent`] to a
//! [`DaemonObserver`]. Two observers are provided:
//!
//! - [`TracingObserver`]: renders events as `tracing` log lines (what the
//!   `ddnsclient` binary uses)
//! - [`ChannelObserver`]: forwards events into a bounded channel for
//!   embedding applications and tests

use crate::publisher::UpdateOutcome;
use crate::traits::AddressFamily;
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the PollingDaemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEvent {
    /// Daemon loop started
    Started {
        delay: Duration,
        ipv6_enabled: bool,
        dry_run: bool,
    },

    /// A discovery endpoint returned an address
    Resolved {
        family: AddressFamily,
        endpoint: String,
        address: IpAddr,
    },

    /// A discovery endpoint could not be used; the daemon terminates
    ResolveFailed {
        family: AddressFamily,
        endpoint: String,
        reason: String,
    },

    /// A resolved address was compared with the last known one
    AddressObserved {
        family: AddressFamily,
        previous: IpAddr,
        current: IpAddr,
        changed: bool,
    },

    /// Nothing changed this cycle; no update sent
    NoChange {
        ipv4: IpAddr,
        ipv6: Option<IpAddr>,
    },

    /// The provider accepted the update (or dry-run)
    UpdateAccepted {
        url: String,
        dry_run: bool,
    },

    /// The update failed; the registry was rolled back
    UpdateFailed {
        url: String,
        outcome: UpdateOutcome,
    },

    /// Daemon loop stopped
    Stopped {
        reason: String,
    },
}

/// Receives daemon events
///
/// Implementations must not block; they are called inline from the daemon
/// loop.
pub trait DaemonObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &DaemonEvent);
}

/// Logs daemon events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DaemonObserver for TracingObserver {
    fn on_event(&self, event: &DaemonEvent) {
        match event {
            DaemonEvent::Started {
                delay,
                ipv6_enabled,
                dry_run,
            } => {
                info!(
                    "Polling every {}s (IPv6 {}){}",
                    delay.as_secs(),
                    if *ipv6_enabled { "enabled" } else { "disabled" },
                    if *dry_run { ", dry run" } else { "" }
                );
            }
            DaemonEvent::Resolved {
                family,
                endpoint,
                address,
            } => {
                debug!("{} from {}: {}", family, endpoint, address);
            }
            DaemonEvent::ResolveFailed {
                family,
                endpoint,
                reason,
            } => {
                warn!("Could not get {} from {}: {}", family, endpoint, reason);
            }
            DaemonEvent::AddressObserved {
                family,
                previous,
                current,
                changed,
            } => {
                if *changed {
                    info!("{} has changed: {} -> {}", family, previous, current);
                } else {
                    info!("{} has not changed: {} -> {}", family, previous, current);
                }
            }
            DaemonEvent::NoChange { ipv4, ipv6 } => match ipv6 {
                Some(ipv6) => info!(
                    "IPv4 {} and IPv6 {} did not change. Not updating the DDNS endpoint",
                    ipv4, ipv6
                ),
                None => info!("IPv4 {} did not change. Not updating the DDNS endpoint", ipv4),
            },
            DaemonEvent::UpdateAccepted { url, dry_run } => {
                if *dry_run {
                    info!("Dry run, request not sent: {}", url);
                } else {
                    info!("Request successfully sent: {}", url);
                }
            }
            DaemonEvent::UpdateFailed { url, outcome } => match outcome {
                UpdateOutcome::Rejected { status, body } => {
                    error!("Update rejected with HTTP {} ({}): {}", status, url, body);
                }
                UpdateOutcome::TransportFailure(detail) => {
                    error!("Encountered a problem setting the new IP ({}): {}", url, detail);
                }
                UpdateOutcome::Accepted => {}
            },
            DaemonEvent::Stopped { reason } => {
                info!("Daemon stopped: {}", reason);
            }
        }
    }
}

/// Forwards daemon events into a bounded channel
///
/// When the channel is full the event is dropped with a warning, so a slow
/// consumer never stalls the daemon.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::Sender<DaemonEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DaemonEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl DaemonObserver for ChannelObserver {
    fn on_event(&self, event: &DaemonEvent) {
        if self.tx.try_send(event.clone()).is_err() {
            warn!("Event channel full or closed, dropping event");
        }
    }
}

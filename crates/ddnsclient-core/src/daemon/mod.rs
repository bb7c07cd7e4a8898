//! Polling daemon
//!
//! The PollingDaemon is responsible for:
//! - Resolving the public IPv4 (and optionally IPv6) address every cycle
//! - Detecting changes against the AddressRegistry
//! - Publishing changes via the UpdatePublisher
//! - Waiting between cycles until shutdown is requested
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ ShutdownController │──── cancel ────┐
//! └────────────────────┘                │
//!                                       ▼
//!                              ┌────────────────┐
//!                              │ PollingDaemon  │
//!                              └────────────────┘
//!                                       │
//!         ┌─────────────────────────────┼─────────────────────────────┐
//!         │                             │                             │
//!         ▼                             ▼                             ▼
//! ┌─────────────────┐          ┌─────────────────┐          ┌─────────────────┐
//! │ AddressResolver │          │ AddressRegistry │          │ UpdatePublisher │
//! │ (discover)      │          │ (compare)       │          │ (update)        │
//! └─────────────────┘          └─────────────────┘          └─────────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Resolve IPv4, observe it (checkpoint before the request)
//! 2. Resolve IPv6 if configured, observe it (checkpoint before the request)
//! 3. If nothing changed, report it and wait
//! 4. Publish (checkpoint before the request); on failure roll the registry
//!    back to the start of the cycle so the next cycle sends it again
//! 5. Wait for the delay or shutdown, whichever comes first
//!
//! Any resolve failure ends the run with [`Error::Resolve`]. Publish failures
//! are reported and never end the run.

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::observer::{DaemonEvent, DaemonObserver};
use crate::publisher::{UpdateOutcome, UpdatePublisher};
use crate::registry::AddressRegistry;
use crate::resolver::{AddressResolver, ResolveOutcome};
use crate::shutdown::ShutdownController;
use crate::traits::{AddressFamily, HttpClient};
use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No address changed; nothing was published
    Unchanged,
    /// An update was attempted
    Published(UpdateOutcome),
    /// Shutdown was observed at a checkpoint before the cycle completed
    Interrupted,
}

/// Core polling daemon
///
/// ## Lifecycle
///
/// 1. Create with [`PollingDaemon::new()`] or [`PollingDaemon::from_config()`]
/// 2. Start with [`PollingDaemon::run()`]
/// 3. The daemon runs until its ShutdownController is signalled (`Ok`) or a
///    discovery endpoint fails (`Err`)
///
/// ## Threading
///
/// One cycle at a time, on whichever task awaits `run()`. The registry is
/// owned by the daemon and never shared.
pub struct PollingDaemon {
    /// Immutable configuration
    config: Arc<DdnsConfig>,

    /// Last-known addresses
    registry: AddressRegistry,

    /// Discovery client
    resolver: AddressResolver,

    /// Provider client
    publisher: UpdatePublisher,

    /// Event sink
    observer: Arc<dyn DaemonObserver>,

    /// Cooperative cancellation
    shutdown: ShutdownController,
}

impl PollingDaemon {
    /// Create a daemon from its collaborators
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid or the registry's IPv6
    /// mode does not match the configured IPv6 endpoint.
    pub fn new(
        config: Arc<DdnsConfig>,
        registry: AddressRegistry,
        resolver: AddressResolver,
        publisher: UpdatePublisher,
        observer: Arc<dyn DaemonObserver>,
        shutdown: ShutdownController,
    ) -> Result<Self> {
        config.validate()?;

        if registry.tracks_ipv6() != config.ipv6_enabled() {
            return Err(Error::config(
                "Registry IPv6 tracking does not match the IPv6 endpoint configuration",
            ));
        }

        Ok(Self {
            config,
            registry,
            resolver,
            publisher,
            observer,
            shutdown,
        })
    }

    /// Wire a daemon with the default collaborators
    ///
    /// # Parameters
    ///
    /// - `config`: ddnsclient configuration
    /// - `client`: HTTP capability shared by the resolver and publisher
    /// - `observer`: event sink
    /// - `shutdown`: controller the caller keeps a clone of
    pub fn from_config(
        config: DdnsConfig,
        client: Arc<dyn HttpClient>,
        observer: Arc<dyn DaemonObserver>,
        shutdown: ShutdownController,
    ) -> Result<Self> {
        let registry = AddressRegistry::new(config.ipv6_enabled());
        let resolver = AddressResolver::new(Arc::clone(&client));
        let publisher = UpdatePublisher::from_config(client, &config)?;

        Self::new(
            Arc::new(config),
            registry,
            resolver,
            publisher,
            observer,
            shutdown,
        )
    }

    /// Run until shutdown
    ///
    /// # Returns
    ///
    /// - `Ok(())`: shutdown was requested
    /// - `Err(Error::Resolve)`: a discovery endpoint failed (fail-fast)
    pub async fn run(&mut self) -> Result<()> {
        self.emit(DaemonEvent::Started {
            delay: self.config.delay(),
            ipv6_enabled: self.config.ipv6_enabled(),
            dry_run: self.publisher.is_dry_run(),
        });

        let result = self.run_loop().await;

        let reason = match &result {
            Ok(()) => self
                .shutdown
                .reason()
                .unwrap_or_else(|| "Shutdown signal".to_string()),
            Err(e) => e.to_string(),
        };
        self.emit(DaemonEvent::Stopped { reason });

        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        loop {
            if self.shutdown.is_set() {
                return Ok(());
            }

            if self.run_cycle().await? == CycleOutcome::Interrupted {
                return Ok(());
            }

            if !self.wait().await {
                return Ok(());
            }
        }
    }

    /// Run one resolve → decide → publish cycle, without the wait
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let snapshot = self.registry.snapshot();

        // Resolving: IPv4 (mandatory)
        if self.shutdown.is_set() {
            return Ok(CycleOutcome::Interrupted);
        }
        let endpoint = self.config.ipv4_endpoint.clone();
        let ipv4_changed = match self.resolve_and_observe(AddressFamily::V4, &endpoint).await {
            Ok(changed) => changed,
            Err(e) => {
                self.registry.restore(snapshot);
                return Err(e);
            }
        };

        // Resolving: IPv6 (optional)
        let ipv6_changed = match self.config.ipv6_endpoint.clone() {
            Some(endpoint) => {
                if self.shutdown.is_set() {
                    self.registry.restore(snapshot);
                    return Ok(CycleOutcome::Interrupted);
                }
                match self.resolve_and_observe(AddressFamily::V6, &endpoint).await {
                    Ok(changed) => changed,
                    Err(e) => {
                        self.registry.restore(snapshot);
                        return Err(e);
                    }
                }
            }
            None => false,
        };

        // Deciding
        if !ipv4_changed && !ipv6_changed {
            self.emit(DaemonEvent::NoChange {
                ipv4: IpAddr::V4(self.registry.ipv4()),
                ipv6: self.registry.ipv6().map(IpAddr::V6),
            });
            return Ok(CycleOutcome::Unchanged);
        }

        // Publishing
        if self.shutdown.is_set() {
            self.registry.restore(snapshot);
            return Ok(CycleOutcome::Interrupted);
        }

        let publication = self
            .publisher
            .publish(self.registry.ipv4(), self.registry.ipv6(), ipv6_changed)
            .await;

        if publication.outcome.is_accepted() {
            self.emit(DaemonEvent::UpdateAccepted {
                url: publication.url.to_string(),
                dry_run: publication.dry_run,
            });
        } else {
            debug!("Rolling registry back to {:?}", snapshot);
            self.registry.restore(snapshot);
            self.emit(DaemonEvent::UpdateFailed {
                url: publication.url.to_string(),
                outcome: publication.outcome.clone(),
            });
        }

        Ok(CycleOutcome::Published(publication.outcome))
    }

    /// Resolve one family and feed the result into the registry
    ///
    /// # Returns
    ///
    /// Whether the address changed, or `Error::Resolve` on any failure
    /// (transport, parse, or a literal of the wrong family).
    async fn resolve_and_observe(&mut self, family: AddressFamily, endpoint: &Url) -> Result<bool> {
        let address = match self.resolver.resolve(endpoint).await {
            ResolveOutcome::Resolved(address) => address,
            ResolveOutcome::TransportFailure(reason) => {
                return Err(self.resolve_failed(family, endpoint, reason));
            }
            ResolveOutcome::ParseFailure(reason) => {
                return Err(self.resolve_failed(family, endpoint, reason));
            }
        };

        self.emit(DaemonEvent::Resolved {
            family,
            endpoint: endpoint.to_string(),
            address,
        });

        let literal = address.to_string();
        let (previous, observed) = match family {
            AddressFamily::V4 => (
                IpAddr::V4(self.registry.ipv4()),
                self.registry.observe_ipv4(&literal),
            ),
            AddressFamily::V6 => (
                IpAddr::V6(self.registry.ipv6().unwrap_or(Ipv6Addr::UNSPECIFIED)),
                self.registry.observe_ipv6(&literal),
            ),
        };

        match observed {
            Ok(changed) => {
                self.emit(DaemonEvent::AddressObserved {
                    family,
                    previous,
                    current: address,
                    changed,
                });
                Ok(changed)
            }
            Err(e) => Err(self.resolve_failed(family, endpoint, e.to_string())),
        }
    }

    fn resolve_failed(&self, family: AddressFamily, endpoint: &Url, reason: String) -> Error {
        self.emit(DaemonEvent::ResolveFailed {
            family,
            endpoint: endpoint.to_string(),
            reason: reason.clone(),
        });
        Error::resolve(family, endpoint.as_str(), reason)
    }

    /// Sleep for the polling delay
    ///
    /// # Returns
    ///
    /// `false` if shutdown was requested before the delay elapsed
    async fn wait(&self) -> bool {
        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => false,
            () = tokio::time::sleep(self.config.delay()) => true,
        }
    }

    fn emit(&self, event: DaemonEvent) {
        self.observer.on_event(&event);
    }

    /// Last-known addresses
    pub fn registry(&self) -> &AddressRegistry {
        &self.registry
    }
}

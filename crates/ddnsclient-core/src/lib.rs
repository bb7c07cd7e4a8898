// # ddnsclient-core
//
// Core library for the ddnsclient dynamic DNS updater.
//
// ## Architecture Overview
//
// - **AddressRegistry**: last-known IPv4/IPv6 values with change-detecting setters
// - **AddressResolver**: asks a discovery endpoint for the current public address
// - **UpdatePublisher**: sends the `/nic/update` request to the provider
// - **PollingDaemon**: resolve → decide → publish → wait, until shutdown
// - **ShutdownController**: cooperative cancellation shared with signal handlers
//
// HTTP is reached only through the [`HttpClient`] trait; the reqwest-backed
// implementation lives in `ddnsclient-http`.

pub mod traits;
pub mod daemon;
pub mod registry;
pub mod resolver;
pub mod publisher;
pub mod shutdown;
pub mod observer;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AddressFamily, HttpClient, HttpRequest, HttpResponse, Credentials};
pub use daemon::{CycleOutcome, PollingDaemon};
pub use registry::{AddressRegistry, RegistrySnapshot};
pub use resolver::{AddressResolver, ResolveOutcome};
pub use publisher::{Publication, UpdateOutcome, UpdatePublisher};
pub use shutdown::ShutdownController;
pub use observer::{ChannelObserver, DaemonEvent, DaemonObserver, TracingObserver};
pub use config::DdnsConfig;
pub use error::{Error, Result};

//! Cooperative shutdown
//!
//! [`ShutdownController`] is created once by the embedding application and
//! cloned into everything that needs it: the signal handler sets it, the
//! `PollingDaemon` observes it before every network call and while waiting
//! between cycles.
//!
//! ```rust
//! use ddnsclient_core::ShutdownController;
//!
//! let shutdown = ShutdownController::new();
//! let handle = shutdown.clone();
//!
//! assert!(!shutdown.is_set());
//! handle.signal("SIGTERM");
//! handle.signal("SIGINT"); // no effect beyond the first
//! assert!(shutdown.is_set());
//! assert_eq!(shutdown.reason().as_deref(), Some("SIGTERM"));
//! ```

use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;

/// Process-wide cancellation flag with an async wake-up
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl ShutdownController {
    /// Create an unset controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown
    ///
    /// Safe to call any number of times from any task; only the first call
    /// records its reason.
    ///
    /// # Returns
    ///
    /// `true` if this call set the flag, `false` if it was already set
    pub fn signal(&self, reason: impl Into<String>) -> bool {
        let first = self.reason.set(reason.into()).is_ok();
        self.token.cancel();
        first
    }

    /// Whether shutdown was requested
    pub fn is_set(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason given by the first `signal` call
    pub fn reason(&self) -> Option<String> {
        self.reason.get().cloned()
    }

    /// Resolves once shutdown is requested (immediately if already set)
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

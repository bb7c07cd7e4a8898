//! Test doubles and common utilities for daemon contract tests
//!
//! The daemon only reaches the network through `HttpClient`, so a scripted
//! client is enough to drive every state-machine path.

#![allow(dead_code)]

use ddnsclient_core::error::{Error, Result};
use ddnsclient_core::{
    ChannelObserver, DaemonEvent, DdnsConfig, HttpClient, HttpRequest, HttpResponse,
    PollingDaemon, ShutdownController,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use url::Url;

pub const IPV4_HOST: &str = "ip4.test";
pub const IPV6_HOST: &str = "ip6.test";
pub const DDNS_HOST: &str = "members.example.org";

/// An HttpClient answering from per-host scripts
///
/// Each host has a queue of replies; the last reply of a queue is repeated
/// once the queue is down to it.
pub struct ScriptedHttpClient {
    /// Scripted replies per host
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse>>>>,
    /// Every request received, in order
    requests: Mutex<Vec<HttpRequest>>,
    /// Total call counter
    call_count: AtomicUsize,
    /// Signal this controller once `call_count` reaches the given value
    shutdown_after: Mutex<Option<(usize, ShutdownController)>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            shutdown_after: Mutex::new(None),
        })
    }

    /// Queue a successful exchange for `host`
    pub fn reply(&self, host: &str, status: u16, body: &str) -> &Self {
        self.push(host, Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure for `host`
    pub fn fail(&self, host: &str, detail: &str) -> &Self {
        self.push(host, Err(Error::http(detail)))
    }

    fn push(&self, host: &str, reply: Result<HttpResponse>) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(host.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Signal `shutdown` when the `calls`-th request is served
    pub fn shutdown_after(&self, calls: usize, shutdown: ShutdownController) {
        *self.shutdown_after.lock().unwrap() = Some((calls, shutdown));
    }

    /// Number of requests served
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests sent to `host`
    pub fn requests_to(&self, host: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url.host_str() == Some(host))
            .cloned()
            .collect()
    }

    /// Update requests sent to the provider, as URL strings
    pub fn update_urls(&self) -> Vec<String> {
        self.requests_to(DDNS_HOST)
            .into_iter()
            .map(|request| request.url.to_string())
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let calls = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        let host = request.url.host_str().unwrap_or_default().to_string();
        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .get_mut(&host)
                .unwrap_or_else(|| panic!("no script for host {host}"));
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            }
        };

        if let Some((after, shutdown)) = self.shutdown_after.lock().unwrap().as_ref() {
            if calls >= *after {
                shutdown.signal("test shutdown");
            }
        }

        reply
    }
}

/// Configuration pointing at the scripted hosts
pub fn test_config() -> DdnsConfig {
    DdnsConfig::new(
        DDNS_HOST,
        "user",
        "secret",
        Url::parse(&format!("https://{IPV4_HOST}/")).unwrap(),
    )
}

/// Same as `test_config` with IPv6 tracking
pub fn dual_stack_config() -> DdnsConfig {
    test_config().with_ipv6_endpoint(Url::parse(&format!("https://{IPV6_HOST}/")).unwrap())
}

/// Build a daemon over `client`, returning its event receiver
pub fn daemon(
    config: DdnsConfig,
    client: Arc<ScriptedHttpClient>,
    shutdown: ShutdownController,
) -> (PollingDaemon, mpsc::Receiver<DaemonEvent>) {
    let (observer, events) = ChannelObserver::new(1000);
    let daemon = PollingDaemon::from_config(config, client, Arc::new(observer), shutdown)
        .expect("daemon construction succeeds");
    (daemon, events)
}

/// Collect every event emitted so far
pub fn drain(events: &mut mpsc::Receiver<DaemonEvent>) -> Vec<DaemonEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

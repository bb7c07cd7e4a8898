//! Contract Test: Change Detection
//!
//! Constraints verified:
//! - A changed address is published exactly once
//! - An unchanged address is never published
//! - `myipv6` is only sent when the IPv6 address changed in that cycle
//! - Every observation is reported, per address family
//!
//! If this test fails, the daemon either spams the provider or misses updates.

mod common;

use common::*;
use ddnsclient_core::{AddressFamily, CycleOutcome, DaemonEvent, ShutdownController, UpdateOutcome};
use secrecy::ExposeSecret;
use std::net::{IpAddr, Ipv4Addr};

#[tokio::test]
async fn changed_address_published_once() {
    let client = ScriptedHttpClient::new();
    client.reply(IPV4_HOST, 200, "203.0.113.5\n");
    client.reply(DDNS_HOST, 200, "good 203.0.113.5");

    let (mut daemon, mut events) = daemon(test_config(), client.clone(), ShutdownController::new());

    // Cycle 1: 0.0.0.0 -> 203.0.113.5
    let outcome = daemon.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Published(UpdateOutcome::Accepted));
    assert_eq!(
        client.update_urls(),
        vec![format!("https://{DDNS_HOST}/nic/update?myip=203.0.113.5")]
    );

    // Cycle 2: same address, nothing sent
    let outcome = daemon.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Unchanged);
    assert_eq!(client.update_urls().len(), 1, "unchanged address must not be re-published");
    assert_eq!(daemon.registry().ipv4(), Ipv4Addr::new(203, 0, 113, 5));

    let events = drain(&mut events);
    assert!(events.contains(&DaemonEvent::UpdateAccepted {
        url: format!("https://{DDNS_HOST}/nic/update?myip=203.0.113.5"),
        dry_run: false,
    }));
    assert!(events.contains(&DaemonEvent::NoChange {
        ipv4: "203.0.113.5".parse().unwrap(),
        ipv6: None,
    }));
}

#[tokio::test]
async fn update_uses_basic_auth() {
    let client = ScriptedHttpClient::new();
    client.reply(IPV4_HOST, 200, "203.0.113.5");
    client.reply(DDNS_HOST, 200, "good");

    let (mut daemon, _events) = daemon(test_config(), client.clone(), ShutdownController::new());
    daemon.run_cycle().await.unwrap();

    let update = &client.requests_to(DDNS_HOST)[0];
    let credentials = update.basic_auth.as_ref().expect("update is authenticated");
    assert_eq!(credentials.login, "user");
    assert_eq!(credentials.password.expose_secret(), "secret");

    // Discovery requests carry no credentials
    assert!(client.requests_to(IPV4_HOST)[0].basic_auth.is_none());
}

#[tokio::test]
async fn ipv4_change_alone_omits_ipv6() {
    let client = ScriptedHttpClient::new();
    client
        .reply(IPV4_HOST, 200, "203.0.113.5")
        .reply(IPV4_HOST, 200, "203.0.113.6");
    client.reply(IPV6_HOST, 200, "2001:db8::5");
    client.reply(DDNS_HOST, 200, "good");

    let (mut daemon, _events) = daemon(dual_stack_config(), client.clone(), ShutdownController::new());

    // Cycle 1: both change
    daemon.run_cycle().await.unwrap();
    // Cycle 2: only IPv4 changes
    daemon.run_cycle().await.unwrap();

    let urls = client.update_urls();
    assert_eq!(urls.len(), 2);
    assert_eq!(
        urls[0],
        format!("https://{DDNS_HOST}/nic/update?myip=203.0.113.5&myipv6=2001:db8::5")
    );
    assert_eq!(urls[1], format!("https://{DDNS_HOST}/nic/update?myip=203.0.113.6"));
    assert!(!urls[1].contains("myipv6"));
}

#[tokio::test]
async fn ipv6_change_alone_still_sends_ipv4() {
    let client = ScriptedHttpClient::new();
    client.reply(IPV4_HOST, 200, "203.0.113.5");
    client
        .reply(IPV6_HOST, 200, "2001:db8::5")
        .reply(IPV6_HOST, 200, "2001:db8::6");
    client.reply(DDNS_HOST, 200, "good");

    let (mut daemon, _events) = daemon(dual_stack_config(), client.clone(), ShutdownController::new());

    daemon.run_cycle().await.unwrap();
    daemon.run_cycle().await.unwrap();

    let update = &client.requests_to(DDNS_HOST)[1];
    let pairs: Vec<(String, String)> = update.url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("myip".to_string(), "203.0.113.5".to_string()),
            ("myipv6".to_string(), "2001:db8::6".to_string()),
        ]
    );
}

#[tokio::test]
async fn dual_stack_unchanged_is_not_published() {
    let client = ScriptedHttpClient::new();
    client.reply(IPV4_HOST, 200, "203.0.113.5");
    client.reply(IPV6_HOST, 200, "2001:db8::5");
    client.reply(DDNS_HOST, 200, "good");

    let (mut daemon, mut events) = daemon(dual_stack_config(), client.clone(), ShutdownController::new());

    daemon.run_cycle().await.unwrap();
    drain(&mut events);

    assert_eq!(daemon.run_cycle().await.unwrap(), CycleOutcome::Unchanged);
    assert_eq!(client.update_urls().len(), 1);

    let v4: IpAddr = "203.0.113.5".parse().unwrap();
    let v6: IpAddr = "2001:db8::5".parse().unwrap();
    let events = drain(&mut events);
    assert!(events.contains(&DaemonEvent::AddressObserved {
        family: AddressFamily::V4,
        previous: v4,
        current: v4,
        changed: false,
    }));
    assert!(events.contains(&DaemonEvent::AddressObserved {
        family: AddressFamily::V6,
        previous: v6,
        current: v6,
        changed: false,
    }));
    assert_eq!(
        events.last(),
        Some(&DaemonEvent::NoChange {
            ipv4: v4,
            ipv6: Some(v6)
        })
    );
}

#[tokio::test]
async fn dry_run_never_contacts_provider() {
    let client = ScriptedHttpClient::new();
    client.reply(IPV4_HOST, 200, "203.0.113.5");

    let config = test_config().with_dry_run(true);
    let (mut daemon, mut events) = daemon(config, client.clone(), ShutdownController::new());

    let outcome = daemon.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Published(UpdateOutcome::Accepted));
    assert!(client.requests_to(DDNS_HOST).is_empty());

    let events = drain(&mut events);
    assert!(events.contains(&DaemonEvent::UpdateAccepted {
        url: format!("https://{DDNS_HOST}/nic/update?myip=203.0.113.5"),
        dry_run: true,
    }));

    // Registry still advances under dry-run
    assert_eq!(daemon.run_cycle().await.unwrap(), CycleOutcome::Unchanged);
}

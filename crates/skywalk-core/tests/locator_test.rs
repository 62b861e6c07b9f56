#![allow(clippy::unwrap_used)]
// Integration tests for `Locator` against a mocked location server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skywalk_core::{
    CoreError, Credentials, ErrorKind, Fix, LoadFailure, Locator, LocatorConfig, NotFound,
    OnboardingEnvelope, ResolvedPosition, Tag, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

const SITE: i64 = 3;

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.into(),
        password: SecretString::from(password.to_owned()),
    }
}

fn config_for(server: &MockServer) -> LocatorConfig {
    let mut config = LocatorConfig::new(Url::parse(&server.uri()).unwrap());
    config.credentials = Some(credentials("ana", "hunter2"));
    config.site = Some(SITE);
    config.timeout = Duration::from_secs(5);
    config
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/authentication"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token))
        .mount(server)
        .await;
}

async fn mount_receivers(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_tags(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/tags")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_position(server: &MockServer, tag: i64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/tags/{tag}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A server with a logged-in locator and the standard topology.
async fn connected() -> (MockServer, Locator) {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    mount_receivers(
        &server,
        json!([
            {"id": 1, "x": 0.0, "y": 0.0, "z": 0},
            {"id": 2, "x": 12.5, "y": 4.0, "z": 1}
        ]),
    )
    .await;
    mount_tags(
        &server,
        json!([{"id": 9, "name": "Forklift"}, {"id": 10, "name": "me"}]),
    )
    .await;

    let mut config = config_for(&server);
    config.own_tag = Some(10);
    let locator = Locator::new(config).unwrap();
    locator.connect().await.unwrap();
    (server, locator)
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_connect_loads_site() {
    let (_server, locator) = connected().await;

    assert!(locator.session().is_authenticated());
    let site = locator.site().unwrap();
    assert_eq!(site.id(), SITE);
    assert_eq!(site.receivers().unwrap().len(), 2);
    assert_eq!(
        site.available_tags().unwrap(),
        vec![Tag {
            id: 9,
            name: "Forklift".into()
        }]
    );
}

#[tokio::test]
async fn test_connect_without_credentials() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.credentials = None;

    let err = Locator::new(config).unwrap().connect().await.unwrap_err();
    assert!(matches!(err, CoreError::MissingCredentials { .. }));
}

#[tokio::test]
async fn test_bad_login_leaves_session_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/authentication"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let locator = Locator::new(config_for(&server)).unwrap();
    let err = locator
        .login(&credentials("ana", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::InvalidCredentials));
    assert!(!locator.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_then_calls_fail_locally() {
    let (_server, locator) = connected().await;

    assert!(locator.logout());
    assert!(!locator.logout());

    let err = locator.refresh_tags().await.unwrap_err();
    assert!(matches!(err, CoreError::NoTokenSet));
}

#[tokio::test]
async fn test_clones_share_session() {
    let (_server, locator) = connected().await;
    let other = locator.clone();

    locator.logout();
    assert!(!other.session().is_authenticated());
}

// ── Onboarding ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_onboard_uses_envelope_server_and_credentials() {
    let configured = MockServer::start().await;
    let onboarded = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/authentication"))
        .and(body_json(json!({"login": "bo", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
        .expect(1)
        .mount(&onboarded)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/tags")))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&onboarded)
        .await;

    let locator = Locator::new(config_for(&configured)).unwrap();
    let payload = json!({
        "scheme": "xtremeloc",
        "url": onboarded.uri(),
        "username": "bo",
        "password": "pw"
    })
    .to_string();
    let envelope = OnboardingEnvelope::parse(&payload).unwrap();

    locator.onboard(&envelope).await.unwrap();

    assert_eq!(
        locator.session().endpoint().unwrap(),
        Url::parse(&onboarded.uri()).unwrap()
    );
    assert!(locator.refresh_tags().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_onboard_falls_back_to_configured_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/authentication"))
        .and(body_json(json!({"login": "ana", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok"))
        .expect(1)
        .mount(&server)
        .await;

    let locator = Locator::new(config_for(&server)).unwrap();
    let payload = json!({"scheme": "xtremeloc", "url": server.uri()}).to_string();
    locator
        .onboard(&OnboardingEnvelope::parse(&payload).unwrap())
        .await
        .unwrap();

    assert!(locator.session().is_authenticated());
}

#[tokio::test]
async fn test_onboard_without_any_credentials() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.credentials = None;

    let locator = Locator::new(config).unwrap();
    let payload = json!({"scheme": "xtremeloc", "url": server.uri(), "username": "bo"}).to_string();
    let err = locator
        .onboard(&OnboardingEnvelope::parse(&payload).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MissingCredentials { .. }));
}

// ── Site selection & reference data ─────────────────────────────────

#[tokio::test]
async fn test_no_site_selected() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    let mut config = config_for(&server);
    config.site = None;

    let locator = Locator::new(config).unwrap();
    locator.login(&credentials("ana", "hunter2")).await.unwrap();

    assert!(locator.site().is_none());
    assert!(matches!(
        locator.refresh_receivers().await.unwrap_err(),
        CoreError::NoSiteSelected
    ));
    assert!(matches!(
        locator.locate(9).await.unwrap_err(),
        CoreError::NoSiteSelected
    ));
}

#[tokio::test]
async fn test_select_site_discards_loaded_data() {
    let (_server, locator) = connected().await;
    let before = locator.site().unwrap();
    assert!(before.is_topology_loaded());

    let after = locator.select_site(4);
    assert_eq!(after.id(), 4);
    assert!(!after.is_topology_loaded());
    assert_eq!(after.own_tag(), Some(10));
    // Old snapshot untouched.
    assert!(before.is_topology_loaded());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_topology() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "x": 1.0, "y": 2.0, "z": 0}])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let locator = Locator::new(config_for(&server)).unwrap();
    locator.login(&credentials("ana", "hunter2")).await.unwrap();
    locator.refresh_receivers().await.unwrap();

    let err = locator.refresh_receivers().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Server));
    assert_eq!(err.load_failure(), LoadFailure::Server);
    assert_eq!(locator.site().unwrap().receivers().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_receiver_load_replaces_first() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "x": 0.0, "y": 0.0, "z": 0},
            {"id": 2, "x": 1.0, "y": 1.0, "z": 0}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_receivers(&server, json!([{"id": 5, "x": 8.0, "y": 9.0, "z": 3}])).await;

    let locator = Locator::new(config_for(&server)).unwrap();
    locator.login(&credentials("ana", "hunter2")).await.unwrap();
    locator.refresh_receivers().await.unwrap();
    let reloaded = locator.refresh_receivers().await.unwrap();

    let ids: Vec<i64> = reloaded.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5]);
    let site = locator.site().unwrap();
    assert!(site.receiver(1).is_none());
    assert_eq!(site.receiver(5).unwrap().level, 3);
}

// ── Beacon registration ─────────────────────────────────────────────

#[tokio::test]
async fn test_register_beacon_uses_configured_namespace() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path(format!("/api/centers/{SITE}/tags")))
        .and(body_json(json!({"name": "Ana's phone"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"major": 7, "minor": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let namespace = Uuid::from_u128(0x1234);
    let mut config = config_for(&server);
    config.beacon_namespace = namespace;

    let locator = Locator::new(config).unwrap();
    locator.login(&credentials("ana", "hunter2")).await.unwrap();
    let beacon = locator.register_beacon("Ana's phone").await.unwrap();

    assert_eq!(beacon.namespace, namespace);
    assert_eq!((beacon.major, beacon.minor), (7, 42));
}

// ── Positioning ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_locate_resolves_nearest_receiver() {
    let (server, locator) = connected().await;
    mount_position(&server, 9, json!({"nearest_rdhub": 2})).await;

    let fix = locator.locate(9).await.unwrap();
    assert_eq!(
        fix,
        Fix::Located(ResolvedPosition {
            receiver_id: 2,
            x: 12.5,
            y: 4.0,
            level: 1
        })
    );
}

#[tokio::test]
async fn test_locate_pending() {
    let (server, locator) = connected().await;
    mount_position(&server, 9, json!({"nearest_rdhub": null})).await;

    assert_eq!(locator.locate(9).await.unwrap(), Fix::Pending);
}

#[tokio::test]
async fn test_locate_unknown_receiver_is_not_an_error() {
    let (server, locator) = connected().await;
    mount_position(&server, 9, json!({"nearest_rdhub": 77})).await;

    assert_eq!(
        locator.locate(9).await.unwrap(),
        Fix::Unresolved(NotFound::UnknownReceiver { receiver_id: 77 })
    );
}

#[tokio::test]
async fn test_locate_or_reload_picks_up_new_receiver() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "x": 0.0, "y": 0.0, "z": 0}])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/rdhubs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "x": 0.0, "y": 0.0, "z": 0},
            {"id": 77, "x": 3.0, "y": 5.0, "z": 2}
        ])))
        .mount(&server)
        .await;
    mount_tags(&server, json!([{"id": 9, "name": "Forklift"}])).await;
    mount_position(&server, 9, json!({"nearest_rdhub": 77})).await;

    let locator = Locator::new(config_for(&server)).unwrap();
    locator.connect().await.unwrap();

    let fix = locator.locate_or_reload(9).await.unwrap();
    assert_eq!(
        fix,
        Fix::Located(ResolvedPosition {
            receiver_id: 77,
            x: 3.0,
            y: 5.0,
            level: 2
        })
    );
}

#[tokio::test]
async fn test_locate_or_reload_gives_up_after_one_reload() {
    let (server, locator) = connected().await;
    mount_position(&server, 9, json!({"nearest_rdhub": 77})).await;

    assert_eq!(
        locator.locate_or_reload(9).await.unwrap(),
        Fix::Unresolved(NotFound::UnknownReceiver { receiver_id: 77 })
    );
}

#[tokio::test]
async fn test_locate_or_reload_loads_missing_topology_with_one_lookup() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    mount_receivers(
        &server,
        json!([{"id": 2, "x": 12.5, "y": 4.0, "z": 1}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/centers/{SITE}/tags/9")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nearest_rdhub": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let locator = Locator::new(config_for(&server)).unwrap();
    locator.login(&credentials("ana", "hunter2")).await.unwrap();
    locator.select_site(SITE);

    let fix = locator.locate_or_reload(9).await.unwrap();
    assert_eq!(
        fix,
        Fix::Located(ResolvedPosition {
            receiver_id: 2,
            x: 12.5,
            y: 4.0,
            level: 1
        })
    );
}

#[tokio::test]
async fn test_unreachable_server_is_internet_failure() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let locator = Locator::new(config).unwrap();
    let err = locator.connect().await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Connectivity));
    assert_eq!(err.load_failure(), LoadFailure::Internet);
}

#[tokio::test]
async fn test_fix_serializes_with_state_tag() {
    let located = serde_json::to_value(Fix::Located(ResolvedPosition {
        receiver_id: 2,
        x: 1.0,
        y: 2.0,
        level: 0,
    }))
    .unwrap();
    assert_eq!(
        located,
        json!({"state": "located", "receiver_id": 2, "x": 1.0, "y": 2.0, "level": 0})
    );

    let unresolved =
        serde_json::to_value(Fix::Unresolved(NotFound::UnknownReceiver { receiver_id: 5 }))
            .unwrap();
    assert_eq!(
        unresolved,
        json!({"state": "unresolved", "reason": "unknown_receiver", "receiver_id": 5})
    );
}

#[test]
fn test_unreadable_ca_file_is_config_error() {
    let mut config = LocatorConfig::new(Url::parse("https://rtls.example.com").unwrap());
    config.tls = TlsVerification::CustomCa("/nonexistent/skywalk-ca.pem".into());

    let err = Locator::new(config).unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }));
    assert_eq!(err.kind(), None);
}

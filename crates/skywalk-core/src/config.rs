// ── Runtime connection configuration ──
//
// These types describe *how* to reach a location server and which site
// to work with. They carry credential data and connection tuning, but
// never touch disk. The CLI constructs a `LocatorConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use uuid::Uuid;

use skywalk_api::{DEFAULT_BEACON_NAMESPACE, SiteId, TagId};

/// Username/password pair for `POST /api/authentication`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab servers).
    DangerAcceptInvalid,
}

/// Configuration for one location server.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Server base URL (e.g., `https://rtls.example.com`).
    pub server: Url,
    /// Credentials used by [`Locator::connect`](crate::Locator::connect).
    pub credentials: Option<Credentials>,
    /// Site to select on construction, if known up front.
    pub site: Option<SiteId>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Proximity UUID stamped on registered beacon identities.
    pub beacon_namespace: Uuid,
    /// This device's own tag, hidden from the usable tag set.
    pub own_tag: Option<TagId>,
}

impl LocatorConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            credentials: None,
            site: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            beacon_namespace: DEFAULT_BEACON_NAMESPACE,
            own_tag: None,
        }
    }
}

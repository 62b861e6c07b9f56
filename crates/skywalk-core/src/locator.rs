// ── Locator facade ──
//
// Ties one `ServerClient`, one `Session`, and the selected `Site`
// together. Authentication and reference-data loads are serialized
// behind async mutexes; reads go straight to the atomic snapshots.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use skywalk_api::transport::{TlsMode, TransportConfig};
use skywalk_api::{
    BeaconIdentity, LastPosition, OnboardingEnvelope, Receiver, ServerClient, Session, SiteId,
    Tag, TagId,
};

use crate::config::{Credentials, LocatorConfig, TlsVerification};
use crate::error::CoreError;
use crate::resolver::{self, NotFound, ResolvedPosition};
use crate::site::Site;

/// What a single position lookup produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Fix {
    /// The tag is nearest to a known receiver.
    Located(ResolvedPosition),
    /// The server has no fix for the tag yet.
    Pending,
    /// The server named a receiver the loaded topology does not have.
    Unresolved(NotFound),
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<LocatorInner>`; every clone shares the
/// session and the selected site.
#[derive(Clone)]
pub struct Locator {
    inner: Arc<LocatorInner>,
}

struct LocatorInner {
    config: LocatorConfig,
    client: ServerClient,
    session: Session,
    site: ArcSwapOption<Site>,
    /// At most one authentication in flight.
    auth_lock: Mutex<()>,
    /// At most one receiver/tag load in flight; loads land in issue order.
    load_lock: Mutex<()>,
}

impl Locator {
    /// Build the HTTP client from `config` and, if `config.site` is set,
    /// select that site. Does NOT authenticate.
    pub fn new(config: LocatorConfig) -> Result<Self, CoreError> {
        let client = ServerClient::new(&build_transport(&config))
            .map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?
            .with_beacon_namespace(config.beacon_namespace);
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (its beacon namespace is kept as is).
    pub fn with_client(config: LocatorConfig, client: ServerClient) -> Self {
        let site = config
            .site
            .map(|id| Arc::new(Site::new(id).with_own_tag(config.own_tag)));

        Self {
            inner: Arc::new(LocatorInner {
                config,
                client,
                session: Session::new(),
                site: ArcSwapOption::new(site),
                auth_lock: Mutex::new(()),
                load_lock: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn client(&self) -> &ServerClient {
        &self.inner.client
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Authenticate against the configured server and install the token.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), CoreError> {
        let server = self.inner.config.server.clone();
        self.authenticate_at(&server, credentials).await
    }

    /// Authenticate against the server named in an onboarding envelope.
    ///
    /// Missing envelope credentials fall back to the configured ones,
    /// field by field.
    pub async fn onboard(&self, envelope: &OnboardingEnvelope) -> Result<(), CoreError> {
        let fallback = self.inner.config.credentials.as_ref();
        let username = envelope
            .username
            .clone()
            .or_else(|| fallback.map(|c| c.username.clone()));
        let password = envelope
            .password
            .clone()
            .or_else(|| fallback.map(|c| c.password.clone()));

        let (Some(username), Some(password)) = (username, password) else {
            return Err(CoreError::MissingCredentials {
                server: envelope.url.to_string(),
            });
        };

        self.authenticate_at(&envelope.url, &Credentials { username, password })
            .await
    }

    /// Drop the session token. Returns `true` if one was set.
    pub fn logout(&self) -> bool {
        let had_token = self.inner.session.clear().is_some();
        if had_token {
            info!("logged out");
        }
        had_token
    }

    /// Log in with the configured credentials, then load the selected
    /// site's receivers and tags.
    pub async fn connect(&self) -> Result<Arc<Site>, CoreError> {
        let credentials =
            self.inner
                .config
                .credentials
                .as_ref()
                .ok_or_else(|| CoreError::MissingCredentials {
                    server: self.inner.config.server.to_string(),
                })?;

        self.login(credentials).await?;
        let site = self.require_site()?;
        self.refresh_receivers().await?;
        self.refresh_tags().await?;
        Ok(site)
    }

    async fn authenticate_at(
        &self,
        endpoint: &Url,
        credentials: &Credentials,
    ) -> Result<(), CoreError> {
        let _guard = self.inner.auth_lock.lock().await;

        let token = self
            .inner
            .client
            .authenticate(endpoint, &credentials.username, &credentials.password)
            .await
            .inspect_err(|e| warn!(error = %e, %endpoint, "authentication failed"))?;

        self.inner.session.install(token);
        info!(%endpoint, username = %credentials.username, "authenticated");
        Ok(())
    }

    // ── Site selection ───────────────────────────────────────────────

    /// The currently selected site.
    pub fn site(&self) -> Option<Arc<Site>> {
        self.inner.site.load_full()
    }

    /// Select a site, discarding any previously loaded reference data.
    pub fn select_site(&self, id: SiteId) -> Arc<Site> {
        let site = Arc::new(Site::new(id).with_own_tag(self.inner.config.own_tag));
        self.inner.site.store(Some(Arc::clone(&site)));
        debug!(site = id, "site selected");
        site
    }

    fn require_site(&self) -> Result<Arc<Site>, CoreError> {
        self.site().ok_or(CoreError::NoSiteSelected)
    }

    // ── Reference data ───────────────────────────────────────────────

    /// Fetch the selected site's receivers and replace its topology.
    pub async fn refresh_receivers(&self) -> Result<Arc<Vec<Receiver>>, CoreError> {
        let site = self.require_site()?;
        let _guard = self.inner.load_lock.lock().await;

        let receivers = self
            .inner
            .client
            .list_receivers(&self.inner.session, site.id())
            .await?;
        Ok(site.replace_receivers(receivers))
    }

    /// Fetch the selected site's tags, replace its catalog, and return
    /// the usable (non-own) tags.
    pub async fn refresh_tags(&self) -> Result<Vec<Tag>, CoreError> {
        let site = self.require_site()?;
        let _guard = self.inner.load_lock.lock().await;

        let tags = self
            .inner
            .client
            .list_tags(&self.inner.session, site.id())
            .await?;
        site.replace_tags(tags);
        Ok(site.available_tags().unwrap_or_default())
    }

    // ── Beacon & positioning ─────────────────────────────────────────

    /// Register this device as a beacon at the selected site.
    pub async fn register_beacon(&self, display_name: &str) -> Result<BeaconIdentity, CoreError> {
        let site = self.require_site()?;
        let beacon = self
            .inner
            .client
            .register_beacon(&self.inner.session, site.id(), display_name)
            .await?;
        info!(
            site = site.id(),
            major = beacon.major,
            minor = beacon.minor,
            "beacon registered"
        );
        Ok(beacon)
    }

    /// The raw nearest-receiver report for a tag.
    pub async fn last_position(&self, tag: TagId) -> Result<LastPosition, CoreError> {
        let site = self.require_site()?;
        Ok(self
            .inner
            .client
            .last_position(&self.inner.session, site.id(), tag)
            .await?)
    }

    /// Ask the server where `tag` is and resolve it against the loaded
    /// topology.
    pub async fn locate(&self, tag: TagId) -> Result<Fix, CoreError> {
        let site = self.require_site()?;
        Ok(match self.last_position(tag).await? {
            LastPosition::Pending => Fix::Pending,
            LastPosition::Nearest { receiver_id } => into_fix(resolver::resolve(&site, receiver_id)),
        })
    }

    /// As [`locate`](Self::locate), but an unresolved receiver triggers
    /// one topology reload and a second resolution attempt.
    pub async fn locate_or_reload(&self, tag: TagId) -> Result<Fix, CoreError> {
        let site = self.require_site()?;
        let receiver_id = match self.last_position(tag).await? {
            LastPosition::Pending => return Ok(Fix::Pending),
            LastPosition::Nearest { receiver_id } => receiver_id,
        };
        let reason = match resolver::resolve(&site, receiver_id) {
            Ok(position) => return Ok(Fix::Located(position)),
            Err(reason) => reason,
        };

        debug!(tag, receiver_id, %reason, "reloading receivers before retry");
        self.refresh_receivers().await?;
        let site = self.require_site()?;
        Ok(into_fix(resolver::resolve(&site, receiver_id)))
    }
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("server", &self.inner.config.server.as_str())
            .field("session", &self.inner.session)
            .field("site", &self.site())
            .finish_non_exhaustive()
    }
}

fn into_fix(resolved: Result<ResolvedPosition, NotFound>) -> Fix {
    match resolved {
        Ok(position) => Fix::Located(position),
        Err(reason) => Fix::Unresolved(reason),
    }
}

fn build_transport(config: &LocatorConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

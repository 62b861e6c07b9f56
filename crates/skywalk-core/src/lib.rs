//! Session and site state between `skywalk-api` and the CLI.
//!
//! - **[`Locator`]**: Facade over one location server: authenticates
//!   ([`login`](Locator::login), [`onboard`](Locator::onboard)), loads the
//!   selected site's receivers and tags, registers this device as a beacon,
//!   and turns server position reports into map coordinates
//!   ([`locate`](Locator::locate)).
//!
//! - **[`Site`]**: One center's receiver topology and tag catalog, each
//!   swapped atomically as a whole on reload.
//!
//! - **[`resolve`]**: Pure join of a nearest-receiver id against a site's
//!   topology, failing with [`NotFound`] rather than a transport error.
//!
//! Every remote failure surfaces as a [`CoreError`] whose
//! [`kind()`](CoreError::kind) is one of the six [`ErrorKind`] categories.

pub mod config;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod site;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, LocatorConfig, TlsVerification};
pub use error::{CoreError, LoadFailure};
pub use locator::{Fix, Locator};
pub use resolver::{NotFound, ResolvedPosition, resolve};
pub use site::{DEFAULT_DISPLAY_SCALE, LOADED_DISPLAY_SCALE, Site};

// API types that appear in this crate's signatures.
pub use skywalk_api::{
    BeaconIdentity, DEFAULT_BEACON_NAMESPACE, ErrorKind, LastPosition, OnboardingEnvelope,
    OnboardingError, Receiver, ReceiverId, SiteId, Tag, TagId,
};

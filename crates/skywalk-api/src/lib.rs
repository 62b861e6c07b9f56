// skywalk-api: Async Rust client for indoor-positioning location servers

pub mod auth;
pub mod error;
pub mod onboarding;
pub mod server;
pub mod transport;

pub use auth::{Session, Token};
pub use error::{Error, ErrorKind, Outcome, TransportFailure, classify};
pub use onboarding::{OnboardingEnvelope, OnboardingError};
pub use server::{
    BeaconIdentity, DEFAULT_BEACON_NAMESPACE, LastPosition, Receiver, ReceiverId, ServerClient,
    SiteId, Tag, TagId, UNKNOWN_TAG_NAME,
};
pub use transport::{TlsMode, TransportConfig};

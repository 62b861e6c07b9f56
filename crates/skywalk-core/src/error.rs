// ── Core error types ──
//
// Domain errors from skywalk-core. Consumers never see raw HTTP status
// codes or JSON parse failures; the `From<skywalk_api::Error>` impl routes
// every transport-layer error through the api classifier first.

use strum::Display;
use thiserror::Error;

use skywalk_api::{ErrorKind, OnboardingError, Outcome, TransportFailure};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote errors (one per ErrorKind) ────────────────────────────
    #[error("Cannot reach server at {url}: {reason}")]
    Connectivity {
        url: String,
        reason: String,
        /// The request was sent but no answer came back in time.
        timed_out: bool,
    },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("Unexpected server response: {message}")]
    Unknown {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    #[error("Not authenticated -- log in first")]
    NoTokenSet,

    #[error("Invalid response format: {message}")]
    InvalidResponseFormat { message: String },

    // ── Local state errors ───────────────────────────────────────────
    #[error("No site selected")]
    NoSiteSelected,

    #[error("No credentials available for {server}")]
    MissingCredentials { server: String },

    #[error("Onboarding failed: {0}")]
    Onboarding(#[from] OnboardingError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Two-way failure summary for callers that only distinguish
/// "check your connection" from "the server is misbehaving".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoadFailure {
    Internet,
    Server,
}

impl CoreError {
    /// The taxonomy category, for errors that came from a remote call
    /// or a session precondition.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Connectivity { .. } => Some(ErrorKind::Connectivity),
            Self::InvalidCredentials => Some(ErrorKind::InvalidCredentials),
            Self::Server { .. } => Some(ErrorKind::Server),
            Self::Unknown { .. } => Some(ErrorKind::Unknown),
            Self::NoTokenSet => Some(ErrorKind::NoTokenSet),
            Self::InvalidResponseFormat { .. } => Some(ErrorKind::InvalidResponseFormat),
            Self::NoSiteSelected
            | Self::MissingCredentials { .. }
            | Self::Onboarding(_)
            | Self::Config { .. } => None,
        }
    }

    pub fn load_failure(&self) -> LoadFailure {
        match self {
            Self::Connectivity { .. } => LoadFailure::Internet,
            _ => LoadFailure::Server,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<skywalk_api::Error> for CoreError {
    fn from(err: skywalk_api::Error) -> Self {
        match err.kind() {
            ErrorKind::Connectivity => {
                let url = match &err {
                    skywalk_api::Error::Transport(e) => e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    _ => "<unknown>".into(),
                };
                CoreError::Connectivity {
                    url,
                    reason: err.to_string(),
                    timed_out: matches!(
                        err.outcome(),
                        Outcome::Transport(TransportFailure::TimedOut)
                    ),
                }
            }
            ErrorKind::InvalidCredentials => CoreError::InvalidCredentials,
            ErrorKind::Server => CoreError::Server {
                message: err.to_string(),
            },
            ErrorKind::Unknown => CoreError::Unknown {
                status: err.status(),
                message: err.to_string(),
            },
            ErrorKind::NoTokenSet => CoreError::NoTokenSet,
            ErrorKind::InvalidResponseFormat => CoreError::InvalidResponseFormat {
                message: err.to_string(),
            },
        }
    }
}

use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Top-level error type for the `skywalk-api` crate.
///
/// Variants keep the context needed for diagnostics (status code, URL,
/// body preview, the underlying `reqwest` error). Callers that only need
/// to branch on the failure category use [`Error::kind`], which funnels
/// every variant through [`classify`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// An authenticated operation was attempted without a session token.
    /// Raised locally; no request is sent.
    #[error("No session token set -- authenticate first")]
    NoTokenSet,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with anything other than HTTP 200.
    #[error("Server returned HTTP {status} for {url}")]
    Status {
        status: u16,
        url: String,
        /// First 200 bytes of the response body.
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 200 response whose body does not have the expected shape,
    /// with the raw body for debugging.
    #[error("Invalid response format: {message}")]
    InvalidResponseFormat { message: String, body: String },
}

impl Error {
    /// The raw outcome this error represents, before classification.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::NoTokenSet => Outcome::MissingToken,
            Self::Transport(e) => Outcome::Transport(TransportFailure::of(e)),
            Self::InvalidUrl(_) | Self::Tls(_) => Outcome::Transport(TransportFailure::Other),
            Self::Status { status, .. } => Outcome::Status(*status),
            Self::InvalidResponseFormat { .. } => Outcome::Undecodable,
        }
    }

    /// Domain category of this error.
    pub fn kind(&self) -> ErrorKind {
        classify(self.outcome())
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }

    pub(crate) fn invalid_format(message: impl Into<String>, body: &str) -> Self {
        Self::InvalidResponseFormat {
            message: message.into(),
            body: body.to_owned(),
        }
    }
}

// ── Classification ──────────────────────────────────────────────────

/// The closed set of failure categories every caller branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// No connectivity or the request timed out. Retryable.
    Connectivity,
    /// HTTP 401.
    InvalidCredentials,
    /// HTTP 500.
    Server,
    /// Any other status, or a transport failure that is neither of the above.
    Unknown,
    /// No session token was available locally.
    NoTokenSet,
    /// A successful response could not be decoded.
    InvalidResponseFormat,
}

/// Transport-layer failure category, derived from a `reqwest::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    NoConnectivity,
    TimedOut,
    Other,
}

impl TransportFailure {
    pub fn of(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_connect() {
            Self::NoConnectivity
        } else {
            Self::Other
        }
    }
}

/// Everything that can end a call without a usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request never produced a response.
    Transport(TransportFailure),
    /// The server responded with this (non-200) status.
    Status(u16),
    /// The call was refused locally for lack of a token.
    MissingToken,
    /// A 200 response body failed structural decoding.
    Undecodable,
}

/// Map an outcome onto its [`ErrorKind`]. Total and side-effect free.
pub fn classify(outcome: Outcome) -> ErrorKind {
    match outcome {
        Outcome::Transport(TransportFailure::NoConnectivity | TransportFailure::TimedOut) => {
            ErrorKind::Connectivity
        }
        Outcome::Transport(TransportFailure::Other) => ErrorKind::Unknown,
        Outcome::Status(401) => ErrorKind::InvalidCredentials,
        Outcome::Status(500) => ErrorKind::Server,
        Outcome::Status(_) => ErrorKind::Unknown,
        Outcome::MissingToken => ErrorKind::NoTokenSet,
        Outcome::Undecodable => ErrorKind::InvalidResponseFormat,
    }
}

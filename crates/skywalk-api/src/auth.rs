// Session identity: the bearer token and the endpoint it was issued by.
//
// A `Session` is an explicit handle, cloned into whoever needs it. Every
// clone observes the same token; replacing or clearing it is a single
// atomic pointer swap, so readers never see a half-written session.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

/// A bearer token paired with the server endpoint that issued it.
#[derive(Debug, Clone)]
pub struct Token {
    endpoint: Url,
    value: SecretString,
}

impl Token {
    pub fn new(endpoint: Url, value: SecretString) -> Self {
        Self { endpoint, value }
    }

    /// Base URL of the server this token is valid for.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The opaque token value.
    pub fn secret(&self) -> &SecretString {
        &self.value
    }

    pub(crate) fn bearer(&self) -> &str {
        self.value.expose_secret()
    }
}

/// Handle to the current authenticated session.
///
/// Cheaply cloneable; all clones share one token slot.
#[derive(Clone)]
pub struct Session {
    token: Arc<ArcSwapOption<Token>>,
}

impl Session {
    /// An unauthenticated session. Authenticated calls fail with
    /// [`Error::NoTokenSet`](crate::Error::NoTokenSet) until a token is installed.
    pub fn new() -> Self {
        Self {
            token: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn with_token(token: Token) -> Self {
        let session = Self::new();
        session.install(token);
        session
    }

    /// Replace the current token wholesale.
    pub fn install(&self, token: Token) {
        debug!(endpoint = %token.endpoint(), "session token installed");
        self.token.store(Some(Arc::new(token)));
    }

    /// Drop the current token, returning it if one was set.
    pub fn clear(&self) -> Option<Arc<Token>> {
        let previous = self.token.swap(None);
        if previous.is_some() {
            debug!("session token cleared");
        }
        previous
    }

    /// Snapshot of the current token.
    pub fn token(&self) -> Option<Arc<Token>> {
        self.token.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    /// Endpoint of the current token, if any.
    pub fn endpoint(&self) -> Option<Url> {
        self.token.load().as_ref().map(|t| t.endpoint().clone())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint().map(String::from))
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

// Location server HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, bearer auth,
// and status/body handling shared by every operation. The operations
// themselves live in sibling modules as inherent methods.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

use crate::auth::{Session, Token};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Proximity UUID used for beacon identities unless configured otherwise.
pub const DEFAULT_BEACON_NAMESPACE: Uuid = Uuid::from_u128(0x3E8C_0296_168B_4940_ADB0_B308_8F7E_E30E);

const JSON: &str = "application/json";
const PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the location server API.
///
/// Holds no session state of its own: every authenticated call takes the
/// [`Session`] it should run under. A call on a session without a token
/// fails with [`Error::NoTokenSet`] before anything touches the network.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    beacon_namespace: Uuid,
}

impl ServerClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            beacon_namespace: DEFAULT_BEACON_NAMESPACE,
        }
    }

    /// Override the proximity UUID stamped on registered beacon identities.
    pub fn with_beacon_namespace(mut self, namespace: Uuid) -> Self {
        self.beacon_namespace = namespace;
        self
    }

    pub fn beacon_namespace(&self) -> Uuid {
        self.beacon_namespace
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{endpoint}/api/{path}`, keeping any path prefix the endpoint has.
    pub(crate) fn api_url(endpoint: &Url, path: &str) -> Result<Url, Error> {
        let base = endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Session helpers ──────────────────────────────────────────────

    /// Snapshot the session token, or refuse the call locally.
    pub(crate) fn require_token(session: &Session) -> Result<Arc<Token>, Error> {
        session.token().ok_or(Error::NoTokenSet)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated GET returning the raw 200 body.
    pub(crate) async fn get_text(&self, token: &Token, path: &str) -> Result<String, Error> {
        let url = Self::api_url(token.endpoint(), path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(CONTENT_TYPE, JSON)
            .bearer_auth(token.bearer())
            .send()
            .await?;

        Self::read_ok(resp).await
    }

    /// Authenticated POST with a JSON body, returning the raw 200 body.
    pub(crate) async fn post_text(
        &self,
        token: &Token,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        let url = Self::api_url(token.endpoint(), path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON)
            .bearer_auth(token.bearer())
            .json(body)
            .send()
            .await?;

        Self::read_ok(resp).await
    }

    /// Authenticated GET decoded from JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        token: &Token,
        path: &str,
    ) -> Result<T, Error> {
        let body = self.get_text(token, path).await?;
        decode(&body)
    }

    /// Authenticated POST decoded from JSON.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        token: &Token,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let text = self.post_text(token, path, body).await?;
        decode(&text)
    }

    /// Accept only HTTP 200; anything else becomes [`Error::Status`].
    pub(crate) async fn read_ok(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let url = resp.url().to_string();

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), %url, "request rejected");
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                body: preview(&body).to_owned(),
            });
        }

        let bytes = resp.bytes().await?;
        trace!(len = bytes.len(), "response body received");
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::InvalidResponseFormat {
            message: format!("body is not UTF-8: {e}"),
            body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

/// Decode a JSON body, turning shape mismatches into `InvalidResponseFormat`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        Error::invalid_format(
            format!("{e} (body preview: {:?})", preview(body)),
            body,
        )
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

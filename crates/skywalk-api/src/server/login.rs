// Server authentication
//
// `POST /api/authentication` with `{login, password}`. A 200 response
// carries the bearer token as its raw body; nothing is parsed.

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::Token;
use crate::error::Error;
use crate::server::client::ServerClient;

impl ServerClient {
    /// Exchange credentials for a bearer token.
    ///
    /// The returned [`Token`] keeps `endpoint` verbatim so later calls go
    /// to the same server. No session is required; install the token into
    /// one with [`Session::install`](crate::Session::install).
    pub async fn authenticate(
        &self,
        endpoint: &Url,
        username: &str,
        password: &SecretString,
    ) -> Result<Token, Error> {
        let url = Self::api_url(endpoint, "authentication")?;
        debug!(username, "authenticating at {}", url);

        let body = json!({
            "login": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let token = Self::read_ok(resp).await?;

        debug!("authentication successful");
        Ok(Token::new(endpoint.clone(), SecretString::from(token)))
    }
}

// Beacon registration and tag positions

use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::error::Error;
use crate::server::client::{ServerClient, decode};
use crate::server::models::{BeaconIdentity, BeaconRegistration, LastPosition, SiteId, TagId};

impl ServerClient {
    /// Register this device as a locatable beacon under `display_name`.
    ///
    /// `POST /api/centers/{site}/tags` with `{"name": ...}`. The server
    /// assigns `major`/`minor`; the namespace UUID comes from this client.
    ///
    /// Registration shares its path with the tag listing; the server tells
    /// the two apart by method.
    pub async fn register_beacon(
        &self,
        session: &Session,
        site: SiteId,
        display_name: &str,
    ) -> Result<BeaconIdentity, Error> {
        let token = Self::require_token(session)?;
        debug!(site, display_name, "registering beacon");

        let reg: BeaconRegistration = self
            .post_json(
                &token,
                &format!("centers/{site}/tags"),
                &json!({ "name": display_name }),
            )
            .await?;

        Ok(BeaconIdentity {
            namespace: self.beacon_namespace(),
            major: reg.major,
            minor: reg.minor,
        })
    }

    /// Ask which receiver a tag was last seen nearest to.
    ///
    /// `GET /api/centers/{site}/tags/{tag}`. The body must be a JSON
    /// object; an integer `nearest_rdhub` yields [`LastPosition::Nearest`],
    /// anything else [`LastPosition::Pending`].
    pub async fn last_position(
        &self,
        session: &Session,
        site: SiteId,
        tag: TagId,
    ) -> Result<LastPosition, Error> {
        let token = Self::require_token(session)?;
        let body = self
            .get_text(&token, &format!("centers/{site}/tags/{tag}"))
            .await?;

        let object: serde_json::Map<String, serde_json::Value> = decode(&body)?;
        let position = object
            .get("nearest_rdhub")
            .and_then(serde_json::Value::as_i64)
            .map_or(LastPosition::Pending, |receiver_id| LastPosition::Nearest {
                receiver_id,
            });

        debug!(site, tag, ?position, "last position fetched");
        Ok(position)
    }
}

// Site reference data
//
// Receiver topology and tag catalog for one center. Both are plain JSON
// arrays; a single malformed entry fails the whole call.

use tracing::debug;

use crate::auth::Session;
use crate::error::Error;
use crate::server::client::ServerClient;
use crate::server::models::{Receiver, SiteId, Tag};

impl ServerClient {
    /// List the receivers installed at a site, in server order.
    ///
    /// `GET /api/centers/{site}/rdhubs`
    pub async fn list_receivers(
        &self,
        session: &Session,
        site: SiteId,
    ) -> Result<Vec<Receiver>, Error> {
        let token = Self::require_token(session)?;
        let receivers: Vec<Receiver> = self
            .get_json(&token, &format!("centers/{site}/rdhubs"))
            .await?;
        debug!(site, count = receivers.len(), "receivers fetched");
        Ok(receivers)
    }

    /// List the tags available at a site.
    ///
    /// `GET /api/centers/{site}/tags`
    pub async fn list_tags(&self, session: &Session, site: SiteId) -> Result<Vec<Tag>, Error> {
        let token = Self::require_token(session)?;
        let tags: Vec<Tag> = self.get_json(&token, &format!("centers/{site}/tags")).await?;
        debug!(site, count = tags.len(), "tags fetched");
        Ok(tags)
    }
}

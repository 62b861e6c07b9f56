// Location server wire types
//
// Records decoded straight from response bodies. They are immutable
// values; collections that hold them (the site registry) own them.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type SiteId = i64;
pub type ReceiverId = i64;
pub type TagId = i64;

/// Name given to tags the server reports without a usable name.
pub const UNKNOWN_TAG_NAME: &str = "Unknown";

/// A fixed receiver hub (`rdhub`) with known map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub id: ReceiverId,
    pub x: f64,
    pub y: f64,
    /// Floor / elevation level.
    #[serde(rename(deserialize = "z"))]
    pub level: i64,
}

/// A locatable entity (person or asset) tracked at a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    #[serde(default = "unknown_tag_name", deserialize_with = "lenient_name")]
    pub name: String,
}

fn unknown_tag_name() -> String {
    UNKNOWN_TAG_NAME.to_owned()
}

/// Non-string names (numbers, null, objects) fall back to [`UNKNOWN_TAG_NAME`].
fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map_or_else(unknown_tag_name, str::to_owned))
}

/// The iBeacon frame this device must broadcast to be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BeaconIdentity {
    /// Deployment-wide proximity UUID; configured, never server supplied.
    pub namespace: Uuid,
    pub major: u16,
    pub minor: u16,
}

/// `POST /api/centers/{id}/tags` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct BeaconRegistration {
    pub major: u16,
    pub minor: u16,
}

/// Result of asking the server where a tag was last seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LastPosition {
    /// The receiver currently nearest to the tag.
    Nearest { receiver_id: ReceiverId },
    /// The server has no fix for the tag yet. Poll again later.
    Pending,
}

impl LastPosition {
    pub fn receiver_id(self) -> Option<ReceiverId> {
        match self {
            Self::Nearest { receiver_id } => Some(receiver_id),
            Self::Pending => None,
        }
    }
}

// Location server REST API
//
// `client` owns transport mechanics; `login`, `centers`, and `tags` add
// the endpoint methods to `ServerClient`.

pub mod client;
pub mod models;

mod centers;
mod login;
mod tags;

pub use client::{DEFAULT_BEACON_NAMESPACE, ServerClient};
pub use models::{
    BeaconIdentity, LastPosition, Receiver, ReceiverId, SiteId, Tag, TagId, UNKNOWN_TAG_NAME,
};

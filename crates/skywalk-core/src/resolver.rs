// ── Position resolution ──
//
// Joins a server-reported nearest receiver id against the site's loaded
// topology. A miss is a local data gap (stale or unfetched topology),
// not a transport failure; callers reload receivers and try again.

use serde::Serialize;
use thiserror::Error;

use skywalk_api::ReceiverId;

use crate::site::Site;

/// A concrete map coordinate for a tag, derived on every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPosition {
    pub receiver_id: ReceiverId,
    pub x: f64,
    pub y: f64,
    pub level: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotFound {
    #[error("receiver topology has not been loaded")]
    TopologyNotLoaded,

    #[error("receiver {receiver_id} is not in the site topology")]
    UnknownReceiver { receiver_id: ReceiverId },
}

/// Look up `nearest` in the site's current receivers; first match wins.
pub fn resolve(site: &Site, nearest: ReceiverId) -> Result<ResolvedPosition, NotFound> {
    let receivers = site.receivers().ok_or(NotFound::TopologyNotLoaded)?;
    receivers
        .iter()
        .find(|r| r.id == nearest)
        .map(|r| ResolvedPosition {
            receiver_id: nearest,
            x: r.x,
            y: r.y,
            level: r.level,
        })
        .ok_or(NotFound::UnknownReceiver {
            receiver_id: nearest,
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use skywalk_api::Receiver;

    use super::*;

    fn site() -> Site {
        let site = Site::new(1);
        site.replace_receivers(vec![
            Receiver { id: 1, x: 0.0, y: 0.0, level: 0 },
            Receiver { id: 2, x: 10.0, y: 10.0, level: 1 },
        ]);
        site
    }

    #[test]
    fn resolves_known_receiver() {
        assert_eq!(
            resolve(&site(), 2),
            Ok(ResolvedPosition {
                receiver_id: 2,
                x: 10.0,
                y: 10.0,
                level: 1
            })
        );
    }

    #[test]
    fn unknown_receiver_is_not_found() {
        assert_eq!(
            resolve(&site(), 99),
            Err(NotFound::UnknownReceiver { receiver_id: 99 })
        );
    }

    #[test]
    fn unloaded_topology_is_not_found() {
        assert_eq!(resolve(&Site::new(1), 2), Err(NotFound::TopologyNotLoaded));
    }

    #[test]
    fn empty_topology_is_loaded_but_unknown() {
        let site = Site::new(1);
        site.replace_receivers(Vec::new());
        assert_eq!(
            resolve(&site, 1),
            Err(NotFound::UnknownReceiver { receiver_id: 1 })
        );
    }
}

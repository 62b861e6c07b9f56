// ── Site registry ──
//
// One physical center: its receiver topology and tag catalog. Each
// collection is absent until first loaded and is replaced as a whole on
// reload, through an atomic pointer swap. Readers hold an `Arc` snapshot
// and never see a mix of old and new entries.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use tracing::debug;

use skywalk_api::{Receiver, ReceiverId, SiteId, Tag, TagId};

/// Map scale before any topology is known.
pub const DEFAULT_DISPLAY_SCALE: f64 = 40.0;
/// Map scale once receivers are loaded.
pub const LOADED_DISPLAY_SCALE: f64 = 128.0;

pub struct Site {
    id: SiteId,
    own_tag: Option<TagId>,
    receivers: ArcSwapOption<Vec<Receiver>>,
    /// Keyed by tag id; catalog order preserved.
    tags: ArcSwapOption<IndexMap<TagId, Tag>>,
}

impl Site {
    pub fn new(id: SiteId) -> Self {
        Self {
            id,
            own_tag: None,
            receivers: ArcSwapOption::empty(),
            tags: ArcSwapOption::empty(),
        }
    }

    /// Mark `tag` as this device's own identity; it is hidden from
    /// [`available_tags`](Self::available_tags).
    pub fn with_own_tag(mut self, tag: Option<TagId>) -> Self {
        self.own_tag = tag;
        self
    }

    pub fn id(&self) -> SiteId {
        self.id
    }

    pub fn own_tag(&self) -> Option<TagId> {
        self.own_tag
    }

    pub fn display_scale(&self) -> f64 {
        if self.is_topology_loaded() {
            LOADED_DISPLAY_SCALE
        } else {
            DEFAULT_DISPLAY_SCALE
        }
    }

    // ── Receivers ────────────────────────────────────────────────────

    pub fn is_topology_loaded(&self) -> bool {
        self.receivers.load().is_some()
    }

    /// Current receiver snapshot, in server order.
    pub fn receivers(&self) -> Option<Arc<Vec<Receiver>>> {
        self.receivers.load_full()
    }

    /// First receiver with the given id. Duplicate ids are not rejected.
    pub fn receiver(&self, id: ReceiverId) -> Option<Receiver> {
        let receivers = self.receivers.load_full()?;
        receivers.iter().find(|r| r.id == id).cloned()
    }

    /// Replace the whole topology.
    pub fn replace_receivers(&self, receivers: Vec<Receiver>) -> Arc<Vec<Receiver>> {
        debug!(site = self.id, count = receivers.len(), "receiver topology replaced");
        let receivers = Arc::new(receivers);
        self.receivers.store(Some(Arc::clone(&receivers)));
        receivers
    }

    // ── Tags ─────────────────────────────────────────────────────────

    pub fn is_catalog_loaded(&self) -> bool {
        self.tags.load().is_some()
    }

    /// Replace the whole tag catalog. Repeated ids keep the last name.
    pub fn replace_tags(&self, tags: Vec<Tag>) {
        let catalog: IndexMap<TagId, Tag> = tags.into_iter().map(|t| (t.id, t)).collect();
        debug!(site = self.id, count = catalog.len(), "tag catalog replaced");
        self.tags.store(Some(Arc::new(catalog)));
    }

    /// Every loaded tag, own tag included.
    pub fn all_tags(&self) -> Option<Vec<Tag>> {
        let catalog = self.tags.load_full()?;
        Some(catalog.values().cloned().collect())
    }

    /// Loaded tags minus this device's own tag.
    pub fn available_tags(&self) -> Option<Vec<Tag>> {
        let catalog = self.tags.load_full()?;
        Some(
            catalog
                .values()
                .filter(|t| Some(t.id) != self.own_tag)
                .cloned()
                .collect(),
        )
    }

    /// The available tags whose ids are in `selected`, in catalog order.
    /// Unknown ids are skipped.
    pub fn tags_matching(&self, selected: &[TagId]) -> Vec<Tag> {
        self.available_tags()
            .unwrap_or_default()
            .into_iter()
            .filter(|t| selected.contains(&t.id))
            .collect()
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("id", &self.id)
            .field("own_tag", &self.own_tag)
            .field("receivers", &self.receivers.load_full().map(|r| r.len()))
            .field("tags", &self.tags.load_full().map(|t| t.len()))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn hub(id: ReceiverId, x: f64, y: f64, level: i64) -> Receiver {
        Receiver { id, x, y, level }
    }

    fn tag(id: TagId, name: &str) -> Tag {
        Tag {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn starts_unloaded() {
        let site = Site::new(3);
        assert!(!site.is_topology_loaded());
        assert!(!site.is_catalog_loaded());
        assert!(site.receivers().is_none());
        assert!(site.available_tags().is_none());
        assert!(site.receiver(1).is_none());
        assert!((site.display_scale() - DEFAULT_DISPLAY_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn reload_replaces_receivers_entirely() {
        let site = Site::new(3);
        site.replace_receivers(vec![hub(1, 0.0, 0.0, 0), hub(2, 1.0, 1.0, 0)]);
        let before = site.receivers().unwrap();

        site.replace_receivers(vec![hub(5, 9.0, 9.0, 2)]);

        assert_eq!(*site.receivers().unwrap(), vec![hub(5, 9.0, 9.0, 2)]);
        assert!(site.receiver(1).is_none());
        // Earlier snapshots stay intact for whoever still holds them.
        assert_eq!(before.len(), 2);
        assert!((site.display_scale() - LOADED_DISPLAY_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_receiver_ids_resolve_to_first() {
        let site = Site::new(3);
        site.replace_receivers(vec![hub(4, 1.0, 1.0, 0), hub(4, 8.0, 8.0, 1)]);
        assert_eq!(site.receiver(4), Some(hub(4, 1.0, 1.0, 0)));
    }

    #[test]
    fn own_tag_is_excluded_from_available() {
        let site = Site::new(3).with_own_tag(Some(10));
        site.replace_tags(vec![tag(9, "Forklift"), tag(10, "me"), tag(11, "Ana")]);

        assert_eq!(
            site.available_tags().unwrap(),
            vec![tag(9, "Forklift"), tag(11, "Ana")]
        );
        assert_eq!(site.all_tags().unwrap().len(), 3);
    }

    #[test]
    fn tag_catalog_is_a_set() {
        let site = Site::new(3);
        site.replace_tags(vec![tag(9, "old"), tag(11, "Ana"), tag(9, "new")]);
        assert_eq!(site.all_tags().unwrap(), vec![tag(9, "new"), tag(11, "Ana")]);

        site.replace_tags(vec![tag(12, "Bo")]);
        assert_eq!(site.all_tags().unwrap(), vec![tag(12, "Bo")]);
    }

    #[test]
    fn tags_matching_keeps_catalog_order() {
        let site = Site::new(3).with_own_tag(Some(10));
        site.replace_tags(vec![tag(9, "a"), tag(10, "me"), tag(11, "b"), tag(12, "c")]);
        let picked = site.tags_matching(&[12, 10, 9, 99]);
        assert_eq!(picked, vec![tag(9, "a"), tag(12, "c")]);
    }
}

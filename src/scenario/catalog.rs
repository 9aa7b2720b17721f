//! Fixed catalog of shareable entities
//!
//! Every scenario publishes from this one catalog; what a session may share
//! depends only on the negotiated technology.

use crate::protocol::{Entity, EntityKind, Technology};

/// Catalog entries in publication order: windows first, then screens
const CATALOG: [(&str, &str, EntityKind); 6] = [
    ("window1", "Window 1", EntityKind::Window),
    ("window2", "Window 2", EntityKind::Window),
    ("window3", "Window 3", EntityKind::Window),
    ("screen1", "Screen 1", EntityKind::Screen),
    ("screen2", "Screen 2", EntityKind::Screen),
    ("screen3", "Screen 3", EntityKind::Screen),
];

/// The full entity catalog
pub fn catalog() -> Vec<Entity> {
    CATALOG
        .iter()
        .map(|&(id, title, kind)| Entity {
            id: id.to_string(),
            title: title.to_string(),
            kind,
        })
        .collect()
}

/// Entities a session using `technology` can share.
///
/// WebRTC shares whole screens only; VNC gets the full catalog.
pub fn entities_for(technology: Technology) -> Vec<Entity> {
    catalog()
        .into_iter()
        .filter(|e| technology.shares_windows() || e.kind == EntityKind::Screen)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let entities = catalog();
        let ids: HashSet<&str> = entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), entities.len());
    }

    #[test]
    fn test_webrtc_gets_screens_only() {
        let ids: Vec<String> = entities_for(Technology::WebRtc)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["screen1", "screen2", "screen3"]);
    }

    #[test]
    fn test_vnc_gets_full_catalog() {
        assert_eq!(entities_for(Technology::Vnc), catalog());
    }
}

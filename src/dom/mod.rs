//! DOM inspection module
//!
//! One inspection pass produces a [`DomSnapshot`]: the in-page walker
//! (`inspect_dom.js`) captures the raw tree, and the Rust side filters it,
//! classifies interactivity, assigns highlight indices, and builds the
//! selector map. Snapshots are explicit values — nothing hides in page or
//! process globals, and indices die with the snapshot that assigned them.

pub mod node;
pub mod selector_map;
pub mod snapshot;

pub use node::{is_meaningful_text, BoundingBox, DomNode, ElementNode, TextNode};
pub use selector_map::{ElementHandle, SelectorMap};
pub use snapshot::{DomSnapshot, ElementDigest, HIGHLIGHT_COLORS};

use crate::error::Result;
use headless_chrome::Tab;
use std::sync::Arc;

/// Capture a DOM snapshot from a browser tab
pub fn capture_snapshot(tab: &Arc<Tab>) -> Result<DomSnapshot> {
    DomSnapshot::capture(tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag, "div");
    }

    #[test]
    fn test_selector_map_export() {
        let map = SelectorMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_snapshot_export() {
        let root = DomNode::Element(ElementNode::new("html"));
        let snapshot = DomSnapshot::from_root(root);
        assert_eq!(snapshot.count_interactive(), 0);
    }
}

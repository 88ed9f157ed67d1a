use crate::dom::node::{is_meaningful_text, DomNode, ElementNode};
use crate::dom::selector_map::{ElementHandle, SelectorMap};
use crate::error::{OperatorError, Result};
use headless_chrome::Tab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Overlay border colors, cycled over the indexed elements
pub const HIGHLIGHT_COLORS: [&str; 5] =
    ["#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4"];

const DIGEST_TEXT_LIMIT: usize = 50;

/// One entry of the agent-facing element digest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDigest {
    pub index: u32,
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize)]
struct OverlayEntry<'a> {
    index: u32,
    xpath: &'a str,
    color: &'static str,
}

#[derive(Deserialize)]
struct PaintReport {
    painted: usize,
}

#[derive(Deserialize)]
struct ClickReport {
    clicked: bool,
}

/// One inspection pass over a page: the filtered DOM tree plus the
/// highlight-index selector map.
///
/// A snapshot is an explicit value owned by the caller. Indices are only
/// valid against the page state at capture time; navigation or DOM mutation
/// invalidates them, and the next [`DomSnapshot::capture`] starts over at 1.
#[derive(Debug, Clone)]
pub struct DomSnapshot {
    /// Root element of the captured tree (the document element)
    pub root: DomNode,

    /// Map of highlight indices to element handles
    pub selector_map: SelectorMap,
}

impl DomSnapshot {
    /// Capture a snapshot from a browser tab
    pub fn capture(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("inspect_dom.js");
        let root: DomNode = evaluate_json(tab, js_code)?;
        Ok(Self::from_root(root))
    }

    /// Build a snapshot from a raw walker tree: prune filler nodes, classify
    /// interactivity, and assign highlight indices in one depth-first pass.
    pub fn from_root(mut root: DomNode) -> Self {
        let mut selector_map = SelectorMap::new();

        if let DomNode::Element(el) = &mut root {
            prune(el);
            let root_xpath = format!("/{}[1]", el.tag);
            index_elements(el, &root_xpath, &mut selector_map);
        }

        Self { root, selector_map }
    }

    /// Look up the handle for a highlight index from this snapshot
    pub fn handle(&self, index: u32) -> Result<&ElementHandle> {
        self.selector_map.get(index).ok_or(OperatorError::IndexNotFound(index))
    }

    /// Click the element behind a highlight index.
    ///
    /// An index never assigned by this snapshot fails with `IndexNotFound`
    /// before anything reaches the page; an index whose element has since
    /// left the DOM fails with `StaleElement`.
    pub fn click_index(&self, tab: &Arc<Tab>, index: u32) -> Result<()> {
        let handle = self.handle(index)?;

        let xpath_literal = serde_json::to_string(&handle.xpath)
            .map_err(|e| OperatorError::SnapshotParseFailed(e.to_string()))?;
        let js = format!(
            r#"(function (xpath) {{
                var result = document.evaluate(
                    xpath, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null
                );
                var el = result.singleNodeValue;
                if (!el) {{
                    return JSON.stringify({{ clicked: false }});
                }}
                el.click();
                return JSON.stringify({{ clicked: true }});
            }})({xpath_literal})"#
        );

        let report: ClickReport = evaluate_json(tab, &js)?;
        if !report.clicked {
            return Err(OperatorError::StaleElement { index });
        }

        Ok(())
    }

    /// Paint numbered overlay boxes over every indexed element.
    ///
    /// The previous overlay layer is removed before painting, so repeated
    /// calls never accumulate boxes. Returns how many boxes were painted
    /// (elements that left the DOM since capture are skipped).
    pub fn highlight(&self, tab: &Arc<Tab>) -> Result<usize> {
        let entries: Vec<OverlayEntry> = self
            .selector_map
            .iter()
            .enumerate()
            .map(|(position, (index, handle))| OverlayEntry {
                index: *index,
                xpath: &handle.xpath,
                color: HIGHLIGHT_COLORS[position % HIGHLIGHT_COLORS.len()],
            })
            .collect();

        let payload = serde_json::to_string(&entries)
            .map_err(|e| OperatorError::SnapshotParseFailed(e.to_string()))?;
        let js = format!("({})({payload})", include_str!("highlight.js"));

        let report: PaintReport = evaluate_json(tab, &js)?;
        Ok(report.painted)
    }

    /// Agent-facing digest of every indexed element, in index order
    pub fn interactive_digest(&self) -> Vec<ElementDigest> {
        self.selector_map
            .iter()
            .map(|(index, handle)| ElementDigest {
                index: *index,
                tag: handle.tag.clone(),
                id: handle.id.clone(),
                text: handle.text.clone(),
            })
            .collect()
    }

    /// One line per indexed element, e.g. `[3] <button> Sign in`
    pub fn outline(&self) -> String {
        let mut lines = Vec::with_capacity(self.selector_map.len());
        for (index, handle) in self.selector_map.iter() {
            let mut line = format!("[{index}] <{}>", handle.tag);
            if let Some(text) = &handle.text {
                line.push(' ');
                line.push_str(text);
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Count interactive (indexed) elements
    pub fn count_interactive(&self) -> usize {
        self.selector_map.len()
    }

    /// Count all nodes in the tree
    pub fn count_nodes(&self) -> usize {
        count_nodes(&self.root)
    }

    /// Find the element node carrying a highlight index
    pub fn find_node_by_index(&self, index: u32) -> Option<&ElementNode> {
        find_by_index(&self.root, index)
    }

    /// Serialize the tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| OperatorError::SnapshotParseFailed(e.to_string()))
    }
}

/// Evaluate a script that returns a JSON string, and parse it
fn evaluate_json<T: DeserializeOwned>(tab: &Arc<Tab>, js: &str) -> Result<T> {
    let result = tab
        .evaluate(js, false)
        .map_err(|e| OperatorError::EvaluationFailed(e.to_string()))?;

    let value = result
        .value
        .ok_or_else(|| OperatorError::EvaluationFailed("no value returned".to_string()))?;

    let json_str: String = serde_json::from_value(value)
        .map_err(|e| OperatorError::SnapshotParseFailed(format!("expected JSON string: {e}")))?;

    serde_json::from_str(&json_str).map_err(|e| OperatorError::SnapshotParseFailed(e.to_string()))
}

/// Drop filler text nodes and empty anchors, recursively.
///
/// The walker already excludes script/style/noscript at the source.
fn prune(el: &mut ElementNode) {
    el.children.retain(|child| match child {
        DomNode::Text(t) => is_meaningful_text(&t.text),
        DomNode::Element(e) => {
            !(e.is_tag("a") && e.text_content().trim().is_empty() && !e.has_image_descendant())
        }
    });

    for child in el.children.iter_mut() {
        if let DomNode::Element(e) = child {
            prune(e);
        }
    }
}

/// Depth-first pass: assign highlight indices to interactive, visible
/// elements and record their positional XPaths.
fn index_elements(el: &mut ElementNode, xpath: &str, selector_map: &mut SelectorMap) {
    if el.visible && el.is_interactive() {
        let mut handle = ElementHandle::new(xpath, &el.tag);
        if let Some(id) = el.id() {
            handle = handle.with_id(id);
        }
        let text = el.text_content();
        let text = text.trim();
        if !text.is_empty() {
            handle = handle.with_text(truncate(text, DIGEST_TEXT_LIMIT));
        }
        el.highlight_index = Some(selector_map.register(handle));
    }

    // Positional XPath steps disambiguate same-tag siblings
    let mut seen: HashMap<String, usize> = HashMap::new();
    for child in el.children.iter_mut() {
        if let DomNode::Element(child_el) = child {
            let position = seen
                .entry(child_el.tag.clone())
                .and_modify(|count| *count += 1)
                .or_insert(1);
            let child_xpath = format!("{xpath}/{}[{position}]", child_el.tag);
            index_elements(child_el, &child_xpath, selector_map);
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

fn count_nodes(node: &DomNode) -> usize {
    match node {
        DomNode::Text(_) => 1,
        DomNode::Element(el) => 1 + el.children.iter().map(count_nodes).sum::<usize>(),
    }
}

fn find_by_index(node: &DomNode, index: u32) -> Option<&ElementNode> {
    let DomNode::Element(el) = node else {
        return None;
    };

    if el.highlight_index == Some(index) {
        return Some(el);
    }

    el.children.iter().find_map(|child| find_by_index(child, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::TextNode;

    /// A walker payload resembling a small login page
    fn walker_fixture() -> DomNode {
        let json = r#"{
            "type": "ELEMENT_NODE",
            "tag": "html",
            "visible": true,
            "children": [
                {
                    "type": "ELEMENT_NODE",
                    "tag": "body",
                    "visible": true,
                    "children": [
                        {
                            "type": "ELEMENT_NODE",
                            "tag": "nav",
                            "visible": true,
                            "children": [
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "a",
                                    "attributes": {"href": "/home"},
                                    "visible": true,
                                    "children": [
                                        {"type": "TEXT_NODE", "text": "Home", "visible": true}
                                    ]
                                },
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "a",
                                    "attributes": {"href": "/pricing"},
                                    "visible": true,
                                    "children": [
                                        {"type": "TEXT_NODE", "text": "Pricing", "visible": true}
                                    ]
                                },
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "a",
                                    "attributes": {"href": "/ghost"},
                                    "visible": true,
                                    "children": []
                                }
                            ]
                        },
                        {
                            "type": "ELEMENT_NODE",
                            "tag": "div",
                            "visible": true,
                            "children": [
                                {"type": "TEXT_NODE", "text": "123.45", "visible": true},
                                {"type": "TEXT_NODE", "text": "Total due", "visible": true},
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "input",
                                    "attributes": {"id": "email", "tabindex": "0"},
                                    "visible": true,
                                    "children": []
                                },
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "button",
                                    "attributes": {"id": "submit"},
                                    "visible": true,
                                    "children": [
                                        {"type": "TEXT_NODE", "text": "Sign in", "visible": true}
                                    ]
                                },
                                {
                                    "type": "ELEMENT_NODE",
                                    "tag": "button",
                                    "attributes": {"id": "hidden-submit"},
                                    "visible": false,
                                    "children": [
                                        {"type": "TEXT_NODE", "text": "Ghost", "visible": false}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_indices_assigned_in_traversal_order_from_one() {
        let snapshot = DomSnapshot::from_root(walker_fixture());

        // Two nav links, the input, the visible button; the empty anchor is
        // pruned and the invisible button is skipped
        assert_eq!(snapshot.count_interactive(), 4);

        let handles: Vec<_> = snapshot.selector_map.iter().collect();
        assert_eq!(*handles[0].0, 1);
        assert_eq!(handles[0].1.text.as_deref(), Some("Home"));
        assert_eq!(*handles[1].0, 2);
        assert_eq!(handles[1].1.text.as_deref(), Some("Pricing"));
        assert_eq!(*handles[2].0, 3);
        assert_eq!(handles[2].1.tag, "input");
        assert_eq!(*handles[3].0, 4);
        assert_eq!(handles[3].1.text.as_deref(), Some("Sign in"));
    }

    #[test]
    fn test_numeric_text_pruned() {
        let snapshot = DomSnapshot::from_root(walker_fixture());
        let json = snapshot.to_json().unwrap();

        assert!(!json.contains("123.45"));
        assert!(json.contains("Total due"));
    }

    #[test]
    fn test_empty_anchor_pruned() {
        let snapshot = DomSnapshot::from_root(walker_fixture());
        let json = snapshot.to_json().unwrap();

        assert!(!json.contains("/ghost"));
        assert!(json.contains("/pricing"));
    }

    #[test]
    fn test_anchor_with_image_survives() {
        let mut anchor = ElementNode::new("a");
        anchor.add_attribute("href", "/logo");
        anchor.add_child(DomNode::Element(ElementNode::new("img").with_visibility(true)));
        let mut body = ElementNode::new("body").with_visibility(true);
        body.add_child(DomNode::Element(anchor.with_visibility(true)));
        let root = ElementNode::new("html").with_visibility(true).with_children(vec![
            DomNode::Element(body),
        ]);

        let snapshot = DomSnapshot::from_root(DomNode::Element(root));
        assert_eq!(snapshot.count_interactive(), 1);
    }

    #[test]
    fn test_invisible_elements_get_no_index() {
        let snapshot = DomSnapshot::from_root(walker_fixture());
        assert_eq!(snapshot.selector_map.find_by_id("hidden-submit"), None);
        assert!(snapshot.selector_map.find_by_id("submit").is_some());
    }

    #[test]
    fn test_xpath_disambiguates_same_tag_siblings() {
        let snapshot = DomSnapshot::from_root(walker_fixture());

        let first = snapshot.handle(1).unwrap();
        let second = snapshot.handle(2).unwrap();
        assert_eq!(first.xpath, "/html[1]/body[1]/nav[1]/a[1]");
        assert_eq!(second.xpath, "/html[1]/body[1]/nav[1]/a[2]");

        let input = snapshot.handle(3).unwrap();
        assert_eq!(input.xpath, "/html[1]/body[1]/div[1]/input[1]");
    }

    #[test]
    fn test_unknown_index_is_not_found() {
        let snapshot = DomSnapshot::from_root(walker_fixture());

        assert!(matches!(snapshot.handle(99), Err(OperatorError::IndexNotFound(99))));
        assert!(snapshot.handle(0).is_err());
    }

    #[test]
    fn test_find_node_by_index() {
        let snapshot = DomSnapshot::from_root(walker_fixture());

        let node = snapshot.find_node_by_index(4).unwrap();
        assert_eq!(node.tag, "button");
        assert_eq!(node.id(), Some(&"submit".to_string()));

        assert!(snapshot.find_node_by_index(99).is_none());
    }

    #[test]
    fn test_digest_and_outline() {
        let snapshot = DomSnapshot::from_root(walker_fixture());

        let digest = snapshot.interactive_digest();
        assert_eq!(digest.len(), 4);
        assert_eq!(digest[0].index, 1);
        assert_eq!(digest[0].tag, "a");

        let outline = snapshot.outline();
        assert!(outline.contains("[1] <a> Home"));
        assert!(outline.contains("[4] <button> Sign in"));
    }

    #[test]
    fn test_highlight_colors_cycle() {
        let colors: Vec<_> = (0..7).map(|i| HIGHLIGHT_COLORS[i % HIGHLIGHT_COLORS.len()]).collect();
        assert_eq!(colors[0], colors[5]);
        assert_eq!(colors[1], colors[6]);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn test_truncate_char_safe() {
        assert_eq!(truncate("short", 50), "short");

        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));

        let unicode = "é".repeat(60);
        assert!(truncate(&unicode, 50).ends_with("..."));
    }

    #[test]
    fn test_count_nodes() {
        let mut body = ElementNode::new("body");
        body.add_child(DomNode::Text(TextNode { text: "hello".to_string(), visible: true }));
        let root =
            ElementNode::new("html").with_children(vec![DomNode::Element(body)]);

        let snapshot = DomSnapshot::from_root(DomNode::Element(root));
        assert_eq!(snapshot.count_nodes(), 3);
    }
}

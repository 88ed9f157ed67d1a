use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags that are interactive by themselves
const INTERACTIVE_TAGS: [&str; 12] = [
    "a", "button", "details", "embed", "input", "label", "menu", "menuitem", "object", "select",
    "textarea", "summary",
];

/// ARIA roles that mark an element as interactive
const INTERACTIVE_ROLES: [&str; 16] = [
    "button",
    "link",
    "checkbox",
    "radio",
    "tab",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "searchbox",
    "switch",
    "combobox",
    "slider",
    "spinbutton",
    "listbox",
    "textbox",
];

/// Attributes whose presence implies a click handler
const CLICK_HANDLER_ATTRS: [&str; 3] = ["onclick", "ng-click", "@click"];

/// A node captured by the in-page walker, discriminated the way the wire
/// format is
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DomNode {
    #[serde(rename = "TEXT_NODE")]
    Text(TextNode),

    #[serde(rename = "ELEMENT_NODE")]
    Element(ElementNode),
}

/// A text node with the visibility of its parent element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextNode {
    pub text: String,

    #[serde(default)]
    pub visible: bool,
}

/// An element node as captured by the walker, enriched Rust-side with a
/// highlight index once classified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// Lowercase tag name (e.g. "div", "button", "input")
    pub tag: String,

    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Computed in-page: non-zero rect, not display:none/visibility:hidden,
    /// opacity >= 0.1
    #[serde(default)]
    pub visible: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<BoundingBox>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,

    /// Assigned during snapshot indexing; only interactive, visible elements
    /// carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_index: Option<u32>,
}

/// Bounding rectangle of an element at capture time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Text worth keeping in the snapshot: at least two characters after
/// trimming, and not purely numeric/punctuation filler.
pub fn is_meaningful_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.len() < 2 {
        return false;
    }
    !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_punctuation() || c.is_whitespace())
}

impl ElementNode {
    /// Create a bare element node
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            visible: false,
            rect: None,
            children: Vec::new(),
            highlight_index: None,
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<DomNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set the bounding rect
    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(BoundingBox { x, y, width, height });
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child node
    pub fn add_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Element ID attribute
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of this element's subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DomNode::Text(t) => {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(t.text.trim());
                }
                DomNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Whether any descendant is an `<img>`
    pub fn has_image_descendant(&self) -> bool {
        self.children.iter().any(|child| match child {
            DomNode::Element(e) => e.is_tag("img") || e.has_image_descendant(),
            DomNode::Text(_) => false,
        })
    }

    /// Classify this element as interactive.
    ///
    /// Interactive when: the tag is in the allow-list, the ARIA role is an
    /// interactive role, a click-handler attribute is present, `tabindex` is
    /// present and not "-1", or a `data-action` attribute is present.
    pub fn is_interactive(&self) -> bool {
        if INTERACTIVE_TAGS.iter().any(|&t| self.is_tag(t)) {
            return true;
        }

        if let Some(role) = self.get_attribute("role") {
            if INTERACTIVE_ROLES.iter().any(|&r| role.eq_ignore_ascii_case(r)) {
                return true;
            }
        }

        if CLICK_HANDLER_ATTRS.iter().any(|&a| self.attributes.contains_key(a)) {
            return true;
        }

        if let Some(tabindex) = self.get_attribute("tabindex") {
            if tabindex != "-1" {
                return true;
            }
        }

        self.attributes.contains_key("data-action")
    }
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Non-zero dimensions
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Center point of the rect
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_filter_numeric_excluded() {
        assert!(!is_meaningful_text("123.45"));
        assert!(!is_meaningful_text("  42  "));
        assert!(!is_meaningful_text("..."));
        assert!(!is_meaningful_text("1"));
        assert!(!is_meaningful_text("a"));
    }

    #[test]
    fn test_text_filter_words_included() {
        assert!(is_meaningful_text("ok"));
        assert!(is_meaningful_text("  Submit  "));
        assert!(is_meaningful_text("v2"));
    }

    #[test]
    fn test_interactive_tags() {
        for tag in ["a", "button", "input", "select", "textarea", "summary", "label"] {
            assert!(ElementNode::new(tag).is_interactive(), "{tag} should be interactive");
        }

        assert!(!ElementNode::new("div").is_interactive());
        assert!(!ElementNode::new("span").is_interactive());
        assert!(!ElementNode::new("p").is_interactive());
    }

    #[test]
    fn test_interactive_role() {
        let mut div = ElementNode::new("div");
        div.add_attribute("role", "button");
        assert!(div.is_interactive());

        let mut div = ElementNode::new("div");
        div.add_attribute("role", "presentation");
        assert!(!div.is_interactive());
    }

    #[test]
    fn test_interactive_click_handlers() {
        for attr in ["onclick", "ng-click", "@click"] {
            let mut div = ElementNode::new("div");
            div.add_attribute(attr, "handle()");
            assert!(div.is_interactive(), "{attr} should mark interactive");
        }
    }

    #[test]
    fn test_tabindex_classification() {
        let mut skipped = ElementNode::new("div");
        skipped.add_attribute("tabindex", "-1");
        assert!(!skipped.is_interactive());

        let mut focusable = ElementNode::new("div");
        focusable.add_attribute("tabindex", "0");
        assert!(focusable.is_interactive());

        let mut ordered = ElementNode::new("div");
        ordered.add_attribute("tabindex", "3");
        assert!(ordered.is_interactive());
    }

    #[test]
    fn test_data_action_classification() {
        let mut div = ElementNode::new("div");
        div.add_attribute("data-action", "open-menu");
        assert!(div.is_interactive());
    }

    #[test]
    fn test_text_content() {
        let mut root = ElementNode::new("div");
        root.add_child(DomNode::Text(TextNode { text: "Hello".to_string(), visible: true }));
        let mut span = ElementNode::new("span");
        span.add_child(DomNode::Text(TextNode { text: "world".to_string(), visible: true }));
        root.add_child(DomNode::Element(span));

        assert_eq!(root.text_content(), "Hello world");
    }

    #[test]
    fn test_has_image_descendant() {
        let mut anchor = ElementNode::new("a");
        assert!(!anchor.has_image_descendant());

        let mut wrapper = ElementNode::new("span");
        wrapper.add_child(DomNode::Element(ElementNode::new("img")));
        anchor.add_child(DomNode::Element(wrapper));
        assert!(anchor.has_image_descendant());
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let json = r#"{
            "type": "ELEMENT_NODE",
            "tag": "button",
            "attributes": {"id": "go"},
            "visible": true,
            "rect": {"x": 10.0, "y": 20.0, "width": 80.0, "height": 24.0},
            "children": [
                {"type": "TEXT_NODE", "text": "Go", "visible": true}
            ]
        }"#;

        let node: DomNode = serde_json::from_str(json).unwrap();
        let DomNode::Element(el) = &node else {
            panic!("expected element node");
        };
        assert_eq!(el.tag, "button");
        assert_eq!(el.id(), Some(&"go".to_string()));
        assert!(el.visible);
        assert_eq!(el.children.len(), 1);
        assert!(el.highlight_index.is_none());

        let reencoded = serde_json::to_string(&node).unwrap();
        let reparsed: DomNode = serde_json::from_str(&reencoded).unwrap();
        assert_eq!(node, reparsed);
    }

    #[test]
    fn test_bounding_box() {
        let rect = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.is_visible());
        assert_eq!(rect.center(), (60.0, 45.0));

        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 0.0).is_visible());
    }
}

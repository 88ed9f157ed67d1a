use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Location of one indexed element at capture time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementHandle {
    /// Absolute XPath, positional at every step
    pub xpath: String,

    /// Element's tag name
    pub tag: String,

    /// Element's ID attribute (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Element's text content, truncated for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ElementHandle {
    pub fn new(xpath: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { xpath: xpath.into(), tag: tag.into(), id: None, text: None }
    }

    /// Builder method: set ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Map of highlight indices to element handles.
///
/// Indices start at 1 and grow in traversal order; IndexMap preserves that
/// order for display. The map is rebuilt on every snapshot — indices are
/// only valid against the snapshot that produced them.
#[derive(Debug, Clone)]
pub struct SelectorMap {
    map: IndexMap<u32, ElementHandle>,

    /// Next index to hand out
    next_index: u32,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self { map: IndexMap::new(), next_index: 1 }
    }

    /// Register a new element and return its assigned highlight index
    pub fn register(&mut self, handle: ElementHandle) -> u32 {
        let index = self.next_index;
        self.map.insert(index, handle);
        self.next_index += 1;
        index
    }

    /// Get handle by highlight index
    pub fn get(&self, index: u32) -> Option<&ElementHandle> {
        self.map.get(&index)
    }

    /// Check if an index was assigned in this snapshot
    pub fn contains(&self, index: u32) -> bool {
        self.map.contains_key(&index)
    }

    /// Number of indexed elements
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clear all elements and restart numbering at 1
    pub fn clear(&mut self) {
        self.map.clear();
        self.next_index = 1;
    }

    /// Iterate over all (index, handle) pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&u32, &ElementHandle)> {
        self.map.iter()
    }

    /// All assigned indices
    pub fn indices(&self) -> impl Iterator<Item = &u32> {
        self.map.keys()
    }

    /// Find index by element ID
    pub fn find_by_id(&self, id: &str) -> Option<u32> {
        self.map.iter().find(|(_, h)| h.id.as_deref() == Some(id)).map(|(idx, _)| *idx)
    }

    /// Export to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.map)
    }
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_start_at_one() {
        let mut map = SelectorMap::new();

        let first = map.register(ElementHandle::new("/html[1]/body[1]/a[1]", "a"));
        let second = map.register(ElementHandle::new("/html[1]/body[1]/a[2]", "a"));

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_and_contains() {
        let mut map = SelectorMap::new();

        let handle = ElementHandle::new("/html[1]/body[1]/button[1]", "button").with_id("go");
        let index = map.register(handle);

        assert!(map.contains(index));
        let stored = map.get(index).unwrap();
        assert_eq!(stored.tag, "button");
        assert_eq!(stored.id.as_deref(), Some("go"));

        assert!(!map.contains(99));
        assert!(map.get(99).is_none());
    }

    #[test]
    fn test_clear_restarts_numbering() {
        let mut map = SelectorMap::new();

        map.register(ElementHandle::new("/html[1]/body[1]/a[1]", "a"));
        map.register(ElementHandle::new("/html[1]/body[1]/a[2]", "a"));
        map.clear();

        assert!(map.is_empty());
        let index = map.register(ElementHandle::new("/html[1]/body[1]/a[1]", "a"));
        assert_eq!(index, 1);
    }

    #[test]
    fn test_iteration_preserves_assignment_order() {
        let mut map = SelectorMap::new();

        map.register(ElementHandle::new("/html[1]/body[1]/a[1]", "a"));
        map.register(ElementHandle::new("/html[1]/body[1]/button[1]", "button"));
        map.register(ElementHandle::new("/html[1]/body[1]/input[1]", "input"));

        let indices: Vec<_> = map.indices().copied().collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let tags: Vec<_> = map.iter().map(|(_, h)| h.tag.clone()).collect();
        assert_eq!(tags, vec!["a", "button", "input"]);
    }

    #[test]
    fn test_find_by_id() {
        let mut map = SelectorMap::new();

        map.register(ElementHandle::new("/html[1]/body[1]/a[1]", "a").with_id("first"));
        let second = map.register(ElementHandle::new("/html[1]/body[1]/a[2]", "a").with_id("second"));

        assert_eq!(map.find_by_id("second"), Some(second));
        assert_eq!(map.find_by_id("missing"), None);
    }

    #[test]
    fn test_handle_serialization() {
        let handle = ElementHandle::new("/html[1]/body[1]/button[1]", "button")
            .with_id("go")
            .with_text("Go");

        let json = serde_json::to_string(&handle).unwrap();
        let back: ElementHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, back);
    }

    #[test]
    fn test_to_json() {
        let mut map = SelectorMap::new();
        map.register(ElementHandle::new("/html[1]/body[1]/button[1]", "button").with_text("Click"));

        let json = map.to_json().unwrap();
        assert!(json.contains("button"));
        assert!(json.contains("Click"));
    }
}

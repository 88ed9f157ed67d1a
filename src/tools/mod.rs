//! Operator action tools
//!
//! Each page primitive is a [`Tool`] with typed, schema-described parameters.
//! Tools execute against a [`ToolContext`] and return a tagged
//! [`ActionOutcome`] so callers branch on structure instead of parsing prose.

pub mod click;
pub mod extract;
pub mod history;
pub mod inspect;
pub mod keyboard;
pub mod navigate;
pub mod screenshot;
pub mod scroll;
pub mod tabs;
pub mod utils;

pub use click::{ClickTool, MarkerStyle};
pub use extract::ExtractTool;
pub use history::{BackTool, ForwardTool};
pub use inspect::InspectTool;
pub use keyboard::KeyboardTool;
pub use navigate::NavigateTool;
pub use screenshot::ScreenshotTool;
pub use scroll::ScrollTool;
pub use tabs::{OpenTabTool, SwitchTabTool};

use crate::browser::BrowserSession;
use crate::dom::{DomSnapshot, ElementDigest};
use crate::error::{OperatorError, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of a history move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryDirection {
    Back,
    Forward,
}

/// Tagged result of one operator action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    Navigated {
        url: String,
    },
    /// Pixel coordinates actually clicked
    Clicked {
        x: f64,
        y: f64,
    },
    ClickedElement {
        index: u32,
    },
    Scrolled {
        by: i64,
    },
    PagedDown,
    ScrolledToBottom,
    KeyPressed {
        key: String,
    },
    Typed {
        chars: usize,
    },
    TabOpened {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    TabSwitched {
        index: usize,
    },
    HistoryMoved {
        direction: HistoryDirection,
    },
    Screenshot {
        mime_type: String,
        /// Base64-encoded image payload
        data: String,
    },
    Inspected {
        interactive: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlighted: Option<usize>,
        elements: Vec<ElementDigest>,
    },
    Extracted {
        title: String,
        url: String,
        markdown: String,
    },
}

/// A browser automation tool with typed parameters
pub trait Tool {
    type Params: DeserializeOwned + JsonSchema;

    /// Tool name used for registry lookup
    fn name(&self) -> &str;

    /// Execute with already-deserialized parameters
    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ActionOutcome>;

    /// JSON schema of the parameter type
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }
}

/// Execution context shared by tools: the session plus a lazily captured
/// DOM snapshot.
///
/// The snapshot is cached for the lifetime of one context and dropped by any
/// action that can change the page, so index-based actions within a context
/// see consistent numbering.
pub struct ToolContext<'a> {
    pub session: &'a BrowserSession,
    snapshot: Option<DomSnapshot>,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session, snapshot: None }
    }

    /// Get the cached snapshot, capturing one if needed
    pub fn snapshot(&mut self) -> Result<&DomSnapshot> {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.session.snapshot()?);
        }
        // The option was just filled
        self.snapshot
            .as_ref()
            .ok_or_else(|| OperatorError::SnapshotParseFailed("snapshot missing".to_string()))
    }

    /// Capture a fresh snapshot, replacing any cached one
    pub fn refresh_snapshot(&mut self) -> Result<&DomSnapshot> {
        self.snapshot = Some(self.session.snapshot()?);
        self.snapshot
            .as_ref()
            .ok_or_else(|| OperatorError::SnapshotParseFailed("snapshot missing".to_string()))
    }

    /// Drop the cached snapshot (after navigation or DOM-mutating actions)
    pub fn invalidate_snapshot(&mut self) {
        self.snapshot = None;
    }
}

trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ActionOutcome>;
}

impl<T> ErasedTool for T
where
    T: Tool + Send + Sync,
{
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> serde_json::Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ActionOutcome> {
        let typed: T::Params =
            serde_json::from_value(params).map_err(|e| OperatorError::InvalidParams {
                tool: Tool::name(self).to_string(),
                reason: e.to_string(),
            })?;
        self.execute_typed(typed, context)
    }
}

/// Registry of operator tools, looked up by name
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Registry with every operator tool registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(ClickTool);
        registry.register(ScrollTool);
        registry.register(KeyboardTool);
        registry.register(OpenTabTool);
        registry.register(SwitchTabTool);
        registry.register(BackTool);
        registry.register(ForwardTool);
        registry.register(ScreenshotTool);
        registry.register(InspectTool);
        registry.register(ExtractTool);
        registry
    }

    /// Register a tool under its own name
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + Send + Sync + 'static,
    {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    /// Execute a tool by name with JSON parameters
    pub fn execute(
        &self,
        name: &str,
        params: serde_json::Value,
        context: &mut ToolContext,
    ) -> Result<ActionOutcome> {
        let tool = self.tools.get(name).ok_or_else(|| OperatorError::UnknownTool(name.to_string()))?;
        log::debug!("executing tool '{name}'");
        tool.execute(params, context)
    }

    /// Registered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Parameter schema of a registered tool
    pub fn schema(&self, name: &str) -> Option<serde_json::Value> {
        self.tools.get(name).map(|t| t.parameters_schema())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

//! MCP (Model Context Protocol) server for operator browser sessions
//!
//! Exposes the operator tools to MCP clients by wrapping the internal tool
//! registry. Screenshot results go out as image content; every other outcome
//! is returned as its serialized tagged form.

pub mod handler;
pub use handler::OperatorServer;

use crate::browser::BrowserSession;
use crate::tools::{ActionOutcome, ToolContext};
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Navigate tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to; a missing scheme is filled in
    pub url: String,
}

/// Click tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// Normalized horizontal position in [0,1]
    #[serde(default)]
    pub x: Option<f64>,
    /// Normalized vertical position in [0,1]
    #[serde(default)]
    pub y: Option<f64>,
    /// Highlight index from the last operator_inspect call
    #[serde(default)]
    pub index: Option<u32>,
    /// Visual marker to paint before a coordinate click: "cursor" or "dot"
    #[serde(default)]
    pub marker: Option<String>,
}

/// Scroll tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrollParams {
    /// Pixel delta; omit for one page down, negative for document bottom
    #[serde(default)]
    pub amount: Option<i64>,
}

/// Keyboard tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeyboardParams {
    /// "key" to press a named key, "type" to type literal text
    pub action: String,
    /// Named key for the "key" action
    #[serde(default)]
    pub key: Option<String>,
    /// Literal text for the "type" action
    #[serde(default)]
    pub text: Option<String>,
}

/// Open-tab tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenTabParams {
    /// URL for the new tab; blank tab when omitted
    #[serde(default)]
    pub url: Option<String>,
}

/// Switch-tab tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwitchTabParams {
    /// Zero-based index into the tab list
    pub index: usize,
}

/// Inspect tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InspectParams {
    /// Paint numbered overlays over the indexed elements (default: true)
    #[serde(default = "default_true")]
    pub highlight: bool,
}

fn default_true() -> bool {
    true
}

/// Convert an internal outcome to an MCP tool result
fn convert_outcome(outcome: ActionOutcome) -> Result<CallToolResult, McpError> {
    match outcome {
        ActionOutcome::Screenshot { mime_type, data } => {
            Ok(CallToolResult::success(vec![Content::image(data, mime_type)]))
        }
        other => {
            let text = serde_json::to_string_pretty(&other)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
    }
}

impl OperatorServer {
    fn run_tool(&self, name: &str, params: serde_json::Value) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let outcome = session
            .tool_registry()
            .execute(name, params, &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_outcome(outcome)
    }
}

#[tool_router]
impl OperatorServer {
    /// Navigate to a URL
    #[tool(description = "Navigate the session to a URL; waits for the navigation to commit")]
    fn operator_navigate(&self, params: Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("navigate", serde_json::json!({ "url": params.0.url }))
    }

    /// Click by normalized coordinates or highlight index
    #[tool(description = "Click the page at normalized [0,1] coordinates, or click an element by \
                          its highlight index from operator_inspect")]
    fn operator_click(&self, params: Parameters<ClickParams>) -> Result<CallToolResult, McpError> {
        let tool_params = if let Some(index) = params.0.index {
            serde_json::json!({ "index": index })
        } else if let (Some(x), Some(y)) = (params.0.x, params.0.y) {
            let mut body = serde_json::json!({ "x": x, "y": y });
            if let Some(marker) = params.0.marker {
                body["marker"] = serde_json::json!(marker);
            }
            body
        } else {
            return Err(McpError::invalid_params(
                "either index or both x and y must be provided",
                None,
            ));
        };

        self.run_tool("click", tool_params)
    }

    /// Scroll the page
    #[tool(description = "Scroll down by a pixel amount, one page (no amount), or to the bottom \
                          (negative amount)")]
    fn operator_scroll(&self, params: Parameters<ScrollParams>) -> Result<CallToolResult, McpError> {
        let tool_params = match params.0.amount {
            Some(amount) => serde_json::json!({ "amount": amount }),
            None => serde_json::json!({}),
        };
        self.run_tool("scroll", tool_params)
    }

    /// Press a key or type text
    #[tool(description = "Press a named key (action=key) or type literal text (action=type)")]
    fn operator_keyboard(&self, params: Parameters<KeyboardParams>) -> Result<CallToolResult, McpError> {
        let mut tool_params = serde_json::json!({ "action": params.0.action });
        if let Some(key) = params.0.key {
            tool_params["key"] = serde_json::json!(key);
        }
        if let Some(text) = params.0.text {
            tool_params["text"] = serde_json::json!(text);
        }
        self.run_tool("keyboard", tool_params)
    }

    /// Open a new tab
    #[tool(description = "Open a new tab, optionally at a URL")]
    fn operator_open_tab(&self, params: Parameters<OpenTabParams>) -> Result<CallToolResult, McpError> {
        let tool_params = match params.0.url {
            Some(url) => serde_json::json!({ "url": url }),
            None => serde_json::json!({}),
        };
        self.run_tool("open_tab", tool_params)
    }

    /// Switch to a tab by index
    #[tool(description = "Switch to the tab at the given index")]
    fn operator_switch_tab(&self, params: Parameters<SwitchTabParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("switch_tab", serde_json::json!({ "index": params.0.index }))
    }

    /// Go back in history
    #[tool(description = "Navigate back in browser history")]
    fn operator_back(&self) -> Result<CallToolResult, McpError> {
        self.run_tool("back", serde_json::json!({}))
    }

    /// Go forward in history
    #[tool(description = "Navigate forward in browser history")]
    fn operator_forward(&self) -> Result<CallToolResult, McpError> {
        self.run_tool("forward", serde_json::json!({}))
    }

    /// Screenshot the viewport
    #[tool(description = "Capture the visible viewport as a JPEG image")]
    fn operator_screenshot(&self) -> Result<CallToolResult, McpError> {
        self.run_tool("screenshot", serde_json::json!({}))
    }

    /// Inspect the page and number its interactive elements
    #[tool(description = "Capture a DOM snapshot, assign highlight indices to interactive \
                          elements, and return the digest; optionally paints numbered overlays")]
    fn operator_inspect(&self, params: Parameters<InspectParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("inspect", serde_json::json!({ "highlight": params.0.highlight }))
    }

    /// Read the page as markdown
    #[tool(description = "Extract the current page content as markdown")]
    fn operator_extract(&self) -> Result<CallToolResult, McpError> {
        self.run_tool("extract", serde_json::json!({}))
    }

    /// Fetch a fresh live-view URL
    #[tool(description = "Fetch a fresh live-view URL for embedding the session in an iframe")]
    fn operator_view_url(&self) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let session_ref: &BrowserSession = &session;

        // The provider client is a blocking HTTP client, which refuses to run
        // on an async runtime thread; hop to a scoped thread for the call.
        let url = std::thread::scope(|scope| {
            scope
                .spawn(move || session_ref.fetch_view_url())
                .join()
                .map_err(|_| McpError::internal_error("view url fetch panicked", None))
        })?
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(url)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_outcome_text() {
        let result =
            convert_outcome(ActionOutcome::Navigated { url: "https://example.com".to_string() })
                .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_convert_outcome_screenshot_is_image() {
        let result = convert_outcome(ActionOutcome::Screenshot {
            mime_type: "image/jpeg".to_string(),
            data: "aGVsbG8=".to_string(),
        })
        .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_click_params_accept_partial() {
        let params: ClickParams =
            serde_json::from_value(serde_json::json!({"index": 3})).unwrap();
        assert_eq!(params.index, Some(3));
        assert!(params.x.is_none());
    }
}

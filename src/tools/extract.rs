use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Grace period for dynamic content before reading the page
const CONTENT_SETTLE: Duration = Duration::from_millis(1000);

const PAGE_CONTENT_JS: &str = r#"
    (function () {
        return JSON.stringify({
            title: document.title,
            url: window.location.href,
            html: document.body ? document.body.outerHTML : ''
        });
    })()
"#;

/// Structure returned by the page-content script
#[derive(Debug, Serialize, Deserialize)]
struct PageContent {
    title: String,
    url: String,
    html: String,
}

/// Parameters for the extract tool (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractParams {}

/// Tool for reading the page as markdown, so an agent can work from text
/// instead of screenshots
#[derive(Default)]
pub struct ExtractTool;

impl Tool for ExtractTool {
    type Params = ExtractParams;

    fn name(&self) -> &str {
        "extract"
    }

    fn execute_typed(&self, _params: ExtractParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        // No network-idle signal over CDP here; give dynamic content a moment
        std::thread::sleep(CONTENT_SETTLE);

        let tab = context.session.tab()?;

        let result = tab
            .evaluate(PAGE_CONTENT_JS, false)
            .map_err(|e| OperatorError::EvaluationFailed(e.to_string()))?;

        let value = result.value.ok_or_else(|| OperatorError::ToolExecutionFailed {
            tool: "extract".to_string(),
            reason: "no value returned from page".to_string(),
        })?;

        let json_str: String =
            serde_json::from_value(value).map_err(|e| OperatorError::ToolExecutionFailed {
                tool: "extract".to_string(),
                reason: format!("expected JSON string: {e}"),
            })?;

        let content: PageContent =
            serde_json::from_str(&json_str).map_err(|e| OperatorError::ToolExecutionFailed {
                tool: "extract".to_string(),
                reason: format!("failed to parse page content: {e}"),
            })?;

        let body = html2md::parse_html(&content.html);
        let markdown = if content.title.is_empty() {
            body
        } else {
            format!("# {}\n\n{}", content.title, body)
        };

        Ok(ActionOutcome::Extracted { title: content.title, url: content.url, markdown })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tool_metadata() {
        let tool = ExtractTool;
        assert_eq!(tool.name(), "extract");
        assert!(tool.parameters_schema().is_object());
    }

    #[test]
    fn test_page_content_deserialization() {
        let json = r#"{"title": "Test", "url": "https://example.com", "html": "<p>Hello</p>"}"#;
        let content: PageContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.title, "Test");
        assert_eq!(content.url, "https://example.com");
    }

    #[test]
    fn test_html_to_markdown_conversion() {
        let markdown = html2md::parse_html("<h2>Section</h2><p>Some <strong>bold</strong> text</p>");
        assert!(markdown.contains("Section"));
        assert!(markdown.contains("**bold**"));
    }
}

use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the scroll tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrollParams {
    /// Pixel delta. Positive scrolls down by that amount; absent sends a
    /// PageDown key; negative jumps to the document bottom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

/// Tool for scrolling the active tab
#[derive(Default)]
pub struct ScrollTool;

impl Tool for ScrollTool {
    type Params = ScrollParams;

    fn name(&self) -> &str {
        "scroll"
    }

    fn execute_typed(&self, params: ScrollParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let tab = context.session.tab()?;

        let outcome = match params.amount {
            Some(amount) if amount >= 0 => {
                tab.evaluate(&format!("window.scrollBy(0, {amount})"), false)
                    .map_err(|e| OperatorError::EvaluationFailed(format!("scroll failed: {e}")))?;
                ActionOutcome::Scrolled { by: amount }
            }
            Some(_) => {
                tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false)
                    .map_err(|e| OperatorError::EvaluationFailed(format!("scroll failed: {e}")))?;
                ActionOutcome::ScrolledToBottom
            }
            None => {
                tab.press_key("PageDown").map_err(|e| OperatorError::ToolExecutionFailed {
                    tool: "scroll".to_string(),
                    reason: format!("PageDown failed: {e}"),
                })?;
                ActionOutcome::PagedDown
            }
        };

        // Overlay boxes painted at old positions are stale now
        context.invalidate_snapshot();

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_params_amount() {
        let params: ScrollParams = serde_json::from_value(serde_json::json!({"amount": 400})).unwrap();
        assert_eq!(params.amount, Some(400));
    }

    #[test]
    fn test_scroll_params_absent_amount() {
        let params: ScrollParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.amount, None);
    }

    #[test]
    fn test_scroll_params_negative_amount() {
        let params: ScrollParams = serde_json::from_value(serde_json::json!({"amount": -1})).unwrap();
        assert_eq!(params.amount, Some(-1));
    }

    #[test]
    fn test_scroll_tool_metadata() {
        let tool = ScrollTool;
        assert_eq!(tool.name(), "scroll");
        assert!(tool.parameters_schema().is_object());
    }
}

use crate::error::{OperatorError, Result};
use crate::tools::utils::normalize_url;
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the open_tab tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenTabParams {
    /// URL to open in the new tab; blank tab when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tool for opening a new tab in the same browser
#[derive(Default)]
pub struct OpenTabTool;

impl Tool for OpenTabTool {
    type Params = OpenTabParams;

    fn name(&self) -> &str {
        "open_tab"
    }

    fn execute_typed(&self, params: OpenTabParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let (tab, index) = context.session.open_tab()?;

        let url = match params.url {
            Some(raw) => {
                let url = normalize_url(&raw);
                tab.navigate_to(&url).map_err(|e| {
                    OperatorError::NavigationFailed(format!("failed to navigate to {url}: {e}"))
                })?;
                tab.wait_until_navigated().map_err(|e| {
                    OperatorError::NavigationFailed(format!("navigation to {url} did not commit: {e}"))
                })?;
                Some(url)
            }
            None => None,
        };

        tab.activate()
            .map_err(|e| OperatorError::TabOperationFailed(format!("failed to activate tab: {e}")))?;

        context.invalidate_snapshot();

        Ok(ActionOutcome::TabOpened { index, url })
    }
}

/// Parameters for the switch_tab tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwitchTabParams {
    /// Zero-based index into the tab list
    pub index: usize,
}

/// Tool for switching to a tab by index.
///
/// The index is checked against the tab list before anything is activated;
/// out-of-range requests fail with a bounds error.
#[derive(Default)]
pub struct SwitchTabTool;

impl Tool for SwitchTabTool {
    type Params = SwitchTabParams;

    fn name(&self) -> &str {
        "switch_tab"
    }

    fn execute_typed(&self, params: SwitchTabParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        context.session.switch_to_tab(params.index)?;

        context.invalidate_snapshot();

        Ok(ActionOutcome::TabSwitched { index: params.index })
    }
}

use crate::error::Result;
use crate::tools::utils::normalize_url;
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the navigate tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to; a missing scheme is filled in
    pub url: String,
}

/// Tool for navigating the active tab.
///
/// Waits until the navigation commits, bounded by the session's navigation
/// timeout; full page load is not awaited.
#[derive(Default)]
pub struct NavigateTool;

impl Tool for NavigateTool {
    type Params = NavigateParams;

    fn name(&self) -> &str {
        "navigate"
    }

    fn execute_typed(&self, params: NavigateParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let url = normalize_url(&params.url);

        context.session.navigate(&url)?;

        // Any cached element indices died with the old document
        context.invalidate_snapshot();

        Ok(ActionOutcome::Navigated { url })
    }
}

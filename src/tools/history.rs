use crate::error::Result;
use crate::tools::{ActionOutcome, HistoryDirection, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// History tools take no parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryParams {}

/// Tool for navigating back in browser history
#[derive(Default)]
pub struct BackTool;

impl Tool for BackTool {
    type Params = HistoryParams;

    fn name(&self) -> &str {
        "back"
    }

    fn execute_typed(&self, _params: HistoryParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        context.session.go_back()?;
        context.invalidate_snapshot();

        Ok(ActionOutcome::HistoryMoved { direction: HistoryDirection::Back })
    }
}

/// Tool for navigating forward in browser history
#[derive(Default)]
pub struct ForwardTool;

impl Tool for ForwardTool {
    type Params = HistoryParams;

    fn name(&self) -> &str {
        "forward"
    }

    fn execute_typed(&self, _params: HistoryParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        context.session.go_forward()?;
        context.invalidate_snapshot();

        Ok(ActionOutcome::HistoryMoved { direction: HistoryDirection::Forward })
    }
}

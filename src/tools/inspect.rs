use crate::error::Result;
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the inspect tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InspectParams {
    /// Paint numbered overlay boxes over the indexed elements
    #[serde(default = "default_highlight")]
    pub highlight: bool,
}

fn default_highlight() -> bool {
    true
}

/// Tool for capturing a fresh DOM snapshot.
///
/// Assigns highlight indices to every interactive, visible element and
/// optionally paints the numbered overlays. The digest in the outcome is
/// what index-based clicks are issued against — until the next inspection
/// or navigation invalidates it.
#[derive(Default)]
pub struct InspectTool;

impl Tool for InspectTool {
    type Params = InspectParams;

    fn name(&self) -> &str {
        "inspect"
    }

    fn execute_typed(&self, params: InspectParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let tab = context.session.tab()?;

        let snapshot = context.refresh_snapshot()?;

        let highlighted = if params.highlight { Some(snapshot.highlight(&tab)?) } else { None };

        Ok(ActionOutcome::Inspected {
            interactive: snapshot.count_interactive(),
            highlighted,
            elements: snapshot.interactive_digest(),
        })
    }
}

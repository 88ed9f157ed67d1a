use crate::browser::config::VIEWPORT;
use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, Tool, ToolContext};
use headless_chrome::browser::tab::point::Point;
use headless_chrome::Tab;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Pause between painting a marker and clicking, so the viewer can follow
const MARKER_SETTLE: Duration = Duration::from_millis(500);

/// Replaces any previous marker, then removes itself shortly after
const MARKER_JS: &str = r#"function (x, y, dot) {
    var MARKER_ID = '__operator_click_marker';

    var previous = document.getElementById(MARKER_ID);
    if (previous) {
        previous.remove();
    }

    var marker = document.createElement('div');
    marker.id = MARKER_ID;
    marker.style.position = 'fixed';
    marker.style.pointerEvents = 'none';
    marker.style.zIndex = '2147483647';

    if (dot) {
        marker.style.left = (x - 6) + 'px';
        marker.style.top = (y - 6) + 'px';
        marker.style.width = '12px';
        marker.style.height = '12px';
        marker.style.borderRadius = '50%';
        marker.style.background = '#e6194b';
    } else {
        marker.style.left = x + 'px';
        marker.style.top = y + 'px';
        marker.style.width = '0';
        marker.style.height = '0';
        marker.style.borderLeft = '14px solid #1a1a1a';
        marker.style.borderBottom = '14px solid transparent';
        marker.style.transform = 'rotate(-15deg)';
    }

    document.body.appendChild(marker);
    setTimeout(function () { marker.remove(); }, 1500);
    return true;
}"#;

/// Visual marker painted before a coordinate click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// Cursor-shaped arrow at the click point
    Cursor,
    /// Small filled dot centered on the click point
    Dot,
}

/// Parameters for the click tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// Click target: normalized coordinates or a highlight index
    #[serde(flatten)]
    pub target: ClickTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ClickTarget {
    /// Click at normalized page coordinates
    Coords {
        /// Horizontal position in [0,1]
        x: f64,
        /// Vertical position in [0,1]
        y: f64,
        /// Paint a visual marker before clicking
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marker: Option<MarkerStyle>,
    },
    /// Click an element by highlight index from the last DOM snapshot
    Index {
        /// Highlight index assigned by the last inspection
        index: u32,
    },
}

/// Tool for clicking the page, by coordinate or by highlight index
#[derive(Default)]
pub struct ClickTool;

impl Tool for ClickTool {
    type Params = ClickParams;

    fn name(&self) -> &str {
        "click"
    }

    fn execute_typed(&self, params: ClickParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let tab = context.session.tab()?;

        let outcome = match params.target {
            ClickTarget::Coords { x, y, marker } => {
                let (px, py) = VIEWPORT.to_pixels(x, y)?;

                if let Some(style) = marker {
                    paint_marker(&tab, px, py, style)?;
                    std::thread::sleep(MARKER_SETTLE);
                }

                tab.move_mouse_to_point(Point { x: px, y: py }).map_err(|e| {
                    OperatorError::ToolExecutionFailed {
                        tool: "click".to_string(),
                        reason: format!("mouse move failed: {e}"),
                    }
                })?;
                tab.click_point(Point { x: px, y: py }).map_err(|e| {
                    OperatorError::ToolExecutionFailed {
                        tool: "click".to_string(),
                        reason: format!("click failed: {e}"),
                    }
                })?;

                ActionOutcome::Clicked { x: px, y: py }
            }
            ClickTarget::Index { index } => {
                context.snapshot()?.click_index(&tab, index)?;
                ActionOutcome::ClickedElement { index }
            }
        };

        // The click may have mutated the DOM or started a navigation
        context.invalidate_snapshot();

        Ok(outcome)
    }
}

fn paint_marker(tab: &Arc<Tab>, x: f64, y: f64, style: MarkerStyle) -> Result<()> {
    let dot = matches!(style, MarkerStyle::Dot);
    let js = format!("({MARKER_JS})({x}, {y}, {dot})");

    tab.evaluate(&js, false)
        .map_err(|e| OperatorError::EvaluationFailed(format!("marker paint failed: {e}")))?;

    Ok(())
}

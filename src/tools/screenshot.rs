use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, Tool, ToolContext};
use base64::Engine;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed JPEG quality for agent-facing screenshots
const JPEG_QUALITY: u32 = 80;

const MIME_TYPE: &str = "image/jpeg";

/// Parameters for the screenshot tool (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotParams {}

/// Tool for capturing the visible viewport as a base64 JPEG
#[derive(Default)]
pub struct ScreenshotTool;

impl Tool for ScreenshotTool {
    type Params = ScreenshotParams;

    fn name(&self) -> &str {
        "screenshot"
    }

    fn execute_typed(&self, _params: ScreenshotParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let tab = context.session.tab()?;

        let bytes = tab
            .capture_screenshot(CaptureScreenshotFormatOption::Jpeg, Some(JPEG_QUALITY), None, true)
            .map_err(|e| OperatorError::ScreenshotFailed(e.to_string()))?;

        let data = base64::engine::general_purpose::STANDARD.encode(&bytes);

        Ok(ActionOutcome::Screenshot { mime_type: MIME_TYPE.to_string(), data })
    }
}

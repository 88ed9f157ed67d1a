use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, Tool, ToolContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed delay between keystrokes when typing literal text
const KEYSTROKE_DELAY: Duration = Duration::from_millis(12);

/// Parameters for the keyboard tool.
///
/// `{"action": "key", "key": "Enter"}` presses one named key;
/// `{"action": "type", "text": "hello"}` types literal text. A `type`
/// request without `text` fails parameter validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum KeyboardParams {
    Key {
        /// Named key, e.g. "Enter", "Tab", "Escape", "ArrowDown"
        key: String,
    },
    Type {
        /// Literal text to type
        text: String,
    },
}

/// Tool for key presses and literal typing
#[derive(Default)]
pub struct KeyboardTool;

impl Tool for KeyboardTool {
    type Params = KeyboardParams;

    fn name(&self) -> &str {
        "keyboard"
    }

    fn execute_typed(&self, params: KeyboardParams, context: &mut ToolContext) -> Result<ActionOutcome> {
        let tab = context.session.tab()?;

        let outcome = match params {
            KeyboardParams::Key { key } => {
                tab.press_key(&key).map_err(|e| OperatorError::ToolExecutionFailed {
                    tool: "keyboard".to_string(),
                    reason: format!("key press '{key}' failed: {e}"),
                })?;
                ActionOutcome::KeyPressed { key }
            }
            KeyboardParams::Type { text } => {
                let mut chars = 0;
                for ch in text.chars() {
                    tab.send_character(&ch.to_string()).map_err(|e| {
                        OperatorError::ToolExecutionFailed {
                            tool: "keyboard".to_string(),
                            reason: format!("typing failed after {chars} chars: {e}"),
                        }
                    })?;
                    chars += 1;
                    std::thread::sleep(KEYSTROKE_DELAY);
                }
                ActionOutcome::Typed { chars }
            }
        };

        context.invalidate_snapshot();

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_params_key() {
        let json = serde_json::json!({"action": "key", "key": "Enter"});
        let params: KeyboardParams = serde_json::from_value(json).unwrap();
        assert!(matches!(params, KeyboardParams::Key { key } if key == "Enter"));
    }

    #[test]
    fn test_keyboard_params_type() {
        let json = serde_json::json!({"action": "type", "text": "hello"});
        let params: KeyboardParams = serde_json::from_value(json).unwrap();
        assert!(matches!(params, KeyboardParams::Type { text } if text == "hello"));
    }

    #[test]
    fn test_type_without_text_is_rejected() {
        let json = serde_json::json!({"action": "type"});
        assert!(serde_json::from_value::<KeyboardParams>(json).is_err());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let json = serde_json::json!({"action": "mash", "key": "Enter"});
        assert!(serde_json::from_value::<KeyboardParams>(json).is_err());
    }

    #[test]
    fn test_keyboard_tool_metadata() {
        let tool = KeyboardTool;
        assert_eq!(tool.name(), "keyboard");
        assert!(tool.parameters_schema().is_object());
    }
}

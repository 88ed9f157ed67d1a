use thiserror::Error;

/// Errors produced while driving an operator browser session
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Required configuration (API key, project ID) is absent
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// The browser-hosting provider rejected or failed a request
    #[error("provider request failed: {0}")]
    Provider(String),

    /// Failed to launch a local browser instance
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to attach to a browser over its WebSocket endpoint
    #[error("failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation did not commit within the timeout, or failed outright
    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// Tab creation, lookup, or activation failed
    #[error("tab operation failed: {0}")]
    TabOperationFailed(String),

    /// A tab index outside the current tab list was requested
    #[error("tab index {index} out of range (have {count} tabs)")]
    TabIndexOutOfRange { index: usize, count: usize },

    /// Normalized click coordinates must lie inside the unit square
    #[error("coordinates ({x}, {y}) outside [0,1]x[0,1]")]
    CoordinatesOutOfRange { x: f64, y: f64 },

    /// In-page script evaluation failed
    #[error("script evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The DOM walker returned something we could not parse
    #[error("failed to parse DOM snapshot: {0}")]
    SnapshotParseFailed(String),

    /// No element carries the requested highlight index in this snapshot
    #[error("no element with highlight index {0}")]
    IndexNotFound(u32),

    /// The indexed element existed at capture time but is gone from the page
    #[error("element with highlight index {index} is no longer present in the page")]
    StaleElement { index: u32 },

    /// Screenshot capture or encoding failed
    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    /// No tool registered under the given name
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool parameters did not match the tool's schema
    #[error("invalid parameters for tool '{tool}': {reason}")]
    InvalidParams { tool: String, reason: String },

    /// A tool failed mid-execution
    #[error("tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },
}

pub type Result<T> = std::result::Result<T, OperatorError>;

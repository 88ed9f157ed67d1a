use crate::error::{OperatorError, Result};
use std::env;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "OPERATOR_API_KEY";

/// Environment variable holding the provider project ID
pub const ENV_PROJECT_ID: &str = "OPERATOR_PROJECT_ID";

/// Environment variable overriding the provider API base URL
pub const ENV_API_URL: &str = "OPERATOR_API_URL";

const DEFAULT_API_URL: &str = "https://api.browsergrid.io/v1";

/// Fixed viewport assumed by every normalized-to-pixel coordinate conversion
pub const VIEWPORT: Viewport = Viewport { width: 1440, height: 900 };

/// Pixel dimensions of the operated page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert normalized coordinates in [0,1]x[0,1] to pixel coordinates.
    ///
    /// Fails when either coordinate falls outside the unit square, so a
    /// mis-scaled caller is caught before the mouse moves anywhere.
    pub fn to_pixels(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(OperatorError::CoordinatesOutOfRange { x, y });
        }
        Ok(((x * self.width as f64).round(), (y * self.height as f64).round()))
    }
}

/// Credentials and endpoint for the remote browser-hosting API
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub project_id: String,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Builder method: override the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Read credentials from the environment.
    ///
    /// Missing variables are a configuration error rather than an opaque
    /// authentication failure from the provider.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY)
            .map_err(|_| OperatorError::MissingConfig(format!("{ENV_API_KEY} not set")))?;
        let project_id = env::var(ENV_PROJECT_ID)
            .map_err(|_| OperatorError::MissingConfig(format!("{ENV_PROJECT_ID} not set")))?;
        let base_url = env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self { api_key, project_id, base_url })
    }
}

/// Options for allocating a remote session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Viewport requested from the provider
    pub viewport: Viewport,

    /// Ask the provider for a stable desktop fingerprint
    pub fingerprint: bool,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the requested viewport
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Builder method: toggle fingerprinting
    pub fn fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { viewport: VIEWPORT, fingerprint: true }
    }
}

/// Options for launching a local browser instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Path to a Chrome/Chromium binary
    pub chrome_path: Option<std::path::PathBuf>,

    /// Persistent profile directory
    pub user_data_dir: Option<std::path::PathBuf>,

    /// Run with the Chromium sandbox enabled
    pub sandbox: bool,
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Builder method: set window size
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Builder method: set the browser binary path
    pub fn chrome_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Builder method: set the profile directory
    pub fn user_data_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    /// Builder method: toggle the sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: VIEWPORT.width,
            window_height: VIEWPORT.height,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

/// Options for attaching to an already-running browser over WebSocket
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// WebSocket debugger URL
    pub ws_url: String,

    /// Connection timeout in milliseconds
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self { ws_url: ws_url.into(), timeout: 30_000 }
    }

    /// Builder method: set the connection timeout
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_to_pixels_corners() {
        assert_eq!(VIEWPORT.to_pixels(0.0, 0.0).unwrap(), (0.0, 0.0));
        assert_eq!(VIEWPORT.to_pixels(1.0, 1.0).unwrap(), (1440.0, 900.0));
    }

    #[test]
    fn test_viewport_to_pixels_rounds() {
        // 0.5 * 1440 = 720, 0.5 * 900 = 450
        assert_eq!(VIEWPORT.to_pixels(0.5, 0.5).unwrap(), (720.0, 450.0));

        // 0.333 * 1440 = 479.52 -> 480; 0.333 * 900 = 299.7 -> 300
        assert_eq!(VIEWPORT.to_pixels(0.333, 0.333).unwrap(), (480.0, 300.0));

        // 0.0001 * 1440 = 0.144 -> 0
        assert_eq!(VIEWPORT.to_pixels(0.0001, 0.0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_viewport_rejects_out_of_range() {
        assert!(VIEWPORT.to_pixels(1.2, 0.5).is_err());
        assert!(VIEWPORT.to_pixels(0.5, -0.1).is_err());
        assert!(matches!(
            VIEWPORT.to_pixels(2.0, 2.0),
            Err(OperatorError::CoordinatesOutOfRange { .. })
        ));
    }

    #[test]
    fn test_provider_config_builder() {
        let config = ProviderConfig::new("key", "project").base_url("http://localhost:8080");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.project_id, "project");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_session_options_defaults() {
        let opts = SessionOptions::new();
        assert_eq!(opts.viewport, VIEWPORT);
        assert!(opts.fingerprint);

        let opts = SessionOptions::new().viewport(800, 600).fingerprint(false);
        assert_eq!(opts.viewport.width, 800);
        assert!(!opts.fingerprint);
    }

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new().headless(true).window_size(800, 600);
        assert!(opts.headless);
        assert_eq!(opts.window_width, 800);
        assert_eq!(opts.window_height, 600);
    }

    #[test]
    fn test_connection_options() {
        let opts = ConnectionOptions::new("ws://localhost:9222").timeout(5000);
        assert_eq!(opts.ws_url, "ws://localhost:9222");
        assert_eq!(opts.timeout, 5000);
    }
}

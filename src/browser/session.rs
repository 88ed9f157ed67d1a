use crate::browser::config::{ConnectionOptions, LaunchOptions, SessionOptions};
use crate::browser::provider::{RemoteSession, SessionProvider};
use crate::dom::DomSnapshot;
use crate::error::{OperatorError, Result};
use crate::tools::{ActionOutcome, ToolContext, ToolRegistry};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Navigation waits for commit, bounded by this timeout
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(25);

const HISTORY_SETTLE: Duration = Duration::from_millis(300);

/// Validate a tab index against the current tab count.
///
/// Runs before any activation call so an out-of-range request never reaches
/// the browser.
pub fn validate_tab_index(count: usize, index: usize) -> Result<()> {
    if index >= count {
        return Err(OperatorError::TabIndexOutOfRange { index, count });
    }
    Ok(())
}

struct RemoteHandle {
    session: RemoteSession,
    view_url: String,
    provider: SessionProvider,
}

/// A browser under operator control: either a provider-hosted remote session
/// or a locally launched Chrome/Chromium instance.
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Present only for provider-hosted sessions
    remote: Option<RemoteHandle>,

    /// Tool registry for executing operator actions
    tool_registry: ToolRegistry,
}

impl BrowserSession {
    /// Allocate a remote session from the provider and attach to it
    pub fn open_remote(provider: &SessionProvider, options: SessionOptions) -> Result<Self> {
        let session = provider.create_session(&options)?;
        let view_url = provider.session_url(&session.id)?;

        let browser = Browser::connect(session.connect_url.clone())
            .map_err(|e| OperatorError::ConnectionFailed(e.to_string()))?;

        log::info!("attached to remote session {}", session.id);

        Ok(Self {
            browser,
            remote: Some(RemoteHandle { session, view_url, provider: provider.clone() }),
            tool_registry: ToolRegistry::with_defaults(),
        })
    }

    /// Attach to an existing remote session by ID
    pub fn resume_remote(provider: &SessionProvider, session_id: &str) -> Result<Self> {
        let session = provider.session(session_id)?;
        let view_url = provider.session_url(&session.id)?;

        let browser = Browser::connect(session.connect_url.clone())
            .map_err(|e| OperatorError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            browser,
            remote: Some(RemoteHandle { session, view_url, provider: provider.clone() }),
            tool_registry: ToolRegistry::with_defaults(),
        })
    }

    /// Launch a local browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive for long agent loops (default is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser =
            Browser::new(launch_opts).map_err(|e| OperatorError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| OperatorError::LaunchFailed(format!("failed to create tab: {e}")))?;

        Ok(Self { browser, remote: None, tool_registry: ToolRegistry::with_defaults() })
    }

    /// Attach to an already-running browser via its WebSocket URL
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url)
            .map_err(|e| OperatorError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser, remote: None, tool_registry: ToolRegistry::with_defaults() })
    }

    /// Provider session ID, if this is a remote session
    pub fn session_id(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.session.id.as_str())
    }

    /// View URL fetched when the session was opened
    pub fn view_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.view_url.as_str())
    }

    /// Fetch a fresh view URL from the provider (never cached)
    pub fn fetch_view_url(&self) -> Result<String> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| OperatorError::Provider("not a remote session".to_string()))?;
        remote.provider.session_url(&remote.session.id)
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Get all tabs
    pub fn tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| OperatorError::TabOperationFailed(format!("failed to get tabs: {e}")))?
            .clone();

        Ok(tabs)
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.active_tab()
    }

    /// Get the currently active tab by checking document visibility and focus
    pub fn active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.tabs()?;

        // First pass: visibility and focus together (strongest signal)
        for tab in &tabs {
            match tab
                .evaluate("document.visibilityState === 'visible' && document.hasFocus()", false)
            {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(e) => {
                    log::debug!("failed to check tab status: {e}");
                    continue;
                }
            }
        }

        // Second pass: visibility alone (weaker signal, but better than nothing)
        for tab in &tabs {
            match tab.evaluate("document.visibilityState === 'visible'", false) {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(_) => continue,
            }
        }

        Err(OperatorError::TabOperationFailed("no active tab found".to_string()))
    }

    /// Open a new tab; returns the tab and its index in the tab list
    pub fn open_tab(&self) -> Result<(Arc<Tab>, usize)> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| OperatorError::TabOperationFailed(format!("failed to create tab: {e}")))?;

        let index = self.tabs()?.len().saturating_sub(1);
        Ok((tab, index))
    }

    /// Switch to the tab at `index`.
    ///
    /// The index is validated against the current tab list before any
    /// activation call is issued.
    pub fn switch_to_tab(&self, index: usize) -> Result<Arc<Tab>> {
        let tabs = self.tabs()?;
        validate_tab_index(tabs.len(), index)?;

        let tab = tabs[index].clone();
        tab.activate()
            .map_err(|e| OperatorError::TabOperationFailed(format!("failed to activate tab: {e}")))?;

        Ok(tab)
    }

    /// Navigate the active tab, waiting for the navigation to commit.
    ///
    /// Bounded by [`NAVIGATION_TIMEOUT`]; full page load is not awaited.
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.set_default_timeout(NAVIGATION_TIMEOUT)
            .navigate_to(url)
            .map_err(|e| {
                OperatorError::NavigationFailed(format!("failed to navigate to {url}: {e}"))
            })?;

        tab.wait_until_navigated()
            .map_err(|e| OperatorError::NavigationFailed(format!("navigation timeout: {e}")))?;

        Ok(())
    }

    /// Navigate back in browser history
    pub fn go_back(&self) -> Result<()> {
        let go_back_js = r#"
            (function() {
                window.history.back();
                return true;
            })()
        "#;

        self.tab()?
            .evaluate(go_back_js, false)
            .map_err(|e| OperatorError::NavigationFailed(format!("failed to go back: {e}")))?;

        // Give the history navigation a moment to land
        std::thread::sleep(HISTORY_SETTLE);

        Ok(())
    }

    /// Navigate forward in browser history
    pub fn go_forward(&self) -> Result<()> {
        let go_forward_js = r#"
            (function() {
                window.history.forward();
                return true;
            })()
        "#;

        self.tab()?
            .evaluate(go_forward_js, false)
            .map_err(|e| OperatorError::NavigationFailed(format!("failed to go forward: {e}")))?;

        std::thread::sleep(HISTORY_SETTLE);

        Ok(())
    }

    /// Capture a DOM snapshot of the active tab
    pub fn snapshot(&self) -> Result<DomSnapshot> {
        DomSnapshot::capture(&self.tab()?)
    }

    /// Get the tool registry
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Execute a tool by name
    pub fn execute_tool(&self, name: &str, params: serde_json::Value) -> Result<ActionOutcome> {
        let mut context = ToolContext::new(self);
        self.tool_registry.execute(name, params, &mut context)
    }

    /// Close the session: close all tabs and, for remote sessions, request
    /// release from the provider.
    pub fn close(&self) -> Result<()> {
        // headless_chrome has no public browser close; closing the tabs is
        // the effective shutdown, the rest happens on drop
        if let Ok(tabs) = self.tabs() {
            for tab in tabs {
                let _ = tab.close(false);
            }
        }

        if let Some(remote) = &self.remote {
            remote.provider.release_session(&remote.session.id)?;
        }

        Ok(())
    }
}

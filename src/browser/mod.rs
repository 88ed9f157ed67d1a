//! Browser session management
//!
//! Two ways to get a [`BrowserSession`]: allocate a provider-hosted remote
//! session via [`SessionProvider`], or launch/attach to a local browser for
//! development and tests.

pub mod config;
pub mod provider;
pub mod session;

pub use config::{
    ConnectionOptions, LaunchOptions, ProviderConfig, SessionOptions, Viewport, VIEWPORT,
};
pub use provider::{DebugUrls, RemoteSession, SessionProvider, SessionStatus};
pub use session::{validate_tab_index, BrowserSession, NAVIGATION_TIMEOUT};

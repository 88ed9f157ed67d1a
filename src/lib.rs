//! # browser-operator
//!
//! Remote browser orchestration for AI agents: provider-hosted sessions,
//! coordinate- and index-based page actions, and indexed DOM inspection over
//! the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Session Management**: allocate remote, provider-hosted browser
//!   sessions (with an embeddable live-view URL), or launch/attach to a
//!   local Chrome/Chromium for development
//! - **Action Tools**: navigate, click at normalized coordinates or by
//!   highlight index, type, scroll, tabs, history, screenshot, extract
//! - **DOM Inspection**: one pass numbers every interactive, visible element
//!   so an agent can say "click element 7" without CSS/XPath knowledge
//! - **MCP Server**: Model Context Protocol server exposing the tools to AI
//!   agents
//!
//! ## MCP Server
//!
//! The recommended way to use this library is via the MCP server:
//!
//! ```bash
//! # Drive a provider-hosted session (reads OPERATOR_API_KEY / OPERATOR_PROJECT_ID)
//! cargo run --bin mcp-server --features mcp-server
//!
//! # Drive a locally launched browser instead
//! cargo run --bin mcp-server --features mcp-server -- --backend local --headed
//! ```
//!
//! ## Library Usage
//!
//! ### Driving a remote session
//!
//! ```rust,no_run
//! use browser_operator::{BrowserSession, SessionOptions, SessionProvider};
//! use serde_json::json;
//!
//! # fn main() -> browser_operator::Result<()> {
//! let provider = SessionProvider::from_env()?;
//! let session = BrowserSession::open_remote(&provider, SessionOptions::new())?;
//!
//! println!("watch along at {:?}", session.view_url());
//!
//! session.execute_tool("navigate", json!({"url": "example.com"}))?;
//! let outcome = session.execute_tool("inspect", json!({}))?;
//! println!("{outcome:?}");
//!
//! session.execute_tool("click", json!({"index": 1}))?;
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Snapshots as explicit values
//!
//! Highlight indices live in a [`DomSnapshot`] owned by the caller. They are
//! assigned in one depth-first pass starting at 1 and die with the snapshot:
//! navigation or DOM mutation invalidates them, and the next capture starts
//! over.
//!
//! ```rust,no_run
//! # use browser_operator::{BrowserSession, LaunchOptions};
//! # fn main() -> browser_operator::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let snapshot = session.snapshot()?;
//! println!("{}", snapshot.outline());
//! snapshot.click_index(&session.tab()?, 1)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: provider client, session management, configuration
//! - [`dom`]: DOM snapshots, highlight indexing, selector maps
//! - [`tools`]: operator action tools and the tagged [`ActionOutcome`]
//! - [`error`]: error types and result alias
//! - [`mcp`]: **MCP server** (requires `mcp-handler` feature)

pub mod browser;
pub mod dom;
pub mod error;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{
    BrowserSession, ConnectionOptions, LaunchOptions, ProviderConfig, RemoteSession,
    SessionOptions, SessionProvider, SessionStatus, Viewport, VIEWPORT,
};
pub use dom::{DomNode, DomSnapshot, ElementDigest, ElementHandle, ElementNode, SelectorMap};
pub use error::{OperatorError, Result};
pub use tools::{ActionOutcome, Tool, ToolContext, ToolRegistry};

#[cfg(feature = "mcp-handler")]
pub use mcp::OperatorServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;

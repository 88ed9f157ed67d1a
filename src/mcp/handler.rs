use crate::browser::{BrowserSession, LaunchOptions, SessionOptions, SessionProvider};
use crate::error::Result as OperatorResult;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool_handler, ServerHandler};
use std::sync::{Arc, Mutex, MutexGuard};

/// MCP server wrapping one operator browser session.
///
/// Tool calls arrive one at a time from the MCP client, but the transport
/// may service them from different task contexts, so the session sits behind
/// a mutex. Nothing issues concurrent actions against the same session.
#[derive(Clone)]
pub struct OperatorServer {
    session: Arc<Mutex<BrowserSession>>,
    pub(crate) tool_router: ToolRouter<OperatorServer>,
}

impl OperatorServer {
    /// Wrap an existing session
    pub fn from_session(session: BrowserSession) -> Self {
        Self { session: Arc::new(Mutex::new(session)), tool_router: Self::tool_router() }
    }

    /// Allocate a provider-hosted session and serve it
    pub fn open_remote(provider: &SessionProvider, options: SessionOptions) -> OperatorResult<Self> {
        Ok(Self::from_session(BrowserSession::open_remote(provider, options)?))
    }

    /// Launch a local browser and serve it
    pub fn launch(options: LaunchOptions) -> OperatorResult<Self> {
        Ok(Self::from_session(BrowserSession::launch(options)?))
    }

    /// Lock the underlying session
    pub(crate) fn session(&self) -> MutexGuard<'_, BrowserSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// View URL fetched when the session was opened, if remote
    pub fn view_url(&self) -> Option<String> {
        self.session().view_url().map(str::to_string)
    }

    /// Close the session (and release it from the provider when remote)
    pub fn close(&self) -> OperatorResult<()> {
        self.session().close()
    }
}

#[tool_handler]
impl ServerHandler for OperatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Drives one browser session. Use operator_inspect to number the \
                 interactive elements, then act by index or by normalized \
                 coordinates; indices are only valid until the next inspection \
                 or navigation."
                    .to_string(),
            ),
        }
    }
}

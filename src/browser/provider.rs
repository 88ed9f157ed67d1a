use crate::browser::config::{ProviderConfig, SessionOptions};
use crate::error::{OperatorError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifecycle state of a provider-hosted session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Created,
    Active,
    Released,
    #[serde(other)]
    Unknown,
}

/// A remote, provider-hosted browser addressed by an opaque ID
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSession {
    pub id: String,

    /// WebSocket URL the automation library attaches to
    pub connect_url: String,

    pub status: SessionStatus,
}

/// Debugger URLs for a session, from the provider's debug endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugUrls {
    /// Fullscreen view URL suitable for iframe embedding
    pub debugger_fullscreen_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debugger_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    project_id: &'a str,
    viewport: ViewportRequest,
    fingerprint: bool,
}

#[derive(Debug, Serialize)]
struct ViewportRequest {
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseSessionRequest<'a> {
    project_id: &'a str,
    status: &'a str,
}

/// Stateless client for the remote browser-hosting API.
///
/// Every operation is a single pass-through HTTP call; no session state is
/// kept between calls, and there is no retry or backoff at this layer.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    http: Client,
    config: ProviderConfig,
}

impl SessionProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OperatorError::Provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Build a provider from `OPERATOR_API_KEY` / `OPERATOR_PROJECT_ID`
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env()?)
    }

    /// Allocate a new remote browser session with the requested viewport
    pub fn create_session(&self, options: &SessionOptions) -> Result<RemoteSession> {
        let body = CreateSessionRequest {
            project_id: &self.config.project_id,
            viewport: ViewportRequest {
                width: options.viewport.width,
                height: options.viewport.height,
            },
            fingerprint: options.fingerprint,
        };

        let session: RemoteSession = self
            .http
            .post(format!("{}/sessions", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| OperatorError::Provider(format!("create session: {e}")))?
            .error_for_status()
            .map_err(|e| OperatorError::Provider(format!("create session: {e}")))?
            .json()
            .map_err(|e| OperatorError::Provider(format!("create session response: {e}")))?;

        log::debug!("created remote session {} ({:?})", session.id, session.status);

        Ok(session)
    }

    /// Fetch current details for a session
    pub fn session(&self, session_id: &str) -> Result<RemoteSession> {
        self.http
            .get(format!("{}/sessions/{}", self.config.base_url, session_id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .map_err(|e| OperatorError::Provider(format!("get session: {e}")))?
            .error_for_status()
            .map_err(|e| OperatorError::Provider(format!("get session: {e}")))?
            .json()
            .map_err(|e| OperatorError::Provider(format!("get session response: {e}")))
    }

    /// Fetch the fullscreen debugger URL for iframe embedding.
    ///
    /// Not cached: the provider can rotate these, so every call hits the API.
    pub fn session_url(&self, session_id: &str) -> Result<String> {
        let urls: DebugUrls = self
            .http
            .get(format!("{}/sessions/{}/debug", self.config.base_url, session_id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .map_err(|e| OperatorError::Provider(format!("get session url: {e}")))?
            .error_for_status()
            .map_err(|e| OperatorError::Provider(format!("get session url: {e}")))?
            .json()
            .map_err(|e| OperatorError::Provider(format!("get session url response: {e}")))?;

        Ok(urls.debugger_fullscreen_url)
    }

    /// Request release of a remote session.
    ///
    /// Whether a double release succeeds is the provider's business; nothing
    /// is verified locally.
    pub fn release_session(&self, session_id: &str) -> Result<()> {
        let body = ReleaseSessionRequest {
            project_id: &self.config.project_id,
            status: "REQUEST_RELEASE",
        };

        self.http
            .post(format!("{}/sessions/{}", self.config.base_url, session_id))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| OperatorError::Provider(format!("release session: {e}")))?
            .error_for_status()
            .map_err(|e| OperatorError::Provider(format!("release session: {e}")))?;

        log::debug!("requested release of session {session_id}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_session_deserialization() {
        let json = r#"{
            "id": "sess-123",
            "connectUrl": "wss://connect.browsergrid.io/sess-123",
            "status": "created"
        }"#;

        let session: RemoteSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "sess-123");
        assert_eq!(session.connect_url, "wss://connect.browsergrid.io/sess-123");
        assert_eq!(session.status, SessionStatus::Created);
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let json = r#"{"id": "s", "connectUrl": "wss://x", "status": "hibernating"}"#;
        let session: RemoteSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.status, SessionStatus::Unknown);
    }

    #[test]
    fn test_debug_urls_deserialization() {
        let json = r#"{
            "debuggerFullscreenUrl": "https://view.browsergrid.io/sess-123/full",
            "debuggerUrl": "https://view.browsergrid.io/sess-123"
        }"#;

        let urls: DebugUrls = serde_json::from_str(json).unwrap();
        assert_eq!(urls.debugger_fullscreen_url, "https://view.browsergrid.io/sess-123/full");
        assert_eq!(urls.debugger_url.as_deref(), Some("https://view.browsergrid.io/sess-123"));
    }

    #[test]
    fn test_create_request_serialization() {
        let body = CreateSessionRequest {
            project_id: "proj-1",
            viewport: ViewportRequest { width: 1440, height: 900 },
            fingerprint: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["projectId"], "proj-1");
        assert_eq!(json["viewport"]["width"], 1440);
        assert_eq!(json["viewport"]["height"], 900);
        assert_eq!(json["fingerprint"], true);
    }
}

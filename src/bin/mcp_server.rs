//! Operator MCP Server
//!
//! This binary provides a Model Context Protocol (MCP) server driving one
//! operator browser session. It exposes the operator tools to AI assistants
//! and other MCP clients over stdio, SSE, or streamable HTTP.

use browser_operator::browser::{LaunchOptions, SessionOptions, SessionProvider};
use browser_operator::mcp::OperatorServer;
use clap::{Parser, ValueEnum};
use rmcp::{transport::stdio, ServiceExt};

use rmcp::transport::{
    sse_server::{SseServer, SseServerConfig},
    streamable_http_server::{session::local::LocalSessionManager, StreamableHttpService},
};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output transport (default)
    Stdio,
    /// Server-Sent Events transport
    Sse,
    /// HTTP streamable transport
    Http,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// Provider-hosted remote session (default)
    Remote,
    /// Locally launched Chrome/Chromium
    Local,
}

#[derive(Parser)]
#[command(name = "operator")]
#[command(version)]
#[command(about = "Browser operator MCP server", long_about = None)]
struct Cli {
    /// Where the browser session lives
    #[arg(long, short = 'b', value_enum, default_value = "remote")]
    backend: Backend,

    /// Launch the local browser in headed mode (local backend only)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to a custom browser executable (local backend only)
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// Persistent browser profile directory (local backend only)
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// Transport type to use
    #[arg(long, short = 't', value_enum, default_value = "stdio")]
    transport: Transport,

    /// Port for SSE or HTTP transport (default: 3000)
    #[arg(long, short = 'p', default_value = "3000")]
    port: u16,

    /// SSE endpoint path (default: /sse)
    #[arg(long, default_value = "/sse")]
    sse_path: String,

    /// SSE POST path for messages (default: /message)
    #[arg(long, default_value = "/message")]
    sse_post_path: String,

    /// HTTP streamable endpoint path (default: /mcp)
    #[arg(long, default_value = "/mcp")]
    http_path: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    eprintln!("Operator MCP Server v{}", env!("CARGO_PKG_VERSION"));

    // Session setup happens before the runtime exists: the provider client
    // is a blocking HTTP client and refuses to run on a runtime thread
    let server = match cli.backend {
        Backend::Remote => {
            eprintln!("Backend: remote provider session");
            let provider = SessionProvider::from_env()?;
            OperatorServer::open_remote(&provider, SessionOptions::new())?
        }
        Backend::Local => {
            eprintln!("Backend: local browser ({})", if cli.headed { "headed" } else { "headless" });
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(ref path) = cli.executable_path {
                eprintln!("Browser executable: {path}");
                options = options.chrome_path(path);
            }
            if let Some(ref dir) = cli.user_data_dir {
                eprintln!("User data directory: {dir}");
                options = options.user_data_dir(dir);
            }
            OperatorServer::launch(options)?
        }
    };

    if let Some(url) = server.view_url() {
        eprintln!("Live view: {url}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(run(server.clone(), cli));

    // Release the session outside the runtime, same constraint as setup
    drop(runtime);
    if let Err(e) = server.close() {
        eprintln!("Session close failed: {e}");
    }
    eprintln!("Cleanup complete, exiting...");

    result
}

async fn run(server: OperatorServer, cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.transport {
        Transport::Stdio => {
            eprintln!("Transport: stdio");
            eprintln!("Ready to accept MCP connections via stdio");

            let service = server.serve(stdio()).await?;
            let quit_reason = service.waiting().await?;
            eprintln!("Server quit with reason: {quit_reason:?}");
        }
        Transport::Sse => {
            eprintln!("Transport: SSE");
            eprintln!("Port: {}", cli.port);
            eprintln!("SSE path: {}", cli.sse_path);
            eprintln!("SSE POST path: {}", cli.sse_post_path);

            let bind_addr = format!("127.0.0.1:{}", cli.port);

            let config = SseServerConfig {
                bind: bind_addr.parse()?,
                sse_path: cli.sse_path.clone(),
                post_path: cli.sse_post_path.clone(),
                ct: CancellationToken::new(),
                sse_keep_alive: None,
            };

            let (sse_server, router) = SseServer::new(config);

            eprintln!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.sse_path);

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            let shutdown_ct = sse_server.config.ct.clone();
            let axum_server = axum::serve(listener, router).with_graceful_shutdown(async move {
                shutdown_ct.cancelled().await;
            });

            tokio::spawn(async move {
                if let Err(e) = axum_server.await {
                    eprintln!("SSE server error: {e}");
                }
            });

            let ct = sse_server.with_service(move || server.clone());

            tokio::signal::ctrl_c().await?;
            ct.cancel();
        }
        Transport::Http => {
            eprintln!("Transport: streamable HTTP");
            eprintln!("Port: {}", cli.port);
            eprintln!("HTTP path: {}", cli.http_path);

            let bind_addr = format!("127.0.0.1:{}", cli.port);

            let service = StreamableHttpService::new(
                move || Ok(server.clone()),
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service(&cli.http_path, service);

            eprintln!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.http_path);

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
    }

    Ok(())
}

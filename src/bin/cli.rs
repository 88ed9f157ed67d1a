//! Operator CLI
//!
//! One-shot commands against provider-hosted browser sessions. The provider
//! owns the session, so it survives across invocations; every page command
//! takes the session ID and reattaches.

use anyhow::Context;
use base64::Engine;
use browser_operator::browser::{SessionOptions, SessionProvider};
use browser_operator::{ActionOutcome, BrowserSession};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "operator")]
#[command(version)]
#[command(about = "Drive provider-hosted browser sessions from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage provider sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Navigate the session to a URL
    Navigate {
        #[arg(long, short)]
        session: String,
        url: String,
    },

    /// Click at normalized coordinates, or by highlight index
    Click {
        #[arg(long, short)]
        session: String,
        /// Normalized horizontal position in [0,1]
        #[arg(long)]
        x: Option<f64>,
        /// Normalized vertical position in [0,1]
        #[arg(long)]
        y: Option<f64>,
        /// Highlight index from the last inspect
        #[arg(long)]
        index: Option<u32>,
        /// Paint a marker before a coordinate click: cursor or dot
        #[arg(long)]
        marker: Option<String>,
    },

    /// Scroll down by pixels, one page (no amount), or to the bottom (negative)
    Scroll {
        #[arg(long, short)]
        session: String,
        #[arg(long)]
        amount: Option<i64>,
    },

    /// Press a named key (Enter, Tab, ArrowDown, ...)
    Key {
        #[arg(long, short)]
        session: String,
        key: String,
    },

    /// Type literal text into the focused element
    Type {
        #[arg(long, short)]
        session: String,
        text: String,
    },

    /// Number the interactive elements and print the digest
    Inspect {
        #[arg(long, short)]
        session: String,
        /// Skip painting the numbered overlays
        #[arg(long)]
        no_highlight: bool,
    },

    /// Capture a JPEG screenshot
    Screenshot {
        #[arg(long, short)]
        session: String,
        /// Write the image here instead of printing base64 JSON
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Read the page as markdown
    Extract {
        #[arg(long, short)]
        session: String,
    },

    /// Navigate back in history
    Back {
        #[arg(long, short)]
        session: String,
    },

    /// Navigate forward in history
    Forward {
        #[arg(long, short)]
        session: String,
    },

    /// Open a new tab, optionally at a URL
    OpenTab {
        #[arg(long, short)]
        session: String,
        url: Option<String>,
    },

    /// Switch to a tab by index
    SwitchTab {
        #[arg(long, short)]
        session: String,
        index: usize,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Allocate a new provider session and print its ID and view URL
    Create {
        /// Skip requesting a stable fingerprint
        #[arg(long)]
        no_fingerprint: bool,
    },

    /// Print a fresh live-view URL for a session
    View { id: String },

    /// Request release of a session
    Close { id: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let provider = SessionProvider::from_env().context("provider configuration")?;

    match cli.command {
        Command::Session { command } => match command {
            SessionCommand::Create { no_fingerprint } => {
                let options = SessionOptions::new().fingerprint(!no_fingerprint);
                let session = provider.create_session(&options)?;
                let view_url = provider.session_url(&session.id)?;
                println!("session: {}", session.id);
                println!("view:    {view_url}");
            }
            SessionCommand::View { id } => {
                println!("{}", provider.session_url(&id)?);
            }
            SessionCommand::Close { id } => {
                provider.release_session(&id)?;
                println!("released {id}");
            }
        },
        Command::Navigate { session, url } => {
            run_tool(&provider, &session, "navigate", json!({ "url": url }))?;
        }
        Command::Click { session, x, y, index, marker } => {
            let params = if let Some(index) = index {
                json!({ "index": index })
            } else if let (Some(x), Some(y)) = (x, y) {
                let mut body = json!({ "x": x, "y": y });
                if let Some(marker) = marker {
                    body["marker"] = json!(marker);
                }
                body
            } else {
                anyhow::bail!("click needs either --index or both --x and --y");
            };
            run_tool(&provider, &session, "click", params)?;
        }
        Command::Scroll { session, amount } => {
            let params = match amount {
                Some(amount) => json!({ "amount": amount }),
                None => json!({}),
            };
            run_tool(&provider, &session, "scroll", params)?;
        }
        Command::Key { session, key } => {
            run_tool(&provider, &session, "keyboard", json!({ "action": "key", "key": key }))?;
        }
        Command::Type { session, text } => {
            run_tool(&provider, &session, "keyboard", json!({ "action": "type", "text": text }))?;
        }
        Command::Inspect { session, no_highlight } => {
            run_tool(&provider, &session, "inspect", json!({ "highlight": !no_highlight }))?;
        }
        Command::Screenshot { session, output } => {
            let browser = BrowserSession::resume_remote(&provider, &session)?;
            let outcome = browser.execute_tool("screenshot", json!({}))?;

            match (&outcome, output) {
                (ActionOutcome::Screenshot { data, .. }, Some(path)) => {
                    let bytes = base64::engine::general_purpose::STANDARD
                        .decode(data)
                        .context("screenshot payload is not valid base64")?;
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                _ => print_outcome(&outcome)?,
            }
        }
        Command::Extract { session } => {
            run_tool(&provider, &session, "extract", json!({}))?;
        }
        Command::Back { session } => {
            run_tool(&provider, &session, "back", json!({}))?;
        }
        Command::Forward { session } => {
            run_tool(&provider, &session, "forward", json!({}))?;
        }
        Command::OpenTab { session, url } => {
            let params = match url {
                Some(url) => json!({ "url": url }),
                None => json!({}),
            };
            run_tool(&provider, &session, "open_tab", params)?;
        }
        Command::SwitchTab { session, index } => {
            run_tool(&provider, &session, "switch_tab", json!({ "index": index }))?;
        }
    }

    Ok(())
}

fn run_tool(
    provider: &SessionProvider,
    session_id: &str,
    name: &str,
    params: serde_json::Value,
) -> anyhow::Result<()> {
    let session = BrowserSession::resume_remote(provider, session_id)?;
    let outcome = session.execute_tool(name, params)?;
    print_outcome(&outcome)
}

fn print_outcome(outcome: &ActionOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

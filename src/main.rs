use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use macadamia::cookies::{apply_filter, render_human, render_modified, unix_now};
use macadamia::devtools::{first_debugger_url, render_targets};
use macadamia::{CdpSession, DevToolsClient, Error, Exchange, OutputFormat, Result};

#[derive(Parser)]
#[command(name = "macadamia")]
#[command(about = "Interact with a Chromium-based browser's debug port: open tabs, extensions, and cookies", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug port the browser was launched with (--remote-debugging-port)
    #[arg(short, long)]
    port: u16,

    /// Narrow cookie output to name/domain matches (title/URL for pages)
    #[arg(short, long, global = true)]
    grep: Option<String>,

    /// Deadline in seconds for each network call; 0 waits indefinitely
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List debuggable targets (open tabs, extensions, workers)
    Pages,

    /// Dump cookies over the debug WebSocket
    Cookies {
        /// Output projection: raw, human, or modified
        #[arg(short, long, default_value_t = OutputFormat::Human)]
        format: OutputFormat,

        /// Use Network.getAllCookies against the first target instead of
        /// browser-wide Storage.getCookies
        #[arg(long)]
        all: bool,
    },

    /// Clear all browser cookies
    Clear,

    /// Load cookies into the browser from a JSON array file
    Load {
        /// File containing a JSON array of cookie objects
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so raw output stays byte-clean on stdout
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let deadline = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let grep = cli.grep.as_deref();
    let client = DevToolsClient::new(cli.port, deadline)?;

    match cli.command {
        Command::Pages => {
            let targets = client.targets().await?;
            print!("{}", render_targets(&targets, grep));
        }

        Command::Cookies { format, all } => {
            let exchange = if all {
                let targets = client.targets().await?;
                let ws_url = first_debugger_url(&targets)?;
                CdpSession::connect(ws_url, deadline)
                    .await?
                    .network_get_all_cookies()
                    .await?
            } else {
                let version = client.version().await?;
                if version.web_socket_debugger_url.is_empty() {
                    return Err(Error::NoTarget(
                        "version endpoint did not advertise a webSocketDebuggerUrl".into(),
                    ));
                }
                CdpSession::connect(&version.web_socket_debugger_url, deadline)
                    .await?
                    .storage_get_cookies()
                    .await?
            };
            emit_cookies(&exchange, format, grep)?;
        }

        Command::Clear => {
            let targets = client.targets().await?;
            let ws_url = first_debugger_url(&targets)?;
            CdpSession::connect(ws_url, deadline)
                .await?
                .clear_browser_cookies()
                .await?;
        }

        Command::Load { file } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let cookies: serde_json::Value = serde_json::from_str(&content)?;
            if !cookies.is_array() {
                return Err(Error::Decode(format!(
                    "{}: cookie import file must be a JSON array",
                    file.display()
                )));
            }
            let targets = client.targets().await?;
            let ws_url = first_debugger_url(&targets)?;
            CdpSession::connect(ws_url, deadline)
                .await?
                .set_cookies(cookies)
                .await?;
        }
    }

    Ok(())
}

fn emit_cookies(exchange: &Exchange, format: OutputFormat, grep: Option<&str>) -> Result<()> {
    match format {
        OutputFormat::Raw => {
            // Verbatim server bytes; the filter intentionally does not apply
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&exchange.raw)?;
            stdout.write_all(b"\n")?;
        }
        OutputFormat::Modified => {
            let cookies = apply_filter(exchange.cookies()?, grep);
            println!("{}", render_modified(&cookies, unix_now())?);
        }
        OutputFormat::Human => {
            let cookies = apply_filter(exchange.cookies()?, grep);
            print!("{}", render_human(&cookies));
        }
    }
    Ok(())
}

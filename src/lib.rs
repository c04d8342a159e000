//! # Macadamia
//!
//! Command-line client for the Chromium DevTools debug port.
//!
//! Talks to a Chromium-based browser launched with
//! `--remote-debugging-port`: lists debuggable targets (tabs,
//! extensions, workers) over the HTTP discovery endpoint, and dumps,
//! clears, or imports cookies through the protocol's WebSocket channel.
//! Each invocation performs a single command exchange and exits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use macadamia::{CdpSession, DevToolsClient};
//!
//! #[tokio::main]
//! async fn main() -> macadamia::Result<()> {
//!     let client = DevToolsClient::new(9222, None)?;
//!
//!     // Browser-level session URL comes from /json/version
//!     let version = client.version().await?;
//!
//!     // One connection, one command, one response
//!     let session = CdpSession::connect(&version.web_socket_debugger_url, None).await?;
//!     let exchange = session.storage_get_cookies().await?;
//!
//!     for cookie in exchange.cookies()? {
//!         println!("{}={}", cookie.name, cookie.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cdp;
pub mod cookies;
pub mod devtools;
pub mod error;

// Re-exports
pub use cdp::{CdpSession, CommandEnvelope, Cookie, Exchange, ResponseEnvelope};
pub use cookies::{LightCookie, OutputFormat};
pub use devtools::{BrowserVersion, DevToolsClient, Target};
pub use error::{Error, Result};

//! One-shot command session over the debug channel
//!
//! A session performs exactly one request/response exchange: connect,
//! send one command envelope, read one response envelope, tear down.
//! The connection's lifetime is the call's lifetime.

use std::time::Duration;

use serde_json::{json, Value};

use super::transport::WsTransport;
use super::types::{CommandEnvelope, Cookie, CookieListResult, ResponseEnvelope};
use crate::error::{Error, Result};

/// The outcome of one command exchange: the verbatim response bytes
/// (for raw passthrough output) alongside the decoded envelope.
#[derive(Debug)]
pub struct Exchange {
    pub raw: Vec<u8>,
    pub envelope: ResponseEnvelope,
}

impl Exchange {
    /// Extract the cookie list from a cookie-returning command's result
    pub fn cookies(&self) -> Result<Vec<Cookie>> {
        let result: CookieListResult = self.envelope.result_as()?;
        Ok(result.cookies)
    }
}

/// A connected debug-channel session, good for exactly one command
#[derive(Debug)]
pub struct CdpSession {
    transport: WsTransport,
    deadline: Option<Duration>,
}

impl CdpSession {
    /// Dial a WebSocket debugger URL. `deadline` bounds the dial and
    /// handshake; `None` waits indefinitely.
    pub async fn connect(ws_url: &str, deadline: Option<Duration>) -> Result<Self> {
        let transport = match deadline {
            Some(limit) => tokio::time::timeout(limit, WsTransport::connect(ws_url))
                .await
                .map_err(|_| Error::Timeout(format!("connecting to {}", ws_url)))??,
            None => WsTransport::connect(ws_url).await?,
        };
        Ok(Self { transport, deadline })
    }

    /// Send one command and read its response, consuming the session.
    /// The same deadline supplied at connect time bounds the exchange.
    pub async fn execute(self, command: &CommandEnvelope) -> Result<Exchange> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.exchange(command))
                .await
                .map_err(|_| {
                    Error::Timeout(format!("awaiting response to {}", command.method))
                })?,
            None => self.exchange(command).await,
        }
    }

    async fn exchange(mut self, command: &CommandEnvelope) -> Result<Exchange> {
        let frame = serde_json::to_vec(command)?;
        tracing::debug!("Sending CDP command: {} (id={})", command.method, command.id);

        self.transport.send_text(&frame).await?;
        let raw = self.transport.read_text().await?;

        let envelope = ResponseEnvelope::decode(&raw)?;
        if envelope.id != command.id {
            // Advisory only: with a single in-flight request there is
            // nothing else the response could belong to.
            tracing::warn!(
                "Response id {} does not match request id {}",
                envelope.id,
                command.id
            );
        }
        envelope.check_error()?;

        self.transport.close().await;

        Ok(Exchange { raw, envelope })
    }

    /// `Storage.getCookies` — cookies for the browser-level storage partition
    pub async fn storage_get_cookies(self) -> Result<Exchange> {
        self.execute(&CommandEnvelope::new("Storage.getCookies")).await
    }

    /// `Network.getAllCookies` — all cookies visible to a target's network stack
    pub async fn network_get_all_cookies(self) -> Result<Exchange> {
        self.execute(&CommandEnvelope::new("Network.getAllCookies"))
            .await
    }

    /// `Network.clearBrowserCookies` — clear all cookies
    pub async fn clear_browser_cookies(self) -> Result<Exchange> {
        self.execute(&CommandEnvelope::new("Network.clearBrowserCookies"))
            .await
    }

    /// `Network.setCookies` — import an array of cookie-like objects
    pub async fn set_cookies(self, cookies: Value) -> Result<Exchange> {
        self.execute(&CommandEnvelope::with_params(
            "Network.setCookies",
            json!({ "cookies": cookies }),
        ))
        .await
    }
}

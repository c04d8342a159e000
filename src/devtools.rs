//! Debug endpoint discovery
//!
//! Queries the HTTP side of the debug port: `/json` for the list of
//! debuggable targets and `/json/version` for browser-level metadata
//! (including the browser-wide WebSocket debugger URL).

use std::fmt::Write as _;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// One debuggable surface: a tab, an extension, or a worker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub favicon_url: String,
    #[serde(default)]
    pub devtools_frontend_url: String,
    #[serde(default)]
    pub web_socket_debugger_url: String,
}

impl Target {
    /// Case-sensitive substring match over title OR url
    pub fn matches(&self, filter: &str) -> bool {
        self.title.contains(filter) || self.url.contains(filter)
    }
}

/// Browser metadata from `/json/version`. The field names on the wire
/// are the endpoint's own (`Browser`, `Protocol-Version`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowserVersion {
    #[serde(default, rename = "Browser")]
    pub browser: String,
    #[serde(default, rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(default, rename = "User-Agent")]
    pub user_agent: String,
    #[serde(default, rename = "V8-Version")]
    pub v8_version: String,
    #[serde(default, rename = "WebKit-Version")]
    pub webkit_version: String,
    #[serde(default, rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// HTTP client for a browser's debug endpoint
pub struct DevToolsClient {
    http: reqwest::Client,
    base: String,
}

impl DevToolsClient {
    /// Build a client for `http://localhost:<port>`. `deadline` bounds
    /// each request; `None` waits indefinitely.
    pub fn new(port: u16, deadline: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(limit) = deadline {
            builder = builder.timeout(limit);
        }
        Ok(Self {
            http: builder.build()?,
            base: format!("http://localhost:{}", port),
        })
    }

    /// `GET /json` — the list of debuggable targets, in server order
    pub async fn targets(&self) -> Result<Vec<Target>> {
        let body = self.get("/json").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /json/version` — browser-level metadata
    pub async fn version(&self) -> Result<BrowserVersion> {
        let body = self.get("/json/version").await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Pick the first target advertising a WebSocket debugger URL
pub fn first_debugger_url(targets: &[Target]) -> Result<&str> {
    targets
        .iter()
        .map(|t| t.web_socket_debugger_url.as_str())
        .find(|url| !url.is_empty())
        .ok_or_else(|| Error::NoTarget("no target advertises a webSocketDebuggerUrl".into()))
}

/// Render targets as labeled text blocks, one per retained target.
/// A non-empty filter keeps only targets it matches; order is preserved.
pub fn render_targets(targets: &[Target], filter: Option<&str>) -> String {
    let mut out = String::new();
    for target in targets {
        if let Some(f) = filter {
            if !f.is_empty() && !target.matches(f) {
                continue;
            }
        }
        let _ = write!(
            out,
            "Title: {}\nType: {}\nURL: {}\nWebSocket Debugger URL: {}\n\n",
            target.title, target.page_type, target.url, target.web_socket_debugger_url
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGETS_JSON: &str = r#"[
        {
            "description": "",
            "devtoolsFrontendUrl": "/devtools/inspector.html?ws=localhost:9222/devtools/page/A1",
            "faviconUrl": "https://bank.example/favicon.ico",
            "id": "A1",
            "title": "My Bank - Sign In",
            "type": "page",
            "url": "https://bank.example/login",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/A1"
        },
        {
            "description": "",
            "id": "B2",
            "title": "New Tab",
            "type": "page",
            "url": "chrome://newtab/",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/B2"
        }
    ]"#;

    #[test]
    fn test_decode_targets() {
        let targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "A1");
        assert_eq!(targets[0].page_type, "page");
        assert_eq!(
            targets[0].web_socket_debugger_url,
            "ws://localhost:9222/devtools/page/A1"
        );
        // devtoolsFrontendUrl absent on the second entry decodes to empty
        assert!(targets[1].devtools_frontend_url.is_empty());
    }

    #[test]
    fn test_decode_empty_target_list() {
        let targets: Vec<Target> = serde_json::from_str("[]").unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_decode_version() {
        let body = r#"{
            "Browser": "Chrome/120.0.6099.71",
            "Protocol-Version": "1.3",
            "User-Agent": "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
            "V8-Version": "12.0.267.8",
            "WebKit-Version": "537.36 (@8588a8)",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/77b0d21b"
        }"#;
        let version: BrowserVersion = serde_json::from_str(body).unwrap();
        assert_eq!(version.browser, "Chrome/120.0.6099.71");
        assert_eq!(version.protocol_version, "1.3");
        assert_eq!(
            version.web_socket_debugger_url,
            "ws://localhost:9222/devtools/browser/77b0d21b"
        );
    }

    #[test]
    fn test_target_matches_title_or_url() {
        let targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        assert!(targets[0].matches("Bank"));
        assert!(targets[0].matches("bank.example"));
        assert!(!targets[0].matches("BANK.EXAMPLE"));
        assert!(targets[1].matches("newtab"));
        assert!(!targets[1].matches("bank"));
    }

    #[test]
    fn test_render_targets_filtered() {
        // Two targets, filter "bank": only the matching one is printed
        let targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        let out = render_targets(&targets, Some("bank"));
        assert!(out.contains("Title: My Bank - Sign In"));
        assert!(out.contains("URL: https://bank.example/login"));
        assert!(!out.contains("New Tab"));
    }

    #[test]
    fn test_render_targets_unfiltered_block_shape() {
        let targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        let out = render_targets(&targets, None);
        let expected_first = "Title: My Bank - Sign In\n\
                              Type: page\n\
                              URL: https://bank.example/login\n\
                              WebSocket Debugger URL: ws://localhost:9222/devtools/page/A1\n\n";
        assert!(out.starts_with(expected_first));
        assert_eq!(out.matches("Title: ").count(), 2);
    }

    #[test]
    fn test_render_targets_empty_filter_keeps_all() {
        let targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        assert_eq!(
            render_targets(&targets, Some("")),
            render_targets(&targets, None)
        );
    }

    #[test]
    fn test_first_debugger_url() {
        let mut targets: Vec<Target> = serde_json::from_str(TARGETS_JSON).unwrap();
        assert_eq!(
            first_debugger_url(&targets).unwrap(),
            "ws://localhost:9222/devtools/page/A1"
        );

        targets[0].web_socket_debugger_url.clear();
        assert_eq!(
            first_debugger_url(&targets).unwrap(),
            "ws://localhost:9222/devtools/page/B2"
        );

        assert!(matches!(
            first_debugger_url(&[]).unwrap_err(),
            Error::NoTarget(_)
        ));
    }
}

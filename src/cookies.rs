//! Cookie output transformations
//!
//! Shapes a decoded cookie list for emission: raw passthrough, labeled
//! human-readable blocks, or the reduced re-import projection with a
//! rewritten far-future expiry.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::cdp::Cookie;
use crate::error::Result;

/// Expiry offset applied to re-import projections: ten years, in seconds
pub const FAR_FUTURE_OFFSET_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Requested output projection for cookie dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Verbatim response bytes from the browser. Bypasses the cookie
    /// model entirely, including the substring filter: what the server
    /// sent is what gets emitted.
    Raw,
    /// Labeled plain-text blocks, one per cookie
    #[default]
    Human,
    /// JSON array of reduced cookies with a rewritten expiration,
    /// suitable for importing into another profile
    Modified,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "human" => Ok(Self::Human),
            "modified" => Ok(Self::Modified),
            other => Err(format!(
                "unknown format '{}' (expected raw, human, or modified)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Human => "human",
            Self::Modified => "modified",
        };
        f.write_str(name)
    }
}

/// Reduced cookie projection for cross-profile import.
///
/// Keeps just the fields a `Network.setCookies` import needs and
/// rewrites the expiry so the imported copy doesn't lapse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: f64,
}

impl LightCookie {
    /// Project a full cookie record, stamping `now + 10 years`
    pub fn from_cookie(cookie: &Cookie, now_epoch_secs: u64) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            expiration_date: (now_epoch_secs + FAR_FUTURE_OFFSET_SECS) as f64,
        }
    }
}

/// Seconds since the Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn matches(cookie: &Cookie, filter: &str) -> bool {
    cookie.name.contains(filter) || cookie.domain.contains(filter)
}

/// Keep cookies whose name OR domain contains the filter substring
/// (case-sensitive). An absent or empty filter keeps everything.
pub fn apply_filter(mut cookies: Vec<Cookie>, filter: Option<&str>) -> Vec<Cookie> {
    if let Some(f) = filter {
        if !f.is_empty() {
            cookies.retain(|c| matches(c, f));
        }
    }
    cookies
}

/// Render every field of every cookie as labeled lines, one block per
/// cookie, fields in fixed order. An empty list renders as nothing.
pub fn render_human(cookies: &[Cookie]) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for c in cookies {
        let _ = write!(
            out,
            "name: {}\nvalue: {}\ndomain: {}\npath: {}\nexpires: {:.6}\nsize: {}\n\
             httpOnly: {}\nsecure: {}\nsession: {}\nsameSite: {}\npriority: {}\n\n",
            c.name,
            c.value,
            c.domain,
            c.path,
            c.expires,
            c.size,
            c.http_only,
            c.secure,
            c.session,
            c.same_site.as_deref().unwrap_or(""),
            c.priority.as_deref().unwrap_or(""),
        );
    }
    out
}

/// Render the reduced re-import projection as a single-line JSON array
pub fn render_modified(cookies: &[Cookie], now_epoch_secs: u64) -> Result<String> {
    let light: Vec<LightCookie> = cookies
        .iter()
        .map(|c| LightCookie::from_cookie(c, now_epoch_secs))
        .collect();
    Ok(serde_json::to_string(&light)?)
}

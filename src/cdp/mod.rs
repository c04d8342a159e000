//! Debug-channel protocol layer
//!
//! Everything that touches the WebSocket side of the debug port:
//! - wire types for the command/response envelopes and cookie records
//! - the transport (handshake + text-frame codec)
//! - the one-shot command session

pub mod session;
pub mod transport;
pub mod types;

pub use session::{CdpSession, Exchange};
pub use types::{CommandEnvelope, Cookie, CookieListResult, ResponseEnvelope, REQUEST_ID};

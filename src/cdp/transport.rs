//! WebSocket transport for the debug channel
//!
//! Dials a target's debugger URL and speaks just enough RFC 6455 for a
//! single text-frame exchange: client handshake, masked writes, and a
//! frame reader that answers pings. There is no reader task and no
//! pending-request table; one connection carries one command.

use base64::Engine;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::{Error, Result};

/// Reject inbound payloads above this size instead of buffering them.
const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// WebSocket opcodes
mod ws {
    pub const OPCODE_TEXT: u8 = 0x1;
    pub const OPCODE_CLOSE: u8 = 0x8;
    pub const OPCODE_PING: u8 = 0x9;
    pub const OPCODE_PONG: u8 = 0xA;
}

/// Encode a single client frame (FIN set, payload masked per RFC 6455)
pub(crate) fn encode_frame(opcode: u8, data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let mut frame = Vec::with_capacity(14 + len);

    frame.push(0x80 | opcode);

    // Mask bit set (client must mask), then length
    if len < 126 {
        frame.push(0x80 | len as u8);
    } else if len < 65536 {
        frame.push(0x80 | 126);
        frame.push((len >> 8) as u8);
        frame.push(len as u8);
    } else {
        frame.push(0x80 | 127);
        for i in (0..8).rev() {
            frame.push((len >> (i * 8)) as u8);
        }
    }

    // Random masking key per frame
    let mask: [u8; 4] = rand::random();
    frame.extend_from_slice(&mask);

    for (i, byte) in data.iter().enumerate() {
        frame.push(byte ^ mask[i % 4]);
    }

    frame
}

/// Read one WebSocket frame, returns (opcode, payload)
pub(crate) async fn read_frame<R>(reader: &mut R) -> Result<(u8, Vec<u8>)>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 2];
    reader
        .read_exact(&mut header)
        .await
        .map_err(|e| Error::transport_io("WebSocket read failed", e))?;

    let opcode = header[0] & 0x0F;
    let masked = (header[1] & 0x80) != 0;
    let mut len = (header[1] & 0x7F) as usize;

    if len == 126 {
        let mut ext = [0u8; 2];
        reader
            .read_exact(&mut ext)
            .await
            .map_err(|e| Error::transport_io("WebSocket read failed", e))?;
        len = ((ext[0] as usize) << 8) | (ext[1] as usize);
    } else if len == 127 {
        let mut ext = [0u8; 8];
        reader
            .read_exact(&mut ext)
            .await
            .map_err(|e| Error::transport_io("WebSocket read failed", e))?;
        len = 0;
        for byte in ext.iter() {
            len = (len << 8) | (*byte as usize);
        }
    }

    if len > MAX_FRAME_LEN {
        return Err(Error::Decode(format!(
            "frame payload of {} bytes exceeds the {} byte limit",
            len, MAX_FRAME_LEN
        )));
    }

    let mask = if masked {
        let mut m = [0u8; 4];
        reader
            .read_exact(&mut m)
            .await
            .map_err(|e| Error::transport_io("WebSocket read failed", e))?;
        Some(m)
    } else {
        None
    };

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| Error::transport_io("WebSocket read failed", e))?;

    if let Some(mask) = mask {
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte ^= mask[i % 4];
        }
    }

    Ok((opcode, payload))
}

/// A connected debug-channel WebSocket
#[derive(Debug)]
pub struct WsTransport {
    stream: BufReader<TcpStream>,
}

impl WsTransport {
    /// Dial a `ws://` debugger URL and complete the client handshake
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let url = ws_url
            .strip_prefix("ws://")
            .ok_or_else(|| Error::transport(format!("unsupported WebSocket URL: {}", ws_url)))?;
        let (host_port, path) = match url.split_once('/') {
            Some((host, rest)) => (host, format!("/{}", rest)),
            None => (url, "/".to_string()),
        };

        let stream = TcpStream::connect(host_port)
            .await
            .map_err(|e| Error::transport_io("Failed to connect to debug WebSocket", e))?;
        let mut stream = BufReader::new(stream);

        let key =
            base64::engine::general_purpose::STANDARD.encode(rand::random::<[u8; 16]>());

        // The browser rejects upgrade requests from disallowed origins;
        // a localhost origin is always accepted.
        let handshake = format!(
            "GET {} HTTP/1.1\r\n\
             Host: {}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: {}\r\n\
             Sec-WebSocket-Version: 13\r\n\
             Origin: http://localhost/\r\n\
             \r\n",
            path, host_port, key
        );

        stream
            .get_mut()
            .write_all(handshake.as_bytes())
            .await
            .map_err(|e| Error::transport_io("Handshake write failed", e))?;

        let mut status_line = String::new();
        stream
            .read_line(&mut status_line)
            .await
            .map_err(|e| Error::transport_io("Handshake read failed", e))?;
        if !status_line.contains("101") {
            return Err(Error::transport(format!(
                "WebSocket handshake failed: {}",
                status_line.trim()
            )));
        }

        // Drain the remaining handshake headers up to the blank line
        loop {
            let mut header = String::new();
            let n = stream
                .read_line(&mut header)
                .await
                .map_err(|e| Error::transport_io("Handshake read failed", e))?;
            if n == 0 {
                return Err(Error::transport("connection closed during handshake"));
            }
            if header == "\r\n" || header == "\n" {
                break;
            }
        }

        tracing::debug!("WebSocket connected to {}", ws_url);

        Ok(Self { stream })
    }

    /// Send one text frame
    pub async fn send_text(&mut self, data: &[u8]) -> Result<()> {
        let frame = encode_frame(ws::OPCODE_TEXT, data);
        let stream = self.stream.get_mut();
        stream
            .write_all(&frame)
            .await
            .map_err(|e| Error::transport_io("WebSocket write failed", e))?;
        stream
            .flush()
            .await
            .map_err(|e| Error::transport_io("WebSocket write failed", e))?;
        Ok(())
    }

    /// Read frames until a text frame arrives, answering pings along the way
    pub async fn read_text(&mut self) -> Result<Vec<u8>> {
        loop {
            let (opcode, payload) = read_frame(&mut self.stream).await?;
            match opcode {
                ws::OPCODE_TEXT => return Ok(payload),
                ws::OPCODE_PING => {
                    let pong = encode_frame(ws::OPCODE_PONG, &payload);
                    let _ = self.stream.get_mut().write_all(&pong).await;
                }
                ws::OPCODE_CLOSE => {
                    return Err(Error::transport(
                        "WebSocket closed before a response arrived",
                    ));
                }
                _ => {}
            }
        }
    }

    /// Send a close frame, best effort; the peer's reply is not awaited
    pub async fn close(&mut self) {
        let frame = encode_frame(ws::OPCODE_CLOSE, &[]);
        let _ = self.stream.get_mut().write_all(&frame).await;
        let _ = self.stream.get_mut().flush().await;
    }
}

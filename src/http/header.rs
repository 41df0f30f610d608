//! Header rewriting for the origin request.
//!
//! Client headers are kept as raw lines, not parsed into a map: every line
//! that is not suppressed goes out byte for byte and in the same order.

use std::io;

use tokio::io::AsyncRead;

use crate::http::target::Target;
use crate::net::reader::LineReader;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3";

const HOST_KEY: &[u8] = b"Host";

/// Replaced by the fixed proxy headers below.
const SUPPRESSED_KEYS: [&[u8]; 3] = [b"Connection", b"Proxy-Connection", b"User-Agent"];

const CONNECTION_CLOSE: &[u8] = b"Connection: close\r\n";
const PROXY_CONNECTION_CLOSE: &[u8] = b"Proxy-Connection: close\r\n";
const CRLF: &[u8] = b"\r\n";

fn starts_with_ignore_case(line: &[u8], key: &[u8]) -> bool {
    line.len() >= key.len() && line[..key.len()].eq_ignore_ascii_case(key)
}

/// `\r\n` or a bare `\n`.
pub fn is_blank_line(line: &[u8]) -> bool {
    line == CRLF || line == b"\n"
}

fn terminated(mut line: Vec<u8>) -> Vec<u8> {
    if !line.ends_with(b"\n") {
        line.extend_from_slice(CRLF);
    }
    line
}

/// Collects client header lines.
#[derive(Debug, Default)]
pub struct HeaderRewriter {
    host: Option<Vec<u8>>,
    passthrough: Vec<Vec<u8>>,
}

impl HeaderRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one raw header line, terminator included.
    pub fn push_line(&mut self, line: Vec<u8>) {
        if starts_with_ignore_case(&line, HOST_KEY) {
            // Last one wins.
            self.host = Some(terminated(line));
        } else if !SUPPRESSED_KEYS
            .iter()
            .any(|key| starts_with_ignore_case(&line, key))
        {
            // An unterminated last line must not swallow the blank line.
            self.passthrough.push(terminated(line));
        }
    }

    /// Assemble the request sent to `target`.
    pub fn finish(self, target: &Target) -> OutboundRequest {
        let host_line = self
            .host
            .unwrap_or_else(|| format!("Host: {}\r\n", target.hostname).into_bytes());

        OutboundRequest {
            request_line: format!("GET {} HTTP/1.0\r\n", target.path),
            host_line,
            passthrough: self.passthrough,
        }
    }
}

/// Read client header lines up to and including the blank line.
///
/// EOF also ends the block so a truncated request cannot hang the
/// transaction; the reader's timeout bounds a silent peer. Lines longer
/// than the reader's cap are dropped whole, never forwarded in pieces.
pub async fn drain_headers<R>(reader: &mut LineReader<R>) -> io::Result<HeaderRewriter>
where
    R: AsyncRead + Unpin,
{
    let mut rewriter = HeaderRewriter::new();
    loop {
        let mut line = Vec::new();
        if reader.read_line(&mut line).await? == 0 || is_blank_line(&line) {
            return Ok(rewriter);
        }
        if reader.is_partial(&line) {
            let skipped = reader.skip_rest_of_line().await?;
            tracing::debug!(
                bytes = line.len() + skipped,
                "Dropped over-long header line"
            );
            continue;
        }
        rewriter.push_line(line);
    }
}

/// The complete request written to the origin in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    request_line: String,
    host_line: Vec<u8>,
    passthrough: Vec<Vec<u8>>,
}

impl OutboundRequest {
    pub fn request_line(&self) -> &str {
        &self.request_line
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let user_agent = format!("User-Agent: {}\r\n", USER_AGENT);
        let mut out = Vec::with_capacity(
            self.request_line.len()
                + self.host_line.len()
                + CONNECTION_CLOSE.len()
                + PROXY_CONNECTION_CLOSE.len()
                + user_agent.len()
                + self.passthrough.iter().map(Vec::len).sum::<usize>()
                + CRLF.len(),
        );
        out.extend_from_slice(self.request_line.as_bytes());
        out.extend_from_slice(&self.host_line);
        out.extend_from_slice(CONNECTION_CLOSE);
        out.extend_from_slice(PROXY_CONNECTION_CLOSE);
        out.extend_from_slice(user_agent.as_bytes());
        for line in &self.passthrough {
            out.extend_from_slice(line);
        }
        out.extend_from_slice(CRLF);
        out
    }
}

//! Buffered line reader shared by the client and origin sides.
//!
//! A "line" is everything up to and including `\n`. Lines longer than
//! `max_len` are handed out in `max_len` sized chunks, so a peer that
//! never sends a newline cannot grow the buffer without bound.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub struct LineReader<R> {
    inner: BufReader<R>,
    max_len: usize,
    timeout: Option<Duration>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R, max_len: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_len: max_len.max(1),
            timeout: None,
        }
    }

    /// Fail reads that take longer than `timeout` with `TimedOut`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append the next line (or chunk) to `buf`.
    ///
    /// Returns the number of bytes appended; 0 means EOF.
    pub async fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_line_inner(buf))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "line read timed out"))?,
            None => self.read_line_inner(buf).await,
        }
    }

    /// True when `chunk` stopped at the length cap rather than a newline.
    pub fn is_partial(&self, chunk: &[u8]) -> bool {
        chunk.len() >= self.max_len && !chunk.ends_with(b"\n")
    }

    /// Discard the remainder of an over-long line, newline included.
    ///
    /// Returns the number of bytes dropped.
    pub async fn skip_rest_of_line(&mut self) -> io::Result<usize> {
        let mut skipped = 0;
        let mut chunk = Vec::new();
        loop {
            chunk.clear();
            let n = self.read_line(&mut chunk).await?;
            skipped += n;
            if n == 0 || !self.is_partial(&chunk) {
                return Ok(skipped);
            }
        }
    }

    async fn read_line_inner(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let mut taken = 0;
        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                return Ok(taken);
            }

            let room = self.max_len - taken;
            let window = &available[..available.len().min(room)];
            let (used, done) = match window.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (window.len(), window.len() == room),
            };

            buf.extend_from_slice(&window[..used]);
            self.inner.consume(used);
            taken += used;

            if done {
                return Ok(taken);
            }
        }
    }
}

//! Request URI decomposition.
//!
//! Accepts absolute-form (`http://host:port/path`), protocol-relative
//! (`//host/path`) and bare (`host:port/path`, `host`) targets. IPv6
//! literals are not recognised.

use std::fmt;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("empty URI")]
    Empty,

    #[error("no hostname in {0:?}")]
    MissingHost(String),

    #[error("bad port in {0:?}")]
    BadPort(String),
}

/// Where a request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    /// Always starts with `/`.
    pub path: String,
}

impl Target {
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        if uri.is_empty() {
            return Err(UriError::Empty);
        }

        let rest = match uri.find("//") {
            Some(i) => &uri[i + 2..],
            None => uri,
        };

        let slash = rest.find('/');
        let (hostname, port, path) = match rest.find(':') {
            Some(colon) if slash.map_or(true, |s| colon < s) => {
                let after = &rest[colon + 1..];
                let digits = after.bytes().take_while(u8::is_ascii_digit).count();
                let port = if digits == 0 {
                    DEFAULT_PORT
                } else {
                    after[..digits]
                        .parse::<u16>()
                        .ok()
                        .filter(|p| *p != 0)
                        .ok_or_else(|| UriError::BadPort(uri.to_string()))?
                };
                let path = &after[digits..];
                if !path.is_empty() && !path.starts_with('/') {
                    return Err(UriError::BadPort(uri.to_string()));
                }
                (&rest[..colon], port, path)
            }
            _ => match slash {
                Some(s) => (&rest[..s], DEFAULT_PORT, &rest[s..]),
                None => (rest, DEFAULT_PORT, ""),
            },
        };

        if hostname.is_empty() {
            return Err(UriError::MissingHost(uri.to_string()));
        }

        Ok(Self {
            hostname: hostname.to_string(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

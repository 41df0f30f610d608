//! Client request line.

use crate::http::error::RelayError;

/// `<method> <uri> <version>` as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    /// Absent on HTTP/0.9 style lines.
    pub version: Option<String>,
}

impl RequestLine {
    /// Parse a request line, accepting only GET (any case).
    pub fn parse(line: &str) -> Result<Self, RelayError> {
        let mut parts = line.split_ascii_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| RelayError::MalformedRequestLine(line.trim_end().to_string()))?;

        if !method.eq_ignore_ascii_case("GET") {
            return Err(RelayError::UnsupportedMethod(method.to_string()));
        }

        let uri = parts
            .next()
            .ok_or_else(|| RelayError::MalformedRequestLine(line.trim_end().to_string()))?;

        Ok(Self {
            method: method.to_string(),
            uri: uri.to_string(),
            version: parts.next().map(str::to_string),
        })
    }
}

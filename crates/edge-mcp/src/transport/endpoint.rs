//! WebSocket endpoint parsing.

use std::fmt;

use url::Url;

use crate::types::{McpError, McpResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Ws => 80,
            Scheme::Wss => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }
}

/// A parsed `ws://` or `wss://` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Request path, including any query string.
    pub path: String,
}

impl Endpoint {
    /// Parse `scheme://host[:port][/path]`; ports default to 80/443 and the path to `/`.
    pub fn parse(raw: &str) -> McpResult<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| McpError::InvalidEndpoint(format!("{raw}: {e}")))?;

        let scheme = match url.scheme() {
            "ws" => Scheme::Ws,
            "wss" => Scheme::Wss,
            other => {
                return Err(McpError::InvalidEndpoint(format!(
                    "{raw}: unsupported scheme \"{other}\", expected ws or wss"
                )))
            }
        };

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| McpError::InvalidEndpoint(format!("{raw}: missing host")))?
            .to_string();

        let port = url.port().unwrap_or_else(|| scheme.default_port());

        let mut path = match url.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == Scheme::Wss
    }

    /// Full URL with an explicit port.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ws = Endpoint::parse("ws://example.com").unwrap();
        assert_eq!(ws.scheme, Scheme::Ws);
        assert_eq!(ws.host, "example.com");
        assert_eq!(ws.port, 80);
        assert_eq!(ws.path, "/");

        let wss = Endpoint::parse("wss://example.com").unwrap();
        assert_eq!(wss.port, 443);
        assert!(wss.is_secure());
    }

    #[test]
    fn test_explicit_port_and_path() {
        let ep = Endpoint::parse("ws://192.168.1.10:8080/mcp/device").unwrap();
        assert_eq!(ep.host, "192.168.1.10");
        assert_eq!(ep.port, 8080);
        assert_eq!(ep.path, "/mcp/device");
        assert_eq!(ep.url(), "ws://192.168.1.10:8080/mcp/device");
    }

    #[test]
    fn test_query_kept_in_path() {
        let ep = Endpoint::parse("wss://api.example.com/mcp/?token=abc").unwrap();
        assert_eq!(ep.path, "/mcp/?token=abc");
        assert_eq!(ep.url(), "wss://api.example.com:443/mcp/?token=abc");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Endpoint::parse("").is_err());
        assert!(Endpoint::parse("example.com/mcp").is_err());
        assert!(matches!(
            Endpoint::parse("http://example.com"),
            Err(McpError::InvalidEndpoint(_))
        ));
        assert!(Endpoint::parse("ws://:80/x").is_err());
    }
}

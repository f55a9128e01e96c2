//! A minimal view of the HTTP upgrade request this crate needs.

use std::collections::HashMap;

/// The request line plus a lowercased header map of an HTTP/1.1 message.
///
/// ### Example
///
/// ```rust
/// let req = "GET /chat HTTP/1.1\r\nHost: example.com\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n";
/// let http = ws_wire::http::Http::parse(req).unwrap();
///
/// assert_eq!(http.prefix, "GET /chat HTTP/1.1");
/// assert!(http.is_upgrade());
/// assert_eq!(http.sec_ws_key(), Some("dGhlIHNhbXBsZSBub25jZQ=="));
/// ```
#[derive(Debug, Clone)]
pub struct Http {
    /// First line of the message (e.g. `GET /chat HTTP/1.1`)
    pub prefix: String,
    /// Header key-value pairs, keys lowercased.
    pub headers: HashMap<String, String>,
}

impl std::ops::Deref for Http {
    type Target = HashMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.headers
    }
}

impl Http {
    /// Build directly from already-parsed headers, for collaborators that
    /// bring their own HTTP layer.
    pub fn from_headers<K, V>(headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            prefix: String::new(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Determine if this request asks for an upgrade to the WebSocket protocol.
    pub fn is_upgrade(&self) -> bool {
        let upgrade = self
            .get("upgrade")
            .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
        let connection = self
            .get("connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("upgrade"));
        upgrade && connection
    }

    /// The `sec-websocket-key` header value, if present and non-empty.
    pub fn sec_ws_key(&self) -> Option<&str> {
        self.get("sec-websocket-key")
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    ///
    pub fn parse(string: &str) -> Option<Self> {
        let mut lines = string.lines();
        let prefix = lines.next()?.to_owned();
        let mut headers = HashMap::default();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let (key, value) = line.split_once(": ")?;
            headers.insert(key.to_ascii_lowercase(), value.into());
        }
        Some(Self { prefix, headers })
    }
}

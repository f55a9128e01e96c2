//! Server side of the RFC 6455 opening handshake.

use crate::{http::Http, HandshakeError};
use sha1::{Digest, Sha1};
use tokio::io::{AsyncWrite, AsyncWriteExt};

const MAGIC_STRING: &[u8; 36] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// ### Example
///
/// ```rust
/// use ws_wire::handshake::accept_key_from;
/// assert_eq!(accept_key_from("dGhlIHNhbXBsZSBub25jZQ=="), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
/// ```
pub fn accept_key_from(sec_ws_key: impl AsRef<[u8]>) -> String {
    let mut sha1 = Sha1::new();
    sha1.update(sec_ws_key.as_ref());
    sha1.update(MAGIC_STRING);
    base64::encode(sha1.finalize())
}

/// The complete `101 Switching Protocols` response for `sec_ws_key`.
///
/// ### Example
///
/// ```rust
/// let res = [
///     "HTTP/1.1 101 Switching Protocols",
///     "Upgrade: websocket",
///     "Connection: Upgrade",
///     "Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=",
///     "",
///     ""
/// ];
/// assert_eq!(ws_wire::handshake::response("dGhlIHNhbXBsZSBub25jZQ=="), res.join("\r\n"));
/// ```
pub fn response(sec_ws_key: impl AsRef<str>) -> String {
    let key = accept_key_from(sec_ws_key.as_ref());
    format!("HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Accept: {key}\r\n\r\n")
}

/// Validate `request` and write the `101 Switching Protocols` response to
/// `sink`. Succeeds only once the full response has been written.
pub async fn accept<W>(request: &Http, sink: &mut W) -> Result<(), HandshakeError>
where
    W: AsyncWrite + Unpin,
{
    let key = request.sec_ws_key().ok_or(HandshakeError::MissingKey)?;
    sink.write_all(response(key).as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc6455_vector() {
        assert_eq!(
            accept_key_from("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[tokio::test]
    async fn empty_key_is_missing() {
        let http = Http::from_headers([("Sec-WebSocket-Key", "")]);
        let mut sink = Vec::new();
        let err = accept(&http, &mut sink).await.unwrap_err();
        assert!(matches!(err, HandshakeError::MissingKey));
        assert!(sink.is_empty());
    }
}

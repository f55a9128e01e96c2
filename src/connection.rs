use crate::{
    frame::{Frame, OP_TEXT},
    handshake,
    http::Http,
    Error,
};
use rand::{rngs::OsRng, RngCore};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Which end of the connection this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

/// Connection lifecycle state.
///
/// Only `Connecting -> Open` (successful handshake) and `Open -> Closed`
/// (terminal decode error) are reachable today; `Closing` and a close
/// handshake are future transitions. Closure of the underlying socket is not
/// visible to this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// One WebSocket connection over an externally-owned byte stream.
///
/// The caller drives it: feed each inbound chunk to [`recv_chunk`], which
/// fires `on_message` for every complete unfragmented text frame. A chunk is
/// assumed to hold exactly one frame; reassembly across partial reads is not
/// performed.
///
/// ### Example
///
/// ```no_run
/// use ws_wire::{http::Http, Connection};
/// # async fn example(request: &Http, socket: tokio::net::TcpStream) -> Result<(), ws_wire::Error> {
/// let mut ws = Connection::accept(request, socket).await?;
/// ws.on_message = Box::new(|text| println!("{text}"));
/// ws.send("hi there").await?;
/// # Ok(()) }
/// ```
///
/// [`recv_chunk`]: Connection::recv_chunk
pub struct Connection<W> {
    /// The write half of the underlying byte stream.
    pub transport: W,

    /// Fired once per complete, unfragmented text frame.
    pub on_message: Box<dyn FnMut(&str) + Send + Sync>,

    role: Role,
    state: ReadyState,
}

impl<W: std::fmt::Debug> std::fmt::Debug for Connection<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("transport", &self.transport)
            .field("role", &self.role)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<W: AsyncWrite + Unpin> Connection<W> {
    /// Accept an upgrade request: run the opening handshake against
    /// `request`, writing the response to `transport`.
    ///
    /// On failure no connection is returned and the caller keeps
    /// responsibility for the socket.
    pub async fn accept(request: &Http, mut transport: W) -> Result<Self, Error> {
        handshake::accept(request, &mut transport).await?;
        debug!("handshake accepted");
        Ok(Self {
            transport,
            on_message: Box::new(|_| {}),
            role: Role::Server,
            state: ReadyState::Open,
        })
    }

    /// Connect to a remote server. Client-initiated connections are out of
    /// scope; this always fails with [`Error::Unimplemented`].
    pub async fn connect(url: impl AsRef<str>) -> Result<Self, Error> {
        let _ = url.as_ref();
        Err(Error::Unimplemented("client connect"))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> ReadyState {
        self.state
    }

    /// Process one inbound chunk from the transport.
    ///
    /// Unsupported frames (any opcode but text, or `fin == false`) are
    /// dropped. A malformed frame is terminal: the connection moves to
    /// `Closed` and every later call fails with [`Error::NotOpen`].
    pub fn recv_chunk(&mut self, chunk: &[u8]) -> Result<(), Error> {
        if self.state != ReadyState::Open {
            return Err(Error::NotOpen);
        }
        let frame = match Frame::decode(chunk) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "malformed frame, closing connection");
                self.state = ReadyState::Closed;
                return Err(err.into());
            }
        };
        if frame.opcode == OP_TEXT && frame.fin {
            let text = String::from_utf8_lossy(&frame.payload);
            (self.on_message)(&text);
        } else {
            debug!(opcode = frame.opcode, fin = frame.fin, "dropping unsupported frame");
        }
        Ok(())
    }

    /// Send `text` as a single unfragmented text frame, masked iff this is
    /// the client end. Returns `true` when the transport reports a complete
    /// flush; writes are unbuffered, so a successful send always flushed.
    pub async fn send(&mut self, text: &str) -> Result<bool, Error> {
        if self.state != ReadyState::Open {
            return Err(Error::NotOpen);
        }
        let frame = Frame {
            fin: true,
            opcode: OP_TEXT,
            masking_key: match self.role {
                Role::Server => None,
                Role::Client => Some(generate_mask()),
            },
            payload: text.as_bytes().to_vec(),
        };
        self.transport.write_all(&frame.encode()).await?;
        self.transport.flush().await?;
        Ok(true)
    }
}

/// A fresh unpredictable masking key, one per masked frame.
fn generate_mask() -> [u8; 4] {
    let mut key = [0; 4];
    OsRng.fill_bytes(&mut key);
    key
}

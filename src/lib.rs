//! WebSocket wire protocol core: RFC 6455 base framing and the server-side
//! opening handshake.
//!
//! The HTTP server, socket ownership, and read loop live with the caller; it
//! hands in an upgrade request plus a write handle, then feeds inbound chunks
//! to [`Connection::recv_chunk`].
//!
//! Out of scope: fragmentation, control frames (ping/pong/close), and
//! extensions. Client-initiated connections are a stub that always fails.

mod connection;
mod errors;

pub mod frame;
pub mod handshake;
pub mod http;

pub use connection::{Connection, ReadyState, Role};
pub use errors::{Error, FrameError, HandshakeError};
pub use frame::Frame;

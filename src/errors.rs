use thiserror::Error;

/// Failures of the server-side opening handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The upgrade request carried no (or an empty) `Sec-WebSocket-Key` header.
    #[error("missing `Sec-WebSocket-Key` header")]
    MissingKey,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures of [`Frame::decode`](crate::Frame::decode).
///
/// Encoding a valid [`Frame`](crate::Frame) cannot fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer ends before the bytes its own header promises.
    #[error("incomplete frame: need {needed} bytes, have {have}")]
    IncompleteFrame { needed: usize, have: usize },
    /// A 64-bit payload length above 2^63-1, or one that does not fit `usize`.
    #[error("payload length out of range")]
    InvalidLength,
}

/// Connection-level error, unifying the layers below it.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Handshake(#[from] HandshakeError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The operation is a stub (client-initiated connections).
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
    /// The connection is not (or no longer) in the `Open` state.
    #[error("connection is not open")]
    NotOpen,
}

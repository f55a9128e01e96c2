use std::sync::{Arc, Mutex};
use ws_wire::{http::Http, Connection, Error, Frame, FrameError, HandshakeError, ReadyState};

const UPGRADE_REQ: &str = "GET /chat HTTP/1.1\r\n\
    Host: example.com\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
    Sec-WebSocket-Version: 13\r\n\r\n";

const SWITCHING_PROTOCOLS: &[u8] = b"HTTP/1.1 101 Switching Protocols\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n";

async fn accept() -> Connection<Vec<u8>> {
    let request = Http::parse(UPGRADE_REQ).unwrap();
    Connection::accept(&request, Vec::new()).await.unwrap()
}

#[tokio::test]
async fn handshake_writes_switching_protocols() {
    let ws = accept().await;
    assert_eq!(ws.state(), ReadyState::Open);
    assert_eq!(ws.transport, SWITCHING_PROTOCOLS);
}

#[tokio::test]
async fn handshake_requires_sec_websocket_key() {
    let request = Http::parse("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
    let err = Connection::accept(&request, Vec::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Handshake(HandshakeError::MissingKey)
    ));
}

#[tokio::test]
async fn server_sends_unmasked_text_frame() {
    let mut ws = accept().await;
    ws.transport.clear();
    let flushed = ws.send("Hello").await.unwrap();
    assert!(flushed);
    assert_eq!(ws.transport, [0x81, 0x05, 0x48, 0x65, 0x6c, 0x6c, 0x6f]);
}

#[tokio::test]
async fn text_frame_raises_message_event() {
    let mut ws = accept().await;
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    ws.on_message = Box::new(move |text| sink.lock().unwrap().push(text.to_owned()));

    // masked, as a client would send it
    let chunk = Frame {
        masking_key: Some([0x37, 0xfa, 0x21, 0x3d]),
        ..Frame::text(&b"hello"[..])
    }
    .encode();
    ws.recv_chunk(&chunk).unwrap();

    // and the raw unmasked wire bytes
    ws.recv_chunk(&[0x81, 0x05, 0x68, 0x65, 0x6c, 0x6c, 0x6f])
        .unwrap();

    assert_eq!(*messages.lock().unwrap(), ["hello", "hello"]);
}

#[tokio::test]
async fn binary_and_fragment_frames_are_dropped() {
    let mut ws = accept().await;
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    ws.on_message = Box::new(move |text| sink.lock().unwrap().push(text.to_owned()));

    let binary = Frame {
        opcode: ws_wire::frame::OP_BINARY,
        ..Frame::text(&b"blob"[..])
    };
    let fragment = Frame {
        fin: false,
        ..Frame::text(&b"partial"[..])
    };
    ws.recv_chunk(&binary.encode()).unwrap();
    ws.recv_chunk(&fragment.encode()).unwrap();

    assert!(messages.lock().unwrap().is_empty());
    assert_eq!(ws.state(), ReadyState::Open);
}

#[tokio::test]
async fn malformed_frame_closes_the_connection() {
    let mut ws = accept().await;
    let err = ws.recv_chunk(&[0x81, 0x05, 0x48]).unwrap_err();
    assert!(matches!(
        err,
        Error::Frame(FrameError::IncompleteFrame { .. })
    ));
    assert_eq!(ws.state(), ReadyState::Closed);

    // everything past the malformed frame is refused
    assert!(matches!(ws.recv_chunk(&[]), Err(Error::NotOpen)));
    assert!(matches!(ws.send("late").await, Err(Error::NotOpen)));
}

#[tokio::test]
async fn client_connect_is_unimplemented() {
    let err = Connection::<Vec<u8>>::connect("ws://example.com/chat")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unimplemented(_)));
}

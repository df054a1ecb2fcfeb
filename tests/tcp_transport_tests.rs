use connect_four::transport::tcp::TcpTransport;
use connect_four::transport::Transport;
use connect_four::{encode_frame, Message, Role, Session, StatusToken, Vote, PROTOCOL_VERSION};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

#[tokio::test(flavor = "multi_thread")]
async fn test_roundtrip_over_localhost() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut transport = TcpTransport::new(stream);
        let msg = transport.recv().await.unwrap();
        assert_eq!(msg, Message::Move { turn: 1, column: 5 });
        transport
            .send(Message::Status(StatusToken::Draw))
            .await
            .unwrap();
        transport.send(Message::RematchVote(Vote::Yes)).await.unwrap();
    });

    let mut client = TcpTransport::connect(addr).await?;
    assert_eq!(client.peer_addr()?, addr);
    client.send(Message::Move { turn: 1, column: 5 }).await?;
    assert_eq!(client.recv().await?, Message::Status(StatusToken::Draw));
    assert_eq!(client.recv().await?, Message::RematchVote(Vote::Yes));

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_frames_split_across_writes() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let frame = encode_frame(&Message::Move { turn: 7, column: 9 }).unwrap();
        for byte in frame {
            socket.write_all(&[byte]).await.unwrap();
            socket.flush().await.unwrap();
            sleep(Duration::from_millis(2)).await;
        }
    });

    let mut client = TcpTransport::connect(addr).await?;
    assert_eq!(client.recv().await?, Message::Move { turn: 7, column: 9 });
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_length_prefix() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        socket.flush().await.unwrap();
        sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"));

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_length_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0u8, 0, 0, 0]).await.unwrap();
        socket.flush().await.unwrap();
        sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    assert!(transport.recv().await.is_err());

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_garbage_payload() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let payload = [0xABu8; 8];
        socket
            .write_all(&(payload.len() as u32).to_be_bytes())
            .await
            .unwrap();
        socket.write_all(&payload).await.unwrap();
        socket.flush().await.unwrap();
        sleep(Duration::from_millis(100)).await;
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("deserialization"));

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_truncated_frame_then_close() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&100u32.to_be_bytes()).await.unwrap();
        socket.write_all(&[0u8; 10]).await.unwrap();
        socket.flush().await.unwrap();
    });

    let mut transport = TcpTransport::connect(addr).await?;
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed"));

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_timeout() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        sleep(Duration::from_millis(300)).await;
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut transport =
        TcpTransport::with_timeouts(stream, Some(Duration::from_millis(50)), Duration::from_secs(1));
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("timeout"));

    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_is_seen_by_peer() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        // EOF once the client shuts down its write half
        socket.read_to_end(&mut buf).await.unwrap();
        buf.len()
    });

    let mut client = TcpTransport::connect(addr).await?;
    client.send(Message::Status(StatusToken::Playing)).await?;
    client.close().await?;

    let expected = encode_frame(&Message::Status(StatusToken::Playing))?.len();
    assert_eq!(server.await?, expected);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_handshake_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut responder = Session::new(Role::Responder, Box::new(TcpTransport::new(stream)));
        responder.handshake().await.unwrap();
        let (column, _) = responder.await_remote_move().await.unwrap();
        column
    });

    let transport = TcpTransport::connect(addr).await?;
    let mut initiator = Session::new(Role::Initiator, Box::new(transport));
    initiator.handshake().await?;
    initiator.send_move(6).await?;
    assert_eq!(server.await?, 6);

    // Raw version check: a peer speaking another version is refused
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut responder = Session::new(Role::Responder, Box::new(TcpTransport::new(stream)));
        responder.handshake().await
    });
    let mut raw = TcpTransport::connect(addr).await?;
    raw.send(Message::Handshake {
        version: PROTOCOL_VERSION + 1,
        rows: 7,
        cols: 10,
    })
    .await?;
    assert!(server.await?.is_err());
    assert!(raw.recv().await.is_err());
    Ok(())
}

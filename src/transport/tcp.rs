use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::DEFAULT_WRITE_TIMEOUT;
use crate::protocol::{decode_payload, encode_frame, frame_len, Message, FRAME_HEADER_LEN};
use crate::transport::Transport;

/// Length-prefixed bincode frames over a TCP stream.
pub struct TcpTransport {
    stream: TcpStream,
    read_timeout: Option<Duration>,
    write_timeout: Duration,
}

fn map_io_error(e: std::io::Error, op: &str) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted => anyhow::anyhow!("Connection closed by peer"),
        _ => anyhow::anyhow!("{} error: {}", op, e),
    }
}

impl TcpTransport {
    /// Wrap an accepted or connected stream. Reads block until a frame
    /// arrives; writes give up after [`DEFAULT_WRITE_TIMEOUT`].
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            read_timeout: None,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    pub fn with_timeouts(
        stream: TcpStream,
        read_timeout: Option<Duration>,
        write_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            read_timeout,
            write_timeout,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    pub fn peer_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    async fn read_frame(&mut self) -> anyhow::Result<Message> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        self.stream
            .read_exact(&mut header)
            .await
            .map_err(|e| map_io_error(e, "Read"))?;
        let len = frame_len(header)?;

        let mut payload = vec![0u8; len];
        self.stream
            .read_exact(&mut payload)
            .await
            .map_err(|e| map_io_error(e, "Read"))?;
        Ok(decode_payload(&payload)?)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let frame = encode_frame(&msg)?;
        let limit = self.write_timeout;
        let write = async {
            self.stream
                .write_all(&frame)
                .await
                .map_err(|e| map_io_error(e, "Write"))?;
            self.stream
                .flush()
                .await
                .map_err(|e| map_io_error(e, "Write"))
        };
        timeout(limit, write)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", limit))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        match self.read_timeout {
            Some(limit) => timeout(limit, self.read_frame())
                .await
                .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?,
            None => self.read_frame().await,
        }
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| map_io_error(e, "Shutdown"))
    }
}

//! The byte-stream boundary the session talks through.

use crate::protocol::Message;

/// A bidirectional, ordered message channel to the peer.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;

    /// Tear the connection down so the peer's next receive fails.
    async fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub mod in_memory;
pub mod tcp;

//! Messages exchanged between the two peers and their wire framing.
//!
//! Every message is explicitly tagged (serde enum, bincode variant index), so
//! a receiver can always tell which variant arrived. On the wire a message is
//! a 4-byte big-endian length followed by the bincode payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::GameStatus;
use crate::config::MAX_FRAME_SIZE;

/// Bumped whenever the message layout changes.
pub const PROTOCOL_VERSION: u16 = 1;

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Game status as announced by the player that just moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusToken {
    Playing,
    Won,
    Draw,
}

impl StatusToken {
    /// How the receiving side interprets the token.
    pub fn as_remote_status(self) -> GameStatus {
        match self {
            StatusToken::Playing => GameStatus::Playing,
            StatusToken::Won => GameStatus::RemoteWin,
            StatusToken::Draw => GameStatus::Draw,
        }
    }
}

/// A rematch vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

impl Vote {
    pub fn is_yes(self) -> bool {
        matches!(self, Vote::Yes)
    }
}

impl From<bool> for Vote {
    fn from(yes: bool) -> Self {
        if yes {
            Vote::Yes
        } else {
            Vote::No
        }
    }
}

/// Messages exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Opens a match: protocol version and the board size the initiator plays on.
    Handshake { version: u16, rows: u8, cols: u8 },
    /// Responder accepts the handshake.
    HandshakeAck { version: u16 },
    /// A dropped piece. `turn` is the sender's turn counter for this move.
    Move { turn: u32, column: u8 },
    /// Sender's status after its own move.
    Status(StatusToken),
    /// Rematch proposal (initiator) or answer (responder).
    RematchVote(Vote),
}

impl Message {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Handshake { .. } => "Handshake",
            Message::HandshakeAck { .. } => "HandshakeAck",
            Message::Move { .. } => "Move",
            Message::Status(_) => "Status",
            Message::RematchVote(_) => "RematchVote",
        }
    }
}

/// Errors produced while framing or unframing a message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer does not yet hold a full frame.
    #[error("incomplete frame: need {needed} bytes, got {available}")]
    Incomplete { needed: usize, available: usize },

    /// A zero length prefix.
    #[error("invalid frame length: 0")]
    Empty,

    /// The length prefix exceeds the frame limit.
    #[error("frame too large: {len} bytes (max: {max})")]
    TooLarge { len: usize, max: u32 },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),
}

/// Serialize `msg` into a length-prefixed frame.
pub fn encode_frame(msg: &Message) -> Result<Vec<u8>, FrameError> {
    let payload = bincode::serialize(msg).map_err(|e| FrameError::Serialize(e.to_string()))?;
    check_len(payload.len())?;
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Validate a length prefix and return the payload length it announces.
pub fn frame_len(header: [u8; FRAME_HEADER_LEN]) -> Result<usize, FrameError> {
    let len = u32::from_be_bytes(header) as usize;
    check_len(len)?;
    Ok(len)
}

/// Deserialize a frame payload (without its length prefix).
pub fn decode_payload(payload: &[u8]) -> Result<Message, FrameError> {
    bincode::deserialize(payload).map_err(|e| FrameError::Deserialize(e.to_string()))
}

/// Decode the first frame in `buf`, returning the message and the number of
/// bytes consumed. Trailing bytes belong to the next frame.
pub fn decode_frame(buf: &[u8]) -> Result<(Message, usize), FrameError> {
    let header: [u8; FRAME_HEADER_LEN] = buf
        .get(..FRAME_HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or(FrameError::Incomplete {
            needed: FRAME_HEADER_LEN,
            available: buf.len(),
        })?;
    let len = frame_len(header)?;
    let end = FRAME_HEADER_LEN + len;
    let payload = buf.get(FRAME_HEADER_LEN..end).ok_or(FrameError::Incomplete {
        needed: end,
        available: buf.len(),
    })?;
    Ok((decode_payload(payload)?, end))
}

fn check_len(len: usize) -> Result<(), FrameError> {
    if len == 0 {
        Err(FrameError::Empty)
    } else if len > MAX_FRAME_SIZE as usize {
        Err(FrameError::TooLarge {
            len,
            max: MAX_FRAME_SIZE,
        })
    } else {
        Ok(())
    }
}

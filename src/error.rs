//! Errors surfaced by a [`Session`](crate::Session).

use thiserror::Error;

use crate::common::BoardError;
use crate::session::Phase;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Local input rejected. Nothing was sent; the caller may pick another column.
    #[error("invalid move in column {column}: {source}")]
    InvalidMove {
        column: usize,
        #[source]
        source: BoardError,
    },

    /// The peer's move does not fit on the local board: the two views diverged.
    #[error("remote move in column {column} cannot be applied: {source}")]
    RemoteDesync {
        column: usize,
        #[source]
        source: BoardError,
    },

    /// The connection failed, closed, stalled past its timeout or was cancelled.
    #[error("transport failure: {0:#}")]
    TransportFailure(anyhow::Error),

    /// A message arrived that the current phase does not allow.
    #[error("protocol violation: expected {expected}, received {received}")]
    ProtocolViolation {
        expected: &'static str,
        received: String,
    },

    /// The session API was called in the wrong phase.
    #[error("operation not allowed in phase {phase:?}")]
    OutOfTurn { phase: Phase },
}

impl SessionError {
    /// Fatal errors end the match; the others leave the session usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SessionError::InvalidMove { .. } | SessionError::OutOfTurn { .. }
        )
    }
}

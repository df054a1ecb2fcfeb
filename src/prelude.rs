//! Commonly used types and utilities for ease of import.

pub use crate::{
    AiPlayer, Board, CliPlayer, GameStatus, Message, Player, PlayerNode, Role, Session,
    SessionError, SessionOptions, Symbol, Vote,
};

pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};

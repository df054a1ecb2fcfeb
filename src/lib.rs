#![cfg_attr(not(feature = "std"), no_std)]

//! Two-player Connect Four over a direct network link.
//!
//! The board engine (`Board`, `BitBoard`) only needs `core`. With the default
//! `std` feature the crate adds the turn protocol [`Session`], the wire
//! [`Message`] type and framing, TCP and in-memory transports, and the
//! player layer that drives a whole match.

mod bitboard;
mod board;
mod common;
mod config;
mod player;
mod player_ai;
#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod player_cli;
#[cfg(feature = "std")]
pub mod player_node;
#[cfg(feature = "std")]
pub mod prelude;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use bitboard::{BitBoard, BitBoardError, SetBits};
pub use board::*;
pub use common::*;
pub use config::*;
pub use player::*;
pub use player_ai::*;
#[cfg(feature = "std")]
pub use error::SessionError;
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use player_cli::*;
#[cfg(feature = "std")]
pub use player_node::*;
#[cfg(feature = "std")]
pub use protocol::*;
#[cfg(feature = "std")]
pub use session::*;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};

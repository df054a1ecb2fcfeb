//! Fixed game constants. Both peers must agree on the board size out of band;
//! the handshake rejects a mismatch.

use core::time::Duration;

/// Default number of rows.
pub const DEFAULT_ROWS: usize = 7;
/// Default number of columns.
pub const DEFAULT_COLS: usize = 10;
/// Pieces in a line needed to win.
pub const WIN_LENGTH: usize = 4;

/// Symbol of the player that connects and moves first.
pub const INITIATOR_SYMBOL: crate::Symbol = crate::Symbol::X;
/// Symbol of the player that listens and moves second.
pub const RESPONDER_SYMBOL: crate::Symbol = crate::Symbol::O;

/// Well-known port the responder listens on.
pub const DEFAULT_PORT: u16 = 12783;

/// Largest frame accepted from the wire. Real messages are a few bytes.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// Default timeout for writing one frame. Reads wait as long as the session
/// allows, since the peer may be a human thinking.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the log level.
pub const LOG_ENV_VAR: &str = "CONNECT4_LOG";

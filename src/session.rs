//! One side of a match: the turn protocol that keeps two independently owned
//! boards in step, plus end-of-game status exchange and rematch negotiation.
//!
//! Per move the mover sends `Move` then `Status`; the other side applies the
//! move as a remote move and maps the status token onto its own view. After a
//! terminal status the initiator proposes a rematch and, on `Yes`, the
//! responder answers. Any transport failure or fatal protocol error ends the
//! match with [`GameStatus::OpponentDisconnected`] and closes the transport so
//! the peer observes the end as well.

use std::sync::Arc;

use log::{debug, info, trace, warn};
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

use crate::board::Board;
use crate::common::{GameStatus, Symbol};
use crate::config::{INITIATOR_SYMBOL, RESPONDER_SYMBOL};
use crate::error::SessionError;
use crate::protocol::{Message, StatusToken, Vote, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Which side of the match this session plays. Fixed for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Role {
    /// Connects, moves first in every game and proposes rematches.
    Initiator,
    /// Listens, waits for the first move and answers rematch proposals.
    Responder,
}

impl Role {
    pub fn symbol(self) -> Symbol {
        match self {
            Role::Initiator => INITIATOR_SYMBOL,
            Role::Responder => RESPONDER_SYMBOL,
        }
    }

    pub fn moves_first(self) -> bool {
        matches!(self, Role::Initiator)
    }
}

/// Where the session is in the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingLocalMove,
    /// Local move sent, status token not yet sent.
    AwaitingStatusExchange,
    AwaitingRemoteMove,
    GameOver(GameStatus),
    /// Responder received a `Yes` proposal and owes an answer.
    AwaitingRematchAnswer,
    MatchOver,
}

/// Runtime knobs for a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Upper bound on a single receive. `None` waits until the peer sends or
    /// the connection drops.
    pub recv_timeout: Option<Duration>,
}

/// Requests cancellation of any receive the paired session is blocked in.
#[derive(Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Receiving half of a cancellation pair, owned by a [`Session`].
pub struct CancelToken(watch::Receiver<bool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled. Never resolves if every handle is dropped.
    async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a linked cancel handle and token.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(Arc::new(tx)), CancelToken(rx))
}

/// The owned record of one match: board, authoritative status, phase and the
/// connection to the peer.
pub struct Session {
    role: Role,
    board: Board,
    status: GameStatus,
    phase: Phase,
    transport: Box<dyn Transport>,
    options: SessionOptions,
    cancel: Option<CancelToken>,
    games_played: u32,
    handshake_done: bool,
}

impl Session {
    /// Session on a default-size board using the role's symbol.
    pub fn new(role: Role, transport: Box<dyn Transport>) -> Self {
        Self::with_board(role, Board::new(role.symbol()), transport)
    }

    /// Session on a caller-provided board. The board should be empty and use
    /// the role's symbol as its local symbol.
    pub fn with_board(role: Role, board: Board, transport: Box<dyn Transport>) -> Self {
        Self {
            role,
            board,
            status: GameStatus::Playing,
            phase: first_phase(role),
            transport,
            options: SessionOptions::default(),
            cancel: None,
            games_played: 0,
            handshake_done: false,
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Games that reached a terminal status in this match.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn is_local_turn(&self) -> bool {
        self.phase == Phase::AwaitingLocalMove
    }

    pub fn is_match_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }

    /// Agree on protocol version and board size. Runs once, before the first
    /// move of the match.
    pub async fn handshake(&mut self) -> Result<(), SessionError> {
        if self.handshake_done
            || self.games_played > 0
            || self.phase != first_phase(self.role)
            || !self.board.occupied().is_empty()
        {
            return Err(SessionError::OutOfTurn { phase: self.phase });
        }
        let rows = self.board.rows() as u8;
        let cols = self.board.cols() as u8;
        match self.role {
            Role::Initiator => {
                self.send(Message::Handshake {
                    version: PROTOCOL_VERSION,
                    rows,
                    cols,
                })
                .await?;
                match self.recv().await? {
                    Message::HandshakeAck { version } if version == PROTOCOL_VERSION => {}
                    other => return Err(self.violation("HandshakeAck with matching version", other).await),
                }
            }
            Role::Responder => {
                match self.recv().await? {
                    Message::Handshake {
                        version,
                        rows: peer_rows,
                        cols: peer_cols,
                    } if version == PROTOCOL_VERSION && peer_rows == rows && peer_cols == cols => {}
                    other => {
                        return Err(self
                            .violation("Handshake with matching version and board size", other)
                            .await)
                    }
                }
                self.send(Message::HandshakeAck {
                    version: PROTOCOL_VERSION,
                })
                .await?;
            }
        }
        self.handshake_done = true;
        info!(
            "handshake complete as {:?} ({}), board {}x{}",
            self.role,
            self.board.local_symbol(),
            rows,
            cols
        );
        Ok(())
    }

    /// Play `column` locally, send it to the peer and announce the resulting
    /// status. An invalid column is reported without touching the board or
    /// the wire.
    pub async fn send_move(&mut self, column: usize) -> Result<GameStatus, SessionError> {
        self.expect_phase(Phase::AwaitingLocalMove)?;
        self.board
            .play_local(column)
            .map_err(|source| SessionError::InvalidMove { column, source })?;
        self.phase = Phase::AwaitingStatusExchange;

        let turn = self.board.turn() - 1;
        debug!("sending move {} in column {}", turn, column);
        self.send(Message::Move {
            turn,
            column: column as u8,
        })
        .await?;

        let (status, token) = if self.board.has_local_win() {
            (GameStatus::LocalWin, StatusToken::Won)
        } else if self.board.is_full() {
            (GameStatus::Draw, StatusToken::Draw)
        } else {
            (GameStatus::Playing, StatusToken::Playing)
        };
        self.send(Message::Status(token)).await?;

        if status.is_terminal() {
            self.finish_game(status);
        } else {
            self.phase = Phase::AwaitingRemoteMove;
        }
        Ok(status)
    }

    /// Wait for the peer's move and status, apply them and return the column
    /// played with the resulting status.
    pub async fn await_remote_move(&mut self) -> Result<(usize, GameStatus), SessionError> {
        self.expect_phase(Phase::AwaitingRemoteMove)?;

        let (turn, column) = match self.recv().await? {
            Message::Move { turn, column } => (turn, column as usize),
            other => return Err(self.violation("Move", other).await),
        };
        let expected_turn = self.board.remote_pieces() as u32 + 1;
        if turn != expected_turn {
            let err = SessionError::ProtocolViolation {
                expected: "Move for the next turn",
                received: format!("Move for turn {} (expected {})", turn, expected_turn),
            };
            return Err(self.abort(err).await);
        }
        if let Err(source) = self.board.play_remote(column) {
            return Err(self.abort(SessionError::RemoteDesync { column, source }).await);
        }
        debug!("received move {} in column {}", turn, column);

        let token = match self.recv().await? {
            Message::Status(token) => token,
            other => return Err(self.violation("Status", other).await),
        };
        if token != self.expected_remote_token() {
            return Err(self
                .violation("Status consistent with the local board", Message::Status(token))
                .await);
        }

        let status = token.as_remote_status();
        if status.is_terminal() {
            self.finish_game(status);
        } else {
            self.phase = Phase::AwaitingLocalMove;
        }
        Ok((column, status))
    }

    /// Initiator: send a rematch vote and, after `Yes`, wait for the answer.
    /// Returns `true` when both sides agreed and a new game has started.
    /// A game lost to disconnection skips negotiation and returns `false`.
    pub async fn propose_rematch(&mut self, vote: Vote) -> Result<bool, SessionError> {
        if self.role != Role::Initiator || !self.ready_for_rematch()? {
            return self.rematch_unavailable();
        }
        debug!("proposing rematch: {:?}", vote);
        self.send(Message::RematchVote(vote)).await?;
        if !vote.is_yes() {
            self.end_match().await;
            return Ok(false);
        }
        let answer = match self.recv().await? {
            Message::RematchVote(answer) => answer,
            other => return Err(self.violation("RematchVote", other).await),
        };
        if answer.is_yes() {
            self.restart();
            Ok(true)
        } else {
            info!("opponent declined the rematch");
            self.end_match().await;
            Ok(false)
        }
    }

    /// Responder: wait for the initiator's proposal. A `No` ends the match;
    /// after `Yes` call [`answer_rematch`](Self::answer_rematch).
    pub async fn receive_rematch_proposal(&mut self) -> Result<Vote, SessionError> {
        if self.role != Role::Responder || !self.ready_for_rematch()? {
            return self.rematch_unavailable().map(|_| Vote::No);
        }
        let proposal = match self.recv().await? {
            Message::RematchVote(vote) => vote,
            other => return Err(self.violation("RematchVote", other).await),
        };
        debug!("received rematch proposal: {:?}", proposal);
        if proposal.is_yes() {
            self.phase = Phase::AwaitingRematchAnswer;
        } else {
            info!("opponent declined the rematch");
            self.end_match().await;
        }
        Ok(proposal)
    }

    /// Responder: answer a `Yes` proposal. Returns `true` when a new game has
    /// started.
    pub async fn answer_rematch(&mut self, vote: Vote) -> Result<bool, SessionError> {
        self.expect_phase(Phase::AwaitingRematchAnswer)?;
        self.send(Message::RematchVote(vote)).await?;
        if vote.is_yes() {
            self.restart();
            Ok(true)
        } else {
            self.end_match().await;
            Ok(false)
        }
    }

    /// End the match from this side without finishing the game. The peer's
    /// next receive fails and it reports a disconnect.
    pub async fn leave(&mut self) {
        if self.phase != Phase::MatchOver {
            self.end_match().await;
        }
    }

    fn expect_phase(&self, phase: Phase) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::OutOfTurn { phase: self.phase })
        }
    }

    /// `Ok(true)` after a game end, `Ok(false)` once the match is over
    /// (a game lost to disconnection ends the match), `OutOfTurn` mid-game.
    fn ready_for_rematch(&self) -> Result<bool, SessionError> {
        match self.phase {
            Phase::GameOver(_) => Ok(true),
            Phase::MatchOver => Ok(false),
            phase => Err(SessionError::OutOfTurn { phase }),
        }
    }

    fn rematch_unavailable(&self) -> Result<bool, SessionError> {
        if self.phase == Phase::MatchOver {
            Ok(false)
        } else {
            Err(SessionError::OutOfTurn { phase: self.phase })
        }
    }

    /// Token the peer must have sent given the move it just made.
    fn expected_remote_token(&self) -> StatusToken {
        if self.board.has_remote_win() {
            StatusToken::Won
        } else if self.board.is_full() {
            StatusToken::Draw
        } else {
            StatusToken::Playing
        }
    }

    fn finish_game(&mut self, status: GameStatus) {
        self.status = status;
        self.phase = Phase::GameOver(status);
        self.games_played += 1;
        info!(
            "game {} over: {:?} after {} local moves",
            self.games_played,
            status,
            self.board.turn() - 1
        );
    }

    fn restart(&mut self) {
        self.board.restart();
        self.status = GameStatus::Playing;
        self.phase = first_phase(self.role);
        info!("rematch agreed, starting game {}", self.games_played + 1);
    }

    async fn end_match(&mut self) {
        self.phase = Phase::MatchOver;
        if let Err(e) = self.transport.close().await {
            debug!("closing transport: {}", e);
        }
    }

    /// Record a fatal error: the match ends as a disconnect and the peer is
    /// cut off.
    async fn abort(&mut self, err: SessionError) -> SessionError {
        warn!("match aborted: {}", err);
        self.status = GameStatus::OpponentDisconnected;
        if self.phase != Phase::MatchOver {
            self.end_match().await;
        }
        err
    }

    async fn violation(&mut self, expected: &'static str, received: Message) -> SessionError {
        let err = SessionError::ProtocolViolation {
            expected,
            received: format!("{:?}", received),
        };
        self.abort(err).await
    }

    async fn send(&mut self, msg: Message) -> Result<(), SessionError> {
        trace!("-> {}", msg.kind());
        match self.transport.send(msg).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.abort(SessionError::TransportFailure(e)).await),
        }
    }

    async fn recv(&mut self) -> Result<Message, SessionError> {
        let limit = self.options.recv_timeout;
        let transport = &mut self.transport;
        let received = match self.cancel.as_mut() {
            Some(token) => tokio::select! {
                res = recv_within(&mut **transport, limit) => res,
                () = token.cancelled() => Err(anyhow::anyhow!("Receive cancelled")),
            },
            None => recv_within(&mut **transport, limit).await,
        };
        match received {
            Ok(msg) => {
                trace!("<- {}", msg.kind());
                Ok(msg)
            }
            Err(e) => Err(self.abort(SessionError::TransportFailure(e)).await),
        }
    }
}

fn first_phase(role: Role) -> Phase {
    if role.moves_first() {
        Phase::AwaitingLocalMove
    } else {
        Phase::AwaitingRemoteMove
    }
}

async fn recv_within(transport: &mut dyn Transport, limit: Option<Duration>) -> anyhow::Result<Message> {
    match limit {
        Some(limit) => timeout(limit, transport.recv())
            .await
            .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?,
        None => transport.recv().await,
    }
}

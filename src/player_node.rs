#![cfg(feature = "std")]

use log::{debug, info};
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::{
    common::GameStatus,
    error::SessionError,
    player::Player,
    protocol::Vote,
    session::{Phase, Role, Session},
};

/// Outcome of a whole match from one side's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub role: Role,
    /// Final status of every game, in order.
    pub results: Vec<GameStatus>,
}

impl MatchSummary {
    pub fn wins(&self) -> usize {
        self.count(GameStatus::LocalWin)
    }

    pub fn losses(&self) -> usize {
        self.count(GameStatus::RemoteWin)
    }

    pub fn draws(&self) -> usize {
        self.count(GameStatus::Draw)
    }

    fn count(&self, status: GameStatus) -> usize {
        self.results.iter().filter(|&&s| s == status).count()
    }
}

/// Drives a [`Session`] with a [`Player`] for a whole match.
pub struct PlayerNode {
    player: Box<dyn Player>,
    session: Session,
    results: Vec<GameStatus>,
}

impl PlayerNode {
    pub fn new(player: Box<dyn Player>, session: Session) -> Self {
        Self {
            player,
            session,
            results: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            role: self.session.role(),
            results: self.results.clone(),
        }
    }

    /// Handshake, then play games until either side declines a rematch or
    /// the player quits. A fatal session error ends the match; the game it
    /// interrupted is recorded as `OpponentDisconnected`.
    pub async fn run(&mut self, rng: &mut SmallRng) -> Result<MatchSummary, SessionError> {
        self.session.handshake().await?;
        loop {
            match self.play_game(rng).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    if e.is_fatal() {
                        self.record(self.session.status());
                    }
                    return Err(e);
                }
            }
            self.record(self.session.status());
            if !self.negotiate_rematch(rng).await? {
                break;
            }
        }
        info!(
            "match over after {} game(s) as {:?}",
            self.results.len(),
            self.session.role()
        );
        Ok(self.summary())
    }

    fn record(&mut self, status: GameStatus) {
        self.results.push(status);
        self.player.handle_game_over(status, self.session.board());
    }

    /// Alternate local and remote moves until the game ends. Returns `false`
    /// if the player quit instead.
    async fn play_game(&mut self, rng: &mut SmallRng) -> Result<bool, SessionError> {
        loop {
            match self.session.phase() {
                Phase::AwaitingLocalMove => {
                    let Some(column) = self.player.select_column(rng, self.session.board()) else {
                        info!("player left the match");
                        self.session.leave().await;
                        return Ok(false);
                    };
                    match self.session.send_move(column).await {
                        Ok(_) => {}
                        Err(SessionError::InvalidMove { column, source }) => {
                            debug!("rejected column {}: {}", column, source);
                            self.player.handle_invalid_move(column, &source);
                        }
                        Err(e) => return Err(e),
                    }
                }
                Phase::AwaitingRemoteMove => {
                    self.player.handle_waiting();
                    let (column, _) = self.session.await_remote_move().await?;
                    self.player.handle_remote_move(column, self.session.board());
                }
                Phase::GameOver(_) => return Ok(true),
                phase => return Err(SessionError::OutOfTurn { phase }),
            }
        }
    }

    async fn negotiate_rematch(&mut self, rng: &mut SmallRng) -> Result<bool, SessionError> {
        let games = self.session.games_played();
        match self.session.role() {
            Role::Initiator => {
                let vote = Vote::from(self.player.wants_rematch(rng, games));
                self.session.propose_rematch(vote).await
            }
            Role::Responder => {
                let proposal = self.session.receive_rematch_proposal().await?;
                if !proposal.is_yes() {
                    return Ok(false);
                }
                let vote = Vote::from(self.player.wants_rematch(rng, games));
                self.session.answer_rematch(vote).await
            }
        }
    }
}

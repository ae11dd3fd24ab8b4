//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use std::time::Duration;

use isolation_core::{Agent, Board, GameBoard, Move, Player, TurnTimer};
use serde::Serialize;

/// Why a game ended before the loser ran out of moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Forfeit {
    /// Returned no move while legal moves existed
    NoMove,
    /// Returned a move that is not legal
    IllegalMove(Move),
    /// Answered after the turn budget ran out
    Timeout,
}

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Winning seat
    pub winner: Player,
    /// Moves played from the initial state
    pub moves: Vec<Move>,
    /// Set when the loser forfeited
    pub forfeit: Option<Forfeit>,
    /// Board when the game ended
    pub final_state: Board,
}

impl GameOutcome {
    pub fn loser(&self) -> Player {
        self.winner.opponent()
    }
}

/// Game runner that plays two agents against each other under a turn clock
#[derive(Clone, Copy, Debug)]
pub struct GameRunner {
    time_limit: Duration,
}

impl GameRunner {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Play until someone is stuck or forfeits. `first` plays
    /// `Player::First` and `second` plays `Player::Second`, whoever is to
    /// move in `initial`.
    pub fn play_game(
        &self,
        first: &mut dyn Agent,
        second: &mut dyn Agent,
        initial: Board,
    ) -> GameOutcome {
        let mut state = initial;
        let mut moves = Vec::new();

        loop {
            let active = state.active_player();
            if state.active_legal_moves().is_empty() {
                return GameOutcome {
                    winner: active.opponent(),
                    moves,
                    forfeit: None,
                    final_state: state,
                };
            }

            let agent: &mut dyn Agent = match active {
                Player::First => &mut *first,
                Player::Second => &mut *second,
            };

            let timer = TurnTimer::start(self.time_limit);
            let time_left = || timer.time_left_ms();
            let choice = agent.best_move(&state, &time_left);

            let forfeit = if timer.is_expired() {
                Some(Forfeit::Timeout)
            } else {
                match choice {
                    None => Some(Forfeit::NoMove),
                    Some(mv) => match state.apply_move(mv) {
                        Ok(next) => {
                            state = next;
                            moves.push(mv);
                            None
                        }
                        Err(_) => Some(Forfeit::IllegalMove(mv)),
                    },
                }
            };

            if let Some(reason) = forfeit {
                tracing::debug!(
                    "{} forfeits as {} after {:?}: {:?}",
                    agent.name(),
                    active,
                    timer.elapsed(),
                    reason
                );
                return GameOutcome {
                    winner: active.opponent(),
                    moves,
                    forfeit,
                    final_state: state,
                };
            }
        }
    }
}

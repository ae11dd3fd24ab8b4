//! Agents: anything that can pick a move under a turn clock

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::{AlphaBetaPlayer, MinimaxPlayer};
use crate::board::Move;
use crate::eval::Heuristic;
use crate::game::{Board, GameBoard};

/// A game-playing agent
pub trait Agent: Send {
    fn name(&self) -> &str;

    /// Pick a move for the player to move. `time_left` reports the
    /// milliseconds remaining in the turn. `None` means "no move".
    fn best_move(&mut self, state: &Board, time_left: &dyn Fn() -> f64) -> Option<Move>;
}

impl Agent for MinimaxPlayer {
    fn name(&self) -> &str {
        MinimaxPlayer::name(self)
    }

    fn best_move(&mut self, state: &Board, time_left: &dyn Fn() -> f64) -> Option<Move> {
        self.get_move(state, time_left)
    }
}

impl Agent for AlphaBetaPlayer {
    fn name(&self) -> &str {
        AlphaBetaPlayer::name(self)
    }

    fn best_move(&mut self, state: &Board, time_left: &dyn Fn() -> f64) -> Option<Move> {
        self.get_move(state, time_left)
    }
}

/// Uniformly random legal moves
pub struct RandomPlayer {
    name: String,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "random".to_string(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&mut self, state: &Board, _time_left: &dyn Fn() -> f64) -> Option<Move> {
        state.active_legal_moves().choose(&mut self.rng).copied()
    }
}

/// One-ply lookahead on a heuristic
pub struct GreedyPlayer {
    name: String,
    heuristic: Heuristic,
}

impl GreedyPlayer {
    pub fn new(heuristic: Heuristic) -> Self {
        Self {
            name: format!("greedy-{heuristic}"),
            heuristic,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for GreedyPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&mut self, state: &Board, _time_left: &dyn Fn() -> f64) -> Option<Move> {
        let me = state.active_player();
        let mut moves = state.active_legal_moves();
        moves.sort_unstable();

        let mut best: Option<(Move, f64)> = None;
        for mv in moves {
            let score = self.heuristic.score(&state.forecast_move(mv), me);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SearchConfig;

    fn unlimited() -> f64 {
        f64::INFINITY
    }

    fn midgame() -> Board {
        Board::default()
            .forecast_move(Move::new(3, 3))
            .forecast_move(Move::new(0, 0))
    }

    #[test]
    fn test_random_player_is_seeded() {
        let board = midgame();
        let mut a = RandomPlayer::new(9);
        let mut b = RandomPlayer::new(9);
        for _ in 0..5 {
            let mv = a.best_move(&board, &unlimited);
            assert_eq!(mv, b.best_move(&board, &unlimited));
            assert!(mv.is_some_and(|m| board.active_legal_moves().contains(&m)));
        }
    }

    #[test]
    fn test_greedy_takes_immediate_win() {
        let board = Board::default()
            .forecast_move(Move::new(3, 3))
            .forecast_move(Move::new(0, 6))
            .with_blocked(&[Move::new(1, 4)])
            .unwrap();
        let mut greedy = GreedyPlayer::new(Heuristic::Offensive);
        assert_eq!(greedy.best_move(&board, &unlimited), Some(Move::new(2, 5)));
    }

    #[test]
    fn test_agents_as_trait_objects() {
        let board = midgame();
        let mut agents: Vec<Box<dyn Agent>> = vec![
            Box::new(MinimaxPlayer::new(SearchConfig::default().with_depth(1))),
            Box::new(AlphaBetaPlayer::new(SearchConfig::default().with_max_depth(2))),
            Box::new(RandomPlayer::new(1)),
            Box::new(GreedyPlayer::new(Heuristic::Defensive).with_name("runner")),
        ];
        for agent in agents.iter_mut() {
            let mv = agent.best_move(&board, &unlimited);
            assert!(mv.is_some(), "{} gave no move", agent.name());
        }
        assert_eq!(agents[3].name(), "runner");
        assert_eq!(agents[0].name(), "minimax-limit-opp-moves-d1");
    }
}

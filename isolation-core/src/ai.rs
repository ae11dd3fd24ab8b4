//! Adversarial search engines
//!
//! Two engines share one recursive core:
//! - [`MinimaxPlayer`]: fixed-depth minimax
//! - [`AlphaBetaPlayer`]: iterative-deepening alpha-beta, anytime
//!
//! Both poll a [`Deadline`] before every node expansion. A timeout unwinds
//! through `?` to the public entry point, which answers with the best move
//! recorded so far (`None` when nothing was established).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Move;
use crate::deadline::{Deadline, SearchTimeout, DEFAULT_TIMEOUT_THRESHOLD_MS};
use crate::eval::Heuristic;
use crate::game::{GameBoard, Player};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default fixed depth for minimax
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched by minimax (strictly positive; 0 is treated as 1)
    pub search_depth: u32,
    /// Leaf evaluation strategy
    pub heuristic: Heuristic,
    /// Abort once fewer milliseconds than this remain
    pub timeout_threshold_ms: f64,
    /// Optional cap on iterative deepening
    pub max_depth: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            heuristic: Heuristic::default(),
            timeout_threshold_ms: DEFAULT_TIMEOUT_THRESHOLD_MS,
            max_depth: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, search_depth: u32) -> Self {
        self.search_depth = search_depth;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_threshold(mut self, timeout_threshold_ms: f64) -> Self {
        self.timeout_threshold_ms = timeout_threshold_ms;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// What a search produced and how far it got
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Best move found; `None` is the "no move" sentinel
    pub best_move: Option<Move>,
    /// Deepest fully searched ply (0 when no depth completed)
    pub completed_depth: u32,
    /// False when the deadline cut the search short
    pub completed: bool,
    /// Successor states expanded
    pub nodes: u64,
}

impl SearchOutcome {
    fn no_moves() -> Self {
        Self {
            best_move: None,
            completed_depth: 0,
            completed: true,
            nodes: 0,
        }
    }

    fn forced(mv: Move) -> Self {
        Self {
            best_move: Some(mv),
            completed_depth: 0,
            completed: true,
            nodes: 0,
        }
    }
}

/// Legal moves of the player to move, in ascending `(row, col)` order.
/// Only built for nodes that are actually expanded.
fn ordered_moves<B: GameBoard>(state: &B) -> Vec<Move> {
    let mut moves = state.active_legal_moves();
    moves.sort_unstable();
    moves
}

// ============================================================================
// SHARED RECURSION
// ============================================================================

/// Per-call search context. Scores are always from `player`'s point of view.
struct Searcher<'a> {
    player: Player,
    heuristic: Heuristic,
    deadline: Deadline<'a>,
    nodes: u64,
    /// Set when some leaf was cut off by depth rather than by the game ending
    hit_depth_limit: bool,
}

impl<'a> Searcher<'a> {
    fn new(player: Player, heuristic: Heuristic, deadline: Deadline<'a>) -> Self {
        Self {
            player,
            heuristic,
            deadline,
            nodes: 0,
            hit_depth_limit: false,
        }
    }

    fn expand<B: GameBoard>(&mut self, state: &B, mv: Move) -> Result<B, SearchTimeout> {
        self.deadline.check_time()?;
        self.nodes += 1;
        Ok(state.forecast_move(mv))
    }

    fn evaluate<B: GameBoard>(&mut self, state: &B) -> f64 {
        self.hit_depth_limit = true;
        self.heuristic.score(state, self.player)
    }

    // ------------------------------------------------------------------------
    // Minimax
    // ------------------------------------------------------------------------

    fn max_value<B: GameBoard>(&mut self, state: &B, depth: u32) -> Result<f64, SearchTimeout> {
        if !state.has_legal_moves(state.active_player()) {
            return Ok(state.utility(self.player));
        }
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = ordered_moves(state);

        let mut best = f64::NEG_INFINITY;
        for mv in moves {
            let child = self.expand(state, mv)?;
            best = best.max(self.min_value(&child, depth - 1)?);
        }
        Ok(best)
    }

    fn min_value<B: GameBoard>(&mut self, state: &B, depth: u32) -> Result<f64, SearchTimeout> {
        if !state.has_legal_moves(state.active_player()) {
            return Ok(state.utility(self.player));
        }
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = ordered_moves(state);

        let mut best = f64::INFINITY;
        for mv in moves {
            let child = self.expand(state, mv)?;
            best = best.min(self.max_value(&child, depth - 1)?);
        }
        Ok(best)
    }

    /// Root of minimax. `best` tracks the best fully evaluated root move so it
    /// survives a timeout; the first move wins ties.
    fn minimax<B: GameBoard>(
        &mut self,
        state: &B,
        moves: &[Move],
        depth: u32,
        best: &mut Option<Move>,
    ) -> Result<(), SearchTimeout> {
        let mut best_score = f64::NEG_INFINITY;
        for &mv in moves {
            let child = self.expand(state, mv)?;
            let score = self.min_value(&child, depth - 1)?;
            if best.is_none() || score > best_score {
                best_score = score;
                *best = Some(mv);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Alpha-beta (fail-hard)
    // ------------------------------------------------------------------------

    fn alphabeta_max_value<B: GameBoard>(
        &mut self,
        state: &B,
        depth: u32,
        mut alpha: f64,
        beta: f64,
    ) -> Result<f64, SearchTimeout> {
        if !state.has_legal_moves(state.active_player()) {
            return Ok(state.utility(self.player));
        }
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = ordered_moves(state);

        for mv in moves {
            let child = self.expand(state, mv)?;
            let score = self.alphabeta_min_value(&child, depth - 1, alpha, beta)?;
            if score > alpha {
                alpha = score;
                if alpha >= beta {
                    break;
                }
            }
        }
        Ok(alpha)
    }

    fn alphabeta_min_value<B: GameBoard>(
        &mut self,
        state: &B,
        depth: u32,
        alpha: f64,
        mut beta: f64,
    ) -> Result<f64, SearchTimeout> {
        if !state.has_legal_moves(state.active_player()) {
            return Ok(state.utility(self.player));
        }
        if depth == 0 {
            return Ok(self.evaluate(state));
        }
        let moves = ordered_moves(state);

        for mv in moves {
            let child = self.expand(state, mv)?;
            let score = self.alphabeta_max_value(&child, depth - 1, alpha, beta)?;
            if score < beta {
                beta = score;
                if beta <= alpha {
                    break;
                }
            }
        }
        Ok(beta)
    }

    /// Root of alpha-beta. Every root move is searched (no beta cutoff) and
    /// the first move is the fallback when nothing beats `-inf`.
    fn alphabeta<B: GameBoard>(
        &mut self,
        state: &B,
        moves: &[Move],
        depth: u32,
    ) -> Result<Option<Move>, SearchTimeout> {
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best = moves.first().copied();

        for &mv in moves {
            let child = self.expand(state, mv)?;
            let score = self.alphabeta_min_value(&child, depth - 1, alpha, beta)?;
            if score > alpha {
                alpha = score;
                best = Some(mv);
            }
        }
        Ok(best)
    }
}

// ============================================================================
// MINIMAX ENGINE
// ============================================================================

/// Fixed-depth minimax player
#[derive(Clone, Debug)]
pub struct MinimaxPlayer {
    name: String,
    config: SearchConfig,
}

impl MinimaxPlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            name: format!("minimax-{}-d{}", config.heuristic, config.search_depth),
            config,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best move for the player to move, or `None` when there is none or the
    /// deadline hit before any root move was evaluated
    pub fn get_move<B: GameBoard>(&self, state: &B, time_left: &dyn Fn() -> f64) -> Option<Move> {
        self.search(state, time_left).best_move
    }

    pub fn search<B: GameBoard>(&self, state: &B, time_left: &dyn Fn() -> f64) -> SearchOutcome {
        let moves = ordered_moves(state);
        match moves.as_slice() {
            [] => return SearchOutcome::no_moves(),
            [only] => return SearchOutcome::forced(*only),
            _ => {}
        }

        let depth = self.config.search_depth.max(1);
        let deadline = Deadline::new(time_left, self.config.timeout_threshold_ms);
        let mut searcher = Searcher::new(state.active_player(), self.config.heuristic, deadline);
        let mut best = None;

        match searcher.minimax(state, &moves, depth, &mut best) {
            Ok(()) => SearchOutcome {
                best_move: best,
                completed_depth: depth,
                completed: true,
                nodes: searcher.nodes,
            },
            Err(timeout) => {
                debug!(%timeout, nodes = searcher.nodes, fallback = ?best, "minimax aborted");
                SearchOutcome {
                    best_move: best,
                    completed_depth: 0,
                    completed: false,
                    nodes: searcher.nodes,
                }
            }
        }
    }

    /// Plain depth-limited minimax from the root; the timeout is returned
    /// rather than absorbed
    pub fn minimax<B: GameBoard>(
        &self,
        state: &B,
        depth: u32,
        time_left: &dyn Fn() -> f64,
    ) -> Result<Option<Move>, SearchTimeout> {
        let moves = ordered_moves(state);
        if moves.is_empty() {
            return Ok(None);
        }
        let deadline = Deadline::new(time_left, self.config.timeout_threshold_ms);
        let mut searcher = Searcher::new(state.active_player(), self.config.heuristic, deadline);
        let mut best = None;
        searcher.minimax(state, &moves, depth.max(1), &mut best)?;
        Ok(best)
    }
}

// ============================================================================
// ITERATIVE-DEEPENING ALPHA-BETA ENGINE
// ============================================================================

/// Anytime alpha-beta player
#[derive(Clone, Debug)]
pub struct AlphaBetaPlayer {
    name: String,
    config: SearchConfig,
}

impl AlphaBetaPlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            name: format!("alphabeta-{}", config.heuristic),
            config,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Move from the deepest completed iteration, or `None` when there is no
    /// legal move or not even depth 1 finished in time
    pub fn get_move<B: GameBoard>(&self, state: &B, time_left: &dyn Fn() -> f64) -> Option<Move> {
        self.search(state, time_left).best_move
    }

    /// Deepen one ply at a time until the deadline, the depth cap, or an
    /// iteration that resolved the whole tree
    pub fn search<B: GameBoard>(&self, state: &B, time_left: &dyn Fn() -> f64) -> SearchOutcome {
        let moves = ordered_moves(state);
        match moves.as_slice() {
            [] => return SearchOutcome::no_moves(),
            [only] => return SearchOutcome::forced(*only),
            _ => {}
        }

        let deadline = Deadline::new(time_left, self.config.timeout_threshold_ms);
        let mut searcher = Searcher::new(state.active_player(), self.config.heuristic, deadline);
        let mut outcome = SearchOutcome {
            best_move: None,
            completed_depth: 0,
            completed: false,
            nodes: 0,
        };

        let mut depth = 1;
        loop {
            if matches!(self.config.max_depth, Some(max) if depth > max.max(1)) {
                outcome.completed = true;
                break;
            }
            if let Err(timeout) = searcher.deadline.check_time() {
                debug!(depth, %timeout, "no time for next iteration");
                break;
            }

            searcher.hit_depth_limit = false;
            match searcher.alphabeta(state, &moves, depth) {
                Ok(found) => {
                    if found.is_some() {
                        outcome.best_move = found;
                    }
                    outcome.completed_depth = depth;
                    debug!(depth, best = ?found, nodes = searcher.nodes, "iteration complete");
                }
                Err(timeout) => {
                    debug!(depth, %timeout, "iteration aborted");
                    break;
                }
            }

            if !searcher.hit_depth_limit {
                // Every line ended in a terminal state; deeper cannot differ
                outcome.completed = true;
                break;
            }
            depth += 1;
        }

        outcome.nodes = searcher.nodes;
        outcome
    }

    /// Single fixed-depth alpha-beta pass from the root with (-inf, +inf)
    pub fn alphabeta<B: GameBoard>(
        &self,
        state: &B,
        depth: u32,
        time_left: &dyn Fn() -> f64,
    ) -> Result<Option<Move>, SearchTimeout> {
        let moves = ordered_moves(state);
        if moves.is_empty() {
            return Ok(None);
        }
        let deadline = Deadline::new(time_left, self.config.timeout_threshold_ms);
        let mut searcher = Searcher::new(state.active_player(), self.config.heuristic, deadline);
        searcher.alphabeta(state, &moves, depth.max(1))
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Match play - multiple games between two agents
//!
//! Level 2 - Phase-level implementation

use isolation_core::{Board, GameBoard, Move, Player};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{AgentConfig, TournamentConfig};
use crate::game_runner::{Forfeit, GameRunner};

/// Record of one game, from the match's point of view
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    /// Game index within the match
    pub game_index: usize,
    /// Whether the evaluated agent had the first seat
    pub agent_first: bool,
    pub agent_won: bool,
    /// Set when the loser forfeited
    pub forfeit: Option<Forfeit>,
    /// Opening placements followed by the played moves
    pub moves: Vec<Move>,
}

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Evaluated agent
    pub agent: String,
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    /// Losses of the evaluated agent by forfeit
    pub forfeits: u32,
    /// Total games played
    pub games_played: u32,
    /// Individual game records
    pub games: Vec<GameRecord>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty(agent: String, opponent: String) -> Self {
        Self {
            agent,
            opponent,
            wins: 0,
            losses: 0,
            forfeits: 0,
            games_played: 0,
            games: Vec::new(),
        }
    }

    /// Get win rate for the evaluated agent
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }
}

/// Play a match between two agents (Level 2 phase)
///
/// Games come in pairs that share an opening and swap seats. `match_index`
/// decorrelates openings between matches of the same tournament.
pub fn play_match(
    agent: &AgentConfig,
    opponent: &AgentConfig,
    config: &TournamentConfig,
    match_index: u64,
) -> Result<MatchResult, isolation_core::BoardError> {
    let mut result = MatchResult::empty(agent.display_name(), opponent.display_name());
    if config.games_per_match == 0 {
        return Ok(result);
    }

    let board = config.initial_board()?;
    let specs = prepare_game_specs(board, config, match_index);
    let records = if config.parallel {
        specs
            .par_iter()
            .map(|spec| play_single_game(agent, opponent, config, spec))
            .collect::<Vec<_>>()
    } else {
        specs
            .iter()
            .map(|spec| play_single_game(agent, opponent, config, spec))
            .collect()
    };

    for record in records {
        aggregate(&mut result, record);
    }

    tracing::info!(
        "{} vs {}: {}-{} ({} forfeits)",
        result.agent,
        result.opponent,
        result.wins,
        result.losses,
        result.forfeits
    );
    Ok(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Debug)]
struct GameSpec {
    /// Which side the evaluated agent takes
    agent_first: bool,
    /// Game index (for seeding)
    game_index: usize,
    /// Starting position, openings included
    initial: Board,
    opening: Vec<Move>,
}

/// Prepare game configurations for a match
fn prepare_game_specs(board: Board, config: &TournamentConfig, match_index: u64) -> Vec<GameSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(
        config.seed.wrapping_add(match_index.wrapping_mul(1_000_003)),
    );

    let mut specs = Vec::with_capacity(config.games_per_match);
    let mut opening = (board, Vec::new());
    for game_index in 0..config.games_per_match {
        // New opening for every pair
        if game_index % 2 == 0 && config.random_openings {
            opening = random_opening(board, &mut rng);
        }
        specs.push(GameSpec {
            agent_first: game_index % 2 == 0,
            game_index,
            initial: opening.0,
            opening: opening.1.clone(),
        });
    }
    specs
}

/// One random placement for each player
fn random_opening(board: Board, rng: &mut ChaCha8Rng) -> (Board, Vec<Move>) {
    let mut state = board;
    let mut moves = Vec::with_capacity(2);
    for _ in 0..2 {
        match state.active_legal_moves().choose(rng) {
            Some(&mv) => {
                state = state.forecast_move(mv);
                moves.push(mv);
            }
            None => break,
        }
    }
    (state, moves)
}

/// Play a single game of the match
fn play_single_game(
    agent: &AgentConfig,
    opponent: &AgentConfig,
    config: &TournamentConfig,
    spec: &GameSpec,
) -> GameRecord {
    let seed = config.seed.wrapping_add(spec.game_index as u64);
    let mut ours = agent.build(seed);
    let mut theirs = opponent.build(seed.wrapping_add(1));

    let runner = GameRunner::new(config.time_limit());
    let outcome = if spec.agent_first {
        runner.play_game(ours.as_mut(), theirs.as_mut(), spec.initial)
    } else {
        runner.play_game(theirs.as_mut(), ours.as_mut(), spec.initial)
    };

    let agent_seat = if spec.agent_first {
        Player::First
    } else {
        Player::Second
    };
    let agent_won = outcome.winner == agent_seat;

    tracing::debug!(
        "game {}: {} {} as {} in {} moves",
        spec.game_index,
        ours.name(),
        if agent_won { "wins" } else { "loses" },
        agent_seat,
        outcome.moves.len()
    );

    let mut moves = spec.opening.clone();
    moves.extend(outcome.moves);
    GameRecord {
        game_index: spec.game_index,
        agent_first: spec.agent_first,
        agent_won,
        forfeit: outcome.forfeit,
        moves,
    }
}

fn aggregate(result: &mut MatchResult, record: GameRecord) {
    result.games_played += 1;
    if record.agent_won {
        result.wins += 1;
    } else {
        result.losses += 1;
        if record.forfeit.is_some() {
            result.forfeits += 1;
        }
    }
    result.games.push(record);
}

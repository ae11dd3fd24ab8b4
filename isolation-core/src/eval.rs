//! Position evaluation
//!
//! Every heuristic scores a state from one player's point of view (higher is
//! better for that player). Confirmed wins and losses short-circuit to
//! `+inf` / `-inf` before any positional term is computed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Move;
use crate::game::{GameBoard, Player};

/// Heuristic strategy used at search leaves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Own two-ply mobility minus twice the opponent's
    #[default]
    LimitOppMoves,
    /// Stay away from the opponent
    Defensive,
    /// Close in on the opponent
    Offensive,
    /// Mobility difference over Manhattan distance
    Manhattan,
    /// Mobility difference over Euclidean distance
    Euclidean,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::LimitOppMoves,
        Heuristic::Defensive,
        Heuristic::Offensive,
        Heuristic::Manhattan,
        Heuristic::Euclidean,
    ];

    /// Score `state` for `player`
    pub fn score<B: GameBoard>(self, state: &B, player: Player) -> f64 {
        match self {
            Heuristic::LimitOppMoves => limit_opp_moves(state, player),
            Heuristic::Defensive => defensive(state, player),
            Heuristic::Offensive => offensive(state, player),
            Heuristic::Manhattan => manhattan_mobility(state, player),
            Heuristic::Euclidean => euclidean_mobility(state, player),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::LimitOppMoves => "limit-opp-moves",
            Heuristic::Defensive => "defensive",
            Heuristic::Offensive => "offensive",
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic '{0}' (expected one of limit-opp-moves, defensive, offensive, manhattan, euclidean)")]
pub struct ParseHeuristicError(pub String);

impl FromStr for Heuristic {
    type Err = ParseHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseHeuristicError(s.to_string()))
    }
}

// ============================================================================
// SHARED TERMS
// ============================================================================

/// `-inf` for a confirmed loss, `+inf` for a confirmed win
fn terminal_score<B: GameBoard>(state: &B, player: Player) -> Option<f64> {
    if state.is_loser(player) {
        Some(f64::NEG_INFINITY)
    } else if state.is_winner(player) {
        Some(f64::INFINITY)
    } else {
        None
    }
}

/// Own move count minus twice the opponent's
fn move_difference<B: GameBoard>(state: &B, player: Player) -> f64 {
    let own = state.legal_moves(player).len() as f64;
    let opp = state.legal_moves(player.opponent()).len() as f64;
    own - 2.0 * opp
}

fn locations<B: GameBoard>(state: &B, player: Player) -> Option<(Move, Move)> {
    Some((
        state.player_location(player)?,
        state.player_location(player.opponent())?,
    ))
}

/// Legal-move count of `player` plus, for each of those moves, the number of
/// replies available in the forecasted successor
fn two_ply_mobility<B: GameBoard>(state: &B, player: Player) -> usize {
    let moves = state.legal_moves(player);
    moves.len()
        + moves
            .iter()
            .map(|&mv| state.forecast_move(mv).active_legal_moves().len())
            .sum::<usize>()
}

// ============================================================================
// HEURISTICS
// ============================================================================

pub fn limit_opp_moves<B: GameBoard>(state: &B, player: Player) -> f64 {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }
    let own = two_ply_mobility(state, player) as f64;
    let opp = two_ply_mobility(state, player.opponent()) as f64;
    own - 2.0 * opp
}

pub fn defensive<B: GameBoard>(state: &B, player: Player) -> f64 {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }
    match locations(state, player) {
        Some((own, opp)) => (opp.coord_sum() - own.coord_sum()).abs() as f64,
        None => 0.0,
    }
}

pub fn offensive<B: GameBoard>(state: &B, player: Player) -> f64 {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }
    match locations(state, player) {
        Some((own, opp)) => -((opp.coord_sum() - own.coord_sum()).abs() as f64),
        None => 0.0,
    }
}

pub fn manhattan_mobility<B: GameBoard>(state: &B, player: Player) -> f64 {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }
    let Some((own, opp)) = locations(state, player) else {
        return 0.0;
    };
    let dist = own.manhattan_distance(opp);
    if dist == 0 {
        return 0.0;
    }
    move_difference(state, player) / dist as f64
}

pub fn euclidean_mobility<B: GameBoard>(state: &B, player: Player) -> f64 {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }
    let Some((own, opp)) = locations(state, player) else {
        return 0.0;
    };
    let dist = own.euclidean_distance(opp);
    if dist == 0.0 {
        return 0.0;
    }
    move_difference(state, player) / dist
}

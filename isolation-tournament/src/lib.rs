//! Isolation Tournament - Agent evaluation through game playing
//!
//! This crate provides tournament infrastructure:
//! - Agent configuration (serde-loadable, compact CLI specs)
//! - Single games under a per-turn clock, with forfeits
//! - Matches with shared random openings and seat swapping
//! - Tournaments of test agents against an opponent pool
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod game_runner;
mod match_play;
mod tournament;

pub use config::{AgentConfig, ConfigError, PlayerType, TournamentConfig};
pub use game_runner::{Forfeit, GameOutcome, GameRunner};
pub use match_play::{play_match, GameRecord, MatchResult};
pub use tournament::{run_tournament, run_tournament_with, Standing, TournamentResult};

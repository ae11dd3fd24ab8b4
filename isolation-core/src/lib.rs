//! Isolation Core - Game engine and AI
//!
//! This crate provides the core logic for Isolation agents:
//! - Board geometry (cells, knight jumps, distances)
//! - Game state, rule-engine interface and move generation
//! - Pluggable positional heuristics
//! - Search deadline and wall-clock turn timer
//! - Depth-limited minimax and iterative-deepening alpha-beta
//! - Agent trait with baseline players

pub mod board;
pub mod game;
pub mod eval;
pub mod deadline;
pub mod ai;
pub mod agent;

// Re-exports for convenient access
pub use board::{Move, KNIGHT_DIRECTIONS, DEFAULT_WIDTH, DEFAULT_HEIGHT};
pub use game::{Board, BoardError, GameBoard, GameResult, Player};
pub use eval::{Heuristic, ParseHeuristicError};
pub use deadline::{Deadline, SearchTimeout, TurnTimer, DEFAULT_TIMEOUT_THRESHOLD_MS};
pub use ai::{AlphaBetaPlayer, MinimaxPlayer, SearchConfig, SearchOutcome, DEFAULT_SEARCH_DEPTH};
pub use agent::{Agent, GreedyPlayer, RandomPlayer};

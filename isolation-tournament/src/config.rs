//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use rustc_hash::FxHashSet;
use isolation_core::{
    Agent, AlphaBetaPlayer, Board, BoardError, GreedyPlayer, Heuristic, MinimaxPlayer,
    ParseHeuristicError, RandomPlayer, SearchConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("empty agent spec")]
    EmptySpec,

    #[error("unknown player type '{0}' (expected minimax, alphabeta, random or greedy)")]
    UnknownPlayerType(String),

    #[error(transparent)]
    Heuristic(#[from] ParseHeuristicError),

    #[error("invalid search depth '{0}'")]
    BadDepth(String),

    #[error("agent spec '{0}' has too many parts (expected kind[:heuristic[:depth]])")]
    TooManyParts(String),

    #[error("tournament needs at least one test agent and one opponent")]
    NoAgents,

    #[error("test agent name '{0}' is used more than once (set distinct names)")]
    DuplicateAgent(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Player type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// Fixed-depth minimax
    Minimax,
    /// Iterative-deepening alpha-beta
    #[default]
    AlphaBeta,
    /// Uniformly random legal moves
    Random,
    /// One-ply heuristic lookahead
    Greedy,
}

impl PlayerType {
    pub fn name(self) -> &'static str {
        match self {
            PlayerType::Minimax => "minimax",
            PlayerType::AlphaBeta => "alphabeta",
            PlayerType::Random => "random",
            PlayerType::Greedy => "greedy",
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "mm" => Ok(PlayerType::Minimax),
            "alphabeta" | "ab" => Ok(PlayerType::AlphaBeta),
            "random" => Ok(PlayerType::Random),
            "greedy" => Ok(PlayerType::Greedy),
            _ => Err(ConfigError::UnknownPlayerType(s.to_string())),
        }
    }
}

/// AI configuration for one participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Display name (derived from the settings when absent)
    pub name: Option<String>,
    /// Player type
    pub player_type: PlayerType,
    /// Search settings (ignored by random agents)
    pub search: SearchConfig,
    /// Random seed for reproducibility (random agents only)
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: None,
            player_type: PlayerType::AlphaBeta,
            search: SearchConfig::default(),
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Create config for fixed-depth minimax
    pub fn minimax(heuristic: Heuristic, depth: u32) -> Self {
        Self {
            player_type: PlayerType::Minimax,
            search: SearchConfig::default().with_heuristic(heuristic).with_depth(depth),
            ..Default::default()
        }
    }

    /// Create config for iterative-deepening alpha-beta
    pub fn alpha_beta(heuristic: Heuristic) -> Self {
        Self {
            player_type: PlayerType::AlphaBeta,
            search: SearchConfig::default().with_heuristic(heuristic),
            ..Default::default()
        }
    }

    pub fn random() -> Self {
        Self {
            player_type: PlayerType::Random,
            ..Default::default()
        }
    }

    pub fn greedy(heuristic: Heuristic) -> Self {
        Self {
            player_type: PlayerType::Greedy,
            search: SearchConfig::default().with_heuristic(heuristic),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap iterative deepening (alpha-beta only)
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.search.max_depth = Some(max_depth);
        self
    }

    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let search = &self.search;
        match self.player_type {
            PlayerType::Minimax => format!("minimax-{}-d{}", search.heuristic, search.search_depth),
            PlayerType::AlphaBeta => format!("alphabeta-{}", search.heuristic),
            PlayerType::Random => "random".to_string(),
            PlayerType::Greedy => format!("greedy-{}", search.heuristic),
        }
    }

    /// Build a fresh agent. `fallback_seed` is used when no seed is configured.
    pub fn build(&self, fallback_seed: u64) -> Box<dyn Agent> {
        let name = self.display_name();
        match self.player_type {
            PlayerType::Minimax => Box::new(MinimaxPlayer::new(self.search.clone()).with_name(name)),
            PlayerType::AlphaBeta => {
                Box::new(AlphaBetaPlayer::new(self.search.clone()).with_name(name))
            }
            PlayerType::Random => {
                Box::new(RandomPlayer::new(self.seed.unwrap_or(fallback_seed)).with_name(name))
            }
            PlayerType::Greedy => {
                Box::new(GreedyPlayer::new(self.search.heuristic).with_name(name))
            }
        }
    }

    /// Parse a compact `kind[:heuristic[:depth]]` spec, e.g.
    /// `alphabeta:manhattan` or `minimax:defensive:3`
    pub fn parse_spec(spec: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
        let (kind, rest) = match parts.split_first() {
            Some((kind, rest)) if !kind.is_empty() => (*kind, rest),
            _ => return Err(ConfigError::EmptySpec),
        };
        if rest.len() > 2 {
            return Err(ConfigError::TooManyParts(spec.to_string()));
        }

        let mut config = AgentConfig {
            player_type: kind.parse()?,
            ..Default::default()
        };
        if let Some(heuristic) = rest.first() {
            config.search.heuristic = heuristic.parse()?;
        }
        if let Some(depth) = rest.get(1) {
            config.search.search_depth = depth
                .parse()
                .ok()
                .filter(|&d: &u32| d > 0)
                .ok_or_else(|| ConfigError::BadDepth(depth.to_string()))?;
        }
        Ok(config)
    }
}

/// Tournament configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of games per match (pairs share an opening and swap seats)
    pub games_per_match: usize,
    /// Per-turn budget in milliseconds
    pub time_limit_ms: u64,
    pub board_width: u8,
    pub board_height: u8,
    /// Start every pair of games from two random placements
    pub random_openings: bool,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed for openings and random agents
    pub seed: u64,
    /// Agents being evaluated
    pub test_agents: Vec<AgentConfig>,
    /// Fixed opponent pool
    pub opponents: Vec<AgentConfig>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games_per_match: 10,
            time_limit_ms: 150,
            board_width: DEFAULT_WIDTH,
            board_height: DEFAULT_HEIGHT,
            random_openings: true,
            // Threads compete for the clock
            parallel: false,
            seed: 42,
            test_agents: Heuristic::ALL.into_iter().map(AgentConfig::alpha_beta).collect(),
            opponents: vec![
                AgentConfig::random(),
                AgentConfig::greedy(Heuristic::LimitOppMoves),
                AgentConfig::minimax(Heuristic::Defensive, 3),
                AgentConfig::minimax(Heuristic::Offensive, 3),
                AgentConfig::alpha_beta(Heuristic::Manhattan).with_name("alphabeta-baseline"),
            ],
        }
    }
}

impl TournamentConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tournament config: {}", path.display()))?;
        let config: TournamentConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tournament config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.test_agents.is_empty() || self.opponents.is_empty() {
            return Err(ConfigError::NoAgents);
        }
        // Standings are keyed by name
        let mut seen = FxHashSet::default();
        for agent in &self.test_agents {
            let name = agent.display_name();
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateAgent(name));
            }
        }
        self.initial_board()?;
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    /// Empty board of the configured size
    pub fn initial_board(&self) -> Result<Board, BoardError> {
        Board::new(self.board_width, self.board_height)
    }

    pub fn with_games(mut self, games_per_match: usize) -> Self {
        self.games_per_match = games_per_match;
        self
    }

    pub fn with_time_limit(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    pub fn with_agents(mut self, test_agents: Vec<AgentConfig>, opponents: Vec<AgentConfig>) -> Self {
        self.test_agents = test_agents;
        self.opponents = opponents;
        self
    }
}

//! Tournament execution - every test agent against the opponent pool
//!
//! Level 1 - Orchestration and Level 2 - Phases

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::{ConfigError, TournamentConfig};
use crate::match_play::{play_match, MatchResult};

/// Standing of a test agent in the tournament
#[derive(Clone, Debug, Default, Serialize)]
pub struct Standing {
    /// Agent display name
    pub name: String,
    /// Total wins
    pub wins: u32,
    /// Total losses
    pub losses: u32,
    /// Losses by forfeit
    pub forfeits: u32,
    /// Games played
    pub games_played: u32,
}

impl Standing {
    /// Win rate
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }
}

/// Result of a tournament
#[derive(Clone, Debug, Serialize)]
pub struct TournamentResult {
    /// Final standings sorted by win rate (descending)
    pub standings: Vec<Standing>,
    /// All match results, test agent major
    pub matches: Vec<MatchResult>,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get standing for a specific agent
    pub fn standing_for(&self, name: &str) -> Option<&Standing> {
        self.standings.iter().find(|s| s.name == name)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a tournament (Level 1 orchestration)
///
/// # Arguments
/// * `config` - Tournament configuration, including both agent lists
///
/// # Returns
/// Tournament results with final standings
pub fn run_tournament(config: &TournamentConfig) -> Result<TournamentResult, ConfigError> {
    run_tournament_with(config, |_| {})
}

/// Run a tournament, calling `on_match` after every finished match
pub fn run_tournament_with<F>(
    config: &TournamentConfig,
    on_match: F,
) -> Result<TournamentResult, ConfigError>
where
    F: FnMut(&MatchResult),
{
    config.validate()?;

    let matches = execute_all_matches(config, on_match)?;
    let standings = compute_standings(&matches);

    Ok(TournamentResult { standings, matches })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

fn execute_all_matches<F>(
    config: &TournamentConfig,
    mut on_match: F,
) -> Result<Vec<MatchResult>, ConfigError>
where
    F: FnMut(&MatchResult),
{
    let mut matches = Vec::with_capacity(config.test_agents.len() * config.opponents.len());
    let mut match_index = 0u64;

    for agent in &config.test_agents {
        tracing::info!("Evaluating {}", agent.display_name());
        for opponent in &config.opponents {
            let result = play_match(agent, opponent, config, match_index)?;
            on_match(&result);
            matches.push(result);
            match_index += 1;
        }
    }
    Ok(matches)
}

/// Aggregate match results per test agent, preserving first-seen order for ties.
/// Test agent names are unique after `TournamentConfig::validate`.
fn compute_standings(matches: &[MatchResult]) -> Vec<Standing> {
    let mut order: Vec<String> = Vec::new();
    let mut table: FxHashMap<String, Standing> = FxHashMap::default();

    for m in matches {
        let standing = table.entry(m.agent.clone()).or_insert_with(|| {
            order.push(m.agent.clone());
            Standing {
                name: m.agent.clone(),
                ..Default::default()
            }
        });
        standing.wins += m.wins;
        standing.losses += m.losses;
        standing.forfeits += m.forfeits;
        standing.games_played += m.games_played;
    }

    let mut standings: Vec<Standing> = order
        .iter()
        .filter_map(|name| table.remove(name))
        .collect();
    // Stable sort keeps configuration order among equal win rates
    standings.sort_by(|a, b| {
        b.win_rate()
            .partial_cmp(&a.win_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    standings
}

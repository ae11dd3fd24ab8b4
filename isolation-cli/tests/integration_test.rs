//! Integration tests for the Isolation agents
//!
//! Tests the full stack: rules, heuristics, both search engines, the turn
//! clock and tournament play

use std::cell::Cell;
use std::time::{Duration, Instant};

use isolation_core::{
    Agent, AlphaBetaPlayer, Board, GameBoard, Heuristic, MinimaxPlayer, Move,
    SearchConfig, SearchTimeout, TurnTimer,
};
use isolation_tournament::{run_tournament, AgentConfig, Forfeit, GameRunner, TournamentConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn unlimited() -> f64 {
    f64::INFINITY
}

/// Both players placed, first player to move
fn opened_board() -> Board {
    Board::default()
        .forecast_move(Move::new(3, 3))
        .forecast_move(Move::new(0, 0))
}

/// Play `plies` random moves from `board`
fn random_position(board: Board, plies: usize, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = board;
    for _ in 0..plies {
        match state.active_legal_moves().choose(&mut rng) {
            Some(&mv) => state = state.forecast_move(mv),
            None => break,
        }
    }
    state
}

// ============================================================================
// RULES
// ============================================================================

#[test]
fn test_game_to_completion_with_validated_moves() {
    let mut state = Board::new(5, 5).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    while let Some(&mv) = state.active_legal_moves().choose(&mut rng) {
        state = state.apply_move(mv).unwrap();
    }
    let loser = state.active_player();
    assert!(state.is_loser(loser));
    assert!(state.is_winner(loser.opponent()));
    assert_eq!(state.utility(loser), f64::NEG_INFINITY);
    assert_eq!(state.utility(loser.opponent()), f64::INFINITY);
}

// ============================================================================
// SEARCH ENGINES
// ============================================================================

#[test]
fn test_minimax_on_small_board() {
    // 3x3, players in opposite corners
    let board = Board::new(3, 3)
        .unwrap()
        .forecast_move(Move::new(0, 0))
        .forecast_move(Move::new(2, 2));
    let player = MinimaxPlayer::new(SearchConfig::default().with_depth(1));
    let mv = player.get_move(&board, &unlimited);
    assert!(mv.is_some_and(|m| board.active_legal_moves().contains(&m)));
}

#[test]
fn test_engines_agree_at_fixed_depth() {
    for seed in 0..6 {
        let board = random_position(opened_board(), 4, seed);
        for heuristic in Heuristic::ALL {
            let config = SearchConfig::default().with_heuristic(heuristic);
            let mm = MinimaxPlayer::new(config.clone());
            let ab = AlphaBetaPlayer::new(config);
            for depth in 1..=3 {
                assert_eq!(
                    mm.minimax(&board, depth, &unlimited).unwrap(),
                    ab.alphabeta(&board, depth, &unlimited).unwrap(),
                    "seed {seed}, {heuristic}, depth {depth}"
                );
            }
        }
    }
}

#[test]
fn test_timeout_propagates_from_raw_searches() {
    let board = opened_board();
    let expired = || 0.0;
    let mm = MinimaxPlayer::new(SearchConfig::default());
    let ab = AlphaBetaPlayer::new(SearchConfig::default());
    assert!(matches!(mm.minimax(&board, 3, &expired), Err(SearchTimeout { .. })));
    assert!(matches!(ab.alphabeta(&board, 3, &expired), Err(SearchTimeout { .. })));
    // Engines absorb the timeout
    assert_eq!(ab.get_move(&board, &expired), None);
}

#[test]
fn test_iterative_deepening_respects_real_clock() {
    let board = opened_board();
    let player = AlphaBetaPlayer::new(SearchConfig::default().with_threshold(10.0));
    let timer = TurnTimer::start(Duration::from_millis(100));
    let time_left = || timer.time_left_ms();

    let start = Instant::now();
    let outcome = player.search(&board, &time_left);
    assert!(start.elapsed() < Duration::from_millis(100));
    assert!(outcome.completed_depth >= 1);
    assert!(outcome
        .best_move
        .is_some_and(|m| board.active_legal_moves().contains(&m)));
}

#[test]
fn test_deepening_is_monotone_in_budget() {
    let board = opened_board();
    let player = AlphaBetaPlayer::new(SearchConfig::default());
    let depth_with_budget = |budget: u64| {
        let calls = Cell::new(0u64);
        let time_left = || {
            calls.set(calls.get() + 1);
            if calls.get() > budget {
                0.0
            } else {
                1_000.0
            }
        };
        player.search(&board, &time_left).completed_depth
    };

    let small = depth_with_budget(200);
    let large = depth_with_budget(5_000);
    assert!(small <= large, "{small} > {large}");
}

// ============================================================================
// GAMES AND TOURNAMENTS
// ============================================================================

#[test]
fn test_alphabeta_vs_minimax_game() {
    let runner = GameRunner::new(Duration::from_secs(2));
    let mut ab = AlphaBetaPlayer::new(SearchConfig::default().with_max_depth(3));
    let mut mm = MinimaxPlayer::new(SearchConfig::default().with_depth(2));
    let outcome = runner.play_game(&mut ab, &mut mm, Board::new(5, 5).unwrap());

    assert!(outcome.forfeit.is_none(), "{:?}", outcome.forfeit);
    assert!(outcome.final_state.is_loser(outcome.loser()));
}

#[test]
fn test_agents_from_specs_play_full_game() {
    let first = AgentConfig::parse_spec("alphabeta:offensive").unwrap().with_max_depth(2);
    let second = AgentConfig::parse_spec("minimax:euclidean:1").unwrap();
    let mut a: Box<dyn Agent> = first.build(0);
    let mut b: Box<dyn Agent> = second.build(1);

    let runner = GameRunner::new(Duration::from_secs(2));
    let outcome = runner.play_game(a.as_mut(), b.as_mut(), Board::new(5, 5).unwrap());
    assert_ne!(outcome.forfeit, Some(Forfeit::NoMove));
    assert_eq!(
        outcome.final_state.move_count() as usize,
        outcome.moves.len()
    );
    if outcome.forfeit.is_none() {
        assert!(outcome.final_state.is_loser(outcome.loser()));
    }
}

#[test]
fn test_small_tournament() {
    let config = TournamentConfig {
        board_width: 5,
        board_height: 5,
        time_limit_ms: 2_000,
        ..Default::default()
    }
    .with_games(2)
    .with_agents(
        vec![AgentConfig::alpha_beta(Heuristic::LimitOppMoves).with_max_depth(2)],
        vec![AgentConfig::random(), AgentConfig::greedy(Heuristic::Defensive)],
    );

    let result = run_tournament(&config).unwrap();
    assert_eq!(result.matches.len(), 2);
    let standing = result.standing_for("alphabeta-limit-opp-moves").unwrap();
    assert_eq!(standing.games_played, 4);
    assert_eq!(standing.wins + standing.losses, 4);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["standings"][0]["games_played"], 4);
}

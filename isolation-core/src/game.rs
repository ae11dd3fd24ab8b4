//! Game state and move generation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Move, DEFAULT_HEIGHT, DEFAULT_WIDTH, KNIGHT_DIRECTIONS, MAX_CELLS};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "player 1"),
            Player::Second => write!(f, "player 2"),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    FirstWins,
    SecondWins,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::FirstWins => Some(Player::First),
            GameResult::SecondWins => Some(Player::Second),
        }
    }

    pub fn won_by(player: Player) -> Self {
        match player {
            Player::First => GameResult::FirstWins,
            Player::Second => GameResult::SecondWins,
        }
    }
}

/// Rule engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must have at least one cell, got {width}x{height}")]
    Empty { width: u8, height: u8 },

    #[error("board {width}x{height} exceeds {max} cells")]
    TooLarge { width: u8, height: u8, max: usize },

    #[error("cell {0} is outside the board")]
    OutOfBounds(Move),

    #[error("cell {0} is already blocked")]
    Blocked(Move),

    #[error("{mv} is not a legal move for {player}")]
    IllegalMove { player: Player, mv: Move },
}

// ============================================================================
// RULE ENGINE INTERFACE
// ============================================================================

/// Queries and transitions the search engines need from a two-player grid
/// game. States are values: `forecast_move` returns a new state and never
/// mutates the receiver.
pub trait GameBoard: Clone {
    /// Player to move
    fn active_player(&self) -> Player;

    /// Moves available to `player`; empty when it is stuck
    fn legal_moves(&self, player: Player) -> Vec<Move>;

    /// Whether `player` can move at all
    fn has_legal_moves(&self, player: Player) -> bool {
        !self.legal_moves(player).is_empty()
    }

    /// Moves available to the player to move
    fn active_legal_moves(&self) -> Vec<Move> {
        self.legal_moves(self.active_player())
    }

    /// State after the active player moves to `mv`
    fn forecast_move(&self, mv: Move) -> Self;

    fn is_winner(&self, player: Player) -> bool;

    fn is_loser(&self, player: Player) -> bool;

    /// Terminal payoff for `player`: `+inf` win, `-inf` loss, `0` otherwise
    fn utility(&self, player: Player) -> f64 {
        if self.is_winner(player) {
            f64::INFINITY
        } else if self.is_loser(player) {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    }

    /// Cell occupied by `player`, `None` before its first move
    fn player_location(&self, player: Player) -> Option<Move>;
}

// ============================================================================
// ISOLATION BOARD
// ============================================================================

/// Isolation game state (copy to mutate).
///
/// Each player's first move may go to any open cell; later moves jump like a
/// chess knight. Every visited cell stays blocked. The player to move loses
/// when it has nowhere to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,

    /// Bit `row * width + col` set when the cell can no longer be entered
    blocked: u64,

    /// Current cell of each player, indexed by `Player`
    locations: [Option<Move>; 2],

    active: Player,

    move_count: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            blocked: 0,
            locations: [None, None],
            active: Player::First,
            move_count: 0,
        }
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board of the given size with `Player::First` to move
    pub fn new(width: u8, height: u8) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::Empty { width, height });
        }
        if width as usize * height as usize > MAX_CELLS {
            return Err(BoardError::TooLarge {
                width,
                height,
                max: MAX_CELLS,
            });
        }
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    /// Mark extra cells as blocked (obstacles, scenario setup)
    pub fn with_blocked(mut self, cells: &[Move]) -> Result<Self, BoardError> {
        for &cell in cells {
            if !self.in_bounds(cell) {
                return Err(BoardError::OutOfBounds(cell));
            }
            if self.is_blocked(cell) {
                return Err(BoardError::Blocked(cell));
            }
            self.blocked |= self.bit(cell);
        }
        Ok(self)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of moves played so far
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn in_bounds(&self, cell: Move) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as u8) < self.height
            && (cell.col as u8) < self.width
    }

    /// Visited or obstructed; cells off the board are never blocked
    pub fn is_blocked(&self, cell: Move) -> bool {
        self.in_bounds(cell) && self.blocked & self.bit(cell) != 0
    }

    /// In bounds and never visited
    pub fn is_open(&self, cell: Move) -> bool {
        self.in_bounds(cell) && !self.is_blocked(cell)
    }

    /// All open cells in row-major order
    pub fn open_cells(&self) -> Vec<Move> {
        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for row in 0..self.height as i8 {
            for col in 0..self.width as i8 {
                let cell = Move::new(row, col);
                if !self.is_blocked(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    pub fn result(&self) -> GameResult {
        let active = self.active;
        if !self.has_legal_moves(active) {
            GameResult::won_by(active.opponent())
        } else {
            GameResult::Ongoing
        }
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Validated transition: the active player moves to `mv`
    pub fn apply_move(&self, mv: Move) -> Result<Board, BoardError> {
        if !self.in_bounds(mv) {
            return Err(BoardError::OutOfBounds(mv));
        }
        if !self.legal_moves(self.active).contains(&mv) {
            return Err(BoardError::IllegalMove {
                player: self.active,
                mv,
            });
        }
        Ok(self.forecast_move(mv))
    }

    fn bit(&self, cell: Move) -> u64 {
        1u64 << (cell.row as u32 * self.width as u32 + cell.col as u32)
    }
}

impl GameBoard for Board {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves(&self, player: Player) -> Vec<Move> {
        match self.locations[player.index()] {
            None => self.open_cells(),
            Some(from) => KNIGHT_DIRECTIONS
                .iter()
                .map(|&(dr, dc)| from.offset(dr, dc))
                .filter(|&cell| self.is_open(cell))
                .collect(),
        }
    }

    /// Non-allocating check on the bitboard
    fn has_legal_moves(&self, player: Player) -> bool {
        match self.locations[player.index()] {
            None => {
                (self.blocked.count_ones() as usize) < self.width as usize * self.height as usize
            }
            Some(from) => KNIGHT_DIRECTIONS
                .iter()
                .any(|&(dr, dc)| self.is_open(from.offset(dr, dc))),
        }
    }

    fn forecast_move(&self, mv: Move) -> Board {
        debug_assert!(self.is_open(mv), "forecast onto closed cell {mv}");
        let mut next = *self;
        next.blocked |= self.bit(mv);
        next.locations[self.active.index()] = Some(mv);
        next.active = self.active.opponent();
        next.move_count += 1;
        next
    }

    fn is_winner(&self, player: Player) -> bool {
        self.active == player.opponent() && !self.has_legal_moves(self.active)
    }

    fn is_loser(&self, player: Player) -> bool {
        self.active == player && !self.has_legal_moves(player)
    }

    fn player_location(&self, player: Player) -> Option<Move> {
        self.locations[player.index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.locations[Player::First.index()];
        let second = self.locations[Player::Second.index()];

        for row in 0..self.height as i8 {
            write!(f, "|")?;
            for col in 0..self.width as i8 {
                let cell = Move::new(row, col);
                let mark = if first == Some(cell) {
                    '1'
                } else if second == Some(cell) {
                    '2'
                } else if self.is_blocked(cell) {
                    '-'
                } else {
                    ' '
                };
                write!(f, " {mark} |")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: Board, moves: &[(i8, i8)]) -> Board {
        moves
            .iter()
            .fold(board, |b, &mv| b.apply_move(mv.into()).unwrap())
    }

    #[test]
    fn test_board_size_limits() {
        assert!(Board::new(7, 7).is_ok());
        assert!(Board::new(8, 8).is_ok());
        assert!(matches!(Board::new(9, 8), Err(BoardError::TooLarge { .. })));
        assert!(matches!(Board::new(0, 3), Err(BoardError::Empty { .. })));
    }

    #[test]
    fn test_opening_moves_are_all_open_cells() {
        let board = Board::new(3, 3).unwrap();
        assert_eq!(board.active_legal_moves().len(), 9);

        let board = board.forecast_move(Move::new(1, 1));
        // Second player may go anywhere but the occupied centre
        let moves = board.active_legal_moves();
        assert_eq!(moves.len(), 8);
        assert!(!moves.contains(&Move::new(1, 1)));
    }

    #[test]
    fn test_knight_moves() {
        let board = play(Board::default(), &[(3, 3), (0, 0)]);
        let mut moves = board.legal_moves(Player::First);
        moves.sort();
        assert_eq!(moves.len(), 8);
        assert_eq!(moves[0], Move::new(1, 2));

        // Corner has two exits
        assert_eq!(board.legal_moves(Player::Second).len(), 2);
    }

    #[test]
    fn test_forecast_does_not_mutate() {
        let board = play(Board::default(), &[(3, 3), (0, 0)]);
        let before = board;
        let next = board.forecast_move(Move::new(1, 2));
        assert_eq!(board, before);
        assert_eq!(next.player_location(Player::First), Some(Move::new(1, 2)));
        assert!(next.is_blocked(Move::new(3, 3)));
        assert_eq!(next.active_player(), Player::Second);
        assert_eq!(next.move_count(), 3);
    }

    #[test]
    fn test_apply_move_rejects_illegal() {
        let board = play(Board::default(), &[(3, 3), (0, 0)]);
        assert!(matches!(
            board.apply_move(Move::new(3, 4)),
            Err(BoardError::IllegalMove { player: Player::First, .. })
        ));
        assert!(matches!(
            board.apply_move(Move::new(9, 9)),
            Err(BoardError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_terminal_detection() {
        // 3x3: first at (0,0), second at (1,1). First's exits are (1,2),(2,1)
        let board = Board::new(3, 3)
            .unwrap()
            .forecast_move(Move::new(0, 0))
            .forecast_move(Move::new(1, 1))
            .with_blocked(&[Move::new(1, 2), Move::new(2, 1)])
            .unwrap();

        assert_eq!(board.active_player(), Player::First);
        assert!(board.is_loser(Player::First));
        assert!(board.is_winner(Player::Second));
        assert!(!board.is_winner(Player::First));
        assert_eq!(board.utility(Player::First), f64::NEG_INFINITY);
        assert_eq!(board.utility(Player::Second), f64::INFINITY);
        assert_eq!(board.result(), GameResult::SecondWins);
    }

    #[test]
    fn test_has_legal_moves_matches_move_list() {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..20 {
            let mut board = Board::new(4, 4).unwrap();
            loop {
                for player in [Player::First, Player::Second] {
                    assert_eq!(
                        board.has_legal_moves(player),
                        !board.legal_moves(player).is_empty(),
                        "{player}\n{board}"
                    );
                }
                match board.active_legal_moves().choose(&mut rng) {
                    Some(&mv) => board = board.forecast_move(mv),
                    None => break,
                }
            }
        }

        // Unplaced player on a fully blocked board
        let cells: Vec<Move> = (0..2)
            .flat_map(|r| (0..2).map(move |c| Move::new(r, c)))
            .collect();
        let full = Board::new(2, 2).unwrap().with_blocked(&cells).unwrap();
        assert!(!full.has_legal_moves(Player::First));
        assert!(full.is_loser(Player::First));
    }

    #[test]
    fn test_utility_is_zero_while_ongoing() {
        let board = play(Board::default(), &[(3, 3), (0, 0)]);
        assert_eq!(board.utility(Player::First), 0.0);
        assert_eq!(board.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_with_blocked_validation() {
        let board = Board::new(3, 3).unwrap();
        assert!(matches!(
            board.with_blocked(&[Move::new(3, 0)]),
            Err(BoardError::OutOfBounds(_))
        ));
        assert!(matches!(
            board.with_blocked(&[Move::new(0, 0), Move::new(0, 0)]),
            Err(BoardError::Blocked(_))
        ));
    }

    #[test]
    fn test_display() {
        let board = play(Board::new(3, 3).unwrap(), &[(0, 0), (2, 2)]);
        let text = board.to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().contains('1'));
        assert!(text.lines().last().unwrap().contains('2'));
    }
}

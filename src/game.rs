//! The game state machine.
//!
//! A `Game` is either not started (layout mode, where tiles may be blocked)
//! or in progress (a cursor sits on the last lit tile). Moves slide the cursor
//! over consecutive `Off` tiles, lighting each one, and stop in front of the
//! first tile that is `On` or `Blocked`.

use std::fmt;

use tracing::debug;

use crate::direction::{DirSet, Direction};
use crate::error::GameError;
use crate::grid::{Grid, Tile};

/// A playable coordinate, `(x, y)` with both components starting at 1.
pub type Pos = (usize, usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    InProgress,
}

#[derive(Clone, Debug)]
pub struct Game {
    /// The board being played.
    pub(crate) live: Grid,
    /// Layout captured by `start`, restored by `reset`.
    pub(crate) layout: Grid,
    pub(crate) cursor: Option<Pos>,
}

impl Game {
    /// Creates an empty board of the given size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(height: usize, width: usize) -> Self {
        let live = Grid::new(height, width);
        Self {
            layout: live.clone(),
            live,
            cursor: None,
        }
    }

    pub fn height(&self) -> usize {
        self.live.height()
    }

    pub fn width(&self) -> usize {
        self.live.width()
    }

    /// The tile at (x, y) on the live board. Border coordinates are allowed.
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.live.get(x, y)
    }

    pub fn cursor(&self) -> Option<Pos> {
        self.cursor
    }

    /// Cursor column, or 0 when no game is in progress.
    pub fn x(&self) -> usize {
        self.cursor.map_or(0, |(x, _)| x)
    }

    /// Cursor row, or 0 when no game is in progress.
    pub fn y(&self) -> usize {
        self.cursor.map_or(0, |(_, y)| y)
    }

    pub fn state(&self) -> GameState {
        if self.cursor.is_some() {
            GameState::InProgress
        } else {
            GameState::NotStarted
        }
    }

    pub fn has_started(&self) -> bool {
        self.cursor.is_some()
    }

    /// Number of unlit tiles on the live board.
    pub fn off_count(&self) -> usize {
        self.live.count(Tile::Off)
    }

    /// Marks (x, y) as blocked. Only allowed before the game starts.
    pub fn set_blocked(&mut self, x: usize, y: usize) -> Result<(), GameError> {
        if self.has_started() {
            debug!(x, y, "refusing to block a tile during a game");
            return Err(GameError::AlreadyStarted);
        }
        if !self.live.in_range(x, y) {
            debug!(x, y, "refusing to block a tile outside the board");
            return Err(GameError::OutOfRange { x, y });
        }
        self.live.set(x, y, Tile::Blocked);
        Ok(())
    }

    /// Starts a game at (x, y), which must be an `Off` tile on the board.
    pub fn start(&mut self, x: usize, y: usize) -> Result<(), GameError> {
        if self.has_started() {
            debug!(x, y, "game has already started");
            return Err(GameError::AlreadyStarted);
        }
        if !self.live.in_range(x, y) {
            return Err(GameError::OutOfRange { x, y });
        }
        if self.live.get(x, y) != Tile::Off {
            return Err(GameError::TileUnavailable { x, y });
        }

        self.layout.copy_from(&self.live);
        self.live.set(x, y, Tile::On);
        self.cursor = Some((x, y));
        Ok(())
    }

    /// Directions whose neighbouring tile is still `Off`.
    ///
    /// Empty when no game is in progress. Empty during a game means the game
    /// is over; `have_won` tells a win from a loss.
    pub fn valid_dirs(&self) -> DirSet {
        let Some((x, y)) = self.cursor else {
            return DirSet::EMPTY;
        };
        Direction::ALL
            .into_iter()
            .filter(|&dir| {
                let (nx, ny) = step(x, y, dir);
                self.live.get(nx, ny) == Tile::Off
            })
            .collect()
    }

    /// Slides once in `dir`, lighting every `Off` tile on the way.
    pub fn move_dir(&mut self, dir: Direction) -> Result<(), GameError> {
        self.check_move(dir)?;
        self.slide(dir);
        Ok(())
    }

    /// Like `move_dir`, but keeps sliding for as long as exactly one direction
    /// remains valid.
    pub fn move_fast(&mut self, dir: Direction) -> Result<(), GameError> {
        self.check_move(dir)?;
        let mut dir = dir;
        loop {
            self.slide(dir);
            match self.valid_dirs().single() {
                Some(forced) => dir = forced,
                None => return Ok(()),
            }
        }
    }

    /// True if no tile in the bordered buffer is `Off`.
    pub fn have_won(&self) -> bool {
        !self.live.contains(Tile::Off)
    }

    /// Restores the layout captured at `start` and leaves the game. Does
    /// nothing when no game is in progress.
    pub fn reset(&mut self) {
        if self.has_started() {
            self.live.copy_from(&self.layout);
            self.cursor = None;
        }
    }

    fn check_move(&self, dir: Direction) -> Result<(), GameError> {
        if !self.has_started() {
            debug!(%dir, "move requested before the game started");
            return Err(GameError::NotStarted);
        }
        let valid = self.valid_dirs();
        if !DirSet::from(dir).is_subset(valid) {
            debug!(%dir, %valid, "invalid move");
            return Err(GameError::InvalidMove { dir, valid });
        }
        Ok(())
    }

    fn slide(&mut self, dir: Direction) {
        let Some((mut x, mut y)) = self.cursor else {
            return;
        };
        loop {
            let (nx, ny) = step(x, y, dir);
            if self.live.get(nx, ny) != Tile::Off {
                break;
            }
            x = nx;
            y = ny;
            self.live.set(x, y, Tile::On);
        }
        self.cursor = Some((x, y));
    }
}

/// Neighbour of (x, y) in `dir`. Only called on playable or cursor
/// coordinates, whose neighbours always lie inside the padded buffer.
#[inline(always)]
fn step(x: usize, y: usize, dir: Direction) -> Pos {
    let (dx, dy) = dir.offset();
    (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy))
}

/// Draws the board with `+-+` rules between tiles.
///
/// `O` is off, `X` is on, `#` is blocked and `*` marks the cursor.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("+{}", "-+".repeat(self.width()));
        for y in 1..=self.height() {
            writeln!(f, "{rule}")?;
            f.write_str("|")?;
            for x in 1..=self.width() {
                let symbol = if self.cursor == Some((x, y)) {
                    '*'
                } else {
                    self.tile(x, y).symbol()
                };
                write!(f, "{symbol}|")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Snapshot of every tile on the live board, border included.
    fn tiles(game: &Game) -> Vec<Tile> {
        let mut out = Vec::new();
        for y in 0..game.height() + 2 {
            for x in 0..game.width() + 2 {
                out.push(game.tile(x, y));
            }
        }
        out
    }

    #[test]
    fn test_start_and_solve() {
        // +--+--+--+
        // |St|  |  |
        // +--+--+--+
        // |  |  |  |
        // +--+--+--+
        let mut game = Game::new(2, 3);
        assert_eq!(game.height(), 2);
        assert_eq!(game.width(), 3);
        assert_eq!(game.state(), GameState::NotStarted);

        game.start(1, 1).unwrap();
        assert!(game.has_started());
        assert_eq!(game.cursor(), Some((1, 1)));

        game.move_dir(Direction::Right).unwrap();
        assert_eq!((game.x(), game.y()), (3, 1));

        game.move_dir(Direction::Down).unwrap();
        assert_eq!((game.x(), game.y()), (3, 2));

        game.move_dir(Direction::Left).unwrap();
        assert_eq!((game.x(), game.y()), (1, 2));

        assert!(game.valid_dirs().is_empty());
        assert!(game.have_won());
    }

    #[test]
    fn test_invalid_operations() {
        let mut game = Game::new(2, 3);
        assert_eq!(
            game.set_blocked(3, 3),
            Err(GameError::OutOfRange { x: 3, y: 3 })
        );
        game.set_blocked(3, 2).unwrap();
        assert_eq!(game.start(3, 3), Err(GameError::OutOfRange { x: 3, y: 3 }));
        assert_eq!(
            game.start(3, 2),
            Err(GameError::TileUnavailable { x: 3, y: 2 })
        );
        game.start(3, 1).unwrap();
        assert_eq!(game.start(3, 1), Err(GameError::AlreadyStarted));
        assert_eq!(game.set_blocked(3, 1), Err(GameError::AlreadyStarted));
    }

    #[test]
    fn test_border_coordinates_are_rejected() {
        let mut game = Game::new(2, 2);
        assert!(game.set_blocked(0, 1).is_err());
        assert!(game.start(1, 0).is_err());
        assert!(game.start(3, 1).is_err());
        assert_eq!(game.state(), GameState::NotStarted);
    }

    #[test]
    fn test_start_then_have_won_only_on_single_tile_board() {
        for height in 1..=4 {
            for width in 1..=4 {
                let mut game = Game::new(height, width);
                game.start(1, 1).unwrap();
                assert_eq!(
                    game.have_won(),
                    height * width == 1,
                    "{height}x{width} board"
                );
            }
        }
    }

    #[test]
    fn test_valid_dirs_before_start_is_empty() {
        let game = Game::new(3, 3);
        assert!(game.valid_dirs().is_empty());
    }

    #[test]
    fn test_invalid_move_does_not_mutate() {
        let mut game = Game::new(3, 3);
        game.start(1, 1).unwrap();
        let before = tiles(&game);

        for dir in [Direction::Up, Direction::Left] {
            assert!(matches!(
                game.move_dir(dir),
                Err(GameError::InvalidMove { .. })
            ));
            assert!(game.move_fast(dir).is_err());
        }
        assert_eq!(tiles(&game), before);
        assert_eq!(game.cursor(), Some((1, 1)));
    }

    #[test]
    fn test_move_before_start_fails() {
        let mut game = Game::new(3, 3);
        assert_eq!(game.move_dir(Direction::Down), Err(GameError::NotStarted));
        assert_eq!(game.move_fast(Direction::Down), Err(GameError::NotStarted));
    }

    #[test]
    fn test_move_stops_at_lit_tile() {
        let mut game = Game::new(1, 5);
        game.start(3, 1).unwrap();
        game.move_dir(Direction::Right).unwrap();
        assert_eq!(game.cursor(), Some((5, 1)));
        game.move_dir(Direction::Left).unwrap_err();
        assert!(game.valid_dirs().is_empty());
        assert!(!game.have_won());
    }

    #[test]
    fn test_move_fast_follows_forced_turns() {
        // From the top-left corner of an open 3x3 board every turn after the
        // first move is forced, spiralling into the centre.
        let mut game = Game::new(3, 3);
        game.start(1, 1).unwrap();
        game.move_fast(Direction::Right).unwrap();
        assert_eq!(game.cursor(), Some((2, 2)));
        assert!(game.valid_dirs().is_empty());
        assert!(game.have_won());
    }

    #[test]
    fn test_move_fast_stops_at_fork() {
        let mut game = Game::new(3, 3);
        game.start(2, 2).unwrap();
        assert_eq!(game.valid_dirs().len(), 4);
        game.move_fast(Direction::Up).unwrap();
        assert_eq!(game.cursor(), Some((2, 1)));
        assert_eq!(
            game.valid_dirs(),
            DirSet::from(Direction::Left) | Direction::Right
        );
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut game = Game::new(2, 3);
        game.set_blocked(2, 2).unwrap();
        let layout = tiles(&game);

        game.start(1, 1).unwrap();
        game.move_fast(Direction::Right).unwrap();
        assert_ne!(tiles(&game), layout);

        game.reset();
        assert_eq!(tiles(&game), layout);
        assert_eq!(game.cursor(), None);
        assert_eq!((game.x(), game.y()), (0, 0));

        // no-op when nothing is in progress
        game.reset();
        assert_eq!(tiles(&game), layout);
    }

    #[test]
    fn test_live_board_only_gains_lit_tiles() {
        let mut game = Game::new(3, 4);
        game.set_blocked(2, 2).unwrap();
        game.start(1, 1).unwrap();
        let layout = game.layout.clone();
        game.move_fast(Direction::Down).unwrap();

        for y in 0..5 {
            for x in 0..6 {
                match (layout.get(x, y), game.tile(x, y)) {
                    (before, after) if before == after => {}
                    (Tile::Off, Tile::On) => {}
                    (before, after) => panic!("({x}, {y}) went {before:?} -> {after:?}"),
                }
            }
        }
    }

    #[test]
    fn test_display_marks_cursor() {
        let mut game = Game::new(2, 3);
        game.set_blocked(2, 2).unwrap();
        game.start(1, 1).unwrap();
        game.move_dir(Direction::Right).unwrap();
        insta::assert_snapshot!(game.to_string(), @r"
        +-+-+-+
        |X|X|*|
        +-+-+-+
        |O|#|O|
        +-+-+-+
        ");
    }
}

//! Light-up Puzzle Engine
//!
//! A single-player grid puzzle: pick a starting tile, then repeatedly slide
//! in a direction until something is in the way, lighting every tile passed.
//! The board is won once every non-blocked tile is lit.
//!
//! This crate holds the engine: the board state machine ([`Game`]), an
//! exhaustive solver, a random layout generator and the hex layout codec.
//!
//! ```
//! use lightgame::{Direction, Game};
//!
//! let mut game = Game::new(2, 3);
//! assert!(game.is_solvable(None));
//!
//! game.start(1, 1).unwrap();
//! game.move_fast(Direction::Right).unwrap();
//! assert!(game.have_won());
//! assert_eq!(Game::new(5, 7).encode(), "57000000000");
//! ```

pub mod codec;
pub mod direction;
pub mod error;
pub mod game;
pub mod generator;
pub mod grid;
pub mod solver;

pub use codec::{decode, encode, LAYOUT_TOO_LARGE};
pub use direction::{DirSet, Direction};
pub use error::{DecodeError, GameError, ParseDirectionError};
pub use game::{Game, GameState, Pos};
pub use generator::{generate_layout, Budget};
pub use grid::{Grid, Tile};
pub use solver::{winning_starts, Solution};

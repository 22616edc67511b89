//! Random construction of solvable layouts.
//!
//! Both entry points are generate-and-test loops: propose a random layout,
//! run the solver, and retry until a solvable one turns up. Nothing bounds how
//! long that takes, and for some inputs (an unsolvable starting layout, or a
//! block count that leaves no solvable arrangement) it never finishes. Pass a
//! [`Budget`] other than `Unbounded` to cap the work.
//!
//! Randomness always comes from the caller's `Rng`, so a seeded generator
//! gives reproducible layouts.

use std::ops::RangeInclusive;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::error::GameError;
use crate::game::Game;
use crate::grid::{Grid, Tile};

/// Limit on how many layouts a generator may try.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Budget {
    /// Keep trying forever.
    #[default]
    Unbounded,
    /// Give up after this many candidate layouts.
    Attempts(u64),
    /// Give up once this instant has passed. Checked before each attempt.
    Deadline(Instant),
}

impl Budget {
    fn allows(&self, attempts: u64) -> bool {
        match *self {
            Budget::Unbounded => true,
            Budget::Attempts(max) => attempts < max,
            Budget::Deadline(deadline) => Instant::now() < deadline,
        }
    }
}

/// Owns the layout as it was before augmentation started.
///
/// Until `commit` is called, dropping the guard puts the original layout back
/// on the live board.
struct AugmentScratch<'a> {
    game: &'a mut Game,
    original: Grid,
    committed: bool,
}

impl<'a> AugmentScratch<'a> {
    fn acquire(game: &'a mut Game) -> Self {
        Self {
            original: game.live.clone(),
            committed: false,
            game,
        }
    }

    /// Puts the original layout back on the live board for the next attempt.
    fn restore(&mut self) {
        self.game.live.copy_from(&self.original);
    }

    /// Keeps the current live board as the new layout.
    fn commit(mut self) {
        self.game.layout.copy_from(&self.game.live);
        self.committed = true;
    }
}

impl Drop for AugmentScratch<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.game.live.copy_from(&self.original);
        }
    }
}

impl Game {
    /// Blocks `n` more tiles at random so that the layout stays solvable.
    ///
    /// Requires that no game is in progress and that `0 < n < off_count()`.
    /// May loop forever when no solvable placement exists; see
    /// [`Game::augment_randomly_within`] for a bounded variant.
    pub fn augment_randomly<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
    ) -> Result<(), GameError> {
        self.augment_randomly_within(n, rng, Budget::Unbounded)
    }

    /// Like [`Game::augment_randomly`], but gives up with
    /// [`GameError::BudgetExhausted`] once `budget` runs out. The layout is
    /// unchanged on every error.
    pub fn augment_randomly_within<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
        budget: Budget,
    ) -> Result<(), GameError> {
        if self.has_started() {
            debug!("refusing to augment during a game");
            return Err(GameError::AlreadyStarted);
        }
        let free = self.off_count();
        if n == 0 || n >= free {
            debug!(n, free, "bad block count");
            return Err(GameError::BadBlockCount { requested: n, free });
        }

        let mut markers = vec![Tile::Off; free];
        markers[..n].fill(Tile::Blocked);

        let mut scratch = AugmentScratch::acquire(self);
        let mut attempts = 0u64;

        while budget.allows(attempts) {
            attempts += 1;
            markers.shuffle(rng);
            scratch.restore();

            let free_tiles = scratch
                .game
                .live
                .tiles_mut()
                .iter_mut()
                .filter(|tile| **tile == Tile::Off);
            for (tile, &marker) in free_tiles.zip(&markers) {
                *tile = marker;
            }

            if scratch.game.is_solvable(None) {
                info!(n, attempts, code = %scratch.game.encode(), "augmented layout");
                scratch.commit();
                return Ok(());
            }
            trace!(attempts, "augmented layout is not solvable");
        }

        debug!(n, attempts, "augmentation budget exhausted");
        Err(GameError::BudgetExhausted { attempts })
    }
}

/// Builds a random solvable `height` x `width` layout.
///
/// Each attempt starts from an empty board and blocks a number of tiles drawn
/// uniformly from `blocks`, each at a uniformly drawn position. Positions may
/// repeat, so fewer distinct tiles can end up blocked.
///
/// # Panics
///
/// Panics if either dimension is zero or `blocks` is empty.
pub fn generate_layout<R: Rng + ?Sized>(
    height: usize,
    width: usize,
    blocks: RangeInclusive<usize>,
    rng: &mut R,
    budget: Budget,
) -> Result<Game, GameError> {
    assert!(!blocks.is_empty(), "block range must not be empty");

    let mut attempts = 0u64;
    while budget.allows(attempts) {
        attempts += 1;
        let mut game = Game::new(height, width);
        let n = rng.gen_range(blocks.clone());
        for _ in 0..n {
            let x = rng.gen_range(1..=width);
            let y = rng.gen_range(1..=height);
            game.set_blocked(x, y)?;
        }

        if game.is_solvable(None) {
            info!(height, width, attempts, code = %game.encode(), "generated layout");
            return Ok(game);
        }
        trace!(attempts, "generated layout is not solvable");
    }

    debug!(height, width, attempts, "generation budget exhausted");
    Err(GameError::BudgetExhausted { attempts })
}

//! Exhaustive winnability search.
//!
//! For each candidate start the solver walks the tree of fast-move choices
//! depth first, using an explicit stack of frames instead of recursion. A
//! fast move can light an arbitrarily long run of tiles, so stepping back is
//! done by replaying the recorded path from a fresh start rather than by
//! undoing moves. That costs O(depth) moves per visited node, which is fine
//! for the board sizes this game is played on.
//!
//! The search mutates the caller's board while it runs. A scratch guard saves
//! the live buffer and cursor up front and puts them back when it drops, so
//! callers never see the intermediate states, even on early return.

use std::fmt;
use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::direction::{DirSet, Direction};
use crate::game::{Game, Pos};
use crate::grid::Grid;

/// A winning start together with the fast moves that light the whole board.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution {
    pub start: Pos,
    pub moves: Vec<Direction>,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.start;
        write!(f, "from ({x}, {y}) move [")?;
        for (i, dir) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{dir}")?;
        }
        f.write_str("]")
    }
}

/// Whether to stop at the first win or collect every one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchMode {
    FindAny,
    EnumerateAll,
}

/// Distinct starting positions among a list of solutions.
pub fn winning_starts(solutions: &[Solution]) -> FxHashSet<Pos> {
    solutions.iter().map(|solution| solution.start).collect()
}

/// Owns the solver's copy of the caller's board for one invocation.
///
/// Dereferences to the game being searched and restores the saved live
/// buffer and cursor on drop.
struct SolverScratch<'a> {
    game: &'a mut Game,
    saved: Grid,
    cursor: Option<Pos>,
}

impl<'a> SolverScratch<'a> {
    fn acquire(game: &'a mut Game) -> Self {
        Self {
            saved: game.live.clone(),
            cursor: game.cursor,
            game,
        }
    }
}

impl Deref for SolverScratch<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        self.game
    }
}

impl DerefMut for SolverScratch<'_> {
    fn deref_mut(&mut self) -> &mut Game {
        self.game
    }
}

impl Drop for SolverScratch<'_> {
    fn drop(&mut self) {
        self.game.live.copy_from(&self.saved);
        self.game.cursor = self.cursor;
    }
}

/// One node of the search tree.
#[derive(Clone, Copy)]
struct Frame {
    /// Move that led here; `None` for the root.
    dir: Option<Direction>,
    /// Valid directions after that move. Empty means the game ended here.
    children: DirSet,
    /// Index into `Direction::ALL` of the next direction to try.
    next: usize,
}

impl Frame {
    fn new(dir: Option<Direction>, children: DirSet) -> Self {
        Self {
            dir,
            children,
            next: 0,
        }
    }
}

struct Solver<'a> {
    game: SolverScratch<'a>,
    frames: Vec<Frame>,
    mode: SearchMode,
}

impl<'a> Solver<'a> {
    fn new(game: &'a mut Game, mode: SearchMode) -> Self {
        Self {
            game: SolverScratch::acquire(game),
            frames: Vec::with_capacity(64),
            mode,
        }
    }

    /// Tries every start in row-major order.
    fn solve_all(&mut self, solutions: &mut Vec<Solution>) -> bool {
        let (height, width) = (self.game.height(), self.game.width());
        let mut winning_starts = 0usize;

        for y in 1..=height {
            for x in 1..=width {
                if self.solve_from(x, y, solutions) {
                    if self.mode == SearchMode::FindAny {
                        return true;
                    }
                    winning_starts += 1;
                }
            }
        }

        debug!(winning_starts, solutions = solutions.len(), "search finished");
        winning_starts > 0
    }

    /// Searches every fast-move sequence starting at (x, y).
    fn solve_from(&mut self, x: usize, y: usize, solutions: &mut Vec<Solution>) -> bool {
        self.game.reset();
        if self.game.start(x, y).is_err() {
            return false;
        }

        self.frames.clear();
        self.frames.push(Frame::new(None, self.game.valid_dirs()));
        let mut found = false;

        while let Some(&frame) = self.frames.last() {
            if frame.children.is_empty() {
                if self.game.have_won() {
                    found = true;
                    match self.mode {
                        SearchMode::FindAny => return true,
                        SearchMode::EnumerateAll => {
                            let solution = self.current_solution(x, y);
                            trace!(%solution, "found solution");
                            solutions.push(solution);
                        }
                    }
                }
                self.frames.pop();
                continue;
            }

            if frame.next == Direction::ALL.len() {
                self.frames.pop();
                continue;
            }

            let dir = Direction::ALL[frame.next];
            if let Some(top) = self.frames.last_mut() {
                top.next += 1;
            }
            if !frame.children.contains(dir) {
                continue;
            }

            self.replay(x, y, dir);
            let children = self.game.valid_dirs();
            self.frames.push(Frame::new(Some(dir), children));
        }

        found
    }

    /// Rebuilds the board for the current path plus `next`.
    ///
    /// # Panics
    ///
    /// Panics if the recorded path no longer replays. Every frame on the
    /// stack was reached by the same moves on the same layout, so a failure
    /// means the board was corrupted mid-search.
    fn replay(&mut self, x: usize, y: usize, next: Direction) {
        let Self { game, frames, .. } = self;

        game.reset();
        if let Err(e) = game.start(x, y) {
            panic!("solver replay diverged: bad start at ({x}, {y}): {e}");
        }
        let path = frames.iter().filter_map(|frame| frame.dir);
        for dir in path.chain(std::iter::once(next)) {
            if let Err(e) = game.move_fast(dir) {
                panic!("solver replay diverged from ({x}, {y}): {e}");
            }
        }
    }

    fn current_solution(&self, x: usize, y: usize) -> Solution {
        Solution {
            start: (x, y),
            moves: self.frames.iter().filter_map(|frame| frame.dir).collect(),
        }
    }
}

impl Game {
    /// Returns whether the current layout can be won from some start.
    ///
    /// Any game in progress is ignored for the search and left as it was.
    /// With `Some(solutions)`, every solution from every start is appended in
    /// row-major start order; otherwise the search stops at the first win.
    pub fn is_solvable(&mut self, collect: Option<&mut Vec<Solution>>) -> bool {
        match collect {
            Some(solutions) => Solver::new(self, SearchMode::EnumerateAll).solve_all(solutions),
            None => Solver::new(self, SearchMode::FindAny).solve_all(&mut Vec::new()),
        }
    }

    /// Every solution of the current layout.
    pub fn solutions(&mut self) -> Vec<Solution> {
        let mut solutions = Vec::new();
        self.is_solvable(Some(&mut solutions));
        solutions
    }

    /// Returns whether the current layout can be won starting at (x, y).
    pub fn is_solvable_from(&mut self, x: usize, y: usize) -> bool {
        Solver::new(self, SearchMode::FindAny).solve_from(x, y, &mut Vec::new())
    }

    /// Every solution starting at (x, y).
    pub fn solutions_from(&mut self, x: usize, y: usize) -> Vec<Solution> {
        let mut solutions = Vec::new();
        Solver::new(self, SearchMode::EnumerateAll).solve_from(x, y, &mut solutions);
        solutions
    }
}

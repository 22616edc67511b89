//! Cardinal directions and sets of directions.
//!
//! Iteration order is always Up, Down, Left, Right. The solver relies on this
//! order when it breaks ties between alternatives, so solutions come out in
//! the same order on every run.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::ParseDirectionError;

/// One of the four directions a move can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row offsets of one step in this direction.
    ///
    /// Rows grow downwards, so `Up` decrements y.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 8,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// A set of directions, stored as a 4-bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirSet(u8);

impl DirSet {
    pub const EMPTY: DirSet = DirSet(0);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Returns true if every member of `self` is also in `other`.
    #[inline]
    pub const fn is_subset(self, other: DirSet) -> bool {
        self.0 & other.0 == self.0
    }

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The only member of a one-element set, `None` for any other size.
    pub fn single(self) -> Option<Direction> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Members in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&dir| self.contains(dir))
    }
}

impl From<Direction> for DirSet {
    fn from(dir: Direction) -> Self {
        DirSet(dir.bit())
    }
}

impl FromIterator<Direction> for DirSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirSet::EMPTY;
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl BitOr for DirSet {
    type Output = DirSet;

    fn bitor(self, rhs: DirSet) -> DirSet {
        DirSet(self.0 | rhs.0)
    }
}

impl BitOr<Direction> for DirSet {
    type Output = DirSet;

    fn bitor(self, rhs: Direction) -> DirSet {
        DirSet(self.0 | rhs.bit())
    }
}

impl BitOrAssign<Direction> for DirSet {
    fn bitor_assign(&mut self, rhs: Direction) {
        self.insert(rhs);
    }
}

impl fmt::Display for DirSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, dir) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dir}")?;
        }
        f.write_str("]")
    }
}

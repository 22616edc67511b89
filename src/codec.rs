//! Hex layout codes for saving and sharing boards.
//!
//! Format: one hex digit for the height, one for the width, then one bit per
//! playable tile in row-major order, four bits per digit with the first tile
//! in the most significant bit. A set bit means the tile is blocked; the last
//! digit is padded with zero bits. Only the layout is stored, never lit tiles
//! or the cursor.
//!
//! A 5x7 board has 35 tiles and so needs 9 layout digits: an empty one
//! encodes as `57000000000`.

use std::str::FromStr;

use crate::error::DecodeError;
use crate::game::Game;
use crate::grid::Tile;

/// Returned by [`encode`] for boards whose sides don't fit in one hex digit.
pub const LAYOUT_TOO_LARGE: &str = "[layout too large]";

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

const BITS_PER_DIGIT: usize = 4;

/// Number of layout digits for a board with `tiles` playable tiles.
#[inline]
pub const fn layout_digits(tiles: usize) -> usize {
    tiles.div_ceil(BITS_PER_DIGIT)
}

/// Encodes the board layout, or returns [`LAYOUT_TOO_LARGE`] if either side
/// is 16 or more.
pub fn encode(game: &Game) -> String {
    let (height, width) = (game.height(), game.width());
    if height >= 16 || width >= 16 {
        return LAYOUT_TOO_LARGE.to_string();
    }

    let mut nibbles = vec![0u8; layout_digits(height * width)];
    for y in 1..=height {
        for x in 1..=width {
            if game.tile(x, y) == Tile::Blocked {
                let bit = (y - 1) * width + (x - 1);
                nibbles[bit / BITS_PER_DIGIT] |= 0b1000 >> (bit % BITS_PER_DIGIT);
            }
        }
    }

    let mut code = String::with_capacity(2 + nibbles.len());
    code.push(HEX_DIGITS[height] as char);
    code.push(HEX_DIGITS[width] as char);
    code.extend(nibbles.iter().map(|&nibble| HEX_DIGITS[nibble as usize] as char));
    code
}

/// Decodes a layout code into a fresh, not yet started board.
///
/// Hex digits may be upper or lower case.
pub fn decode(code: &str) -> Result<Game, DecodeError> {
    let digits: Vec<char> = code.chars().collect();
    if digits.len() < 2 {
        return Err(DecodeError::TooShort);
    }

    let height = parse_digit(&digits, 0)? as usize;
    let width = parse_digit(&digits, 1)? as usize;
    if height == 0 || width == 0 {
        return Err(DecodeError::EmptyBoard);
    }

    let expected = layout_digits(height * width);
    let found = digits.len() - 2;
    if found != expected {
        return Err(DecodeError::LengthMismatch { expected, found });
    }

    let nibbles = (2..digits.len())
        .map(|index| parse_digit(&digits, index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut game = Game::new(height, width);
    for bit in 0..height * width {
        if nibbles[bit / BITS_PER_DIGIT] & (0b1000 >> (bit % BITS_PER_DIGIT)) != 0 {
            let (x, y) = (bit % width + 1, bit / width + 1);
            game.live.set(x, y, Tile::Blocked);
        }
    }
    Ok(game)
}

fn parse_digit(digits: &[char], index: usize) -> Result<u8, DecodeError> {
    let found = digits[index];
    found
        .to_digit(16)
        .map(|digit| digit as u8)
        .ok_or(DecodeError::BadDigit { index, found })
}

impl Game {
    /// Shorthand for [`encode`].
    pub fn encode(&self) -> String {
        encode(self)
    }
}

impl FromStr for Game {
    type Err = DecodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        decode(code)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn assert_same_layout(a: &Game, b: &Game) {
        assert_eq!((a.height(), a.width()), (b.height(), b.width()));
        for y in 1..=a.height() {
            for x in 1..=a.width() {
                assert_eq!(
                    a.tile(x, y) == Tile::Blocked,
                    b.tile(x, y) == Tile::Blocked,
                    "at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_empty_5x7() {
        assert_eq!(encode(&Game::new(5, 7)), "57000000000");
    }

    #[test]
    fn test_first_tile_is_most_significant_bit() {
        let mut game = Game::new(1, 4);
        game.set_blocked(1, 1).unwrap();
        assert_eq!(game.encode(), "148");

        let mut game = Game::new(2, 3);
        game.set_blocked(3, 1).unwrap();
        game.set_blocked(2, 2).unwrap();
        // bits 001 010 -> 0010 10(00)
        assert_eq!(game.encode(), "2328");
    }

    #[test]
    fn test_too_large() {
        assert_eq!(encode(&Game::new(16, 3)), LAYOUT_TOO_LARGE);
        assert_eq!(encode(&Game::new(3, 16)), LAYOUT_TOO_LARGE);
        assert_eq!(encode(&Game::new(15, 15)).len(), 2 + 57);
    }

    #[test]
    fn test_lit_tiles_are_not_encoded() {
        let mut game = Game::new(2, 3);
        game.set_blocked(2, 2).unwrap();
        let layout = game.encode();
        game.start(1, 1).unwrap();
        game.move_fast(crate::Direction::Right).unwrap();
        assert_eq!(game.encode(), layout);
    }

    #[test]
    fn test_roundtrip_augmented_layouts() {
        let mut rng = ChaCha8Rng::seed_from_u64(1001);
        let mut game = Game::new(5, 7);
        for n in [3, 5, 4] {
            game.augment_randomly(n, &mut rng).unwrap();
            let loaded = decode(&game.encode()).unwrap();
            assert_same_layout(&game, &loaded);
            assert!(!loaded.has_started());
        }
    }

    #[test]
    fn test_roundtrip_all_sizes() {
        // a diagonal-ish pattern that touches first, last and padded bits
        for height in 1..=15 {
            for width in 1..=15 {
                let mut game = Game::new(height, width);
                for y in 1..=height {
                    for x in 1..=width {
                        if (x * 3 + y * 5) % 7 == 0 || (x, y) == (width, height) {
                            game.set_blocked(x, y).unwrap();
                        }
                    }
                }
                let code = game.encode();
                assert_eq!(code.len(), 2 + layout_digits(height * width));
                let loaded: Game = code.parse().unwrap();
                assert_same_layout(&game, &loaded);
            }
        }
    }

    #[test]
    fn test_decode_accepts_lower_case() {
        let game = decode("1f0008").unwrap();
        assert_eq!((game.height(), game.width()), (1, 15));
        assert_eq!(game.tile(13, 1), Tile::Blocked);
        assert_eq!(game.off_count(), 14);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("").unwrap_err(), DecodeError::TooShort);
        assert_eq!(decode("5").unwrap_err(), DecodeError::TooShort);
        assert_eq!(
            decode("5x000000000").unwrap_err(),
            DecodeError::BadDigit {
                index: 1,
                found: 'x'
            }
        );
        assert_eq!(
            decode("5700000000").unwrap_err(),
            DecodeError::LengthMismatch {
                expected: 9,
                found: 8
            }
        );
        assert_eq!(
            decode("570000000000").unwrap_err(),
            DecodeError::LengthMismatch {
                expected: 9,
                found: 10
            }
        );
        assert_eq!(
            decode("5700000g000").unwrap_err(),
            DecodeError::BadDigit {
                index: 7,
                found: 'g'
            }
        );
        assert_eq!(decode("07").unwrap_err(), DecodeError::EmptyBoard);
        assert_eq!(LAYOUT_TOO_LARGE.parse::<Game>().unwrap_err(), DecodeError::BadDigit {
            index: 0,
            found: '['
        });
    }
}

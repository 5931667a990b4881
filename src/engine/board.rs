//! Mailbox board representation.
//!
//! `Board` stores piece placement as an 8×8 grid of `Option<Piece>` (row 0 at
//! the top, black's side) together with the auxiliary state the validator
//! needs: side to move, castling flags, and the destination of the most
//! recent pawn move.

use crate::engine::types::{CastlingFlags, Color, Coord, EngineError, Piece, PieceKind};

/// The standard starting position, as the presentation layer draws it.
const STARTING_LAYOUT: &str = "\
rnbqkbnr
pppppppp
........
........
........
........
PPPPPPPP
RNBQKBNR";

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A complete game position: grid plus auxiliary move-legality state.
///
/// Invariant: exactly one king of each color is present. Code that needs the
/// king's square uses [`Board::king_coord`], which treats a missing king as a
/// corrupted position and panics rather than recovering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Has-moved flags consulted by the castling pattern.
    pub castling: CastlingFlags,

    /// Destination of the most recent pawn move — any pawn move, not just
    /// double-steps. Cleared by every non-pawn move. This is what the
    /// en-passant pattern is matched against.
    pub last_pawn_move: Option<Coord>,
}

impl Board {
    /// Standard starting position, White to move.
    pub fn starting() -> Self {
        Self::from_layout(STARTING_LAYOUT, Color::White).expect("starting layout is always valid")
    }

    /// Parse a board from an 8-line text layout: one row per line, top row
    /// first, `.` for empty squares, piece symbols as in
    /// [`Piece::from_symbol`]. Spaces inside a line are ignored so layouts
    /// may be written padded. Validates exactly one king per side.
    pub fn from_layout(text: &str, side_to_move: Color) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if rows.len() != 8 {
            return Err(EngineError::InvalidLayout(format!(
                "expected 8 rows, got {}",
                rows.len()
            )));
        }

        let mut squares = [[None; 8]; 8];
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            if cells.len() != 8 {
                return Err(EngineError::InvalidLayout(format!(
                    "row {} has {} squares instead of 8",
                    row,
                    cells.len()
                )));
            }
            for (col, &ch) in cells.iter().enumerate() {
                squares[row][col] = match ch {
                    '.' => None,
                    _ => Some(Piece::from_symbol(ch).ok_or_else(|| {
                        EngineError::InvalidLayout(format!("invalid piece symbol '{ch}'"))
                    })?),
                };
            }
        }

        let board = Board {
            squares,
            side_to_move,
            castling: CastlingFlags::new(),
            last_pawn_move: None,
        };

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces()
                .filter(|(_, p)| p.color == color && p.kind == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(EngineError::InvalidLayout(format!(
                    "{color} has {kings} kings (expected 1)"
                )));
            }
        }

        Ok(board)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a square?
    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<Piece> {
        self.squares[c.row as usize][c.col as usize]
    }

    /// Iterate over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        (0..8u8).flat_map(move |row| {
            (0..8u8).filter_map(move |col| {
                let coord = Coord::new(row, col);
                self.piece_at(coord).map(|p| (coord, p))
            })
        })
    }

    /// Find the king square for the given color.
    ///
    /// Panics if the king is absent: the position is corrupted and the game
    /// cannot meaningfully continue.
    pub fn king_coord(&self, color: Color) -> Coord {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(coord, _)| coord)
            .unwrap_or_else(|| panic!("{color} king missing from board:\n{}", self.board_string()))
    }

    // -----------------------------------------------------------------------
    // Mutation (low-level; legality is the caller's concern)
    // -----------------------------------------------------------------------

    /// Place a piece on a square, overwriting whatever was there.
    #[inline]
    pub fn place(&mut self, c: Coord, piece: Piece) {
        self.squares[c.row as usize][c.col as usize] = Some(piece);
    }

    /// Empty a square.
    #[inline]
    pub fn clear(&mut self, c: Coord) {
        self.squares[c.row as usize][c.col as usize] = None;
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// The grid as 8 strings of 8 symbols each, top row first — the same
    /// shape [`Board::from_layout`] parses, used for event snapshots.
    pub fn layout_rows(&self) -> [String; 8] {
        std::array::from_fn(|row| {
            (0..8)
                .map(|col| {
                    self.squares[row][col]
                        .map(|p| p.symbol())
                        .unwrap_or('.')
                })
                .collect()
        })
    }

    /// Render the board with rank/file labels (rank 8 at the top), useful
    /// for debugging and terminal display.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Coord::new(row, col)) {
                    Some(p) => p.symbol(),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

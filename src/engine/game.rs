//! Stateful game controller wrapping Board.
//!
//! `Game` owns the live position and performs move application: the board
//! write, promotion, castling side effects, en-passant bookkeeping, turn
//! alternation, and the post-move check scan. It is the type the session
//! layer interacts with.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::board::Board;
use crate::engine::rules;
use crate::engine::types::{
    CastleSide, Color, Coord, EngineError, GameStatus, Piece, PieceKind,
};

// =========================================================================
// PromotionChooser
// =========================================================================

/// Seam through which the presentation layer supplies a promotion choice.
///
/// `choose` returns the player's raw input character ('q', 'r', 'b' or 'n',
/// either case) or `None` for a cancelled prompt. Anything unparseable
/// defaults to a queen, and the applied-move effects record that the default
/// kicked in so a notice can be surfaced.
pub trait PromotionChooser {
    fn choose(&mut self, at: Coord, color: Color) -> Option<char>;
}

/// Chooser that always promotes to a queen without asking anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoQueen;

impl PromotionChooser for AutoQueen {
    fn choose(&mut self, _at: Coord, _color: Color) -> Option<char> {
        Some('q')
    }
}

// =========================================================================
// AppliedMove
// =========================================================================

/// Everything that happened while applying one legal move, for the event
/// layer to report. The captured piece, if any, is not recorded — it is
/// simply overwritten, and there is no history or undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    /// The piece as submitted (pre-promotion).
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
    /// The kind now standing on `to` if the move promoted.
    pub promoted_to: Option<PieceKind>,
    /// True when the promotion choice was invalid or cancelled and the
    /// queen default was used.
    pub promotion_defaulted: bool,
    /// Which wing the king castled on, if this was a castling move.
    pub castled: Option<CastleSide>,
    /// Whether the move matched the en-passant pattern. Informational: the
    /// passed pawn stays on the board.
    pub en_passant: bool,
    /// The side now in check, if the post-move scan found one. Always the
    /// new side to move; play continues regardless.
    pub check_against: Option<Color>,
    /// Whose turn it is after this move.
    pub side_to_move: Color,
}

// =========================================================================
// Game
// =========================================================================

/// A hot-seat chess game: live board, status, and metadata.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    status: GameStatus,

    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Fresh game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Game starting from an arbitrary position.
    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            status: GameStatus::Active,
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    /// Whether the game has ended (clock expiry is the only terminal state).
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Board snapshot for event payloads.
    pub fn layout_rows(&self) -> [String; 8] {
        self.board.layout_rows()
    }

    // -----------------------------------------------------------------
    // Move submission
    // -----------------------------------------------------------------

    /// Validate and apply a move.
    ///
    /// Rejections carry their reason but mutate nothing; the caller decides
    /// which reasons become user-facing notices (wrong turn) and which stay
    /// silent (geometrically illegal moves).
    pub fn submit_move(
        &mut self,
        piece: Piece,
        from: Coord,
        to: Coord,
        chooser: &mut dyn PromotionChooser,
    ) -> Result<AppliedMove, EngineError> {
        if self.status.is_game_over() {
            return Err(EngineError::GameFinished {
                status: self.status,
            });
        }
        if piece.color != self.board.side_to_move {
            return Err(EngineError::NotYourTurn {
                side_to_move: self.board.side_to_move,
            });
        }
        if !rules::is_legal_move(&self.board, piece, from, to) {
            return Err(EngineError::IllegalMove {
                piece: piece.symbol(),
                from,
                to,
            });
        }
        Ok(self.apply(piece, from, to, chooser))
    }

    /// Mark the game lost on time for `loser`. Later calls are no-ops once
    /// a terminal state is reached.
    pub fn forfeit_on_time(&mut self, loser: Color) {
        if self.status == GameStatus::Active {
            self.status = GameStatus::TimedOut { loser };
        }
    }

    // -----------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------

    /// Apply an already-validated move and all of its side effects.
    fn apply(
        &mut self,
        piece: Piece,
        from: Coord,
        to: Coord,
        chooser: &mut dyn PromotionChooser,
    ) -> AppliedMove {
        // The en-passant pattern must be read before the move record below
        // overwrites it.
        let en_passant = rules::is_en_passant(&self.board, piece, from, to);

        // ---- Board write: destination takes the piece, origin empties.
        // Whatever stood on the destination is gone for good. ----
        self.board.clear(from);
        self.board.place(to, piece);

        // ---- Promotion ----
        let mut promoted_to = None;
        let mut promotion_defaulted = false;
        if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row() {
            let kind = match chooser
                .choose(to, piece.color)
                .and_then(PieceKind::promotion_from_char)
            {
                Some(kind) => kind,
                None => {
                    promotion_defaulted = true;
                    PieceKind::Queen
                }
            };
            self.board.place(to, Piece::new(piece.color, kind));
            promoted_to = Some(kind);
        }

        // ---- Castling flags and rook relocation ----
        let mut castled = None;
        match piece.kind {
            PieceKind::King => {
                self.board.castling.mark_king_moved(piece.color);
                if from.row == piece.color.back_row() && from.col == 4 {
                    if let Some(side) = CastleSide::from_king_target_col(to.col)
                        && from.col.abs_diff(to.col) == 2
                    {
                        let rook_from = Coord::new(from.row, side.rook_home_col());
                        let rook_to = Coord::new(from.row, side.rook_target_col());
                        self.board.clear(rook_from);
                        self.board
                            .place(rook_to, Piece::new(piece.color, PieceKind::Rook));
                        self.board.castling.mark_rook_moved(piece.color, side);
                        castled = Some(side);
                    }
                }
            }
            PieceKind::Rook => {
                // A rook leaving its home corner burns that wing's flag.
                // Capturing a rook on its corner does not — known gap, kept.
                if from.row == piece.color.back_row() {
                    if from.col == CastleSide::Kingside.rook_home_col() {
                        self.board
                            .castling
                            .mark_rook_moved(piece.color, CastleSide::Kingside);
                    } else if from.col == CastleSide::Queenside.rook_home_col() {
                        self.board
                            .castling
                            .mark_rook_moved(piece.color, CastleSide::Queenside);
                    }
                }
            }
            _ => {}
        }

        // ---- Pawn-move record: every pawn move overwrites it, every other
        // move clears it ----
        self.board.last_pawn_move = (piece.kind == PieceKind::Pawn).then_some(to);

        // ---- Turn alternation ----
        self.board.side_to_move = !self.board.side_to_move;

        // ---- Post-move check scan, against the side now to move ----
        let next = self.board.side_to_move;
        let check_against = rules::is_in_check(&self.board, next).then_some(next);

        AppliedMove {
            piece,
            from,
            to,
            promoted_to,
            promotion_defaulted,
            castled,
            en_passant,
            check_against,
            side_to_move: next,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

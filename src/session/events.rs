//! Event types pushed to the presentation layer.
//!
//! Every state change the board UI needs to reflect is announced as a
//! `GameEvent`, serialized as a JSON object with a `type` discriminator and
//! camelCase payload fields.

use serde::Serialize;

use crate::engine::game::AppliedMove;
use crate::engine::types::{Color, Coord, GameStatus};

/// An event emitted by a game session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GameEvent {
    /// Full position snapshot, sent when a subscriber attaches and the game
    /// starts.
    GameState {
        board: [String; 8],
        side_to_move: String,
        status: String,
        white_player: String,
        black_player: String,
    },

    /// A legal move was applied; `board` is the post-move snapshot.
    MoveApplied {
        board: [String; 8],
        piece: char,
        from: String,
        to: String,
        mover: String,
        side_to_move: String,
        check: bool,
        castled: Option<String>,
        promoted_to: Option<char>,
        en_passant: bool,
    },

    /// The side to move is in check. Informational; play continues.
    CheckAnnounced { color: String },

    /// The promotion prompt returned an invalid or cancelled choice and a
    /// queen was substituted.
    PromotionDefaulted { at: String, color: String },

    /// A move was submitted for the side not on turn.
    NotYourTurn { side_to_move: String },

    /// One second elapsed on the move clock.
    TickUpdate { color: String, seconds_left: u32 },

    /// The move clock ran out; the game is over.
    TimeExpired { loser: String },
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl GameEvent {
    pub fn game_state(
        board: [String; 8],
        side_to_move: Color,
        status: GameStatus,
        white_player: &str,
        black_player: &str,
    ) -> Self {
        GameEvent::GameState {
            board,
            side_to_move: side_to_move.to_string(),
            status: status.as_str().to_string(),
            white_player: white_player.to_string(),
            black_player: black_player.to_string(),
        }
    }

    pub fn move_applied(board: [String; 8], applied: &AppliedMove) -> Self {
        GameEvent::MoveApplied {
            board,
            piece: applied.piece.symbol(),
            from: applied.from.to_algebraic(),
            to: applied.to.to_algebraic(),
            mover: applied.piece.color.to_string(),
            side_to_move: applied.side_to_move.to_string(),
            check: applied.check_against.is_some(),
            castled: applied.castled.map(|side| side.to_string()),
            promoted_to: applied
                .promoted_to
                .map(|kind| crate::engine::types::Piece::new(applied.piece.color, kind).symbol()),
            en_passant: applied.en_passant,
        }
    }

    pub fn check_announced(color: Color) -> Self {
        GameEvent::CheckAnnounced {
            color: color.to_string(),
        }
    }

    pub fn promotion_defaulted(at: Coord, color: Color) -> Self {
        GameEvent::PromotionDefaulted {
            at: at.to_algebraic(),
            color: color.to_string(),
        }
    }

    pub fn not_your_turn(side_to_move: Color) -> Self {
        GameEvent::NotYourTurn {
            side_to_move: side_to_move.to_string(),
        }
    }

    pub fn tick(color: Color, seconds_left: u32) -> Self {
        GameEvent::TickUpdate {
            color: color.to_string(),
            seconds_left,
        }
    }

    pub fn time_expired(loser: Color) -> Self {
        GameEvent::TimeExpired {
            loser: loser.to_string(),
        }
    }

    /// Serialize to JSON text for the presentation boundary.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"error","message":"serialization failed"}"#.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

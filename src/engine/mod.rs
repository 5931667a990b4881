pub mod board;
pub mod game;
pub mod rules;
pub mod types;

pub use board::Board;
pub use game::{AppliedMove, AutoQueen, Game, PromotionChooser};
pub use rules::{can_escape_check, is_en_passant, is_in_check, is_legal_move, is_path_clear};
pub use types::*;

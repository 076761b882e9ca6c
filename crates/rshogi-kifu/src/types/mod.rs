//! 基本型（手番・マス・駒・持ち駒）

mod color;
mod hand;
mod piece;
mod square;

pub use color::Color;
pub use hand::{HAND_ORDER, Hand};
pub use piece::{ALL_PIECE_KINDS, NUM_PIECE_KINDS, Piece, PieceKind};
pub use square::{BOARD_SIZE, BOARD_SQUARES, Square};

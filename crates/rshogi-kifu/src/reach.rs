//! Geometric reachability of a piece
//!
//! Only movement patterns and blocking are considered. Checks, pins and
//! drop restrictions are not filtered.

use crate::rules::{Movement, Reach};
use crate::state::{BoardState, Grid};
use crate::types::{BOARD_SIZE, Color, Piece, Square};

/// `sq` にある駒が幾何的に到達できるマス
///
/// 空きマスを指定した場合はすべて `false` を返す。
pub fn reachable_area(state: &BoardState, sq: Square) -> Grid<bool> {
    let mut area = [[false; BOARD_SIZE]; BOARD_SIZE];
    let Some(piece) = state.piece_at(sq) else {
        return area;
    };
    for target in reachable_squares(state, sq, piece) {
        area[target.row()][target.col()] = true;
    }
    area
}

/// 到達できるマスを列挙する（重複なし）
pub fn reachable_squares(state: &BoardState, sq: Square, piece: Piece) -> Vec<Square> {
    let mut squares = Vec::new();
    for movement in piece.kind.movements() {
        let (d_file, d_rank) = oriented(movement, piece.color);
        let mut current = sq;
        while let Some(next) = current.offset(d_file, d_rank) {
            match state.piece_at(next) {
                Some(other) if other.color == piece.color => break,
                Some(_) => {
                    squares.push(next);
                    break;
                }
                None => squares.push(next),
            }
            if movement.reach == Reach::Step {
                break;
            }
            current = next;
        }
    }
    squares
}

/// 持ち駒を打てるマス（空きマスすべて）
pub fn drop_area(state: &BoardState) -> Grid<bool> {
    let mut area = [[false; BOARD_SIZE]; BOARD_SIZE];
    for sq in Square::all().filter(|&sq| state.is_empty_at(sq)) {
        area[sq.row()][sq.col()] = true;
    }
    area
}

// 後手は前後左右とも反転
#[inline]
fn oriented(movement: &Movement, color: Color) -> (i8, i8) {
    match color {
        Color::Black => (movement.d_file, movement.d_rank),
        Color::White => (-movement.d_file, -movement.d_rank),
    }
}

//! 盤上のマス（Square）
//!
//! 棋譜上の座標（筋 1-9, 段 1-9）と盤面配列の行列インデックスを相互変換する。

use std::fmt;

/// 盤の一辺のマス数
pub const BOARD_SIZE: usize = 9;

/// 盤上のマス数
pub const BOARD_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Square on shogi board (0-80)
///
/// **IMPORTANT**: the array column runs opposite to the file number.
/// - column 0 = 9筋 (leftmost from Black's view)
/// - column 8 = 1筋 (rightmost)
/// - row 0 = 一段, row 8 = 九段
///
/// Use [`Square::new`] with game coordinates; [`Square::from_row_col`] is for
/// code that walks the backing array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// 筋・段（1-9）から生成。範囲外は `None`
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file >= 1 && file <= 9 && rank >= 1 && rank <= 9 {
            Some(Square((rank - 1) * 9 + (9 - file)))
        } else {
            None
        }
    }

    /// 配列の行・列（0-8）から生成
    #[inline]
    pub const fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Square((row * BOARD_SIZE + col) as u8))
        } else {
            None
        }
    }

    /// インデックス（0-80）から生成
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SQUARES { Some(Square(index as u8)) } else { None }
    }

    /// 筋（1-9）
    #[inline]
    pub const fn file(self) -> u8 {
        9 - self.0 % 9
    }

    /// 段（1-9）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 9 + 1
    }

    /// 配列の行（0 = 一段）
    #[inline]
    pub const fn row(self) -> usize {
        (self.0 / 9) as usize
    }

    /// 配列の列（0 = 9筋）
    #[inline]
    pub const fn col(self) -> usize {
        (self.0 % 9) as usize
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 盤を180度回転させた位置
    #[inline]
    pub const fn flip(self) -> Self {
        Square(80 - self.0)
    }

    /// 筋・段の差分だけずらしたマス。盤外なら `None`
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file() as i8 + d_file;
        let rank = self.rank() as i8 + d_rank;
        if (1..=9).contains(&file) && (1..=9).contains(&rank) {
            Square::new(file as u8, rank as u8)
        } else {
            None
        }
    }

    /// 全81マス（一段の9筋から順に）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SQUARES as u8).map(Square)
    }
}

/// Display square in USI notation (e.g., "7g" for ７七)
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = b'0' + self.file();
        let rank = b'a' + self.rank() - 1;
        write!(f, "{}{}", file as char, rank as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_coordinates() {
        let sq = Square::new(7, 7).unwrap();
        assert_eq!(sq.file(), 7);
        assert_eq!(sq.rank(), 7);
        assert_eq!(sq.row(), 6);
        assert_eq!(sq.col(), 2);
        assert_eq!(sq.to_string(), "7g");

        // 9一 は配列の左上
        assert_eq!(Square::new(9, 1).unwrap().index(), 0);
        // 1九 は配列の右下
        assert_eq!(Square::new(1, 9).unwrap().index(), 80);
    }

    #[test]
    fn test_square_out_of_range() {
        assert!(Square::new(0, 5).is_none());
        assert!(Square::new(5, 10).is_none());
        assert!(Square::from_row_col(9, 0).is_none());
        assert!(Square::from_index(81).is_none());
    }

    #[test]
    fn test_square_row_col_inverse() {
        for sq in Square::all() {
            assert_eq!(Square::from_row_col(sq.row(), sq.col()), Some(sq));
            assert_eq!(Square::new(sq.file(), sq.rank()), Some(sq));
        }
    }

    #[test]
    fn test_square_flip_and_offset() {
        let sq = Square::new(7, 7).unwrap();
        assert_eq!(sq.flip(), Square::new(3, 3).unwrap());
        assert_eq!(sq.offset(0, -1), Square::new(7, 6));
        assert_eq!(Square::new(1, 1).unwrap().offset(-1, 0), None);
    }
}

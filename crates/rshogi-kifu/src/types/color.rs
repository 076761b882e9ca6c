//! 手番（Color）

/// 手番（先手/後手）
///
/// JKF では `0` が先手、`1` が後手。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// JKF の数値表現から変換
    #[inline]
    pub const fn from_jkf(value: u8) -> Option<Color> {
        match value {
            0 => Some(Color::Black),
            1 => Some(Color::White),
            _ => None,
        }
    }

    /// 盤の「前方」を表す段の増分（先手は段が小さくなる方向に進む）
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

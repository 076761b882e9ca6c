//! 駒種（PieceKind）と駒（Piece）

use super::Color;

/// 駒種（成駒を含む14種）
///
/// 並び順は [`crate::rules::PIECE_RULES`] のインデックスと一致させること。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,       // FU
    Lance = 1,      // KY
    Knight = 2,     // KE
    Silver = 3,     // GI
    Gold = 4,       // KI
    Bishop = 5,     // KA
    Rook = 6,       // HI
    King = 7,       // OU
    ProPawn = 8,    // TO
    ProLance = 9,   // NY
    ProKnight = 10, // NK
    ProSilver = 11, // NG
    Horse = 12,     // UM
    Dragon = 13,    // RY
}

/// 駒種の数
pub const NUM_PIECE_KINDS: usize = 14;

pub const ALL_PIECE_KINDS: [PieceKind; NUM_PIECE_KINDS] = [
    PieceKind::Pawn,
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::King,
    PieceKind::ProPawn,
    PieceKind::ProLance,
    PieceKind::ProKnight,
    PieceKind::ProSilver,
    PieceKind::Horse,
    PieceKind::Dragon,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// JKF / CSA の2文字表記（"FU", "TO" など）
    pub const fn csa(self) -> &'static str {
        match self {
            PieceKind::Pawn => "FU",
            PieceKind::Lance => "KY",
            PieceKind::Knight => "KE",
            PieceKind::Silver => "GI",
            PieceKind::Gold => "KI",
            PieceKind::Bishop => "KA",
            PieceKind::Rook => "HI",
            PieceKind::King => "OU",
            PieceKind::ProPawn => "TO",
            PieceKind::ProLance => "NY",
            PieceKind::ProKnight => "NK",
            PieceKind::ProSilver => "NG",
            PieceKind::Horse => "UM",
            PieceKind::Dragon => "RY",
        }
    }

    /// 2文字表記から変換
    pub fn from_csa(s: &str) -> Option<PieceKind> {
        ALL_PIECE_KINDS.iter().copied().find(|kind| kind.csa() == s)
    }

    /// 成駒かどうか
    #[inline]
    pub const fn is_promoted(self) -> bool {
        (self as u8) >= PieceKind::ProPawn as u8
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.csa())
    }
}

/// 盤上の駒（駒種 + 持ち主）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csa_roundtrip() {
        for kind in ALL_PIECE_KINDS {
            assert_eq!(PieceKind::from_csa(kind.csa()), Some(kind));
        }
        assert_eq!(PieceKind::from_csa("XX"), None);
        assert_eq!(PieceKind::from_csa("fu"), None);
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, kind) in ALL_PIECE_KINDS.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(PieceKind::Dragon.is_promoted());
        assert!(!PieceKind::King.is_promoted());
    }
}

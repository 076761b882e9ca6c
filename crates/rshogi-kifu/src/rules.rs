//! Piece rule table
//!
//! Movement patterns, promotion/demotion and display names for all 14 piece
//! kinds. The table is plain constant data; nothing is built at runtime.

use crate::types::{NUM_PIECE_KINDS, PieceKind};

/// How far a movement entry reaches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reach {
    /// Exactly one square
    Step,
    /// Any number of squares until blocked
    Slide,
}

/// One movement entry, written from Black's point of view
///
/// `d_rank = -1` is one square forward (toward rank 1), `d_file = 1` is one
/// file toward file 9 (Black's left). White mirrors both offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Movement {
    pub d_file: i8,
    pub d_rank: i8,
    pub reach: Reach,
}

const fn step(d_file: i8, d_rank: i8) -> Movement {
    Movement { d_file, d_rank, reach: Reach::Step }
}

const fn slide(d_file: i8, d_rank: i8) -> Movement {
    Movement { d_file, d_rank, reach: Reach::Slide }
}

const PAWN_MOVES: [Movement; 1] = [step(0, -1)];
const LANCE_MOVES: [Movement; 1] = [slide(0, -1)];
const KNIGHT_MOVES: [Movement; 2] = [step(1, -2), step(-1, -2)];
const SILVER_MOVES: [Movement; 5] =
    [step(1, -1), step(0, -1), step(-1, -1), step(1, 1), step(-1, 1)];
const GOLD_MOVES: [Movement; 6] =
    [step(1, -1), step(0, -1), step(-1, -1), step(1, 0), step(-1, 0), step(0, 1)];
const KING_MOVES: [Movement; 8] = [
    step(1, -1),
    step(0, -1),
    step(-1, -1),
    step(1, 0),
    step(-1, 0),
    step(1, 1),
    step(0, 1),
    step(-1, 1),
];
const BISHOP_MOVES: [Movement; 4] = [slide(1, -1), slide(-1, -1), slide(1, 1), slide(-1, 1)];
const ROOK_MOVES: [Movement; 4] = [slide(0, -1), slide(1, 0), slide(-1, 0), slide(0, 1)];
const HORSE_MOVES: [Movement; 8] = [
    slide(1, -1),
    slide(-1, -1),
    slide(1, 1),
    slide(-1, 1),
    step(0, -1),
    step(1, 0),
    step(-1, 0),
    step(0, 1),
];
const DRAGON_MOVES: [Movement; 8] = [
    slide(0, -1),
    slide(1, 0),
    slide(-1, 0),
    slide(0, 1),
    step(1, -1),
    step(-1, -1),
    step(1, 1),
    step(-1, 1),
];

/// Static rules of one piece kind
#[derive(Debug)]
pub struct PieceRule {
    pub kind: PieceKind,
    /// 成った後の駒種（成れない駒は None）
    pub promoted: Option<PieceKind>,
    /// 取られて持ち駒になるときの駒種
    pub demoted: PieceKind,
    /// 棋譜表示名
    pub name: &'static str,
    pub movements: &'static [Movement],
}

/// Indexed by [`PieceKind::index`]
pub static PIECE_RULES: [PieceRule; NUM_PIECE_KINDS] = [
    PieceRule {
        kind: PieceKind::Pawn,
        promoted: Some(PieceKind::ProPawn),
        demoted: PieceKind::Pawn,
        name: "歩",
        movements: &PAWN_MOVES,
    },
    PieceRule {
        kind: PieceKind::Lance,
        promoted: Some(PieceKind::ProLance),
        demoted: PieceKind::Lance,
        name: "香",
        movements: &LANCE_MOVES,
    },
    PieceRule {
        kind: PieceKind::Knight,
        promoted: Some(PieceKind::ProKnight),
        demoted: PieceKind::Knight,
        name: "桂",
        movements: &KNIGHT_MOVES,
    },
    PieceRule {
        kind: PieceKind::Silver,
        promoted: Some(PieceKind::ProSilver),
        demoted: PieceKind::Silver,
        name: "銀",
        movements: &SILVER_MOVES,
    },
    PieceRule {
        kind: PieceKind::Gold,
        promoted: None,
        demoted: PieceKind::Gold,
        name: "金",
        movements: &GOLD_MOVES,
    },
    PieceRule {
        kind: PieceKind::Bishop,
        promoted: Some(PieceKind::Horse),
        demoted: PieceKind::Bishop,
        name: "角",
        movements: &BISHOP_MOVES,
    },
    PieceRule {
        kind: PieceKind::Rook,
        promoted: Some(PieceKind::Dragon),
        demoted: PieceKind::Rook,
        name: "飛",
        movements: &ROOK_MOVES,
    },
    PieceRule {
        kind: PieceKind::King,
        promoted: None,
        demoted: PieceKind::King,
        name: "玉",
        movements: &KING_MOVES,
    },
    PieceRule {
        kind: PieceKind::ProPawn,
        promoted: None,
        demoted: PieceKind::Pawn,
        name: "と",
        movements: &GOLD_MOVES,
    },
    PieceRule {
        kind: PieceKind::ProLance,
        promoted: None,
        demoted: PieceKind::Lance,
        name: "成香",
        movements: &GOLD_MOVES,
    },
    PieceRule {
        kind: PieceKind::ProKnight,
        promoted: None,
        demoted: PieceKind::Knight,
        name: "成桂",
        movements: &GOLD_MOVES,
    },
    PieceRule {
        kind: PieceKind::ProSilver,
        promoted: None,
        demoted: PieceKind::Silver,
        name: "成銀",
        movements: &GOLD_MOVES,
    },
    PieceRule {
        kind: PieceKind::Horse,
        promoted: None,
        demoted: PieceKind::Bishop,
        name: "馬",
        movements: &HORSE_MOVES,
    },
    PieceRule {
        kind: PieceKind::Dragon,
        promoted: None,
        demoted: PieceKind::Rook,
        name: "龍",
        movements: &DRAGON_MOVES,
    },
];

/// Rule entry for a kind
#[inline]
pub fn rule(kind: PieceKind) -> &'static PieceRule {
    &PIECE_RULES[kind.index()]
}

impl PieceKind {
    /// 成った後の駒種
    #[inline]
    pub fn promoted(self) -> Option<PieceKind> {
        rule(self).promoted
    }

    /// 成る前の駒種（成駒でなければ自身）
    #[inline]
    pub fn demoted(self) -> PieceKind {
        rule(self).demoted
    }

    #[inline]
    pub fn can_promote(self) -> bool {
        rule(self).promoted.is_some()
    }

    /// 棋譜表示名（"歩", "成香" など）
    #[inline]
    pub fn name(self) -> &'static str {
        rule(self).name
    }

    #[inline]
    pub fn movements(self) -> &'static [Movement] {
        rule(self).movements
    }
}

//! 持ち駒（Hand）

use super::PieceKind;
use crate::error::{KifuError, KifuResult};

/// 持ち駒配列の並び順（King と成駒を除く 7 種）
pub const HAND_ORDER: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

/// 片方の手番の持ち駒
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    counts: [u8; 7],
}

impl Hand {
    pub const fn empty() -> Self {
        Hand { counts: [0; 7] }
    }

    /// 持ち駒配列のインデックス（持ち駒になれない駒種は None）
    #[inline]
    pub const fn index_of(kind: PieceKind) -> Option<usize> {
        match kind {
            PieceKind::Rook => Some(0),
            PieceKind::Bishop => Some(1),
            PieceKind::Gold => Some(2),
            PieceKind::Silver => Some(3),
            PieceKind::Knight => Some(4),
            PieceKind::Lance => Some(5),
            PieceKind::Pawn => Some(6),
            _ => None,
        }
    }

    /// 枚数（持ち駒になれない駒種は常に 0）
    #[inline]
    pub fn count(&self, kind: PieceKind) -> u8 {
        Self::index_of(kind).map_or(0, |idx| self.counts[idx])
    }

    /// 1枚加える
    pub fn add(&mut self, kind: PieceKind) -> KifuResult<()> {
        let idx = Self::index_of(kind).ok_or_else(|| {
            KifuError::InternalInconsistency(format!("{kind} cannot be held in hand"))
        })?;
        self.counts[idx] = self.counts[idx].checked_add(1).ok_or_else(|| {
            KifuError::InternalInconsistency(format!("hand count overflow for {kind}"))
        })?;
        Ok(())
    }

    /// 1枚取り出す。0枚からの取り出しは不整合
    pub fn take(&mut self, kind: PieceKind) -> KifuResult<()> {
        let idx = Self::index_of(kind).ok_or_else(|| {
            KifuError::InternalInconsistency(format!("{kind} cannot be held in hand"))
        })?;
        if self.counts[idx] == 0 {
            return Err(KifuError::InternalInconsistency(format!("no {kind} left in hand")));
        }
        self.counts[idx] -= 1;
        Ok(())
    }

    /// 枚数を直接設定（初期局面の構築用）
    pub(crate) fn set(&mut self, kind: PieceKind, count: u8) -> KifuResult<()> {
        let idx = Self::index_of(kind).ok_or_else(|| {
            KifuError::MalformedInput(format!("{kind} cannot be held in hand"))
        })?;
        self.counts[idx] = count;
        Ok(())
    }

    /// (駒種, 枚数) を HAND_ORDER 順に列挙（0枚も含む）
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        HAND_ORDER.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_add_take() {
        let mut hand = Hand::empty();
        hand.add(PieceKind::Pawn).unwrap();
        hand.add(PieceKind::Pawn).unwrap();
        assert_eq!(hand.count(PieceKind::Pawn), 2);
        hand.take(PieceKind::Pawn).unwrap();
        assert_eq!(hand.count(PieceKind::Pawn), 1);
        assert!(!hand.is_empty());
    }

    #[test]
    fn test_hand_never_negative() {
        let mut hand = Hand::empty();
        let err = hand.take(PieceKind::Gold).unwrap_err();
        assert!(matches!(err, KifuError::InternalInconsistency(_)));
        assert_eq!(hand.count(PieceKind::Gold), 0);
    }

    #[test]
    fn test_hand_rejects_non_hand_kinds() {
        let mut hand = Hand::empty();
        assert!(hand.add(PieceKind::King).is_err());
        assert!(hand.add(PieceKind::Dragon).is_err());
        assert_eq!(hand.count(PieceKind::Dragon), 0);
    }
}

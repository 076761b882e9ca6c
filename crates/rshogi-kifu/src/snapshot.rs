//! 表示層へ渡す局面のスナップショット

use std::collections::BTreeMap;

use serde::Serialize;

use crate::state::BoardState;
use crate::types::{Color, Piece, Square};

/// 盤上の駒
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PieceView {
    /// 0: 先手, 1: 後手
    pub color: u8,
    /// "FU" | "KY" | ... | "RY"
    pub kind: &'static str,
    /// 表示名（"歩", "成香" など）
    pub name: &'static str,
}

impl From<Piece> for PieceView {
    fn from(piece: Piece) -> Self {
        PieceView {
            color: piece.color.index() as u8,
            kind: piece.kind.csa(),
            name: piece.kind.name(),
        }
    }
}

/// 分岐の候補
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForkView {
    pub variant: usize,
    pub notation: String,
    pub selected: bool,
}

/// ある手数での局面全体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Snapshot {
    pub ply: usize,
    pub last_ply: usize,
    /// 手番: 0 | 1
    pub turn: u8,
    pub flipped: bool,
    /// 9x9（[行][列]、`flipped` に従った向き）。空きマスは null
    pub board: Vec<Vec<Option<PieceView>>>,
    /// [先手, 後手] の持ち駒
    pub hands: Vec<BTreeMap<&'static str, u8>>,
    /// 直前の手の移動先 ("7f" 形式)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub notation: String,
    pub comments: Vec<String>,
    /// 次の手の分岐候補（分岐点でなければ空）
    pub forks: Vec<ForkView>,
}

pub(crate) fn board_view(state: &BoardState, flipped: bool) -> Vec<Vec<Option<PieceView>>> {
    state
        .grid(flipped)
        .iter()
        .map(|row| row.iter().map(|cell| cell.map(PieceView::from)).collect())
        .collect()
}

pub(crate) fn hands_view(state: &BoardState) -> Vec<BTreeMap<&'static str, u8>> {
    Color::ALL
        .iter()
        .map(|&color| {
            state.hand(color).iter().filter(|&(_, n)| n > 0).map(|(kind, n)| (kind.csa(), n)).collect()
        })
        .collect()
}

pub(crate) fn focus_view(focus: Option<Square>) -> Option<String> {
    focus.map(|sq| sq.to_string())
}

//! Live board state and one-ply apply/undo
//!
//! The board is advanced or rewound by structurally interpreting a
//! [`PieceMove`]. Both directions validate the whole ply before touching
//! anything, so a failed step leaves the state exactly as it was.

use crate::error::{KifuError, KifuResult};
use crate::record::{Action, PieceMove};
use crate::types::{BOARD_SIZE, BOARD_SQUARES, Color, Hand, Piece, PieceKind, Square};

/// 表示用の 9x9 グリッド（[行][列]）
pub type Grid<T> = [[T; BOARD_SIZE]; BOARD_SIZE];

/// 盤面と両者の持ち駒
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    /// Piece on each square; `None` is an empty square
    cells: [Option<Piece>; BOARD_SQUARES],
    hands: [Hand; Color::NUM],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoardState {
    /// 駒のない盤面
    pub fn empty() -> Self {
        BoardState { cells: [None; BOARD_SQUARES], hands: [Hand::empty(); Color::NUM] }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    #[inline]
    pub fn hand(&self, color: Color) -> &Hand {
        &self.hands[color.index()]
    }

    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.index()] = Some(piece);
    }

    pub(crate) fn clear(&mut self, sq: Square) {
        self.cells[sq.index()] = None;
    }

    pub(crate) fn hand_mut(&mut self, color: Color) -> &mut Hand {
        &mut self.hands[color.index()]
    }

    /// 駒のあるマスを列挙
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// 盤面のグリッド表現
    ///
    /// `flipped == false` は先手から見た向き（[0][0] が 9一）、
    /// `true` は後手から見た向き（[0][0] が 1九）。
    pub fn grid(&self, flipped: bool) -> Grid<Option<Piece>> {
        let mut grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for sq in Square::all() {
            let view = if flipped { sq.flip() } else { sq };
            grid[view.row()][view.col()] = self.piece_at(sq);
        }
        grid
    }

    /// 記録を1手進める
    pub fn apply(&mut self, action: &Action) -> KifuResult<()> {
        match action {
            Action::Move(mv) => self.apply_move(mv),
            Action::Special { .. } => Ok(()),
            Action::Initial => {
                Err(KifuError::InternalInconsistency("initial position cannot be applied".into()))
            }
        }
    }

    /// 記録を1手戻す
    pub fn undo(&mut self, action: &Action) -> KifuResult<()> {
        match action {
            Action::Move(mv) => self.undo_move(mv),
            Action::Special { .. } => Ok(()),
            Action::Initial => {
                Err(KifuError::InternalInconsistency("initial position cannot be undone".into()))
            }
        }
    }

    fn apply_move(&mut self, mv: &PieceMove) -> KifuResult<()> {
        log::trace!("apply {:?} {} -> {}", mv.kind, fmt_from(mv.from), mv.to);
        let Some(from) = mv.from else {
            if !self.is_empty_at(mv.to) {
                return Err(inconsistent(format!("drop target {} is occupied", mv.to)));
            }
            // take() は 0 枚なら何も変えずに失敗する
            self.hand_mut(mv.color).take(mv.kind)?;
            self.put(mv.to, Piece::new(mv.kind, mv.color));
            return Ok(());
        };

        let moving = Piece::new(mv.kind, mv.color);
        if self.piece_at(from) != Some(moving) {
            return Err(inconsistent(format!(
                "expected {:?} {} on {from}, found {:?}",
                mv.color,
                mv.kind,
                self.piece_at(from)
            )));
        }
        match (mv.capture, self.piece_at(mv.to)) {
            (None, None) => {}
            (Some(kind), Some(target)) if target == Piece::new(kind, mv.color.opponent()) => {
                self.hand_mut(mv.color).add(kind.demoted())?;
            }
            (expected, found) => {
                return Err(inconsistent(format!(
                    "capture mismatch on {}: recorded {expected:?}, found {found:?}",
                    mv.to
                )));
            }
        }
        self.clear(from);
        self.put(mv.to, Piece::new(mv.placed_kind(), mv.color));
        Ok(())
    }

    fn undo_move(&mut self, mv: &PieceMove) -> KifuResult<()> {
        log::trace!("undo {:?} {} -> {}", mv.kind, fmt_from(mv.from), mv.to);
        let Some(from) = mv.from else {
            if self.piece_at(mv.to) != Some(Piece::new(mv.kind, mv.color)) {
                return Err(inconsistent(format!("dropped {} is not on {}", mv.kind, mv.to)));
            }
            self.hand_mut(mv.color).add(mv.kind)?;
            self.clear(mv.to);
            return Ok(());
        };

        let placed = Piece::new(mv.placed_kind(), mv.color);
        if self.piece_at(mv.to) != Some(placed) {
            return Err(inconsistent(format!(
                "expected {:?} {} on {}, found {:?}",
                mv.color,
                placed.kind,
                mv.to,
                self.piece_at(mv.to)
            )));
        }
        if !self.is_empty_at(from) {
            return Err(inconsistent(format!("origin {from} is occupied")));
        }
        match mv.capture {
            Some(kind) => {
                self.hand_mut(mv.color).take(kind.demoted())?;
                self.put(mv.to, Piece::new(kind, mv.color.opponent()));
            }
            None => self.clear(mv.to),
        }
        self.put(from, Piece::new(mv.kind, mv.color));
        Ok(())
    }

    /// 駒種ファミリー（成駒を含む）ごとの盤上枚数
    pub fn count_family_on_board(&self, base: PieceKind, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color == color && p.kind.demoted() == base).count()
    }
}

fn inconsistent(msg: String) -> KifuError {
    log::warn!("{msg}");
    KifuError::InternalInconsistency(msg)
}

fn fmt_from(from: Option<Square>) -> String {
    from.map_or_else(|| "hand".to_string(), |sq| sq.to_string())
}

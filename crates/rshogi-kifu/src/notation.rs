//! 指し手の表示文字列
//!
//! `▲７六歩`, `△同　角成`, `▲５八金右` のような棋譜表記を生成する。
//! 相対位置（左・直・右・上・寄・引・打）は記録にタグがあるときだけ付く。

use crate::record::{Action, Horizontal, MoveRecord, PieceMove, Relative, Vertical};
use crate::reach::reachable_squares;
use crate::state::BoardState;
use crate::types::{Color, Piece, PieceKind, Square};

/// 開始局面の表示名
pub const INITIAL_LABEL: &str = "開始局面";

const FILE_DIGITS: [&str; 10] = ["０", "１", "２", "３", "４", "５", "６", "７", "８", "９"];
const RANK_KANJI: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 手番記号の種類
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotationStyle {
    /// ▲ / △
    #[default]
    Triangle,
    /// ☗ / ☖
    Shogi,
}

impl NotationStyle {
    pub fn glyph(self, color: Color) -> &'static str {
        match (self, color) {
            (NotationStyle::Triangle, Color::Black) => "▲",
            (NotationStyle::Triangle, Color::White) => "△",
            (NotationStyle::Shogi, Color::Black) => "☗",
            (NotationStyle::Shogi, Color::White) => "☖",
        }
    }
}

/// 1手分の表示文字列
pub fn format_move(record: &MoveRecord, style: NotationStyle) -> String {
    match &record.action {
        Action::Initial => INITIAL_LABEL.to_string(),
        Action::Special { kind, color } => format!("{}{}", style.glyph(*color), kind.label()),
        Action::Move(mv) => format!("{}{}", style.glyph(mv.color), move_body(mv)),
    }
}

/// 手番記号を除いた指し手部分（`７六歩`, `同　角成` など）
pub fn move_body(mv: &PieceMove) -> String {
    let mut s = if mv.same { "同　".to_string() } else { square_label(mv.to) };
    s.push_str(mv.kind.name());
    if mv.promote {
        s.push('成');
    }
    if let Some(relative) = &mv.relative {
        s.push_str(&relative_suffix(relative));
    }
    s
}

/// `７六` のような筋（全角数字）と段（漢数字）
pub fn square_label(sq: Square) -> String {
    format!("{}{}", FILE_DIGITS[sq.file() as usize], RANK_KANJI[sq.rank() as usize])
}

/// 相対位置の表示（左右 → 上下 → 打）
pub fn relative_suffix(relative: &Relative) -> String {
    let mut s = String::new();
    if let Some(h) = relative.horizontal {
        s.push(match h {
            Horizontal::Left => '左',
            Horizontal::Straight => '直',
            Horizontal::Right => '右',
        });
    }
    if let Some(v) = relative.vertical {
        s.push(match v {
            Vertical::Up => '上',
            Vertical::Sideways => '寄',
            Vertical::Down => '引',
        });
    }
    if relative.drop {
        s.push('打');
    }
    s
}

/// 局面から相対位置タグを推定する（着手前の局面を渡す）
///
/// 同じ駒種の別の駒が同じマスへ到達できるときだけタグを付ける。
/// 上下で区別できればそれだけ、次に左右、最後に両方を使う。
pub fn infer_relative(state: &BoardState, mv: &PieceMove) -> Option<Relative> {
    let rivals: Vec<Square> = state
        .pieces()
        .filter(|&(sq, piece)| {
            Some(sq) != mv.from
                && piece == Piece::new(mv.kind, mv.color)
                && reachable_squares(state, sq, piece).contains(&mv.to)
        })
        .map(|(sq, _)| sq)
        .collect();
    if rivals.is_empty() {
        return None;
    }
    let Some(from) = mv.from else {
        return Some(Relative { drop: true, ..Relative::default() });
    };

    let vertical = vertical_of(from, mv.to, mv.color);
    let same_vertical: Vec<Square> =
        rivals.iter().copied().filter(|&sq| vertical_of(sq, mv.to, mv.color) == vertical).collect();
    if same_vertical.is_empty() {
        return Some(Relative { vertical: Some(vertical), ..Relative::default() });
    }
    if let Some(h) = horizontal_among(mv, from, &rivals) {
        return Some(Relative { horizontal: Some(h), ..Relative::default() });
    }
    let horizontal = horizontal_among(mv, from, &same_vertical);
    Some(Relative { horizontal, vertical: Some(vertical), drop: false })
}

fn vertical_of(from: Square, to: Square, color: Color) -> Vertical {
    // 手番から見て前に進む量
    let advance = (to.rank() as i8 - from.rank() as i8) * color.forward();
    match advance {
        a if a > 0 => Vertical::Up,
        0 => Vertical::Sideways,
        _ => Vertical::Down,
    }
}

/// 手番から見た左方向の座標（大きいほど左）
fn leftness(sq: Square, color: Color) -> i8 {
    match color {
        Color::Black => sq.file() as i8,
        Color::White => -(sq.file() as i8),
    }
}

fn horizontal_among(mv: &PieceMove, from: Square, others: &[Square]) -> Option<Horizontal> {
    let ranging = matches!(
        mv.kind,
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Horse | PieceKind::Dragon
    );
    if !ranging
        && from.file() == mv.to.file()
        && vertical_of(from, mv.to, mv.color) == Vertical::Up
    {
        return Some(Horizontal::Straight);
    }
    let mine = leftness(from, mv.color);
    if others.iter().all(|&sq| leftness(sq, mv.color) < mine) {
        Some(Horizontal::Left)
    } else if others.iter().all(|&sq| leftness(sq, mv.color) > mine) {
        Some(Horizontal::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SpecialMove;
    use crate::types::PieceKind;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn mv(color: Color, kind: PieceKind, from: Option<Square>, to: Square) -> PieceMove {
        PieceMove {
            color,
            kind,
            from,
            to,
            promote: false,
            same: false,
            capture: None,
            relative: None,
        }
    }

    fn record(mv: PieceMove) -> MoveRecord {
        MoveRecord { action: Action::Move(mv), comments: Vec::new(), time: None }
    }

    #[test]
    fn test_plain_move() {
        let r = record(mv(Color::Black, PieceKind::Pawn, Some(sq(7, 7)), sq(7, 6)));
        assert_eq!(format_move(&r, NotationStyle::Triangle), "▲７六歩");
        assert_eq!(format_move(&r, NotationStyle::Shogi), "☗７六歩");
    }

    #[test]
    fn test_same_and_promote() {
        let mut m = mv(Color::White, PieceKind::Bishop, Some(sq(2, 2)), sq(8, 8));
        m.same = true;
        m.promote = true;
        assert_eq!(format_move(&record(m), NotationStyle::Triangle), "△同　角成");
    }

    #[test]
    fn test_relative_suffix_only_when_tagged() {
        let mut m = mv(Color::Black, PieceKind::Gold, Some(sq(4, 9)), sq(5, 8));
        assert_eq!(format_move(&record(m.clone()), NotationStyle::Triangle), "▲５八金");
        m.relative = Some(Relative::parse("R").unwrap());
        assert_eq!(format_move(&record(m.clone()), NotationStyle::Triangle), "▲５八金右");
        m.relative = Some(Relative::parse("LU").unwrap());
        assert_eq!(format_move(&record(m), NotationStyle::Triangle), "▲５八金左上");

        let mut drop = mv(Color::White, PieceKind::Silver, None, sq(5, 5));
        drop.relative = Some(Relative::parse("H").unwrap());
        assert_eq!(format_move(&record(drop), NotationStyle::Triangle), "△５五銀打");
    }

    #[test]
    fn test_initial_and_special() {
        assert_eq!(format_move(&MoveRecord::initial(vec![]), NotationStyle::Shogi), "開始局面");
        let special = MoveRecord {
            action: Action::Special { kind: SpecialMove::Resign, color: Color::White },
            comments: Vec::new(),
            time: None,
        };
        assert_eq!(format_move(&special, NotationStyle::Triangle), "△投了");
    }

    #[test]
    fn test_infer_relative_left_right() {
        let mut state = BoardState::empty();
        state.put(sq(6, 9), Piece::new(PieceKind::Gold, Color::Black));
        state.put(sq(4, 9), Piece::new(PieceKind::Gold, Color::Black));

        let right = mv(Color::Black, PieceKind::Gold, Some(sq(4, 9)), sq(5, 8));
        assert_eq!(infer_relative(&state, &right), Some(Relative::parse("R").unwrap()));
        let left = mv(Color::Black, PieceKind::Gold, Some(sq(6, 9)), sq(5, 8));
        assert_eq!(infer_relative(&state, &left), Some(Relative::parse("L").unwrap()));
    }

    #[test]
    fn test_infer_relative_vertical_and_straight() {
        let mut state = BoardState::empty();
        state.put(sq(5, 9), Piece::new(PieceKind::Gold, Color::Black));
        state.put(sq(4, 8), Piece::new(PieceKind::Gold, Color::Black));

        // 5九 → 5八 は上、4八 → 5八 は寄
        let up = mv(Color::Black, PieceKind::Gold, Some(sq(5, 9)), sq(5, 8));
        assert_eq!(infer_relative(&state, &up), Some(Relative::parse("U").unwrap()));
        let side = mv(Color::Black, PieceKind::Gold, Some(sq(4, 8)), sq(5, 8));
        assert_eq!(infer_relative(&state, &side), Some(Relative::parse("M").unwrap()));

        state.put(sq(6, 9), Piece::new(PieceKind::Gold, Color::Black));
        state.clear(sq(4, 8));
        let straight = mv(Color::Black, PieceKind::Gold, Some(sq(5, 9)), sq(5, 8));
        assert_eq!(infer_relative(&state, &straight), Some(Relative::parse("C").unwrap()));
    }

    #[test]
    fn test_infer_relative_for_white_mirrors_sides() {
        let mut state = BoardState::empty();
        state.put(sq(6, 1), Piece::new(PieceKind::Gold, Color::White));
        state.put(sq(4, 1), Piece::new(PieceKind::Gold, Color::White));
        // 後手から見て 6一 は右
        let m = mv(Color::White, PieceKind::Gold, Some(sq(6, 1)), sq(5, 2));
        assert_eq!(infer_relative(&state, &m), Some(Relative::parse("R").unwrap()));
    }

    #[test]
    fn test_infer_relative_drop_and_unique() {
        let mut state = BoardState::empty();
        state.put(sq(5, 7), Piece::new(PieceKind::Silver, Color::Black));
        let unique = mv(Color::Black, PieceKind::Silver, Some(sq(5, 7)), sq(5, 6));
        assert_eq!(infer_relative(&state, &unique), None);

        let drop = mv(Color::Black, PieceKind::Silver, None, sq(5, 6));
        assert_eq!(infer_relative(&state, &drop), Some(Relative::parse("H").unwrap()));
        let far_drop = mv(Color::Black, PieceKind::Silver, None, sq(1, 1));
        assert_eq!(infer_relative(&state, &far_drop), None);
    }
}

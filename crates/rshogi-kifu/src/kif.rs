//! KIF 形式での書き出し
//!
//! 現在たどっている経路（選択中の変化を含む）を1本の棋譜として出力する。

use std::io::Write;

use crate::json::{TimeJson, TimeSpanJson};
use crate::notation::square_label;
use crate::preset::Preset;
use crate::record::{Action, PieceMove, SpecialMove};
use crate::state::BoardState;
use crate::tree::MoveTree;
use crate::types::{BOARD_SIZE, Color, HAND_ORDER, PieceKind, Square};

const KANJI_COUNTS: [&str; 19] = [
    "", "", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二", "十三", "十四",
    "十五", "十六", "十七", "十八",
];

/// 現在の経路を KIF 形式で書き出す
pub fn write_kif<W: Write>(writer: &mut W, tree: &MoveTree) -> std::io::Result<()> {
    writeln!(writer, "# KIF形式棋譜ファイル")?;
    for (key, value) in tree.header() {
        writeln!(writer, "{key}：{value}")?;
    }
    let initial = tree.initial();
    if !tree.header().contains_key("手合割") {
        writeln!(writer, "手合割：{}", initial.preset.label())?;
    }
    if initial.preset == Preset::Other {
        write_board(writer, &initial.board)?;
        if initial.turn == Color::White {
            writeln!(writer, "後手番")?;
        }
    }
    writeln!(writer, "手数----指手---------消費時間--")?;

    let mut result: Option<(usize, SpecialMove, Color)> = None;
    for ply in 0..=tree.last_ply() {
        let record = tree.record(ply).map_err(std::io::Error::other)?;
        match &record.action {
            Action::Initial => {}
            Action::Move(mv) => {
                writeln!(writer, "{:>4} {}{}", ply, move_text(mv), time_text(record.time.as_ref()))?;
            }
            Action::Special { kind, color } => {
                writeln!(writer, "{:>4} {}{}", ply, kind.label(), time_text(record.time.as_ref()))?;
                result.get_or_insert((ply - 1, *kind, *color));
            }
        }
        for comment in &record.comments {
            writeln!(writer, "*{comment}")?;
        }
    }

    if let Some((plies, SpecialMove::Resign, loser)) = result {
        let winner = match loser.opponent() {
            Color::Black => "先手",
            Color::White => "後手",
        };
        writeln!(writer, "まで{plies}手で{winner}の勝ち")?;
    }
    Ok(())
}

/// KIF 文字列として取得
pub fn to_kif_string(tree: &MoveTree) -> std::io::Result<String> {
    let mut buf = Vec::new();
    write_kif(&mut buf, tree)?;
    String::from_utf8(buf).map_err(std::io::Error::other)
}

/// `７六歩(77)`, `同　角成(88)`, `５五角打`
fn move_text(mv: &PieceMove) -> String {
    let mut s = if mv.same { "同　".to_string() } else { square_label(mv.to) };
    s.push_str(mv.kind.name());
    if mv.promote {
        s.push('成');
    }
    match mv.from {
        Some(from) => s.push_str(&format!("({}{})", from.file(), from.rank())),
        None => s.push('打'),
    }
    s
}

fn time_text(time: Option<&TimeJson>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    let span_minutes = |span: &TimeSpanJson| span.h.unwrap_or(0) * 60 + span.m;
    format!(
        "   ({:>2}:{:02}/{:02}:{:02}:{:02})",
        span_minutes(&time.now),
        time.now.s,
        time.total.h.unwrap_or(0),
        time.total.m,
        time.total.s
    )
}

/// 任意局面の盤面図（BOD）
fn write_board<W: Write>(writer: &mut W, board: &BoardState) -> std::io::Result<()> {
    writeln!(writer, "後手の持駒：{}", hand_text(board, Color::White))?;
    writeln!(writer, "  ９ ８ ７ ６ ５ ４ ３ ２ １")?;
    writeln!(writer, "+---------------------------+")?;
    const RANKS: [&str; BOARD_SIZE] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];
    for (row, rank) in RANKS.iter().enumerate() {
        let mut line = String::from("|");
        for col in 0..BOARD_SIZE {
            match Square::from_row_col(row, col).and_then(|sq| board.piece_at(sq)) {
                Some(piece) => {
                    line.push(if piece.color == Color::White { 'v' } else { ' ' });
                    line.push_str(bod_name(piece.kind));
                }
                None => line.push_str(" ・"),
            }
        }
        line.push('|');
        line.push_str(rank);
        writeln!(writer, "{line}")?;
    }
    writeln!(writer, "+---------------------------+")?;
    writeln!(writer, "先手の持駒：{}", hand_text(board, Color::Black))
}

/// 盤面図での1文字表記（成駒も1文字）
pub fn bod_name(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::ProLance => "杏",
        PieceKind::ProKnight => "圭",
        PieceKind::ProSilver => "全",
        PieceKind::Dragon => "竜",
        other => other.name(),
    }
}

fn hand_text(board: &BoardState, color: Color) -> String {
    let parts: Vec<String> = HAND_ORDER
        .iter()
        .filter_map(|&kind| {
            let n = board.hand(color).count(kind) as usize;
            (n > 0).then(|| format!("{}{}", kind.name(), KANJI_COUNTS.get(n).copied().unwrap_or("")))
        })
        .collect();
    if parts.is_empty() { "なし".to_string() } else { parts.join("　") }
}

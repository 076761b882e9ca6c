//! Normalized move records
//!
//! A [`MoveRecord`] is built once from a raw JKF entry and never changes
//! afterwards. Required fields that are missing or unknown values are
//! reported as [`KifuError::MalformedInput`].

use crate::error::{KifuError, KifuResult};
use crate::json::{MoveFormatJson, MoveJson, PlaceJson, TimeJson};
use crate::types::{Color, Hand, PieceKind, Square};

/// 左・直・右
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Horizontal {
    /// 左 (L)
    Left,
    /// 直 (C)
    Straight,
    /// 右 (R)
    Right,
}

/// 上・寄・引
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vertical {
    /// 上 (U)
    Up,
    /// 寄 (M)
    Sideways,
    /// 引 (D)
    Down,
}

/// 相対位置表記（同じ駒が複数到達できるときの区別）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Relative {
    pub horizontal: Option<Horizontal>,
    pub vertical: Option<Vertical>,
    /// 打 (H)
    pub drop: bool,
}

impl Relative {
    /// "L", "RU", "H" などの JKF 表記を解釈する
    pub fn parse(tag: &str) -> KifuResult<Relative> {
        let mut relative = Relative::default();
        for c in tag.chars() {
            let duplicate = match c {
                'L' | 'C' | 'R' => {
                    let h = match c {
                        'L' => Horizontal::Left,
                        'C' => Horizontal::Straight,
                        _ => Horizontal::Right,
                    };
                    relative.horizontal.replace(h).is_some()
                }
                'U' | 'M' | 'D' => {
                    let v = match c {
                        'U' => Vertical::Up,
                        'M' => Vertical::Sideways,
                        _ => Vertical::Down,
                    };
                    relative.vertical.replace(v).is_some()
                }
                'H' => std::mem::replace(&mut relative.drop, true),
                _ => {
                    return Err(KifuError::MalformedInput(format!(
                        "unknown relative tag {c:?} in {tag:?}"
                    )));
                }
            };
            if duplicate {
                return Err(KifuError::MalformedInput(format!("conflicting relative tag {tag:?}")));
            }
        }
        if relative.is_empty() {
            return Err(KifuError::MalformedInput("empty relative tag".to_string()));
        }
        Ok(relative)
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none() && !self.drop
    }

    /// JKF 表記に戻す（左右 → 上下 → 打 の順）
    pub fn to_jkf(&self) -> String {
        let mut s = String::new();
        if let Some(h) = self.horizontal {
            s.push(match h {
                Horizontal::Left => 'L',
                Horizontal::Straight => 'C',
                Horizontal::Right => 'R',
            });
        }
        if let Some(v) = self.vertical {
            s.push(match v {
                Vertical::Up => 'U',
                Vertical::Sideways => 'M',
                Vertical::Down => 'D',
            });
        }
        if self.drop {
            s.push('H');
        }
        s
    }
}

/// 投了などの特殊な指し手
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialMove {
    Resign,
    Interrupt,
    Repetition,
    TimeUp,
    IllegalMove,
    IllegalActionBlack,
    IllegalActionWhite,
    Impasse,
    EnteringKingWin,
    Draw,
    Takeback,
    Mate,
    NoMate,
    Error,
}

const SPECIAL_MOVES: [(SpecialMove, &str, &str); 14] = [
    (SpecialMove::Resign, "TORYO", "投了"),
    (SpecialMove::Interrupt, "CHUDAN", "中断"),
    (SpecialMove::Repetition, "SENNICHITE", "千日手"),
    (SpecialMove::TimeUp, "TIME_UP", "切れ負け"),
    (SpecialMove::IllegalMove, "ILLEGAL_MOVE", "反則負け"),
    (SpecialMove::IllegalActionBlack, "+ILLEGAL_ACTION", "反則負け"),
    (SpecialMove::IllegalActionWhite, "-ILLEGAL_ACTION", "反則負け"),
    (SpecialMove::Impasse, "JISHOGI", "持将棋"),
    (SpecialMove::EnteringKingWin, "KACHI", "入玉勝ち"),
    (SpecialMove::Draw, "HIKIWAKE", "引き分け"),
    (SpecialMove::Takeback, "MATTA", "待った"),
    (SpecialMove::Mate, "TSUMI", "詰み"),
    (SpecialMove::NoMate, "FUZUMI", "不詰"),
    (SpecialMove::Error, "ERROR", "エラー"),
];

impl SpecialMove {
    pub fn from_jkf(code: &str) -> Option<SpecialMove> {
        SPECIAL_MOVES.iter().find(|(_, c, _)| *c == code).map(|(s, _, _)| *s)
    }

    pub fn to_jkf(self) -> &'static str {
        SPECIAL_MOVES.iter().find(|(s, _, _)| *s == self).map_or("ERROR", |(_, c, _)| *c)
    }

    /// 棋譜表示名
    pub fn label(self) -> &'static str {
        SPECIAL_MOVES.iter().find(|(s, _, _)| *s == self).map_or("エラー", |(_, _, l)| *l)
    }
}

/// 盤面を変化させる1手
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceMove {
    pub color: Color,
    /// 動かす前の駒種
    pub kind: PieceKind,
    /// 移動元（None なら持ち駒を打つ手）
    pub from: Option<Square>,
    pub to: Square,
    pub promote: bool,
    /// 直前の手と同じマス（「同」）
    pub same: bool,
    /// 取った駒の駒種（盤上にあったときの駒種）
    pub capture: Option<PieceKind>,
    pub relative: Option<Relative>,
}

impl PieceMove {
    #[inline]
    pub fn is_drop(&self) -> bool {
        self.from.is_none()
    }

    /// 移動後の駒種
    #[inline]
    pub fn placed_kind(&self) -> PieceKind {
        if self.promote { self.kind.promoted().unwrap_or(self.kind) } else { self.kind }
    }

    /// JKF の指し手から正規化する
    pub fn from_json(raw: &MoveJson) -> KifuResult<PieceMove> {
        let color = raw
            .color
            .ok_or_else(|| malformed("move is missing its color"))
            .and_then(|c| Color::from_jkf(c).ok_or_else(|| malformed(format!("invalid color {c}"))))?;
        let kind = raw
            .piece
            .as_deref()
            .ok_or_else(|| malformed("move is missing its piece"))
            .and_then(parse_kind)?;
        let to = raw
            .to
            .ok_or_else(|| malformed("move is missing its destination"))
            .and_then(parse_place)?;
        let from = raw.from.map(parse_place).transpose()?;
        let promote = raw.promote.unwrap_or(false);
        let same = raw.same.unwrap_or(false);
        let capture = raw.capture.as_deref().map(parse_kind).transpose()?;
        let relative = raw.relative.as_deref().map(Relative::parse).transpose()?;

        if from.is_none() {
            if Hand::index_of(kind).is_none() {
                return Err(malformed(format!("{kind} cannot be dropped")));
            }
            if promote || capture.is_some() {
                return Err(malformed(format!("drop of {kind} to {to} cannot promote or capture")));
            }
        }
        if from == Some(to) {
            return Err(malformed(format!("move of {kind} does not leave {to}")));
        }
        if promote && !kind.can_promote() {
            return Err(malformed(format!("{kind} cannot promote")));
        }
        if capture == Some(PieceKind::King) {
            return Err(malformed("capturing the king cannot be recorded"));
        }

        Ok(PieceMove { color, kind, from, to, promote, same, capture, relative })
    }

    /// JKF 表現に戻す
    pub fn to_json(&self) -> MoveJson {
        MoveJson {
            color: Some(self.color.index() as u8),
            from: self.from.map(place_json),
            to: Some(place_json(self.to)),
            piece: Some(self.kind.csa().to_string()),
            same: self.same.then_some(true),
            promote: self.promote.then_some(true),
            capture: self.capture.map(|k| k.csa().to_string()),
            relative: self.relative.map(|r| r.to_jkf()),
        }
    }
}

/// 1手分の内容
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// 開始局面（指し手列の先頭）
    Initial,
    Move(PieceMove),
    /// 特殊な指し手。`color` はその手番
    Special { kind: SpecialMove, color: Color },
}

/// 正規化済みの1手（または開始局面）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub action: Action,
    pub comments: Vec<String>,
    pub time: Option<TimeJson>,
}

impl MoveRecord {
    /// 開始局面を表す記録
    pub fn initial(comments: Vec<String>) -> Self {
        MoveRecord { action: Action::Initial, comments, time: None }
    }

    /// 指し手だけから記録を作る。`None` は開始局面
    pub fn from_json(raw: Option<&MoveJson>) -> KifuResult<Self> {
        let action = match raw {
            None => Action::Initial,
            Some(mv) => Action::Move(PieceMove::from_json(mv)?),
        };
        Ok(MoveRecord { action, comments: Vec::new(), time: None })
    }

    /// 指し手列の1要素から記録を作る
    ///
    /// `turn` はこの手の手番。指し手の `color` が一致しなければ失敗し、
    /// 特殊な指し手にはそのまま割り当てる。
    pub fn from_format(entry: &MoveFormatJson, turn: Color) -> KifuResult<Self> {
        let action = match (&entry.mv, &entry.special) {
            (Some(mv), None) => {
                let mv = PieceMove::from_json(mv)?;
                if mv.color != turn {
                    return Err(malformed(format!("{:?} moved on {turn:?}'s turn", mv.color)));
                }
                Action::Move(mv)
            }
            (None, Some(code)) => {
                let kind = SpecialMove::from_jkf(code)
                    .ok_or_else(|| malformed(format!("unknown special move {code:?}")))?;
                Action::Special { kind, color: turn }
            }
            (Some(_), Some(_)) => return Err(malformed("entry has both a move and a special")),
            (None, None) => return Err(malformed("entry has neither a move nor a special")),
        };
        Ok(MoveRecord {
            action,
            comments: entry.comments.clone().unwrap_or_default(),
            time: entry.time,
        })
    }

    pub fn is_initial(&self) -> bool {
        matches!(self.action, Action::Initial)
    }

    pub fn piece_move(&self) -> Option<&PieceMove> {
        match &self.action {
            Action::Move(mv) => Some(mv),
            _ => None,
        }
    }

    /// この手を指した手番（開始局面は None）
    pub fn color(&self) -> Option<Color> {
        match &self.action {
            Action::Initial => None,
            Action::Move(mv) => Some(mv.color),
            Action::Special { color, .. } => Some(*color),
        }
    }

    /// 強調表示するマス（移動先）
    pub fn destination(&self) -> Option<Square> {
        self.piece_move().map(|mv| mv.to)
    }

    /// JKF の指し手列要素に戻す（forks は含まない）
    pub fn to_format(&self) -> MoveFormatJson {
        let mut entry = MoveFormatJson {
            comments: (!self.comments.is_empty()).then(|| self.comments.clone()),
            time: self.time,
            ..MoveFormatJson::default()
        };
        match &self.action {
            Action::Initial => {}
            Action::Move(mv) => entry.mv = Some(mv.to_json()),
            Action::Special { kind, .. } => entry.special = Some(kind.to_jkf().to_string()),
        }
        entry
    }
}

fn malformed(msg: impl Into<String>) -> KifuError {
    KifuError::MalformedInput(msg.into())
}

fn parse_kind(code: &str) -> KifuResult<PieceKind> {
    PieceKind::from_csa(code).ok_or_else(|| malformed(format!("unknown piece kind {code:?}")))
}

fn parse_place(place: PlaceJson) -> KifuResult<Square> {
    Square::new(place.x, place.y)
        .ok_or_else(|| malformed(format!("square ({}, {}) is off the board", place.x, place.y)))
}

fn place_json(sq: Square) -> PlaceJson {
    PlaceJson { x: sq.file(), y: sq.rank() }
}

//! 初期局面（平手・駒落ち・任意局面）

use crate::error::{KifuError, KifuResult};
use crate::json::{CellJson, InitialJson, StateJson};
use crate::state::BoardState;
use crate::types::{BOARD_SIZE, Color, HAND_ORDER, Piece, PieceKind, Square};

/// 手合割
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// 平手
    Hirate,
    /// 香落ち
    Lance,
    /// 右香落ち
    RightLance,
    /// 角落ち
    Bishop,
    /// 飛車落ち
    Rook,
    /// 飛香落ち
    RookLance,
    /// 二枚落ち
    Two,
    /// 三枚落ち
    Three,
    /// 四枚落ち
    Four,
    /// 五枚落ち
    Five,
    /// 左五枚落ち
    FiveLeft,
    /// 六枚落ち
    Six,
    /// 左七枚落ち
    SevenLeft,
    /// 右七枚落ち
    SevenRight,
    /// 八枚落ち
    Eight,
    /// 十枚落ち
    Ten,
    /// 任意局面
    Other,
}

const PRESET_CODES: [(Preset, &str); 17] = [
    (Preset::Hirate, "HIRATE"),
    (Preset::Lance, "KY"),
    (Preset::RightLance, "KY_R"),
    (Preset::Bishop, "KA"),
    (Preset::Rook, "HI"),
    (Preset::RookLance, "HIKY"),
    (Preset::Two, "2"),
    (Preset::Three, "3"),
    (Preset::Four, "4"),
    (Preset::Five, "5"),
    (Preset::FiveLeft, "5_L"),
    (Preset::Six, "6"),
    (Preset::SevenLeft, "7_L"),
    (Preset::SevenRight, "7_R"),
    (Preset::Eight, "8"),
    (Preset::Ten, "10"),
    (Preset::Other, "OTHER"),
];

/// 平手の後手側1段目（9筋から1筋へ）
const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::King,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
];

// 駒落ちで取り除く上手（後手）の駒の位置 (筋, 段)
const LEFT_LANCE: (u8, u8) = (1, 1);
const RIGHT_LANCE: (u8, u8) = (9, 1);
const LEFT_KNIGHT: (u8, u8) = (2, 1);
const RIGHT_KNIGHT: (u8, u8) = (8, 1);
const LEFT_SILVER: (u8, u8) = (3, 1);
const RIGHT_SILVER: (u8, u8) = (7, 1);
const LEFT_GOLD: (u8, u8) = (4, 1);
const RIGHT_GOLD: (u8, u8) = (6, 1);
const BISHOP: (u8, u8) = (2, 2);
const ROOK: (u8, u8) = (8, 2);

impl Preset {
    pub fn from_jkf(code: &str) -> Option<Preset> {
        PRESET_CODES.iter().find(|(_, c)| *c == code).map(|(p, _)| *p)
    }

    pub fn to_jkf(self) -> &'static str {
        PRESET_CODES.iter().find(|(p, _)| *p == self).map_or("OTHER", |(_, c)| *c)
    }

    /// 手合割の表示名
    pub fn label(self) -> &'static str {
        match self {
            Preset::Hirate => "平手",
            Preset::Lance => "香落ち",
            Preset::RightLance => "右香落ち",
            Preset::Bishop => "角落ち",
            Preset::Rook => "飛車落ち",
            Preset::RookLance => "飛香落ち",
            Preset::Two => "二枚落ち",
            Preset::Three => "三枚落ち",
            Preset::Four => "四枚落ち",
            Preset::Five => "五枚落ち",
            Preset::FiveLeft => "左五枚落ち",
            Preset::Six => "六枚落ち",
            Preset::SevenLeft => "左七枚落ち",
            Preset::SevenRight => "右七枚落ち",
            Preset::Eight => "八枚落ち",
            Preset::Ten => "十枚落ち",
            Preset::Other => "その他",
        }
    }

    /// 落とす駒の位置
    fn removed(self) -> &'static [(u8, u8)] {
        match self {
            Preset::Hirate | Preset::Other => &[],
            Preset::Lance => &[LEFT_LANCE],
            Preset::RightLance => &[RIGHT_LANCE],
            Preset::Bishop => &[BISHOP],
            Preset::Rook => &[ROOK],
            Preset::RookLance => &[ROOK, LEFT_LANCE],
            Preset::Two => &[ROOK, BISHOP],
            Preset::Three => &[ROOK, BISHOP, LEFT_LANCE],
            Preset::Four => &[ROOK, BISHOP, LEFT_LANCE, RIGHT_LANCE],
            Preset::Five => &[ROOK, BISHOP, LEFT_LANCE, RIGHT_LANCE, LEFT_KNIGHT],
            Preset::FiveLeft => &[ROOK, BISHOP, LEFT_LANCE, RIGHT_LANCE, RIGHT_KNIGHT],
            Preset::Six => &[ROOK, BISHOP, LEFT_LANCE, RIGHT_LANCE, LEFT_KNIGHT, RIGHT_KNIGHT],
            Preset::SevenLeft => &[
                ROOK,
                BISHOP,
                LEFT_LANCE,
                RIGHT_LANCE,
                LEFT_KNIGHT,
                RIGHT_KNIGHT,
                LEFT_SILVER,
            ],
            Preset::SevenRight => &[
                ROOK,
                BISHOP,
                LEFT_LANCE,
                RIGHT_LANCE,
                LEFT_KNIGHT,
                RIGHT_KNIGHT,
                RIGHT_SILVER,
            ],
            Preset::Eight => &[
                ROOK,
                BISHOP,
                LEFT_LANCE,
                RIGHT_LANCE,
                LEFT_KNIGHT,
                RIGHT_KNIGHT,
                LEFT_SILVER,
                RIGHT_SILVER,
            ],
            Preset::Ten => &[
                ROOK,
                BISHOP,
                LEFT_LANCE,
                RIGHT_LANCE,
                LEFT_KNIGHT,
                RIGHT_KNIGHT,
                LEFT_SILVER,
                RIGHT_SILVER,
                LEFT_GOLD,
                RIGHT_GOLD,
            ],
        }
    }

    /// 先に指す手番（駒落ちは上手 = 後手から）
    pub fn first_turn(self) -> Color {
        match self {
            Preset::Hirate | Preset::Other => Color::Black,
            _ => Color::White,
        }
    }

    /// 手合割の盤面。`Other` は駒のない盤面
    pub fn board(self) -> BoardState {
        let mut state = BoardState::empty();
        if self == Preset::Other {
            return state;
        }
        for (i, &kind) in BACK_RANK.iter().enumerate() {
            let file = 9 - i as u8;
            place(&mut state, file, 1, kind, Color::White);
            place(&mut state, file, 9, kind, Color::Black);
            place(&mut state, file, 3, PieceKind::Pawn, Color::White);
            place(&mut state, file, 7, PieceKind::Pawn, Color::Black);
        }
        place(&mut state, 8, 2, PieceKind::Rook, Color::White);
        place(&mut state, 2, 2, PieceKind::Bishop, Color::White);
        place(&mut state, 2, 8, PieceKind::Rook, Color::Black);
        place(&mut state, 8, 8, PieceKind::Bishop, Color::Black);

        for &(file, rank) in self.removed() {
            if let Some(sq) = Square::new(file, rank) {
                state.clear(sq);
            }
        }
        state
    }
}

fn place(state: &mut BoardState, file: u8, rank: u8, kind: PieceKind, color: Color) {
    if let Some(sq) = Square::new(file, rank) {
        state.put(sq, Piece::new(kind, color));
    }
}

/// 開始局面
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialPosition {
    pub preset: Preset,
    pub board: BoardState,
    pub turn: Color,
}

impl InitialPosition {
    pub fn hirate() -> Self {
        InitialPosition { preset: Preset::Hirate, board: Preset::Hirate.board(), turn: Color::Black }
    }

    /// JKF の `initial` を解釈する。省略時は平手
    pub fn from_json(initial: Option<&InitialJson>) -> KifuResult<Self> {
        let Some(initial) = initial else {
            return Ok(Self::hirate());
        };
        let preset = Preset::from_jkf(&initial.preset).ok_or_else(|| {
            KifuError::MalformedInput(format!("unknown preset {:?}", initial.preset))
        })?;
        if preset != Preset::Other {
            return Ok(InitialPosition { preset, board: preset.board(), turn: preset.first_turn() });
        }
        let data = initial.data.as_ref().ok_or_else(|| {
            KifuError::MalformedInput("preset OTHER requires board data".to_string())
        })?;
        let (board, turn) = parse_state(data)?;
        Ok(InitialPosition { preset, board, turn })
    }

    /// JKF 表現に戻す。平手は省略可能だが常に書き出す
    pub fn to_json(&self) -> InitialJson {
        let data = (self.preset == Preset::Other).then(|| state_json(&self.board, self.turn));
        InitialJson { preset: self.preset.to_jkf().to_string(), data }
    }
}

fn parse_state(data: &StateJson) -> KifuResult<(BoardState, Color)> {
    let turn = Color::from_jkf(data.color)
        .ok_or_else(|| KifuError::MalformedInput(format!("invalid color {}", data.color)))?;
    if data.board.len() != BOARD_SIZE || data.board.iter().any(|col| col.len() != BOARD_SIZE) {
        return Err(KifuError::MalformedInput("board data must be 9x9".to_string()));
    }
    let mut state = BoardState::empty();
    for (x, column) in data.board.iter().enumerate() {
        for (y, cell) in column.iter().enumerate() {
            let Some(sq) = Square::new(x as u8 + 1, y as u8 + 1) else {
                continue;
            };
            match (cell.color, cell.kind.as_deref()) {
                (None, None) => {}
                (Some(color), Some(code)) => {
                    let color = Color::from_jkf(color).ok_or_else(|| {
                        KifuError::MalformedInput(format!("invalid color {color} at {sq}"))
                    })?;
                    let kind = PieceKind::from_csa(code).ok_or_else(|| {
                        KifuError::MalformedInput(format!("unknown piece kind {code:?} at {sq}"))
                    })?;
                    state.put(sq, Piece::new(kind, color));
                }
                _ => {
                    return Err(KifuError::MalformedInput(format!(
                        "cell {sq} needs both color and kind"
                    )));
                }
            }
        }
    }
    if data.hands.len() > Color::NUM {
        return Err(KifuError::MalformedInput("hands must have at most two entries".to_string()));
    }
    for (color, hand) in Color::ALL.iter().zip(data.hands.iter()) {
        for (code, &count) in hand {
            let kind = PieceKind::from_csa(code).ok_or_else(|| {
                KifuError::MalformedInput(format!("unknown hand piece {code:?}"))
            })?;
            state.hand_mut(*color).set(kind, count)?;
        }
    }
    Ok((state, turn))
}

fn state_json(board: &BoardState, turn: Color) -> StateJson {
    let cells = (1..=BOARD_SIZE as u8)
        .map(|x| {
            (1..=BOARD_SIZE as u8)
                .map(|y| {
                    Square::new(x, y).and_then(|sq| board.piece_at(sq)).map_or_else(
                        CellJson::default,
                        |p| CellJson {
                            color: Some(p.color.index() as u8),
                            kind: Some(p.kind.csa().to_string()),
                        },
                    )
                })
                .collect()
        })
        .collect();
    let hands = Color::ALL
        .iter()
        .map(|&color| {
            HAND_ORDER
                .iter()
                .map(|&kind| (kind.csa().to_string(), board.hand(color).count(kind)))
                .collect()
        })
        .collect();
    StateJson { color: turn.index() as u8, board: cells, hands }
}

//! JSON Kifu Format (JKF) の入出力表現
//!
//! 必須フィールドも `Option` で受け、欠落は [`crate::record`] 側で
//! `MalformedInput` として報告する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 棋譜全体
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KifuJson {
    /// 対局者名・棋戦名などの付帯情報
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, String>,
    /// 初期局面（省略時は平手）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialJson>,
    /// 指し手列。先頭要素は初期局面へのコメント用
    #[serde(default)]
    pub moves: Vec<MoveFormatJson>,
}

/// 初期局面
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitialJson {
    /// "HIRATE", "KY", ..., "OTHER"
    pub preset: String,
    /// preset が "OTHER" のときの局面
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StateJson>,
}

/// 任意局面
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateJson {
    /// 手番: 0 | 1
    pub color: u8,
    /// board[筋-1][段-1]
    #[serde(default)]
    pub board: Vec<Vec<CellJson>>,
    /// [先手, 後手] の持ち駒（"FU": 枚数, ...）
    #[serde(default)]
    pub hands: Vec<BTreeMap<String, u8>>,
}

/// 盤面の1マス。空きマスは `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// 指し手列の1要素
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveFormatJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub mv: Option<MoveJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeJson>,
    /// "TORYO" などの特殊な指し手
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    /// この手の代わりに指された変化（各要素が変化手順）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<Vec<Vec<MoveFormatJson>>>,
}

/// 指し手本体
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    /// 移動元（打つ手では省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PlaceJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<PlaceJson>,
    /// 動かす前の駒種
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece: Option<String>,
    /// 直前の手と同じマスへの移動（「同」）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promote: Option<bool>,
    /// 取った駒の駒種
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    /// 相対位置表記（"L", "C", "R", "U", "M", "D", "H" の組み合わせ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

/// 筋(x)・段(y)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceJson {
    pub x: u8,
    pub y: u8,
}

/// 消費時間
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeJson {
    pub now: TimeSpanJson,
    pub total: TimeSpanJson,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSpanJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    pub m: u32,
    pub s: u32,
}

impl KifuJson {
    /// JSON 文字列から読み込む
    pub fn parse(s: &str) -> crate::error::KifuResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let kifu = KifuJson::parse(r#"{"header":{},"moves":[{}]}"#).unwrap();
        assert!(kifu.initial.is_none());
        assert_eq!(kifu.moves.len(), 1);
    }

    #[test]
    fn test_parse_move_with_fork() {
        let src = r#"{
            "header": {"先手": "A"},
            "initial": {"preset": "HIRATE"},
            "moves": [
                {"comments": ["開始"]},
                {"move": {"color": 0, "from": {"x": 7, "y": 7}, "to": {"x": 7, "y": 6}, "piece": "FU"},
                 "forks": [[{"move": {"color": 0, "from": {"x": 2, "y": 7}, "to": {"x": 2, "y": 6}, "piece": "FU"}}]]}
            ]
        }"#;
        let kifu = KifuJson::parse(src).unwrap();
        assert_eq!(kifu.header.get("先手").map(String::as_str), Some("A"));
        let first = kifu.moves[1].mv.as_ref().unwrap();
        assert_eq!(first.to, Some(PlaceJson { x: 7, y: 6 }));
        assert_eq!(kifu.moves[1].forks.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_cell_serializes_as_empty_object() {
        let cell = CellJson::default();
        assert_eq!(serde_json::to_string(&cell).unwrap(), "{}");
    }

    #[test]
    fn test_parse_error_is_malformed_input() {
        let err = KifuJson::parse("{").unwrap_err();
        assert!(matches!(err, crate::error::KifuError::MalformedInput(_)));
    }
}

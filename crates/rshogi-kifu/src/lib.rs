//! # rshogi-kifu
//!
//! 分岐付き棋譜（JKF）を読み込み、任意の手数・変化の局面を差分で再現するライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, PieceKind, Hand）
//! - `rules`: 駒の動き・成り・表示名の定数表
//! - `json`: JKF の serde 表現
//! - `record`: 正規化された1手（MoveRecord）
//! - `preset`: 手合割と任意局面
//! - `state`: 盤面と持ち駒、1手の apply/undo
//! - `notation`: 棋譜表記（▲７六歩 など）
//! - `reach`: 駒の幾何的な到達範囲
//! - `tree`: 分岐の木、カーソル移動と変化の切り替え
//! - `snapshot`: 表示層向けの局面ビュー
//! - `kif`: KIF 形式の書き出し
//!
//! ```
//! use rshogi_kifu::MoveTree;
//!
//! let src = r#"{"moves":[{},{"move":{"color":0,"from":{"x":7,"y":7},"to":{"x":7,"y":6},"piece":"FU"}}]}"#;
//! let mut tree = MoveTree::from_json_str(src).unwrap();
//! tree.go_to(1).unwrap();
//! assert_eq!(tree.notation(1).unwrap(), "▲７六歩");
//! ```

pub mod error;
pub mod json;
pub mod kif;
pub mod notation;
pub mod preset;
pub mod reach;
pub mod record;
pub mod rules;
pub mod snapshot;
pub mod state;
pub mod tree;
pub mod types;

pub use error::{KifuError, KifuResult};
pub use json::KifuJson;
pub use notation::NotationStyle;
pub use preset::{InitialPosition, Preset};
pub use record::{Action, MoveRecord, PieceMove, Relative, SpecialMove};
pub use snapshot::Snapshot;
pub use state::{BoardState, Grid};
pub use tree::{MoveInput, MoveListEntry, MoveTree};
pub use types::{Color, Hand, Piece, PieceKind, Square};

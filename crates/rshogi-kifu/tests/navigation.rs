//! Loading, cursor movement and variation switching through the public API

use rshogi_kifu::{
    Color, KifuError, MoveTree, NotationStyle, Piece, PieceKind, Preset, Square,
};
use serde_json::{Value, json};

fn sq(file: u8, rank: u8) -> Square {
    Square::new(file, rank).unwrap()
}

fn mv(color: u8, piece: &str, from: (u8, u8), to: (u8, u8)) -> Value {
    json!({"move": {
        "color": color,
        "from": {"x": from.0, "y": from.1},
        "to": {"x": to.0, "y": to.1},
        "piece": piece
    }})
}

fn load(value: Value) -> MoveTree {
    MoveTree::from_json_str(&value.to_string()).unwrap()
}

/// 3手目に変化が1つある棋譜（変化側も2手続く）
fn branched_game() -> MoveTree {
    let mut third = mv(0, "FU", (2, 7), (2, 6));
    third["forks"] = json!([[
        mv(0, "KA", (8, 8), (2, 2)),
        mv(1, "GI", (3, 1), (2, 2)),
    ]]);
    third["forks"][0][0]["move"]["promote"] = json!(true);
    third["forks"][0][0]["move"]["capture"] = json!("KA");
    third["forks"][0][1]["move"]["same"] = json!(true);
    third["forks"][0][1]["move"]["capture"] = json!("UM");
    load(json!({
        "header": {"先手": "sente", "後手": "gote"},
        "moves": [
            {},
            mv(0, "FU", (7, 7), (7, 6)),
            mv(1, "FU", (3, 3), (3, 4)),
            third,
            mv(1, "FU", (8, 3), (8, 4)),
            mv(0, "FU", (2, 6), (2, 5)),
            mv(1, "FU", (8, 4), (8, 5)),
        ]
    }))
}

#[test]
fn scenario_single_pawn_push() {
    let mut tree = load(json!({"moves": [{}, mv(0, "FU", (7, 7), (7, 6))]}));
    let start = Preset::Hirate.board();

    assert_eq!(tree.board(), &start);
    tree.go_to(1).unwrap();
    assert!(tree.board().is_empty_at(sq(7, 7)));
    assert_eq!(tree.board().piece_at(sq(7, 6)), Some(Piece::new(PieceKind::Pawn, Color::Black)));
    assert_eq!(tree.focus(), Some(sq(7, 6)));

    tree.go_to(0).unwrap();
    assert_eq!(tree.board(), &start);
    assert_eq!(tree.focus(), None);
}

#[test]
fn scenario_branch_point_switch_and_restore() {
    let mut tree = branched_game();
    let original: Vec<String> = tree.moves().into_iter().map(|m| m.notation).collect();

    let forks = tree.fork_list(3).unwrap();
    assert_eq!(forks, vec!["▲２六歩".to_string(), "▲２二角成".to_string()]);

    tree.switch_fork(3, 1).unwrap();
    let switched: Vec<String> = tree.moves().into_iter().map(|m| m.notation).collect();
    assert_eq!(switched[..3], original[..3]);
    assert_eq!(switched[3..], ["▲２二角成".to_string(), "△同　銀".to_string()]);

    tree.switch_fork(3, 0).unwrap();
    let restored: Vec<String> = tree.moves().into_iter().map(|m| m.notation).collect();
    assert_eq!(restored, original);
}

#[test]
fn scenario_out_of_range_cursor() {
    let mut tree = branched_game();
    tree.go_to(4).unwrap();
    let board = tree.board().clone();

    assert!(matches!(tree.go_by(-5), Err(KifuError::InvalidNavigation(_))));
    assert!(matches!(tree.go_to(tree.last_ply() + 1), Err(KifuError::InvalidNavigation(_))));
    assert_eq!(tree.board(), &board);
    assert_eq!(tree.cursor(), 4);
}

#[test]
fn switching_inside_variation_replays_capture() {
    let mut tree = branched_game();
    tree.go_to(6).unwrap();
    tree.switch_fork(3, 1).unwrap();
    assert_eq!(tree.cursor(), 3);
    assert_eq!(tree.board().piece_at(sq(2, 2)), Some(Piece::new(PieceKind::Horse, Color::Black)));
    assert_eq!(tree.hand(Color::Black).count(PieceKind::Bishop), 1);

    tree.forward().unwrap();
    assert_eq!(tree.board().piece_at(sq(2, 2)), Some(Piece::new(PieceKind::Silver, Color::White)));
    // 馬を取られると角として持ち駒になる
    assert_eq!(tree.hand(Color::White).count(PieceKind::Bishop), 1);
    assert!(tree.forward().is_err());

    tree.go_to(0).unwrap();
    assert_eq!(tree.board(), &Preset::Hirate.board());
    assert!(tree.hand(Color::Black).is_empty());
    assert!(tree.hand(Color::White).is_empty());
}

#[test]
fn selecting_current_variant_is_noop() {
    let mut tree = branched_game();
    tree.go_to(5).unwrap();
    let before = (tree.board().clone(), tree.cursor(), tree.moves());
    tree.switch_fork(3, 0).unwrap();
    assert_eq!((tree.board().clone(), tree.cursor(), tree.moves()), before);
}

#[test]
fn failed_switch_leaves_state_unchanged() {
    // 変化の初手が存在しない駒を動かしている
    let mut third = mv(0, "FU", (2, 7), (2, 6));
    third["forks"] = json!([[mv(0, "FU", (5, 5), (5, 4))]]);
    let mut tree = load(json!({
        "moves": [
            {},
            mv(0, "FU", (7, 7), (7, 6)),
            mv(1, "FU", (3, 3), (3, 4)),
            third,
            mv(1, "FU", (8, 3), (8, 4)),
        ]
    }));
    tree.go_to(4).unwrap();
    let before = (tree.board().clone(), tree.cursor(), tree.moves(), tree.selection(3));

    let err = tree.switch_fork(3, 1).unwrap_err();
    assert!(matches!(err, KifuError::InternalInconsistency(_)), "{err}");
    assert_eq!((tree.board().clone(), tree.cursor(), tree.moves(), tree.selection(3)), before);
    assert_eq!(tree.selection(3), Some(0));
    assert_eq!(tree.focus(), Some(sq(8, 4)));

    // 失敗後も通常どおり移動できる
    tree.go_to(0).unwrap();
    assert_eq!(tree.board(), &Preset::Hirate.board());
}

#[test]
fn branch_markers_in_move_list() {
    let tree = branched_game();
    let moves = tree.moves();
    assert_eq!(moves.len(), 7);
    assert_eq!(moves[0].notation, "開始局面");
    assert!(moves[3].is_branch);
    assert_eq!(moves[3].variant, Some(0));
    assert!(moves.iter().filter(|m| m.is_branch).count() == 1);
}

#[test]
fn handicap_starts_with_white() {
    let mut tree = load(json!({
        "initial": {"preset": "2"},
        "moves": [{}, mv(1, "FU", (5, 3), (5, 4)), mv(0, "FU", (7, 7), (7, 6))]
    }));
    assert_eq!(tree.side_to_move(), Color::White);
    assert!(tree.board().is_empty_at(sq(8, 2)));
    assert!(tree.board().is_empty_at(sq(2, 2)));
    tree.go_to(2).unwrap();
    assert_eq!(tree.notation(1).unwrap(), "△５四歩");
    assert_eq!(tree.side_to_move(), Color::White);
}

#[test]
fn custom_position_with_hands() {
    let mut board = vec![vec![json!({}); 9]; 9];
    board[4][0] = json!({"color": 1, "kind": "OU"});
    board[4][8] = json!({"color": 0, "kind": "OU"});
    let mut tree = load(json!({
        "initial": {"preset": "OTHER", "data": {"color": 0, "board": board, "hands": [{"KI": 1}, {}]}},
        "moves": [{}, {"move": {"color": 0, "to": {"x": 5, "y": 2}, "piece": "KI"}}, {"special": "TORYO"}]
    }));
    tree.go_to(2).unwrap();
    assert_eq!(tree.board().piece_at(sq(5, 2)), Some(Piece::new(PieceKind::Gold, Color::Black)));
    assert!(tree.hand(Color::Black).is_empty());
    assert_eq!(tree.notation(2).unwrap(), "△投了");
    assert_eq!(tree.focus(), None);
    tree.go_to(0).unwrap();
    assert_eq!(tree.hand(Color::Black).count(PieceKind::Gold), 1);
}

#[test]
fn malformed_documents_are_rejected() {
    let cases = [
        json!({"initial": {"preset": "NOPE"}, "moves": [{}]}),
        json!({"initial": {"preset": "OTHER"}, "moves": [{}]}),
        json!({"moves": [{}, {"move": {"color": 0, "piece": "FU"}}]}),
        json!({"moves": [{}, {"move": {"to": {"x": 7, "y": 6}, "piece": "FU"}}]}),
        json!({"moves": [{}, {"special": "UNKNOWN"}]}),
    ];
    for case in cases {
        let err = MoveTree::from_json_str(&case.to_string()).unwrap_err();
        assert!(matches!(err, KifuError::MalformedInput(_)), "{case}: {err}");
    }
    assert!(matches!(MoveTree::from_json_str("not json"), Err(KifuError::MalformedInput(_))));
}

#[test]
fn move_out_of_turn_is_rejected() {
    // 平手で後手が先に指している
    let err = MoveTree::from_json_str(&json!({"moves": [{}, mv(1, "FU", (3, 3), (3, 4))]}).to_string())
        .unwrap_err();
    assert!(matches!(err, KifuError::MalformedInput(_)));

    // 変化の中で手番が入れ替わっている
    let mut second = mv(1, "FU", (3, 3), (3, 4));
    second["forks"] = json!([[mv(0, "FU", (2, 7), (2, 6))]]);
    let err = MoveTree::from_json_str(
        &json!({"moves": [{}, mv(0, "FU", (7, 7), (7, 6)), second]}).to_string(),
    )
    .unwrap_err();
    assert!(matches!(err, KifuError::MalformedInput(_)));
}

#[test]
fn inconsistent_record_fails_atomically() {
    // 2手目が存在しない駒を動かす
    let mut tree = load(json!({
        "moves": [{}, mv(0, "FU", (7, 7), (7, 6)), mv(1, "FU", (5, 5), (5, 6))]
    }));
    let err = tree.go_to(2).unwrap_err();
    assert!(matches!(err, KifuError::InternalInconsistency(_)));
    assert_eq!(tree.cursor(), 0);
    assert_eq!(tree.board(), &Preset::Hirate.board());
    assert!(tree.verify().is_err());
}

#[test]
fn shogi_glyph_style() {
    let mut tree = branched_game();
    tree.set_style(NotationStyle::Shogi);
    assert_eq!(tree.notation(2).unwrap(), "☖３四歩");
}

#[test]
fn reachable_area_follows_current_position() {
    let mut tree = branched_game();
    let bishop = |tree: &MoveTree| {
        let area = tree.reachable_area(sq(8, 8));
        Square::all().filter(|s| area[s.row()][s.col()]).count()
    };
    assert_eq!(bishop(&tree), 0);
    tree.go_to(2).unwrap();
    // ７七 が空いて 2二 の角まで通る
    assert_eq!(bishop(&tree), 6);
    let drops = tree.drop_area();
    assert!(drops[sq(5, 5).row()][sq(5, 5).col()]);
}

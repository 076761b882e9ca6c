//! Branching move tree
//!
//! ノードはアリーナ (`Vec<Node>`) に置き、親子をインデックスで結ぶ。
//! `children[0]` が本譜、それ以降が変化。現在たどっている経路 (`path`) は
//! 分岐点ごとの選択 (`selections`) から決まり、`path[k]` が k 手目の記録になる。
//!
//! 盤面は1つだけ持ち、カーソル移動のたびに差分で進める・戻す。
//! 変更系の操作はすべて複製した盤面・経路の上で行い、成功したときだけ反映する。

use std::collections::BTreeMap;

use crate::error::{KifuError, KifuResult};
use crate::json::{KifuJson, MoveFormatJson};
use crate::notation::{NotationStyle, format_move, infer_relative};
use crate::preset::InitialPosition;
use crate::reach::{drop_area, reachable_area, reachable_squares};
use crate::record::{Action, MoveRecord, PieceMove};
use crate::snapshot::{ForkView, Snapshot, board_view, focus_view, hands_view};
use crate::state::{BoardState, Grid};
use crate::types::{Color, Hand, Piece, PieceKind, Square};

/// アリーナ内のノード番号
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// 開始局面のノード
    const ROOT: NodeId = NodeId(0);
}

#[derive(Clone, Debug)]
struct Node {
    record: MoveRecord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// 盤面操作からの指し手入力
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveInput {
    Move { from: Square, to: Square, promote: bool },
    Drop { kind: PieceKind, to: Square },
}

/// 指し手一覧の1行
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveListEntry {
    pub ply: usize,
    pub notation: String,
    /// この手数に変化がある
    pub is_branch: bool,
    /// 分岐点で選択中の変化番号
    pub variant: Option<usize>,
}

/// 分岐付きの棋譜と現在局面
#[derive(Clone, Debug)]
pub struct MoveTree {
    header: BTreeMap<String, String>,
    initial: InitialPosition,
    nodes: Vec<Node>,
    path: Vec<NodeId>,
    /// 分岐点の手数 → 選択中の変化番号
    selections: BTreeMap<usize, usize>,
    cursor: usize,
    state: BoardState,
    focus: Option<Square>,
    style: NotationStyle,
}

impl MoveTree {
    /// 指し手のない棋譜
    pub fn new(initial: InitialPosition) -> Self {
        MoveTree {
            header: BTreeMap::new(),
            state: initial.board.clone(),
            initial,
            nodes: vec![Node { record: MoveRecord::initial(Vec::new()), parent: None, children: Vec::new() }],
            path: vec![NodeId::ROOT],
            selections: BTreeMap::new(),
            cursor: 0,
            focus: None,
            style: NotationStyle::default(),
        }
    }

    /// JKF 文字列から読み込む
    pub fn from_json_str(s: &str) -> KifuResult<Self> {
        Self::from_jkf(&KifuJson::parse(s)?)
    }

    /// JKF から木を組み立てる。カーソルは開始局面
    pub fn from_jkf(kifu: &KifuJson) -> KifuResult<Self> {
        let initial = InitialPosition::from_json(kifu.initial.as_ref())?;
        let mut tree = MoveTree::new(initial);
        tree.header = kifu.header.clone();

        if let Some((head, line)) = kifu.moves.split_first() {
            if head.mv.is_some() || head.special.is_some() || head.forks.is_some() {
                return Err(KifuError::MalformedInput(
                    "the first entry must only describe the initial position".to_string(),
                ));
            }
            tree.nodes[NodeId::ROOT.0].record.comments = head.comments.clone().unwrap_or_default();
            let turn = tree.initial.turn;
            tree.build_line(NodeId::ROOT, line, turn)?;
        }

        let mut path = vec![NodeId::ROOT];
        let mut selections = BTreeMap::new();
        tree.extend_path(&mut path, &mut selections)?;
        tree.path = path;
        tree.selections = selections;
        log::debug!(
            "loaded kifu: preset={} nodes={} plies={}",
            tree.initial.preset.to_jkf(),
            tree.nodes.len(),
            tree.last_ply()
        );
        Ok(tree)
    }

    fn build_line(&mut self, mut parent: NodeId, line: &[MoveFormatJson], mut turn: Color) -> KifuResult<()> {
        for entry in line {
            let record = MoveRecord::from_format(entry, turn)?;
            let next = next_turn(&record.action, turn);
            // 本譜を先に追加するので children[0] が本譜になる
            let id = self.push_node(parent, record);
            for fork in entry.forks.iter().flatten() {
                if fork.is_empty() {
                    return Err(KifuError::MalformedInput("empty variation".to_string()));
                }
                self.build_line(parent, fork, turn)?;
            }
            parent = id;
            turn = next;
        }
        Ok(())
    }

    fn push_node(&mut self, parent: NodeId, record: MoveRecord) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { record, parent: Some(parent), children: Vec::new() });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// 経路の末尾から選択に従って葉までたどる。新しい分岐点には 0 を記録する
    fn extend_path(&self, path: &mut Vec<NodeId>, selections: &mut BTreeMap<usize, usize>) -> KifuResult<()> {
        while let Some(&last) = path.last() {
            let slot = path.len();
            let children = &self.nodes[last.0].children;
            let next = match children.len() {
                0 => return Ok(()),
                1 => children[0],
                n => {
                    let variant = *selections.entry(slot).or_insert(0);
                    *children.get(variant).ok_or_else(|| {
                        inconsistent(format!("ply {slot} selects variation {variant} of {n}"))
                    })?
                }
            };
            path.push(next);
        }
        Err(inconsistent("path lost its root".to_string()))
    }

    // ---- 読み取り ----

    pub fn header(&self) -> &BTreeMap<String, String> {
        &self.header
    }

    pub fn initial(&self) -> &InitialPosition {
        &self.initial
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 現在の経路の最終手数
    #[inline]
    pub fn last_ply(&self) -> usize {
        self.path.len() - 1
    }

    /// 全ノード数（開始局面を含む）
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn style(&self) -> NotationStyle {
        self.style
    }

    pub fn set_style(&mut self, style: NotationStyle) {
        self.style = style;
    }

    pub fn board(&self) -> &BoardState {
        &self.state
    }

    pub fn grid(&self, flipped: bool) -> Grid<Option<Piece>> {
        self.state.grid(flipped)
    }

    pub fn hand(&self, color: Color) -> &Hand {
        self.state.hand(color)
    }

    /// 直前の手の移動先（開始局面・特殊な指し手では None）
    pub fn focus(&self) -> Option<Square> {
        self.focus
    }

    /// 現在局面の手番
    pub fn side_to_move(&self) -> Color {
        match &self.current_record().action {
            Action::Initial => self.initial.turn,
            Action::Move(mv) => mv.color.opponent(),
            Action::Special { color, .. } => *color,
        }
    }

    pub fn current_record(&self) -> &MoveRecord {
        &self.nodes[self.path[self.cursor].0].record
    }

    pub fn record(&self, ply: usize) -> KifuResult<&MoveRecord> {
        self.path
            .get(ply)
            .map(|id| &self.nodes[id.0].record)
            .ok_or_else(|| self.out_of_range(ply))
    }

    pub fn notation(&self, ply: usize) -> KifuResult<String> {
        Ok(format_move(self.record(ply)?, self.style))
    }

    pub fn comments(&self, ply: usize) -> KifuResult<&[String]> {
        Ok(&self.record(ply)?.comments)
    }

    /// 現在の経路の指し手一覧
    pub fn moves(&self) -> Vec<MoveListEntry> {
        self.path
            .iter()
            .enumerate()
            .map(|(ply, id)| MoveListEntry {
                ply,
                notation: format_move(&self.nodes[id.0].record, self.style),
                is_branch: self.variant_count(ply) > 1,
                variant: self.selection(ply),
            })
            .collect()
    }

    /// `ply` 手目の候補数（分岐点でなければ 1、範囲外と開始局面は 0）
    pub fn variant_count(&self, ply: usize) -> usize {
        if ply == 0 || ply >= self.path.len() {
            return 0;
        }
        self.nodes[self.path[ply - 1].0].children.len()
    }

    /// 分岐点で選択中の変化番号
    pub fn selection(&self, ply: usize) -> Option<usize> {
        (self.variant_count(ply) > 1).then(|| self.selections.get(&ply).copied().unwrap_or(0))
    }

    /// 分岐点の候補の表示文字列（0 が本譜）。分岐点でなければ空
    pub fn fork_list(&self, ply: usize) -> KifuResult<Vec<String>> {
        if ply == 0 || ply >= self.path.len() {
            return Err(KifuError::InvalidNavigation(format!("ply {ply} has no alternatives")));
        }
        let children = &self.nodes[self.path[ply - 1].0].children;
        if children.len() < 2 {
            return Ok(Vec::new());
        }
        Ok(children.iter().map(|id| format_move(&self.nodes[id.0].record, self.style)).collect())
    }

    /// 現在局面で `sq` の駒が到達できるマス
    pub fn reachable_area(&self, sq: Square) -> Grid<bool> {
        reachable_area(&self.state, sq)
    }

    /// 現在局面で持ち駒を打てるマス
    pub fn drop_area(&self) -> Grid<bool> {
        drop_area(&self.state)
    }

    // ---- カーソル移動 ----

    /// 指定の手数の局面にする
    pub fn go_to(&mut self, ply: usize) -> KifuResult<()> {
        if ply >= self.path.len() {
            return Err(self.out_of_range(ply));
        }
        if ply == self.cursor {
            return Ok(());
        }
        let mut state = self.state.clone();
        self.replay(&mut state, &self.path, self.cursor, ply)?;
        log::debug!("cursor {} -> {}", self.cursor, ply);
        self.commit_cursor(state, ply);
        Ok(())
    }

    pub fn forward(&mut self) -> KifuResult<()> {
        self.go_to(self.cursor + 1)
    }

    pub fn backward(&mut self) -> KifuResult<()> {
        let Some(target) = self.cursor.checked_sub(1) else {
            return Err(KifuError::InvalidNavigation("already at the initial position".to_string()));
        };
        self.go_to(target)
    }

    /// 相対移動。負の手数になる場合は失敗
    pub fn go_by(&mut self, delta: isize) -> KifuResult<()> {
        let target = self.cursor.checked_add_signed(delta).ok_or_else(|| {
            KifuError::InvalidNavigation(format!("cannot move {delta} plies from ply {}", self.cursor))
        })?;
        self.go_to(target)
    }

    fn replay(&self, state: &mut BoardState, path: &[NodeId], from: usize, to: usize) -> KifuResult<()> {
        if to < from {
            for ply in (to + 1..=from).rev() {
                let record = &self.nodes[path[ply].0].record;
                state.undo(&record.action).map_err(|e| self.at_ply(ply, record, e))?;
            }
        } else {
            for ply in from + 1..=to {
                let record = &self.nodes[path[ply].0].record;
                state.apply(&record.action).map_err(|e| self.at_ply(ply, record, e))?;
            }
        }
        Ok(())
    }

    fn commit_cursor(&mut self, state: BoardState, ply: usize) {
        self.state = state;
        self.cursor = ply;
        self.focus = self.current_record().destination();
    }

    // ---- 分岐 ----

    /// `slot` 手目の変化を切り替える
    ///
    /// カーソルが `slot` 以降にあれば、切り替え後の `slot` 手目の局面に移る。
    pub fn switch_fork(&mut self, slot: usize, variant: usize) -> KifuResult<()> {
        if slot == 0 {
            return Err(KifuError::InvalidNavigation(
                "the initial position has no alternatives".to_string(),
            ));
        }
        let variants = self.variant_count(slot);
        if variants < 2 {
            return Err(KifuError::InvalidNavigation(format!("ply {slot} is not a branch point")));
        }
        if variant >= variants {
            return Err(KifuError::InvalidNavigation(format!(
                "ply {slot} has {variants} variations, {variant} requested"
            )));
        }
        if self.selection(slot) == Some(variant) {
            return Ok(());
        }
        self.reselect(slot, variant)
    }

    fn reselect(&mut self, slot: usize, variant: usize) -> KifuResult<()> {
        let mut selections = self.selections.clone();
        // 以降の選択は新しい経路では意味を持たない
        selections.retain(|&ply, _| ply < slot);
        if self.nodes[self.path[slot - 1].0].children.len() > 1 {
            selections.insert(slot, variant);
        }
        let mut path = self.path[..slot].to_vec();
        self.extend_path(&mut path, &mut selections)?;

        let rewind = self.cursor >= slot;
        let mut state = self.state.clone();
        if rewind {
            self.replay(&mut state, &self.path, self.cursor, slot - 1)?;
            self.replay(&mut state, &path, slot - 1, slot)?;
        }
        log::debug!(
            "switch ply {slot} to variation {variant}: {} -> {} plies",
            self.last_ply(),
            path.len() - 1
        );
        self.selections = selections;
        self.path = path;
        if rewind {
            self.commit_cursor(state, slot);
        }
        Ok(())
    }

    // ---- 編集 ----

    /// 現在局面に1手追加して進める
    ///
    /// 同じ手がすでにあればそれをたどり、なければ新しい変化として追加する。
    /// 取った駒・「同」・相対位置は局面から補う。
    pub fn play(&mut self, input: MoveInput) -> KifuResult<()> {
        let mv = self.build_move(input)?;
        let record = MoveRecord { action: Action::Move(mv), comments: Vec::new(), time: None };
        let mut scratch = self.state.clone();
        scratch.apply(&record.action)?;

        let parent = self.path[self.cursor];
        let slot = self.cursor + 1;
        let existing = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| same_move(&self.nodes[id.0].record.action, &record.action));
        let added = existing.is_none();
        let variant = match existing {
            Some(index) => index,
            None => {
                self.push_node(parent, record);
                self.nodes[parent.0].children.len() - 1
            }
        };

        let child = self.nodes[parent.0].children[variant];
        let saved = (self.path.clone(), self.selections.clone());
        let result = if self.path.get(slot) == Some(&child) {
            self.go_to(slot)
        } else {
            self.reselect(slot, variant).and_then(|()| self.go_to(slot))
        };
        if let Err(err) = result {
            (self.path, self.selections) = saved;
            if added {
                self.nodes[parent.0].children.pop();
                self.nodes.pop();
            }
            return Err(err);
        }
        if added {
            log::debug!("added {} as variation {variant} of ply {slot}", self.notation(slot)?);
        }
        Ok(())
    }

    fn build_move(&self, input: MoveInput) -> KifuResult<PieceMove> {
        let color = self.side_to_move();
        let mut mv = match input {
            MoveInput::Drop { kind, to } => {
                if self.state.hand(color).count(kind) == 0 {
                    return Err(KifuError::MalformedInput(format!("{color:?} has no {kind} in hand")));
                }
                if !self.state.is_empty_at(to) {
                    return Err(KifuError::MalformedInput(format!("cannot drop on occupied {to}")));
                }
                PieceMove {
                    color,
                    kind,
                    from: None,
                    to,
                    promote: false,
                    same: false,
                    capture: None,
                    relative: None,
                }
            }
            MoveInput::Move { from, to, promote } => {
                let piece = self
                    .state
                    .piece_at(from)
                    .filter(|p| p.color == color)
                    .ok_or_else(|| KifuError::MalformedInput(format!("no {color:?} piece on {from}")))?;
                if !reachable_squares(&self.state, from, piece).contains(&to) {
                    return Err(KifuError::MalformedInput(format!(
                        "{} on {from} cannot reach {to}",
                        piece.kind
                    )));
                }
                if promote && !piece.kind.can_promote() {
                    return Err(KifuError::MalformedInput(format!("{} cannot promote", piece.kind)));
                }
                let capture = self.state.piece_at(to).map(|p| p.kind);
                if capture == Some(PieceKind::King) {
                    return Err(KifuError::MalformedInput("the king cannot be captured".to_string()));
                }
                PieceMove {
                    color,
                    kind: piece.kind,
                    from: Some(from),
                    to,
                    promote,
                    same: self.current_record().destination() == Some(to),
                    capture,
                    relative: None,
                }
            }
        };
        mv.relative = infer_relative(&self.state, &mv);
        Ok(mv)
    }

    // ---- 書き出し・検証 ----

    /// JKF に書き出す（本譜 = 各分岐点の 0 番）
    pub fn to_jkf(&self) -> KifuJson {
        let mut moves = vec![self.nodes[NodeId::ROOT.0].record.to_format()];
        moves.extend(self.export_line(NodeId::ROOT));
        KifuJson { header: self.header.clone(), initial: Some(self.initial.to_json()), moves }
    }

    fn export_line(&self, mut parent: NodeId) -> Vec<MoveFormatJson> {
        let mut line = Vec::new();
        while let Some((&main, alternatives)) = self.nodes[parent.0].children.split_first() {
            let mut entry = self.nodes[main.0].record.to_format();
            if !alternatives.is_empty() {
                let forks = alternatives
                    .iter()
                    .map(|&alt| {
                        let mut fork = vec![self.nodes[alt.0].record.to_format()];
                        fork.extend(self.export_line(alt));
                        fork
                    })
                    .collect();
                entry.forks = Some(forks);
            }
            line.push(entry);
            parent = main;
        }
        line
    }

    /// 全変化を開始局面から適用・巻き戻しして整合性を確かめる
    pub fn verify(&self) -> KifuResult<()> {
        let mut state = self.initial.board.clone();
        self.verify_from(NodeId::ROOT, 0, &mut state)?;
        if state != self.initial.board {
            return Err(inconsistent("verification did not restore the initial position".to_string()));
        }
        Ok(())
    }

    fn verify_from(&self, node: NodeId, ply: usize, state: &mut BoardState) -> KifuResult<()> {
        for &child in &self.nodes[node.0].children {
            if self.nodes[child.0].parent != Some(node) {
                let msg = format!("node {} is not linked back to its parent", child.0);
                return Err(inconsistent(msg));
            }
            let record = &self.nodes[child.0].record;
            state.apply(&record.action).map_err(|e| self.at_ply(ply + 1, record, e))?;
            self.verify_from(child, ply + 1, state)?;
            state.undo(&record.action).map_err(|e| self.at_ply(ply + 1, record, e))?;
        }
        Ok(())
    }

    /// 現在局面の表示用スナップショット
    pub fn snapshot(&self, flipped: bool) -> Snapshot {
        let next = self.cursor + 1;
        let forks = match self.fork_list(next) {
            Ok(list) => {
                let selected = self.selection(next);
                list.into_iter()
                    .enumerate()
                    .map(|(variant, notation)| ForkView {
                        variant,
                        notation,
                        selected: selected == Some(variant),
                    })
                    .collect()
            }
            Err(_) => Vec::new(),
        };
        let record = self.current_record();
        Snapshot {
            ply: self.cursor,
            last_ply: self.last_ply(),
            turn: self.side_to_move().index() as u8,
            flipped,
            board: board_view(&self.state, flipped),
            hands: hands_view(&self.state),
            focus: focus_view(self.focus),
            notation: format_move(record, self.style),
            comments: record.comments.clone(),
            forks,
        }
    }

    fn out_of_range(&self, ply: usize) -> KifuError {
        KifuError::InvalidNavigation(format!("ply {ply} is out of range 0..={}", self.last_ply()))
    }

    fn at_ply(&self, ply: usize, record: &MoveRecord, err: KifuError) -> KifuError {
        match err {
            KifuError::InternalInconsistency(msg) => KifuError::InternalInconsistency(format!(
                "ply {ply} {}: {msg}",
                format_move(record, self.style)
            )),
            other => other,
        }
    }
}

fn next_turn(action: &Action, turn: Color) -> Color {
    match action {
        Action::Move(mv) => mv.color.opponent(),
        Action::Initial | Action::Special { .. } => turn,
    }
}

/// 盤面に対して同じ効果を持つ手か（相対位置タグなどの表記は比べない）
fn same_move(a: &Action, b: &Action) -> bool {
    match (a, b) {
        (Action::Move(x), Action::Move(y)) => {
            x.color == y.color
                && x.kind == y.kind
                && x.from == y.from
                && x.to == y.to
                && x.promote == y.promote
        }
        _ => false,
    }
}

fn inconsistent(msg: String) -> KifuError {
    log::warn!("{msg}");
    KifuError::InternalInconsistency(msg)
}

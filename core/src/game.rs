// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game state machine: turn order, legality, passes and navigation
//!
//! The node tree is the source of truth. Board, hash history, prisoners and
//! pass counts are derived from the path root..=current and rebuilt by
//! replay whenever the current node moves anywhere but forward.

use crate::config::GameConfig;
use crate::node::{Annotations, MoveKind, NodeData, NodeId, NodeMove, Setup};
use crate::record::GameRecord;
use crate::scoring::{calculate_score, ScoreContext};
use crate::{
    Board, Color, Coordinate, DisputeResolutionRule, FourPassesRule, GameError, KoRule, LifeAndDeathSettlingRule,
    MoveSequence, PlayerKind, PositionHasher, Rules, Score, ScoringMarks, Tree,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    TwoConsecutivePasses,
    ThreeConsecutivePasses,
    /// Passes after a resumption; every stone on the board counts as alive
    FourConsecutivePasses,
    /// The given color resigned
    Resignation(Color),
}

impl EndReason {
    /// Winner decided without counting
    pub fn winner(&self) -> Option<Color> {
        match self {
            EndReason::Resignation(color) => Some(color.opposite()),
            _ => None,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::TwoConsecutivePasses => write!(f, "two consecutive passes"),
            EndReason::ThreeConsecutivePasses => write!(f, "three consecutive passes"),
            EndReason::FourConsecutivePasses => write!(f, "four consecutive passes"),
            EndReason::Resignation(color) => write!(f, "{color} resigned"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    /// `paused` only matters to callers driving computer-vs-computer play
    InProgress { paused: bool },
    Ended(EndReason),
}

impl GameStatus {
    pub fn is_ended(&self) -> bool {
        matches!(self, GameStatus::Ended(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::NotStarted => write!(f, "not started"),
            GameStatus::InProgress { paused: false } => write!(f, "in progress"),
            GameStatus::InProgress { paused: true } => write!(f, "paused"),
            GameStatus::Ended(reason) => write!(f, "ended ({reason})"),
        }
    }
}

/// Outcome of a legal placement, computed without playing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePreview {
    pub color: Color,
    pub coordinate: Coordinate,
    /// Stones that would be removed, in capture order
    pub captured: Vec<Coordinate>,
    /// Positional hash of the resulting board
    pub hash: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HistoryEntry {
    hash: u64,
    to_move: Color,
}

/// State after the nodes applied so far
#[derive(Debug, Clone)]
struct Position {
    board: Board,
    /// One entry per applied node
    history: Vec<HistoryEntry>,
    to_move: Color,
    move_number: usize,
    /// Stones captured by Black and by White
    prisoners: [u32; 2],
    last_captures: Vec<Coordinate>,
    consecutive_passes: u32,
    passes_since_resumption: u32,
    ended: Option<EndReason>,
}

fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

impl Position {
    fn new(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
            to_move: Color::Black,
            move_number: 0,
            prisoners: [0; 2],
            last_captures: Vec::new(),
            consecutive_passes: 0,
            passes_since_resumption: 0,
            ended: None,
        }
    }

    fn hash(&self) -> u64 {
        self.history.last().map_or(0, |entry| entry.hash)
    }

    /// Legality of `color` at `coord`: bounds, occupancy, suicide, then the ko rule
    fn preview(
        &self,
        hasher: &PositionHasher,
        rules: &Rules,
        color: Color,
        coord: Coordinate,
    ) -> Result<MovePreview, GameError> {
        let captured = self.board.preview_placement(coord, color)?;
        let hash = hasher.update(self.hash(), coord, color, &captured);

        match rules.ko_rule {
            KoRule::None => {}
            KoRule::SimpleKo => {
                let two_back = self.history.len().checked_sub(2).map(|i| self.history[i].hash);
                if captured.len() == 1 && two_back == Some(hash) {
                    return Err(GameError::SimpleKoViolation);
                }
            }
            KoRule::PositionalSuperko => {
                if self.history.iter().any(|entry| entry.hash == hash) {
                    return Err(GameError::SuperkoViolation);
                }
            }
            KoRule::SituationalSuperko => {
                let situation = hasher.with_side_to_move(hash, color.opposite());
                if self
                    .history
                    .iter()
                    .any(|entry| hasher.with_side_to_move(entry.hash, entry.to_move) == situation)
                {
                    return Err(GameError::SuperkoViolation);
                }
            }
        }

        Ok(MovePreview {
            color,
            coordinate: coord,
            captured,
            hash,
        })
    }

    /// Apply one node. On error the position is unchanged.
    fn apply(&mut self, hasher: &PositionHasher, rules: &Rules, data: &NodeData) -> Result<(), GameError> {
        if data.setup.is_some() && data.mv.is_some() {
            let mut next = self.clone();
            next.apply_parts(hasher, rules, data)?;
            *self = next;
            Ok(())
        } else {
            self.apply_parts(hasher, rules, data)
        }
    }

    /// Atomic as long as `data` carries a setup or a move, not both
    fn apply_parts(&mut self, hasher: &PositionHasher, rules: &Rules, data: &NodeData) -> Result<(), GameError> {
        let mut hash = self.hash();

        if let Some(setup) = &data.setup {
            let changes = setup.changes();
            if !changes.is_empty() {
                self.board.set_stones(&changes)?;
                hash = hasher.hash_for_board(&self.board);
            }
            self.last_captures.clear();
            if let Some(color) = setup.player_to_move {
                self.to_move = color;
            }
        }

        if let Some(mv) = data.mv {
            if let Some(EndReason::Resignation(_)) = self.ended {
                return Err(GameError::IllegalStateForOperation("the game has ended by resignation"));
            }
            let preview = match mv.kind {
                MoveKind::Play(coord) => Some(self.preview(hasher, rules, mv.color, coord)?),
                MoveKind::Pass | MoveKind::Resign => None,
            };
            // Out of turn means the turn was handed over before this move
            if mv.color != self.to_move && data.setup.is_none() {
                self.hand_turn_to(mv.color);
            }
            // A move after a pass-ended game means play was resumed
            if self.ended.is_some() {
                self.resume();
            }

            match (mv.kind, preview) {
                (MoveKind::Play(coord), Some(preview)) => {
                    self.board.place_stone(coord, mv.color)?;
                    self.prisoners[color_index(mv.color)] += preview.captured.len() as u32;
                    hash = preview.hash;
                    self.last_captures = preview.captured;
                    self.consecutive_passes = 0;
                    self.passes_since_resumption = 0;
                }
                (MoveKind::Resign, _) => {
                    self.last_captures.clear();
                    self.ended = Some(EndReason::Resignation(mv.color));
                }
                _ => {
                    self.last_captures.clear();
                    self.consecutive_passes += 1;
                    self.passes_since_resumption += 1;
                    self.ended = self.pass_verdict(rules);
                }
            }
            self.to_move = mv.color.opposite();
            self.move_number += 1;
        }

        self.history.push(HistoryEntry {
            hash,
            to_move: self.to_move,
        });
        Ok(())
    }

    fn pass_verdict(&self, rules: &Rules) -> Option<EndReason> {
        if rules.four_passes_rule == FourPassesRule::FourPassesEndTheGame && self.consecutive_passes >= 4 {
            Some(EndReason::FourConsecutivePasses)
        } else if self.passes_since_resumption >= rules.passes_to_end() {
            Some(match rules.settling_rule {
                LifeAndDeathSettlingRule::TwoPasses => EndReason::TwoConsecutivePasses,
                LifeAndDeathSettlingRule::ThreePasses => EndReason::ThreeConsecutivePasses,
            })
        } else {
            None
        }
    }

    fn resume(&mut self) {
        self.ended = None;
        self.passes_since_resumption = 0;
    }

    /// Give the turn to `color`. The current situation becomes the stones
    /// with `color` to move, which situational superko must see.
    fn hand_turn_to(&mut self, color: Color) {
        self.to_move = color;
        if let Some(last) = self.history.last_mut() {
            last.to_move = color;
        }
    }
}

/// A game of Go: rules, record tree and the position at the current node
#[derive(Debug, Clone)]
pub struct Game {
    id: Uuid,
    config: GameConfig,
    hasher: PositionHasher,
    tree: Tree,
    position: Position,
    handicap: Vec<Coordinate>,
    started: bool,
    paused: bool,
}

impl Game {
    /// New game; the root node carries the handicap stones, if any
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let handicap = Board::new(config.board_size).handicap_points(config.handicap)?;
        let root = if handicap.is_empty() {
            NodeData::default()
        } else {
            NodeData::from_setup(Setup {
                black: handicap,
                player_to_move: Some(Color::White),
                ..Setup::default()
            })
        };
        Self::with_tree(config, Tree::with_root(root))
    }

    /// Rebuild a game from a record, validating every node of every
    /// variation. The current node is the end of the main line.
    pub fn from_record(config: GameConfig, record: &GameRecord) -> Result<Self, GameError> {
        let tree = record.to_tree()?;
        let hasher = PositionHasher::new(config.board_size, config.hash_seed);
        let mut pending = vec![(tree.root(), Position::new(Board::new(config.board_size)))];
        while let Some((id, mut position)) = pending.pop() {
            let node = tree.node(id).ok_or(GameError::UnknownNode)?;
            position.apply(&hasher, &config.rules, node.data())?;
            pending.extend(node.children().iter().map(|&child| (child, position.clone())));
        }

        let mut game = Self::with_tree(config, tree)?;
        game.go_to_leaf()?;
        Ok(game)
    }

    /// [`Game::from_record`] with the settings stored in the record
    pub fn load(record: &GameRecord) -> Result<Self, GameError> {
        Self::from_record(record.config.clone(), record)
    }

    pub fn to_record(&self) -> GameRecord {
        GameRecord::from_tree(self.config.clone(), &self.tree)
    }

    fn with_tree(mut config: GameConfig, tree: Tree) -> Result<Self, GameError> {
        let handicap = tree
            .node(tree.root())
            .and_then(|root| root.setup())
            .filter(|setup| setup.player_to_move == Some(Color::White))
            .map(|setup| setup.black.clone())
            .unwrap_or_default();
        config.handicap = handicap.len() as u8;

        let mut game = Self {
            id: Uuid::new_v4(),
            hasher: PositionHasher::new(config.board_size, config.hash_seed),
            position: Position::new(Board::new(config.board_size)),
            config,
            tree,
            handicap,
            started: false,
            paused: false,
        };
        game.replay()?;
        Ok(game)
    }

    /// Re-derive the position from the path root..=current
    #[tracing::instrument(level = "debug", skip(self), fields(game = %self.id))]
    fn replay(&mut self) -> Result<(), GameError> {
        let mut position = Position::new(Board::new(self.config.board_size));
        for id in self.tree.path_to(self.tree.current()) {
            let node = self.tree.node(id).ok_or(GameError::UnknownNode)?;
            position.apply(&self.hasher, &self.config.rules, node.data())?;
        }
        debug!(moves = position.move_number, "replayed");
        self.started |= position.move_number > 0;
        self.position = position;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.config.rules
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn current_node(&self) -> NodeId {
        self.tree.current()
    }

    /// Annotations never influence the position, so editing needs no replay
    pub fn annotations_mut(&mut self, node: NodeId) -> Result<&mut Annotations, GameError> {
        self.tree.annotations_mut(node)
    }

    pub fn status(&self) -> GameStatus {
        match self.position.ended {
            Some(reason) => GameStatus::Ended(reason),
            None if self.started => GameStatus::InProgress { paused: self.paused },
            None => GameStatus::NotStarted,
        }
    }

    /// Whose turn it is
    pub fn next_player(&self) -> Color {
        self.position.to_move
    }

    /// Moves (including passes and resignation) up to the current node
    pub fn move_number(&self) -> usize {
        self.position.move_number
    }

    /// Stones captured by `color` so far
    pub fn prisoners(&self, color: Color) -> u32 {
        self.position.prisoners[color_index(color)]
    }

    /// Stones removed by the move at the current node
    pub fn last_captures(&self) -> &[Coordinate] {
        &self.position.last_captures
    }

    pub fn handicap(&self) -> &[Coordinate] {
        &self.handicap
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.position.consecutive_passes
    }

    /// Positional hash at the current node
    pub fn hash(&self) -> u64 {
        self.position.hash()
    }

    /// Positional hashes from the root to the current node
    pub fn hash_history(&self) -> Vec<u64> {
        self.position.history.iter().map(|entry| entry.hash).collect()
    }

    pub fn move_sequence(&self) -> MoveSequence {
        MoveSequence::of_current_variation(&self.tree)
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status() != GameStatus::NotStarted {
            return Err(GameError::IllegalStateForOperation("the game has already started"));
        }
        self.started = true;
        info!(game = %self.id, size = %self.config.board_size, "game started");
        Ok(())
    }

    /// Stop automated play between two computer players
    pub fn pause(&mut self) -> Result<(), GameError> {
        if !self.config.players.computer_vs_computer() {
            return Err(GameError::IllegalStateForOperation("only computer-vs-computer games can pause"));
        }
        match self.status() {
            GameStatus::InProgress { paused: false } => {
                self.paused = true;
                Ok(())
            }
            _ => Err(GameError::IllegalStateForOperation("the game is not running")),
        }
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        match self.status() {
            GameStatus::InProgress { paused: true } => {
                self.paused = false;
                Ok(())
            }
            _ => Err(GameError::IllegalStateForOperation("the game is not paused")),
        }
    }

    fn ensure_open(&self) -> Result<(), GameError> {
        if self.position.ended.is_some() {
            return Err(GameError::IllegalStateForOperation("the game has ended"));
        }
        Ok(())
    }

    /// Would the player to move be allowed to play at `coord`?
    pub fn check_move(&self, coord: Coordinate) -> Result<MovePreview, GameError> {
        self.check_move_for(self.next_player(), coord)
    }

    pub fn check_move_for(&self, color: Color, coord: Coordinate) -> Result<MovePreview, GameError> {
        self.ensure_open()?;
        self.position.preview(&self.hasher, &self.config.rules, color, coord)
    }

    pub fn is_legal(&self, coord: Coordinate) -> bool {
        self.check_move(coord).is_ok()
    }

    /// Every point where the player to move may place a stone
    pub fn legal_moves(&self) -> Vec<Coordinate> {
        if self.position.ended.is_some() {
            return Vec::new();
        }
        let color = self.next_player();
        self.position
            .board
            .iter()
            .map(|point| point.coordinate())
            .filter(|&coord| self.check_move_for(color, coord).is_ok())
            .collect()
    }

    /// Place a stone for the player to move. Returns the captured stones.
    pub fn play(&mut self, coord: Coordinate) -> Result<Vec<Coordinate>, GameError> {
        self.ensure_open()?;
        let color = self.next_player();
        let data = NodeData::from_move(NodeMove::play(color, coord));
        if let Err(err) = self.position.apply(&self.hasher, &self.config.rules, &data) {
            match err {
                GameError::SimpleKoViolation | GameError::SuperkoViolation => {
                    debug!(game = %self.id, %color, %coord, "ko detected");
                }
                _ => debug!(game = %self.id, %color, %coord, %err, "move rejected"),
            }
            return Err(err);
        }
        self.commit(data);
        Ok(self.position.last_captures.clone())
    }

    pub fn pass(&mut self) -> Result<(), GameError> {
        self.ensure_open()?;
        let data = NodeData::from_move(NodeMove::pass(self.next_player()));
        self.position.apply(&self.hasher, &self.config.rules, &data)?;
        self.commit(data);
        Ok(())
    }

    /// The player to move resigns. Cannot be undone.
    pub fn resign(&mut self) -> Result<(), GameError> {
        self.ensure_open()?;
        let data = NodeData::from_move(NodeMove::resign(self.next_player()));
        self.position.apply(&self.hasher, &self.config.rules, &data)?;
        self.commit(data);
        Ok(())
    }

    /// Add, remove or replace stones without a move
    pub fn setup(&mut self, setup: Setup) -> Result<NodeId, GameError> {
        self.ensure_open()?;
        let data = NodeData::from_setup(setup);
        self.position.apply(&self.hasher, &self.config.rules, &data)?;
        Ok(self.commit(data))
    }

    fn commit(&mut self, data: NodeData) -> NodeId {
        let node = self.tree.append(data, self.config.insert_policy);
        if !self.started {
            self.started = true;
            info!(game = %self.id, size = %self.config.board_size, "game started");
        }
        if let Some(reason) = self.position.ended {
            info!(game = %self.id, %reason, moves = self.position.move_number, "game ended");
        }
        node
    }

    /// Take back the most recent node of the current variation; its parent
    /// becomes current. When that hands the turn to a computer player, keep
    /// going until a human is to move.
    pub fn undo(&mut self) -> Result<(), GameError> {
        let root = self.tree.root();
        let last = self.tree.leaf_of_current_variation();
        if last == root {
            return Err(GameError::IllegalStateForOperation("nothing to undo"));
        }
        if matches!(self.tree.node(last).and_then(|node| node.mv()), Some(mv) if mv.kind == MoveKind::Resign) {
            return Err(GameError::IllegalStateForOperation("a resignation cannot be undone"));
        }

        let players = self.config.players;
        loop {
            let last = self.tree.leaf_of_current_variation();
            let parent = self.tree.parent(last).ok_or(GameError::UnknownNode)?;
            self.tree.discard_subtree(last)?;
            self.tree.change_variation(parent)?;
            self.replay()?;
            let computer_to_move = players.kind(self.next_player()) == PlayerKind::Computer;
            if !computer_to_move || !players.any_human() || parent == root {
                break;
            }
        }
        debug!(game = %self.id, moves = self.position.move_number, "undo");
        Ok(())
    }

    /// Reopen a game ended by passes so a life-and-death dispute can be
    /// played out. Under non-alternating dispute resolution `first` picks
    /// who moves next; under alternating play it must agree with the turn.
    pub fn resume_play(&mut self, first: Option<Color>) -> Result<(), GameError> {
        match self.position.ended {
            None => return Err(GameError::IllegalStateForOperation("the game has not ended")),
            Some(EndReason::Resignation(_)) => {
                return Err(GameError::IllegalStateForOperation("a resigned game cannot be resumed"))
            }
            Some(_) => {}
        }
        if self.config.rules.dispute_resolution == DisputeResolutionRule::AlternatingPlay
            && matches!(first, Some(color) if color != self.position.to_move)
        {
            return Err(GameError::IllegalStateForOperation(
                "alternating play decides who moves after resuming",
            ));
        }

        self.position.resume();
        if let Some(color) = first {
            self.position.hand_turn_to(color);
        }
        info!(game = %self.id, next = %self.next_player(), "play resumed");
        Ok(())
    }

    /// Hand the turn to `color`. Not stored in the record; the next
    /// move's color keeps it on replay, navigation drops it.
    pub fn set_next_player(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_open()?;
        self.position.hand_turn_to(color);
        Ok(())
    }

    /// Make `node` current and route the current variation through it
    pub fn go_to(&mut self, node: NodeId) -> Result<(), GameError> {
        self.tree.change_variation(node)?;
        self.replay()
    }

    pub fn go_back(&mut self) -> Result<(), GameError> {
        let parent = self
            .tree
            .parent(self.tree.current())
            .ok_or(GameError::IllegalStateForOperation("already at the first node"))?;
        self.go_to(parent)
    }

    pub fn go_forward(&mut self) -> Result<(), GameError> {
        let child = self
            .tree
            .active_child(self.tree.current())
            .ok_or(GameError::IllegalStateForOperation("no further moves in this variation"))?;
        self.go_to(child)
    }

    pub fn go_to_leaf(&mut self) -> Result<(), GameError> {
        self.go_to(self.tree.leaf_of_current_variation())
    }

    /// Jump to move `number` of the current variation; 0 is the root
    pub fn go_to_move(&mut self, number: usize) -> Result<(), GameError> {
        if number == 0 {
            return self.go_to(self.tree.root());
        }
        let node = self
            .move_sequence()
            .get(number)
            .map(|entry| entry.node)
            .ok_or(GameError::IllegalStateForOperation("no such move in this variation"))?;
        self.go_to(node)
    }

    /// Remove `node` and its subtree from the record
    pub fn discard(&mut self, node: NodeId) -> Result<usize, GameError> {
        let resigned = matches!(self.position.ended, Some(EndReason::Resignation(_)));
        if resigned && self.tree.is_ancestor(node, self.tree.current()) {
            return Err(GameError::IllegalStateForOperation("a resignation cannot be undone"));
        }
        let removed = self.tree.discard_subtree(node)?;
        self.replay()?;
        Ok(removed)
    }

    /// Count the current position with the given marks. After four
    /// consecutive passes every stone counts as alive.
    pub fn score(&self, marks: &ScoringMarks) -> Score {
        let context = ScoreContext {
            system: self.config.rules.scoring_system,
            komi: self.config.komi,
            handicap: self.handicap.len() as u8,
            prisoners: (self.prisoners(Color::Black), self.prisoners(Color::White)),
        };
        if self.position.ended == Some(EndReason::FourConsecutivePasses) {
            let all_alive = ScoringMarks::from_dead_stones(&self.position.board, []);
            return calculate_score(&self.position.board, &all_alive, context);
        }
        calculate_score(&self.position.board, marks, context)
    }

    /// Score with territory derived from the given dead stones
    pub fn score_with_dead_stones(&self, dead: &[Coordinate]) -> Score {
        let marks = ScoringMarks::from_dead_stones(&self.position.board, dead.iter().copied());
        self.score(&marks)
    }
}

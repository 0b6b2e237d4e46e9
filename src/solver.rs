//! An agent to pick Gomoku moves by game tree search

use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    board::{Board, BoardError},
    geometry::Pos,
    players::PlayerId,
};

/// Bound used as the initial alpha-beta window, far outside any reachable score
pub const INFINITY: i64 = 1 << 60;

/// Which tree search to run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Plain minimax over every candidate move
    Naive,
    /// Alpha-beta pruning with every opponent treated as a minimizer
    AlphaBeta,
    /// Alpha-beta that never prunes at the first opponent's ply
    ///
    /// Pruning at the second opponent's ply is not provably safe once three
    /// players are involved, so this variant can report a value above what
    /// [`Variant::Naive`] finds. It trades that for speed.
    AlphaBeta3p,
}

/// How the searching player's total is weighed against the opponents'
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Scoring {
    /// `own - sum(opponents)`
    #[default]
    Balanced,
    /// `own - 2 * sum(opponents)`
    Defensive,
}

impl Scoring {
    pub fn opponent_weight(self) -> i64 {
        match self {
            Scoring::Balanced => 1,
            Scoring::Defensive => 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub depth: u32,
    pub variant: Variant,
    pub scoring: Scoring,
    /// Search the root's children on separate threads
    pub parallel: bool,
    /// Keep the explored tree in the returned [`Future`]
    pub trace: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            variant: Variant::AlphaBeta,
            scoring: Scoring::default(),
            parallel: false,
            trace: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no legal moves left on the board")]
    NoLegalMoves,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// The resolved outcome of one node of the game tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Future {
    pub value: i64,
    /// The move that produced `value`, `None` at leaves
    pub best_move: Option<Pos>,
    /// Explored children in search order, only kept when tracing
    pub children: Vec<Branch>,
}

/// A traced child of a [`Future`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub mv: Pos,
    /// `None` marks that every sibling after `mv` was cut off
    pub future: Option<Future>,
}

impl Future {
    fn leaf(value: i64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Renders the traced tree below this node, one line per entry
    pub fn dump(&self, prefix: &str) -> Vec<String> {
        let mut lines = Vec::new();
        self.dump_into(prefix, &mut lines);
        lines
    }

    fn dump_into(&self, prefix: &str, lines: &mut Vec<String>) {
        lines.push(format!("{}, {}", prefix, self.value));
        if self.children.is_empty() {
            return;
        }
        let summary: Vec<String> = self
            .children
            .iter()
            .map(|branch| match &branch.future {
                Some(child) => format!("[({},{}),{}]", branch.mv.0, branch.mv.1, child.value),
                None => "[pruned]".to_string(),
            })
            .collect();
        lines.push(format!("{}: {}", prefix, summary.join(", ")));
        for branch in self.children.iter() {
            let (x, y) = branch.mv;
            match &branch.future {
                Some(child) => child.dump_into(&format!("{}, ({},{})", prefix, x, y), lines),
                None => lines.push(format!(
                    "[pruned] Any child after <{}, ({},{})> is pruned",
                    prefix, x, y
                )),
            }
        }
    }
}

/// The move picked by [`choose_move_with`] and how it was found
#[derive(Clone, Debug)]
pub struct Decision {
    pub mv: Pos,
    pub value: i64,
    pub node_count: usize,
    pub future: Future,
}

/// An agent searching Gomoku positions on behalf of one player
///
/// # Notes
/// The solver never copies the board while searching. Each candidate move is
/// played on the board, searched below, and taken back again through
/// [`Board::with_move`], which also restores the possible-move set, so the
/// board leaves every call exactly as it came in.
///
/// # Position Scoring
/// A leaf is scored from the searching player's point of view as their own
/// heuristic total minus the opponents' totals, weighted by [`Scoring`]. A
/// leaf is reached at depth 0, when the player who just moved owns a five,
/// or when the board has no candidate moves left; the last case is a draw
/// and scores 0.
#[derive(Clone, Debug)]
pub struct Solver {
    player: PlayerId,
    scoring: Scoring,
    trace: bool,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` maximizing for `player`
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            scoring: Scoring::default(),
            trace: false,
            node_count: 0,
        }
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Keeps every explored child in the returned futures
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The static score of the board for the searching player
    pub fn leaf_value(&self, board: &Board) -> i64 {
        let own = board.heuristic_value_for(self.player);
        let others: i64 = PlayerId::all(board.player_count())
            .filter(|&player| player != self.player)
            .map(|player| board.heuristic_value_for(player))
            .sum();
        own - self.scoring.opponent_weight() * others
    }

    fn terminal(&self, board: &Board, depth: u32, mover: PlayerId) -> Option<Future> {
        let just_moved = mover.prev(board.player_count());
        if board.has_five(just_moved) || depth == 0 {
            return Some(Future::leaf(self.leaf_value(board)));
        }
        if board.possible_moves().is_empty() {
            return Some(Future::leaf(0));
        }
        None
    }

    fn record(&self, node: &mut Future, mv: Pos, child: Future) {
        if self.trace {
            node.children.push(Branch {
                mv,
                future: Some(child),
            });
        }
    }

    fn record_cutoff(&self, node: &mut Future, mv: Pos) {
        if self.trace {
            node.children.push(Branch { mv, future: None });
        }
    }

    /// Performs minimax search without pruning
    ///
    /// `mover` is the player to move at this node; the node maximizes when
    /// that is the searching player and minimizes otherwise.
    pub fn naive_minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mover: PlayerId,
    ) -> Result<Future, BoardError> {
        self.node_count += 1;
        if let Some(leaf) = self.terminal(board, depth, mover) {
            return Ok(leaf);
        }

        let maximizing = mover == self.player;
        let next = mover.next(board.player_count());
        // iterate a snapshot, the board's own set changes under each child
        let moves = *board.possible_moves();

        let mut node = Future::default();
        let mut best: Option<i64> = None;
        for (x, y) in moves.iter() {
            let child = board.with_move(x, y, mover, |board| {
                self.naive_minimax(board, depth - 1, next)
            })??;
            let improves = match best {
                None => true,
                Some(value) if maximizing => child.value > value,
                Some(value) => child.value < value,
            };
            if improves {
                best = Some(child.value);
                node.best_move = Some((x, y));
            }
            self.record(&mut node, (x, y), child);
        }
        node.value = best.unwrap_or(0);
        Ok(node)
    }

    /// Performs alpha-beta search, pruning at every ply
    pub fn alphabeta(
        &mut self,
        board: &mut Board,
        depth: u32,
        alpha: i64,
        beta: i64,
        mover: PlayerId,
    ) -> Result<Future, BoardError> {
        self.windowed(board, depth, alpha, beta, mover, false)
    }

    /// Performs alpha-beta search that skips pruning at the ply of the
    /// player seated right after the searching player
    pub fn alphabeta_3p(
        &mut self,
        board: &mut Board,
        depth: u32,
        alpha: i64,
        beta: i64,
        mover: PlayerId,
    ) -> Result<Future, BoardError> {
        self.windowed(board, depth, alpha, beta, mover, true)
    }

    fn windowed(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        mover: PlayerId,
        spare_first_minimizer: bool,
    ) -> Result<Future, BoardError> {
        self.node_count += 1;
        if let Some(leaf) = self.terminal(board, depth, mover) {
            return Ok(leaf);
        }

        let player_count = board.player_count();
        let maximizing = mover == self.player;
        let may_prune = !(spare_first_minimizer && mover == self.player.next(player_count));
        let next = mover.next(player_count);
        let moves = *board.possible_moves();

        let mut node = Future::default();
        for (x, y) in moves.iter() {
            let child = board.with_move(x, y, mover, |board| {
                self.windowed(board, depth - 1, alpha, beta, next, spare_first_minimizer)
            })??;
            let value = child.value;
            self.record(&mut node, (x, y), child);

            if maximizing {
                if value > alpha {
                    alpha = value;
                    node.best_move = Some((x, y));
                }
            } else if value < beta {
                beta = value;
                node.best_move = Some((x, y));
            }
            // the rest of the siblings cannot change the parent's choice
            if may_prune && beta <= alpha {
                self.record_cutoff(&mut node, (x, y));
                break;
            }
        }
        node.value = if maximizing { alpha } else { beta };
        Ok(node)
    }

    /// Searches `depth` plies from the current position with the searching
    /// player to move and a full window
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: u32,
        variant: Variant,
    ) -> Result<Future, BoardError> {
        let player = self.player;
        match variant {
            Variant::Naive => self.naive_minimax(board, depth, player),
            Variant::AlphaBeta => self.alphabeta(board, depth, -INFINITY, INFINITY, player),
            Variant::AlphaBeta3p => self.alphabeta_3p(board, depth, -INFINITY, INFINITY, player),
        }
    }

    /// Like [`Solver::search`], with the root's children searched in parallel
    ///
    /// Every child runs on its own copy of the board with a fresh full window,
    /// so no bound is shared between threads. The best child wins, ties going
    /// to the earliest move in row-major order.
    pub fn search_parallel(
        &mut self,
        board: &Board,
        depth: u32,
        variant: Variant,
    ) -> Result<Future, BoardError> {
        self.node_count += 1;
        if let Some(leaf) = self.terminal(board, depth, self.player) {
            return Ok(leaf);
        }

        let player = self.player;
        let next = player.next(board.player_count());
        let moves: Vec<Pos> = board.possible_moves().iter().collect();
        let template = Solver {
            node_count: 0,
            ..self.clone()
        };

        let results: Vec<(Pos, Result<(Future, usize), BoardError>)> = moves
            .par_iter()
            .map(|&(x, y)| {
                let mut board = board.clone();
                let mut solver = template.clone();
                let outcome = board
                    .with_move(x, y, player, |board| match variant {
                        Variant::Naive => solver.naive_minimax(board, depth - 1, next),
                        Variant::AlphaBeta => {
                            solver.alphabeta(board, depth - 1, -INFINITY, INFINITY, next)
                        }
                        Variant::AlphaBeta3p => {
                            solver.alphabeta_3p(board, depth - 1, -INFINITY, INFINITY, next)
                        }
                    })
                    .and_then(|outcome| outcome);
                ((x, y), outcome.map(|future| (future, solver.node_count)))
            })
            .collect();

        let mut node = Future::default();
        let mut best: Option<i64> = None;
        for (mv, outcome) in results {
            let (child, nodes) = outcome?;
            self.node_count += nodes;
            if best.map_or(true, |value| child.value > value) {
                best = Some(child.value);
                node.best_move = Some(mv);
            }
            self.record(&mut node, mv, child);
        }
        node.value = best.unwrap_or(0);
        Ok(node)
    }
}

/// Picks a move for `player` with the default scoring, returning it with its value
pub fn choose_move(
    board: &mut Board,
    player: PlayerId,
    depth: u32,
    variant: Variant,
) -> Result<(Pos, i64), SearchError> {
    let config = SearchConfig {
        depth,
        variant,
        ..SearchConfig::default()
    };
    let decision = choose_move_with(board, player, &config)?;
    Ok((decision.mv, decision.value))
}

/// Picks a move for `player` as configured
///
/// The board is left as it was found. When the position is already decided
/// the root resolves as a leaf without choosing a child; the first candidate
/// move is returned then, together with the leaf value.
pub fn choose_move_with(
    board: &mut Board,
    player: PlayerId,
    config: &SearchConfig,
) -> Result<Decision, SearchError> {
    let first = board
        .possible_moves()
        .iter()
        .next()
        .ok_or(SearchError::NoLegalMoves)?;

    let mut solver = Solver::new(player)
        .with_scoring(config.scoring)
        .with_trace(config.trace);
    let future = if config.parallel {
        solver.search_parallel(board, config.depth, config.variant)?
    } else {
        solver.search(board, config.depth, config.variant)?
    };

    let mv = match future.best_move {
        Some(mv) => mv,
        None => {
            warn!(
                "search for player {} resolved at the root, falling back to ({}, {})",
                player, first.0, first.1
            );
            first
        }
    };
    debug!(
        "{:?} depth {} for player {}: ({}, {}) value {} after {} nodes",
        config.variant, config.depth, player, mv.0, mv.1, future.value, solver.node_count
    );
    Ok(Decision {
        mv,
        value: future.value,
        node_count: solver.node_count,
        future,
    })
}

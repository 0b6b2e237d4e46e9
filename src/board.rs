//! The game board
//!
//! Besides the grid of stones the board keeps every maximal run of two or
//! more same-owner stones along the four axes as a [`PieceGroup`], and each
//! player's heuristic total as the sum of [`run_value`] over that player's
//! runs. Both are updated locally on every [`Board::place`] and
//! [`Board::remove`], so reading a player's value never scans the grid.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    geometry::{self, Neighbourhood, Pos, Radius},
    group::{run_value, Axis, GroupArena, GroupId, PieceGroup},
    move_set::PossibleMoveSet,
    players::PlayerId,
    BOARD_SIZE, MAX_BOARD_SIZE, MAX_PLAYERS,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position ({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied { x: usize, y: usize },
    #[error("cell ({x}, {y}) is empty")]
    CellEmpty { x: usize, y: usize },
    #[error("player {player} is not seated at a {count} player board")]
    UnknownPlayer { player: PlayerId, count: usize },
    #[error("board size {0} is not supported, sizes range from 1 to {}", MAX_BOARD_SIZE)]
    UnsupportedSize(usize),
    #[error("{0} players are not supported, games seat 2 to {}", MAX_PLAYERS)]
    UnsupportedPlayerCount(usize),
}

/// A stone on the board
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub x: usize,
    pub y: usize,
    pub owner: PlayerId,
}

#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    player_count: usize,
    // row-major, one entry per cell
    cells: Vec<Option<PlayerId>>,
    // ids of the groups each cell's stone belongs to
    memberships: Vec<Vec<GroupId>>,
    groups: GroupArena,
    values: Vec<i64>,
    possible_moves: PossibleMoveSet,
    neighbourhood: Arc<Neighbourhood>,
}

impl Board {
    /// Creates an empty `size`x`size` board for `player_count` players
    pub fn new(size: usize, player_count: usize) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(BoardError::UnsupportedSize(size));
        }
        if !(2..=MAX_PLAYERS).contains(&player_count) {
            return Err(BoardError::UnsupportedPlayerCount(player_count));
        }
        Ok(Self::build(size, player_count))
    }

    /// An empty 19x19 board for two players
    pub fn standard() -> Self {
        Self::build(BOARD_SIZE, 2)
    }

    fn build(size: usize, player_count: usize) -> Self {
        Self {
            size,
            player_count,
            cells: vec![None; size * size],
            memberships: (0..size * size).map(|_| Vec::with_capacity(4)).collect(),
            groups: GroupArena::new(player_count),
            values: vec![0; player_count],
            possible_moves: PossibleMoveSet::new(size),
            neighbourhood: Arc::new(Neighbourhood::new(size, Radius::Adjacent)),
        }
    }

    /// Switches how far from existing stones candidate moves are generated
    pub fn with_frontier_radius(mut self, radius: Radius) -> Self {
        self.neighbourhood = Arc::new(Neighbourhood::new(self.size, radius));
        self.rebuild_frontier();
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn frontier_radius(&self) -> Radius {
        self.neighbourhood.radius()
    }

    pub fn pos_is_valid(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    fn index(&self, (x, y): Pos) -> usize {
        y * self.size + x
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize, BoardError> {
        if self.pos_is_valid(x, y) {
            Ok(self.index((x, y)))
        } else {
            Err(BoardError::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }

    fn owner_at(&self, pos: Pos) -> Option<PlayerId> {
        self.cells[self.index(pos)]
    }

    fn step(&self, pos: Pos, axis: Axis, k: isize) -> Option<Pos> {
        let (dx, dy) = axis.step();
        geometry::offset(pos, dx * k, dy * k, self.size)
    }

    /// The stone at `(x, y)`, if any; out-of-bounds cells read as empty
    pub fn get_at(&self, x: usize, y: usize) -> Option<Piece> {
        if !self.pos_is_valid(x, y) {
            return None;
        }
        self.owner_at((x, y)).map(|owner| Piece { x, y, owner })
    }

    /// Puts a stone for `player` on an empty cell
    pub fn place(&mut self, x: usize, y: usize, player: PlayerId) -> Result<Piece, BoardError> {
        let idx = self.checked_index(x, y)?;
        if player.index() >= self.player_count {
            return Err(BoardError::UnknownPlayer {
                player,
                count: self.player_count,
            });
        }
        if self.cells[idx].is_some() {
            return Err(BoardError::CellOccupied { x, y });
        }
        self.cells[idx] = Some(player);

        let neighbourhood = Arc::clone(&self.neighbourhood);
        let mut delta = 0;
        for &other in neighbourhood.adjacent((x, y)) {
            if self.owner_at(other) == Some(player) {
                delta += self.merge_dual((x, y), other, player);
            }
        }
        self.values[player.index()] += delta;

        self.possible_moves.clear(x, y);
        for &(nx, ny) in neighbourhood.frontier((x, y)) {
            if self.owner_at((nx, ny)).is_none() {
                self.possible_moves.set(nx, ny);
            }
        }
        Ok(Piece { x, y, owner: player })
    }

    /// Takes the stone off `(x, y)`, splitting every run it was part of
    pub fn remove(&mut self, x: usize, y: usize) -> Result<Piece, BoardError> {
        let idx = self.checked_index(x, y)?;
        let owner = self.cells[idx].ok_or(BoardError::CellEmpty { x, y })?;

        let mut ids = std::mem::take(&mut self.memberships[idx]);
        let mut delta = 0;
        for &id in ids.iter() {
            delta += self.split(id, (x, y));
        }
        // hand the emptied list back so its capacity is reused
        ids.clear();
        self.memberships[idx] = ids;

        self.cells[idx] = None;
        self.values[owner.index()] += delta;
        self.refresh_frontier((x, y));
        Ok(Piece { x, y, owner })
    }

    /// Plays a stone, runs `f` on the resulting position and takes the stone back
    ///
    /// The possible-move set is restored to the exact set it held before the
    /// stone was placed, whatever `f` does to it.
    pub fn with_move<T>(
        &mut self,
        x: usize,
        y: usize,
        player: PlayerId,
        f: impl FnOnce(&mut Board) -> T,
    ) -> Result<T, BoardError> {
        let saved = self.possible_moves;
        self.place(x, y, player)?;
        let outcome = f(self);
        let undone = self.remove(x, y);
        self.possible_moves = saved;
        undone?;
        Ok(outcome)
    }

    /// The sum of the run values of `player`'s groups
    pub fn heuristic_value_for(&self, player: PlayerId) -> i64 {
        self.values[player.index()]
    }

    pub fn possible_moves(&self) -> &PossibleMoveSet {
        &self.possible_moves
    }

    pub fn set_possible_moves(&mut self, possible_moves: PossibleMoveSet) {
        self.possible_moves = possible_moves;
    }

    /// Whether `player` owns a run of at least [`crate::WIN_LENGTH`] stones
    pub fn has_five(&self, player: PlayerId) -> bool {
        self.groups.winning(player) > 0
    }

    /// The first player owning a winning run
    pub fn winner(&self) -> Option<PlayerId> {
        PlayerId::all(self.player_count).find(|&player| self.has_five(player))
    }

    /// Live group counts of `player` indexed by run length
    pub fn group_counts(&self, player: PlayerId) -> &[u32] {
        &self.groups.counts(player)[..=self.size]
    }

    pub fn groups(&self) -> impl Iterator<Item = &PieceGroup> {
        self.groups.iter().map(|(_, group)| group)
    }

    /// The groups the stone at `(x, y)` belongs to
    pub fn groups_at(&self, x: usize, y: usize) -> impl Iterator<Item = &PieceGroup> {
        let ids: &[GroupId] = if self.pos_is_valid(x, y) {
            &self.memberships[self.index((x, y))]
        } else {
            &[]
        };
        ids.iter().map(move |&id| self.groups.get(id))
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Grid snapshot indexed `[y][x]`
    pub fn render(&self) -> Vec<Vec<Option<PlayerId>>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }

    /// Every maximal run of two or more stones, found by scanning the grid
    ///
    /// This ignores the incremental bookkeeping entirely, which makes it the
    /// reference the tracked groups are checked against.
    pub fn maximal_runs(&self) -> Vec<PieceGroup> {
        let mut runs = Vec::new();
        for &axis in Axis::ALL.iter() {
            for y in 0..self.size {
                for x in 0..self.size {
                    let owner = match self.owner_at((x, y)) {
                        Some(owner) => owner,
                        None => continue,
                    };
                    // only start counting at the low end of a run
                    let extends_back = self
                        .step((x, y), axis, -1)
                        .map_or(false, |prev| self.owner_at(prev) == Some(owner));
                    if extends_back {
                        continue;
                    }
                    let mut len = 1;
                    let mut cursor = (x, y);
                    while let Some(next) = self.step(cursor, axis, 1) {
                        if self.owner_at(next) != Some(owner) {
                            break;
                        }
                        len += 1;
                        cursor = next;
                    }
                    if len >= 2 {
                        runs.push(PieceGroup::new(axis, owner, (x, y), len));
                    }
                }
            }
        }
        runs
    }

    fn add_group(&mut self, group: PieceGroup) -> GroupId {
        let id = self.groups.insert(group);
        for cell in group.cells() {
            let idx = self.index(cell);
            self.memberships[idx].push(id);
        }
        id
    }

    fn detach(&mut self, pos: Pos, id: GroupId) {
        let idx = self.index(pos);
        let ids = &mut self.memberships[idx];
        if let Some(k) = ids.iter().position(|&other| other == id) {
            ids.swap_remove(k);
        }
    }

    /// Joins a freshly placed stone with one same-owner neighbour
    ///
    /// Builds the two-stone group for the pair, then grows it through the
    /// stones lying beyond either end. Returns the change in `owner`'s total.
    fn merge_dual(&mut self, new: Pos, old: Pos, owner: PlayerId) -> i64 {
        let (axis, low, high) = match Axis::classify(new, old) {
            Some(pair) => pair,
            None => return 0,
        };
        let id = self.add_group(PieceGroup::new(axis, owner, low, 2));
        let mut delta = run_value(2);

        let probes = [self.step(low, axis, -1), self.step(high, axis, 1)];
        for &probe in probes.iter().flatten() {
            if self.owner_at(probe) == Some(owner) {
                delta += self.merge(id, probe);
                delta += self.absorb_contained(id, probe);
            }
        }
        delta
    }

    /// Extends group `id` by the stone at `pos` if it sits just past either
    /// end, then keeps going in the same direction
    fn merge(&mut self, id: GroupId, pos: Pos) -> i64 {
        let group = *self.groups.get(id);
        let axis = group.axis;
        let look_ahead = if Some(pos) == self.step(group.start(), axis, -1) {
            self.groups.update(id, |group| group.grow_low(pos));
            self.step(pos, axis, -1)
        } else if Some(pos) == self.step(group.end(), axis, 1) {
            self.groups.update(id, |group| group.grow_high());
            self.step(pos, axis, 1)
        } else {
            return 0;
        };
        let idx = self.index(pos);
        self.memberships[idx].push(id);

        let mut delta = run_value(group.len() + 1) - group.value();
        if let Some(next) = look_ahead {
            if self.owner_at(next) == Some(group.owner) {
                delta += self.merge(id, next);
                delta += self.absorb_contained(id, next);
            }
        }
        delta
    }

    /// Disbands every other group through `pos` that group `id` now covers
    fn absorb_contained(&mut self, id: GroupId, pos: Pos) -> i64 {
        let idx = self.index(pos);
        let grown = *self.groups.get(id);
        let mut delta = 0;
        let mut i = 0;
        while i < self.memberships[idx].len() {
            let other = self.memberships[idx][i];
            if other != id && grown.contains(self.groups.get(other)) {
                // disbanding swaps another id into slot i
                delta += self.disband(other);
            } else {
                i += 1;
            }
        }
        delta
    }

    fn disband(&mut self, id: GroupId) -> i64 {
        let group = self.groups.take(id);
        for cell in group.cells() {
            self.detach(cell, id);
        }
        -group.value()
    }

    /// Replaces group `id` by what is left on either side of `pos`
    fn split(&mut self, id: GroupId, pos: Pos) -> i64 {
        let group = *self.groups.get(id);
        let at = match group.index_of(pos) {
            Some(at) => at,
            None => return 0,
        };
        self.groups.take(id);
        for cell in group.cells() {
            if cell != pos {
                self.detach(cell, id);
            }
        }

        let mut delta = -group.value();
        let before = at;
        let after = group.len() - at - 1;
        if before >= 2 {
            let left = PieceGroup::new(group.axis, group.owner, group.start(), before);
            self.add_group(left);
            delta += left.value();
        }
        if after >= 2 {
            let right = PieceGroup::new(group.axis, group.owner, group.cell(at + 1), after);
            self.add_group(right);
            delta += right.value();
        }
        delta
    }

    /// Re-derives frontier membership of `pos` and the cells around it
    fn refresh_frontier(&mut self, pos: Pos) {
        let neighbourhood = Arc::clone(&self.neighbourhood);
        for &cell in std::iter::once(&pos).chain(neighbourhood.frontier(pos)) {
            let touches_stone = neighbourhood
                .frontier(cell)
                .iter()
                .any(|&other| self.owner_at(other).is_some());
            if self.owner_at(cell).is_none() && touches_stone {
                self.possible_moves.set(cell.0, cell.1);
            } else {
                self.possible_moves.clear(cell.0, cell.1);
            }
        }
    }

    fn rebuild_frontier(&mut self) {
        self.possible_moves = PossibleMoveSet::new(self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                if self.owner_at((x, y)).is_some() {
                    continue;
                }
                let touches_stone = self
                    .neighbourhood
                    .frontier((x, y))
                    .iter()
                    .any(|&other| self.owner_at(other).is_some());
                if touches_stone {
                    self.possible_moves.set(x, y);
                }
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

//! Connected runs of stones along the four board axes

use crate::{geometry::Pos, players::PlayerId, MAX_BOARD_SIZE, WIN_LENGTH};

/// Heuristic value of a run, indexed by its length
///
/// A run of one stone is worth nothing, and anything reaching
/// [`WIN_LENGTH`] dwarfs every combination of shorter runs.
pub const RUN_VALUES: [i64; 9] = [0, 0, 4, 15, 35, 99_999, 999_999, 9_999_999, 99_999_999];

/// The value of a run of `len` stones, saturating at the table's last entry
pub fn run_value(len: usize) -> i64 {
    RUN_VALUES[len.min(RUN_VALUES.len() - 1)]
}

/// One of the four lines a run can lie on
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `-`
    Horizontal,
    /// `|`
    Vertical,
    /// `/`, x grows while y shrinks
    DiagonalUp,
    /// `\`, x and y grow together
    DiagonalDown,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::DiagonalUp,
        Axis::DiagonalDown,
    ];

    /// Unit step along the axis in the direction of growing extent
    pub const fn step(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
            Axis::DiagonalUp => (1, -1),
            Axis::DiagonalDown => (1, 1),
        }
    }

    /// Projection of a cell onto the axis
    pub fn extent(self, (x, y): Pos) -> isize {
        match self {
            Axis::Vertical => y as isize,
            _ => x as isize,
        }
    }

    /// Identifies which parallel line of this axis a cell lies on
    pub fn line(self, (x, y): Pos) -> isize {
        let (x, y) = (x as isize, y as isize);
        match self {
            Axis::Horizontal => y,
            Axis::Vertical => x,
            Axis::DiagonalUp => x + y,
            Axis::DiagonalDown => x - y,
        }
    }

    /// Classifies two touching cells, returning the axis and the pair ordered by extent
    pub fn classify(a: Pos, b: Pos) -> Option<(Axis, Pos, Pos)> {
        let d = (b.0 as isize - a.0 as isize, b.1 as isize - a.1 as isize);
        Axis::ALL.iter().find_map(|&axis| {
            let s = axis.step();
            if d == s {
                Some((axis, a, b))
            } else if d == (-s.0, -s.1) {
                Some((axis, b, a))
            } else {
                None
            }
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Axis::Horizontal => '-',
            Axis::Vertical => '|',
            Axis::DiagonalUp => '/',
            Axis::DiagonalDown => '\\',
        }
    }
}

/// Stable handle of a group in the board's arena
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) u32);

/// A contiguous run of one player's stones along one axis
///
/// The stones are implied by `start`, the axis step and `len`; the board's
/// grid resolves them back to pieces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PieceGroup {
    pub axis: Axis,
    pub owner: PlayerId,
    start: Pos,
    len: usize,
}

impl PieceGroup {
    pub fn new(axis: Axis, owner: PlayerId, start: Pos, len: usize) -> Self {
        Self {
            axis,
            owner,
            start,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stone with the lowest extent
    pub fn start(&self) -> Pos {
        self.start
    }

    /// The stone with the highest extent
    pub fn end(&self) -> Pos {
        self.cell(self.len - 1)
    }

    pub fn value(&self) -> i64 {
        run_value(self.len)
    }

    /// The `i`-th stone counted from `start`
    pub fn cell(&self, i: usize) -> Pos {
        let (dx, dy) = self.axis.step();
        let i = i as isize;
        (
            (self.start.0 as isize + dx * i) as usize,
            (self.start.1 as isize + dy * i) as usize,
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len).map(move |i| self.cell(i))
    }

    /// Position of `pos` within the run, if it is one of its stones
    pub fn index_of(&self, pos: Pos) -> Option<usize> {
        if self.axis.line(pos) != self.axis.line(self.start) {
            return None;
        }
        let offset = self.axis.extent(pos) - self.axis.extent(self.start);
        if offset >= 0 && (offset as usize) < self.len {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Lowest and highest extent covered
    pub fn span(&self) -> (isize, isize) {
        let low = self.axis.extent(self.start);
        (low, low + self.len as isize - 1)
    }

    /// True when `other` is a same-kind, same-owner run on the same line
    /// lying entirely within this one
    pub fn contains(&self, other: &PieceGroup) -> bool {
        let (low, high) = self.span();
        let (other_low, other_high) = other.span();
        self.axis == other.axis
            && self.owner == other.owner
            && self.axis.line(self.start) == other.axis.line(other.start)
            && low <= other_low
            && high >= other_high
    }

    pub(crate) fn grow_low(&mut self, pos: Pos) {
        self.start = pos;
        self.len += 1;
    }

    pub(crate) fn grow_high(&mut self) {
        self.len += 1;
    }
}

/// Dense storage for the live groups of a board
///
/// Freed slots are recycled so a search that keeps placing and removing
/// stones settles into a fixed footprint. Alongside the groups it keeps, per
/// player, how many live groups there are of each length.
#[derive(Clone, Debug)]
pub(crate) struct GroupArena {
    slots: Vec<Option<PieceGroup>>,
    free: Vec<GroupId>,
    counts: Vec<[u32; MAX_BOARD_SIZE + 1]>,
    winning: Vec<u32>,
}

impl GroupArena {
    pub fn new(player_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            counts: vec![[0; MAX_BOARD_SIZE + 1]; player_count],
            winning: vec![0; player_count],
        }
    }

    pub fn get(&self, id: GroupId) -> &PieceGroup {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("group id refers to a live group")
    }

    pub fn insert(&mut self, group: PieceGroup) -> GroupId {
        self.count(&group, 1);
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0 as usize] = Some(group);
                id
            }
            None => {
                self.slots.push(Some(group));
                GroupId(self.slots.len() as u32 - 1)
            }
        }
    }

    /// Removes a group, releasing its slot for reuse
    pub fn take(&mut self, id: GroupId) -> PieceGroup {
        let group = self.slots[id.0 as usize]
            .take()
            .expect("group id refers to a live group");
        self.count(&group, -1);
        self.free.push(id);
        group
    }

    /// Applies `grow` to a live group, keeping the length counts in step
    pub fn update(&mut self, id: GroupId, grow: impl FnOnce(&mut PieceGroup)) {
        let mut group = *self.get(id);
        self.count(&group, -1);
        grow(&mut group);
        self.count(&group, 1);
        self.slots[id.0 as usize] = Some(group);
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &PieceGroup)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|group| (GroupId(i as u32), group)))
    }

    pub fn counts(&self, player: PlayerId) -> &[u32] {
        &self.counts[player.index()]
    }

    pub fn winning(&self, player: PlayerId) -> u32 {
        self.winning[player.index()]
    }

    fn count(&mut self, group: &PieceGroup, delta: i32) {
        let owner = group.owner.index();
        let slot = &mut self.counts[owner][group.len];
        *slot = (*slot as i32 + delta) as u32;
        if group.len >= WIN_LENGTH {
            self.winning[owner] = (self.winning[owner] as i32 + delta) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_grow_super_linearly() {
        for len in 2..RUN_VALUES.len() - 1 {
            assert!(RUN_VALUES[len + 1] > 2 * RUN_VALUES[len]);
        }
        assert_eq!(run_value(30), RUN_VALUES[8]);
        assert!(run_value(WIN_LENGTH) > 100 * run_value(WIN_LENGTH - 1));
    }

    #[test]
    fn classify_orders_by_extent() {
        assert_eq!(
            Axis::classify((3, 3), (2, 3)),
            Some((Axis::Horizontal, (2, 3), (3, 3)))
        );
        assert_eq!(
            Axis::classify((3, 3), (3, 4)),
            Some((Axis::Vertical, (3, 3), (3, 4)))
        );
        assert_eq!(
            Axis::classify((2, 2), (1, 3)),
            Some((Axis::DiagonalUp, (1, 3), (2, 2)))
        );
        assert_eq!(
            Axis::classify((2, 2), (3, 3)),
            Some((Axis::DiagonalDown, (2, 2), (3, 3)))
        );
        assert_eq!(Axis::classify((2, 2), (4, 2)), None);
    }

    #[test]
    fn cells_and_membership() {
        let group = PieceGroup::new(Axis::DiagonalUp, PlayerId(0), (2, 6), 3);
        assert_eq!(group.cells().collect::<Vec<_>>(), vec![(2, 6), (3, 5), (4, 4)]);
        assert_eq!(group.end(), (4, 4));
        assert_eq!(group.index_of((3, 5)), Some(1));
        assert_eq!(group.index_of((3, 4)), None);
        assert_eq!(group.index_of((5, 3)), None);
    }

    #[test]
    fn containment_needs_same_line_and_owner() {
        let long = PieceGroup::new(Axis::Horizontal, PlayerId(0), (1, 0), 4);
        let short = PieceGroup::new(Axis::Horizontal, PlayerId(0), (2, 0), 2);
        let other_row = PieceGroup::new(Axis::Horizontal, PlayerId(0), (2, 1), 2);
        let other_owner = PieceGroup::new(Axis::Horizontal, PlayerId(1), (2, 0), 2);
        assert!(long.contains(&short));
        assert!(long.contains(&long));
        assert!(!short.contains(&long));
        assert!(!long.contains(&other_row));
        assert!(!long.contains(&other_owner));
    }

    #[test]
    fn arena_recycles_and_counts() {
        let mut arena = GroupArena::new(2);
        let a = arena.insert(PieceGroup::new(Axis::Vertical, PlayerId(1), (0, 0), 2));
        assert_eq!(arena.counts(PlayerId(1))[2], 1);
        arena.update(a, |group| {
            group.grow_high();
            group.grow_high();
            group.grow_high();
        });
        assert_eq!(arena.counts(PlayerId(1))[2], 0);
        assert_eq!(arena.counts(PlayerId(1))[5], 1);
        assert_eq!(arena.winning(PlayerId(1)), 1);
        arena.take(a);
        assert_eq!(arena.winning(PlayerId(1)), 0);
        let b = arena.insert(PieceGroup::new(Axis::Vertical, PlayerId(0), (0, 0), 2));
        assert_eq!(a, b);
        assert_eq!(arena.iter().count(), 1);
    }
}

//! Grid addressing and neighbourhoods

/// A board coordinate, `(x, y)` with `x` the column and `y` the row
pub type Pos = (usize, usize);

/// The 8 unit offsets around a cell
pub const ADJACENT: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// How far from an occupied cell an empty cell still counts as a candidate move
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Radius {
    /// The 3x3 ring
    #[default]
    Adjacent,
    /// The 5x5 ring
    Extended,
}

impl Radius {
    pub fn reach(self) -> isize {
        match self {
            Radius::Adjacent => 1,
            Radius::Extended => 2,
        }
    }
}

/// Offsets `(x + dx, y + dy)` clipped to a `size`x`size` board
pub fn offset(pos: Pos, dx: isize, dy: isize, size: usize) -> Option<Pos> {
    let x = pos.0 as isize + dx;
    let y = pos.1 as isize + dy;
    if x < 0 || y < 0 || x >= size as isize || y >= size as isize {
        None
    } else {
        Some((x as usize, y as usize))
    }
}

/// In-bounds cells within `radius` of `pos`, excluding `pos` itself
pub fn neighbours(pos: Pos, size: usize, radius: Radius) -> impl Iterator<Item = Pos> {
    let reach = radius.reach();
    (-reach..=reach)
        .flat_map(move |dx| (-reach..=reach).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
        .filter_map(move |(dx, dy)| offset(pos, dx, dy, size))
}

/// Neighbour lists computed once per board size
///
/// `adjacent` is used to find same-owner stones to merge with, `frontier`
/// grows the possible-move set and may be the wider 5x5 ring.
#[derive(Debug)]
pub struct Neighbourhood {
    size: usize,
    radius: Radius,
    adjacent: Vec<Vec<Pos>>,
    frontier: Vec<Vec<Pos>>,
}

impl Neighbourhood {
    pub fn new(size: usize, radius: Radius) -> Self {
        let cells = (0..size).flat_map(|y| (0..size).map(move |x| (x, y)));
        let adjacent = cells
            .clone()
            .map(|pos| neighbours(pos, size, Radius::Adjacent).collect())
            .collect();
        let frontier = cells
            .map(|pos| neighbours(pos, size, radius).collect())
            .collect();
        Self {
            size,
            radius,
            adjacent,
            frontier,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> Radius {
        self.radius
    }

    pub fn adjacent(&self, (x, y): Pos) -> &[Pos] {
        &self.adjacent[y * self.size + x]
    }

    pub fn frontier(&self, (x, y): Pos) -> &[Pos] {
        &self.frontier[y * self.size + x]
    }
}

use super::dir::Dir;
use num_integer::Integer;
use std::{
    cmp::{max, Ordering},
    fmt::{Debug, Error, Formatter},
};
use Dir::*;

// INVARIANT: even columns are half a cell higher than odd columns
#[derive(Eq, PartialEq, Copy, Clone, Add, Sub, Hash, Default)]
pub struct HexPoint {
    pub h: isize,
    pub v: isize,
}

/// Width (`h`) and height (`v`) of a grid
pub type HexDim = HexPoint;

impl HexPoint {
    pub const fn new(h: isize, v: isize) -> Self {
        Self { h, v }
    }

    // 1 for odd columns, 0 for even ones (also for negative columns)
    fn parity(self) -> isize {
        self.h.is_odd() as isize
    }

    /// Number of steps between two cells, ignoring obstacles
    // O(1)
    pub fn distance(self, other: Self) -> usize {
        let dh = (self.h - other.h).abs();
        let max_dv = if self.v > other.v {
            dh - (dh + self.parity()) / 2
        } else {
            dh - (dh + 1 - self.parity()) / 2
        };
        let dv = (self.v - other.v).abs();
        let dv_overflow = max(0, dv - max_dv);
        (dh + dv_overflow) as usize
    }

    #[must_use]
    pub fn translate(self, dir: Dir, dist: usize) -> Self {
        let dh = dist as isize;
        let mut new_pos = self;

        // going from an even column left or right UP means decrementing v
        // going from an even column left or right DOWN keeps v as it is
        // (the next column is already shifted down), the opposite holds
        // starting at an odd column
        match dir {
            U => new_pos.v -= dh,
            D => new_pos.v += dh,
            Ul | Ur => {
                let dv = dh - (dh + self.parity()) / 2;
                new_pos.h += if dir == Ul { -dh } else { dh };
                new_pos.v -= dv;
            }
            Dl | Dr => {
                let dv = dh - (dh + 1 - self.parity()) / 2;
                new_pos.h += if dir == Dl { -dh } else { dh };
                new_pos.v += dv;
            }
        }

        new_pos
    }

    /// The six adjacent cells, indexed by `Dir`
    pub fn neighbors(self) -> [Self; Dir::COUNT] {
        Dir::ALL.map(|dir| self.translate(dir, 1))
    }

    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// Cells exactly `radius` steps away, starting above `self` and
    /// proceeding clockwise (`6 * radius` cells, just `self` for radius 0)
    pub fn ring(self, radius: usize) -> impl Iterator<Item = Self> {
        let corner = self.translate(U, radius);
        let steps = if radius == 0 { 1 } else { Dir::COUNT * radius };
        Dir::iter_from(Dr)
            .flat_map(move |dir| std::iter::repeat(dir).take(radius))
            .scan(corner, |pos, dir| {
                let here = *pos;
                *pos = pos.translate(dir, 1);
                Some(here)
            })
            .chain(std::iter::once(corner).filter(move |_| radius == 0))
            .take(steps)
    }

    /// All cells at most `radius` steps away, innermost ring first
    pub fn within(self, radius: usize) -> impl Iterator<Item = Self> {
        (0..=radius).flat_map(move |r| self.ring(r))
    }

    /// The direction whose neighbour is closest to `target`, the lowest
    /// direction wins ties
    pub fn dir_towards(self, target: Self) -> Dir {
        Dir::iter()
            .min_by_key(|dir| self.translate(*dir, 1).distance(target))
            .unwrap_or(U)
    }

    /// Whether `pos` lies inside a grid of dimension `self`
    pub fn contains(self, pos: Self) -> bool {
        (0..self.h).contains(&pos.h) && (0..self.v).contains(&pos.v)
    }

    /// Every position inside a grid of dimension `self`, row by row
    pub fn positions(self) -> impl Iterator<Item = Self> {
        (0..self.v).flat_map(move |v| (0..self.h).map(move |h| Self { h, v }))
    }

    /// Number of cells in a grid of dimension `self`
    pub fn area(self) -> usize {
        (max(self.h, 0) * max(self.v, 0)) as usize
    }
}

impl From<(isize, isize)> for HexPoint {
    fn from((h, v): (isize, isize)) -> Self {
        Self { h, v }
    }
}

impl Debug for HexPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<{}, {}>", self.h, self.v)
    }
}

impl PartialOrd for HexPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HexPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.v.cmp(&other.v) {
            Ordering::Equal => self.h.cmp(&other.h),
            ord => ord,
        }
    }
}

#[test]
fn test_distance() {
    [
        ((0, 0), (0, 0), 0),
        ((0, 0), (0, 1), 1),
        ((0, 0), (1, 0), 1),
        ((0, 0), (0, 10), 10),
        ((0, 0), (0, -10), 10),
        ((0, 10), (0, 0), 10),
        ((1, 1), (2, 2), 1),
        ((1, 1), (3, 3), 3),
        ((0, 0), (4, 0), 4),
        ((0, 0), (4, 2), 4),
    ]
    .iter()
    .for_each(|&(p1, p2, d)| {
        let p1 = HexPoint::from(p1);
        let p2 = HexPoint::from(p2);
        assert_eq!(p1.distance(p2), d, "{:?} -> {:?}", p1, p2);
        assert_eq!(p2.distance(p1), d, "{:?} -> {:?}", p2, p1);
    });
}

#[test]
fn test_neighbors_are_adjacent() {
    for center in [HexPoint::new(0, 0), HexPoint::new(3, 4), HexPoint::new(-1, 2)] {
        for (dir, n) in Dir::iter().zip(center.neighbors()) {
            assert_eq!(center.distance(n), 1, "{:?} {:?}", center, dir);
            assert_eq!(n.translate(-dir, 1), center);
        }
    }
}

#[test]
fn test_translate_matches_repeated_steps() {
    let start = HexPoint::new(3, 3);
    for dir in Dir::iter() {
        let mut stepped = start;
        for dist in 0..5 {
            assert_eq!(start.translate(dir, dist), stepped);
            assert_eq!(start.distance(stepped), dist);
            stepped = stepped.translate(dir, 1);
        }
    }
}

#[test]
fn test_ring() {
    use itertools::Itertools;

    let center = HexPoint::new(6, 6);
    assert_eq!(center.ring(0).collect_vec(), vec![center]);
    for radius in 1..5 {
        let ring = center.ring(radius).collect_vec();
        assert_eq!(ring.len(), 6 * radius);
        assert_eq!(ring[0], center.translate(U, radius));
        assert!(ring.iter().all(|p| p.distance(center) == radius));
        assert_eq!(ring.iter().unique().count(), ring.len());
    }
    assert_eq!(center.within(2).count(), 1 + 6 + 12);
}

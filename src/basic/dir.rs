use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use Dir::*;

// defined in clockwise order starting at U, the discriminant
// is the neighbour index used throughout the crate
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Dir {
    U = 0,
    Ur = 1,
    Dr = 2,
    D = 3,
    Dl = 4,
    Ul = 5,
}

static_assertions::const_assert_eq!(Dir::COUNT, 6);

impl From<u8> for Dir {
    fn from(num: u8) -> Self {
        Self::ALL[(num % 6) as usize]
    }
}

impl Neg for Dir {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self + 3
    }
}

impl Add<u8> for Dir {
    type Output = Self;

    fn add(self, rhs: u8) -> Self::Output {
        Self::from(self as u8 + rhs % 6)
    }
}

impl AddAssign<u8> for Dir {
    fn add_assign(&mut self, rhs: u8) {
        *self = *self + rhs;
    }
}

impl Sub<u8> for Dir {
    type Output = Self;

    fn sub(self, rhs: u8) -> Self::Output {
        self + (6 - (rhs % 6))
    }
}

impl SubAssign<u8> for Dir {
    fn sub_assign(&mut self, rhs: u8) {
        *self = *self - rhs;
    }
}

// U is the smallest, directions get bigger clockwise, Ul is the largest
impl Ord for Dir {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl PartialOrd for Dir {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Dir {
    pub const COUNT: usize = 6;
    pub const ALL: [Dir; Self::COUNT] = [U, Ur, Dr, D, Dl, Ul];

    // clockwise order starting from U
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.iter().copied()
    }

    pub fn iter_from(start: Self) -> impl Iterator<Item = Self> {
        Self::iter().map(move |dir| dir + start as u8)
    }

    /// Position of this direction in the neighbour list of a cell
    pub fn index(self) -> usize {
        self as usize
    }

    /// Clockwise angle from self to other in units of 60°
    pub fn clockwise_distance_to(self, other: Self) -> u8 {
        (other as u8 + 6 - self as u8) % 6
    }
}

#[test]
fn test_dir_math() {
    let test_plus = [(U, 1, Ur), (U, 2, Dr), (Dr, 3, Ul), (D, 6, D)];

    for &(start, add, expect) in &test_plus {
        assert_eq!(start + add, expect);
    }

    let test_minus = [(U, 1, Ul), (U, 2, Dl), (Dr, 3, Ul), (D, 6, D)];

    for &(start, sub, expect) in &test_minus {
        assert_eq!(start - sub, expect);
    }

    for dir in Dir::iter() {
        assert_eq!(-(-dir), dir);
        assert_eq!(Dir::from(dir.index() as u8), dir);
    }
}

#[test]
fn test_clockwise_distance_to() {
    for (from, to, clockwise_dist) in [
        (U, U, 0),
        (U, Ur, 1),
        (U, Dr, 2),
        (U, D, 3),
        (U, Dl, 4),
        (U, Ul, 5),
        (Dr, Ul, 3),
        (Dl, U, 2),
    ] {
        assert_eq!(
            from.clockwise_distance_to(to),
            clockwise_dist,
            "{:?} => {:?}",
            from,
            to
        )
    }
}

#[test]
fn test_iter_from() {
    let from_dr: Vec<_> = Dir::iter_from(Dr).collect();
    assert_eq!(from_dr, vec![Dr, D, Dl, Ul, U, Ur]);
}

use super::{HexDim, HexPoint};
use std::ops::{Index, IndexMut};

/// Dense row-major matrix with one value per cell of a grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    dim: HexDim,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(dim: HexDim, value: T) -> Self {
        Self {
            dim,
            cells: vec![value; dim.area()],
        }
    }

    /// Overwrite every cell without reallocating
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Copy `other` into `self`, both grids must have the same dimension
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.dim, other.dim, "grid dimension mismatch");
        self.cells.clone_from_slice(&other.cells);
    }
}

impl<T> Grid<T> {
    pub fn from_fn(dim: HexDim, mut f: impl FnMut(HexPoint) -> T) -> Self {
        let cells = dim.positions().map(&mut f).collect();
        Self { dim, cells }
    }

    pub fn dim(&self) -> HexDim {
        self.dim
    }

    pub fn contains(&self, pos: HexPoint) -> bool {
        self.dim.contains(pos)
    }

    fn idx(&self, pos: HexPoint) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.v * self.dim.h + pos.h) as usize)
    }

    pub fn get(&self, pos: HexPoint) -> Option<&T> {
        self.idx(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: HexPoint) -> Option<&mut T> {
        self.idx(pos).map(move |i| &mut self.cells[i])
    }

    /// Every position of the grid, row by row
    pub fn positions(&self) -> impl Iterator<Item = HexPoint> {
        self.dim.positions()
    }
}

impl Grid<bool> {
    /// True for in-bounds cells set to true, false outside the grid
    pub fn is_set(&self, pos: HexPoint) -> bool {
        self.get(pos).copied().unwrap_or(false)
    }
}

// out-of-bounds indexing is a programming error, callers check
// bounds before touching a cell
impl<T> Index<HexPoint> for Grid<T> {
    type Output = T;

    fn index(&self, pos: HexPoint) -> &Self::Output {
        match self.idx(pos) {
            Some(i) => &self.cells[i],
            None => panic!("{:?} outside of grid {:?}", pos, self.dim),
        }
    }
}

impl<T> IndexMut<HexPoint> for Grid<T> {
    fn index_mut(&mut self, pos: HexPoint) -> &mut Self::Output {
        match self.idx(pos) {
            Some(i) => &mut self.cells[i],
            None => panic!("{:?} outside of grid {:?}", pos, self.dim),
        }
    }
}

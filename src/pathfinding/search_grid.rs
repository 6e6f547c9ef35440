use crate::area::Area;
use crate::basic::{Grid, HexDim, HexPoint};
use crate::creature::AgentId;

/// Per-area scratch buffers for path searches
///
/// One is kept for each area and handed to every search by `&mut`, the
/// score grids are overwritten by each search instead of being
/// reallocated.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    pub(super) passable: Grid<bool>,
    pub(super) entity_passable: Grid<bool>,

    pub(super) g_score: Grid<u32>,
    pub(super) h_score: Grid<u32>,
    pub(super) f_score: Grid<u32>,
    pub(super) closed: Grid<bool>,
    pub(super) open: Grid<bool>,
    pub(super) goal: Grid<bool>,
    pub(super) parent: Grid<HexPoint>,

    // in insertion order, ties are resolved by position in this list
    pub(super) open_set: Vec<HexPoint>,
}

impl SearchGrid {
    pub fn new(area: &Area) -> Self {
        let dim = area.dim();
        Self {
            passable: area.passability().clone(),
            entity_passable: Grid::filled(dim, true),
            g_score: Grid::filled(dim, 0),
            h_score: Grid::filled(dim, 0),
            f_score: Grid::filled(dim, 0),
            closed: Grid::filled(dim, false),
            open: Grid::filled(dim, false),
            goal: Grid::filled(dim, false),
            parent: Grid::filled(dim, HexPoint::default()),
            open_set: Vec::with_capacity(dim.area()),
        }
    }

    pub fn dim(&self) -> HexDim {
        self.passable.dim()
    }

    pub fn contains(&self, pos: HexPoint) -> bool {
        self.passable.contains(pos)
    }

    /// Copy the area's terrain again after it changed
    pub fn refresh_passability(&mut self, area: &Area) {
        self.passable.copy_from(area.passability());
    }

    /// Recompute which cells the doors and creatures leave open to `mover`
    pub fn refresh_entity_passability(&mut self, area: &Area, mover: AgentId) {
        area.write_entity_passability(mover, &mut self.entity_passable);
    }

    /// Use a caller-built occupancy mask instead of the area's creatures
    pub fn set_entity_passability(&mut self, mask: &Grid<bool>) {
        self.entity_passable.copy_from(mask);
    }

    pub fn entity_passability(&self) -> &Grid<bool> {
        &self.entity_passable
    }

    pub(super) fn reset(&mut self) {
        for pos in self.dim().positions() {
            self.closed[pos] = !self.passable[pos] || !self.entity_passable[pos];
        }
        self.open.fill(false);
        self.goal.fill(false);
        self.open_set.clear();
    }

    pub(super) fn push_open(&mut self, pos: HexPoint) {
        self.open[pos] = true;
        self.open_set.push(pos);
    }

    pub(super) fn set_scores(&mut self, pos: HexPoint, g: u32, h: u32) {
        self.g_score[pos] = g;
        self.h_score[pos] = h;
        self.f_score[pos] = g + h;
    }

    /// Index into `open_set` of the cell with the lowest f score, the most
    /// recently inserted one on ties
    pub(super) fn lowest_f_score(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, &pos) in self.open_set.iter().enumerate().rev() {
            let f = self.f_score[pos];
            match best {
                Some((_, best_f)) if best_f <= f => {}
                _ => best = Some((idx, f)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Take a cell out of the open set and close it
    pub(super) fn close(&mut self, idx: usize) -> HexPoint {
        let pos = self.open_set.remove(idx);
        self.open[pos] = false;
        self.closed[pos] = true;
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_latest_insertion() {
        let area = Area::open(HexDim::new(4, 4));
        let mut grid = SearchGrid::new(&area);
        grid.reset();

        let cells = [
            (HexPoint::new(0, 0), 5),
            (HexPoint::new(1, 0), 3),
            (HexPoint::new(2, 0), 4),
            (HexPoint::new(3, 0), 3),
        ];
        for (pos, f) in cells {
            grid.push_open(pos);
            grid.set_scores(pos, f, 0);
        }

        assert_eq!(grid.lowest_f_score(), Some(3));
        assert_eq!(grid.close(3), HexPoint::new(3, 0));
        assert_eq!(grid.lowest_f_score(), Some(1));
        assert!(grid.closed[HexPoint::new(3, 0)]);
        assert!(!grid.open[HexPoint::new(3, 0)]);
    }

    #[test]
    fn reset_closes_blocked_cells() {
        let mut area = Area::open(HexDim::new(3, 3));
        area.set_passable(HexPoint::new(1, 1), false);
        let mut grid = SearchGrid::new(&area);

        let mut mask = Grid::filled(area.dim(), true);
        mask[HexPoint::new(2, 2)] = false;
        grid.set_entity_passability(&mask);
        grid.push_open(HexPoint::new(0, 0));
        grid.reset();

        assert!(grid.closed[HexPoint::new(1, 1)]);
        assert!(grid.closed[HexPoint::new(2, 2)]);
        assert!(!grid.closed[HexPoint::new(0, 0)]);
        assert!(grid.open_set.is_empty());
        assert_eq!(grid.lowest_f_score(), None);
    }
}

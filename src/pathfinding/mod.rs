//! Threat-aware A* over the hex grid.

use std::collections::VecDeque;

use tracing::debug;

use crate::area::Area;
use crate::basic::{Grid, HexPoint};
use crate::creature::AgentId;
use crate::movement::{CombatMode, Party};
use crate::rules::MovementRules;

pub use search_grid::SearchGrid;
pub use threat::ThreatSet;

mod search_grid;
mod threat;

/// Cells to walk through in travel order, the start cell is not included
/// so the length is the number of steps
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path(VecDeque<HexPoint>);

impl Path {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The cell the path ends on
    pub fn destination(&self) -> Option<HexPoint> {
        self.0.back().copied()
    }

    pub fn first(&self) -> Option<HexPoint> {
        self.0.front().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HexPoint> + ExactSizeIterator {
        self.0.iter()
    }

    /// Keep only the first `steps` steps
    pub fn truncate(&mut self, steps: usize) {
        self.0.truncate(steps);
    }

    pub fn pop_back(&mut self) -> Option<HexPoint> {
        self.0.pop_back()
    }

    pub fn pop_front(&mut self) -> Option<HexPoint> {
        self.0.pop_front()
    }
}

impl FromIterator<HexPoint> for Path {
    fn from_iter<I: IntoIterator<Item = HexPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a HexPoint;
    type IntoIter = std::collections::vec_deque::Iter<'a, HexPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which goal cells a search may stop on
#[derive(Copy, Clone, Debug)]
pub enum GoalPolicy<'a> {
    /// No creature stands on the cell
    Unoccupied,
    /// The cell is empty or held by a member of the party, who will have
    /// moved away by the time the mover gets there
    IgnoreParty(&'a Party),
}

impl GoalPolicy<'_> {
    fn accepts(&self, area: &Area, cell: HexPoint) -> bool {
        match (self, area.creature_at(cell)) {
            (_, None) => true,
            (GoalPolicy::Unoccupied, Some(_)) => false,
            (GoalPolicy::IgnoreParty(party), Some(id)) => party.contains(id),
        }
    }
}

/// Finds paths in one area, holds no state of its own between searches
#[derive(Copy, Clone)]
pub struct Pathfinder<'a> {
    pub area: &'a Area,
    pub rules: &'a MovementRules,
    pub combat: CombatMode,
}

impl<'a> Pathfinder<'a> {
    pub fn new(area: &'a Area, rules: &'a MovementRules, combat: CombatMode) -> Self {
        Self { area, rules, combat }
    }

    /// Lowest cost path from the mover's position to one of `goals`
    ///
    /// `end` is the cell the heuristic aims at, normally the center of the
    /// goal cells. Terrain is copied from the area again, the entity
    /// passability already stored in `grid` is used as is.
    pub fn find_path(
        &self,
        grid: &mut SearchGrid,
        mover: AgentId,
        end: HexPoint,
        goals: &[HexPoint],
        policy: GoalPolicy,
    ) -> Option<Path> {
        let threats = ThreatSet::for_mover(self.area, mover, self.combat);
        self.search(grid, mover, end, goals, policy, |cell| {
            threats.cell_cost(self.area, cell, self.rules)
        })
    }

    fn search(
        &self,
        grid: &mut SearchGrid,
        mover: AgentId,
        end: HexPoint,
        goals: &[HexPoint],
        policy: GoalPolicy,
        cell_cost: impl Fn(HexPoint) -> u32,
    ) -> Option<Path> {
        let area = self.area;
        let start = area.creature(mover).pos;
        if !grid.contains(start) {
            debug!("{} is outside of the search grid at {:?}", mover, start);
            return None;
        }

        grid.refresh_passability(area);
        grid.reset();
        for &goal in goals {
            if let Some(cell) = grid.goal.get_mut(goal) {
                *cell = true;
            }
        }

        grid.closed[start] = false;
        grid.set_scores(start, 0, start.distance(end) as u32);
        grid.parent[start] = start;
        grid.push_open(start);

        while let Some(idx) = grid.lowest_f_score() {
            let current = grid.open_set[idx];
            if grid.goal[current] && policy.accepts(area, current) {
                return self.reconstruct(grid, start, current);
            }

            grid.close(idx);

            let elevation = area.elevation_at(current);
            for next in current.neighbors() {
                if !grid.contains(next) || grid.closed[next] || area.elevation_at(next) != elevation {
                    continue;
                }

                let g = grid.g_score[current] + cell_cost(next);
                if !grid.open[next] {
                    grid.push_open(next);
                } else if g >= grid.g_score[next] {
                    continue;
                }

                grid.parent[next] = current;
                grid.set_scores(next, g, next.distance(end) as u32);
            }
        }

        debug!("no path for {} from {:?} towards {:?}", mover, start, end);
        None
    }

    fn reconstruct(&self, grid: &SearchGrid, start: HexPoint, goal: HexPoint) -> Option<Path> {
        let mut cells = VecDeque::new();
        let mut current = goal;
        while current != start {
            cells.push_front(current);
            current = grid.parent[current];
        }

        if cells.len() > self.rules.max_path_length {
            debug!(
                "path from {:?} to {:?} has {} steps, more than the {} allowed",
                start,
                goal,
                cells.len(),
                self.rules.max_path_length
            );
            return None;
        }

        Some(Path(cells))
    }

    /// Path that ends at most `distance_away` cells from `target` on a
    /// cell no creature stands on
    pub fn shortest_path(
        &self,
        grid: &mut SearchGrid,
        mover: AgentId,
        target: HexPoint,
        distance_away: usize,
    ) -> Option<Path> {
        let goals: Vec<_> = target
            .within(distance_away)
            .filter(|&pos| self.area.is_passable(pos))
            .collect();

        grid.refresh_entity_passability(self.area, mover);
        self.find_path(grid, mover, target, &goals, GoalPolicy::Unoccupied)
    }

    /// Path to exactly `target` treating `mask` as the occupancy of the
    /// area, cells held by `party` members count as free destinations
    pub fn shortest_path_ignore_party(
        &self,
        grid: &mut SearchGrid,
        mover: AgentId,
        target: HexPoint,
        mask: &Grid<bool>,
        party: &Party,
    ) -> Option<Path> {
        grid.set_entity_passability(mask);
        self.find_path(grid, mover, target, &[target], GoalPolicy::IgnoreParty(party))
    }
}

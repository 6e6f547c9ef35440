use crate::area::Area;
use crate::basic::HexPoint;

/// Action points a creature has left in the current round
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ActionTimer {
    pub ap: u32,
    pub max_ap: u32,
    /// Action points needed to enter a cell without movement bonus
    pub movement_cost: u32,
}

impl Default for ActionTimer {
    fn default() -> Self {
        Self {
            ap: Self::BASE_ACTION_POINTS,
            max_ap: Self::BASE_ACTION_POINTS,
            movement_cost: Self::BASE_MOVEMENT_COST,
        }
    }
}

impl ActionTimer {
    pub const BASE_ACTION_POINTS: u32 = 10_000;
    pub const BASE_MOVEMENT_COST: u32 = 1_000;

    pub fn reset(&mut self) {
        self.ap = self.max_ap;
    }

    /// Action points needed to walk `path`, each cell's movement bonus
    /// (percent) lowers the cost of entering it
    pub fn movement_cost<'a>(&self, path: impl IntoIterator<Item = &'a HexPoint>, area: &Area) -> u32 {
        path.into_iter()
            .map(|&cell| {
                let bonus = area.movement_bonus_at(cell).clamp(-100, 100);
                (self.movement_cost as i64 * (100 - bonus as i64) / 100) as u32
            })
            .sum()
    }

    /// Movement points left, `points_per_cell` of them buy one unmodified cell
    pub fn movement_left(&self, points_per_cell: u32) -> u32 {
        if self.movement_cost == 0 {
            return u32::MAX;
        }
        (points_per_cell as u64 * self.ap as u64 / self.movement_cost as u64) as u32
    }

    /// Pay for `path`, false (and nothing spent) if it is unaffordable
    pub fn spend<'a>(&mut self, path: impl IntoIterator<Item = &'a HexPoint>, area: &Area) -> bool {
        let cost = self.movement_cost(path, area);
        if cost > self.ap {
            return false;
        }
        self.ap -= cost;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::HexDim;

    #[test]
    fn movement_left_counts_points_not_cells() {
        let timer = ActionTimer {
            ap: 3_500,
            ..Default::default()
        };
        // 3.5 cells worth of AP
        assert_eq!(timer.movement_left(5), 17);
        assert_eq!(timer.movement_left(5) / 5, 3);
    }

    #[test]
    fn movement_bonus_reduces_cost() {
        let mut area = Area::open(HexDim::new(4, 4));
        area.set_movement_bonus(HexPoint::new(0, 1), 50);
        let timer = ActionTimer::default();
        let path = [HexPoint::new(0, 1), HexPoint::new(0, 2)];
        assert_eq!(timer.movement_cost(&path, &area), 500 + 1_000);
    }

    #[test]
    fn spending_is_all_or_nothing() {
        let area = Area::open(HexDim::new(4, 4));
        let mut timer = ActionTimer {
            ap: 1_500,
            ..Default::default()
        };
        let path = [HexPoint::new(0, 1), HexPoint::new(0, 2)];
        assert!(!timer.spend(&path, &area));
        assert_eq!(timer.ap, 1_500);
        assert!(timer.spend(&path[..1], &area));
        assert_eq!(timer.ap, 500);
    }
}

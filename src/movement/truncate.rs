use super::CombatMode;
use crate::area::Area;
use crate::creature::Creature;
use crate::pathfinding::Path;
use crate::rules::MovementRules;

/// Keep the steps the creature's remaining movement points pay for
pub fn to_movement_left(path: &mut Path, creature: &Creature, rules: &MovementRules) {
    let steps = creature.movement_left(rules) / rules.movement_points_per_cell.max(1);
    path.truncate(steps as usize);
}

/// Drop steps from the far end until the creature can afford the rest
pub fn to_budget(path: &mut Path, creature: &Creature, area: &Area, combat: CombatMode) {
    while !path.is_empty() && !creature.can_afford(&*path, area, combat) {
        path.pop_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::{HexDim, HexPoint};
    use crate::creature::{ActionTimer, Builder, Faction};

    fn walker(ap: u32) -> Creature {
        Builder::default()
            .name("walker")
            .pos(HexPoint::new(0, 0))
            .faction(Faction::Player)
            .timer(ActionTimer {
                ap,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    fn column(len: isize) -> Path {
        (1..=len).map(|v| HexPoint::new(0, v)).collect()
    }

    #[test]
    fn keeps_the_near_end() {
        let rules = MovementRules::default();
        let mut path = column(6);
        to_movement_left(&mut path, &walker(3_500), &rules);
        assert_eq!(path, column(3));
    }

    #[test]
    fn affordable_paths_are_untouched() {
        let area = Area::open(HexDim::new(3, 10));
        let rules = MovementRules::default();
        let creature = walker(4_000);

        let mut path = column(4);
        to_movement_left(&mut path, &creature, &rules);
        to_budget(&mut path, &creature, &area, CombatMode::TurnBased);
        assert_eq!(path, column(4));

        // truncating twice changes nothing more
        let mut path = column(8);
        to_movement_left(&mut path, &creature, &rules);
        let once = path.clone();
        to_movement_left(&mut path, &creature, &rules);
        to_budget(&mut path, &creature, &area, CombatMode::TurnBased);
        assert_eq!(path, once);
    }

    #[test]
    fn budget_follows_movement_bonus() {
        let mut area = Area::open(HexDim::new(3, 10));
        area.set_movement_bonus(HexPoint::new(0, 1), 50);
        area.set_movement_bonus(HexPoint::new(0, 2), 50);
        let creature = walker(2_000);

        let mut path = column(5);
        to_budget(&mut path, &creature, &area, CombatMode::TurnBased);
        assert_eq!(path, column(3));

        let mut path = column(5);
        to_budget(&mut path, &creature, &area, CombatMode::RealTime);
        assert_eq!(path, column(5));

        let mut stuck = creature.clone();
        stuck.immobilized = true;
        to_budget(&mut path, &stuck, &area, CombatMode::RealTime);
        assert!(path.is_empty());
    }
}

use std::collections::HashSet;

use crate::area::Area;
use crate::basic::HexPoint;
use crate::movement::CombatMode;
use crate::rules::MovementRules;

pub use builder::{Builder, BuilderError};
pub use timer::ActionTimer;

mod builder;
mod timer;

/// Index of a creature inside its `Area`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display(fmt = "#{}", _0)]
pub struct AgentId(pub usize);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Faction {
    Player,
    Ally,
    Neutral,
    Hostile,
}

impl Faction {
    fn is_friend_of_player(self) -> bool {
        matches!(self, Faction::Player | Faction::Ally)
    }

    pub fn is_hostile(self, other: Self) -> bool {
        self == Faction::Hostile && other.is_friend_of_player()
            || other == Faction::Hostile && self.is_friend_of_player()
    }

    pub fn is_friendly(self, other: Self) -> bool {
        self == other || self.is_friend_of_player() && other.is_friend_of_player()
    }
}

/// Range of cells a creature's weapon threatens
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Reach {
    pub min: usize,
    pub max: usize,
    /// Melee weapons only reach cells on the wielder's own elevation
    pub melee: bool,
}

impl Reach {
    pub const MELEE: Self = Self {
        min: 1,
        max: 1,
        melee: true,
    };
}

#[derive(Clone, Debug)]
pub struct Creature {
    pub name: String,
    pub pos: HexPoint,
    pub faction: Faction,
    pub timer: ActionTimer,
    /// None if the wielded weapon can't make reactive attacks
    pub reach: Option<Reach>,

    pub player_selectable: bool,
    pub immobilized: bool,
    pub helpless: bool,
    pub hidden: bool,

    pub attack_of_opportunity_available: bool,
    /// Movers this creature already made a reactive attack against this round
    attacked_this_round: HashSet<AgentId>,

    pub carried_weight: u32,
    pub weight_limit: u32,
}

impl Creature {
    pub fn is_overburdened(&self) -> bool {
        self.carried_weight > self.weight_limit
    }

    pub fn threatens(&self, cell: HexPoint, area: &Area) -> bool {
        if self.helpless {
            return false;
        }

        let reach = match self.reach {
            Some(reach) => reach,
            None => return false,
        };

        if reach.melee && area.elevation_at(self.pos) != area.elevation_at(cell) {
            return false;
        }

        let dist = self.pos.distance(cell);
        (reach.min..=reach.max).contains(&dist)
    }

    pub fn move_attack_taken_this_round(&self, mover: AgentId) -> bool {
        self.attacked_this_round.contains(&mover)
    }

    pub fn record_move_attack(&mut self, mover: AgentId) {
        self.attacked_this_round.insert(mover);
        self.attack_of_opportunity_available = false;
    }

    pub fn start_round(&mut self) {
        self.attacked_this_round.clear();
        self.attack_of_opportunity_available = self.reach.is_some();
        self.timer.reset();
    }

    /// Movement points left this round, `movement_points_per_cell` buy one cell
    pub fn movement_left(&self, rules: &MovementRules) -> u32 {
        self.timer.movement_left(rules.movement_points_per_cell)
    }

    /// Whether the creature has the action points to walk every cell of `path`
    pub fn can_afford<'a>(
        &self,
        path: impl IntoIterator<Item = &'a HexPoint>,
        area: &Area,
        combat: CombatMode,
    ) -> bool {
        if self.immobilized {
            return false;
        }

        // action points are only spent during turn-based combat
        if combat != CombatMode::TurnBased {
            return true;
        }

        self.timer.movement_cost(path, area) <= self.timer.ap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faction_relations() {
        use Faction::*;
        assert!(Hostile.is_hostile(Player));
        assert!(Ally.is_hostile(Hostile));
        assert!(!Neutral.is_hostile(Player));
        assert!(!Hostile.is_hostile(Hostile));
        assert!(Player.is_friendly(Ally));
        assert!(Hostile.is_friendly(Hostile));
        assert!(!Neutral.is_friendly(Player));
    }

    #[test]
    fn reach_limits_threatened_cells() {
        let area = Area::open(crate::basic::HexDim::new(6, 6));
        let mut spear = Builder::default()
            .name("spear")
            .pos(HexPoint::new(2, 2))
            .faction(Faction::Hostile)
            .reach(Some(Reach {
                min: 1,
                max: 2,
                melee: true,
            }))
            .build()
            .unwrap();

        assert!(!spear.threatens(HexPoint::new(2, 2), &area));
        assert!(spear.threatens(HexPoint::new(2, 3), &area));
        assert!(spear.threatens(HexPoint::new(2, 4), &area));
        assert!(!spear.threatens(HexPoint::new(2, 5), &area));

        spear.helpless = true;
        assert!(!spear.threatens(HexPoint::new(2, 3), &area));
    }

    #[test]
    fn reactive_attacks_reset_each_round() {
        let mut guard = Builder::default()
            .name("guard")
            .pos(HexPoint::new(0, 0))
            .faction(Faction::Hostile)
            .build()
            .unwrap();

        guard.record_move_attack(AgentId(3));
        assert!(guard.move_attack_taken_this_round(AgentId(3)));
        assert!(!guard.attack_of_opportunity_available);

        guard.start_round();
        assert!(!guard.move_attack_taken_this_round(AgentId(3)));
        assert!(guard.attack_of_opportunity_available);
    }
}

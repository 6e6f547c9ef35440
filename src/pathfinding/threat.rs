use crate::area::Area;
use crate::basic::HexPoint;
use crate::creature::AgentId;
use crate::movement::CombatMode;
use crate::rules::MovementRules;

/// Hostile creatures that could make a reactive attack on a mover
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreatSet(Vec<AgentId>);

impl ThreatSet {
    pub fn for_mover(area: &Area, mover: AgentId, combat: CombatMode) -> Self {
        let moving = area.creature(mover);
        if moving.hidden || combat != CombatMode::TurnBased {
            return Self::default();
        }

        let threats = area
            .creatures()
            .filter(|&(id, creature)| {
                id != mover
                    && creature.faction.is_hostile(moving.faction)
                    && !creature.hidden
                    && !creature.helpless
                    && creature.attack_of_opportunity_available
                    && !creature.move_attack_taken_this_round(mover)
            })
            .map(|(id, _)| id)
            .collect();
        Self(threats)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.0.iter().copied()
    }

    pub fn threatens(&self, area: &Area, cell: HexPoint) -> bool {
        self.iter().any(|id| area.creature(id).threatens(cell, area))
    }

    /// Search cost of stepping into `cell`
    pub fn cell_cost(&self, area: &Area, cell: HexPoint, rules: &MovementRules) -> u32 {
        if self.threatens(area, cell) {
            rules.threatened_cell_cost
        } else {
            rules.safe_cell_cost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::HexDim;
    use crate::creature::{Builder, Faction};

    fn place(area: &mut Area, name: &str, pos: HexPoint, faction: Faction) -> AgentId {
        area.add_creature(
            Builder::default()
                .name(name)
                .pos(pos)
                .faction(faction)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn only_able_hostiles_threaten() {
        let mut area = Area::open(HexDim::new(8, 8));
        let hero = place(&mut area, "hero", HexPoint::new(0, 0), Faction::Player);
        let orc = place(&mut area, "orc", HexPoint::new(4, 4), Faction::Hostile);
        let sleeper = place(&mut area, "sleeper", HexPoint::new(6, 6), Faction::Hostile);
        let lurker = place(&mut area, "lurker", HexPoint::new(6, 2), Faction::Hostile);
        let spent = place(&mut area, "spent", HexPoint::new(2, 6), Faction::Hostile);
        place(&mut area, "friend", HexPoint::new(1, 6), Faction::Ally);
        place(&mut area, "goat", HexPoint::new(7, 0), Faction::Neutral);

        area.creature_mut(sleeper).helpless = true;
        area.creature_mut(lurker).hidden = true;
        area.creature_mut(spent).record_move_attack(hero);

        let threats = ThreatSet::for_mover(&area, hero, CombatMode::TurnBased);
        assert_eq!(threats.iter().collect::<Vec<_>>(), vec![orc]);

        assert!(ThreatSet::for_mover(&area, hero, CombatMode::RealTime).is_empty());

        area.creature_mut(hero).hidden = true;
        assert!(ThreatSet::for_mover(&area, hero, CombatMode::TurnBased).is_empty());
    }

    #[test]
    fn threatened_cells_cost_more() {
        let mut area = Area::open(HexDim::new(8, 8));
        let hero = place(&mut area, "hero", HexPoint::new(0, 0), Faction::Player);
        place(&mut area, "orc", HexPoint::new(4, 4), Faction::Hostile);
        let rules = MovementRules::default();
        let threats = ThreatSet::for_mover(&area, hero, CombatMode::TurnBased);

        assert_eq!(threats.cell_cost(&area, HexPoint::new(4, 3), &rules), 2);
        assert_eq!(threats.cell_cost(&area, HexPoint::new(1, 1), &rules), 1);
    }
}

//! The map agents move on: terrain, elevation, fog of war, doors and the
//! creatures standing on it.

use crate::basic::{Elevation, Grid, HexDim, HexPoint};
use crate::creature::{AgentId, Creature};

pub use builder::{Builder, BuilderError};

mod builder;

#[derive(Clone, Debug)]
pub struct Area {
    passable: Grid<bool>,
    elevation: Grid<Elevation>,
    explored: Grid<bool>,
    /// Percent discount on the action point cost of entering a cell
    movement_bonus: Grid<i32>,
    /// None where there is no door, otherwise whether the door is open
    doors: Grid<Option<bool>>,
    creatures: Vec<Creature>,
}

impl Area {
    /// Fully passable, explored, flat area without doors or creatures
    pub fn open(dim: HexDim) -> Self {
        Self::from_passability(Grid::filled(dim, true))
    }

    pub fn from_passability(passable: Grid<bool>) -> Self {
        let dim = passable.dim();
        Self {
            passable,
            elevation: Grid::filled(dim, 0),
            explored: Grid::filled(dim, true),
            movement_bonus: Grid::filled(dim, 0),
            doors: Grid::filled(dim, None),
            creatures: vec![],
        }
    }

    pub fn dim(&self) -> HexDim {
        self.passable.dim()
    }

    pub fn contains(&self, pos: HexPoint) -> bool {
        self.dim().contains(pos)
    }

    /// Static terrain passability, false outside the area
    pub fn is_passable(&self, pos: HexPoint) -> bool {
        self.passable.is_set(pos)
    }

    pub fn passability(&self) -> &Grid<bool> {
        &self.passable
    }

    pub fn set_passable(&mut self, pos: HexPoint, passable: bool) {
        self.passable[pos] = passable;
    }

    /// Elevation band of a cell, 0 outside the area
    pub fn elevation_at(&self, pos: HexPoint) -> Elevation {
        self.elevation.get(pos).copied().unwrap_or(0)
    }

    pub fn set_elevation(&mut self, pos: HexPoint, elevation: Elevation) {
        self.elevation[pos] = elevation;
    }

    pub fn is_explored(&self, pos: HexPoint) -> bool {
        self.explored.is_set(pos)
    }

    pub fn set_explored(&mut self, pos: HexPoint, explored: bool) {
        self.explored[pos] = explored;
    }

    pub fn movement_bonus_at(&self, pos: HexPoint) -> i32 {
        self.movement_bonus.get(pos).copied().unwrap_or(0)
    }

    pub fn set_movement_bonus(&mut self, pos: HexPoint, bonus: i32) {
        self.movement_bonus[pos] = bonus;
    }

    pub fn add_door(&mut self, pos: HexPoint, open: bool) {
        self.doors[pos] = Some(open);
    }

    pub fn set_door_open(&mut self, pos: HexPoint, open: bool) {
        if let Some(door) = self.doors.get_mut(pos).and_then(Option::as_mut) {
            *door = open;
        }
    }

    fn has_closed_door(&self, pos: HexPoint) -> bool {
        matches!(self.doors.get(pos), Some(Some(false)))
    }

    pub fn add_creature(&mut self, creature: Creature) -> AgentId {
        assert!(
            self.contains(creature.pos),
            "{} placed outside the area at {:?}",
            creature.name,
            creature.pos
        );
        self.creatures.push(creature);
        AgentId(self.creatures.len() - 1)
    }

    // ids are only handed out by `add_creature`, an unknown id is a bug
    pub fn creature(&self, id: AgentId) -> &Creature {
        &self.creatures[id.0]
    }

    pub fn creature_mut(&mut self, id: AgentId) -> &mut Creature {
        &mut self.creatures[id.0]
    }

    pub fn creatures(&self) -> impl Iterator<Item = (AgentId, &Creature)> {
        self.creatures
            .iter()
            .enumerate()
            .map(|(idx, creature)| (AgentId(idx), creature))
    }

    pub fn creature_at(&self, pos: HexPoint) -> Option<AgentId> {
        self.creatures()
            .find(|(_, creature)| creature.pos == pos)
            .map(|(id, _)| id)
    }

    /// Which cells `mover` may walk through given the doors and the other
    /// creatures, written into `out` so search buffers can be reused
    ///
    /// Closed doors block, creatures block unless they are friendly to
    /// the mover or helpless.
    pub fn write_entity_passability(&self, mover: AgentId, out: &mut Grid<bool>) {
        let faction = self.creature(mover).faction;
        for pos in out.dim().positions() {
            out[pos] = !self.has_closed_door(pos);
        }
        for (id, creature) in self.creatures() {
            if id == mover || creature.helpless || creature.faction.is_friendly(faction) {
                continue;
            }
            if let Some(cell) = out.get_mut(creature.pos) {
                *cell = false;
            }
        }
    }

    pub fn entity_passability(&self, mover: AgentId) -> Grid<bool> {
        let mut pass = Grid::filled(self.dim(), true);
        self.write_entity_passability(mover, &mut pass);
        pass
    }

    /// Cells that are free right now: passable terrain with no creature
    /// and no closed door on it
    pub fn current_passable(&self) -> Grid<bool> {
        let mut pass = self.passable.clone();
        for pos in pass.dim().positions() {
            if self.has_closed_door(pos) {
                pass[pos] = false;
            }
        }
        for creature in &self.creatures {
            if let Some(cell) = pass.get_mut(creature.pos) {
                *cell = false;
            }
        }
        pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{self, Faction};

    fn creature(name: &str, pos: HexPoint, faction: Faction) -> Creature {
        creature::Builder::default()
            .name(name)
            .pos(pos)
            .faction(faction)
            .build()
            .unwrap()
    }

    #[test]
    fn hostile_creatures_and_closed_doors_block() {
        let mut area = Area::open(HexDim::new(5, 5));
        let hero = area.add_creature(creature("hero", HexPoint::new(0, 0), Faction::Player));
        area.add_creature(creature("friend", HexPoint::new(1, 0), Faction::Ally));
        let orc = area.add_creature(creature("orc", HexPoint::new(2, 0), Faction::Hostile));
        area.add_creature(creature("goat", HexPoint::new(3, 0), Faction::Neutral));
        area.add_door(HexPoint::new(4, 4), false);

        let pass = area.entity_passability(hero);
        assert!(pass[HexPoint::new(1, 0)]);
        assert!(!pass[HexPoint::new(2, 0)]);
        assert!(!pass[HexPoint::new(3, 0)]);
        assert!(!pass[HexPoint::new(4, 4)]);

        area.creature_mut(orc).helpless = true;
        area.set_door_open(HexPoint::new(4, 4), true);
        let pass = area.entity_passability(hero);
        assert!(pass[HexPoint::new(2, 0)]);
        assert!(pass[HexPoint::new(4, 4)]);
    }

    #[test]
    fn current_passable_marks_every_creature() {
        let mut area = Area::open(HexDim::new(3, 3));
        area.set_passable(HexPoint::new(2, 2), false);
        area.add_creature(creature("hero", HexPoint::new(0, 0), Faction::Player));
        area.add_creature(creature("friend", HexPoint::new(1, 1), Faction::Ally));

        let pass = area.current_passable();
        assert!(!pass[HexPoint::new(0, 0)]);
        assert!(!pass[HexPoint::new(1, 1)]);
        assert!(!pass[HexPoint::new(2, 2)]);
        assert!(pass[HexPoint::new(2, 1)]);
        assert_eq!(area.creature_at(HexPoint::new(1, 1)), Some(AgentId(1)));
        assert_eq!(area.creature_at(HexPoint::new(2, 1)), None);
    }
}

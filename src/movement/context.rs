use crate::area::Area;
use crate::creature::AgentId;
use crate::rules::MovementRules;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CombatMode {
    /// Action points are spent and hostile creatures make reactive attacks
    TurnBased,
    RealTime,
}

/// Whether the player's party follows the selected member around
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MovementMode {
    Party,
    Single,
}

/// The player's party, in marching order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Party {
    members: Vec<AgentId>,
}

impl Party {
    pub fn new(members: Vec<AgentId>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    pub fn push(&mut self, agent: AgentId) {
        if !self.contains(agent) {
            self.members.push(agent);
        }
    }
}

/// Everything a move request reads besides the mover itself
#[derive(Copy, Clone)]
pub struct MoveContext<'a> {
    pub area: &'a Area,
    pub party: &'a Party,
    pub rules: &'a MovementRules,
    pub combat: CombatMode,
    pub movement_mode: MovementMode,
    /// The interface currently refuses movement orders from the player
    pub input_suppressed: bool,
}

impl<'a> MoveContext<'a> {
    pub fn new(area: &'a Area, party: &'a Party, rules: &'a MovementRules) -> Self {
        Self {
            area,
            party,
            rules,
            combat: CombatMode::RealTime,
            movement_mode: MovementMode::Party,
            input_suppressed: false,
        }
    }

    #[must_use]
    pub fn combat(mut self, value: CombatMode) -> Self {
        self.combat = value;
        self
    }

    #[must_use]
    pub fn movement_mode(mut self, value: MovementMode) -> Self {
        self.movement_mode = value;
        self
    }

    #[must_use]
    pub fn input_suppressed(mut self, value: bool) -> Self {
        self.input_suppressed = value;
        self
    }
}

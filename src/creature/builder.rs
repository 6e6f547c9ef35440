use super::*;
use std::fmt::{Display, Formatter};

#[derive(Debug, Error)]
#[must_use]
pub struct BuilderError(pub Box<Builder>, pub &'static str);

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "creature builder error: {}", self.1)?;
        writeln!(f, "builder: {:?}", self.0)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Builder {
    pub name: Option<String>,
    pub pos: Option<HexPoint>,
    pub faction: Option<Faction>,
    pub timer: Option<ActionTimer>,
    pub reach: Option<Option<Reach>>,

    pub player_selectable: bool,
    pub immobilized: bool,
    pub hidden: bool,

    pub carried_weight: u32,
    pub weight_limit: Option<u32>,
}

impl Builder {
    pub const DEFAULT_WEIGHT_LIMIT: u32 = 50_000;

    #[inline(always)]
    #[must_use]
    pub fn name<S: ToString>(mut self, value: S) -> Self {
        self.name = Some(value.to_string());
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn pos(mut self, value: HexPoint) -> Self {
        self.pos = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn faction(mut self, value: Faction) -> Self {
        self.faction = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn timer(mut self, value: ActionTimer) -> Self {
        self.timer = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn reach(mut self, value: Option<Reach>) -> Self {
        self.reach = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn player_selectable(mut self, value: bool) -> Self {
        self.player_selectable = value;
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn immobilized(mut self, value: bool) -> Self {
        self.immobilized = value;
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn hidden(mut self, value: bool) -> Self {
        self.hidden = value;
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn carried_weight(mut self, value: u32) -> Self {
        self.carried_weight = value;
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn weight_limit(mut self, value: u32) -> Self {
        self.weight_limit = Some(value);
        self
    }

    pub fn build(&self) -> Result<Creature, BuilderError> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `name`"))?;
        let pos = self
            .pos
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `pos`"))?;
        let faction = self
            .faction
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `faction`"))?;

        if self.player_selectable && faction != Faction::Player {
            return Err(BuilderError(
                Box::new(self.clone()),
                "player_selectable set but faction is not `Player`",
            ));
        }

        let reach = self.reach.unwrap_or(Some(Reach::MELEE));

        Ok(Creature {
            name,
            pos,
            faction,
            timer: self.timer.unwrap_or_default(),
            reach,
            player_selectable: self.player_selectable,
            immobilized: self.immobilized,
            helpless: false,
            hidden: self.hidden,
            attack_of_opportunity_available: reach.is_some(),
            attacked_this_round: HashSet::new(),
            carried_weight: self.carried_weight,
            weight_limit: self.weight_limit.unwrap_or(Self::DEFAULT_WEIGHT_LIMIT),
        })
    }
}

#[test]
fn test_missing_fields_are_reported() {
    let err = Builder::default().name("nobody").build().unwrap_err();
    assert_eq!(err.1, "missing field `pos`");

    let err = Builder::default()
        .name("impostor")
        .pos(HexPoint::new(0, 0))
        .faction(Faction::Hostile)
        .player_selectable(true)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("player_selectable"));
}

#[test]
fn test_defaults() {
    let creature = Builder::default()
        .name("scout")
        .pos(HexPoint::new(1, 1))
        .faction(Faction::Ally)
        .build()
        .unwrap();
    assert_eq!(creature.reach, Some(Reach::MELEE));
    assert!(creature.attack_of_opportunity_available);
    assert_eq!(creature.timer, ActionTimer::default());
    assert!(!creature.is_overburdened());
}

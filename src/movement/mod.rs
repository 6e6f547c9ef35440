//! Validating, pathing and scheduling movement orders.

use tracing::{debug, info};

use crate::basic::HexPoint;
use crate::creature::AgentId;
use crate::pathfinding::{Path, Pathfinder, SearchGrid};

pub use context::{CombatMode, MoveContext, MovementMode, Party};
pub use formation::{move_party_in_formation, plan_formation, FormationMove, FormationPlan};
pub use scheduler::{
    MoveEvent, MoveOptions, MoveOutcome, MovementQueue, MovementScheduler, MoverHandle,
};

mod context;
pub mod formation;
mod scheduler;
pub mod truncate;

/// Why a movement order was refused
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
pub enum MoveRejection {
    #[display(fmt = "the target is outside of the area")]
    OutOfBounds,
    #[display(fmt = "the target hasn't been explored")]
    Unexplored,
    #[display(fmt = "movement orders are suppressed")]
    MovementSuppressed,
    #[display(fmt = "the target is impassable")]
    Impassable,
    #[display(fmt = "the target is on a different elevation")]
    ElevationMismatch,
    #[display(fmt = "the mover is immobilized")]
    Immobilized,
    #[display(fmt = "the mover is already at the target")]
    AlreadyThere,
    #[display(fmt = "the mover is already moving")]
    AlreadyMoving,
    #[display(fmt = "there is no path to the target")]
    NoPath,
    #[display(fmt = "the mover can't afford a single step")]
    InsufficientBudget,
    #[display(fmt = "the mover is overburdened")]
    Overburdened,
    #[display(fmt = "no path was computed for this order")]
    NoComputedPath,
}

/// A scheduled movement order
#[derive(Debug)]
pub struct MoveOrder {
    pub agent: AgentId,
    pub handle: MoverHandle,
    /// Set when the rest of the party followed along
    pub formation: Option<FormationMove>,
}

#[derive(Clone, Debug)]
struct ComputedPath {
    agent: AgentId,
    target: HexPoint,
    path: Path,
}

/// The move ability: checks orders and remembers the path of the last
/// successful check until it is executed
#[derive(Clone, Debug, Default)]
pub struct Move {
    /// Cut paths down to the movement points the mover has left
    pub truncate_path: bool,
    computed: Option<ComputedPath>,
}

impl Move {
    pub fn new(truncate_path: bool) -> Self {
        Self {
            truncate_path,
            computed: None,
        }
    }

    /// The path remembered by the last successful check
    pub fn computed_path(&self) -> Option<&Path> {
        self.computed.as_ref().map(|computed| &computed.path)
    }

    pub fn check_move<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &S,
        agent: AgentId,
        target: HexPoint,
        distance_away: usize,
    ) -> Result<(), MoveRejection> {
        self.computed = None;
        let result = self.compute_path(ctx, grid, scheduler, agent, target, distance_away);
        match result {
            Ok(path) => {
                self.computed = Some(ComputedPath {
                    agent,
                    target,
                    path,
                });
                Ok(())
            }
            Err(rejection) => {
                debug!("{} can't move to {:?}: {}", agent, target, rejection);
                Err(rejection)
            }
        }
    }

    fn compute_path<S: MovementScheduler + ?Sized>(
        &self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &S,
        agent: AgentId,
        target: HexPoint,
        distance_away: usize,
    ) -> Result<Path, MoveRejection> {
        use MoveRejection::*;

        let area = ctx.area;
        let creature = area.creature(agent);

        if !area.contains(target) {
            return Err(OutOfBounds);
        }
        if creature.player_selectable {
            if !area.is_explored(target) {
                return Err(Unexplored);
            }
            if ctx.input_suppressed {
                return Err(MovementSuppressed);
            }
        }
        if !area.is_passable(target) {
            return Err(Impassable);
        }
        if area.elevation_at(creature.pos) != area.elevation_at(target) {
            return Err(ElevationMismatch);
        }
        if creature.immobilized {
            return Err(Immobilized);
        }
        if creature.pos == target {
            return Err(AlreadyThere);
        }
        if scheduler.is_moving(agent) {
            return Err(AlreadyMoving);
        }

        let mut path = Pathfinder::new(area, ctx.rules, ctx.combat)
            .shortest_path(grid, agent, target, distance_away)
            .ok_or(NoPath)?;

        if self.truncate_path {
            truncate::to_movement_left(&mut path, creature, ctx.rules);
        }
        truncate::to_budget(&mut path, creature, area, ctx.combat);

        if path.is_empty() {
            return Err(InsufficientBudget);
        }
        Ok(path)
    }

    pub fn can_move<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &S,
        agent: AgentId,
        target: HexPoint,
        distance_away: usize,
    ) -> bool {
        self.check_move(ctx, grid, scheduler, agent, target, distance_away)
            .is_ok()
    }

    /// Whether the ability can be used to walk onto `target`
    pub fn can_activate<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &S,
        agent: AgentId,
        target: HexPoint,
    ) -> bool {
        self.can_move(ctx, grid, scheduler, agent, target, 0)
    }

    /// Walk the path found by the preceding `can_activate`, provoking
    /// reactive attacks on the way
    pub fn activate<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &mut S,
        agent: AgentId,
        target: HexPoint,
    ) -> Result<MoveOrder, MoveRejection> {
        match &self.computed {
            Some(computed) if computed.agent == agent && computed.target == target => {}
            _ => return Err(MoveRejection::NoComputedPath),
        }
        self.start(ctx, grid, scheduler, agent, true)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn move_towards<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &mut S,
        agent: AgentId,
        target: HexPoint,
        distance_away: usize,
        provoke: bool,
    ) -> Result<MoveOrder, MoveRejection> {
        self.check_move(ctx, grid, &*scheduler, agent, target, distance_away)?;
        self.start(ctx, grid, scheduler, agent, provoke)
    }

    fn start<S: MovementScheduler + ?Sized>(
        &mut self,
        ctx: &MoveContext,
        grid: &mut SearchGrid,
        scheduler: &mut S,
        agent: AgentId,
        provoke: bool,
    ) -> Result<MoveOrder, MoveRejection> {
        let path = match self.computed.take() {
            Some(computed) => computed.path,
            None => return Err(MoveRejection::NoComputedPath),
        };

        let creature = ctx.area.creature(agent);
        if creature.is_overburdened() {
            info!("{} is overburdened and cannot move.", creature.name);
            return Err(MoveRejection::Overburdened);
        }

        let start = creature.pos;
        let background = creature.player_selectable;
        let follow = background
            && ctx.combat != CombatMode::TurnBased
            && ctx.movement_mode == MovementMode::Party;
        let leader_path = follow.then(|| path.clone());

        info!(
            "{} moves from {:?} to {:?} in {} steps",
            creature.name,
            start,
            path.destination(),
            path.len()
        );
        let handle = scheduler.add_move(agent, path, MoveOptions {
            provoke,
            background,
        });

        let formation = leader_path.map(|leader_path| {
            move_party_in_formation(ctx, grid, scheduler, agent, start, &leader_path, provoke)
        });

        Ok(MoveOrder {
            agent,
            handle,
            formation,
        })
    }
}

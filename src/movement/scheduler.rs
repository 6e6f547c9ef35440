use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use tracing::{debug, info};

use super::CombatMode;
use crate::area::Area;
use crate::basic::HexPoint;
use crate::creature::AgentId;
use crate::pathfinding::{Path, ThreatSet};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MoveOutcome {
    /// The mover reached the end of its path
    Completed,
    /// The mover was stopped between two cells
    Interrupted,
    /// The scheduler dropped the move before it finished
    Cancelled,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct MoveOptions {
    /// Leaving a threatened cell gives hostile creatures a reactive attack
    pub provoke: bool,
    /// The interface stays usable while this move runs
    pub background: bool,
}

/// Resolves to the outcome of a scheduled move
#[derive(Debug)]
pub struct MoverHandle {
    agent: AgentId,
    background: bool,
    done: oneshot::Receiver<MoveOutcome>,
}

impl MoverHandle {
    /// A handle and the sender that completes it
    pub fn new(agent: AgentId, background: bool) -> (Self, oneshot::Sender<MoveOutcome>) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            agent,
            background,
            done: rx,
        };
        (handle, tx)
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    /// The outcome if the move already ended, without waiting
    pub fn try_outcome(&mut self) -> Option<MoveOutcome> {
        match self.done.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(MoveOutcome::Cancelled),
        }
    }
}

impl Future for MoverHandle {
    type Output = MoveOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.done)
            .poll(cx)
            .map(|result| result.unwrap_or(MoveOutcome::Cancelled))
    }
}

/// Executes paths handed over by the movement coordinator
pub trait MovementScheduler {
    fn add_move(&mut self, agent: AgentId, path: Path, options: MoveOptions) -> MoverHandle;

    fn is_moving(&self, agent: AgentId) -> bool;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveEvent {
    Stepped {
        agent: AgentId,
        from: HexPoint,
        to: HexPoint,
    },
    Provoked {
        mover: AgentId,
        attacker: AgentId,
    },
    Finished {
        agent: AgentId,
        outcome: MoveOutcome,
    },
}

#[derive(Debug)]
struct Mover {
    agent: AgentId,
    path: Path,
    options: MoveOptions,
    blocked_ticks: usize,
    interrupted: bool,
    done: oneshot::Sender<MoveOutcome>,
}

/// Moves every scheduled agent one cell per tick, in the order the moves
/// were added
#[derive(Debug, Default)]
pub struct MovementQueue {
    movers: Vec<Mover>,
}

impl MovementQueue {
    /// Ticks a mover waits for a creature to leave the next cell
    pub const MAX_BLOCKED_TICKS: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    /// Stop `agent` before it enters its next cell
    pub fn interrupt(&mut self, agent: AgentId) -> bool {
        match self.movers.iter_mut().find(|mover| mover.agent == agent) {
            Some(mover) => {
                mover.interrupted = true;
                true
            }
            None => false,
        }
    }

    /// Whether any unfinished move blocks the interface
    pub fn has_foreground_move(&self) -> bool {
        self.movers.iter().any(|mover| !mover.options.background)
    }

    pub fn tick(&mut self, area: &mut Area, combat: CombatMode) -> Vec<MoveEvent> {
        let mut events = vec![];
        for mut mover in std::mem::take(&mut self.movers) {
            match Self::step(&mut mover, area, combat, &mut events) {
                Some(outcome) => {
                    debug!("move of {} ended: {:?}", mover.agent, outcome);
                    // the handle may have been dropped, nobody is waiting then
                    let _ = mover.done.send(outcome);
                    events.push(MoveEvent::Finished {
                        agent: mover.agent,
                        outcome,
                    });
                }
                None => self.movers.push(mover),
            }
        }
        events
    }

    /// Tick until every move ended or `max_ticks` ticks passed
    pub fn run(&mut self, area: &mut Area, combat: CombatMode, max_ticks: usize) -> Vec<MoveEvent> {
        let mut events = vec![];
        for _ in 0..max_ticks {
            if self.is_empty() {
                break;
            }
            events.extend(self.tick(area, combat));
        }
        events
    }

    fn step(
        mover: &mut Mover,
        area: &mut Area,
        combat: CombatMode,
        events: &mut Vec<MoveEvent>,
    ) -> Option<MoveOutcome> {
        if mover.interrupted {
            return Some(MoveOutcome::Interrupted);
        }

        let agent = mover.agent;
        let next = match mover.path.first() {
            Some(next) => next,
            None => return Some(MoveOutcome::Completed),
        };

        if matches!(area.creature_at(next), Some(other) if other != agent) {
            mover.blocked_ticks += 1;
            if mover.blocked_ticks > Self::MAX_BLOCKED_TICKS {
                debug!("{} gave up waiting for {:?} to clear", agent, next);
                return Some(MoveOutcome::Interrupted);
            }
            return None;
        }
        mover.blocked_ticks = 0;

        if combat == CombatMode::TurnBased {
            let mut timer = area.creature(agent).timer;
            if !timer.spend(std::iter::once(&next), area) {
                return Some(MoveOutcome::Interrupted);
            }
            area.creature_mut(agent).timer = timer;
        }

        let from = area.creature(agent).pos;
        if mover.options.provoke {
            let threats = ThreatSet::for_mover(area, agent, combat);
            for attacker in threats.iter() {
                if area.creature(attacker).threatens(from, area) {
                    info!(
                        "{} provokes a reactive attack from {}",
                        area.creature(agent).name,
                        area.creature(attacker).name
                    );
                    area.creature_mut(attacker).record_move_attack(agent);
                    events.push(MoveEvent::Provoked {
                        mover: agent,
                        attacker,
                    });
                }
            }
        }

        area.creature_mut(agent).pos = next;
        mover.path.pop_front();
        events.push(MoveEvent::Stepped {
            agent,
            from,
            to: next,
        });

        mover.path.is_empty().then(|| MoveOutcome::Completed)
    }
}

impl MovementScheduler for MovementQueue {
    fn add_move(&mut self, agent: AgentId, path: Path, options: MoveOptions) -> MoverHandle {
        // dropping the previous sender cancels the replaced move
        if let Some(idx) = self.movers.iter().position(|mover| mover.agent == agent) {
            debug!("replacing the unfinished move of {}", agent);
            self.movers.remove(idx);
        }

        let (handle, done) = MoverHandle::new(agent, options.background);
        self.movers.push(Mover {
            agent,
            path,
            options,
            blocked_ticks: 0,
            interrupted: false,
            done,
        });
        handle
    }

    fn is_moving(&self, agent: AgentId) -> bool {
        self.movers.iter().any(|mover| mover.agent == agent)
    }
}

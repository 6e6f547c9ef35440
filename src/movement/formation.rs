//! Moving the rest of the party along behind the member the player moved.
//!
//! Followers first take the cells the leader walks through, last cell
//! first, ending on the cell the leader started from. Whoever is left over
//! is placed further back in the direction the party came from, falling
//! back to the nearest free cell around the slot it would have liked.

use itertools::Itertools;
use tracing::{info, trace};

use super::{MoveContext, MoveOptions, MovementScheduler, MoverHandle};
use crate::area::Area;
use crate::basic::{Grid, HexPoint};
use crate::creature::AgentId;
use crate::pathfinding::{Path, Pathfinder, SearchGrid};
use crate::rules::FormationRules;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormationPlan {
    /// Members with the path to their slot, an empty path means the member
    /// already stands on its slot
    pub assignments: Vec<(AgentId, Path)>,
    /// Members no slot could be found for
    pub unassigned: Vec<AgentId>,
    /// Members that can't move right now
    pub skipped: Vec<AgentId>,
}

impl FormationPlan {
    pub fn slot_of(&self, member: AgentId) -> Option<HexPoint> {
        self.assignments
            .iter()
            .find(|(id, _)| *id == member)
            .and_then(|(_, path)| path.destination())
    }
}

#[derive(Debug, Default)]
pub struct FormationMove {
    pub followers: Vec<(AgentId, MoverHandle)>,
    pub unassigned: Vec<AgentId>,
}

/// Free cells for followers: the current occupancy of the area with the
/// moving members' cells freed and the leader's destination taken
pub fn working_mask(
    area: &Area,
    moving: impl IntoIterator<Item = AgentId>,
    destination: HexPoint,
) -> Grid<bool> {
    let mut mask = area.current_passable();
    for member in moving {
        let pos = area.creature(member).pos;
        mask[pos] = area.is_passable(pos);
    }
    if let Some(cell) = mask.get_mut(destination) {
        *cell = false;
    }
    mask
}

/// Cells behind the leader, last path cell before the destination first,
/// ending on the leader's start cell
pub fn trailing_slots(start: HexPoint, path: &Path) -> Vec<HexPoint> {
    path.iter()
        .rev()
        .skip(1)
        .copied()
        .chain(std::iter::once(start))
        .collect()
}

/// `preferred` if it's free, otherwise the free cell closest to
/// `destination` on the nearest ring around `preferred`
pub fn nearest_available(
    mask: &Grid<bool>,
    preferred: HexPoint,
    destination: HexPoint,
    max_radius: usize,
) -> Option<HexPoint> {
    if mask.is_set(preferred) {
        return Some(preferred);
    }

    (1..=max_radius).find_map(|radius| {
        preferred
            .ring(radius)
            .filter(|&pos| mask.is_set(pos))
            .min_by_key(|pos| pos.distance(destination))
    })
}

fn can_follow<S: MovementScheduler + ?Sized>(area: &Area, scheduler: &S, member: AgentId) -> bool {
    let creature = area.creature(member);
    !creature.is_overburdened() && !creature.immobilized && !scheduler.is_moving(member)
}

/// Pick a slot and a path for every party member besides `leader`, who
/// walks `leader_path` from `leader_start`
pub fn plan_formation<S: MovementScheduler + ?Sized>(
    ctx: &MoveContext,
    grid: &mut SearchGrid,
    scheduler: &S,
    leader: AgentId,
    leader_start: HexPoint,
    leader_path: &Path,
) -> FormationPlan {
    let mut plan = FormationPlan::default();
    let destination = match leader_path.destination() {
        Some(destination) => destination,
        None => return plan,
    };

    let area = ctx.area;
    let (followers, skipped): (Vec<_>, Vec<_>) = ctx
        .party
        .members()
        .iter()
        .copied()
        .filter(|&member| member != leader)
        .partition(|&member| can_follow(area, scheduler, member));
    plan.skipped = skipped;

    let mut mask = working_mask(
        area,
        followers.iter().copied().chain(std::iter::once(leader)),
        destination,
    );
    let finder = Pathfinder::new(area, ctx.rules, ctx.combat);

    // follow the leader's footsteps
    let mut pending = followers.into_iter().peekable();
    let mut last_assigned = destination;
    for slot in trailing_slots(leader_start, leader_path) {
        let member = match pending.peek() {
            Some(&member) => member,
            None => break,
        };
        if !mask.is_set(slot) {
            trace!("trailing slot {:?} is taken", slot);
            continue;
        }

        match finder.shortest_path_ignore_party(grid, member, slot, &mask, ctx.party) {
            Some(path) => {
                trace!("{} follows into {:?}", member, slot);
                mask[slot] = false;
                plan.assignments.push((member, path));
                last_assigned = slot;
                pending.next();
            }
            None => trace!("{} can't reach trailing slot {:?}", member, slot),
        }
    }

    // line up the rest behind the last one placed
    let rules: &FormationRules = &ctx.rules.formation;
    let follow_dir = if last_assigned == leader_start {
        // nothing placed behind the start, keep going the way the leader came from
        destination.dir_towards(leader_start)
    } else {
        last_assigned.dir_towards(leader_start)
    };
    let mut preferred = last_assigned;
    while let Some(member) = pending.next() {
        let member_distance = area.creature(member).pos.distance(destination);
        loop {
            preferred = preferred.translate(follow_dir, 1);
            let candidate =
                match nearest_available(&mask, preferred, destination, rules.max_search_radius) {
                    Some(candidate) => candidate,
                    None => {
                        trace!("no free cell around {:?}, giving up", preferred);
                        plan.unassigned.push(member);
                        plan.unassigned.extend(pending.by_ref());
                        break;
                    }
                };

            if candidate.distance(destination) > rules.max_slot_distance {
                trace!("{:?} is too far from {:?}", candidate, destination);
                mask[candidate] = false;
                continue;
            }

            let found =
                finder.shortest_path_ignore_party(grid, member, candidate, &mask, ctx.party);
            let path = match found {
                Some(path) => path,
                None => {
                    trace!("{} can't reach {:?}", member, candidate);
                    mask[candidate] = false;
                    continue;
                }
            };

            if path.len() > rules.max_detour_ratio * member_distance {
                trace!(
                    "{} would take {} steps to reach {:?}",
                    member,
                    path.len(),
                    candidate
                );
                mask[candidate] = false;
                continue;
            }

            trace!("{} lines up at {:?}", member, candidate);
            mask[candidate] = false;
            plan.assignments.push((member, path));
            break;
        }
    }

    plan
}

/// Plan the formation and hand every follower's path to the scheduler
pub fn move_party_in_formation<S: MovementScheduler + ?Sized>(
    ctx: &MoveContext,
    grid: &mut SearchGrid,
    scheduler: &mut S,
    leader: AgentId,
    leader_start: HexPoint,
    leader_path: &Path,
    provoke: bool,
) -> FormationMove {
    let plan = plan_formation(ctx, grid, &*scheduler, leader, leader_start, leader_path);
    if !plan.unassigned.is_empty() {
        info!(
            "{} stay behind",
            plan.unassigned
                .iter()
                .map(|&id| ctx.area.creature(id).name.as_str())
                .join(", ")
        );
    }

    let options = MoveOptions {
        provoke,
        background: true,
    };
    let followers = plan
        .assignments
        .into_iter()
        .filter(|(_, path)| !path.is_empty())
        .map(|(member, path)| (member, scheduler.add_move(member, path, options)))
        .collect();

    FormationMove {
        followers,
        unassigned: plan.unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area;
    use crate::basic::HexDim;
    use crate::creature::{Builder, Faction};
    use crate::movement::{CombatMode, Move, MovementQueue, Party};
    use crate::rules::MovementRules;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn member(name: &str, pos: HexPoint) -> crate::creature::Creature {
        Builder::default()
            .name(name)
            .pos(pos)
            .faction(Faction::Player)
            .player_selectable(true)
            .build()
            .unwrap()
    }

    fn leader_path(area: &Area, grid: &mut SearchGrid, leader: AgentId, target: HexPoint) -> Path {
        let rules = MovementRules::default();
        Pathfinder::new(area, &rules, CombatMode::RealTime)
            .shortest_path(grid, leader, target, 0)
            .unwrap()
    }

    #[test]
    fn followers_take_the_trailing_cells() {
        let mut area = Area::open(HexDim::new(8, 8));
        let start = HexPoint::new(3, 6);
        let leader = area.add_creature(member("leader", start));
        let left = area.add_creature(member("left", HexPoint::new(2, 6)));
        let right = area.add_creature(member("right", HexPoint::new(4, 6)));
        let party = Party::new(vec![leader, left, right]);
        let rules = MovementRules::default();
        let ctx = MoveContext::new(&area, &party, &rules);
        let mut grid = SearchGrid::new(&area);

        let path = leader_path(&area, &mut grid, leader, HexPoint::new(3, 2));
        assert_eq!(path.len(), 4);
        let slots = trailing_slots(start, &path);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[3], start);

        let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);
        assert!(plan.unassigned.is_empty());
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.slot_of(left), Some(slots[0]));
        assert_eq!(plan.slot_of(right), Some(slots[1]));
        assert_ne!(plan.slot_of(left), path.destination());
        assert_ne!(plan.slot_of(right), path.destination());
    }

    #[test]
    fn unable_members_are_skipped() {
        let mut area = Area::open(HexDim::new(8, 8));
        let start = HexPoint::new(3, 6);
        let leader = area.add_creature(member("leader", start));
        let stuck = area.add_creature(member("stuck", HexPoint::new(3, 4)));
        let walker = area.add_creature(member("walker", HexPoint::new(4, 6)));
        area.creature_mut(stuck).immobilized = true;
        let party = Party::new(vec![leader, stuck, walker]);
        let rules = MovementRules::default();
        let ctx = MoveContext::new(&area, &party, &rules);
        let mut grid = SearchGrid::new(&area);

        let path = leader_path(&area, &mut grid, leader, HexPoint::new(3, 2));
        let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);
        assert_eq!(plan.skipped, vec![stuck]);
        assert_eq!(plan.assignments.len(), 1);
        assert_ne!(plan.slot_of(walker), Some(HexPoint::new(3, 4)));
    }

    #[test]
    fn leftover_members_line_up_behind() {
        // a single column, every cell is on the leader's line
        let mut area = Area::open(HexDim::new(1, 12));
        let start = HexPoint::new(0, 1);
        let leader = area.add_creature(member("leader", start));
        let close = area.add_creature(member("close", HexPoint::new(0, 2)));
        let far = area.add_creature(member("far", HexPoint::new(0, 9)));
        let party = Party::new(vec![leader, close, far]);
        let mut grid = SearchGrid::new(&area);
        let path = leader_path(&area, &mut grid, leader, HexPoint::new(0, 0));

        let rules = MovementRules::default();
        let ctx = MoveContext::new(&area, &party, &rules);
        let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);
        assert_eq!(plan.slot_of(close), Some(start));
        assert_eq!(plan.slot_of(far), Some(HexPoint::new(0, 2)));

        let mut rules = MovementRules::default();
        rules.formation.max_slot_distance = 1;
        let ctx = MoveContext::new(&area, &party, &rules);
        let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);
        assert_eq!(plan.slot_of(close), Some(start));
        assert_eq!(plan.unassigned, vec![far]);
    }

    #[test]
    fn leftover_members_never_end_up_ahead_of_the_leader() {
        let mut area = Area::open(HexDim::new(9, 9));
        let start = HexPoint::new(4, 6);
        let leader = area.add_creature(member("leader", start));
        let followers = [(3, 6), (5, 6), (3, 7), (5, 7)]
            .iter()
            .enumerate()
            .map(|(i, &(h, v))| {
                area.add_creature(member(&format!("follower {}", i), HexPoint::new(h, v)))
            })
            .collect_vec();
        let party = Party::new(
            std::iter::once(leader)
                .chain(followers.iter().copied())
                .collect(),
        );
        let rules = MovementRules::default();
        let ctx = MoveContext::new(&area, &party, &rules);
        let mut grid = SearchGrid::new(&area);

        // straight up, only two trailing slots for four followers
        let destination = HexPoint::new(4, 4);
        let path = leader_path(&area, &mut grid, leader, destination);
        assert_eq!(path.len(), 2);

        let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);
        assert!(plan.unassigned.is_empty());
        assert_eq!(plan.assignments.len(), 4);
        let slots = followers
            .iter()
            .map(|&follower| plan.slot_of(follower).unwrap())
            .collect_vec();
        for &slot in &slots {
            assert!(slot.distance(start) <= slot.distance(destination), "{:?} is ahead", slot);
        }
        assert_eq!(slots, vec![
            HexPoint::new(4, 5),
            HexPoint::new(4, 6),
            HexPoint::new(4, 7),
            HexPoint::new(4, 8)
        ]);
    }

    #[test]
    fn follower_too_far_away_stays_behind() {
        let mut area = area::Builder::default()
            .terrain(&[".", ".", "#", "#", "#", "#", "#", "."])
            .build()
            .unwrap();
        let leader = area.add_creature(member("leader", HexPoint::new(0, 1)));
        let straggler = area.add_creature(member("straggler", HexPoint::new(0, 7)));
        let party = Party::new(vec![leader, straggler]);
        let rules = MovementRules::default();
        let ctx = MoveContext::new(&area, &party, &rules);
        let mut grid = SearchGrid::new(&area);
        let mut queue = MovementQueue::new();

        let order = Move::default()
            .move_towards(&ctx, &mut grid, &mut queue, leader, HexPoint::new(0, 0), 0, false)
            .unwrap();
        let formation = order.formation.unwrap();
        assert!(formation.followers.is_empty());
        assert_eq!(formation.unassigned, vec![straggler]);
        assert!(queue.is_moving(leader));
        assert!(!queue.is_moving(straggler));
    }

    #[test]
    fn nearest_available_prefers_cells_near_the_destination() {
        let dim = HexDim::new(9, 9);
        let preferred = HexPoint::new(4, 4);
        let destination = HexPoint::new(3, 8);

        let mut mask = Grid::filled(dim, true);
        assert_eq!(nearest_available(&mask, preferred, destination, 4), Some(preferred));

        mask.fill(false);
        mask[HexPoint::new(5, 3)] = true;
        mask[HexPoint::new(3, 4)] = true;
        mask[HexPoint::new(3, 6)] = true;
        assert_eq!(
            nearest_available(&mask, preferred, destination, 4),
            Some(HexPoint::new(3, 4))
        );

        mask.fill(false);
        mask[HexPoint::new(3, 6)] = true;
        assert_eq!(
            nearest_available(&mask, preferred, destination, 4),
            Some(HexPoint::new(3, 6))
        );
        assert_eq!(nearest_available(&mask, preferred, destination, 1), None);
    }

    #[test]
    fn no_cell_is_handed_out_twice() {
        let mut rng = StdRng::seed_from_u64(42);
        let dim = HexDim::new(12, 12);
        let rules = MovementRules::default();

        for _ in 0..30 {
            let passable = Grid::from_fn(dim, |_| rng.gen_bool(0.85));
            let mut area = Area::from_passability(passable);
            let cells = dim
                .positions()
                .filter(|&pos| area.is_passable(pos))
                .collect_vec();
            let picks = rand::seq::index::sample(&mut rng, cells.len(), 6);
            let mut members = picks.iter().map(|idx| cells[idx]).collect_vec();
            let target = members.pop().unwrap();
            let ids = members
                .iter()
                .enumerate()
                .map(|(i, &pos)| area.add_creature(member(&format!("m{}", i), pos)))
                .collect_vec();
            let leader = ids[0];
            let start = area.creature(leader).pos;
            let party = Party::new(ids.clone());
            let ctx = MoveContext::new(&area, &party, &rules);
            let mut grid = SearchGrid::new(&area);

            let path = match Pathfinder::new(&area, &rules, CombatMode::RealTime)
                .shortest_path(&mut grid, leader, target, 0)
            {
                Some(path) => path,
                None => continue,
            };
            let plan = plan_formation(&ctx, &mut grid, &MovementQueue::new(), leader, start, &path);

            let slots = plan
                .assignments
                .iter()
                .map(|(id, path)| path.destination().unwrap_or(area.creature(*id).pos))
                .collect_vec();
            assert_eq!(slots.iter().unique().count(), slots.len(), "{:?}", slots);
            assert!(!slots.contains(&target));
            assert_eq!(
                plan.assignments.len() + plan.unassigned.len() + plan.skipped.len(),
                ids.len() - 1
            );
        }
    }
}

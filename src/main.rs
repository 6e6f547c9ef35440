use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hex_march::area::{self, Area};
use hex_march::basic::HexPoint;
use hex_march::creature::{self, AgentId, Faction};
use hex_march::error::ErrorConversion;
use hex_march::movement::{CombatMode, Move, MoveContext, MoveEvent, MovementQueue, Party};
use hex_march::pathfinding::SearchGrid;
use hex_march::rules::MovementRules;
use hex_march::Result;

const MAP: [&str; 10] = [
    "..............",
    "..............",
    "....####......",
    ".......#......",
    ".......+......",
    ".......#......",
    "....####......",
    "..............",
    "..............",
    "...........???",
];

const DESTINATION: HexPoint = HexPoint::new(11, 4);
const MAX_TICKS: usize = 100;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result {
    let rules = match std::env::args().nth(1) {
        Some(path) => MovementRules::from_file(path).with_trace_step("loading rules")?,
        None => MovementRules::default(),
    };

    let (mut area, party, orc) = demo_area().with_trace_step("setting up the demo area")?;
    let leader = party.members()[0];
    let mut grid = SearchGrid::new(&area);
    let mut queue = MovementQueue::new();
    let mut ability = Move::default();

    // exploring: the party follows the leader across the map
    let order = {
        let ctx = MoveContext::new(&area, &party, &rules);
        ability.move_towards(&ctx, &mut grid, &mut queue, leader, DESTINATION, 0, false)
    };
    match order {
        Ok(order) => {
            if let Some(formation) = &order.formation {
                info!(
                    "{} followers, {} left behind",
                    formation.followers.len(),
                    formation.unassigned.len()
                );
            }
            queue.run(&mut area, CombatMode::RealTime, MAX_TICKS);
            info!("leader's move ended: {:?}", block_on(order.handle));
        }
        Err(rejection) => info!("the party stays put: {}", rejection),
    }
    report(&area, &party);

    // combat: the leader closes in on the orc, one turn at a time
    let mut ability = Move::new(true);
    for round in 1..=3 {
        let target = area.creature(orc).pos;
        if area.creature(leader).pos.is_adjacent(target) {
            break;
        }
        start_round(&mut area);
        info!("round {}", round);

        let order = {
            let ctx = MoveContext::new(&area, &party, &rules).combat(CombatMode::TurnBased);
            ability.move_towards(&ctx, &mut grid, &mut queue, leader, target, 1, true)
        };
        let order = match order {
            Ok(order) => order,
            Err(rejection) => {
                info!("{} doesn't move: {}", area.creature(leader).name, rejection);
                break;
            }
        };

        for event in queue.run(&mut area, CombatMode::TurnBased, MAX_TICKS) {
            if let MoveEvent::Provoked { mover, attacker } = event {
                info!(
                    "{} swings at {}",
                    area.creature(attacker).name,
                    area.creature(mover).name
                );
            }
        }
        info!("move ended: {:?}", block_on(order.handle));
    }
    report(&area, &party);

    Ok(())
}

fn start_round(area: &mut Area) {
    let ids: Vec<_> = area.creatures().map(|(id, _)| id).collect();
    for id in ids {
        area.creature_mut(id).start_round();
    }
}

fn demo_area() -> Result<(Area, Party, AgentId)> {
    let mut area = area::Builder::default()
        .terrain(&MAP)
        .build()?;

    // scatter some rubble, away from where the creatures start
    let mut rng = StdRng::seed_from_u64(0xdead);
    for _ in 0..8 {
        let pos = HexPoint::new(rng.gen_range(9..14), rng.gen_range(0..9));
        if pos != DESTINATION {
            area.set_passable(pos, false);
        }
    }

    let mut party = Party::default();
    for (name, pos) in [
        ("Aldra", HexPoint::new(1, 4)),
        ("Bren", HexPoint::new(0, 3)),
        ("Cato", HexPoint::new(0, 5)),
    ] {
        let member = creature::Builder::default()
            .name(name)
            .pos(pos)
            .faction(Faction::Player)
            .player_selectable(true)
            .build()?;
        party.push(area.add_creature(member));
    }

    let orc = creature::Builder::default()
        .name("orc")
        .pos(HexPoint::new(4, 8))
        .faction(Faction::Hostile)
        .build()?;
    let orc = area.add_creature(orc);

    Ok((area, party, orc))
}

fn report(area: &Area, party: &Party) {
    for &member in party.members() {
        let creature = area.creature(member);
        info!("{} stands at {:?}", creature.name, creature.pos);
    }
}

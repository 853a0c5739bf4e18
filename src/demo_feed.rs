use rand::Rng;
use rand::seq::SliceRandom;

use crate::champions::ChampionTaxonomy;
use crate::live_feed::LiveSnapshot;
use crate::objectives::{DragonType, ObjectiveEvent};
use crate::roster::{ActivePlayer, Participant, Role, Scores, Side};

const POSITIONS: [&str; 5] = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];
const DRAGON_ALIASES: [&str; 6] = ["Fire", "Earth", "Water", "Air", "Hextech", "Chemtech"];

/// A plausible mid-game snapshot for running without a game client.
pub fn demo_snapshot(champions: &ChampionTaxonomy) -> LiveSnapshot {
    let mut rng = rand::thread_rng();
    demo_snapshot_with(&mut rng, champions)
}

pub fn demo_snapshot_with<R: Rng>(rng: &mut R, champions: &ChampionTaxonomy) -> LiveSnapshot {
    let game_time_secs = rng.gen_range(300.0..2100.0);
    let minutes = game_time_secs / 60.0;

    let mut pool: Vec<&str> = champions.champion_names().collect();
    pool.shuffle(rng);

    let mut participants = Vec::with_capacity(10);
    for side in Side::ALL {
        for (idx, position) in POSITIONS.iter().enumerate() {
            let champion = pool.pop().unwrap_or("Unknown").to_string();
            let role = Role::ALL[idx];
            let cs_rate = match role {
                Role::Jungle => 5.0,
                Role::Support => 1.2,
                _ => 7.0,
            };
            participants.push(Participant {
                name: format!("{} {}", side.label(), role.label()),
                champion,
                side: Some(side),
                position: position.to_string(),
                level: ((minutes * 0.6) as u32 + rng.gen_range(1..4)).min(18),
                scores: Scores {
                    kills: 0,
                    deaths: 0,
                    assists: rng.gen_range(0..(minutes as u32 / 3 + 1)),
                    creep_score: (minutes * cs_rate * rng.gen_range(0.75..1.1)) as u32,
                },
            });
        }
    }

    let mut events = Vec::new();
    let kill_count = rng.gen_range(2..(minutes as usize + 3));
    for _ in 0..kill_count {
        let killer = rng.gen_range(0..participants.len());
        let victim_side = participants[killer].side.map(Side::other);
        let enemies: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.side == victim_side)
            .map(|(i, _)| i)
            .collect();
        let Some(&victim) = enemies.choose(rng) else {
            continue;
        };
        participants[killer].scores.kills += 1;
        participants[victim].scores.deaths += 1;
        events.push(ObjectiveEvent::new(
            "ChampionKill",
            None,
            Some(participants[killer].name.clone()),
            None,
        ));
    }

    let dragon_count = (minutes / 5.0) as usize;
    for _ in 0..dragon_count.min(DragonType::ALL.len()) {
        let side = random_side(rng);
        let dragon = DRAGON_ALIASES[rng.gen_range(0..DRAGON_ALIASES.len())];
        events.push(ObjectiveEvent::new("DragonKill", Some(side), None, Some(dragon)));
    }
    if minutes > 14.0 {
        events.push(ObjectiveEvent::new("HeraldKill", Some(random_side(rng)), None, None));
    }
    for _ in 0..rng.gen_range(0..4) {
        events.push(ObjectiveEvent::new("HordeKill", Some(random_side(rng)), None, None));
    }
    for _ in 0..(minutes / 3.0) as usize {
        events.push(ObjectiveEvent::new("TurretKilled", Some(random_side(rng)), None, None));
    }
    if minutes > 25.0 && rng.gen_bool(0.5) {
        events.push(ObjectiveEvent::new("BaronKill", Some(random_side(rng)), None, None));
    }

    let active = &participants[0];
    let active_player = Some(ActivePlayer {
        name: active.name.clone(),
        champion: active.champion.clone(),
        level: active.level,
        scores: active.scores,
    });

    LiveSnapshot {
        participants,
        active_player,
        events,
        game_time_secs,
    }
}

fn random_side<R: Rng>(rng: &mut R) -> Side {
    if rng.gen_bool(0.5) {
        Side::Order
    } else {
        Side::Chaos
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::objectives::EventKind;
    use crate::roster::resolve_roster;

    #[test]
    fn demo_snapshot_fills_every_slot() {
        let champions = ChampionTaxonomy::from_reader(
            "name,class,subclass\nAatrox,Fighter,Juggernaut\nAhri,Mage,Burst\n".as_bytes(),
        )
        .expect("csv");
        let mut rng = StdRng::seed_from_u64(7);
        let snap = demo_snapshot_with(&mut rng, &champions);
        assert_eq!(snap.participants.len(), 10);
        assert!(snap.game_time_secs >= 300.0);
        let resolution = resolve_roster(&snap.participants, snap.active_player.as_ref(), &champions);
        assert_eq!(resolution.placed_count(), 10);
        assert!(resolution.synthesized.is_none());
        assert!(resolution.unplaced.is_empty());
    }

    #[test]
    fn demo_kills_always_land_on_the_other_team() {
        let champions = ChampionTaxonomy::from_reader(
            "name,class,subclass\nAatrox,Fighter,Juggernaut\nAhri,Mage,Burst\n".as_bytes(),
        )
        .expect("csv");
        let total = |snap: &LiveSnapshot, side: Side, deaths: bool| -> u32 {
            snap.participants
                .iter()
                .filter(|p| p.side == Some(side))
                .map(|p| if deaths { p.scores.deaths } else { p.scores.kills })
                .sum()
        };
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let snap = demo_snapshot_with(&mut rng, &champions);
            for side in Side::ALL {
                assert_eq!(
                    total(&snap, side, false),
                    total(&snap, side.other(), true),
                    "seed {seed}"
                );
            }
            let kills = snap
                .events
                .iter()
                .filter(|e| e.kind == EventKind::ChampionKill)
                .count() as u32;
            assert_eq!(kills, total(&snap, Side::Order, false) + total(&snap, Side::Chaos, false));
        }
    }
}

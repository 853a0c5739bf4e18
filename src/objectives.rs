use serde::{Deserialize, Serialize};

use crate::roster::{Participant, Side};

/// Positional dragon slots shown per team.
pub const DRAGON_SLOTS: usize = 5;
const FIRST_N: u8 = 3;
const EPIC_CAMP_MARKERS: [&str; 3] = ["dragon", "riftherald", "baron"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DragonType {
    Infernal,
    Mountain,
    Ocean,
    Cloud,
    Hextech,
    Chemtech,
    Elder,
}

impl DragonType {
    pub const ALL: [DragonType; 7] = [
        DragonType::Infernal,
        DragonType::Mountain,
        DragonType::Ocean,
        DragonType::Cloud,
        DragonType::Hextech,
        DragonType::Chemtech,
        DragonType::Elder,
    ];

    pub fn index(self) -> usize {
        match self {
            DragonType::Infernal => 0,
            DragonType::Mountain => 1,
            DragonType::Ocean => 2,
            DragonType::Cloud => 3,
            DragonType::Hextech => 4,
            DragonType::Chemtech => 5,
            DragonType::Elder => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DragonType::Infernal => "Infernal",
            DragonType::Mountain => "Mountain",
            DragonType::Ocean => "Ocean",
            DragonType::Cloud => "Cloud",
            DragonType::Hextech => "Hextech",
            DragonType::Chemtech => "Chemtech",
            DragonType::Elder => "Elder",
        }
    }

    /// Live client dragon type, including the elemental aliases (`EARTH`, `WATER`, `AIR`, `FIRE`).
    pub fn from_live(raw: &str) -> Option<DragonType> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "INFERNAL" | "FIRE" => Some(DragonType::Infernal),
            "MOUNTAIN" | "EARTH" => Some(DragonType::Mountain),
            "OCEAN" | "WATER" => Some(DragonType::Ocean),
            "CLOUD" | "AIR" => Some(DragonType::Cloud),
            "HEXTECH" => Some(DragonType::Hextech),
            "CHEMTECH" => Some(DragonType::Chemtech),
            "ELDER" => Some(DragonType::Elder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    ChampionKill,
    DragonKill,
    HeraldKill,
    BaronKill,
    TurretKill,
    VoidGrubKill,
    Other,
}

impl EventKind {
    pub fn from_name(name: &str) -> EventKind {
        let name = name.trim();
        let is = |candidate: &str| name.eq_ignore_ascii_case(candidate);
        if is("ChampionKill") {
            EventKind::ChampionKill
        } else if is("DragonKill") {
            EventKind::DragonKill
        } else if is("RiftHeraldKill") || is("HeraldKill") {
            EventKind::HeraldKill
        } else if is("BaronKill") {
            EventKind::BaronKill
        } else if is("TurretKilled") || is("TurretKill") {
            EventKind::TurretKill
        } else if is("VoidGrubKill") || is("HordeKill") {
            EventKind::VoidGrubKill
        } else {
            EventKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveEvent {
    pub name: String,
    pub kind: EventKind,
    /// Team stated on the event itself.
    pub team: Option<Side>,
    /// Killer (or acer) name, used when no team is stated.
    pub actor: Option<String>,
    pub dragon: Option<DragonType>,
    pub epic_camp: bool,
}

impl ObjectiveEvent {
    /// Classifies a raw event once, at ingestion.
    pub fn new(
        name: &str,
        team: Option<Side>,
        actor: Option<String>,
        dragon_raw: Option<&str>,
    ) -> Self {
        let kind = EventKind::from_name(name);
        let lowered = name.to_ascii_lowercase();
        let epic_camp = EPIC_CAMP_MARKERS.iter().any(|m| lowered.contains(m));
        let dragon = if kind == EventKind::DragonKill {
            dragon_raw.and_then(DragonType::from_live)
        } else {
            None
        };
        Self {
            name: name.trim().to_string(),
            kind,
            team,
            actor: actor.filter(|a| !a.trim().is_empty()),
            dragon,
            epic_camp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamObjectives {
    pub barons: u32,
    pub turrets: u32,
    pub herald: bool,
    pub void_grubs: u32,
    /// Per-type dragon counts, indexed by `DragonType::index`.
    pub dragons: [u32; 7],
    /// Champion kills counted toward the first-to-three race (never above 3).
    pub kills_toward_three: u8,
    /// Epic camps counted toward the first-to-three race (never above 3).
    pub camps_toward_three: u8,
}

impl TeamObjectives {
    pub fn dragon_count(&self, dragon: DragonType) -> u32 {
        self.dragons[dragon.index()]
    }

    pub fn total_dragons(&self) -> u32 {
        self.dragons.iter().sum()
    }

    /// Dragons expanded in canonical type order, truncated to the display slots.
    pub fn dragon_slots(&self) -> [Option<DragonType>; DRAGON_SLOTS] {
        let mut slots = [None; DRAGON_SLOTS];
        let expanded = DragonType::ALL
            .into_iter()
            .flat_map(|d| std::iter::repeat(d).take(self.dragon_count(d) as usize));
        for (slot, dragon) in slots.iter_mut().zip(expanded) {
            *slot = Some(dragon);
        }
        slots
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveState {
    pub teams: [TeamObjectives; 2],
    pub first_blood: Option<Side>,
    pub first_turret: Option<Side>,
    pub first_three_kills: Option<Side>,
    pub first_three_epic_camps: Option<Side>,
    /// Events dropped because no team could be resolved.
    pub skipped: usize,
}

impl ObjectiveState {
    pub fn team(&self, side: Side) -> &TeamObjectives {
        &self.teams[side.index()]
    }

    fn apply(&mut self, side: Side, event: &ObjectiveEvent) {
        if event.kind == EventKind::ChampionKill && self.first_blood.is_none() {
            self.first_blood = Some(side);
        }

        let team = &mut self.teams[side.index()];
        match event.kind {
            EventKind::ChampionKill => {
                bump_first_n(&mut team.kills_toward_three, &mut self.first_three_kills, side);
            }
            EventKind::DragonKill => {
                if let Some(dragon) = event.dragon {
                    team.dragons[dragon.index()] += 1;
                }
            }
            EventKind::HeraldKill => team.herald = true,
            EventKind::BaronKill => team.barons += 1,
            EventKind::TurretKill => {
                team.turrets += 1;
                if self.first_turret.is_none() {
                    self.first_turret = Some(side);
                }
            }
            EventKind::VoidGrubKill => team.void_grubs += 1,
            EventKind::Other => {}
        }

        if event.epic_camp {
            bump_first_n(
                &mut team.camps_toward_three,
                &mut self.first_three_epic_camps,
                side,
            );
        }
    }
}

fn bump_first_n(counter: &mut u8, winner: &mut Option<Side>, side: Side) {
    if *counter >= FIRST_N {
        return;
    }
    *counter += 1;
    if *counter == FIRST_N && winner.is_none() {
        *winner = Some(side);
    }
}

/// Resolves the acting team: the event's own team first, then the actor's roster side.
pub fn resolve_event_team(event: &ObjectiveEvent, roster: &[Participant]) -> Option<Side> {
    if let Some(side) = event.team {
        return Some(side);
    }
    let actor = event.actor.as_deref()?;
    roster
        .iter()
        .find(|p| p.name == actor)
        .and_then(|p| p.side)
}

/// Folds an ordered event list into both teams' objective state in a single pass.
pub fn aggregate_events(roster: &[Participant], events: &[ObjectiveEvent]) -> ObjectiveState {
    let mut state = ObjectiveState::default();
    for event in events {
        match resolve_event_team(event, roster) {
            Some(side) => state.apply(side, event),
            None => state.skipped += 1,
        }
    }
    state
}

/// Splits raw game seconds into whole minutes and the residual whole seconds.
pub fn split_game_time(game_time_secs: f64) -> (u32, u32) {
    if !game_time_secs.is_finite() || game_time_secs <= 0.0 {
        return (0, 0);
    }
    let total = game_time_secs.floor() as u64;
    let minutes = (total / 60).min(u32::MAX as u64) as u32;
    (minutes, (total % 60) as u32)
}

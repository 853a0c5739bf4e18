use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::champions::ChampionTaxonomy;

pub const SEATS_PER_SIDE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Order,
    Chaos,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Order, Side::Chaos];

    pub fn team_id(self) -> u16 {
        match self {
            Side::Order => 100,
            Side::Chaos => 200,
        }
    }

    pub fn from_team_id(id: u64) -> Option<Side> {
        match id {
            100 => Some(Side::Order),
            200 => Some(Side::Chaos),
            _ => None,
        }
    }

    /// Accepts the live client's `ORDER`/`CHAOS` labels as well as numeric team ids.
    pub fn parse(raw: &str) -> Option<Side> {
        let cleaned = raw.trim();
        if cleaned.eq_ignore_ascii_case("ORDER") {
            return Some(Side::Order);
        }
        if cleaned.eq_ignore_ascii_case("CHAOS") {
            return Some(Side::Chaos);
        }
        cleaned.parse::<u64>().ok().and_then(Side::from_team_id)
    }

    pub fn index(self) -> usize {
        match self {
            Side::Order => 0,
            Side::Chaos => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Order => Side::Chaos,
            Side::Chaos => Side::Order,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Order => "Team 1",
            Side::Chaos => "Team 2",
        }
    }

    pub fn form_key(self) -> &'static str {
        match self {
            Side::Order => "t1",
            Side::Chaos => "t2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; SEATS_PER_SIDE] =
        [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn rank(self) -> usize {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Mid => 2,
            Role::Adc => 3,
            Role::Support => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Mid => "Mid",
            Role::Adc => "ADC",
            Role::Support => "Support",
        }
    }

    /// Maps a live-client position string onto a canonical role.
    pub fn from_live(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JUNGLE" => Some(Role::Jungle),
            "MIDDLE" | "MID" => Some(Role::Mid),
            "BOTTOM" | "ADC" => Some(Role::Adc),
            "SUPPORT" | "UTILITY" => Some(Role::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub side: Side,
    pub role: Role,
}

impl Slot {
    pub fn new(side: Side, role: Role) -> Self {
        Self { side, role }
    }

    /// Absolute seat number: 1-5 for ORDER, 6-10 for CHAOS, canonical role order within a side.
    pub fn seat(self) -> usize {
        self.side.index() * SEATS_PER_SIDE + self.role.rank() + 1
    }

    pub fn from_seat(seat: usize) -> Option<Slot> {
        if !(1..=2 * SEATS_PER_SIDE).contains(&seat) {
            return None;
        }
        let idx = seat - 1;
        let side = Side::ALL[idx / SEATS_PER_SIDE];
        let role = Role::ALL[idx % SEATS_PER_SIDE];
        Some(Slot { side, role })
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        Side::ALL
            .into_iter()
            .flat_map(|side| Role::ALL.into_iter().map(move |role| Slot { side, role }))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub champion: String,
    pub side: Option<Side>,
    pub position: String,
    pub level: u32,
    pub scores: Scores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlayer {
    pub name: String,
    pub champion: String,
    pub level: u32,
    pub scores: Scores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnplacedReason {
    UnknownSide,
    NoFreeRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unplaced {
    pub participant: Participant,
    pub reason: UnplacedReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterResolution {
    pub slots: BTreeMap<Slot, Participant>,
    pub unplaced: Vec<Unplaced>,
    /// Name of the participant built from the active player block, if one was needed.
    pub synthesized: Option<String>,
}

impl RosterResolution {
    pub fn get(&self, slot: Slot) -> Option<&Participant> {
        self.slots.get(&slot)
    }

    pub fn placed_count(&self) -> usize {
        self.slots.len()
    }
}

const ACTIVE_PLAYER_FALLBACK_NAME: &str = "You";

/// Assigns participants to canonical (side, role) slots.
///
/// Stated positions win when free; otherwise the first free role in canonical order is
/// used. Participants with an unknown side, or arriving when their side is full, end up
/// in `unplaced`. Unknown champions are replaced by the catalog's first entry.
pub fn resolve_roster(
    participants: &[Participant],
    active: Option<&ActivePlayer>,
    champions: &ChampionTaxonomy,
) -> RosterResolution {
    let mut roster: Vec<Participant> = participants.to_vec();
    let mut out = RosterResolution::default();

    if let Some(active) = active {
        if let Some(synth) = synthesize_active(&roster, active) {
            out.synthesized = Some(synth.name.clone());
            roster.push(synth);
        }
    }

    roster.sort_by_key(sort_key);

    let mut taken: [HashSet<Role>; 2] = [HashSet::new(), HashSet::new()];
    for mut participant in roster {
        let Some(side) = participant.side else {
            out.unplaced.push(Unplaced {
                participant,
                reason: UnplacedReason::UnknownSide,
            });
            continue;
        };

        let used = &mut taken[side.index()];
        let stated = Role::from_live(&participant.position).filter(|role| !used.contains(role));
        let Some(role) = stated.or_else(|| Role::ALL.into_iter().find(|r| !used.contains(r)))
        else {
            out.unplaced.push(Unplaced {
                participant,
                reason: UnplacedReason::NoFreeRole,
            });
            continue;
        };
        used.insert(role);

        if !champions.contains(&participant.champion) {
            if let Some(fallback) = champions.fallback_champion() {
                participant.champion = fallback.to_string();
            }
        }
        out.slots.insert(Slot::new(side, role), participant);
    }

    out
}

fn sort_key(p: &Participant) -> (usize, usize) {
    let side_rank = p.side.map(Side::index).unwrap_or(99);
    let role_rank = Role::from_live(&p.position).map(Role::rank).unwrap_or(99);
    (side_rank, role_rank)
}

fn synthesize_active(roster: &[Participant], active: &ActivePlayer) -> Option<Participant> {
    let name = if active.name.trim().is_empty() {
        ACTIVE_PLAYER_FALLBACK_NAME.to_string()
    } else {
        active.name.clone()
    };
    if roster.iter().any(|p| p.name == name) {
        return None;
    }

    let count = |side: Side| roster.iter().filter(|p| p.side == Some(side)).count();
    // ORDER is the default guess; only switch when ORDER is visibly full.
    let side = if count(Side::Order) >= SEATS_PER_SIDE && count(Side::Chaos) < SEATS_PER_SIDE {
        Side::Chaos
    } else {
        Side::Order
    };

    Some(Participant {
        name,
        champion: active.champion.clone(),
        side: Some(side),
        position: String::new(),
        level: active.level.max(1),
        scores: active.scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_synonyms_are_case_insensitive() {
        assert_eq!(Role::from_live("utility"), Some(Role::Support));
        assert_eq!(Role::from_live("MIDDLE"), Some(Role::Mid));
        assert_eq!(Role::from_live(" Bottom "), Some(Role::Adc));
        assert_eq!(Role::from_live(""), None);
        assert_eq!(Role::from_live("NONE"), None);
    }

    #[test]
    fn seats_follow_side_then_role() {
        assert_eq!(Slot::new(Side::Order, Role::Top).seat(), 1);
        assert_eq!(Slot::new(Side::Order, Role::Support).seat(), 5);
        assert_eq!(Slot::new(Side::Chaos, Role::Top).seat(), 6);
        assert_eq!(Slot::from_seat(9), Some(Slot::new(Side::Chaos, Role::Adc)));
        assert_eq!(Slot::from_seat(0), None);
        assert_eq!(Slot::from_seat(11), None);
        assert_eq!(Slot::all().count(), 10);
    }

    #[test]
    fn side_parse_accepts_labels_and_ids() {
        assert_eq!(Side::parse("order"), Some(Side::Order));
        assert_eq!(Side::parse("CHAOS"), Some(Side::Chaos));
        assert_eq!(Side::parse("200"), Some(Side::Chaos));
        assert_eq!(Side::parse("NEUTRAL"), None);
    }
}

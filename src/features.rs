//! Flat feature row for the win classifier.
//!
//! Player columns are keyed by absolute seat (1-5 for team 100, 6-10 for team 200), never by
//! role name. Objective columns carry a `_100`/`_200` suffix. Categorical context columns are
//! expanded into indicator columns before the row is reindexed against the model's column list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::champions::ChampionTaxonomy;
use crate::objectives::{DRAGON_SLOTS, DragonType, ObjectiveState};
use crate::roster::{SEATS_PER_SIDE, Side, Slot};

pub const SEATS: usize = 2 * SEATS_PER_SIDE;
pub const PLATFORM_COLUMN: &str = "platform_id";
pub const RANK_COLUMN: &str = "rank";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Platform {
    #[default]
    NA1,
    EUW1,
    KR,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::NA1, Platform::EUW1, Platform::KR];

    pub fn label(self) -> &'static str {
        match self {
            Platform::NA1 => "NA1",
            Platform::EUW1 => "EUW1",
            Platform::KR => "KR",
        }
    }

    pub fn parse(raw: &str) -> Option<Platform> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankTier {
    Iron,
    Bronze,
    Silver,
    #[default]
    Gold,
    Platinum,
    Diamond,
    Master,
    Challenger,
}

impl RankTier {
    pub const ALL: [RankTier; 8] = [
        RankTier::Iron,
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Master,
        RankTier::Challenger,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RankTier::Iron => "Iron",
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Platinum => "Platinum",
            RankTier::Diamond => "Diamond",
            RankTier::Master => "Master",
            RankTier::Challenger => "Challenger",
        }
    }

    pub fn parse(raw: &str) -> Option<RankTier> {
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
    /// Filled by live loads, never encoded.
    pub gold: u32,
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamObjectiveRecord {
    pub dragons: [Option<DragonType>; DRAGON_SLOTS],
    pub herald: bool,
    pub void_grubs: u32,
    pub barons: u32,
    pub towers: u32,
    pub first_blood: bool,
    pub first_turret: bool,
    pub first_three_epic_camps: bool,
    pub first_three_kills: bool,
}

impl TeamObjectiveRecord {
    pub fn from_state(state: &ObjectiveState, side: Side) -> Self {
        let team = state.team(side);
        Self {
            dragons: team.dragon_slots(),
            herald: team.herald,
            void_grubs: team.void_grubs,
            barons: team.barons,
            towers: team.turrets,
            first_blood: state.first_blood == Some(side),
            first_turret: state.first_turret == Some(side),
            first_three_epic_camps: state.first_three_epic_camps == Some(side),
            first_three_kills: state.first_three_kills == Some(side),
        }
    }

    pub fn dragon_total(&self) -> u32 {
        self.dragons.iter().filter(|d| d.is_some()).count() as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderInput {
    /// Indexed by seat - 1.
    pub players: [PlayerRecord; SEATS],
    pub teams: [TeamObjectiveRecord; 2],
    pub snapshot_time_sec: u32,
    pub platform: Platform,
    pub rank: RankTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    pub fn push_number(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), FeatureValue::Number(value)));
    }

    pub fn push_category(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into(), FeatureValue::Category(value.into())));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn add(&mut self, name: &str, delta: f64) {
        if let Some((_, FeatureValue::Number(n))) = self.entries.iter_mut().find(|(k, _)| k == name)
        {
            *n += delta;
        }
    }
}

/// Builds the raw feature row. Never fails; missing data simply encodes as zeros.
pub fn encode(input: &EncoderInput, champions: &ChampionTaxonomy) -> FeatureVector {
    let mut out = FeatureVector::default();

    for (idx, player) in input.players.iter().enumerate() {
        let seat = idx + 1;
        out.push_number(format!("kills_p{seat}"), player.kills as f64);
        out.push_number(format!("deaths_p{seat}"), player.deaths as f64);
        out.push_number(format!("assists_p{seat}"), player.assists as f64);
        out.push_number(
            format!("total_minions_killed_p{seat}"),
            player.creep_score as f64,
        );
        out.push_number(format!("level_p{seat}"), player.level as f64);
    }

    let order = &input.teams[Side::Order.index()];
    let chaos = &input.teams[Side::Chaos.index()];
    let pairs: [(&str, fn(&TeamObjectiveRecord) -> f64); 9] = [
        ("dragons", |t| t.dragon_total() as f64),
        ("heralds", |t| flag(t.herald)),
        ("voidgrubs", |t| t.void_grubs as f64),
        ("barons", |t| t.barons as f64),
        ("towers", |t| t.towers as f64),
        ("first_blood", |t| flag(t.first_blood)),
        ("first_turret", |t| flag(t.first_turret)),
        ("first_three_epic_camps", |t| flag(t.first_three_epic_camps)),
        ("first_three_kills", |t| flag(t.first_three_kills)),
    ];
    for (name, value) in pairs {
        out.push_number(format!("{name}_100"), value(order));
        out.push_number(format!("{name}_200"), value(chaos));
    }

    out.push_number("snapshot_time_sec", input.snapshot_time_sec as f64);
    out.push_category(PLATFORM_COLUMN, input.platform.label());
    out.push_category(RANK_COLUMN, input.rank.label());

    push_class_features(&mut out, input, champions);
    out
}

fn push_class_features(out: &mut FeatureVector, input: &EncoderInput, champions: &ChampionTaxonomy) {
    for side in Side::ALL {
        for class in champions.classes() {
            out.push_number(format!("class_{}_{class}", side.team_id()), 0.0);
        }
    }
    for side in Side::ALL {
        for subclass in champions.subclasses() {
            out.push_number(format!("subclass_{}_{subclass}", side.team_id()), 0.0);
        }
    }

    for (idx, player) in input.players.iter().enumerate() {
        let Some(slot) = Slot::from_seat(idx + 1) else {
            continue;
        };
        let team = slot.side.team_id();
        let (class, subclass) = champions.buckets_for(&player.champion);
        out.add(&format!("class_{team}_{class}"), 1.0);
        out.add(&format!("subclass_{team}_{subclass}"), 1.0);
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn category_universe(column: &str) -> Vec<&'static str> {
    match column {
        PLATFORM_COLUMN => Platform::ALL.iter().map(|p| p.label()).collect(),
        RANK_COLUMN => RankTier::ALL.iter().map(|r| r.label()).collect(),
        _ => Vec::new(),
    }
}

/// Replaces every categorical column with `{column}_{value}` indicator columns.
pub fn expand_categoricals(features: &FeatureVector) -> Vec<(String, f64)> {
    let mut out = Vec::with_capacity(features.len() + 16);
    for (name, value) in features.iter() {
        match value {
            FeatureValue::Number(n) => out.push((name.to_string(), *n)),
            FeatureValue::Category(selected) => {
                let universe = category_universe(name);
                for known in &universe {
                    let hit = if *known == selected.as_str() { 1.0 } else { 0.0 };
                    out.push((format!("{name}_{known}"), hit));
                }
                if !universe.iter().any(|k| *k == selected.as_str()) {
                    out.push((format!("{name}_{selected}"), 1.0));
                }
            }
        }
    }
    out
}

/// Feature row aligned to the model's column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelInput {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
    /// Expected columns the encoder did not produce; they were filled with 0.
    pub zero_filled: Vec<String>,
    /// Produced columns the model does not expect.
    pub dropped: Vec<String>,
}

impl ModelInput {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx).copied())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub fn reindex(features: &[(String, f64)], columns: &[String]) -> ModelInput {
    let by_name: HashMap<&str, f64> = features.iter().map(|(n, v)| (n.as_str(), *v)).collect();

    let mut values = Vec::with_capacity(columns.len());
    let mut zero_filled = Vec::new();
    for column in columns {
        match by_name.get(column.as_str()) {
            Some(v) => values.push(*v),
            None => {
                values.push(0.0);
                zero_filled.push(column.clone());
            }
        }
    }

    let dropped = features
        .iter()
        .filter(|(n, _)| !columns.iter().any(|c| c == n))
        .map(|(n, _)| n.clone())
        .collect();

    ModelInput {
        columns: columns.to_vec(),
        values,
        zero_filled,
        dropped,
    }
}

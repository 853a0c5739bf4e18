use std::collections::VecDeque;

use crate::champions::ChampionTaxonomy;
use crate::features::{EncoderInput, Platform, PlayerRecord, RankTier, SEATS, TeamObjectiveRecord};
use crate::live_feed::LiveSnapshot;
use crate::objectives::{DRAGON_SLOTS, DragonType, ObjectiveState, aggregate_events, split_game_time};
use crate::predict::PredictionReport;
use crate::roster::{Participant, Side, Slot, UnplacedReason, resolve_roster};

const MAX_LOGS: usize = 200;
const DEFAULT_SNAPSHOT_MINUTES: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl StatusMessage {
    fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Every editable input on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Kills(Slot),
    Deaths(Slot),
    Assists(Slot),
    CreepScore(Slot),
    Champion(Slot),
    Level(Slot),
    Dragon(Side, usize),
    Barons(Side),
    Towers(Side),
    Herald(Side),
    FirstBlood(Side),
    FirstTurret(Side),
    VoidGrubs(Side),
    FirstThreeEpicCamps(Side),
    FirstThreeKills(Side),
    SnapshotMinutes,
    SnapshotSeconds,
    Rank,
    Platform,
}

impl FormField {
    /// Form order: players by side and role, then objectives by side, then metadata.
    pub fn all() -> Vec<FormField> {
        let mut out = Vec::with_capacity(128);
        for slot in Slot::all() {
            out.extend([
                FormField::Kills(slot),
                FormField::Deaths(slot),
                FormField::Assists(slot),
                FormField::CreepScore(slot),
                FormField::Champion(slot),
                FormField::Level(slot),
            ]);
        }
        for side in Side::ALL {
            out.extend((0..DRAGON_SLOTS).map(|i| FormField::Dragon(side, i)));
            out.extend([
                FormField::Barons(side),
                FormField::Towers(side),
                FormField::Herald(side),
                FormField::FirstBlood(side),
                FormField::FirstTurret(side),
                FormField::VoidGrubs(side),
                FormField::FirstThreeEpicCamps(side),
                FormField::FirstThreeKills(side),
            ]);
        }
        out.extend([
            FormField::SnapshotMinutes,
            FormField::SnapshotSeconds,
            FormField::Rank,
            FormField::Platform,
        ]);
        out
    }

    /// Stable string key for the field, e.g. `k_t1_Top` or `herald_200`.
    pub fn key(&self) -> String {
        let slot_key = |prefix: &str, slot: &Slot| {
            format!("{prefix}_{}_{}", slot.side.form_key(), slot.role.label())
        };
        match self {
            FormField::Kills(slot) => slot_key("k", slot),
            FormField::Deaths(slot) => slot_key("d", slot),
            FormField::Assists(slot) => slot_key("a", slot),
            FormField::CreepScore(slot) => slot_key("cs", slot),
            FormField::Champion(slot) => slot_key("champ", slot),
            FormField::Level(slot) => slot_key("level", slot),
            FormField::Dragon(side, idx) => format!("drag{}_{idx}", side.team_id()),
            FormField::Barons(side) => format!("b{}", side.team_id()),
            FormField::Towers(side) => format!("t{}", side.team_id()),
            FormField::Herald(side) => format!("herald_{}", side.team_id()),
            FormField::FirstBlood(side) => format!("fb{}", side.team_id()),
            FormField::FirstTurret(side) => format!("first_turret_{}", side.team_id()),
            FormField::VoidGrubs(side) => format!("voidgrubs_{}", side.team_id()),
            FormField::FirstThreeEpicCamps(side) => {
                format!("first_three_epic_camps_{}", side.team_id())
            }
            FormField::FirstThreeKills(side) => format!("first_three_kills_{}", side.team_id()),
            FormField::SnapshotMinutes => "snapshot_time_min".to_string(),
            FormField::SnapshotSeconds => "snapshot_time_sec_partial".to_string(),
            FormField::Rank => "rank".to_string(),
            FormField::Platform => "platform_id".to_string(),
        }
    }

    pub fn label(&self) -> String {
        let player = |what: &str, slot: &Slot| {
            format!("{} {} {what}", slot.side.label(), slot.role.label())
        };
        match self {
            FormField::Kills(slot) => player("Kills", slot),
            FormField::Deaths(slot) => player("Deaths", slot),
            FormField::Assists(slot) => player("Assists", slot),
            FormField::CreepScore(slot) => player("CS", slot),
            FormField::Champion(slot) => player("Champion", slot),
            FormField::Level(slot) => player("Level", slot),
            FormField::Dragon(side, idx) => format!("{} Dragon {}", side.label(), idx + 1),
            FormField::Barons(side) => format!("{} Barons", side.label()),
            FormField::Towers(side) => format!("{} Towers", side.label()),
            FormField::Herald(side) => format!("{} Rift Herald", side.label()),
            FormField::FirstBlood(side) => format!("{} First Blood", side.label()),
            FormField::FirstTurret(side) => format!("{} First Turret", side.label()),
            FormField::VoidGrubs(side) => format!("{} Void Grubs", side.label()),
            FormField::FirstThreeEpicCamps(side) => {
                format!("{} First Three Epic Camps", side.label())
            }
            FormField::FirstThreeKills(side) => format!("{} First Three Kills", side.label()),
            FormField::SnapshotMinutes => "Snapshot Minutes".to_string(),
            FormField::SnapshotSeconds => "Snapshot Seconds".to_string(),
            FormField::Rank => "Rank".to_string(),
            FormField::Platform => "Platform ID".to_string(),
        }
    }

    /// Inclusive bounds for numeric inputs.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match self {
            FormField::Kills(_) | FormField::Deaths(_) | FormField::Assists(_) => Some((0, 100)),
            FormField::CreepScore(_) => Some((0, 2000)),
            FormField::Level(_) => Some((1, 18)),
            FormField::Barons(_) => Some((0, 2)),
            FormField::Towers(_) => Some((0, 11)),
            FormField::VoidGrubs(_) => Some((0, 3)),
            FormField::SnapshotMinutes => Some((0, 120)),
            FormField::SnapshotSeconds => Some((0, 59)),
            _ => None,
        }
    }

    fn is_flag(&self) -> bool {
        matches!(
            self,
            FormField::Herald(_)
                | FormField::FirstBlood(_)
                | FormField::FirstTurret(_)
                | FormField::FirstThreeEpicCamps(_)
                | FormField::FirstThreeKills(_)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveApplySummary {
    pub placed: usize,
    pub unplaced: Vec<String>,
    pub synthesized: Option<String>,
    pub events: usize,
    pub skipped_events: usize,
}

/// The current match snapshot for one interactive session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub players: [PlayerRecord; SEATS],
    pub teams: [TeamObjectiveRecord; 2],
    pub snapshot_minutes: u32,
    pub snapshot_seconds: u32,
    pub platform: Platform,
    pub rank: RankTier,
    pub live_loaded: bool,
    pub raw_live: Option<LiveSnapshot>,
    /// Aggregated objectives from the last live load, including per-type dragon counts.
    pub live_objectives: Option<ObjectiveState>,
    pub live_message: Option<StatusMessage>,
    pub last_prediction: Option<PredictionReport>,
    pub logs: VecDeque<String>,
    default_champion: String,
    default_platform: Platform,
    default_rank: RankTier,
}

impl SessionState {
    pub fn new(champions: &ChampionTaxonomy) -> Self {
        Self::with_context(champions, Platform::default(), RankTier::default())
    }

    pub fn with_context(champions: &ChampionTaxonomy, platform: Platform, rank: RankTier) -> Self {
        let default_champion = champions.fallback_champion().unwrap_or_default().to_string();
        Self {
            players: std::array::from_fn(|_| default_player(&default_champion)),
            teams: Default::default(),
            snapshot_minutes: DEFAULT_SNAPSHOT_MINUTES,
            snapshot_seconds: 0,
            platform,
            rank,
            live_loaded: false,
            raw_live: None,
            live_objectives: None,
            live_message: None,
            last_prediction: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            default_champion,
            default_platform: platform,
            default_rank: rank,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn player(&self, slot: Slot) -> &PlayerRecord {
        &self.players[slot.seat() - 1]
    }

    pub fn player_mut(&mut self, slot: Slot) -> &mut PlayerRecord {
        &mut self.players[slot.seat() - 1]
    }

    pub fn team(&self, side: Side) -> &TeamObjectiveRecord {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamObjectiveRecord {
        &mut self.teams[side.index()]
    }

    pub fn snapshot_time_secs(&self) -> u32 {
        self.snapshot_minutes
            .saturating_mul(60)
            .saturating_add(self.snapshot_seconds)
    }

    /// Outcome of a live load: `None` means the client was unavailable, which is routine.
    pub fn load_live(
        &mut self,
        fetched: Option<LiveSnapshot>,
        champions: &ChampionTaxonomy,
    ) -> Option<LiveApplySummary> {
        let Some(snapshot) = fetched else {
            self.live_loaded = false;
            self.live_message = Some(StatusMessage::new(
                MessageLevel::Warning,
                "Live client data not available or game not running.",
            ));
            self.push_log("[WARN] Live client data not available");
            return None;
        };

        let summary = self.apply_live(snapshot, champions);
        self.live_message = Some(StatusMessage::new(
            MessageLevel::Success,
            "Live client data has been loaded and applied.",
        ));
        Some(summary)
    }

    /// Overwrites the snapshot wholesale from one live pull.
    pub fn apply_live(
        &mut self,
        snapshot: LiveSnapshot,
        champions: &ChampionTaxonomy,
    ) -> LiveApplySummary {
        self.reset_inputs();

        let resolution = resolve_roster(
            &snapshot.participants,
            snapshot.active_player.as_ref(),
            champions,
        );
        for (slot, participant) in &resolution.slots {
            let record = self.player_mut(*slot);
            record.kills = participant.scores.kills;
            record.deaths = participant.scores.deaths;
            record.assists = participant.scores.assists;
            record.creep_score = participant.scores.creep_score;
            record.gold = 0;
            record.champion = participant.champion.clone();
            record.level = participant.level;
        }

        let mut unplaced = Vec::with_capacity(resolution.unplaced.len());
        for miss in &resolution.unplaced {
            let reason = match miss.reason {
                UnplacedReason::UnknownSide => "unknown team",
                UnplacedReason::NoFreeRole => "no free role",
            };
            self.push_log(format!(
                "[WARN] Unplaced participant {} ({reason})",
                miss.participant.name
            ));
            unplaced.push(miss.participant.name.clone());
        }
        if let Some(name) = &resolution.synthesized {
            self.push_log(format!("[INFO] Added active player {name} to roster"));
        }

        let roster: Vec<Participant> = resolution
            .slots
            .values()
            .chain(resolution.unplaced.iter().map(|u| &u.participant))
            .cloned()
            .collect();
        let objectives = aggregate_events(&roster, &snapshot.events);
        for side in Side::ALL {
            self.teams[side.index()] = TeamObjectiveRecord::from_state(&objectives, side);
        }
        if objectives.skipped > 0 {
            self.push_log(format!(
                "[INFO] {} events skipped without a resolvable team",
                objectives.skipped
            ));
        }

        let (minutes, seconds) = split_game_time(snapshot.game_time_secs);
        self.snapshot_minutes = minutes;
        self.snapshot_seconds = seconds;

        let summary = LiveApplySummary {
            placed: resolution.placed_count(),
            unplaced,
            synthesized: resolution.synthesized.clone(),
            events: snapshot.events.len(),
            skipped_events: objectives.skipped,
        };
        self.push_log(format!(
            "[INFO] Live data applied: {} players placed, {} events at {minutes}:{seconds:02}",
            summary.placed, summary.events
        ));

        self.live_objectives = Some(objectives);
        self.raw_live = Some(snapshot);
        self.live_loaded = true;
        summary
    }

    pub fn clear_live(&mut self) {
        self.reset_inputs();
        self.snapshot_minutes = DEFAULT_SNAPSHOT_MINUTES;
        self.snapshot_seconds = 0;
        self.live_loaded = false;
        self.raw_live = None;
        self.live_objectives = None;
        self.last_prediction = None;
        self.live_message = Some(StatusMessage::new(
            MessageLevel::Info,
            "Live client data has been cleared.",
        ));
        self.push_log("[INFO] Live data cleared");
    }

    fn reset_inputs(&mut self) {
        let champion = self.default_champion.clone();
        for player in &mut self.players {
            *player = default_player(&champion);
        }
        self.teams = Default::default();
        self.platform = self.default_platform;
        self.rank = self.default_rank;
    }

    /// Sets a numeric field, clamped to its bounds. Returns false for non-numeric fields.
    pub fn set_number(&mut self, field: FormField, value: u32) -> bool {
        let Some((lo, hi)) = field.bounds() else {
            return false;
        };
        let value = value.clamp(lo, hi);
        match field {
            FormField::Kills(slot) => self.player_mut(slot).kills = value,
            FormField::Deaths(slot) => self.player_mut(slot).deaths = value,
            FormField::Assists(slot) => self.player_mut(slot).assists = value,
            FormField::CreepScore(slot) => self.player_mut(slot).creep_score = value,
            FormField::Level(slot) => self.player_mut(slot).level = value,
            FormField::Barons(side) => self.team_mut(side).barons = value,
            FormField::Towers(side) => self.team_mut(side).towers = value,
            FormField::VoidGrubs(side) => self.team_mut(side).void_grubs = value,
            FormField::SnapshotMinutes => self.snapshot_minutes = value,
            FormField::SnapshotSeconds => self.snapshot_seconds = value,
            _ => return false,
        }
        true
    }

    pub fn set_flag(&mut self, field: FormField, value: bool) -> bool {
        let flag = match field {
            FormField::Herald(side) => &mut self.team_mut(side).herald,
            FormField::FirstBlood(side) => &mut self.team_mut(side).first_blood,
            FormField::FirstTurret(side) => &mut self.team_mut(side).first_turret,
            FormField::FirstThreeEpicCamps(side) => {
                &mut self.team_mut(side).first_three_epic_camps
            }
            FormField::FirstThreeKills(side) => &mut self.team_mut(side).first_three_kills,
            _ => return false,
        };
        *flag = value;
        true
    }

    pub fn flag(&self, field: FormField) -> Option<bool> {
        match field {
            FormField::Herald(side) => Some(self.team(side).herald),
            FormField::FirstBlood(side) => Some(self.team(side).first_blood),
            FormField::FirstTurret(side) => Some(self.team(side).first_turret),
            FormField::FirstThreeEpicCamps(side) => Some(self.team(side).first_three_epic_camps),
            FormField::FirstThreeKills(side) => Some(self.team(side).first_three_kills),
            _ => None,
        }
    }

    pub fn number(&self, field: FormField) -> Option<u32> {
        match field {
            FormField::Kills(slot) => Some(self.player(slot).kills),
            FormField::Deaths(slot) => Some(self.player(slot).deaths),
            FormField::Assists(slot) => Some(self.player(slot).assists),
            FormField::CreepScore(slot) => Some(self.player(slot).creep_score),
            FormField::Level(slot) => Some(self.player(slot).level),
            FormField::Barons(side) => Some(self.team(side).barons),
            FormField::Towers(side) => Some(self.team(side).towers),
            FormField::VoidGrubs(side) => Some(self.team(side).void_grubs),
            FormField::SnapshotMinutes => Some(self.snapshot_minutes),
            FormField::SnapshotSeconds => Some(self.snapshot_seconds),
            _ => None,
        }
    }

    /// Champions outside the catalog are rejected so the form only holds known names.
    pub fn set_champion(&mut self, slot: Slot, name: &str, champions: &ChampionTaxonomy) -> bool {
        if !champions.contains(name) {
            return false;
        }
        self.player_mut(slot).champion = name.to_string();
        true
    }

    /// Choices for a dragon slot: `None` plus every type not already picked in an earlier slot.
    pub fn dragon_options(&self, side: Side, idx: usize) -> Vec<Option<DragonType>> {
        let dragons = &self.team(side).dragons;
        let earlier = &dragons[..idx.min(DRAGON_SLOTS)];
        // A live load may repeat a type; the slot's own value stays selectable.
        let current = dragons.get(idx).copied().flatten();
        let mut out = vec![None];
        out.extend(
            DragonType::ALL
                .into_iter()
                .filter(|d| current == Some(*d) || !earlier.contains(&Some(*d)))
                .map(Some),
        );
        out
    }

    pub fn set_dragon(&mut self, side: Side, idx: usize, dragon: Option<DragonType>) -> bool {
        if idx >= DRAGON_SLOTS || !self.dragon_options(side, idx).contains(&dragon) {
            return false;
        }
        self.team_mut(side).dragons[idx] = dragon;
        true
    }

    /// One step of a form edit: numbers move by `step`, flags toggle, choices cycle.
    pub fn adjust(&mut self, field: FormField, step: i32, champions: &ChampionTaxonomy) {
        if let Some(current) = self.number(field) {
            let next = (current as i64 + step as i64).max(0) as u32;
            self.set_number(field, next);
            return;
        }
        if let Some(current) = self.flag(field) {
            self.set_flag(field, !current);
            return;
        }
        match field {
            FormField::Champion(slot) => {
                let current = self.player(slot).champion.clone();
                if let Some(next) = champions.cycle(&current, step) {
                    self.player_mut(slot).champion = next.to_string();
                }
            }
            FormField::Dragon(side, idx) => {
                let options = self.dragon_options(side, idx);
                let current = self.team(side).dragons.get(idx).copied().flatten();
                let pos = options.iter().position(|o| *o == current).unwrap_or(0);
                let next = cycle_index(pos, options.len(), step);
                self.set_dragon(side, idx, options[next]);
            }
            FormField::Rank => {
                let pos = RankTier::ALL.iter().position(|r| *r == self.rank).unwrap_or(0);
                self.rank = RankTier::ALL[cycle_index(pos, RankTier::ALL.len(), step)];
            }
            FormField::Platform => {
                let pos = Platform::ALL
                    .iter()
                    .position(|p| *p == self.platform)
                    .unwrap_or(0);
                self.platform = Platform::ALL[cycle_index(pos, Platform::ALL.len(), step)];
            }
            _ => {}
        }
    }

    pub fn display_value(&self, field: FormField) -> String {
        if let Some(n) = self.number(field) {
            return n.to_string();
        }
        if let Some(flag) = self.flag(field) {
            return if flag { "Yes" } else { "No" }.to_string();
        }
        match field {
            FormField::Champion(slot) => self.player(slot).champion.clone(),
            FormField::Dragon(side, idx) => self
                .team(side)
                .dragons
                .get(idx)
                .copied()
                .flatten()
                .map(DragonType::label)
                .unwrap_or("None")
                .to_string(),
            FormField::Rank => self.rank.label().to_string(),
            FormField::Platform => self.platform.label().to_string(),
            _ => String::new(),
        }
    }

    /// String-keyed view of the whole snapshot, in form order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = FormField::all()
            .into_iter()
            .map(|field| (field.key(), self.display_value(field)))
            .collect();
        for slot in Slot::all() {
            out.push((
                format!("gold_{}_{}", slot.side.form_key(), slot.role.label()),
                self.player(slot).gold.to_string(),
            ));
        }
        out
    }

    /// Non-blocking contradictions between the two teams' inputs.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.team(Side::Order).herald && self.team(Side::Chaos).herald {
            out.push("Rift Herald can only be taken by one team!".to_string());
        }
        if self.team(Side::Order).first_blood && self.team(Side::Chaos).first_blood {
            out.push("First Blood can only be taken by one team!".to_string());
        }
        if self.snapshot_time_secs() == 0 {
            out.push("Please enter a snapshot time greater than 0 before predicting.".to_string());
        }
        out
    }

    pub fn encoder_input(&self) -> EncoderInput {
        EncoderInput {
            players: self.players.clone(),
            teams: self.teams.clone(),
            snapshot_time_sec: self.snapshot_time_secs(),
            platform: self.platform,
            rank: self.rank,
        }
    }

    pub fn set_message(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.live_message = Some(StatusMessage::new(level, text));
    }
}

fn default_player(champion: &str) -> PlayerRecord {
    PlayerRecord {
        champion: champion.to_string(),
        level: 1,
        ..PlayerRecord::default()
    }
}

fn cycle_index(pos: usize, len: usize, step: i32) -> usize {
    if len == 0 {
        return 0;
    }
    (pos as i64 + step as i64).rem_euclid(len as i64) as usize
}

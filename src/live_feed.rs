use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::live_client;
use crate::objectives::ObjectiveEvent;
use crate::roster::{ActivePlayer, Participant, Scores, Side};

pub const DEFAULT_LIVE_URL: &str = "https://127.0.0.1:2999/liveclientdata/allgamedata";

const NAME_KEYS: [&str; 3] = ["summonerName", "riotId", "riotIdGameName"];
const UNKNOWN_CHAMPION: &str = "Unknown";

/// One pull of the live-game telemetry, normalized into typed records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveSnapshot {
    pub participants: Vec<Participant>,
    pub active_player: Option<ActivePlayer>,
    pub events: Vec<ObjectiveEvent>,
    pub game_time_secs: f64,
}

/// Fetches the live snapshot, folding every failure into `None`.
pub fn fetch_live_snapshot(url: &str, timeout: Duration) -> Option<LiveSnapshot> {
    try_fetch_live_snapshot(url, timeout).ok()
}

pub fn try_fetch_live_snapshot(url: &str, timeout: Duration) -> Result<LiveSnapshot> {
    let client = live_client(timeout)?;
    let resp = client.get(url).send().context("live client request failed")?;
    let status = resp.status();
    if status != StatusCode::OK {
        bail!("live client returned http {status}");
    }
    let body = resp.text().context("failed reading live client body")?;
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("live client returned no data");
    }
    parse_live_json(trimmed)
}

pub fn parse_live_json(raw: &str) -> Result<LiveSnapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LiveSnapshot::default());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid live client json")?;
    if !root.is_object() {
        bail!("unexpected live client payload");
    }

    let participants = root
        .get("allPlayers")
        .and_then(|v| v.as_array())
        .map(|list| list.iter().filter_map(parse_participant).collect())
        .unwrap_or_default();
    let active_player = root.get("activePlayer").and_then(parse_active_player);
    let events = parse_events(root.get("events"));
    let game_time_secs = root
        .get("gameData")
        .and_then(|v| v.get("gameTime"))
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    Ok(LiveSnapshot {
        participants,
        active_player,
        events,
        game_time_secs,
    })
}

fn parse_participant(value: &Value) -> Option<Participant> {
    if !value.is_object() {
        return None;
    }
    Some(Participant {
        name: pick_string(value, &NAME_KEYS).unwrap_or_default(),
        champion: pick_string(value, &["championName"])
            .unwrap_or_else(|| UNKNOWN_CHAMPION.to_string()),
        side: pick_string(value, &["team"]).and_then(|t| Side::parse(&t)),
        position: pick_string(value, &["position"]).unwrap_or_default(),
        level: pick_u32(value, &["level"]).unwrap_or(1),
        scores: parse_scores(value.get("scores")),
    })
}

fn parse_active_player(value: &Value) -> Option<ActivePlayer> {
    let name = pick_string(value, &NAME_KEYS);
    let champion = pick_string(value, &["championName"]);
    // The client answers with an error object while spectating or loading.
    if name.is_none() && champion.is_none() {
        return None;
    }
    let level = pick_u32(value, &["level"])
        .or_else(|| value.get("championStats").and_then(|s| pick_u32(s, &["level"])))
        .unwrap_or(1);
    Some(ActivePlayer {
        name: name.unwrap_or_default(),
        champion: champion.unwrap_or_else(|| UNKNOWN_CHAMPION.to_string()),
        level,
        scores: parse_scores(value.get("scores")),
    })
}

fn parse_scores(value: Option<&Value>) -> Scores {
    let Some(value) = value else {
        return Scores::default();
    };
    Scores {
        kills: pick_u32(value, &["kills"]).unwrap_or(0),
        deaths: pick_u32(value, &["deaths"]).unwrap_or(0),
        assists: pick_u32(value, &["assists"]).unwrap_or(0),
        creep_score: pick_u32(value, &["creepScore", "cs"]).unwrap_or(0),
    }
}

fn parse_events(value: Option<&Value>) -> Vec<ObjectiveEvent> {
    let list = value
        .and_then(|v| v.get("Events").or_else(|| v.get("events")).or(Some(v)))
        .and_then(|v| v.as_array());
    let Some(list) = list else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(list.len());
    for entry in list {
        let Some(name) = pick_string(entry, &["EventName", "eventName"]) else {
            continue;
        };
        let team = ["killerTeam", "KillerTeam"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(parse_side_value));
        let actor = pick_string(entry, &["KillerName", "killerName"])
            .filter(|s| !s.is_empty())
            .or_else(|| pick_string(entry, &["Acer"]));
        let dragon = pick_string(entry, &["DragonType"])
            .filter(|s| !s.is_empty())
            .or_else(|| pick_string(entry, &["monsterType"]));
        out.push(ObjectiveEvent::new(&name, team, actor, dragon.as_deref()));
    }
    out
}

fn parse_side_value(value: &Value) -> Option<Side> {
    match value {
        Value::Number(n) => n.as_u64().and_then(Side::from_team_id),
        Value::String(s) => Side::parse(s),
        _ => None,
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num.min(u32::MAX as u64) as u32);
            }
            if let Some(num) = v.as_f64() {
                if num.is_finite() && num >= 0.0 {
                    return Some(num.min(u32::MAX as f64) as u32);
                }
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<u32>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

use rift_terminal::live_feed::parse_live_json;
use rift_terminal::objectives::{DragonType, EventKind};
use rift_terminal::roster::Side;

const FIXTURE: &str = include_str!("fixtures/live_allgamedata.json");

#[test]
fn parses_players_active_player_and_time() {
    let snap = parse_live_json(FIXTURE).expect("fixture parses");
    assert_eq!(snap.participants.len(), 9);
    assert!((snap.game_time_secs - 1325.2).abs() < 1e-9);

    let faker = snap
        .participants
        .iter()
        .find(|p| p.name == "Faker")
        .expect("faker present");
    assert_eq!(faker.champion, "Ahri");
    assert_eq!(faker.side, Some(Side::Order));
    assert_eq!(faker.position, "MIDDLE");
    assert_eq!(faker.level, 14);
    assert_eq!(faker.scores.kills, 4);
    assert_eq!(faker.scores.creep_score, 210);

    let active = snap.active_player.expect("active player");
    assert_eq!(active.name, "Keria");
    assert_eq!(active.champion, "Thresh");
    assert_eq!(active.level, 10);
}

#[test]
fn parses_events_in_order_with_kinds() {
    let snap = parse_live_json(FIXTURE).expect("fixture parses");
    assert_eq!(snap.events.len(), 13);
    assert_eq!(snap.events[0].kind, EventKind::Other);
    assert_eq!(snap.events[1].kind, EventKind::ChampionKill);
    assert_eq!(snap.events[1].actor.as_deref(), Some("Faker"));
    assert_eq!(snap.events[5].kind, EventKind::VoidGrubKill);
    assert_eq!(snap.events[6].dragon, Some(DragonType::Mountain));
    assert_eq!(snap.events[9].dragon, Some(DragonType::Infernal));
    assert_eq!(snap.events[10].dragon, Some(DragonType::Ocean));
    assert_eq!(snap.events[12].kind, EventKind::BaronKill);
    assert!(snap.events[12].epic_camp);
}

#[test]
fn empty_and_null_bodies_are_empty_snapshots() {
    for raw in ["", "   ", "null"] {
        let snap = parse_live_json(raw).expect("empty input is not an error");
        assert!(snap.participants.is_empty());
        assert!(snap.active_player.is_none());
        assert!(snap.events.is_empty());
        assert_eq!(snap.game_time_secs, 0.0);
    }
}

#[test]
fn malformed_payloads_are_errors() {
    assert!(parse_live_json("{not json").is_err());
    assert!(parse_live_json("[1, 2, 3]").is_err());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let raw = r#"{
        "allPlayers": [
            { "riotId": "Solo#NA1", "team": "CHAOS" },
            "not an object"
        ],
        "events": [ { "EventName": "DragonKill", "KillerTeam": 200, "monsterType": "air" },
                    { "EventTime": 12.0 } ],
        "gameData": {}
    }"#;
    let snap = parse_live_json(raw).expect("tolerant parse");
    assert_eq!(snap.participants.len(), 1);
    let solo = &snap.participants[0];
    assert_eq!(solo.name, "Solo#NA1");
    assert_eq!(solo.champion, "Unknown");
    assert_eq!(solo.level, 1);
    assert_eq!(solo.scores.kills, 0);
    assert_eq!(solo.position, "");

    assert_eq!(snap.events.len(), 1);
    assert_eq!(snap.events[0].team, Some(Side::Chaos));
    assert_eq!(snap.events[0].dragon, Some(DragonType::Cloud));
    assert_eq!(snap.game_time_secs, 0.0);
    assert!(snap.active_player.is_none());
}

#[test]
fn active_player_level_falls_back_to_champion_stats() {
    let raw = r#"{ "activePlayer": { "summonerName": "Me", "championStats": { "level": 7 } } }"#;
    let active = parse_live_json(raw)
        .expect("parse")
        .active_player
        .expect("active player");
    assert_eq!(active.level, 7);
    assert_eq!(active.champion, "Unknown");
}

use rift_terminal::champions::ChampionTaxonomy;
use rift_terminal::live_feed::parse_live_json;
use rift_terminal::roster::{
    ActivePlayer, Participant, Role, Scores, Side, Slot, UnplacedReason, resolve_roster,
};

fn champions() -> ChampionTaxonomy {
    ChampionTaxonomy::from_reader(include_str!("fixtures/champion_classes.csv").as_bytes())
        .expect("fixture csv")
}

fn player(name: &str, side: Option<Side>, position: &str, champion: &str) -> Participant {
    Participant {
        name: name.to_string(),
        champion: champion.to_string(),
        side,
        position: position.to_string(),
        level: 1,
        scores: Scores::default(),
    }
}

#[test]
fn fixture_places_everyone_and_synthesizes_active_player() {
    let snap = parse_live_json(include_str!("fixtures/live_allgamedata.json")).expect("parse");
    let out = resolve_roster(&snap.participants, snap.active_player.as_ref(), &champions());

    assert_eq!(out.placed_count(), 10);
    assert!(out.unplaced.is_empty());
    assert_eq!(out.synthesized.as_deref(), Some("Keria"));

    let keria = out.get(Slot::new(Side::Order, Role::Support)).expect("support");
    assert_eq!(keria.name, "Keria");
    assert_eq!(keria.champion, "Thresh");
    assert_eq!(keria.level, 10);

    let keria_count = out.slots.values().filter(|p| p.name == "Keria").count();
    assert_eq!(keria_count, 1);
}

#[test]
fn unknown_champion_is_replaced_by_first_catalog_entry() {
    let snap = parse_live_json(include_str!("fixtures/live_allgamedata.json")).expect("parse");
    let out = resolve_roster(&snap.participants, snap.active_player.as_ref(), &champions());
    let peyz = out.get(Slot::new(Side::Chaos, Role::Adc)).expect("chaos adc");
    assert_eq!(peyz.name, "Peyz");
    assert_eq!(peyz.champion, "Aatrox");
}

#[test]
fn active_player_already_listed_is_not_duplicated() {
    let players = vec![player("Me", Some(Side::Chaos), "MIDDLE", "Ahri")];
    let active = ActivePlayer {
        name: "Me".to_string(),
        champion: "Ahri".to_string(),
        level: 3,
        scores: Scores::default(),
    };
    let out = resolve_roster(&players, Some(&active), &champions());
    assert!(out.synthesized.is_none());
    assert_eq!(out.placed_count(), 1);
    assert!(out.get(Slot::new(Side::Chaos, Role::Mid)).is_some());
}

#[test]
fn active_player_goes_to_chaos_when_order_is_full() {
    let mut players: Vec<Participant> = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"]
        .iter()
        .enumerate()
        .map(|(i, pos)| player(&format!("o{i}"), Some(Side::Order), pos, "Vi"))
        .collect();
    players.push(player("c0", Some(Side::Chaos), "TOP", "Darius"));
    let active = ActivePlayer {
        name: String::new(),
        champion: "Jinx".to_string(),
        level: 0,
        scores: Scores::default(),
    };
    let out = resolve_roster(&players, Some(&active), &champions());
    assert_eq!(out.synthesized.as_deref(), Some("You"));
    let you = out.get(Slot::new(Side::Chaos, Role::Jungle)).expect("first free chaos role");
    assert_eq!(you.name, "You");
    assert_eq!(you.level, 1);
}

#[test]
fn taken_role_falls_through_to_next_free_role() {
    let players = vec![
        player("a", Some(Side::Order), "UTILITY", "Leona"),
        player("b", Some(Side::Order), "SUPPORT", "Thresh"),
    ];
    let out = resolve_roster(&players, None, &champions());
    assert_eq!(out.get(Slot::new(Side::Order, Role::Support)).map(|p| p.name.as_str()), Some("a"));
    assert_eq!(out.get(Slot::new(Side::Order, Role::Top)).map(|p| p.name.as_str()), Some("b"));
}

#[test]
fn sixth_member_of_a_side_is_unplaced() {
    let players: Vec<Participant> = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY", "UTILITY"]
        .iter()
        .enumerate()
        .map(|(i, pos)| player(&format!("o{i}"), Some(Side::Order), pos, "Vi"))
        .collect();
    let out = resolve_roster(&players, None, &champions());
    assert_eq!(out.placed_count(), 5);
    assert_eq!(out.unplaced.len(), 1);
    assert_eq!(out.unplaced[0].reason, UnplacedReason::NoFreeRole);
}

#[test]
fn unknown_side_is_unplaced_and_never_double_assigned() {
    let players = vec![
        player("ghost", None, "TOP", "Vi"),
        player("x", Some(Side::Chaos), "", "Vi"),
        player("y", Some(Side::Chaos), "jungle", "Vi"),
        player("z", Some(Side::Chaos), "nonsense", "Vi"),
    ];
    let out = resolve_roster(&players, None, &champions());
    assert_eq!(out.unplaced.len(), 1);
    assert_eq!(out.unplaced[0].participant.name, "ghost");
    assert_eq!(out.unplaced[0].reason, UnplacedReason::UnknownSide);

    assert_eq!(out.placed_count(), 3);
    assert_eq!(out.get(Slot::new(Side::Chaos, Role::Jungle)).map(|p| p.name.as_str()), Some("y"));
    // Unmapped roles sort last and take free roles in canonical order.
    assert_eq!(out.get(Slot::new(Side::Chaos, Role::Top)).map(|p| p.name.as_str()), Some("x"));
    assert_eq!(out.get(Slot::new(Side::Chaos, Role::Mid)).map(|p| p.name.as_str()), Some("z"));
}

#[test]
fn placement_is_deterministic_across_input_order() {
    let mut players = vec![
        player("x", Some(Side::Chaos), "", "Vi"),
        player("y", Some(Side::Chaos), "MID", "Vi"),
        player("z", Some(Side::Order), "ADC", "Vi"),
    ];
    let first = resolve_roster(&players, None, &champions());
    players.reverse();
    let second = resolve_roster(&players, None, &champions());
    assert_eq!(first.slots, second.slots);
}

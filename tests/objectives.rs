use rift_terminal::champions::ChampionTaxonomy;
use rift_terminal::live_feed::parse_live_json;
use rift_terminal::objectives::{DragonType, ObjectiveEvent, aggregate_events};
use rift_terminal::roster::{Participant, Scores, Side, resolve_roster};

fn member(name: &str, side: Side) -> Participant {
    Participant {
        name: name.to_string(),
        champion: "Vi".to_string(),
        side: Some(side),
        position: String::new(),
        level: 1,
        scores: Scores::default(),
    }
}

fn kill_by(name: &str) -> ObjectiveEvent {
    ObjectiveEvent::new("ChampionKill", None, Some(name.to_string()), None)
}

fn roster() -> Vec<Participant> {
    vec![member("A", Side::Order), member("B", Side::Chaos)]
}

#[test]
fn first_blood_is_never_overwritten() {
    let events = vec![kill_by("A"), kill_by("A"), kill_by("B")];
    let state = aggregate_events(&roster(), &events);
    assert_eq!(state.first_blood, Some(Side::Order));
}

#[test]
fn first_three_kills_counter_caps_at_three() {
    let events = vec![kill_by("A"), kill_by("A"), kill_by("A"), kill_by("A")];
    let state = aggregate_events(&roster(), &events);
    assert_eq!(state.first_three_kills, Some(Side::Order));
    assert_eq!(state.team(Side::Order).kills_toward_three, 3);
}

#[test]
fn later_team_reaching_three_does_not_replace_winner() {
    let events = vec![
        kill_by("B"),
        kill_by("A"),
        kill_by("A"),
        kill_by("A"),
        kill_by("B"),
        kill_by("B"),
    ];
    let state = aggregate_events(&roster(), &events);
    assert_eq!(state.first_blood, Some(Side::Chaos));
    assert_eq!(state.first_three_kills, Some(Side::Order));
    assert_eq!(state.team(Side::Chaos).kills_toward_three, 3);
}

#[test]
fn six_infernal_dragons_fill_five_slots_and_keep_full_count() {
    let events: Vec<ObjectiveEvent> = (0..6)
        .map(|_| ObjectiveEvent::new("DragonKill", None, Some("A".to_string()), Some("INFERNAL")))
        .collect();
    let state = aggregate_events(&roster(), &events);
    let team = state.team(Side::Order);
    assert_eq!(team.dragon_count(DragonType::Infernal), 6);
    assert_eq!(team.dragon_slots(), [Some(DragonType::Infernal); 5]);
    assert_eq!(state.first_three_epic_camps, Some(Side::Order));
}

#[test]
fn unmappable_dragon_still_counts_as_epic_camp() {
    let events: Vec<ObjectiveEvent> = (0..3)
        .map(|_| ObjectiveEvent::new("DragonKill", Some(Side::Chaos), None, Some("Shadow")))
        .collect();
    let state = aggregate_events(&roster(), &events);
    assert_eq!(state.team(Side::Chaos).total_dragons(), 0);
    assert_eq!(state.first_three_epic_camps, Some(Side::Chaos));
}

#[test]
fn herald_is_idempotent_and_counters_accumulate() {
    let events = vec![
        ObjectiveEvent::new("RiftHeraldKill", Some(Side::Order), None, None),
        ObjectiveEvent::new("HeraldKill", Some(Side::Order), None, None),
        ObjectiveEvent::new("TurretKilled", None, Some("B".to_string()), None),
        ObjectiveEvent::new("TurretKilled", None, Some("A".to_string()), None),
        ObjectiveEvent::new("VoidGrubKill", Some(Side::Chaos), None, None),
        ObjectiveEvent::new("HordeKill", Some(Side::Chaos), None, None),
        ObjectiveEvent::new("BaronKill", Some(Side::Order), None, None),
    ];
    let state = aggregate_events(&roster(), &events);
    assert!(state.team(Side::Order).herald);
    assert!(!state.team(Side::Chaos).herald);
    assert_eq!(state.first_turret, Some(Side::Chaos));
    assert_eq!(state.team(Side::Chaos).turrets, 1);
    assert_eq!(state.team(Side::Order).turrets, 1);
    assert_eq!(state.team(Side::Chaos).void_grubs, 2);
    assert_eq!(state.team(Side::Order).barons, 1);
}

#[test]
fn acer_resolves_team_when_killer_is_missing() {
    let event = ObjectiveEvent::new("BaronKill", None, None, None);
    let acer = ObjectiveEvent {
        actor: Some("B".to_string()),
        ..event
    };
    let state = aggregate_events(&roster(), &[acer]);
    assert_eq!(state.team(Side::Chaos).barons, 1);
}

#[test]
fn events_without_a_team_are_skipped() {
    let events = vec![
        ObjectiveEvent::new("GameStart", None, None, None),
        kill_by("Nobody"),
        ObjectiveEvent::new("TurretKilled", None, Some("Minion_T100".to_string()), None),
    ];
    let state = aggregate_events(&roster(), &events);
    assert_eq!(state.skipped, 3);
    assert_eq!(state.first_blood, None);
    assert_eq!(state.first_turret, None);
}

#[test]
fn herald_kills_set_herald_but_are_not_epic_camps() {
    let events: Vec<ObjectiveEvent> = (0..3)
        .map(|_| ObjectiveEvent::new("HeraldKill", Some(Side::Order), None, None))
        .collect();
    let state = aggregate_events(&roster(), &events);
    assert!(state.team(Side::Order).herald);
    assert_eq!(state.team(Side::Order).camps_toward_three, 0);
    assert_eq!(state.first_three_epic_camps, None);

    let rift: Vec<ObjectiveEvent> = (0..3)
        .map(|_| ObjectiveEvent::new("RiftHeraldKill", Some(Side::Chaos), None, None))
        .collect();
    let state = aggregate_events(&roster(), &rift);
    assert!(state.team(Side::Chaos).herald);
    assert_eq!(state.first_three_epic_camps, Some(Side::Chaos));
}

#[test]
fn fixture_aggregates_both_teams() {
    let champions =
        ChampionTaxonomy::from_reader(include_str!("fixtures/champion_classes.csv").as_bytes())
            .expect("csv");
    let snap = parse_live_json(include_str!("fixtures/live_allgamedata.json")).expect("parse");
    let resolution = resolve_roster(&snap.participants, snap.active_player.as_ref(), &champions);
    let roster: Vec<Participant> = resolution.slots.values().cloned().collect();
    let state = aggregate_events(&roster, &snap.events);

    assert_eq!(state.first_blood, Some(Side::Order));
    assert_eq!(state.first_three_kills, Some(Side::Order));
    assert_eq!(state.first_turret, Some(Side::Order));
    assert_eq!(state.first_three_epic_camps, Some(Side::Chaos));
    assert_eq!(state.skipped, 2);

    let order = state.team(Side::Order);
    assert!(order.herald);
    // Only the infernal dragon counts; the herald kill is not an epic camp.
    assert_eq!(order.camps_toward_three, 1);
    assert_eq!(order.void_grubs, 1);
    assert_eq!(order.turrets, 1);
    // The dragon credited to the synthesized active player.
    assert_eq!(order.dragon_slots()[0], Some(DragonType::Infernal));
    assert_eq!(order.total_dragons(), 1);

    let chaos = state.team(Side::Chaos);
    assert_eq!(chaos.barons, 1);
    assert_eq!(
        &chaos.dragon_slots()[..3],
        &[Some(DragonType::Mountain), Some(DragonType::Ocean), None]
    );
}

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rift_terminal::champions::ChampionTaxonomy;
use rift_terminal::classifier::parse_feature_columns;
use rift_terminal::features::{encode, expand_categoricals, reindex};
use rift_terminal::live_feed::parse_live_json;
use rift_terminal::objectives::aggregate_events;
use rift_terminal::roster::resolve_roster;
use rift_terminal::session::SessionState;

const LIVE_JSON: &str = include_str!("../tests/fixtures/live_allgamedata.json");
const CHAMPIONS_CSV: &str = include_str!("../assets/champion_classes.csv");
const COLUMNS_JSON: &str = include_str!("../assets/feature_columns.json");

fn champions() -> ChampionTaxonomy {
    ChampionTaxonomy::from_reader(CHAMPIONS_CSV.as_bytes()).unwrap()
}

fn bench_live_parse(c: &mut Criterion) {
    c.bench_function("live_parse", |b| {
        b.iter(|| {
            let snap = parse_live_json(black_box(LIVE_JSON)).unwrap();
            black_box(snap.events.len());
        })
    });
}

fn bench_roster_and_events(c: &mut Criterion) {
    let champions = champions();
    let snap = parse_live_json(LIVE_JSON).unwrap();
    c.bench_function("roster_and_events", |b| {
        b.iter(|| {
            let resolution =
                resolve_roster(black_box(&snap.participants), snap.active_player.as_ref(), &champions);
            let roster: Vec<_> = resolution.slots.into_values().collect();
            let state = aggregate_events(&roster, black_box(&snap.events));
            black_box(state.skipped);
        })
    });
}

fn bench_encode_and_reindex(c: &mut Criterion) {
    let champions = champions();
    let columns = parse_feature_columns(COLUMNS_JSON).unwrap();
    let mut session = SessionState::new(&champions);
    session.apply_live(parse_live_json(LIVE_JSON).unwrap(), &champions);
    let input = session.encoder_input();
    c.bench_function("encode_and_reindex", |b| {
        b.iter(|| {
            let features = encode(black_box(&input), &champions);
            let aligned = reindex(&expand_categoricals(&features), &columns);
            black_box(aligned.values.len());
        })
    });
}

fn bench_full_live_apply(c: &mut Criterion) {
    let champions = champions();
    c.bench_function("full_live_apply", |b| {
        b.iter(|| {
            let mut session = SessionState::new(&champions);
            let snap = parse_live_json(black_box(LIVE_JSON)).unwrap();
            let summary = session.apply_live(snap, &champions);
            black_box(summary.placed);
        })
    });
}

criterion_group!(
    perf,
    bench_live_parse,
    bench_roster_and_events,
    bench_encode_and_reindex,
    bench_full_live_apply
);
criterion_main!(perf);

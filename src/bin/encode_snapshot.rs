use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use serde::Serialize;

use rift_terminal::champions::ChampionTaxonomy;
use rift_terminal::classifier::{WinClassifier, load_feature_columns, load_model_bundle};
use rift_terminal::config::AppConfig;
use rift_terminal::features::{FeatureVector, encode, expand_categoricals, reindex};
use rift_terminal::live_feed::{fetch_live_snapshot, parse_live_json};
use rift_terminal::session::SessionState;

#[derive(Debug, Serialize)]
struct EncodedSnapshot {
    snapshot_time_sec: u32,
    placed: usize,
    unplaced: Vec<String>,
    features: FeatureVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    aligned: Option<Vec<(String, f64)>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    zero_filled: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proba: Option<[f64; 2]>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    let champions = ChampionTaxonomy::from_csv_path(&config.champion_classes_path)?;

    // Without a path, read straight from the running game client.
    let snapshot = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_live_json(&raw)?
        }
        None => fetch_live_snapshot(&config.live_url, config.live_timeout)
            .ok_or_else(|| anyhow!("live client data not available or game not running"))?,
    };

    let mut session =
        SessionState::with_context(&champions, config.default_platform, config.default_rank);
    let summary = session.apply_live(snapshot, &champions);
    for line in &session.logs {
        eprintln!("{line}");
    }

    let features = encode(&session.encoder_input(), &champions);
    let mut out = EncodedSnapshot {
        snapshot_time_sec: session.snapshot_time_secs(),
        placed: summary.placed,
        unplaced: summary.unplaced,
        features,
        aligned: None,
        zero_filled: Vec::new(),
        proba: None,
    };

    let columns_path = std::env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.feature_columns_path.clone());
    if columns_path.exists() {
        let columns = load_feature_columns(&columns_path)?;
        let input = reindex(&expand_categoricals(&out.features), &columns);
        if let Ok((model, _)) = load_model_bundle(&config.model_path, &columns_path) {
            out.proba = Some(model.predict(&input).proba);
        }
        out.aligned = Some(input.columns.iter().cloned().zip(input.values.iter().copied()).collect());
        out.zero_filled = input.zero_filled;
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

use serde::Serialize;
use thiserror::Error;

use crate::champions::ChampionTaxonomy;
use crate::classifier::{Prediction, WinClassifier};
use crate::features::{ModelInput, encode, expand_categoricals, reindex};
use crate::session::{MessageLevel, SessionState};

/// How to treat expected model columns the encoder did not produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("Please enter a snapshot time greater than 0 before predicting.")]
    ZeroSnapshotTime,
    #[error("Model expects {} columns the snapshot does not produce: {}", .0.len(), .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("No trained model is loaded; prediction is unavailable.")]
    ModelUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub prediction: Prediction,
    pub snapshot_time_sec: u32,
    pub zero_filled: Vec<String>,
    pub dropped: Vec<String>,
    pub warnings: Vec<String>,
}

impl PredictionReport {
    pub fn outcome(&self) -> String {
        format!("{} wins", self.prediction.winner.label())
    }
}

/// Encodes the session snapshot and aligns it to the model's column list.
pub fn build_model_input(
    session: &SessionState,
    champions: &ChampionTaxonomy,
    columns: &[String],
) -> ModelInput {
    let features = encode(&session.encoder_input(), champions);
    reindex(&expand_categoricals(&features), columns)
}

pub fn run_prediction(
    session: &mut SessionState,
    champions: &ChampionTaxonomy,
    classifier: Option<&dyn WinClassifier>,
    columns: &[String],
    policy: SchemaPolicy,
) -> Result<PredictionReport, PredictError> {
    let result = predict_inner(session, champions, classifier, columns, policy);
    match &result {
        Ok(report) => {
            session.push_log(format!(
                "[INFO] Prediction at {}s: {} ({:.1}% / {:.1}%)",
                report.snapshot_time_sec,
                report.outcome(),
                report.prediction.proba[0] * 100.0,
                report.prediction.proba[1] * 100.0
            ));
            session.last_prediction = Some(report.clone());
        }
        Err(err) => {
            session.push_log(format!("[ERROR] Predict rejected: {err}"));
            session.set_message(MessageLevel::Error, err.to_string());
        }
    }
    result
}

fn predict_inner(
    session: &mut SessionState,
    champions: &ChampionTaxonomy,
    classifier: Option<&dyn WinClassifier>,
    columns: &[String],
    policy: SchemaPolicy,
) -> Result<PredictionReport, PredictError> {
    let snapshot_time_sec = session.snapshot_time_secs();
    if snapshot_time_sec == 0 {
        return Err(PredictError::ZeroSnapshotTime);
    }
    let classifier = classifier.ok_or(PredictError::ModelUnavailable)?;

    let warnings = session.consistency_warnings();
    for warning in &warnings {
        session.push_log(format!("[WARN] {warning}"));
    }

    let input = build_model_input(session, champions, columns);
    if !input.zero_filled.is_empty() {
        if policy == SchemaPolicy::Strict {
            return Err(PredictError::MissingColumns(input.zero_filled));
        }
        session.push_log(format!(
            "[WARN] {} model columns zero-filled: {}",
            input.zero_filled.len(),
            input.zero_filled.join(", ")
        ));
    }

    let prediction = classifier.predict(&input);
    Ok(PredictionReport {
        prediction,
        snapshot_time_sec,
        zero_filled: input.zero_filled,
        dropped: input.dropped,
        warnings,
    })
}

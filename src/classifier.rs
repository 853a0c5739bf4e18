use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::features::ModelInput;
use crate::roster::Side;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub winner: Side,
    /// `[p_team_100, p_team_200]`.
    pub proba: [f64; 2],
}

impl Prediction {
    pub fn from_team_two_probability(p_chaos: f64) -> Self {
        let p_chaos = if p_chaos.is_finite() {
            p_chaos.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let proba = [1.0 - p_chaos, p_chaos];
        let winner = if proba[1] > proba[0] {
            Side::Chaos
        } else {
            Side::Order
        };
        Self { winner, proba }
    }

    pub fn probability(&self, side: Side) -> f64 {
        self.proba[side.index()]
    }
}

/// Anything that can score an aligned feature row.
pub trait WinClassifier {
    fn predict(&self, input: &ModelInput) -> Prediction;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default = "default_classes")]
    pub classes: [u16; 2],
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

fn default_classes() -> [u16; 2] {
    [Side::Order.team_id(), Side::Chaos.team_id()]
}

/// Logistic model exported as plain coefficients.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    artifact: LinearArtifact,
    second: Side,
}

impl LinearClassifier {
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self> {
        let first = Side::from_team_id(artifact.classes[0] as u64);
        let second = Side::from_team_id(artifact.classes[1] as u64);
        let (Some(first), Some(second)) = (first, second) else {
            bail!("unsupported model classes {:?}", artifact.classes);
        };
        if first == second {
            bail!("model classes must differ, got {:?}", artifact.classes);
        }
        if !artifact.feature_names.is_empty()
            && artifact.feature_names.len() != artifact.coefficients.len()
        {
            bail!(
                "model lists {} feature names but {} coefficients",
                artifact.feature_names.len(),
                artifact.coefficients.len()
            );
        }
        Ok(Self { artifact, second })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: LinearArtifact =
            serde_json::from_str(raw.trim()).context("invalid model json")?;
        Self::from_artifact(artifact)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model: {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to load model: {}", path.display()))
    }

    /// Fails when the coefficient count does not line up with the column list.
    pub fn check_columns(&self, columns: &[String]) -> Result<()> {
        if self.artifact.coefficients.len() != columns.len() {
            bail!(
                "model has {} coefficients but the column list has {} entries",
                self.artifact.coefficients.len(),
                columns.len()
            );
        }
        if !self.artifact.feature_names.is_empty() && self.artifact.feature_names != columns {
            bail!("model feature names do not match the column list");
        }
        Ok(())
    }

    pub fn coefficient_count(&self) -> usize {
        self.artifact.coefficients.len()
    }

    pub fn decision(&self, input: &ModelInput) -> f64 {
        self.artifact
            .coefficients
            .iter()
            .zip(&input.values)
            .fold(self.artifact.intercept, |acc, (c, x)| acc + c * x)
    }
}

impl WinClassifier for LinearClassifier {
    fn predict(&self, input: &ModelInput) -> Prediction {
        // The logistic output is the probability of the artifact's second class.
        let p = logistic(self.decision(input));
        let p_chaos = if self.second == Side::Chaos { p } else { 1.0 - p };
        Prediction::from_team_two_probability(p_chaos)
    }
}

fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub fn parse_feature_columns(raw: &str) -> Result<Vec<String>> {
    let columns: Vec<String> =
        serde_json::from_str(raw.trim()).context("invalid feature column list")?;
    if columns.is_empty() {
        bail!("feature column list is empty");
    }
    Ok(columns)
}

pub fn load_feature_columns(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read feature columns: {}", path.display()))?;
    parse_feature_columns(&raw)
        .with_context(|| format!("failed to load feature columns: {}", path.display()))
}

/// Model plus the column list it was trained against, checked for agreement.
pub fn load_model_bundle(model: &Path, columns: &Path) -> Result<(LinearClassifier, Vec<String>)> {
    let columns = load_feature_columns(columns)?;
    let model = LinearClassifier::load(model)?;
    model.check_columns(&columns)?;
    Ok((model, columns))
}

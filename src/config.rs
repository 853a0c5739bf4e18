use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::{Platform, RankTier};
use crate::live_feed::DEFAULT_LIVE_URL;
use crate::predict::SchemaPolicy;

const DEFAULT_TIMEOUT_MS: u64 = 1000;
const DEFAULT_CHAMPION_CLASSES: &str = "assets/champion_classes.csv";
const DEFAULT_MODEL: &str = "assets/model.json";
const DEFAULT_FEATURE_COLUMNS: &str = "assets/feature_columns.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSource {
    Client,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub live_url: String,
    pub live_timeout: Duration,
    pub live_source: LiveSource,
    pub champion_classes_path: PathBuf,
    pub model_path: PathBuf,
    pub feature_columns_path: PathBuf,
    pub schema_policy: SchemaPolicy,
    pub default_platform: Platform,
    pub default_rank: RankTier,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let opt = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let live_url = opt("LIVE_CLIENT_URL").unwrap_or_else(|| DEFAULT_LIVE_URL.to_string());
        let timeout_ms = opt("LIVE_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .clamp(100, 10_000);
        let live_source = match opt("LIVE_SOURCE").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("demo") | Some("fake") => LiveSource::Demo,
            _ => LiveSource::Client,
        };
        let schema_policy = if parse_bool(opt("STRICT_SCHEMA"), false) {
            SchemaPolicy::Strict
        } else {
            SchemaPolicy::Permissive
        };

        Self {
            live_url,
            live_timeout: Duration::from_millis(timeout_ms),
            live_source,
            champion_classes_path: opt("CHAMPION_CLASSES_PATH")
                .unwrap_or_else(|| DEFAULT_CHAMPION_CLASSES.to_string())
                .into(),
            model_path: opt("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string())
                .into(),
            feature_columns_path: opt("FEATURE_COLUMNS_PATH")
                .unwrap_or_else(|| DEFAULT_FEATURE_COLUMNS.to_string())
                .into(),
            schema_policy,
            default_platform: opt("DEFAULT_PLATFORM")
                .and_then(|v| Platform::parse(&v))
                .unwrap_or_default(),
            default_rank: opt("DEFAULT_RANK")
                .and_then(|v| RankTier::parse(&v))
                .unwrap_or_default(),
        }
    }
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    raw.map(|v| {
        let t = v.to_ascii_lowercase();
        !(t == "0" || t == "false" || t == "off" || t == "no")
    })
    .unwrap_or(default)
}

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Bucket used for champions the taxonomy does not know.
pub const NONE_BUCKET: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionClass {
    pub name: String,
    pub class: String,
    pub subclass: String,
}

#[derive(Debug, Deserialize)]
struct ChampionRow {
    name: String,
    class: String,
    #[serde(default)]
    subclass: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChampionTaxonomy {
    entries: Vec<ChampionClass>,
    by_name: HashMap<String, usize>,
    classes: Vec<String>,
    subclasses: Vec<String>,
}

impl ChampionTaxonomy {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open champion classes: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to parse champion classes: {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (idx, row) in csv.deserialize::<ChampionRow>().enumerate() {
            let row = row.with_context(|| format!("invalid champion row {}", idx + 1))?;
            if row.name.is_empty() {
                continue;
            }
            let subclass = row
                .subclass
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| row.class.clone());
            entries.push(ChampionClass {
                name: row.name,
                class: row.class,
                subclass,
            });
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<ChampionClass>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut classes: Vec<String> = Vec::new();
        let mut subclasses: Vec<String> = Vec::new();
        for (idx, entry) in entries.iter().enumerate() {
            // Later rows override earlier ones for the same name.
            by_name.insert(entry.name.clone(), idx);
            if !classes.contains(&entry.class) {
                classes.push(entry.class.clone());
            }
            if !subclasses.contains(&entry.subclass) {
                subclasses.push(entry.subclass.clone());
            }
        }
        for universe in [&mut classes, &mut subclasses] {
            if !universe.iter().any(|c| c == NONE_BUCKET) {
                universe.push(NONE_BUCKET.to_string());
            }
        }
        Self {
            entries,
            by_name,
            classes,
            subclasses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, name: &str) -> Option<&ChampionClass> {
        self.by_name.get(name).and_then(|idx| self.entries.get(*idx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// First catalog entry; used in place of champions the catalog does not list.
    pub fn fallback_champion(&self) -> Option<&str> {
        self.entries.first().map(|e| e.name.as_str())
    }

    pub fn champion_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Distinct classes in first-seen order, always ending with the `None` bucket.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn subclasses(&self) -> &[String] {
        &self.subclasses
    }

    /// (class, subclass) for a champion, or the `None` bucket for both.
    pub fn buckets_for(&self, name: &str) -> (&str, &str) {
        match self.lookup(name) {
            Some(entry) => (entry.class.as_str(), entry.subclass.as_str()),
            None => (NONE_BUCKET, NONE_BUCKET),
        }
    }

    /// Steps through the catalog, wrapping at both ends. Unknown names start from the top.
    pub fn cycle(&self, current: &str, step: i32) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len() as i64;
        let pos = self
            .entries
            .iter()
            .position(|e| e.name == current)
            .map(|p| p as i64)
            .unwrap_or(0);
        let next = (pos + step as i64).rem_euclid(len) as usize;
        Some(self.entries[next].name.as_str())
    }
}

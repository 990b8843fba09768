use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::domain::{ensure_unique_ids, Anchors, Criterion};
use super::error::ScenarioError;

const EMBEDDED_CATALOG: &str = include_str!("../../assets/default_criteria.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read criteria catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid criteria catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid criteria descriptions CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("criteria catalog violates invariants: {0}")]
    Invalid(#[from] ScenarioError),
}

#[derive(Deserialize)]
struct CatalogDocument {
    criteria: Vec<Criterion>,
}

/// Read-only seed list of criteria used when a scenario is created without a
/// custom set. Loaded once and handed to [`super::ScenarioSetup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaCatalog {
    criteria: Vec<Criterion>,
}

impl CriteriaCatalog {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, CatalogError> {
        ensure_unique_ids("criterion", criteria.iter().map(|c| c.id.as_str()))?;
        Ok(Self { criteria })
    }

    /// Catalog bundled with the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(document.criteria)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        debug!(path = %path.display(), criteria = catalog.criteria.len(), "criteria catalog loaded");
        Ok(catalog)
    }

    /// Replace short anchors with the full descriptions from a CSV export.
    ///
    /// The first row is a header. Each following non-empty row (name, anchor
    /// text) maps by position onto the catalog criteria. Anchor text carries a
    /// `5 – …` line for the high anchor and a `1 – …` line for the low one; rows
    /// missing either keep the catalog anchors.
    pub fn with_descriptions_csv<R: Read>(mut self, reader: R) -> Result<Self, CatalogError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut position = 0;
        for record in rows.records() {
            let record = record?;
            let (Some(name), Some(text)) = (record.get(0), record.get(1)) else {
                continue;
            };
            if name.trim().is_empty() || text.trim().is_empty() {
                continue;
            }

            let Some(criterion) = self.criteria.get_mut(position) else {
                break;
            };
            position += 1;

            if let Some(anchors) = parse_anchor_text(text) {
                criterion.anchors = anchors;
            }
        }

        Ok(self)
    }

    pub fn with_descriptions_file(self, path: &Path) -> Result<Self, CatalogError> {
        let file = fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.with_descriptions_csv(file)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

fn parse_anchor_text(text: &str) -> Option<Anchors> {
    let mut hi = None;
    let mut lo = None;
    for line in text.lines().map(str::trim) {
        if let Some(rest) = anchor_line(line, '5') {
            hi = Some(rest);
        } else if let Some(rest) = anchor_line(line, '1') {
            lo = Some(rest);
        }
    }

    match (hi, lo) {
        (Some(hi), Some(lo)) if !hi.is_empty() && !lo.is_empty() => Some(Anchors {
            hi: hi.to_owned(),
            lo: lo.to_owned(),
        }),
        _ => None,
    }
}

fn anchor_line(line: &str, level: char) -> Option<&str> {
    let rest = line.strip_prefix(level)?.trim_start();
    let rest = rest
        .strip_prefix('–')
        .or_else(|| rest.strip_prefix("--"))?;
    Some(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses_with_unique_ids() {
        let catalog = CriteriaCatalog::embedded().expect("embedded catalog parses");
        assert!(!catalog.criteria().is_empty());
        assert!(catalog.criteria().iter().all(|criterion| criterion.active));
    }

    #[test]
    fn rejects_duplicate_criterion_ids() {
        let raw = r#"{"criteria": [
            {"id": "a", "name": "A", "weight": 1, "anchors": {"hi": "h", "lo": "l"}},
            {"id": "a", "name": "A again", "weight": 2, "anchors": {"hi": "h", "lo": "l"}}
        ]}"#;

        match CriteriaCatalog::from_json(raw) {
            Err(CatalogError::Invalid(ScenarioError::Validation(message))) => {
                assert!(message.contains("duplicate criterion id 'a'"));
            }
            other => panic!("expected duplicate id failure, got {other:?}"),
        }
    }

    #[test]
    fn descriptions_csv_overrides_anchors_by_position() {
        let raw = r#"{"criteria": [
            {"id": "first", "name": "First", "weight": 1, "anchors": {"hi": "h1", "lo": "l1"}},
            {"id": "second", "name": "Second", "weight": 1, "anchors": {"hi": "h2", "lo": "l2"}},
            {"id": "third", "name": "Third", "weight": 1, "anchors": {"hi": "h3", "lo": "l3"}}
        ]}"#;
        let csv = "Criterion,Anchors\n\
            ,\n\
            First,\"5 – Full high text\n1 – Full low text\"\n\
            Second,\"5 -- Dashed high\n1 -- Dashed low\"\n\
            Third,\"only a note\"\n";

        let catalog = CriteriaCatalog::from_json(raw)
            .expect("catalog parses")
            .with_descriptions_csv(csv.as_bytes())
            .expect("csv applies");

        let criteria = catalog.criteria();
        assert_eq!(criteria[0].anchors.hi, "Full high text");
        assert_eq!(criteria[0].anchors.lo, "Full low text");
        assert_eq!(criteria[1].anchors.hi, "Dashed high");
        assert_eq!(criteria[1].anchors.lo, "Dashed low");
        assert_eq!(criteria[2].anchors.hi, "h3", "row without anchors keeps catalog text");
    }
}

//! Region to capital-name lookup used by the matching mini-game.

use std::collections::BTreeMap;

use pinpin_core::RegionId;
use thiserror::Error;

/// Reasons a label table may fail to load.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The document is not a JSON object of strings.
    #[error("label table is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    /// A key could not be read as a region identifier.
    #[error("label key `{0}` is not a numeric region identifier")]
    InvalidKey(String),
}

/// Pairs region identifiers with the label shown on falling label objects.
///
/// Absence of an entry is a configuration gap, not an error; callers skip the
/// region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: BTreeMap<RegionId, String>,
}

impl LabelTable {
    /// Builds a table from identifier/label pairs. Later pairs win.
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (RegionId, S)>,
        S: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(id, label)| (id, label.into()))
                .collect(),
        }
    }

    /// Parses a JSON object keyed by region identifier, e.g. `{"110000": "Beijing"}`.
    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut labels = BTreeMap::new();
        for (key, label) in raw {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| LabelError::InvalidKey(key.clone()))?;
            let _ = labels.insert(RegionId::new(id), label);
        }
        Ok(Self { labels })
    }

    /// Label paired with the region, if any.
    #[must_use]
    pub fn label_for(&self, region: RegionId) -> Option<&str> {
        self.labels.get(&region).map(String::as_str)
    }

    /// Number of labelled regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Reports whether no region is labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

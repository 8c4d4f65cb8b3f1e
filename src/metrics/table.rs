use super::{hidden_gem_score, DecadeBucket};
use crate::dataset::{AnimeRecord, Dataset};
use crate::dataset::parse::MAX_SCORE;
use serde::Serialize;
use tracing::debug;

/// A record together with its computed columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: AnimeRecord,
    pub decade: DecadeBucket,
    pub hidden_gem_score: f64,
    /// Rating rescaled to 0–1.
    pub normalized_score: Option<f64>,
}

impl DerivedRecord {
    pub fn from_record(record: &AnimeRecord) -> Self {
        DerivedRecord {
            record: record.clone(),
            decade: DecadeBucket::from_year(record.year),
            hidden_gem_score: hidden_gem_score(record.score, record.members),
            normalized_score: record.score.map(|s| s / MAX_SCORE),
        }
    }
}

/// One derived row per loaded record, in file order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DerivedTable {
    pub rows: Vec<DerivedRecord>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedRecord> {
        self.rows.iter()
    }
}

impl FromIterator<DerivedRecord> for DerivedTable {
    fn from_iter<I: IntoIterator<Item = DerivedRecord>>(iter: I) -> Self {
        DerivedTable {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Computes the derived table. Pure: the same dataset always yields an
/// identical table.
pub fn derive(dataset: &Dataset) -> DerivedTable {
    let table: DerivedTable = dataset.iter().map(DerivedRecord::from_record).collect();
    debug!("Derived metrics for {} titles", table.len());
    table
}

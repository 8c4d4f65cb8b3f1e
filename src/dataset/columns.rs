use super::DatasetError;
use csv::StringRecord;
use serde::Deserialize;

/// Names of the dataset columns. Defaults match the public anime dataset
/// export (`start_date` holds the release date, `type` the media type).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub title: String,
    pub year: String,
    pub genres: String,
    pub score: String,
    pub members: String,
    pub studios: String,
    pub kind: String,
    pub episodes: String,
    pub status: String,
    pub favorites: String,
    pub recommendation_count: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            title: "title".to_string(),
            year: "start_date".to_string(),
            genres: "genres".to_string(),
            score: "score".to_string(),
            members: "members".to_string(),
            studios: "studios".to_string(),
            kind: "type".to_string(),
            episodes: "episodes".to_string(),
            status: "status".to_string(),
            favorites: "favorites".to_string(),
            recommendation_count: "recommendation_count".to_string(),
        }
    }
}

/// Positions of the mapped columns inside a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnIndices {
    pub title: usize,
    pub year: usize,
    pub genres: usize,
    pub score: usize,
    pub members: usize,
    pub studios: Option<usize>,
    pub kind: Option<usize>,
    pub episodes: Option<usize>,
    pub status: Option<usize>,
    pub favorites: Option<usize>,
    pub recommendation_count: Option<usize>,
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_column(headers: &StringRecord, name: &str) -> Result<usize, DatasetError> {
    find_column(headers, name).ok_or_else(|| DatasetError::MissingColumn {
        column: name.to_string(),
    })
}

impl ColumnMapping {
    pub(super) fn resolve(&self, headers: &StringRecord) -> Result<ColumnIndices, DatasetError> {
        Ok(ColumnIndices {
            title: require_column(headers, &self.title)?,
            year: require_column(headers, &self.year)?,
            genres: require_column(headers, &self.genres)?,
            score: require_column(headers, &self.score)?,
            members: require_column(headers, &self.members)?,
            studios: find_column(headers, &self.studios),
            kind: find_column(headers, &self.kind),
            episodes: find_column(headers, &self.episodes),
            status: find_column(headers, &self.status),
            favorites: find_column(headers, &self.favorites),
            recommendation_count: find_column(headers, &self.recommendation_count),
        })
    }
}

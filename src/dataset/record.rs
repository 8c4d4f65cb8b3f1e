use serde::Serialize;
use std::path::PathBuf;

/// One title of the dataset, with its cells already coerced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimeRecord {
    /// Position of the row in the source file, 0-based.
    pub id: usize,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub score: Option<f64>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
    pub recommendation_count: Option<u64>,
    pub episodes: Option<u32>,
    /// Media type (TV, Movie, OVA, ...).
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl AnimeRecord {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }
}

/// The loaded dataset. `records` keeps the file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub source: Option<PathBuf>,
    pub records: Vec<AnimeRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimeRecord> {
        self.records.iter()
    }
}

//! Genre trends page.
//!
//! Multi-genre titles are exploded: a title tagged {A, B} adds one to A and
//! one to B for its decade. Titles without any genre are counted under
//! [`UNLISTED_GENRE`], so the counts of a decade always add up to at least
//! the number of titles released in it.

use super::stats::{mean, top_labels, LabelCount, LabelMean};
use super::TrendsSettings;
use crate::metrics::{DecadeBucket, DerivedTable};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const UNLISTED_GENRE: &str = "(unlisted)";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenreDecadeCell {
    pub decade: DecadeBucket,
    pub genre: String,
    pub count: usize,
    pub mean_score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenreTrendsView {
    /// Every (decade, genre) pair present in the table.
    pub cells: Vec<GenreDecadeCell>,
    pub top_genres: Vec<String>,
    /// Dense grid of known decades × top genres, zero counts included.
    pub series: Vec<GenreDecadeCell>,
    pub kind_distribution: Vec<LabelCount>,
    pub mean_score_by_kind: Vec<LabelMean>,
}

fn mean_score_by_kind(table: &DerivedTable, limit: usize) -> Vec<LabelMean> {
    let mut scores: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in table.iter() {
        if let (Some(kind), Some(score)) = (row.record.kind.as_deref(), row.record.score) {
            scores.entry(kind).or_default().push(score);
        }
    }
    let mut list: Vec<LabelMean> = scores
        .into_iter()
        .filter_map(|(kind, values)| {
            Some(LabelMean {
                label: kind.to_string(),
                mean: mean(&values)?,
                count: values.len(),
            })
        })
        .collect();
    list.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.label.cmp(&b.label)));
    list.truncate(limit);
    list
}

pub fn build_genre_trends(table: &DerivedTable, settings: &TrendsSettings) -> GenreTrendsView {
    let mut grouped: BTreeMap<(DecadeBucket, &str), Vec<Option<f64>>> = BTreeMap::new();
    for row in table.iter() {
        if row.record.genres.is_empty() {
            grouped
                .entry((row.decade, UNLISTED_GENRE))
                .or_default()
                .push(row.record.score);
        }
        for genre in &row.record.genres {
            grouped
                .entry((row.decade, genre.as_str()))
                .or_default()
                .push(row.record.score);
        }
    }

    let cells: Vec<GenreDecadeCell> = grouped
        .iter()
        .map(|((decade, genre), scores)| {
            let present: Vec<f64> = scores.iter().flatten().copied().collect();
            GenreDecadeCell {
                decade: *decade,
                genre: genre.to_string(),
                count: scores.len(),
                mean_score: mean(&present),
            }
        })
        .collect();

    let top_genres: Vec<String> = top_labels(
        table
            .iter()
            .flat_map(|r| r.record.genres.iter().map(String::as_str)),
        settings.top_genres,
    )
    .into_iter()
    .map(|top| top.label)
    .collect();

    let known_decades: BTreeSet<DecadeBucket> = table
        .iter()
        .map(|r| r.decade)
        .filter(|d| *d != DecadeBucket::Unknown)
        .collect();
    let mut series = Vec::with_capacity(known_decades.len() * top_genres.len());
    for decade in &known_decades {
        for genre in &top_genres {
            let cell = cells
                .iter()
                .find(|c| c.decade == *decade && &c.genre == genre);
            series.push(GenreDecadeCell {
                decade: *decade,
                genre: genre.clone(),
                count: cell.map_or(0, |c| c.count),
                mean_score: cell.and_then(|c| c.mean_score),
            });
        }
    }

    GenreTrendsView {
        cells,
        top_genres,
        series,
        kind_distribution: top_labels(
            table.iter().filter_map(|r| r.record.kind.as_deref()),
            settings.top_kinds,
        ),
        mean_score_by_kind: mean_score_by_kind(table, settings.top_kinds),
    }
}

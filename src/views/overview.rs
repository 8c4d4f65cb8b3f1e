//! Overview page: headline numbers and distributions.

use super::stats::{mean, median, top_labels, LabelCount};
use super::OverviewSettings;
use crate::dataset::parse::{MAX_SCORE, MIN_SCORE};
use crate::metrics::{DecadeBucket, DerivedTable};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecadeCount {
    pub decade: DecadeBucket,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

/// Half-open `[lower, upper)` bin; the last bin also holds `upper`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverviewView {
    pub total_count: usize,
    pub mean_score: Option<f64>,
    pub median_score: Option<f64>,
    pub year_range: Option<YearRange>,
    pub total_members: u64,
    pub top_genre: Option<String>,
    pub decade_histogram: Vec<DecadeCount>,
    pub year_histogram: Vec<YearCount>,
    pub unknown_year_count: usize,
    pub score_histogram: Vec<ScoreBin>,
    pub top_studios: Vec<LabelCount>,
}

fn score_histogram(scores: &[f64], bins: usize) -> Vec<ScoreBin> {
    if bins == 0 {
        return Vec::new();
    }
    let span = MAX_SCORE - MIN_SCORE;
    let mut histogram: Vec<ScoreBin> = (0..bins)
        .map(|i| ScoreBin {
            lower: MIN_SCORE + span * i as f64 / bins as f64,
            upper: MIN_SCORE + span * (i + 1) as f64 / bins as f64,
            count: 0,
        })
        .collect();
    for score in scores {
        let position = ((score - MIN_SCORE) / span * bins as f64).floor();
        let index = (position.max(0.0) as usize).min(bins - 1);
        histogram[index].count += 1;
    }
    histogram
}

pub fn build_overview(table: &DerivedTable, settings: &OverviewSettings) -> OverviewView {
    let scores: Vec<f64> = table.iter().filter_map(|r| r.record.score).collect();

    let mut decades: BTreeMap<DecadeBucket, usize> = BTreeMap::new();
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for row in table.iter() {
        *decades.entry(row.decade).or_insert(0) += 1;
        if let Some(year) = row.record.year {
            *years.entry(year).or_insert(0) += 1;
        }
    }

    let year_range = match (years.keys().next(), years.keys().next_back()) {
        (Some(&min), Some(&max)) => Some(YearRange { min, max }),
        _ => None,
    };
    let unknown_year_count = decades.get(&DecadeBucket::Unknown).copied().unwrap_or(0);

    let top_genre = top_labels(
        table
            .iter()
            .flat_map(|r| r.record.genres.iter().map(String::as_str)),
        1,
    )
    .into_iter()
    .next()
    .map(|top| top.label);

    let top_studios = top_labels(
        table
            .iter()
            .flat_map(|r| r.record.studios.iter().map(String::as_str)),
        settings.top_studios,
    );

    OverviewView {
        total_count: table.len(),
        mean_score: mean(&scores),
        median_score: median(&scores),
        year_range,
        total_members: table
            .iter()
            .filter_map(|r| r.record.members)
            .fold(0u64, u64::saturating_add),
        top_genre,
        decade_histogram: decades
            .into_iter()
            .map(|(decade, count)| DecadeCount { decade, count })
            .collect(),
        year_histogram: years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        unknown_year_count,
        score_histogram: score_histogram(&scores, settings.score_bins),
        top_studios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_from_reader, ColumnMapping};
    use crate::metrics::derive;

    fn table(csv: &str) -> DerivedTable {
        derive(&load_from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap())
    }

    #[test]
    fn test_three_row_example() {
        let table = table(
            "\
title,start_date,genres,score,members
A,1995,['Action'],7.0,100
B,1995,['Comedy'],8.0,200
C,2005,['Comedy'],9.0,300
",
        );
        let view = build_overview(&table, &OverviewSettings::default());

        assert_eq!(view.total_count, 3);
        assert_eq!(
            view.decade_histogram,
            vec![
                DecadeCount {
                    decade: DecadeBucket::Decade(1990),
                    count: 2
                },
                DecadeCount {
                    decade: DecadeBucket::Decade(2000),
                    count: 1
                },
            ]
        );
        assert_eq!(view.mean_score, Some(8.0));
        assert_eq!(view.median_score, Some(8.0));
        assert_eq!(view.year_range, Some(YearRange { min: 1995, max: 2005 }));
        assert_eq!(view.total_members, 600);
        assert_eq!(view.top_genre.as_deref(), Some("Comedy"));
        assert_eq!(view.unknown_year_count, 0);
        assert_eq!(
            view.year_histogram,
            vec![
                YearCount {
                    year: 1995,
                    count: 2
                },
                YearCount {
                    year: 2005,
                    count: 1
                }
            ]
        );
    }

    #[test]
    fn test_unknown_years_are_counted() {
        let table = table(
            "\
title,start_date,genres,score,members
A,,['Action'],,
B,1988,['Action'],6.5,10
",
        );
        let view = build_overview(&table, &OverviewSettings::default());

        assert_eq!(view.unknown_year_count, 1);
        let histogram_total: usize = view.decade_histogram.iter().map(|d| d.count).sum();
        assert_eq!(histogram_total, view.total_count);
        assert_eq!(
            view.decade_histogram.last().map(|d| d.decade),
            Some(DecadeBucket::Unknown)
        );
        assert_eq!(view.mean_score, Some(6.5));
    }

    #[test]
    fn test_total_members_saturates() {
        let table = table(
            "\
title,start_date,genres,score,members
A,2001,[],7.0,18446744073709551615
B,2002,[],7.0,1
",
        );
        let view = build_overview(&table, &OverviewSettings::default());
        assert_eq!(view.total_members, u64::MAX);
    }

    #[test]
    fn test_empty_table() {
        let view = build_overview(&DerivedTable::default(), &OverviewSettings::default());
        assert_eq!(view.total_count, 0);
        assert_eq!(view.mean_score, None);
        assert_eq!(view.median_score, None);
        assert_eq!(view.year_range, None);
        assert_eq!(view.top_genre, None);
        assert!(view.decade_histogram.is_empty());
        assert!(view.score_histogram.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_score_histogram_bins() {
        let histogram = score_histogram(&[0.0, 0.24, 0.25, 9.99, 10.0], 40);
        assert_eq!(histogram.len(), 40);
        assert_eq!(histogram[0].count, 2);
        assert_eq!(histogram[1].count, 1);
        assert_eq!(histogram[39].count, 2);
        assert_eq!(histogram[39].upper, 10.0);
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 5);

        assert!(score_histogram(&[5.0], 0).is_empty());
    }

    #[test]
    fn test_top_studios() {
        let table = table(
            "\
title,start_date,genres,score,members,studios
A,2001,[],7.0,1,\"['Madhouse', 'Sunrise']\"
B,2002,[],7.0,1,['Madhouse']
C,2003,[],7.0,1,['Bones']
",
        );
        let settings = OverviewSettings {
            top_studios: 2,
            ..Default::default()
        };
        let view = build_overview(&table, &settings);
        let labels: Vec<&str> = view.top_studios.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Madhouse", "Bones"]);
        assert_eq!(view.top_studios[0].count, 2);
    }
}

//! Search page and filter control options.

use super::stats::cmp_desc_missing_last;
use super::SearchSettings;
use crate::filter::{evaluate_filter, FilterCriteria};
use crate::metrics::{DerivedRecord, DerivedTable};
use serde::Serialize;
use std::collections::BTreeSet;

/// Year bounds offered when the table has no known year.
pub const DEFAULT_YEAR_BOUNDS: (i32, i32) = (1917, 2025);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchRow {
    pub id: usize,
    pub title: String,
    pub score: Option<f64>,
    pub year: Option<i32>,
    pub kind: Option<String>,
    pub episodes: Option<u32>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
}

impl From<&DerivedRecord> for SearchRow {
    fn from(row: &DerivedRecord) -> Self {
        SearchRow {
            id: row.record.id,
            title: row.record.title.clone(),
            score: row.record.score,
            year: row.record.year,
            kind: row.record.kind.clone(),
            episodes: row.record.episodes,
            members: row.record.members,
            favorites: row.record.favorites,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchView {
    /// Matches before truncation to the page limit.
    pub total_matches: usize,
    pub rows: Vec<SearchRow>,
}

/// Rows matching `criteria`, best rated first (missing ratings last), then
/// by title and id.
pub fn build_search(
    table: &DerivedTable,
    criteria: &FilterCriteria,
    settings: &SearchSettings,
) -> SearchView {
    let matches = evaluate_filter(table, criteria);
    let mut rows: Vec<&DerivedRecord> = matches.iter().collect();
    rows.sort_by(|a, b| {
        cmp_desc_missing_last(a.record.score, b.record.score)
            .then_with(|| a.record.title.cmp(&b.record.title))
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
    SearchView {
        total_matches: rows.len(),
        rows: rows
            .into_iter()
            .take(settings.limit)
            .map(SearchRow::from)
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterOptions {
    pub year_min: i32,
    pub year_max: i32,
    pub genres: Vec<String>,
    pub kinds: Vec<String>,
}

/// Bounds and choices for the filter controls of a host.
pub fn build_filter_options(table: &DerivedTable) -> FilterOptions {
    let years = table.iter().filter_map(|r| r.record.year);
    let (year_min, year_max) = years.fold(None, |acc: Option<(i32, i32)>, year| match acc {
        Some((min, max)) => Some((min.min(year), max.max(year))),
        None => Some((year, year)),
    })
    .unwrap_or(DEFAULT_YEAR_BOUNDS);

    let genres: BTreeSet<&str> = table
        .iter()
        .flat_map(|r| r.record.genres.iter().map(String::as_str))
        .collect();
    let kinds: BTreeSet<&str> = table
        .iter()
        .filter_map(|r| r.record.kind.as_deref())
        .collect();

    FilterOptions {
        year_min,
        year_max,
        genres: genres.into_iter().map(String::from).collect(),
        kinds: kinds.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_from_reader, ColumnMapping};
    use crate::metrics::derive;
    use std::collections::BTreeSet;

    const SAMPLE: &str = "\
title,start_date,genres,score,members,type,episodes,favorites
Lucky Star,2007,\"['Comedy', 'Slice of Life']\",7.8,500000,TV,24,3000
Akira,1988,\"['Action', 'Sci-Fi']\",8.1,600000,Movie,1,9000
Azumanga Daioh,2002,['Comedy'],8.0,300000,TV,26,2000
Perfect Blue,1997,\"['Drama', 'Horror']\",8.3,400000,Movie,1,8000
Unknown Pilot,,['Action'],,10,OVA,,
";

    fn table() -> DerivedTable {
        derive(&load_from_reader(SAMPLE.as_bytes(), &ColumnMapping::default()).unwrap())
    }

    fn titles(view: &SearchView) -> Vec<&str> {
        view.rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_default_order_is_rating_descending() {
        let view = build_search(&table(), &FilterCriteria::default(), &SearchSettings::default());
        assert_eq!(view.total_matches, 5);
        assert_eq!(
            titles(&view),
            vec![
                "Perfect Blue",
                "Akira",
                "Azumanga Daioh",
                "Lucky Star",
                "Unknown Pilot"
            ]
        );
    }

    #[test]
    fn test_genre_example_returns_exactly_the_matching_rows() {
        let criteria = FilterCriteria {
            genres: BTreeSet::from(["Comedy".to_string()]),
            ..Default::default()
        };
        let view = build_search(&table(), &criteria, &SearchSettings::default());
        assert_eq!(view.total_matches, 2);
        assert_eq!(titles(&view), vec!["Azumanga Daioh", "Lucky Star"]);
        assert_eq!(view.rows[1].episodes, Some(24));
        assert_eq!(view.rows[1].favorites, Some(3000));
    }

    #[test]
    fn test_limit_truncates_but_reports_total() {
        let view = build_search(
            &table(),
            &FilterCriteria::default(),
            &SearchSettings { limit: 2 },
        );
        assert_eq!(view.total_matches, 5);
        assert_eq!(titles(&view), vec!["Perfect Blue", "Akira"]);
    }

    #[test]
    fn test_no_match_is_an_empty_view() {
        let criteria = FilterCriteria {
            query: Some("evangelion".to_string()),
            ..Default::default()
        };
        let view = build_search(&table(), &criteria, &SearchSettings::default());
        assert_eq!(view.total_matches, 0);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_filter_options() {
        let options = build_filter_options(&table());
        assert_eq!(options.year_min, 1988);
        assert_eq!(options.year_max, 2007);
        assert_eq!(
            options.genres,
            vec!["Action", "Comedy", "Drama", "Horror", "Sci-Fi", "Slice of Life"]
        );
        assert_eq!(options.kinds, vec!["Movie", "OVA", "TV"]);
    }

    #[test]
    fn test_filter_options_default_year_bounds() {
        let options = build_filter_options(&DerivedTable::default());
        assert_eq!((options.year_min, options.year_max), DEFAULT_YEAR_BOUNDS);
        assert!(options.genres.is_empty());
    }
}

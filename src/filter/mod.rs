//! Search and filter evaluation.
//!
//! Criteria are combined with a logical AND; unset criteria impose no
//! constraint, so the default criteria select the whole table.

use crate::dataset::parse::{MAX_SCORE, MIN_SCORE};
use crate::metrics::{DerivedRecord, DerivedTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a multi-genre selection is matched against a title's genres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreMatch {
    /// The title has at least one of the selected genres.
    #[default]
    Any,
    /// The title has every selected genre.
    All,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title.
    pub query: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub genres: BTreeSet<String>,
    pub genre_match: GenreMatch,
    /// Media types (TV, Movie, ...).
    pub kinds: BTreeSet<String>,
    pub score_min: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none()
            && self.year_min.is_none()
            && self.year_max.is_none()
            && self.genres.is_empty()
            && self.kinds.is_empty()
            && self.score_min.is_none()
    }

    /// Rejects criteria that can never select anything meaningful: a score
    /// threshold off the 0-10 scale (NaN included) or an inverted year range.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(min) = self.score_min {
            if !(MIN_SCORE..=MAX_SCORE).contains(&min) {
                return Err(format!("Score {} is outside 0-10.", min));
            }
        }
        if let (Some(min), Some(max)) = (self.year_min, self.year_max) {
            if min > max {
                return Err(format!("Year range {}..{} is empty.", min, max));
            }
        }
        Ok(())
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_year(&self, row: &DerivedRecord) -> bool {
        if self.year_min.is_none() && self.year_max.is_none() {
            return true;
        }
        match row.record.year {
            Some(year) => {
                self.year_min.map_or(true, |min| year >= min)
                    && self.year_max.map_or(true, |max| year <= max)
            }
            None => false,
        }
    }

    fn matches_genres(&self, row: &DerivedRecord) -> bool {
        if self.genres.is_empty() {
            return true;
        }
        match self.genre_match {
            GenreMatch::Any => self.genres.iter().any(|g| row.record.has_genre(g)),
            GenreMatch::All => self.genres.iter().all(|g| row.record.has_genre(g)),
        }
    }

    fn matches_kind(&self, row: &DerivedRecord) -> bool {
        if self.kinds.is_empty() {
            return true;
        }
        match &row.record.kind {
            Some(kind) => self.kinds.iter().any(|k| k.eq_ignore_ascii_case(kind)),
            None => false,
        }
    }

    fn matches_score(&self, row: &DerivedRecord) -> bool {
        match (self.score_min, row.record.score) {
            (None, _) => true,
            (Some(min), Some(score)) => score >= min,
            (Some(_), None) => false,
        }
    }
}

/// Returns the rows matching every active criterion, in table order. No
/// match is an empty table, not an error.
pub fn evaluate_filter(table: &DerivedTable, criteria: &FilterCriteria) -> DerivedTable {
    if criteria.is_empty() {
        return table.clone();
    }
    let query = criteria.normalized_query();
    table
        .iter()
        .filter(|row| {
            query
                .as_deref()
                .map_or(true, |q| row.record.title.to_lowercase().contains(q))
                && criteria.matches_year(row)
                && criteria.matches_genres(row)
                && criteria.matches_kind(row)
                && criteria.matches_score(row)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_from_reader, ColumnMapping};
    use crate::metrics::derive;

    const SAMPLE: &str = "\
title,start_date,genres,score,members,type
Lucky Star,2007,\"['Comedy', 'Slice of Life']\",7.8,500000,TV
Akira,1988,\"['Action', 'Sci-Fi']\",8.1,600000,Movie
Azumanga Daioh,2002,\"['Comedy']\",8.0,300000,TV
Perfect Blue,1997,\"['Drama', 'Horror']\",8.3,400000,Movie
Unknown Pilot,,['Action'],,10,OVA
";

    fn table() -> DerivedTable {
        derive(&load_from_reader(SAMPLE.as_bytes(), &ColumnMapping::default()).unwrap())
    }

    fn titles(table: &DerivedTable) -> Vec<&str> {
        table.iter().map(|r| r.record.title.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let table = table();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(evaluate_filter(&table, &criteria), table);

        let blank_query = FilterCriteria {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate_filter(&table, &blank_query), table);
    }

    #[test]
    fn test_validate_rejects_unusable_bounds() {
        assert!(FilterCriteria::default().validate().is_ok());

        let mut criteria = FilterCriteria {
            score_min: Some(7.5),
            year_min: Some(1990),
            year_max: Some(1990),
            ..Default::default()
        };
        assert!(criteria.validate().is_ok());

        for score in [f64::NAN, f64::INFINITY, -0.5, 10.5] {
            criteria.score_min = Some(score);
            assert!(criteria.validate().is_err(), "score {} accepted", score);
        }

        criteria.score_min = None;
        criteria.year_min = Some(2000);
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn test_genre_filter_keeps_order() {
        let criteria = FilterCriteria {
            genres: BTreeSet::from(["Comedy".to_string()]),
            ..Default::default()
        };
        let result = evaluate_filter(&table(), &criteria);
        assert_eq!(titles(&result), vec!["Lucky Star", "Azumanga Daioh"]);
    }

    #[test]
    fn test_genre_match_modes() {
        let mut criteria = FilterCriteria {
            genres: BTreeSet::from(["comedy".to_string(), "slice of life".to_string()]),
            ..Default::default()
        };
        let any = evaluate_filter(&table(), &criteria);
        assert_eq!(titles(&any), vec!["Lucky Star", "Azumanga Daioh"]);

        criteria.genre_match = GenreMatch::All;
        let all = evaluate_filter(&table(), &criteria);
        assert_eq!(titles(&all), vec!["Lucky Star"]);
    }

    #[test]
    fn test_text_query_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            query: Some("DAIOH".to_string()),
            ..Default::default()
        };
        assert_eq!(
            titles(&evaluate_filter(&table(), &criteria)),
            vec!["Azumanga Daioh"]
        );
    }

    #[test]
    fn test_year_range_is_inclusive_and_excludes_unknown_years() {
        let criteria = FilterCriteria {
            year_min: Some(1997),
            year_max: Some(2002),
            ..Default::default()
        };
        assert_eq!(
            titles(&evaluate_filter(&table(), &criteria)),
            vec!["Azumanga Daioh", "Perfect Blue"]
        );

        let open_ended = FilterCriteria {
            year_max: Some(1990),
            ..Default::default()
        };
        assert_eq!(titles(&evaluate_filter(&table(), &open_ended)), vec!["Akira"]);
    }

    #[test]
    fn test_score_threshold_excludes_missing_scores() {
        let criteria = FilterCriteria {
            score_min: Some(8.0),
            ..Default::default()
        };
        assert_eq!(
            titles(&evaluate_filter(&table(), &criteria)),
            vec!["Akira", "Azumanga Daioh", "Perfect Blue"]
        );
    }

    #[test]
    fn test_kind_filter() {
        let criteria = FilterCriteria {
            kinds: BTreeSet::from(["movie".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            titles(&evaluate_filter(&table(), &criteria)),
            vec!["Akira", "Perfect Blue"]
        );
    }

    #[test]
    fn test_criteria_are_combined_with_and() {
        let criteria = FilterCriteria {
            genres: BTreeSet::from(["Action".to_string()]),
            score_min: Some(8.0),
            year_min: Some(1980),
            ..Default::default()
        };
        assert_eq!(titles(&evaluate_filter(&table(), &criteria)), vec!["Akira"]);
    }

    #[test]
    fn test_no_match_is_empty_table() {
        let criteria = FilterCriteria {
            query: Some("gundam".to_string()),
            ..Default::default()
        };
        let result = evaluate_filter(&table(), &criteria);
        assert!(result.is_empty());
    }
}

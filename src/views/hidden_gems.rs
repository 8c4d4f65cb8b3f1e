//! Hidden gems page.
//!
//! Two complementary rankings are produced: the gem-score ranking over
//! every eligible title, and the recommendation efficiency analysis, which
//! looks for titles recommended far more often than their audience size
//! would suggest.

use super::stats::median;
use super::HiddenGemsSettings;
use crate::metrics::{DerivedRecord, DerivedTable};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GemRow {
    pub id: usize,
    pub title: String,
    pub year: Option<i32>,
    pub score: f64,
    pub members: u64,
    pub hidden_gem_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub id: usize,
    pub title: String,
    pub score: Option<f64>,
    pub members: u64,
    pub recommendation_count: u64,
    pub rec_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationEfficiency {
    /// Number of titles taking part in the analysis.
    pub sample_size: usize,
    pub median_members: f64,
    pub median_ratio: f64,
    pub gems: Vec<EfficiencyRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HiddenGemsView {
    pub ranked: Vec<GemRow>,
    pub efficiency: Option<RecommendationEfficiency>,
}

fn gem_row(row: &DerivedRecord) -> Option<GemRow> {
    Some(GemRow {
        id: row.record.id,
        title: row.record.title.clone(),
        year: row.record.year,
        score: row.record.score?,
        members: row.record.members?,
        hidden_gem_score: row.hidden_gem_score,
    })
}

/// Top titles by gem score, ties broken by rating, then title, then id.
fn rank_by_gem_score(table: &DerivedTable, settings: &HiddenGemsSettings) -> Vec<GemRow> {
    let mut rows: Vec<GemRow> = table
        .iter()
        .filter_map(gem_row)
        .filter(|row| row.members >= settings.min_members)
        .collect();
    rows.sort_by(|a, b| {
        b.hidden_gem_score
            .total_cmp(&a.hidden_gem_score)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    rows.truncate(settings.limit);
    rows
}

fn recommendation_efficiency(
    table: &DerivedTable,
    settings: &HiddenGemsSettings,
) -> Option<RecommendationEfficiency> {
    let candidates: Vec<EfficiencyRow> = table
        .iter()
        .filter_map(|row| {
            let members = row.record.members?;
            let recommendation_count = row.record.recommendation_count?;
            if members <= settings.min_members {
                return None;
            }
            Some(EfficiencyRow {
                id: row.record.id,
                title: row.record.title.clone(),
                score: row.record.score,
                members,
                recommendation_count,
                rec_ratio: recommendation_count as f64 / members as f64,
            })
        })
        .collect();

    let members: Vec<f64> = candidates.iter().map(|c| c.members as f64).collect();
    let ratios: Vec<f64> = candidates.iter().map(|c| c.rec_ratio).collect();
    let median_members = median(&members)?;
    let median_ratio = median(&ratios)?;
    let sample_size = candidates.len();

    let mut gems: Vec<EfficiencyRow> = candidates
        .into_iter()
        .filter(|c| (c.members as f64) < median_members && c.rec_ratio > median_ratio)
        .collect();
    gems.sort_by(|a, b| {
        b.rec_ratio
            .total_cmp(&a.rec_ratio)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    gems.truncate(settings.limit);

    Some(RecommendationEfficiency {
        sample_size,
        median_members,
        median_ratio,
        gems,
    })
}

pub fn build_hidden_gems(table: &DerivedTable, settings: &HiddenGemsSettings) -> HiddenGemsView {
    HiddenGemsView {
        ranked: rank_by_gem_score(table, settings),
        efficiency: recommendation_efficiency(table, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_from_reader, ColumnMapping};
    use crate::metrics::derive;

    const SAMPLE: &str = "\
title,start_date,genres,score,members,recommendation_count
Mainstream Hit,2010,[],8.5,2000000,4000
Niche Classic,1999,[],8.5,2000,400
Twin B,2005,[],7.0,1000,10
Twin A,2005,[],7.0,1000,10
Too Small,2001,[],9.9,50,40
No Score,2003,[],,800,90
No Members,2004,[],9.0,,
";

    fn table() -> DerivedTable {
        derive(&load_from_reader(SAMPLE.as_bytes(), &ColumnMapping::default()).unwrap())
    }

    fn titles(rows: &[GemRow]) -> Vec<&str> {
        rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_niche_titles_rank_above_popular_ones() {
        let view = build_hidden_gems(&table(), &HiddenGemsSettings::default());
        assert_eq!(
            titles(&view.ranked),
            vec!["Niche Classic", "Twin A", "Twin B", "Mainstream Hit"]
        );
    }

    #[test]
    fn test_ranking_respects_limit_and_min_members() {
        let settings = HiddenGemsSettings {
            limit: 2,
            min_members: 0,
        };
        let view = build_hidden_gems(&table(), &settings);
        assert_eq!(titles(&view.ranked), vec!["Too Small", "Niche Classic"]);
    }

    #[test]
    fn test_ties_break_by_rating_then_title() {
        let csv = "\
title,start_date,genres,score,members
Zeta,2000,[],6.0,0
Alpha,2000,[],6.0,0
Beta,2000,[],6.0,0
";
        let table = derive(&load_from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap());
        let settings = HiddenGemsSettings {
            limit: 10,
            min_members: 0,
        };
        let view = build_hidden_gems(&table, &settings);
        assert_eq!(titles(&view.ranked), vec!["Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_recommendation_efficiency() {
        let view = build_hidden_gems(&table(), &HiddenGemsSettings::default());
        let efficiency = view.efficiency.unwrap();

        // Mainstream Hit, Niche Classic, Twin A, Twin B, No Score
        assert_eq!(efficiency.sample_size, 5);
        assert_eq!(efficiency.median_members, 1000.0);
        assert!((efficiency.median_ratio - 0.01).abs() < 1e-12);

        let gems: Vec<&str> = efficiency.gems.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(gems, vec!["No Score"]);
        assert!((efficiency.gems[0].rec_ratio - 90.0 / 800.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_efficiency_without_recommendations() {
        let csv = "title,start_date,genres,score,members\nA,2000,[],6.0,500\n";
        let table = derive(&load_from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap());
        let view = build_hidden_gems(&table, &HiddenGemsSettings::default());
        assert!(view.efficiency.is_none());
        assert_eq!(view.ranked.len(), 1);
    }
}

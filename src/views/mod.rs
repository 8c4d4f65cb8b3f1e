//! Render-ready datasets, one builder per dashboard page.
//!
//! Builders take the (already filtered) derived table and never fail: an
//! empty table yields an empty view.

mod genre_trends;
mod hidden_gems;
mod overview;
mod search;
pub mod stats;

pub use genre_trends::{build_genre_trends, GenreDecadeCell, GenreTrendsView, UNLISTED_GENRE};
pub use hidden_gems::{
    build_hidden_gems, EfficiencyRow, GemRow, HiddenGemsView, RecommendationEfficiency,
};
pub use overview::{build_overview, DecadeCount, OverviewView, ScoreBin, YearCount, YearRange};
pub use search::{
    build_filter_options, build_search, FilterOptions, SearchRow, SearchView,
    DEFAULT_YEAR_BOUNDS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewSettings {
    pub score_bins: usize,
    pub top_studios: usize,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            score_bins: 40,
            top_studios: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenGemsSettings {
    pub limit: usize,
    /// Titles below this audience are too obscure to rank.
    pub min_members: u64,
}

impl Default for HiddenGemsSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            min_members: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendsSettings {
    pub top_genres: usize,
    pub top_kinds: usize,
}

impl Default for TrendsSettings {
    fn default() -> Self {
        Self {
            top_genres: 6,
            top_kinds: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSettings {
    pub overview: OverviewSettings,
    pub hidden_gems: HiddenGemsSettings,
    pub trends: TrendsSettings,
    pub search: SearchSettings,
}

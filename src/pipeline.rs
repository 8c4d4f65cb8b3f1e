//! The render pipeline driven by the hosts.
//!
//! A host keeps one [`Dashboard`] per loaded dataset and calls
//! [`Dashboard::render`] on every interaction: the criteria are applied to
//! the derived table first, then the page's builder runs on the result.

use crate::filter::{evaluate_filter, FilterCriteria};
use crate::metrics::DerivedTable;
use crate::views::{
    build_filter_options, build_genre_trends, build_hidden_gems, build_overview, build_search,
    FilterOptions, GenreTrendsView, HiddenGemsSettings, HiddenGemsView, OverviewView,
    SearchSettings, SearchView, ViewSettings,
};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Overview,
    HiddenGems { limit: Option<usize> },
    GenreTrends,
    Search { limit: Option<usize> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "page", content = "data", rename_all = "snake_case")]
pub enum RenderedPage {
    Overview(OverviewView),
    HiddenGems(HiddenGemsView),
    GenreTrends(GenreTrendsView),
    Search(SearchView),
}

pub struct Dashboard {
    table: DerivedTable,
    settings: ViewSettings,
    filter_options: FilterOptions,
}

impl Dashboard {
    pub fn new(table: DerivedTable, settings: ViewSettings) -> Dashboard {
        let filter_options = build_filter_options(&table);
        Dashboard {
            table,
            settings,
            filter_options,
        }
    }

    pub fn table(&self) -> &DerivedTable {
        &self.table
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Filter bounds and choices, computed over the whole table.
    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn render(&self, page: Page, criteria: &FilterCriteria) -> RenderedPage {
        let start = Instant::now();
        let rendered = match page {
            Page::Search { limit } => {
                // Search applies the criteria itself.
                let settings = SearchSettings {
                    limit: limit.unwrap_or(self.settings.search.limit),
                };
                RenderedPage::Search(build_search(&self.table, criteria, &settings))
            }
            Page::Overview => RenderedPage::Overview(build_overview(
                &evaluate_filter(&self.table, criteria),
                &self.settings.overview,
            )),
            Page::HiddenGems { limit } => {
                let settings = HiddenGemsSettings {
                    limit: limit.unwrap_or(self.settings.hidden_gems.limit),
                    ..self.settings.hidden_gems.clone()
                };
                RenderedPage::HiddenGems(build_hidden_gems(
                    &evaluate_filter(&self.table, criteria),
                    &settings,
                ))
            }
            Page::GenreTrends => RenderedPage::GenreTrends(build_genre_trends(
                &evaluate_filter(&self.table, criteria),
                &self.settings.trends,
            )),
        };
        debug!("Rendered {:?} in {:?}", page, start.elapsed());
        rendered
    }
}

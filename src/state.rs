use std::path::PathBuf;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::dashboard::{
    run_insights, run_recommendation, InsightsReport, InsightsRequest, RecommendationReport,
    RecommendationRequest,
};
use crate::data::model::ListingTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Insights,
    Recommendation,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset, read-only until replaced by File → Open.
    pub dataset: ListingTable,

    /// Where `dataset` was read from.
    pub source: PathBuf,

    pub tab: Tab,

    /// Sidebar selections for the insights tab.
    pub insights_request: InsightsRequest,

    /// Selections on the recommendation tab.
    pub recommendation_request: RecommendationRequest,

    /// Results for the current selections (cached).
    pub insights: InsightsReport,
    pub recommendation: RecommendationReport,

    /// Colour per room type and per neighbourhood.
    pub room_colors: ColorMap,
    pub neighbourhood_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, dataset: ListingTable, source: PathBuf) -> Self {
        let insights_request = default_insights_request(&dataset, config.top_n);
        let recommendation_request = default_recommendation_request(&dataset);
        let insights = run_insights(&dataset, &insights_request);
        let recommendation = run_recommendation(&dataset, &recommendation_request);
        let (room_colors, neighbourhood_colors) = color_maps(&dataset);

        Self {
            config,
            dataset,
            source,
            tab: Tab::Insights,
            insights_request,
            recommendation_request,
            insights,
            recommendation,
            room_colors,
            neighbourhood_colors,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset every selection.
    pub fn set_dataset(&mut self, dataset: ListingTable, source: PathBuf) {
        let config = self.config.clone();
        let tab = self.tab;
        *self = Self::new(config, dataset, source);
        self.tab = tab;
    }

    /// Recompute the insights report after a selection change.
    pub fn refresh_insights(&mut self) {
        if self.insights.request != self.insights_request {
            self.insights = run_insights(&self.dataset, &self.insights_request);
        }
    }

    /// Recompute the recommendation after a selection change.
    pub fn refresh_recommendation(&mut self) {
        if self.recommendation.request != self.recommendation_request {
            self.recommendation = run_recommendation(&self.dataset, &self.recommendation_request);
        }
    }
}

fn first_or_empty(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

fn default_insights_request(dataset: &ListingTable, top_n: usize) -> InsightsRequest {
    InsightsRequest {
        neighbourhood_group: first_or_empty(dataset.neighbourhood_groups()),
        room_type: first_or_empty(dataset.room_types()),
        top_n,
    }
}

/// Review range defaults to `0..=max`.
fn default_recommendation_request(dataset: &ListingTable) -> RecommendationRequest {
    let (_, max) = dataset.review_count_bounds().unwrap_or((0, 0));
    RecommendationRequest {
        neighbourhood_group: first_or_empty(dataset.neighbourhood_groups()),
        room_type: first_or_empty(dataset.room_types()),
        reviews_min: 0,
        reviews_max: max,
    }
}

fn color_maps(dataset: &ListingTable) -> (ColorMap, ColorMap) {
    let mut neighbourhoods: Vec<&str> = Vec::new();
    for listing in dataset.listings() {
        if !neighbourhoods.contains(&listing.neighbourhood.as_str()) {
            neighbourhoods.push(&listing.neighbourhood);
        }
    }
    (
        ColorMap::new(dataset.room_types().iter().map(String::as_str)),
        ColorMap::new(neighbourhoods),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::listing;
    use crate::data::recommend::Recommendation;

    fn state() -> AppState {
        let table = ListingTable::from_listings(vec![
            listing("Centro", "Entire home/apt", 100.0, 5),
            listing("Retiro", "Private room", 40.0, 30),
            listing("Centro", "Private room", 55.0, 12),
        ]);
        AppState::new(AppConfig::default(), table, PathBuf::from("airbnb.csv"))
    }

    #[test]
    fn test_initial_selections() {
        let state = state();
        assert_eq!(state.insights_request.neighbourhood_group, "Centro");
        assert_eq!(state.insights_request.room_type, "Entire home/apt");
        assert_eq!(state.recommendation_request.reviews_min, 0);
        assert_eq!(state.recommendation_request.reviews_max, 30);
        assert_eq!(state.insights.matched, 1);
        assert!(matches!(state.recommendation.outcome, Recommendation::Range(_)));
    }

    #[test]
    fn test_refresh_follows_selection() {
        let mut state = state();
        state.recommendation_request.room_type = "Private room".into();
        state.recommendation_request.reviews_max = 10;
        state.refresh_recommendation();
        assert_eq!(state.recommendation.matched, 0);
        assert_eq!(state.recommendation.outcome, Recommendation::NoData);

        state.insights_request.room_type = "Private room".into();
        state.refresh_insights();
        assert_eq!(state.insights.matched, 1);
        assert_eq!(state.insights.request.room_type, "Private room");
    }

    #[test]
    fn test_set_dataset_resets_selections() {
        let mut state = state();
        state.tab = Tab::Recommendation;
        state.insights_request.room_type = "Private room".into();
        state.set_dataset(
            ListingTable::from_listings(vec![listing("Sol", "Hotel room", 90.0, 2)]),
            PathBuf::from("other.json"),
        );
        assert_eq!(state.tab, Tab::Recommendation);
        assert_eq!(state.insights_request.room_type, "Hotel room");
        assert_eq!(state.source, PathBuf::from("other.json"));
        assert_eq!(state.dataset.len(), 1);
    }
}

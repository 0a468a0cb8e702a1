use serde::Serialize;

use crate::data::filter::{filter, Constraints};
use crate::data::insights::{
    price_distribution_by_room_type, reviews_vs_price, room_type_vs_listing_count,
    top_by_reviews_per_month, PriceGroup, ReviewRate, ReviewsPrice, RoomTypeListingCount,
};
use crate::data::model::ListingTable;
use crate::data::recommend::{recommend, Recommendation};

// ---------------------------------------------------------------------------
// Insights tab
// ---------------------------------------------------------------------------

/// Selections made in the insights sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightsRequest {
    pub neighbourhood_group: String,
    pub room_type: String,
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    pub request: InsightsRequest,
    /// Rows in the filtered cohort.
    pub matched: usize,
    pub room_type_vs_listings: Vec<RoomTypeListingCount>,
    pub top_by_reviews_per_month: Vec<ReviewRate>,
    pub reviews_vs_price: Vec<ReviewsPrice>,
    /// Computed over the whole table so room types can be compared.
    pub price_distribution: Vec<PriceGroup>,
}

pub fn run_insights(table: &ListingTable, request: &InsightsRequest) -> InsightsReport {
    let constraints = Constraints::new()
        .neighbourhood_group(request.neighbourhood_group.as_str())
        .room_type(request.room_type.as_str());
    let view = filter(table, &constraints);

    InsightsReport {
        request: request.clone(),
        matched: view.len(),
        room_type_vs_listings: room_type_vs_listing_count(&view),
        top_by_reviews_per_month: top_by_reviews_per_month(&view, request.top_n),
        reviews_vs_price: reviews_vs_price(&view),
        price_distribution: price_distribution_by_room_type(&table.view()),
    }
}

// ---------------------------------------------------------------------------
// Price recommendation tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationRequest {
    pub neighbourhood_group: String,
    pub room_type: String,
    pub reviews_min: u64,
    pub reviews_max: u64,
}

impl RecommendationRequest {
    pub fn constraints(&self) -> Constraints {
        Constraints::new()
            .neighbourhood_group(self.neighbourhood_group.as_str())
            .room_type(self.room_type.as_str())
            .reviews_between(self.reviews_min, self.reviews_max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub request: RecommendationRequest,
    pub matched: usize,
    pub outcome: Recommendation,
}

impl RecommendationReport {
    /// The text shown under the recommendation controls.
    pub fn message(&self) -> String {
        let r = &self.request;
        match self.outcome {
            Recommendation::Range(range) => format!(
                "Suggested price range for {} in {} with {} - {} reviews: €{:.2} - €{:.2}",
                r.room_type,
                r.neighbourhood_group,
                r.reviews_min,
                r.reviews_max,
                range.lower,
                range.upper
            ),
            Recommendation::NoData => format!(
                "No listings found for {} in {} with {} - {} reviews. \
                 Please try different options.",
                r.room_type, r.neighbourhood_group, r.reviews_min, r.reviews_max
            ),
        }
    }
}

pub fn run_recommendation(
    table: &ListingTable,
    request: &RecommendationRequest,
) -> RecommendationReport {
    let view = filter(table, &request.constraints());
    RecommendationReport {
        request: request.clone(),
        matched: view.len(),
        outcome: recommend(&view),
    }
}

/// Both reports, as written by File → Export.
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub source: String,
    pub insights: Option<&'a InsightsReport>,
    pub recommendation: Option<&'a RecommendationReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::listing;
    use crate::data::recommend::PriceRange;

    fn table() -> ListingTable {
        ListingTable::from_listings(vec![
            listing("Centro", "Entire home", 100.0, 5),
            listing("Centro", "Entire home", 200.0, 10),
            listing("Centro", "Entire home", 120.0, 3),
            listing("Retiro", "Private room", 45.0, 40),
            listing("Retiro", "", 999.0, 1),
        ])
    }

    #[test]
    fn test_recommendation_report_message() {
        let report = run_recommendation(
            &table(),
            &RecommendationRequest {
                neighbourhood_group: "Centro".into(),
                room_type: "Entire home".into(),
                reviews_min: 0,
                reviews_max: 10,
            },
        );
        assert_eq!(report.matched, 3);
        assert_eq!(
            report.outcome,
            Recommendation::Range(PriceRange {
                lower: 35.0,
                upper: 235.0,
            })
        );
        assert_eq!(
            report.message(),
            "Suggested price range for Entire home in Centro with 0 - 10 reviews: \
             €35.00 - €235.00"
        );
    }

    #[test]
    fn test_recommendation_no_match() {
        let report = run_recommendation(
            &table(),
            &RecommendationRequest {
                neighbourhood_group: "Centro".into(),
                room_type: "Entire home".into(),
                reviews_min: 11,
                reviews_max: 20,
            },
        );
        assert_eq!(report.matched, 0);
        assert_eq!(report.outcome, Recommendation::NoData);
        assert_eq!(
            report.message(),
            "No listings found for Entire home in Centro with 11 - 20 reviews. \
             Please try different options."
        );
    }

    #[test]
    fn test_insights_report_uses_filtered_cohort() {
        let report = run_insights(
            &table(),
            &InsightsRequest {
                neighbourhood_group: "Centro".into(),
                room_type: "Entire home".into(),
                top_n: 2,
            },
        );
        assert_eq!(report.matched, 3);
        assert_eq!(report.room_type_vs_listings.len(), 3);
        assert_eq!(report.reviews_vs_price.len(), 3);
        assert_eq!(report.top_by_reviews_per_month.len(), 2);

        // Distribution spans the whole table minus the "Unknown" room type.
        let rooms: Vec<&str> = report
            .price_distribution
            .iter()
            .map(|g| g.room_type.as_str())
            .collect();
        assert_eq!(rooms, ["Entire home", "Private room"]);
    }

    #[test]
    fn test_export_serializes() {
        let t = table();
        let recommendation = run_recommendation(
            &t,
            &RecommendationRequest {
                neighbourhood_group: "Retiro".into(),
                room_type: "Private room".into(),
                reviews_min: 0,
                reviews_max: 50,
            },
        );
        let export = DashboardExport {
            source: "airbnb.csv".into(),
            insights: None,
            recommendation: Some(&recommendation),
        };
        let json: serde_json::Value = serde_json::to_value(&export).unwrap();
        assert_eq!(json["recommendation"]["matched"], 1);
        assert_eq!(json["recommendation"]["outcome"]["kind"], "range");
        assert_eq!(json["recommendation"]["outcome"]["lower"], 45.0);
        assert!(json["insights"].is_null());
    }
}

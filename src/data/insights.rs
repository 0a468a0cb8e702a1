//! Projections feeding the insight charts. All are pure functions of a view.

use std::cmp::Ordering;

use serde::Serialize;

use super::model::{ListingView, UNKNOWN_CATEGORY};
use super::stats::FiveNumberSummary;

/// Default length of the reviews-per-month ranking.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeListingCount {
    pub room_type: String,
    pub calculated_host_listings_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRate {
    pub name: String,
    pub neighbourhood: String,
    pub reviews_per_month: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewsPrice {
    pub number_of_reviews: u64,
    pub price: f64,
}

/// Prices of one room type plus their five-number summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGroup {
    pub room_type: String,
    pub prices: Vec<f64>,
    pub summary: FiveNumberSummary,
}

pub fn room_type_vs_listing_count(view: &ListingView<'_>) -> Vec<RoomTypeListingCount> {
    view.iter()
        .map(|l| RoomTypeListingCount {
            room_type: l.room_type.clone(),
            calculated_host_listings_count: l.calculated_host_listings_count,
        })
        .collect()
}

/// The `n` listings with the highest `reviews_per_month`, descending.
/// Equal rates keep table order; missing rates rank after every present one.
pub fn top_by_reviews_per_month(view: &ListingView<'_>, n: usize) -> Vec<ReviewRate> {
    let mut ranked: Vec<ReviewRate> = view
        .iter()
        .map(|l| ReviewRate {
            name: l.name.clone(),
            neighbourhood: l.neighbourhood.clone(),
            reviews_per_month: l.reviews_per_month,
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| match (a.reviews_per_month, b.reviews_per_month) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

pub fn reviews_vs_price(view: &ListingView<'_>) -> Vec<ReviewsPrice> {
    view.iter()
        .map(|l| ReviewsPrice {
            number_of_reviews: l.number_of_reviews,
            price: l.price,
        })
        .collect()
}

/// Prices grouped by room type in first-appearance order, skipping the
/// `"Unknown"` room type.
pub fn price_distribution_by_room_type(view: &ListingView<'_>) -> Vec<PriceGroup> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for listing in view.iter().filter(|l| l.room_type != UNKNOWN_CATEGORY) {
        match groups.iter_mut().find(|(room, _)| *room == listing.room_type) {
            Some((_, prices)) => prices.push(listing.price),
            None => groups.push((listing.room_type.clone(), vec![listing.price])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(room_type, prices)| {
            let summary = FiveNumberSummary::from_values(prices.iter().copied())?;
            Some(PriceGroup {
                room_type,
                prices,
                summary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{listing, Listing, ListingTable};

    fn rated(name: &str, rate: Option<f64>) -> Listing {
        Listing {
            name: name.to_string(),
            reviews_per_month: rate,
            ..listing("Centro", "Private room", 50.0, 1)
        }
    }

    #[test]
    fn test_top_by_reviews_sorted_stable_and_truncated() {
        let table = ListingTable::from_listings(vec![
            rated("a", Some(1.0)),
            rated("b", Some(3.0)),
            rated("c", None),
            rated("d", Some(3.0)),
            rated("e", Some(0.5)),
            rated("f", Some(1.0)),
        ]);

        let top = top_by_reviews_per_month(&table.view(), 4);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "f"]);
        assert!(top
            .windows(2)
            .all(|w| w[0].reviews_per_month >= w[1].reviews_per_month));
    }

    #[test]
    fn test_top_by_reviews_missing_rates_last() {
        let table = ListingTable::from_listings(vec![
            rated("x", None),
            rated("y", Some(0.1)),
            rated("z", None),
        ]);
        let top = top_by_reviews_per_month(&table.view(), DEFAULT_TOP_N);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["y", "x", "z"]);
    }

    #[test]
    fn test_top_by_reviews_never_exceeds_n() {
        let rows = (0..25).map(|i| rated(&i.to_string(), Some(i as f64))).collect();
        let table = ListingTable::from_listings(rows);
        assert_eq!(top_by_reviews_per_month(&table.view(), DEFAULT_TOP_N).len(), 10);
        assert!(top_by_reviews_per_month(&table.view(), 0).is_empty());
        assert_eq!(top_by_reviews_per_month(&table.view(), 100).len(), 25);
    }

    #[test]
    fn test_column_pairs_follow_view() {
        let mut hosted = listing("Centro", "Hotel room", 300.0, 8);
        hosted.calculated_host_listings_count = 12;
        let table =
            ListingTable::from_listings(vec![listing("Retiro", "Private room", 40.0, 2), hosted]);

        assert_eq!(
            room_type_vs_listing_count(&table.view()),
            [
                RoomTypeListingCount {
                    room_type: "Private room".into(),
                    calculated_host_listings_count: 1,
                },
                RoomTypeListingCount {
                    room_type: "Hotel room".into(),
                    calculated_host_listings_count: 12,
                },
            ]
        );
        assert_eq!(
            reviews_vs_price(&table.view()),
            [
                ReviewsPrice {
                    number_of_reviews: 2,
                    price: 40.0,
                },
                ReviewsPrice {
                    number_of_reviews: 8,
                    price: 300.0,
                },
            ]
        );
    }

    #[test]
    fn test_price_distribution_excludes_unknown() {
        let table = ListingTable::from_listings(vec![
            listing("Centro", "Entire home/apt", 100.0, 1),
            listing("Centro", "", 5000.0, 1),
            listing("Centro", "Private room", 40.0, 1),
            listing("Centro", "Entire home/apt", 300.0, 1),
            listing("Centro", "Unknown", 7000.0, 1),
        ]);

        let groups = price_distribution_by_room_type(&table.view());
        let rooms: Vec<&str> = groups.iter().map(|g| g.room_type.as_str()).collect();
        assert_eq!(rooms, ["Entire home/apt", "Private room"]);
        assert_eq!(groups[0].prices, [100.0, 300.0]);
        assert_eq!(groups[0].summary.median, 200.0);
        assert_eq!(groups[0].summary.min, 100.0);
        assert_eq!(groups[0].summary.max, 300.0);
        assert_eq!(groups[1].summary.q1, 40.0);
    }

    #[test]
    fn test_aggregators_on_empty_view() {
        let table = ListingTable::from_listings(Vec::new());
        let view = table.view();
        assert!(room_type_vs_listing_count(&view).is_empty());
        assert!(top_by_reviews_per_month(&view, 10).is_empty());
        assert!(reviews_vs_price(&view).is_empty());
        assert!(price_distribution_by_room_type(&view).is_empty());
    }
}

use serde::Serialize;

use super::model::ListingView;
use super::stats::quartiles;

/// Fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Suggested nightly price band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub lower: f64,
    pub upper: f64,
}

/// Outcome of a recommendation. `NoData` is an ordinary result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Range(PriceRange),
    NoData,
}

impl Recommendation {
    pub fn range(&self) -> Option<PriceRange> {
        match self {
            Recommendation::Range(range) => Some(*range),
            Recommendation::NoData => None,
        }
    }
}

/// Tukey fences over the view's prices, with the lower fence clamped at zero.
///
/// `lower = max(Q1 - 1.5 * IQR, 0)`, `upper = Q3 + 1.5 * IQR`.
pub fn recommend(view: &ListingView<'_>) -> Recommendation {
    if view.is_empty() {
        return Recommendation::NoData;
    }
    let Some((q1, q3)) = quartiles(view.iter().map(|l| l.price)) else {
        return Recommendation::NoData;
    };
    let iqr = q3 - q1;
    let lower = (q1 - IQR_MULTIPLIER * iqr).max(0.0);
    let upper = q3 + IQR_MULTIPLIER * iqr;

    log::debug!("recommend over {} rows: q1={q1} q3={q3} iqr={iqr}", view.len());
    Recommendation::Range(PriceRange { lower, upper })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, Constraints};
    use crate::data::model::{listing, ListingTable};

    #[test]
    fn test_entire_home_example() {
        let table = ListingTable::from_listings(vec![
            listing("Centro", "Entire home", 100.0, 5),
            listing("Centro", "Entire home", 200.0, 10),
            listing("Centro", "Entire home", 120.0, 3),
            listing("Centro", "Private room", 30.0, 3),
        ]);
        let view = filter(&table, &Constraints::new().room_type("Entire home"));

        assert_eq!(
            recommend(&view),
            Recommendation::Range(PriceRange {
                lower: 35.0,
                upper: 235.0,
            })
        );
    }

    #[test]
    fn test_empty_view_is_no_data() {
        let table = ListingTable::from_listings(vec![listing("Centro", "Entire home", 100.0, 5)]);
        let view = filter(&table, &Constraints::new().room_type("Hotel room"));
        assert_eq!(recommend(&view), Recommendation::NoData);
        assert_eq!(recommend(&view).range(), None);
    }

    #[test]
    fn test_single_row_collapses_to_its_price() {
        let table = ListingTable::from_listings(vec![listing("Centro", "Shared room", 42.5, 1)]);
        assert_eq!(
            recommend(&table.view()).range(),
            Some(PriceRange {
                lower: 42.5,
                upper: 42.5,
            })
        );
    }

    #[test]
    fn test_lower_fence_clamped_at_zero() {
        let table = ListingTable::from_listings(vec![
            listing("Centro", "Private room", 10.0, 1),
            listing("Centro", "Private room", 20.0, 1),
            listing("Centro", "Private room", 300.0, 1),
            listing("Centro", "Private room", 400.0, 1),
        ]);
        let range = recommend(&table.view()).range().unwrap();
        assert_eq!(range.lower, 0.0);
        assert!(range.upper > 400.0);
    }

    #[test]
    fn test_bounds_are_ordered_for_many_cohorts() {
        let prices = [0.0, 15.0, 15.0, 60.0, 75.5, 80.0, 250.0, 999.0, 1200.0];
        for n in 1..=prices.len() {
            let rows = prices[..n]
                .iter()
                .map(|&p| listing("Centro", "Entire home", p, 1))
                .collect();
            let table = ListingTable::from_listings(rows);
            let range = recommend(&table.view()).range().unwrap();
            assert!(range.lower >= 0.0, "n={n}: {range:?}");
            assert!(range.lower <= range.upper, "n={n}: {range:?}");
        }
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_string(&Recommendation::NoData).unwrap();
        assert_eq!(json, r#"{"kind":"no_data"}"#);
    }
}

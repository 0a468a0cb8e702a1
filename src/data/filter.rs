use std::fmt;

use serde::Serialize;

use super::model::{Listing, ListingTable, ListingView};

// ---------------------------------------------------------------------------
// Constraints: conjunction of optional predicates
// ---------------------------------------------------------------------------

/// Filter constraints. An absent field imposes no restriction; present
/// fields are ANDed. The review range is inclusive on both ends and is not
/// reordered, so `min > max` matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Constraints {
    pub neighbourhood_group: Option<String>,
    pub room_type: Option<String>,
    pub number_of_reviews_min: Option<u64>,
    pub number_of_reviews_max: Option<u64>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neighbourhood_group(mut self, group: impl Into<String>) -> Self {
        self.neighbourhood_group = Some(group.into());
        self
    }

    pub fn room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    pub fn reviews_between(mut self, min: u64, max: u64) -> Self {
        self.number_of_reviews_min = Some(min);
        self.number_of_reviews_max = Some(max);
        self
    }

    /// Whether `listing` satisfies every present predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(group) = &self.neighbourhood_group {
            if listing.neighbourhood_group != *group {
                return false;
            }
        }
        if let Some(room_type) = &self.room_type {
            if listing.room_type != *room_type {
                return false;
            }
        }
        if let Some(min) = self.number_of_reviews_min {
            if listing.number_of_reviews < min {
                return false;
            }
        }
        if let Some(max) = self.number_of_reviews_max {
            if listing.number_of_reviews > max {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(group) = &self.neighbourhood_group {
            parts.push(format!("neighbourhood_group={group}"));
        }
        if let Some(room_type) = &self.room_type {
            parts.push(format!("room_type={room_type}"));
        }
        if let Some(min) = self.number_of_reviews_min {
            parts.push(format!("number_of_reviews>={min}"));
        }
        if let Some(max) = self.number_of_reviews_max {
            parts.push(format!("number_of_reviews<={max}"));
        }
        if parts.is_empty() {
            write!(f, "<all>")
        } else {
            write!(f, "{}", parts.join(" AND "))
        }
    }
}

/// Return the rows of `table` that pass all constraints, in table order.
/// An empty result is a valid outcome.
pub fn filter<'a>(table: &'a ListingTable, constraints: &Constraints) -> ListingView<'a> {
    let indices: Vec<usize> = table
        .listings()
        .iter()
        .enumerate()
        .filter(|(_, listing)| constraints.matches(listing))
        .map(|(i, _)| i)
        .collect();

    log::debug!("filter [{constraints}] -> {} of {} rows", indices.len(), table.len());
    ListingView::from_indices(table, indices)
}

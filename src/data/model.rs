use std::fmt;

use serde::Serialize;

/// Sentinel category assigned to missing neighbourhood groups and room types.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Tokens that common dataframe tooling writes for a missing cell.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A",
];

// ---------------------------------------------------------------------------
// CellValue – one raw cell as read from a source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, shared by all loaders before a row is turned
/// into a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Whether the cell represents a missing value.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => is_missing_text(s),
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Interpret the cell as a number. Numeric strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Render the cell as text; missing cells become `None`.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

/// `true` for empty, whitespace-only, or NA-token text.
pub fn is_missing_text(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

/// Replace a missing category with [`UNKNOWN_CATEGORY`].
pub fn normalize_category(value: &str) -> String {
    if is_missing_text(value) {
        UNKNOWN_CATEGORY.to_string()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the dataset
// ---------------------------------------------------------------------------

/// A single rental offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub name: String,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub room_type: String,
    pub price: f64,
    pub number_of_reviews: u64,
    pub reviews_per_month: Option<f64>,
    pub calculated_host_listings_count: u64,
}

impl Listing {
    /// Replace missing `neighbourhood_group` / `room_type` values with
    /// [`UNKNOWN_CATEGORY`]. No other field is touched.
    pub fn normalize(&mut self) {
        self.neighbourhood_group = normalize_category(&self.neighbourhood_group);
        self.room_type = normalize_category(&self.room_type);
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, normalized dataset plus the catalogue the selectors offer.
///
/// Immutable once built: every derived view borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingTable {
    listings: Vec<Listing>,
    /// Distinct neighbourhood groups in first-appearance order.
    neighbourhood_groups: Vec<String>,
    /// Distinct room types in first-appearance order.
    room_types: Vec<String>,
}

impl ListingTable {
    /// Normalize the rows and build the category catalogue.
    pub fn from_listings(mut listings: Vec<Listing>) -> Self {
        normalize_listings(&mut listings);

        let mut neighbourhood_groups: Vec<String> = Vec::new();
        let mut room_types: Vec<String> = Vec::new();
        for listing in &listings {
            if !neighbourhood_groups.contains(&listing.neighbourhood_group) {
                neighbourhood_groups.push(listing.neighbourhood_group.clone());
            }
            if !room_types.contains(&listing.room_type) {
                room_types.push(listing.room_type.clone());
            }
        }

        ListingTable {
            listings,
            neighbourhood_groups,
            room_types,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn neighbourhood_groups(&self) -> &[String] {
        &self.neighbourhood_groups
    }

    pub fn room_types(&self) -> &[String] {
        &self.room_types
    }

    /// Smallest and largest `number_of_reviews`, or `None` when empty.
    pub fn review_count_bounds(&self) -> Option<(u64, u64)> {
        let min = self.listings.iter().map(|l| l.number_of_reviews).min()?;
        let max = self.listings.iter().map(|l| l.number_of_reviews).max()?;
        Some((min, max))
    }

    /// A view over every row.
    pub fn view(&self) -> ListingView<'_> {
        ListingView {
            table: self,
            indices: (0..self.listings.len()).collect(),
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Apply category normalization to every row in place.
pub fn normalize_listings(listings: &mut [Listing]) {
    for listing in listings.iter_mut() {
        listing.normalize();
    }
}

// ---------------------------------------------------------------------------
// ListingView – an order-preserving subsequence of a table
// ---------------------------------------------------------------------------

/// Borrowed subsequence of a [`ListingTable`]. Indices are strictly
/// increasing, so iteration follows the original row order.
#[derive(Debug, Clone)]
pub struct ListingView<'a> {
    table: &'a ListingTable,
    indices: Vec<usize>,
}

impl<'a> ListingView<'a> {
    pub(crate) fn from_indices(table: &'a ListingTable, indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        ListingView { table, indices }
    }

    /// Row positions in the source table.
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let listings = self.table.listings();
        self.indices.iter().map(move |&i| &listings[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn listing(group: &str, room: &str, price: f64, reviews: u64) -> Listing {
    Listing {
        name: format!("{room} in {group} at {price}"),
        neighbourhood_group: group.to_string(),
        neighbourhood: format!("{group} centre"),
        room_type: room.to_string(),
        price,
        number_of_reviews: reviews,
        reviews_per_month: None,
        calculated_host_listings_count: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_categories_become_unknown() {
        let table = ListingTable::from_listings(vec![
            listing("", "Private room", 50.0, 1),
            listing("Centro", "NaN", 70.0, 2),
            listing("  ", "", 90.0, 3),
        ]);

        let rows = table.listings();
        assert_eq!(rows[0].neighbourhood_group, UNKNOWN_CATEGORY);
        assert_eq!(rows[1].room_type, UNKNOWN_CATEGORY);
        assert_eq!(rows[2].neighbourhood_group, UNKNOWN_CATEGORY);
        assert_eq!(rows[2].room_type, UNKNOWN_CATEGORY);
        assert!(table
            .listings()
            .iter()
            .all(|l| !is_missing_text(&l.neighbourhood_group) && !is_missing_text(&l.room_type)));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut once = vec![
            listing("", "Entire home/apt", 80.0, 4),
            listing("Retiro", "null", 60.0, 0),
            listing("Salamanca", "Shared room", 30.0, 9),
        ];
        normalize_listings(&mut once);
        let mut twice = once.clone();
        normalize_listings(&mut twice);
        assert_eq!(once, twice);

        let table = ListingTable::from_listings(once.clone());
        let rebuilt = ListingTable::from_listings(table.listings().to_vec());
        assert_eq!(table, rebuilt);
    }

    #[test]
    fn test_normalization_leaves_other_columns_alone() {
        let mut row = listing("", "", 42.0, 7);
        row.neighbourhood = String::new();
        row.name = "NA".to_string();
        row.normalize();
        assert_eq!(row.neighbourhood, "");
        assert_eq!(row.name, "NA");
        assert_eq!(row.price, 42.0);
    }

    #[test]
    fn test_catalogue_keeps_first_appearance_order() {
        let table = ListingTable::from_listings(vec![
            listing("Retiro", "Private room", 50.0, 10),
            listing("Centro", "Entire home/apt", 70.0, 2),
            listing("Retiro", "Entire home/apt", 90.0, 35),
            listing("", "Private room", 20.0, 0),
        ]);
        assert_eq!(table.neighbourhood_groups(), ["Retiro", "Centro", "Unknown"]);
        assert_eq!(table.room_types(), ["Private room", "Entire home/apt"]);
        assert_eq!(table.review_count_bounds(), Some((0, 35)));
    }

    #[test]
    fn test_empty_table_has_no_bounds() {
        let table = ListingTable::from_listings(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.review_count_bounds(), None);
        assert!(table.view().is_empty());
    }

    #[test]
    fn test_cell_value_missing_detection() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::String("N/A".into()).is_missing());
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(!CellValue::Integer(0).is_missing());
        assert_eq!(CellValue::String(" 12.5 ".into()).as_f64(), Some(12.5));
        assert_eq!(CellValue::Bool(true).as_f64(), None);
    }
}

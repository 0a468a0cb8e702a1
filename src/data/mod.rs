//! Data layer: core types, loading, filtering, and derived views.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → ListingTable (categories normalized)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  Constraints → ListingView (order-preserving subsequence)
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌───────────┐
//!   │ insights  │   │ recommend │  IQR price band | NoData
//!   └──────────┘   └───────────┘
//! ```

pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod recommend;
pub mod stats;

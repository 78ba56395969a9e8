//! Data layer: loading, normalization, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<RawRow>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  dates, weekdays, labels → Dataset
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec predicates → Filtered view
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  trends, deltas, group means → DashboardView
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod view;

pub use error::{DataFormatError, InvalidRangeError};
pub use filter::FilterSpec;
pub use model::{Dataset, Record, Season, Weather};
pub use view::DashboardView;

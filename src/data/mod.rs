//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<Trip>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ TripDataset │  Vec<TripRecord>, derived month / weekday / hours
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  month / weekday predicates → retained rows
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod filter;

//! Data layer: core types, loading, indexing, and queries.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, rename headers via ColumnMap → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  index    │  validate rows → Vec<Record>, company/year lookups
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  query    │  history / point / distinct ids and years
//!   └──────────┘
//! ```

pub mod index;
pub mod loader;
pub mod model;
pub mod query;
pub mod schema;

//! Query and aggregation engine for per-company, per-year digital
//! transformation index data.
//!
//! ```text
//!  loader ──► Table ──► Index::build ──► query ──┬─► stats     (summaries, histogram)
//!                                                ├─► series    (trend, scatter)
//!                                                └─► frequency (keyword counts)
//! ```
//!
//! [`session::Session`] ties the pieces together for a presentation layer.

pub mod data;
pub mod error;
pub mod frequency;
pub mod series;
pub mod session;
pub mod stats;

pub use data::index::Index;
pub use data::model::{KeywordCategory, Metric, Record, Table};
pub use data::query::{QueryResult, Selection};
pub use data::schema::ColumnMap;
pub use error::{MalformedDatasetError, MissingFieldError, UnknownMetric};
pub use session::{DashboardView, Detail, Session};
pub use stats::AggregateStatistics;

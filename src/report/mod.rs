//! Aggregation of the records of the sheet into totals and grouped breakdowns.
mod engine;
mod queries;

pub use engine::Bucket;
pub use queries::{
    by_month_for_year, by_type_for_month, details, month_summary, month_years, total_by_month,
    total_by_year, years, MonthSummary,
};

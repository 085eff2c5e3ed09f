//! Deterministic statistical helpers and calendar bucket keys.
//!
//! Every function here is pure and total over its input: empty slices yield
//! zeros (or the input unchanged), zero denominators yield guarded values,
//! and nothing allocates beyond its own result. The analysis crates build
//! their aggregates out of these.

mod buckets;
mod math;

pub use buckets::{day_key, month_key, week_key, year_key};
pub use math::{
    average, filter_outliers, filter_outliers_with, max_value, median, min_value, percentage,
    percentage_change, percentile, round2, std_dev, sum,
};

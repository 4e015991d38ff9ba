//! Reporting over cleaned survey tables.
//!
//! Reports only ever read tables that went through the cleaning pipeline and
//! were loaded back through their persisted schema, so every column already
//! has its final type here.

pub mod describe;
pub mod error;
pub mod quality;
pub mod stats;
pub mod trends;

pub use describe::{
    DEFAULT_EXCLUDED_GROUP, DEFAULT_GROUP_COLUMN, DEFAULT_SUBGROUP_COLUMN, DescribeOptions,
    GroupDescription, SubgroupDescription, describe_groups,
};
pub use error::{ReportError, Result};
pub use quality::{ColumnProfile, ColumnQuality, DateRange, QualityReport, quality_report};
pub use stats::{NumericSummary, quantile, summarize};
pub use trends::{
    DEFAULT_DATE_COLUMN, DEFAULT_TREND_GROUP, DEFAULT_VALUE_COLUMN, TrendOptions, TrendPoint,
    TrendSeries, trend_series,
};

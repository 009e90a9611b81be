//! Core business logic module
//!
//! This module contains the categorization-and-aggregation pipeline:
//! - `resolver` - description → category resolution (exact, then prefix)
//! - `classifier` - per-row classification against the table schema
//! - `aggregator` - the fold into ordered totals + uncategorized rows
//! - `report` - dual-block report construction and column-width fitting
//! - `engine` - orchestration of one full run

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod report;
pub mod resolver;

pub use aggregator::{aggregate, Aggregation, CategoryTotals};
pub use classifier::RowClassifier;
pub use engine::{Summary, SummaryEngine};
pub use report::{build_report, Report, ReportCell, ReportRow};
pub use resolver::CategoryResolver;

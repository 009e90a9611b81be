//! Expense Summary Engine Library
//! # Overview
//!
//! This library turns a tabular expense export (one transaction per row)
//! into a categorized summary workbook, preserving every transaction that
//! cannot be categorized as a verbatim, style-preserving passthrough row.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (cells, rows, errors)
//! - [`rules`] - The category rule table (embedded default, TOML override)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::resolver`] - description → category resolution
//!   - [`core::classifier`] - per-row classification
//!   - [`core::aggregator`] - ordered decimal totals + uncategorized rows
//!   - [`core::report`] - dual-block report construction and width fitting
//!   - [`core::engine`] - orchestration of one run
//! - [`io`] - workbook reading and writing
//!
//! # Categorization
//!
//! A description resolves through two layers:
//!
//! - **Exact**: the normalized description equals a rule keyword
//! - **Prefix**: otherwise, the first declared rule whose keyword prefixes
//!   the description wins
//!
//! Rows that resolve contribute their amount magnitude to their category's
//! total (first-seen category order); rows that do not are copied into the
//! report unchanged, values and styles alike.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod rules;
pub mod types;

pub use crate::core::{Summary, SummaryEngine};
pub use crate::io::{read_table, write_report, write_report_to_buffer, HeaderMode};
pub use crate::rules::RuleSet;
pub use crate::types::{SummaryError, TableSchema};
